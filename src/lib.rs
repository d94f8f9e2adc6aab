//! # listsmith
//!
//! Generate marketplace-compliant e-commerce product listings with LLM
//! copywriting and heuristic quality scoring.
//!
//! ## Why this crate?
//!
//! Writing a listing that survives Amazon's title limits, reads well, and
//! avoids the vague filler marketplaces penalise is tedious to do by hand
//! and unreliable to do with a raw model call — completions drift off
//! format, drop sections, or fail outright. This crate wraps the model call
//! in a tolerant parser, a deterministic fallback, and a scoring pass so
//! the caller always gets a complete, limit-compliant listing with quality
//! scores attached.
//!
//! ## Pipeline Overview
//!
//! ```text
//! brief
//!  │
//!  ├─ 1. Validate   reject empty product name / features before any charge
//!  ├─ 2. Quota      resolve the user, check the usage counter
//!  ├─ 3. LLM        one chat-completion call (bounded timeout, no retries)
//!  ├─ 4. Parse      labeled sections → typed fields, defaults for the rest
//!  │      └─ on any provider failure: deterministic template fallback
//!  ├─ 5. Score      four clamped heuristics (seo / conversion / readability / error)
//!  ├─ 6. Render     fixed-format HTML + SEO metadata
//!  └─ 7. Persist    save the listing, charge the quota, return usage
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use listsmith::{
//!     generate, GenerationConfig, ListingRequest, Marketplace, MemoryStore, PricePoint,
//!     UserRecord,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Provider read from OPENAI_API_KEY; without one, every request
//!     // still succeeds via the deterministic fallback generator.
//!     let config = GenerationConfig::default();
//!     let store = MemoryStore::with_user(UserRecord::free_tier(1, "me@example.com"));
//!
//!     let request = ListingRequest::from_feature_block(
//!         "Slim Wallet",
//!         "RFID blocking\nFull-grain leather\nHolds 8 cards",
//!         PricePoint::Mid,
//!         Marketplace::Amazon,
//!     );
//!
//!     let output = generate(Some("me@example.com"), &request, &store, &config).await?;
//!     println!("{}", output.listing.html_output);
//!     eprintln!(
//!         "seo {} / conversion {} — {}/{} listings used",
//!         output.listing.scores.seo,
//!         output.listing.scores.conversion,
//!         output.usage.listings_used,
//!         output.usage.listings_limit
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `listsmith` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! listsmith = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod generate;
pub mod listing;
pub mod marketplace;
pub mod pipeline;
pub mod prompts;
pub mod request;
pub mod store;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{GenerationConfig, GenerationConfigBuilder};
pub use error::{GenerationError, ListingError};
pub use generate::{generate, generate_batch};
pub use listing::{
    Bullet, GeneratedListing, GenerationOutput, GenerationStats, ListingMetadata, ParsedListing,
    ScoreSet, UsageSnapshot,
};
pub use marketplace::{Marketplace, MarketplaceLimits, PricePoint};
pub use pipeline::llm::{OpenAiChatClient, TextGenerator};
pub use request::ListingRequest;
pub use store::{ListingStore, MemoryStore, StoreError, StoredListing, UserRecord};
