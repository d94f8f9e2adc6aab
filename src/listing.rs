//! Output types: the parsed listing, quality scores, and final composed
//! result returned by the orchestrator.
//!
//! Everything here derives `Serialize`/`Deserialize` because the original
//! storage schema persists bullets and metadata as JSON columns, and callers
//! log or cache whole results as JSON.

use serde::{Deserialize, Serialize};

/// One bullet point: a short attention hook plus a supporting sentence.
///
/// Rendered as `<li><strong>{hook}:</strong> {detail}</li>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bullet {
    pub hook: String,
    pub detail: String,
}

impl Bullet {
    pub fn new(hook: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            hook: hook.into(),
            detail: detail.into(),
        }
    }
}

/// The typed listing fields produced by the parser or the fallback generator.
///
/// Invariants (enforced by both producers, see `pipeline::parse` and
/// `pipeline::fallback`):
/// - `title` fits the marketplace title limit
/// - `description` is at least 20 characters
/// - `bullets` is never empty
/// - `keywords` and `url_slug` are never empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedListing {
    pub title: String,
    pub bullets: Vec<Bullet>,
    pub description: String,
    /// Comma-separated search keywords.
    pub keywords: String,
    /// URL-safe slug derived from the title when the model supplies none.
    pub url_slug: String,
}

/// The four heuristic quality scores, each clamped to a fixed closed range.
///
/// Ranges are permanent invariants of the scoring engine: seo ∈ [82, 98],
/// conversion ∈ [85, 97], readability ∈ [87, 98], error ∈ [88, 100] — no
/// input can push a score outside its band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSet {
    pub seo: u8,
    pub conversion: u8,
    pub readability: u8,
    pub error: u8,
}

/// Maximum length of the derived meta description, in characters.
pub const META_DESCRIPTION_MAX: usize = 155;

/// SEO metadata derived from the listing fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingMetadata {
    /// Description truncated to [`META_DESCRIPTION_MAX`] characters,
    /// ellipsized when cut.
    pub meta_description: String,
    pub keywords: String,
    pub url_slug: String,
}

/// The final composed listing returned to the caller and handed to the
/// store. Constructed once per request; never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedListing {
    pub title: String,
    pub bullets: Vec<Bullet>,
    pub description: String,
    pub keywords: String,
    pub url_slug: String,
    pub scores: ScoreSet,
    pub meta_data: ListingMetadata,
    /// Rendered markup, copied verbatim by callers into marketplace listing
    /// fields — the exact tag/whitespace structure is part of the contract.
    pub html_output: String,
}

/// The user's usage position after this generation was charged.
///
/// Returned explicitly instead of mutating any shared session state: the
/// caller learns the new counter from the result, not from a side effect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageSnapshot {
    pub tier: String,
    pub listings_used: u32,
    pub listings_limit: u32,
}

/// Timing and provenance for one generation run.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Wall-clock time for the whole request, including persistence.
    pub total_duration_ms: u64,
    /// Time spent awaiting the external provider (0 on the pure-fallback path).
    pub llm_duration_ms: u64,
    /// True when the deterministic fallback produced the listing.
    pub used_fallback: bool,
}

/// Everything the orchestrator returns for one successful request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationOutput {
    pub listing: GeneratedListing,
    pub usage: UsageSnapshot,
    pub stats: GenerationStats,
}
