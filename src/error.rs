//! Error types for the listsmith library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`ListingError`] — **Fatal**: the request cannot produce a listing at
//!   all (unauthenticated caller, empty brief, quota exhausted). Returned as
//!   `Err(ListingError)` from [`crate::generate::generate`].
//!
//! * [`GenerationError`] — **Recoverable**: the external text-generation call
//!   failed (network, credentials, timeout, empty completion). Never escapes
//!   the orchestrator — every variant routes to the deterministic fallback
//!   generator, so an authorised, under-quota request always yields a
//!   listing. Quality degrades; availability does not.
//!
//! The separation encodes the system's core promise: once identity and quota
//! checks pass there is no unrecoverable error.

use crate::listing::GeneratedListing;
use thiserror::Error;

/// All fatal errors returned by the listsmith library.
///
/// Provider failures use [`GenerationError`] and are absorbed by the
/// fallback path rather than propagated here.
#[derive(Debug, Error)]
pub enum ListingError {
    // ── Identity errors ───────────────────────────────────────────────────
    /// No authenticated identity was supplied with the request.
    #[error("Not authenticated: sign in before generating listings.")]
    Unauthorized,

    /// The identity resolved to no user record in the store.
    #[error("No user record found for '{email}'")]
    NotFound { email: String },

    // ── Business-rule errors ──────────────────────────────────────────────
    /// The user's monthly usage counter has reached their plan limit.
    ///
    /// The Display message carries the numeric limit so callers can render
    /// an upgrade prompt without re-fetching the user record.
    #[error("Listing limit reached: {used}/{limit} listings used this period. Upgrade your plan to generate more.")]
    QuotaExceeded { used: u32, limit: u32 },

    // ── Input errors ──────────────────────────────────────────────────────
    /// A required brief field is missing or blank. Rejected before any
    /// generation attempt; never charged against the quota.
    #[error("Invalid input: '{field}' {reason}")]
    InvalidInput {
        field: &'static str,
        reason: String,
    },

    // ── Storage errors ────────────────────────────────────────────────────
    /// The store failed after the listing was already generated.
    ///
    /// Carries the computed listing so callers can still show or retry-save
    /// it — the generation work is not discarded with the write.
    #[error("Failed to persist generated listing: {detail}")]
    Persistence {
        detail: String,
        listing: Box<GeneratedListing>,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// A recoverable failure of the external text-generation call.
///
/// Logged and absorbed by the orchestrator; the caller sees the fallback
/// listing, never this error.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    /// No API key available for the provider.
    #[error("No provider credentials: set OPENAI_API_KEY or configure a provider")]
    MissingCredentials,

    /// Transport-level failure (DNS, connection reset, TLS).
    #[error("Provider request failed: {0}")]
    Network(String),

    /// The provider answered with a non-success status.
    #[error("Provider returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The call exceeded the configured per-request timeout.
    #[error("Provider call timed out after {secs}s")]
    Timeout { secs: u64 },

    /// The provider answered 2xx but the completion text was empty.
    #[error("Provider returned an empty completion")]
    EmptyCompletion,
}
