//! Generation orchestrator: the library entry point.
//!
//! One linear sequence per request — validate, check identity and quota,
//! attempt the provider call, parse or fall back, score, render, persist.
//! There is no retry loop and no branching state machine: the single
//! attempt-then-fallback step is the whole control flow.
//!
//! ## The availability contract
//!
//! Once the caller is authorised and under quota, `generate` cannot fail for
//! generation reasons. Every provider failure (network, credentials,
//! timeout, empty completion) is logged and absorbed by the deterministic
//! fallback generator, and the fallback result is persisted and charged
//! exactly like a real one — the contract is "always return a usable
//! listing", not "only charge for model output".

use crate::config::GenerationConfig;
use crate::error::{GenerationError, ListingError};
use crate::listing::{
    GeneratedListing, GenerationOutput, GenerationStats, ParsedListing, UsageSnapshot,
};
use crate::pipeline::llm::{OpenAiChatClient, TextGenerator};
use crate::pipeline::{fallback, parse, render, score};
use crate::prompts::{build_user_prompt, SYSTEM_PROMPT};
use crate::request::ListingRequest;
use crate::store::{persistence_error, ListingStore, StoredListing};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::{timeout, Duration};
use tracing::{debug, info, warn};

/// Generate, score, render, and persist one listing.
///
/// # Arguments
/// * `identity` — the authenticated caller's email, or `None` when the
///   session carried no identity
/// * `request`  — the product brief
/// * `store`    — storage collaborator owning user records and the usage
///   counter
/// * `config`   — provider and tuning knobs
///
/// # Errors
/// Fails only before generation starts (`Unauthorized`, `InvalidInput`,
/// `NotFound`, `QuotaExceeded`) or after it finishes (`Persistence`, which
/// carries the computed listing). Provider failures are not errors: the
/// fallback generator answers instead, flagged in
/// [`GenerationStats::used_fallback`].
pub async fn generate(
    identity: Option<&str>,
    request: &ListingRequest,
    store: &dyn ListingStore,
    config: &GenerationConfig,
) -> Result<GenerationOutput, ListingError> {
    let total_start = Instant::now();

    // ── Step 1: Identity ─────────────────────────────────────────────────
    let email = identity.ok_or(ListingError::Unauthorized)?;

    // ── Step 2: Input validation (before any quota charge) ───────────────
    request.validate()?;

    // ── Step 3: Resolve user and check quota ─────────────────────────────
    let user = store
        .get_user(email)
        .await
        .map_err(|e| ListingError::NotFound {
            email: format!("{email} ({e})"),
        })?
        .ok_or_else(|| ListingError::NotFound {
            email: email.to_string(),
        })?;

    if user.listings_used >= user.listings_limit {
        return Err(ListingError::QuotaExceeded {
            used: user.listings_used,
            limit: user.listings_limit,
        });
    }

    info!(
        product = %request.product_name,
        marketplace = %request.marketplace,
        user = user.id,
        "starting listing generation"
    );

    // ── Step 4: Attempt the provider, fall back on any failure ───────────
    let features = request.effective_features();
    let llm_start = Instant::now();
    let (parsed, used_fallback) = match attempt_model_listing(request, &features, config).await {
        Ok(listing) => (listing, false),
        Err(e) => {
            warn!("provider call failed, using fallback generator: {e}");
            let listing = fallback::generate_fallback(
                request.product_name.trim(),
                &features,
                request.marketplace,
                request.price_point,
            );
            (listing, true)
        }
    };
    let llm_duration_ms = llm_start.elapsed().as_millis() as u64;

    // ── Step 5: Score and render ─────────────────────────────────────────
    let listing = compose(parsed, request);
    debug!(
        seo = listing.scores.seo,
        conversion = listing.scores.conversion,
        readability = listing.scores.readability,
        error = listing.scores.error,
        fallback = used_fallback,
        "listing composed"
    );

    // ── Step 6: Persist and charge — fallback results included ───────────
    let saved = store
        .save_listing(StoredListing {
            user_id: user.id,
            product_name: request.product_name.trim().to_string(),
            marketplace: request.marketplace.to_string(),
            listing: listing.clone(),
        })
        .await;
    if let Err(e) = saved {
        return Err(persistence_error(e, listing));
    }

    let listings_used = match store.increment_usage(user.id).await {
        Ok(count) => count,
        Err(e) => return Err(persistence_error(e, listing)),
    };

    info!(
        user = user.id,
        used = listings_used,
        limit = user.listings_limit,
        fallback = used_fallback,
        "listing generated"
    );

    Ok(GenerationOutput {
        listing,
        usage: UsageSnapshot {
            tier: user.tier,
            listings_used,
            listings_limit: user.listings_limit,
        },
        stats: GenerationStats {
            total_duration_ms: total_start.elapsed().as_millis() as u64,
            llm_duration_ms,
            used_fallback,
        },
    })
}

/// Generate listings for a batch of briefs, one request at a time.
///
/// The CSV-upload path: each brief is an independent call to [`generate`],
/// so one failing brief (or an exhausted quota partway through) does not
/// abort the rest — callers get a per-brief result to report row by row.
/// Sequential on purpose: the quota check is read-check-write, and running
/// a user's own batch concurrently would widen that race for no benefit.
pub async fn generate_batch(
    identity: Option<&str>,
    requests: &[ListingRequest],
    store: &dyn ListingStore,
    config: &GenerationConfig,
) -> Vec<Result<GenerationOutput, ListingError>> {
    let mut results = Vec::with_capacity(requests.len());
    for request in requests {
        results.push(generate(identity, request, store, config).await);
    }
    results
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Call the provider and parse its completion.
///
/// Any error return here — provider construction, the call itself, the
/// orchestrator-level timeout — sends the request down the fallback path.
/// The parse step cannot fail; a completion that ignored the format just
/// yields a listing built mostly from defaults.
async fn attempt_model_listing(
    request: &ListingRequest,
    features: &[String],
    config: &GenerationConfig,
) -> Result<ParsedListing, GenerationError> {
    let provider = resolve_provider(config)?;
    let user_prompt = build_user_prompt(request, features);

    let completion = timeout(
        Duration::from_secs(config.api_timeout_secs),
        provider.complete(SYSTEM_PROMPT, &user_prompt),
    )
    .await
    .map_err(|_| GenerationError::Timeout {
        secs: config.api_timeout_secs,
    })??;

    debug!(chars = completion.len(), "parsing completion");
    Ok(parse::parse(
        &completion,
        request.marketplace,
        request.product_name.trim(),
    ))
}

/// Resolve the provider: an injected one wins, otherwise build the
/// OpenAI-compatible client from configuration and environment.
fn resolve_provider(config: &GenerationConfig) -> Result<Arc<dyn TextGenerator>, GenerationError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    let client = match (&config.model, &config.base_url) {
        (None, None) => OpenAiChatClient::from_env(
            config.temperature,
            config.max_tokens,
            config.api_timeout_secs,
        )?,
        (model, base_url) => {
            let api_key = std::env::var("OPENAI_API_KEY")
                .map_err(|_| GenerationError::MissingCredentials)?;
            OpenAiChatClient::new(
                api_key,
                model
                    .clone()
                    .unwrap_or_else(|| crate::pipeline::llm::DEFAULT_MODEL.to_string()),
                base_url
                    .clone()
                    .unwrap_or_else(|| crate::pipeline::llm::DEFAULT_BASE_URL.to_string()),
                config.temperature,
                config.max_tokens,
                config.api_timeout_secs,
            )?
        }
    };

    Ok(Arc::new(client))
}

/// Score the parsed fields and assemble the immutable final listing.
fn compose(parsed: ParsedListing, request: &ListingRequest) -> GeneratedListing {
    let scores = score::score(
        &parsed.title,
        &parsed.bullets,
        &parsed.description,
        request.product_name.trim(),
        request.marketplace,
    );
    let meta_data = render::derive_metadata(&parsed);
    let html_output = render::render_html(&parsed);

    GeneratedListing {
        title: parsed.title,
        bullets: parsed.bullets,
        description: parsed.description,
        keywords: parsed.keywords,
        url_slug: parsed.url_slug,
        scores,
        meta_data,
        html_output,
    }
}
