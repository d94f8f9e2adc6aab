//! Prompts for the listing-generation chat call.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — the section labels in the prompt and the
//!    labels the parser matches must stay in lockstep; both live a module
//!    apart instead of scattered across call sites.
//!
//! 2. **Testability** — unit tests can inspect the built prompt directly
//!    without a live provider, so a regression that drops a label or a
//!    limit from the instructions is caught immediately.

use crate::marketplace::Marketplace;
use crate::request::ListingRequest;

/// System role for the generation call.
pub const SYSTEM_PROMPT: &str = "You are an expert e-commerce copywriter. \
You write marketplace-compliant product listings and follow the requested \
output format exactly, with no commentary before or after.";

/// Build the user message embedding the brief and the output contract.
///
/// The labeled sections requested here (`TITLE:`, `BULLETS:`,
/// `DESCRIPTION:`, `KEYWORDS:`, `URL_SLUG:`) are exactly what
/// [`crate::pipeline::parse`] looks for; the parser still tolerates
/// completions that ignore the format.
pub fn build_user_prompt(request: &ListingRequest, features: &[String]) -> String {
    let marketplace = request.marketplace;
    let limits = marketplace.limits();
    let bullet_count = marketplace.bullet_count();

    let mut prompt = format!(
        "Write a product listing for the {marketplace} marketplace.\n\
         \n\
         Product: {product}\n\
         Price tier: {price}\n\
         Key features:\n{features}\n\
         \n\
         Output these sections, each starting with its label on its own line:\n\
         \n\
         TITLE: a title of at most {title_limit} characters that leads with the product name\n\
         BULLETS: exactly {bullet_count} numbered bullet points, each formatted as\n\
         1. HOOK IN CAPITALS: supporting detail sentence\n\
         DESCRIPTION: 2-4 sentences of concrete, benefit-led copy\n\
         KEYWORDS: comma-separated search keywords\n\
         URL_SLUG: a lowercase hyphenated slug\n\
         \n\
         Avoid vague marketing language such as \"high quality\", \"amazing\", \
         \"perfect\", or \"best choice\". Name concrete features and outcomes instead.",
        marketplace = marketplace,
        product = request.product_name.trim(),
        price = request.price_point,
        features = bullet_list(features),
        title_limit = limits.title,
        bullet_count = bullet_count,
    );

    if let Some(focus) = request
        .improvement_focus
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty())
    {
        prompt.push_str("\n\nAdditionally: ");
        prompt.push_str(focus);
    }

    prompt
}

fn bullet_list(features: &[String]) -> String {
    features
        .iter()
        .map(|f| format!("- {f}"))
        .collect::<Vec<_>>()
        .join("\n")
}
