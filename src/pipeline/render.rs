//! Final rendering: the HTML block and derived SEO metadata.
//!
//! The HTML format is a contract, not a presentation detail: callers paste
//! `html_output` verbatim into marketplace listing fields, so the exact tag
//! and whitespace structure must not drift between releases.

use crate::listing::{Bullet, ListingMetadata, ParsedListing, META_DESCRIPTION_MAX};

/// Render the listing as the fixed HTML block.
///
/// ```text
/// <h1>{title}</h1>
///
/// <ul>
///   <li><strong>{hook}:</strong> {detail}</li>
///   ...
/// </ul>
///
/// <p>{description}</p>
/// ```
pub fn render_html(listing: &ParsedListing) -> String {
    let items = listing
        .bullets
        .iter()
        .map(render_bullet)
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "<h1>{}</h1>\n\n<ul>\n{}\n</ul>\n\n<p>{}</p>",
        listing.title, items, listing.description
    )
}

fn render_bullet(bullet: &Bullet) -> String {
    format!(
        "  <li><strong>{}:</strong> {}</li>",
        bullet.hook, bullet.detail
    )
}

/// Derive the SEO metadata block from the listing fields.
pub fn derive_metadata(listing: &ParsedListing) -> ListingMetadata {
    ListingMetadata {
        meta_description: ellipsize(&listing.description, META_DESCRIPTION_MAX),
        keywords: listing.keywords.clone(),
        url_slug: listing.url_slug.clone(),
    }
}

/// Cut `text` to at most `max` characters, ellipsizing when it was longer.
fn ellipsize(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max - 3).collect();
    format!("{cut}...")
}

// ── Tests ────────────────────────────────────────────────────────────────────
