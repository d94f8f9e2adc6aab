//! Parsing the model's semi-structured completion into typed listing fields.
//!
//! ## Contract with the model
//!
//! The prompt asks for labeled sections — `TITLE:`, `BULLETS:` (numbered),
//! `DESCRIPTION:`, `KEYWORDS:`, `URL_SLUG:` — but real completions only
//! loosely comply: labels go missing, bullets lose their numbering, sections
//! arrive out of order or not at all. The parser is therefore maximally
//! tolerant: it never fails, and every missing or malformed field is filled
//! from deterministic defaults so the result always satisfies the
//! [`ParsedListing`] invariants.
//!
//! ## State machine
//!
//! The input is scanned line by line with an explicit [`Section`] state. A
//! label line switches state (optionally seeding the field from same-line
//! trailing content); other lines accumulate into the current section.
//! Blank lines are skipped, and unlabeled lines outside any section are
//! silently dropped.

use crate::listing::{Bullet, ParsedListing};
use crate::marketplace::Marketplace;
use crate::pipeline::normalize::normalize;
use once_cell::sync::Lazy;
use regex::Regex;

/// Current section while scanning the completion line by line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Title,
    Bullets,
    Description,
    Keywords,
    UrlSlug,
}

/// Numbered bullet line: a leading integer and a dot, then the content.
static RE_NUMBERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s*(.*)$").unwrap());

/// Non-alphanumeric runs, for slug derivation.
static RE_NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Parse a model completion into a complete [`ParsedListing`].
///
/// Total function: any input — empty, binary garbage, a completion that
/// ignored the format entirely — yields a listing that satisfies every
/// field invariant, via the defaults documented on each post-processing
/// step below.
pub fn parse(raw: &str, marketplace: Marketplace, product_name: &str) -> ParsedListing {
    let mut section = Section::None;

    let mut title_parts: Vec<String> = Vec::new();
    let mut bullets: Vec<Bullet> = Vec::new();
    let mut desc_parts: Vec<String> = Vec::new();
    let mut keyword_parts: Vec<String> = Vec::new();
    let mut slug_parts: Vec<String> = Vec::new();

    for raw_line in raw.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        // Label lines switch section and may seed the field in-line.
        if let Some(rest) = label_content(line, "TITLE:") {
            section = Section::Title;
            push_non_empty(&mut title_parts, rest);
            continue;
        }
        if line.starts_with("BULLETS:") {
            section = Section::Bullets;
            continue;
        }
        if let Some(rest) = label_content(line, "DESCRIPTION:") {
            section = Section::Description;
            push_non_empty(&mut desc_parts, rest);
            continue;
        }
        if let Some(rest) = label_content(line, "KEYWORDS:") {
            section = Section::Keywords;
            push_non_empty(&mut keyword_parts, rest);
            continue;
        }
        if let Some(rest) = slug_label_content(line) {
            section = Section::UrlSlug;
            push_non_empty(&mut slug_parts, rest);
            continue;
        }

        // Continuation lines accumulate into the current section only; an
        // unlabeled line in `Section::None` is dropped.
        match section {
            Section::Title => {
                if !RE_NUMBERED.is_match(line) {
                    title_parts.push(line.to_string());
                }
            }
            Section::Bullets => {
                if let Some(caps) = RE_NUMBERED.captures(line) {
                    if let Some(bullet) = split_bullet(&caps[1]) {
                        bullets.push(bullet);
                    }
                }
            }
            Section::Description => {
                if !line.starts_with("KEYWORDS") && !line.starts_with("URL") {
                    desc_parts.push(line.to_string());
                }
            }
            Section::Keywords => {
                if !line.starts_with("URL") {
                    keyword_parts.push(line.to_string());
                }
            }
            Section::UrlSlug => slug_parts.push(line.to_string()),
            Section::None => {}
        }
    }

    finalize(
        title_parts.join(" "),
        bullets,
        desc_parts.join(" "),
        keyword_parts.join(", "),
        slug_parts.join("-"),
        marketplace,
        product_name,
    )
}

/// Apply the post-parse defaults and limits, in the documented order.
fn finalize(
    title: String,
    bullets: Vec<Bullet>,
    description: String,
    keywords: String,
    url_slug: String,
    marketplace: Marketplace,
    product_name: &str,
) -> ParsedListing {
    let limits = marketplace.limits();

    // Title: normalise, default when too short, then a hard character cut.
    // The cut is deliberately not word-boundary aware: marketplace title
    // limits are hard constraints, so a mid-word cut beats a rejected upload.
    let mut title = normalize(&title);
    if title.chars().count() < 10 {
        title = format!("{product_name} - Premium Quality");
    }
    let title: String = title.chars().take(limits.title).collect();

    // Description: normalise, synthesise when too short to be usable copy.
    let mut description = normalize(&description);
    if description.chars().count() < 20 {
        description = default_description(product_name);
    }

    // Bullets: a listing with zero bullets is unusable on every marketplace.
    let bullets = if bullets.is_empty() {
        default_bullets()
    } else {
        bullets
    };

    let keywords = if keywords.trim().is_empty() {
        product_name.to_lowercase()
    } else {
        keywords
    };

    let url_slug = if url_slug.trim().is_empty() {
        slugify(&title)
    } else {
        url_slug
    };

    ParsedListing {
        title,
        bullets,
        description,
        keywords,
        url_slug,
    }
}

/// Content after `label` when `line` starts with it, trimmed.
fn label_content<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    line.strip_prefix(label).map(str::trim)
}

/// The slug label tolerates both spellings and any casing: models emit
/// `URL_SLUG:`, `URL SLUG:`, and `url_slug:` interchangeably.
fn slug_label_content(line: &str) -> Option<&str> {
    let upper = line.to_uppercase();
    if upper.starts_with("URL_SLUG:") || upper.starts_with("URL SLUG:") {
        Some(line["URL_SLUG:".len()..].trim())
    } else {
        None
    }
}

fn push_non_empty(parts: &mut Vec<String>, content: &str) {
    if !content.is_empty() {
        parts.push(content.to_string());
    }
}

/// Split numbered-bullet content on the first `:` into hook and detail.
/// Content without a `:` separator is discarded.
fn split_bullet(content: &str) -> Option<Bullet> {
    let (hook, detail) = content.split_once(':')?;
    Some(Bullet::new(hook.trim(), detail.trim()))
}

/// Derive a URL slug: lowercase, non-alphanumeric runs become single
/// hyphens, leading/trailing hyphens trimmed.
pub(crate) fn slugify(text: &str) -> String {
    RE_NON_ALNUM
        .replace_all(&text.to_lowercase(), "-")
        .trim_matches('-')
        .to_string()
}

/// Synthesised description used when the model's is missing or too short.
pub(crate) fn default_description(product_name: &str) -> String {
    format!(
        "{product_name} is built for dependable everyday use, \
         combining practical features with solid construction."
    )
}

/// Fixed bullet set used when no bullets could be parsed.
pub(crate) fn default_bullets() -> Vec<Bullet> {
    vec![
        Bullet::new(
            "KEY BENEFIT",
            "Delivers consistent performance for daily use",
        ),
        Bullet::new(
            "PRACTICAL VALUE",
            "Designed for convenience without unnecessary complexity",
        ),
        Bullet::new(
            "QUALITY BUILD",
            "Constructed from durable materials that hold up over time",
        ),
        Bullet::new(
            "PERFECT FOR",
            "Anyone who wants dependable results from day one",
        ),
    ]
}

// ── Tests ────────────────────────────────────────────────────────────────────
