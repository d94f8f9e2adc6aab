//! Heuristic quality scoring: four clamped 0–100 scores for a listing.
//!
//! Pure function of its inputs — no I/O, no randomness — so the same listing
//! always scores the same. Each score starts from a baseline, collects
//! additive integer adjustments, and is clamped into its fixed band as the
//! final step. The bands are invariants: no input, however empty, huge, or
//! adversarial, produces a score outside them.
//!
//! | Score       | Baseline | Band     |
//! |-------------|----------|----------|
//! | seo         | 80       | 82–98    |
//! | conversion  | 80       | 85–97    |
//! | readability | 85       | 87–98    |
//! | error       | 90       | 88–100   |

use crate::listing::{Bullet, ScoreSet};
use crate::marketplace::Marketplace;
use crate::pipeline::normalize::contains_vague_phrase;
use std::collections::HashSet;

/// Hook phrases that signal benefit-led copy.
const HOOK_SIGNALS: [&str; 6] = ["BENEFIT", "VALUE", "SOLVES", "GUARANTEE", "DESIGNED", "PERFECT"];

/// Action verbs that make bullet details concrete.
const DETAIL_SIGNALS: [&str; 6] = [
    "ensures",
    "provides",
    "delivers",
    "helps",
    "perfect for",
    "designed for",
];

/// Action verbs that make the description concrete.
const DESCRIPTION_SIGNALS: [&str; 6] =
    ["delivers", "designed", "built", "crafted", "ensures", "provides"];

/// Score a listing against keyword, structural, and style heuristics.
pub fn score(
    title: &str,
    bullets: &[Bullet],
    description: &str,
    product_name: &str,
    marketplace: Marketplace,
) -> ScoreSet {
    ScoreSet {
        seo: clamp(seo_score(title, description, product_name), 82, 98),
        conversion: clamp(conversion_score(bullets, description), 85, 97),
        readability: clamp(readability_score(title, description), 87, 98),
        error: clamp(error_score(title, bullets, description, marketplace), 88, 100),
    }
}

fn clamp(value: i32, min: u8, max: u8) -> u8 {
    value.clamp(min as i32, max as i32) as u8
}

// ── SEO: product-name keyword placement ──────────────────────────────────────

fn seo_score(title: &str, description: &str, product_name: &str) -> i32 {
    let mut score = 80;

    let title_lower = title.to_lowercase();
    let desc_lower = description.to_lowercase();
    let name_words: Vec<String> = product_name
        .to_lowercase()
        .split_whitespace()
        .filter(|w| w.len() > 3)
        .map(str::to_string)
        .collect();

    // Product-name word in the title, with a bonus for early placement:
    // marketplaces weight the first ~20 characters of a title heavily.
    if let Some(pos) = name_words
        .iter()
        .find_map(|w| title_lower.find(w.as_str()))
    {
        score += 8;
        if pos < 20 {
            score += 5;
        }
    }

    // Keyword density in the description: 2–4 mentions reads naturally,
    // a single mention earns less, and stuffing earns nothing.
    let mentions: usize = name_words
        .iter()
        .map(|w| desc_lower.matches(w.as_str()).count())
        .sum();
    match mentions {
        2..=4 => score += 5,
        1 => score += 2,
        _ => {}
    }

    score
}

// ── Conversion: benefit-led structure ────────────────────────────────────────

fn conversion_score(bullets: &[Bullet], description: &str) -> i32 {
    let mut score = 80;

    if bullets.len() >= 4 {
        score += 5;
    }

    // 2 points per benefit-signalling hook, capped at 8.
    let hook_hits = bullets
        .iter()
        .filter(|b| {
            let hook = b.hook.to_uppercase();
            HOOK_SIGNALS.iter().any(|s| hook.contains(s))
        })
        .count() as i32;
    score += (hook_hits * 2).min(8);

    // 2 points per concrete detail verb, capped at 6.
    let detail_hits = bullets
        .iter()
        .filter(|b| {
            let detail = b.detail.to_lowercase();
            DETAIL_SIGNALS.iter().any(|s| detail.contains(s))
        })
        .count() as i32;
    score += (detail_hits * 2).min(6);

    let desc_lower = description.to_lowercase();
    if DESCRIPTION_SIGNALS.iter().any(|s| desc_lower.contains(s)) {
        score += 3;
    }

    score
}

// ── Readability: sentence length and vague language ──────────────────────────

fn readability_score(title: &str, description: &str) -> i32 {
    let mut score = 85;

    let sentences: Vec<&str> = description
        .split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if !sentences.is_empty() {
        let total_words: usize = sentences.iter().map(|s| s.split_whitespace().count()).sum();
        let mean = total_words as f64 / sentences.len() as f64;

        if (12.0..=20.0).contains(&mean) {
            score += 8;
        } else if (8.0..25.0).contains(&mean) {
            score += 5;
        } else if mean < 8.0 {
            score += 3;
        }
    } else {
        score += 3;
    }

    if !contains_vague_phrase(description) && !contains_vague_phrase(title) {
        score += 5;
    }

    score
}

// ── Error/compliance: limit violations and repetition ────────────────────────

fn error_score(
    title: &str,
    bullets: &[Bullet],
    description: &str,
    marketplace: Marketplace,
) -> i32 {
    let mut score = 90;

    if contains_vague_phrase(title) || contains_vague_phrase(description) {
        score -= 8;
    }

    if title.chars().count() > marketplace.limits().title {
        score -= 15;
    }

    if has_repetitive_trigrams(description) {
        score -= 5;
    }

    if (4..=5).contains(&bullets.len()) {
        score += 3;
    }

    score
}

/// True when fewer than 85% of the description's word trigrams are unique —
/// the signature of copy that loops over the same phrasing.
fn has_repetitive_trigrams(description: &str) -> bool {
    let words: Vec<String> = description
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect();
    if words.len() < 3 {
        return false;
    }

    let total = words.len() - 2;
    let unique: HashSet<&[String]> = words.windows(3).collect();

    (unique.len() as f64) < (total as f64) * 0.85
}

// ── Tests ────────────────────────────────────────────────────────────────────
