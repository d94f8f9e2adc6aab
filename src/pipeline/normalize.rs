//! Text normalisation: strip vague marketing filler and tidy the artefacts
//! the deletion leaves behind.
//!
//! ## Why normalise?
//!
//! Even when the prompt forbids vague language, models still produce phrases
//! like "high quality" or "amazing" — words that say nothing about the
//! product and that marketplace style guides explicitly discourage. Deleting
//! them (rather than substituting a euphemism) keeps the copy concrete, but
//! leaves double spaces and orphaned punctuation behind, so cleanup passes
//! run after removal.
//!
//! ## Rule Order
//!
//! 1. Remove every blacklisted phrase, case-insensitively
//! 2. Collapse whitespace runs to a single space and trim
//! 3. Collapse adjacent `,` `;` `.` pairs into a single `.`
//!
//! Removal and punctuation collapse both iterate to a fixed point: deleting
//! one occurrence can splice a new occurrence together (`"ama...zing"`
//! inputs), and collapsing one punctuation pair can create another. Running
//! to fixpoint is what makes [`normalize`] idempotent and guarantees the
//! output never contains a blacklisted phrase as a substring.

use once_cell::sync::Lazy;
use regex::Regex;

/// Vague marketing phrases removed from all generated copy.
///
/// Shared with the scoring engine, which penalises any phrase that slips
/// through (e.g. in a title the parser seeded from model output).
pub const VAGUE_PHRASES: [&str; 13] = [
    "high quality",
    "premium feel",
    "best choice",
    "great product",
    "amazing",
    "perfect",
    "innovative",
    "top tier",
    "excellent",
    "superior",
    "outstanding",
    "incredible",
    "fantastic",
];

static RE_VAGUE: Lazy<Regex> = Lazy::new(|| {
    let alternation = VAGUE_PHRASES
        .iter()
        .map(|p| regex::escape(p))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("(?i){alternation}")).unwrap()
});

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static RE_PUNCT_PAIR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,;.]\s*[,;.]").unwrap());

/// Strip blacklisted phrases and collapse the whitespace/punctuation debris.
///
/// Pure; never fails; `normalize("")` is `""`. Idempotent:
/// `normalize(normalize(x)) == normalize(x)` for all `x`.
pub fn normalize(text: &str) -> String {
    let s = remove_vague_phrases(text);
    let s = collapse_whitespace(&s);
    collapse_punctuation(&s)
}

/// True when `text` contains any blacklisted phrase, case-insensitively.
///
/// Used by the scoring engine for the readability bonus and error penalty.
pub fn contains_vague_phrase(text: &str) -> bool {
    RE_VAGUE.is_match(text)
}

// ── Rule 1: Remove blacklisted phrases ───────────────────────────────────────

fn remove_vague_phrases(input: &str) -> String {
    let mut current = input.to_string();
    loop {
        let next = RE_VAGUE.replace_all(&current, "").into_owned();
        if next == current {
            return next;
        }
        current = next;
    }
}

// ── Rule 2: Collapse whitespace ──────────────────────────────────────────────

fn collapse_whitespace(input: &str) -> String {
    RE_WHITESPACE.replace_all(input, " ").trim().to_string()
}

// ── Rule 3: Collapse adjacent punctuation ────────────────────────────────────

fn collapse_punctuation(input: &str) -> String {
    let mut current = input.to_string();
    loop {
        let next = RE_PUNCT_PAIR.replace_all(&current, ".").into_owned();
        if next == current {
            return next;
        }
        current = next;
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
