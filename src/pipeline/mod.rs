//! Pipeline stages for listing generation.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. a different provider backend) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! llm ──▶ parse ──▶ score ──▶ render
//! (chat)  (labels)  (heuristics)  (HTML + metadata)
//!   │
//!   └─ on failure: fallback ──▶ score ──▶ render
//! ```
//!
//! 1. [`llm`]       — drive the chat-completion call; the only stage with
//!    network I/O
//! 2. [`parse`]     — finite-state parse of the labeled completion into
//!    typed fields, with deterministic defaults for everything malformed
//! 3. [`fallback`]  — template-based construction when the provider fails;
//!    the guaranteed-availability floor
//! 4. [`normalize`] — vague-phrase removal and text cleanup, used by both
//!    the parse and fallback paths before scoring
//! 5. [`score`]     — four clamped heuristic quality scores
//! 6. [`render`]    — exact-format HTML output and derived SEO metadata

pub mod fallback;
pub mod llm;
pub mod normalize;
pub mod parse;
pub mod render;
pub mod score;
