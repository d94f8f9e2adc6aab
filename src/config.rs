//! Configuration for listing generation.
//!
//! All generation behaviour is controlled through [`GenerationConfig`], built
//! via its [`GenerationConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share configs across tasks, serialise them for logging, and
//! diff two runs to understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! Callers set only what they care about and rely on documented defaults for
//! the rest; new fields don't break existing call sites.

use crate::error::ListingError;
use crate::pipeline::llm::TextGenerator;
use std::fmt;
use std::sync::Arc;

/// Configuration for one or more generation runs.
///
/// Built via [`GenerationConfig::builder()`] or
/// [`GenerationConfig::default()`].
///
/// # Example
/// ```rust
/// use listsmith::GenerationConfig;
///
/// let config = GenerationConfig::builder()
///     .model("gpt-4o-mini")
///     .api_timeout_secs(25)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct GenerationConfig {
    /// Pre-constructed provider. Takes precedence over environment-based
    /// client construction; how tests inject scripted providers.
    pub provider: Option<Arc<dyn TextGenerator>>,

    /// Completion model identifier. If `None`, `LISTSMITH_MODEL` or the
    /// built-in default applies.
    pub model: Option<String>,

    /// Endpoint root for OpenAI-compatible providers. If `None`,
    /// `LISTSMITH_BASE_URL` or the OpenAI default applies.
    pub base_url: Option<String>,

    /// Sampling temperature. Default: 0.7.
    ///
    /// Listing copy benefits from some variety between runs, unlike
    /// transcription tasks that want near-zero temperature. Higher values
    /// drift off-format and make the parser fall back to defaults more.
    pub temperature: f32,

    /// Maximum completion tokens. Default: 1024.
    ///
    /// A full five-bullet listing with description and keywords fits in
    /// ~600 tokens; 1024 leaves headroom without letting a rambling model
    /// run up the bill.
    pub max_tokens: usize,

    /// Per-call provider timeout in seconds. Default: 20.
    ///
    /// The provider call is the only network operation on the request path.
    /// Expiry is treated exactly like any other provider failure: the
    /// request falls through to the deterministic fallback generator rather
    /// than erroring, so a generous timeout only delays the guaranteed
    /// answer.
    pub api_timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: None,
            model: None,
            base_url: None,
            temperature: 0.7,
            max_tokens: 1024,
            api_timeout_secs: 20,
        }
    }
}

impl fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("provider", &self.provider.as_ref().map(|_| "<dyn TextGenerator>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .finish()
    }
}

impl GenerationConfig {
    /// Create a new builder for `GenerationConfig`.
    pub fn builder() -> GenerationConfigBuilder {
        GenerationConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`GenerationConfig`].
#[derive(Debug)]
pub struct GenerationConfigBuilder {
    config: GenerationConfig,
}

impl GenerationConfigBuilder {
    pub fn provider(mut self, provider: Arc<dyn TextGenerator>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<GenerationConfig, ListingError> {
        let c = &self.config;
        if c.api_timeout_secs == 0 {
            return Err(ListingError::InvalidConfig(
                "api_timeout_secs must be ≥ 1".into(),
            ));
        }
        if c.max_tokens == 0 {
            return Err(ListingError::InvalidConfig("max_tokens must be ≥ 1".into()));
        }
        Ok(self.config)
    }
}
