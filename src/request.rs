//! The input brief for one listing generation.

use crate::error::ListingError;
use crate::marketplace::{Marketplace, PricePoint};
use serde::{Deserialize, Serialize};

/// Maximum number of feature lines carried into generation.
///
/// Briefs pasted from spreadsheets often contain dozens of lines; only the
/// first few earn a place in the prompt and the fallback templates.
pub const MAX_FEATURES: usize = 6;

/// A structured brief describing the product to write a listing for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingRequest {
    /// Product name. Must be non-empty after trimming.
    pub product_name: String,
    /// Free-text feature lines, in priority order. Must contain at least one
    /// non-blank line. Truncated to [`MAX_FEATURES`] before generation.
    pub features: Vec<String>,
    /// Price positioning, steering copy tone.
    pub price_point: PricePoint,
    /// Target marketplace, fixing title limits and bullet count.
    pub marketplace: Marketplace,
    /// Optional extra directive appended to the generation instructions,
    /// e.g. "emphasise the warranty" when regenerating a listing.
    pub improvement_focus: Option<String>,
}

impl ListingRequest {
    /// Build a request from a newline-delimited feature block, the shape the
    /// original web form submits.
    pub fn from_feature_block(
        product_name: impl Into<String>,
        features: &str,
        price_point: PricePoint,
        marketplace: Marketplace,
    ) -> Self {
        Self {
            product_name: product_name.into(),
            features: features.lines().map(str::to_string).collect(),
            price_point,
            marketplace,
            improvement_focus: None,
        }
    }

    /// The first [`MAX_FEATURES`] non-blank feature lines, trimmed.
    pub fn effective_features(&self) -> Vec<String> {
        self.features
            .iter()
            .map(|f| f.trim())
            .filter(|f| !f.is_empty())
            .take(MAX_FEATURES)
            .map(str::to_string)
            .collect()
    }

    /// Reject briefs that cannot produce a listing.
    ///
    /// Runs before any provider call or quota charge: a rejected brief costs
    /// the user nothing.
    pub fn validate(&self) -> Result<(), ListingError> {
        if self.product_name.trim().is_empty() {
            return Err(ListingError::InvalidInput {
                field: "product_name",
                reason: "must not be empty".into(),
            });
        }
        if self.effective_features().is_empty() {
            return Err(ListingError::InvalidInput {
                field: "features",
                reason: "must contain at least one non-blank line".into(),
            });
        }
        Ok(())
    }
}
