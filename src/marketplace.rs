//! Marketplace constants: per-platform field limits and bullet counts.
//!
//! Every marketplace enforces hard character limits on listing fields —
//! exceed the title limit on Amazon and the listing is rejected at upload
//! time, not flagged for review. The limits here are therefore invariants
//! of the pipeline, not tuning knobs: the parser and fallback generator
//! truncate against them, and the scoring engine penalises any title that
//! slips past them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target marketplace for a generated listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Marketplace {
    Amazon,
    Shopify,
    Ebay,
}

/// Hard character limits for the listing fields of one marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketplaceLimits {
    /// Maximum title length in characters.
    pub title: usize,
    /// Maximum length of a single bullet point.
    pub bullet: usize,
    /// Maximum description length.
    pub description: usize,
}

impl Marketplace {
    /// Static per-marketplace field limits.
    pub const fn limits(self) -> MarketplaceLimits {
        match self {
            Marketplace::Amazon => MarketplaceLimits {
                title: 200,
                bullet: 500,
                description: 2000,
            },
            Marketplace::Shopify => MarketplaceLimits {
                title: 70,
                bullet: 500,
                description: 5000,
            },
            Marketplace::Ebay => MarketplaceLimits {
                title: 80,
                bullet: 500,
                description: 5000,
            },
        }
    }

    /// Expected bullet count: Amazon listings carry 5 bullets, others 4.
    ///
    /// The parser tolerates any count; this is what the fallback generator
    /// always produces and what the prompt asks the model for.
    pub const fn bullet_count(self) -> usize {
        match self {
            Marketplace::Amazon => 5,
            Marketplace::Shopify | Marketplace::Ebay => 4,
        }
    }

    /// All supported marketplaces, in display order.
    pub const ALL: [Marketplace; 3] =
        [Marketplace::Amazon, Marketplace::Shopify, Marketplace::Ebay];
}

impl fmt::Display for Marketplace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Marketplace::Amazon => "amazon",
            Marketplace::Shopify => "shopify",
            Marketplace::Ebay => "ebay",
        };
        f.write_str(s)
    }
}

impl FromStr for Marketplace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "amazon" => Ok(Marketplace::Amazon),
            "shopify" => Ok(Marketplace::Shopify),
            "ebay" => Ok(Marketplace::Ebay),
            other => Err(format!(
                "unknown marketplace '{other}' (expected amazon, shopify, or ebay)"
            )),
        }
    }
}

/// Price positioning of the product, used to steer copy tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricePoint {
    Budget,
    #[default]
    Mid,
    Premium,
}

impl fmt::Display for PricePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PricePoint::Budget => "budget",
            PricePoint::Mid => "mid",
            PricePoint::Premium => "premium",
        };
        f.write_str(s)
    }
}

impl FromStr for PricePoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "budget" => Ok(PricePoint::Budget),
            "mid" => Ok(PricePoint::Mid),
            "premium" => Ok(PricePoint::Premium),
            other => Err(format!(
                "unknown price point '{other}' (expected budget, mid, or premium)"
            )),
        }
    }
}
