//! Deterministic fallback generation: the guaranteed-availability floor.
//!
//! When the external text-generation call fails — network error, missing
//! credentials, non-2xx status, timeout — the pipeline must still return a
//! valid listing. This module builds one from fixed templates and the brief
//! alone. It is pure, infallible, and deterministic: the same brief always
//! produces the same listing, and there is no input for which it fails.
//!
//! The copy is intentionally plain. A templated listing scores lower than a
//! well-written model completion, and that is correct behaviour: quality
//! degrades under provider failure, availability does not.

use crate::listing::{Bullet, ParsedListing};
use crate::marketplace::{Marketplace, PricePoint};
use crate::pipeline::normalize::normalize;
use crate::pipeline::parse::slugify;

/// Fixed hook vocabulary, cycled across the marketplace's bullet count.
const HOOKS: [&str; 5] = [
    "KEY BENEFIT",
    "PRACTICAL VALUE",
    "QUALITY BUILD",
    "PERFECT FOR",
    "GUARANTEE",
];

/// Feature stand-in when the brief has fewer features than bullets.
const FILLER_FEATURE: &str = "Dependable everyday performance";

/// Build a complete listing from the brief alone, without any model call.
///
/// Always produces exactly [`Marketplace::bullet_count`] bullets (5 for
/// Amazon, 4 otherwise) and a title within the marketplace limit.
pub fn generate_fallback(
    product_name: &str,
    features: &[String],
    marketplace: Marketplace,
    price_point: PricePoint,
) -> ParsedListing {
    let limits = marketplace.limits();

    let lead = features
        .first()
        .map(String::as_str)
        .unwrap_or("Quality Product");
    let title = normalize(&format!("{product_name} - {lead}"));
    let title: String = title.chars().take(limits.title).collect();

    let bullets: Vec<Bullet> = HOOKS
        .iter()
        .cycle()
        .take(marketplace.bullet_count())
        .enumerate()
        .map(|(i, hook)| {
            let feature = features
                .get(i)
                .map(String::as_str)
                .unwrap_or(FILLER_FEATURE);
            Bullet::new(
                *hook,
                format!("{feature} provides reliable performance and value"),
            )
        })
        .collect();

    let description = normalize(&build_description(product_name, features, price_point));

    ParsedListing {
        url_slug: slugify(&title),
        keywords: build_keywords(product_name, features),
        title,
        bullets,
        description,
    }
}

/// Synthesise a description from the first two features, closing with a
/// tone line matched to the price positioning.
fn build_description(product_name: &str, features: &[String], price_point: PricePoint) -> String {
    let mut sentences = Vec::with_capacity(3);

    match (features.first(), features.get(1)) {
        (Some(first), Some(second)) => sentences.push(format!(
            "{product_name} combines {first} with {second}."
        )),
        (Some(first), None) => sentences.push(format!(
            "{product_name} is built around {first}."
        )),
        (None, _) => sentences.push(format!(
            "{product_name} is built for dependable daily use."
        )),
    }

    sentences.push("Designed to deliver consistent results order after order.".to_string());

    sentences.push(
        match price_point {
            PricePoint::Budget => "Priced to make the decision easy.",
            PricePoint::Mid => "A balanced pick for everyday buyers.",
            PricePoint::Premium => "Crafted for buyers who expect more from the details.",
        }
        .to_string(),
    );

    sentences.join(" ")
}

fn build_keywords(product_name: &str, features: &[String]) -> String {
    let mut keywords = vec![product_name.to_lowercase()];
    keywords.extend(features.iter().take(2).map(|f| f.to_lowercase()));
    keywords.join(", ")
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn features(items: &[&str]) -> Vec<String> {
        items.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn bullet_count_matches_marketplace() {
        let f = features(&["RFID blocking", "Leather"]);
        for m in Marketplace::ALL {
            let listing = generate_fallback("Slim Wallet", &f, m, PricePoint::Mid);
            assert_eq!(listing.bullets.len(), m.bullet_count(), "{m}");
        }
    }

    #[test]
    fn title_uses_first_feature() {
        let listing = generate_fallback(
            "Slim Wallet",
            &features(&["RFID blocking", "Leather"]),
            Marketplace::Amazon,
            PricePoint::Mid,
        );
        assert_eq!(listing.title, "Slim Wallet - RFID blocking");
    }

    #[test]
    fn title_without_features_uses_stock_suffix() {
        let listing =
            generate_fallback("Slim Wallet", &[], Marketplace::Amazon, PricePoint::Mid);
        assert_eq!(listing.title, "Slim Wallet - Quality Product");
    }

    #[test]
    fn title_fits_marketplace_limit() {
        let long_feature = features(&["a feature description that runs on far longer than any \
                                       marketplace could reasonably be expected to allow in a title"]);
        for m in Marketplace::ALL {
            let listing = generate_fallback("Widget Pro X", &long_feature, m, PricePoint::Mid);
            assert!(listing.title.chars().count() <= m.limits().title, "{m}");
        }
    }

    #[test]
    fn hooks_cycle_in_fixed_order() {
        let f = features(&["a", "b", "c", "d", "e"]);
        let listing = generate_fallback("Widget", &f, Marketplace::Amazon, PricePoint::Mid);
        let hooks: Vec<&str> = listing.bullets.iter().map(|b| b.hook.as_str()).collect();
        assert_eq!(
            hooks,
            ["KEY BENEFIT", "PRACTICAL VALUE", "QUALITY BUILD", "PERFECT FOR", "GUARANTEE"]
        );
    }

    #[test]
    fn details_pair_features_then_filler() {
        let listing = generate_fallback(
            "Widget",
            &features(&["RFID blocking"]),
            Marketplace::Shopify,
            PricePoint::Mid,
        );
        assert_eq!(
            listing.bullets[0].detail,
            "RFID blocking provides reliable performance and value"
        );
        assert_eq!(
            listing.bullets[3].detail,
            format!("{FILLER_FEATURE} provides reliable performance and value")
        );
    }

    #[test]
    fn description_references_first_two_features() {
        let listing = generate_fallback(
            "Slim Wallet",
            &features(&["RFID blocking", "Full-grain leather"]),
            Marketplace::Amazon,
            PricePoint::Premium,
        );
        assert!(listing.description.contains("RFID blocking"));
        assert!(listing.description.contains("Full-grain leather"));
        assert!(listing.description.chars().count() >= 20);
    }

    #[test]
    fn price_point_changes_closing_line() {
        let f = features(&["RFID blocking"]);
        let budget = generate_fallback("W", &f, Marketplace::Ebay, PricePoint::Budget);
        let premium = generate_fallback("W", &f, Marketplace::Ebay, PricePoint::Premium);
        assert_ne!(budget.description, premium.description);
    }

    #[test]
    fn deterministic() {
        let f = features(&["RFID blocking", "Leather"]);
        let a = generate_fallback("Slim Wallet", &f, Marketplace::Amazon, PricePoint::Mid);
        let b = generate_fallback("Slim Wallet", &f, Marketplace::Amazon, PricePoint::Mid);
        assert_eq!(a, b);
    }

    #[test]
    fn slug_and_keywords_always_present() {
        let listing = generate_fallback("Widget Pro X", &[], Marketplace::Ebay, PricePoint::Budget);
        assert_eq!(listing.url_slug, "widget-pro-x-quality-product");
        assert_eq!(listing.keywords, "widget pro x");
    }
}
