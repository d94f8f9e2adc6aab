//! End-to-end pipeline tests for listsmith.
//!
//! Every test runs against scripted providers and the in-memory store — no
//! network, no API keys — so the whole orchestrator path (identity, quota,
//! provider, parse/fallback, scoring, rendering, persistence) is exercised
//! deterministically.

use async_trait::async_trait;
use listsmith::{
    generate, generate_batch, GenerationConfig, GenerationError, ListingError, ListingRequest,
    ListingStore, Marketplace, MemoryStore, PricePoint, StoreError, StoredListing, TextGenerator,
    UserRecord,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio_test::assert_ok;
use std::sync::Arc;
use std::time::Duration;

/// Route pipeline tracing through the test writer; `RUST_LOG=debug cargo
/// test` shows per-stage logs for a failing case.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ── Test doubles ─────────────────────────────────────────────────────────────

/// Provider that returns a fixed completion and counts its calls.
struct ScriptedProvider {
    completion: String,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    fn new(completion: &str) -> Arc<Self> {
        Arc::new(Self {
            completion: completion.to_string(),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for ScriptedProvider {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.completion.clone())
    }
}

/// Provider that always fails with a network error.
struct FailingProvider {
    calls: AtomicUsize,
}

impl FailingProvider {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for FailingProvider {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(GenerationError::Network("connection reset by peer".into()))
    }
}

/// Provider that stalls longer than any test timeout.
struct StalledProvider;

#[async_trait]
impl TextGenerator for StalledProvider {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String, GenerationError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(String::new())
    }
}

/// Store whose writes fail while reads keep working.
struct BrokenWriteStore {
    inner: MemoryStore,
}

#[async_trait]
impl ListingStore for BrokenWriteStore {
    async fn get_user(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        self.inner.get_user(email).await
    }

    async fn save_listing(&self, _record: StoredListing) -> Result<(), StoreError> {
        Err(StoreError("disk full".into()))
    }

    async fn increment_usage(&self, user_id: i64) -> Result<u32, StoreError> {
        self.inner.increment_usage(user_id).await
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

const EMAIL: &str = "seller@example.test";

const WELL_FORMED_COMPLETION: &str = "\
TITLE: Slim Wallet - RFID Blocking Leather

BULLETS:
1. RFID PROTECTION: Blocks unwanted scans of your cards
2. GENUINE LEATHER: Full-grain hide that ages with character
3. SLIM PROFILE: Holds 8 cards without the pocket bulge
4. EASY ACCESS: Thumb slot slides your daily card out in one motion

DESCRIPTION:
This slim wallet keeps your cards safe from skimming while staying thin
enough for a front pocket. The leather exterior wears in, not out.

KEYWORDS: slim wallet, rfid wallet, leather card holder

URL_SLUG: slim-wallet-rfid-blocking-leather
";

fn store_with_free_user() -> MemoryStore {
    MemoryStore::with_user(UserRecord::free_tier(1, EMAIL))
}

fn wallet_request(marketplace: Marketplace) -> ListingRequest {
    ListingRequest {
        product_name: "Slim Wallet".into(),
        features: vec!["RFID blocking".into(), "Leather".into()],
        price_point: PricePoint::Mid,
        marketplace,
        improvement_focus: None,
    }
}

fn config_with(provider: Arc<dyn TextGenerator>) -> GenerationConfig {
    GenerationConfig::builder()
        .provider(provider)
        .api_timeout_secs(1)
        .build()
        .expect("valid test config")
}

// ── Success path ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn well_formed_completion_parses_without_defaults() {
    init_tracing();
    let provider = ScriptedProvider::new(WELL_FORMED_COMPLETION);
    let store = store_with_free_user();
    let request = wallet_request(Marketplace::Amazon);

    let output = tokio_test::assert_ok!(
        generate(Some(EMAIL), &request, &store, &config_with(provider.clone())).await
    );

    // The 35-char title is under Amazon's 200-char limit: returned unmodified.
    assert_eq!(output.listing.title, "Slim Wallet - RFID Blocking Leather");
    assert_eq!(output.listing.bullets.len(), 4);
    assert!(output.listing.description.starts_with("This slim wallet"));
    assert_eq!(output.listing.url_slug, "slim-wallet-rfid-blocking-leather");
    assert!(!output.stats.used_fallback);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn success_persists_and_charges_once() {
    let provider = ScriptedProvider::new(WELL_FORMED_COMPLETION);
    let store = store_with_free_user();
    let request = wallet_request(Marketplace::Amazon);

    let output = generate(Some(EMAIL), &request, &store, &config_with(provider))
        .await
        .unwrap();

    assert_eq!(output.usage.listings_used, 1);
    assert_eq!(output.usage.listings_limit, 5);
    assert_eq!(output.usage.tier, "free");
    assert_eq!(store.user(1).unwrap().listings_used, 1);

    let saved = store.listings();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].user_id, 1);
    assert_eq!(saved[0].marketplace, "amazon");
    assert_eq!(saved[0].listing.title, output.listing.title);
}

#[tokio::test]
async fn html_output_has_exact_structure() {
    let provider = ScriptedProvider::new(WELL_FORMED_COMPLETION);
    let store = store_with_free_user();
    let request = wallet_request(Marketplace::Amazon);

    let output = generate(Some(EMAIL), &request, &store, &config_with(provider))
        .await
        .unwrap();

    let html = &output.listing.html_output;
    assert!(html.starts_with("<h1>Slim Wallet - RFID Blocking Leather</h1>\n\n<ul>\n"));
    assert!(html.contains("  <li><strong>RFID PROTECTION:</strong> Blocks unwanted scans of your cards</li>\n"));
    assert!(html.ends_with(&format!("</ul>\n\n<p>{}</p>", output.listing.description)));
}

#[tokio::test]
async fn garbage_completion_still_yields_valid_listing() {
    let provider = ScriptedProvider::new("complete nonsense\nwith no labels anywhere");
    let store = store_with_free_user();
    let request = wallet_request(Marketplace::Shopify);

    let output = generate(Some(EMAIL), &request, &store, &config_with(provider))
        .await
        .unwrap();

    // Parser recovered via defaults; this is not the fallback path.
    assert!(!output.stats.used_fallback);
    assert_eq!(output.listing.title, "Slim Wallet - Premium Quality");
    assert!(!output.listing.bullets.is_empty());
    assert!(output.listing.description.chars().count() >= 20);
}

#[tokio::test]
async fn title_limit_holds_for_every_marketplace() {
    let oversized = format!("TITLE: {}\n", "Grand Deluxe Product Name ".repeat(20));
    for marketplace in Marketplace::ALL {
        let provider = ScriptedProvider::new(&oversized);
        let store = store_with_free_user();
        let request = wallet_request(marketplace);

        let output = generate(Some(EMAIL), &request, &store, &config_with(provider))
            .await
            .unwrap();

        assert!(
            output.listing.title.chars().count() <= marketplace.limits().title,
            "{marketplace}: {} chars",
            output.listing.title.chars().count()
        );
    }
}

#[tokio::test]
async fn scores_stay_in_bands_for_adversarial_completions() {
    let spam = format!("DESCRIPTION: {}", "buy now ".repeat(5_000));
    let adversarial: [&str; 5] = [
        "",
        "TITLE: x",
        &spam,
        "TITLE: Amazing perfect incredible fantastic superior product of high quality",
        "\u{0}\u{1}\u{2}TITLE:\u{3}",
    ];
    for completion in adversarial {
        let provider = ScriptedProvider::new(completion);
        let store = store_with_free_user();
        let request = wallet_request(Marketplace::Ebay);

        let output = generate(Some(EMAIL), &request, &store, &config_with(provider))
            .await
            .unwrap();

        let s = output.listing.scores;
        assert!((82..=98).contains(&s.seo), "seo {} for {completion:?}", s.seo);
        assert!((85..=97).contains(&s.conversion), "conversion {}", s.conversion);
        assert!((87..=98).contains(&s.readability), "readability {}", s.readability);
        assert!((88..=100).contains(&s.error), "error {}", s.error);
    }
}

#[tokio::test]
async fn meta_description_respects_length_cap() {
    let long_desc = format!(
        "TITLE: Slim Wallet Deluxe Carry Edition\nDESCRIPTION: {}",
        "A very detailed sentence about the wallet and its many practical qualities. ".repeat(10)
    );
    let provider = ScriptedProvider::new(&long_desc);
    let store = store_with_free_user();
    let request = wallet_request(Marketplace::Amazon);

    let output = generate(Some(EMAIL), &request, &store, &config_with(provider))
        .await
        .unwrap();

    let meta = &output.listing.meta_data;
    assert!(meta.meta_description.chars().count() <= 155);
    assert!(meta.meta_description.ends_with("..."));
    assert_eq!(meta.url_slug, output.listing.url_slug);
}

// ── Fallback path ────────────────────────────────────────────────────────────

#[tokio::test]
async fn network_failure_falls_back_and_still_charges() {
    init_tracing();
    let provider = FailingProvider::new();
    let store = store_with_free_user();
    let request = wallet_request(Marketplace::Amazon);

    let output = generate(Some(EMAIL), &request, &store, &config_with(provider.clone()))
        .await
        .expect("fallback must not surface provider errors");

    assert!(output.stats.used_fallback);
    assert_eq!(provider.calls(), 1, "no retry loop against the provider");
    assert_eq!(output.listing.bullets.len(), 5, "amazon fallback has 5 bullets");
    assert_eq!(output.listing.title, "Slim Wallet - RFID blocking");

    // Fallback results are persisted and charged exactly once.
    assert_eq!(store.user(1).unwrap().listings_used, 1);
    assert_eq!(store.listings().len(), 1);
}

#[tokio::test]
async fn fallback_bullet_counts_per_marketplace() {
    for marketplace in Marketplace::ALL {
        let store = store_with_free_user();
        let request = wallet_request(marketplace);

        let output = generate(Some(EMAIL), &request, &store, &config_with(FailingProvider::new()))
            .await
            .unwrap();

        assert_eq!(
            output.listing.bullets.len(),
            marketplace.bullet_count(),
            "{marketplace}"
        );
    }
}

#[tokio::test]
async fn stalled_provider_times_out_into_fallback() {
    let store = store_with_free_user();
    let request = wallet_request(Marketplace::Ebay);
    let config = GenerationConfig::builder()
        .provider(Arc::new(StalledProvider))
        .api_timeout_secs(1)
        .build()
        .unwrap();

    let output = generate(Some(EMAIL), &request, &store, &config)
        .await
        .expect("timeout must fall back, not fail");

    assert!(output.stats.used_fallback);
    assert_eq!(output.listing.bullets.len(), 4);
}

// ── Rejection paths ──────────────────────────────────────────────────────────

#[tokio::test]
async fn missing_identity_is_unauthorized() {
    let store = store_with_free_user();
    let request = wallet_request(Marketplace::Amazon);

    let err = generate(None, &request, &store, &config_with(FailingProvider::new()))
        .await
        .unwrap_err();
    assert!(matches!(err, ListingError::Unauthorized));
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let store = store_with_free_user();
    let request = wallet_request(Marketplace::Amazon);

    let err = generate(
        Some("stranger@example.test"),
        &request,
        &store,
        &config_with(FailingProvider::new()),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ListingError::NotFound { .. }));
}

#[tokio::test]
async fn empty_product_name_rejected_before_provider_call() {
    let provider = ScriptedProvider::new(WELL_FORMED_COMPLETION);
    let store = store_with_free_user();
    let mut request = wallet_request(Marketplace::Amazon);
    request.product_name = "   ".into();

    let err = generate(Some(EMAIL), &request, &store, &config_with(provider.clone()))
        .await
        .unwrap_err();

    assert!(matches!(err, ListingError::InvalidInput { .. }));
    assert_eq!(provider.calls(), 0, "no provider call for invalid input");
    assert_eq!(store.user(1).unwrap().listings_used, 0, "never charged");
}

#[tokio::test]
async fn quota_exhausted_rejected_before_provider_call() {
    let provider = ScriptedProvider::new(WELL_FORMED_COMPLETION);
    let mut user = UserRecord::free_tier(1, EMAIL);
    user.listings_used = 5;
    let store = MemoryStore::with_user(user);
    let request = wallet_request(Marketplace::Amazon);

    let err = generate(Some(EMAIL), &request, &store, &config_with(provider.clone()))
        .await
        .unwrap_err();

    match &err {
        ListingError::QuotaExceeded { used, limit } => {
            assert_eq!((*used, *limit), (5, 5));
        }
        other => panic!("expected QuotaExceeded, got {other:?}"),
    }
    assert!(err.to_string().contains('5'), "message carries the limit");
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn persistence_failure_keeps_the_listing() {
    let store = BrokenWriteStore {
        inner: store_with_free_user(),
    };
    let request = wallet_request(Marketplace::Amazon);
    let provider = ScriptedProvider::new(WELL_FORMED_COMPLETION);

    let err = generate(Some(EMAIL), &request, &store, &config_with(provider))
        .await
        .unwrap_err();

    match err {
        ListingError::Persistence { detail, listing } => {
            assert!(detail.contains("disk full"));
            assert_eq!(listing.title, "Slim Wallet - RFID Blocking Leather");
        }
        other => panic!("expected Persistence, got {other:?}"),
    }
}

// ── Batch path ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn batch_continues_past_quota_and_charges_only_successes() {
    let mut user = UserRecord::free_tier(1, EMAIL);
    user.listings_limit = 2;
    let store = MemoryStore::with_user(user);
    let requests = vec![
        wallet_request(Marketplace::Amazon),
        wallet_request(Marketplace::Shopify),
        wallet_request(Marketplace::Ebay),
    ];

    let results = generate_batch(
        Some(EMAIL),
        &requests,
        &store,
        &config_with(ScriptedProvider::new(WELL_FORMED_COMPLETION)),
    )
    .await;

    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].is_ok());
    assert!(matches!(
        results[2].as_ref().unwrap_err(),
        ListingError::QuotaExceeded { limit: 2, .. }
    ));
    assert_eq!(store.user(1).unwrap().listings_used, 2);
    assert_eq!(store.listings().len(), 2);
}
