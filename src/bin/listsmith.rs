//! CLI binary for listsmith.
//!
//! A thin shim over the library crate that maps CLI flags to a
//! [`ListingRequest`] and prints the composed listing.

use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;
use listsmith::{
    generate, GenerationConfig, GenerationError, ListingRequest, Marketplace, MemoryStore,
    PricePoint, TextGenerator, UserRecord,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic generation (requires OPENAI_API_KEY)
  listsmith "Slim Wallet" -f "RFID blocking" -f "Full-grain leather"

  # Shopify listing, premium positioning
  listsmith "Slim Wallet" -f "RFID blocking" -m shopify -p premium

  # Regenerate with an extra directive
  listsmith "Slim Wallet" -f "RFID blocking" --focus "emphasise the warranty"

  # Deterministic template output, no API key needed
  listsmith "Slim Wallet" -f "RFID blocking" --offline

  # Full result as JSON (scores, metadata, usage)
  listsmith "Slim Wallet" -f "RFID blocking" --json

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY      API key for the completion provider
  LISTSMITH_MODEL     Override the completion model
  LISTSMITH_BASE_URL  OpenAI-compatible endpoint root
"#;

/// Generate a marketplace product listing from a short brief.
#[derive(Parser, Debug)]
#[command(
    name = "listsmith",
    version,
    about = "Generate marketplace product listings with LLM copywriting and quality scoring",
    after_help = AFTER_HELP
)]
struct Cli {
    /// Product name.
    product_name: String,

    /// Feature line (repeat for multiple features; first 6 are used).
    #[arg(short = 'f', long = "feature", required = true)]
    features: Vec<String>,

    /// Target marketplace: amazon, shopify, or ebay.
    #[arg(short, long, default_value = "amazon")]
    marketplace: Marketplace,

    /// Price positioning: budget, mid, or premium.
    #[arg(short, long, default_value = "mid")]
    price: PricePoint,

    /// Extra directive appended to the generation instructions.
    #[arg(long)]
    focus: Option<String>,

    /// Completion model override.
    #[arg(long, env = "LISTSMITH_MODEL")]
    model: Option<String>,

    /// OpenAI-compatible endpoint root.
    #[arg(long, env = "LISTSMITH_BASE_URL")]
    base_url: Option<String>,

    /// Provider call timeout in seconds.
    #[arg(long, default_value_t = 20)]
    timeout: u64,

    /// Skip the provider entirely and use the deterministic fallback.
    #[arg(long)]
    offline: bool,

    /// Print the full result as JSON instead of formatted output.
    #[arg(long)]
    json: bool,
}

/// Provider stand-in for `--offline`: always fails, which routes every
/// request down the fallback path.
struct OfflineProvider;

#[async_trait]
impl TextGenerator for OfflineProvider {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String, GenerationError> {
        Err(GenerationError::Network("offline mode requested".into()))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut builder = GenerationConfig::builder().api_timeout_secs(cli.timeout);
    if let Some(model) = cli.model.clone() {
        builder = builder.model(model);
    }
    if let Some(base_url) = cli.base_url.clone() {
        builder = builder.base_url(base_url);
    }
    if cli.offline {
        builder = builder.provider(Arc::new(OfflineProvider));
    }
    let config = builder.build()?;

    // The CLI runs against a throwaway in-memory store with a generous
    // local quota; real deployments put their own ListingStore behind this.
    let mut user = UserRecord::free_tier(1, "cli@localhost");
    user.tier = "local".into();
    user.listings_limit = u32::MAX;
    let store = MemoryStore::with_user(user);

    let request = ListingRequest {
        product_name: cli.product_name.clone(),
        features: cli.features.clone(),
        price_point: cli.price,
        marketplace: cli.marketplace,
        improvement_focus: cli.focus.clone().filter(|f| !f.trim().is_empty()),
    };

    let output = generate(Some("cli@localhost"), &request, &store, &config).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let listing = &output.listing;
    let scores = &listing.scores;

    eprintln!(
        "{} {}  {}",
        green("✔"),
        bold(&listing.title),
        if output.stats.used_fallback {
            dim("(template fallback)")
        } else {
            dim(&format!("({}ms)", output.stats.llm_duration_ms))
        }
    );
    eprintln!(
        "  seo {}  conversion {}  readability {}  error {}",
        bold(&scores.seo.to_string()),
        bold(&scores.conversion.to_string()),
        bold(&scores.readability.to_string()),
        bold(&scores.error.to_string()),
    );
    eprintln!("  {} {}", dim("slug"), listing.url_slug);
    eprintln!("  {} {}", dim("keywords"), listing.keywords);
    eprintln!();

    println!("{}", listing.html_output);
    Ok(())
}
