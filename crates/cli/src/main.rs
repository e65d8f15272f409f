use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use finmate_core::catalog::ProductCatalog;
use finmate_core::domain::risk::RiskLevel;
use finmate_core::llm::openai::OpenAiClient;
use finmate_core::llm::{ChatRequest, LlmClient, Provider};
use finmate_core::recommend::Recommender;

#[derive(Debug, Parser)]
#[command(name = "finmate_cli")]
struct Args {
    /// Risk level (안정형 … 공격투자형, or STABLE … AGGRESSIVE_INVESTMENT).
    #[arg(long)]
    risk_level: String,

    /// Target investment amount in KRW.
    #[arg(long)]
    amount: i64,

    /// Investment period in months.
    #[arg(long)]
    period: u32,

    /// Skip the model call and use the static fallback allocation.
    #[arg(long)]
    offline: bool,

    /// Override the dataset path from settings.
    #[arg(long)]
    dataset: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = finmate_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let risk_level = parse_risk_level(&args.risk_level)?;
    anyhow::ensure!(args.amount > 0, "amount must be positive");
    anyhow::ensure!(args.period > 0, "period must be positive");

    let dataset_path = args.dataset.unwrap_or(settings.dataset_path.clone());
    let catalog = ProductCatalog::load(&dataset_path)?;
    tracing::info!(
        products = catalog.product_count(),
        path = %dataset_path.display(),
        "product catalog loaded"
    );

    let llm: Arc<dyn LlmClient> = if args.offline {
        Arc::new(OfflineLlm)
    } else {
        Arc::new(OpenAiClient::from_settings(&settings)?)
    };

    let recommender = Recommender::new(catalog, llm);
    let result = recommender
        .recommend(risk_level, args.amount, args.period)
        .await;

    tracing::info!(
        risk_level = risk_level.label(),
        expected_total = result.expected_total,
        "recommendation complete"
    );

    let out = serde_json::to_string_pretty(&result).context("failed to render result JSON")?;
    println!("{out}");

    Ok(())
}

fn parse_risk_level(raw: &str) -> anyhow::Result<RiskLevel> {
    serde_json::from_value(serde_json::Value::String(raw.trim().to_string()))
        .with_context(|| format!("unknown risk level: {raw}"))
}

/// Stand-in client for `--offline`: forces the deterministic fallback path
/// without a network round trip.
struct OfflineLlm;

#[async_trait::async_trait]
impl LlmClient for OfflineLlm {
    fn provider(&self) -> Provider {
        Provider::OpenAi
    }

    async fn complete(&self, _req: ChatRequest) -> anyhow::Result<String> {
        anyhow::bail!("offline mode: model call skipped")
    }
}

fn init_sentry(settings: &finmate_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
