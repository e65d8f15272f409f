use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use finmate_core::catalog::ProductCatalog;
use finmate_core::llm::openai::OpenAiClient;
use finmate_core::policy::juso::JusoClient;
use finmate_core::policy::youth::YouthPolicyClient;
use finmate_core::policy::PolicyService;
use finmate_core::recommend::Recommender;
use finmate_core::retrieval::embeddings::OpenAiEmbeddings;
use finmate_core::retrieval::{TermChatbot, TermIndex};

mod chatbot;
mod policy;
mod portfolio;

/// Everything request handlers need, built once before the listener binds.
/// The policy clients are optional: without their API keys the rest of the
/// server still runs and the policy routes answer 503.
#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<Recommender>,
    pub chatbot: Arc<TermChatbot>,
    pub policy: Option<Arc<PolicyService>>,
    pub openai_configured: bool,
}

pub type ApiError = (StatusCode, Json<serde_json::Value>);

pub fn error_response(status: StatusCode, detail: &str) -> ApiError {
    (status, Json(serde_json::json!({ "detail": detail })))
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

    // The catalog and term index must be in place before any request is
    // served; a missing or broken dataset keeps the process from starting.
    let catalog = ProductCatalog::load(&settings.dataset_path)?;
    tracing::info!(
        products = catalog.product_count(),
        path = %settings.dataset_path.display(),
        "product catalog loaded"
    );

    let index = TermIndex::load(&settings.term_index_path)?;
    tracing::info!(
        documents = index.len(),
        embedding_model = index.embedding_model(),
        "term index loaded"
    );

    let llm: Arc<OpenAiClient> = Arc::new(OpenAiClient::from_settings(&settings)?);
    let embedder = Arc::new(OpenAiEmbeddings::from_settings(&settings)?);

    let recommender = Arc::new(Recommender::new(catalog, llm.clone()));
    let chatbot = Arc::new(TermChatbot::new(Arc::new(index), embedder, llm));

    let policy = match build_policy_service(&settings) {
        Ok(service) => Some(Arc::new(service)),
        Err(e) => {
            tracing::warn!(error = %e, "policy keys missing; youth-policy routes disabled");
            None
        }
    };

    let state = AppState {
        recommender,
        chatbot,
        policy,
        openai_configured: settings.openai_api_key.is_some(),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/recommend", post(portfolio::recommend))
        .route("/risk-levels", get(portfolio::risk_levels))
        .route("/chatbot/health", get(chatbot::health))
        .route("/chatbot/ask", post(chatbot::ask))
        .route("/chatbot/search", post(chatbot::search))
        .route("/chatbot/chat", post(chatbot::chat))
        .route("/youth-policy/policies", get(policy::policies))
        .route("/youth-policy/top10", get(policy::top10))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn build_policy_service(
    settings: &finmate_core::config::Settings,
) -> anyhow::Result<PolicyService> {
    let juso = JusoClient::from_settings(settings)?;
    let youth = YouthPolicyClient::from_settings(settings)?;
    Ok(PolicyService::new(juso, youth))
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "통합 금융 API 서버",
        "services": {
            "포트폴리오추천": "/recommend",
            "경제용어챗봇": "/chatbot",
            "청년정책": "/youth-policy"
        }
    }))
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "openai_configured": state.openai_configured,
        "services": {
            "portfolio": true,
            "chatbot": true,
            "youth_policy": state.policy.is_some()
        }
    }))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
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
