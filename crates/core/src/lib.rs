pub mod catalog;
pub mod domain;
pub mod llm;
pub mod policy;
pub mod recommend;
pub mod retrieval;
pub mod time;

pub mod config {
    use anyhow::Context;
    use std::path::PathBuf;

    const DEFAULT_DATASET_PATH: &str = "resource/financial_portfolio_dataset.json";
    const DEFAULT_TERM_INDEX_PATH: &str = "resource/economic_terms_index.json";

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub openai_api_key: Option<String>,
        pub dataset_path: PathBuf,
        pub term_index_path: PathBuf,
        pub youth_api_key: Option<String>,
        pub juso_api_key: Option<String>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                openai_api_key: std::env::var("OPENAI_API_KEY").ok(),
                dataset_path: std::env::var("DATASET_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATASET_PATH)),
                term_index_path: std::env::var("TERM_INDEX_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(DEFAULT_TERM_INDEX_PATH)),
                youth_api_key: std::env::var("YOUTH_API_KEY").ok(),
                juso_api_key: std::env::var("JUSO_API_KEY").ok(),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }

        pub fn require_openai_api_key(&self) -> anyhow::Result<&str> {
            self.openai_api_key
                .as_deref()
                .context("OPENAI_API_KEY is required")
        }

        pub fn require_youth_api_key(&self) -> anyhow::Result<&str> {
            self.youth_api_key
                .as_deref()
                .context("YOUTH_API_KEY is required")
        }

        pub fn require_juso_api_key(&self) -> anyhow::Result<&str> {
            self.juso_api_key
                .as_deref()
                .context("JUSO_API_KEY is required")
        }
    }
}
