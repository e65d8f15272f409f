pub mod error;
pub mod json;
pub mod openai;

#[derive(Debug, Clone, Copy)]
pub enum Provider {
    OpenAi,
}

/// One system+user completion round. The pipeline sends exactly one of these
/// per request; there is no retry or repair loop on this path.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub system: String,
    pub user: String,
    pub temperature: f64,
}

#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    fn provider(&self) -> Provider;

    async fn complete(&self, req: ChatRequest) -> anyhow::Result<String>;
}
