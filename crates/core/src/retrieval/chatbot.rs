use crate::llm::{ChatRequest, LlmClient};
use crate::retrieval::embeddings::Embedder;
use crate::retrieval::index::TermIndex;
use serde::Serialize;
use std::sync::Arc;

const RETRIEVE_K: usize = 5;
const MAX_RELATED_TERMS: usize = 5;
const SNIPPET_CHARS: usize = 200;
const QA_TEMPERATURE: f64 = 0.0;

/// Answer payload. A failed upstream call is reported in-band
/// (`success: false` with a notice) instead of failing the request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatAnswer {
    pub success: bool,
    pub answer: String,
    pub related_terms: Vec<String>,
    pub source_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TermHit {
    pub term: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TermSearchResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub terms: Vec<TermHit>,
}

/// Retrieval-augmented Q&A over the economic-terms index. Stateless per
/// request; the index is shared and read-only.
pub struct TermChatbot {
    index: Arc<TermIndex>,
    embedder: Arc<dyn Embedder>,
    llm: Arc<dyn LlmClient>,
}

impl TermChatbot {
    pub fn new(index: Arc<TermIndex>, embedder: Arc<dyn Embedder>, llm: Arc<dyn LlmClient>) -> Self {
        Self {
            index,
            embedder,
            llm,
        }
    }

    pub fn index(&self) -> &TermIndex {
        &self.index
    }

    pub async fn answer(&self, question: &str) -> ChatAnswer {
        match self.answer_inner(question).await {
            Ok(answer) => answer,
            Err(err) => {
                tracing::warn!(error = %err, "chatbot answer failed");
                ChatAnswer {
                    success: false,
                    answer: format!("답변 생성 중 오류가 발생했습니다: {err:#}"),
                    related_terms: Vec::new(),
                    source_count: 0,
                }
            }
        }
    }

    async fn answer_inner(&self, question: &str) -> anyhow::Result<ChatAnswer> {
        let query = self.embedder.embed(question).await?;
        let hits = self.index.search(&query, RETRIEVE_K);

        let mut related_terms: Vec<String> = Vec::new();
        for hit in &hits {
            let term = hit.document.term.trim();
            if !term.is_empty() && !related_terms.iter().any(|t| t == term) {
                related_terms.push(term.to_string());
            }
        }
        related_terms.truncate(MAX_RELATED_TERMS);

        let context = hits
            .iter()
            .map(|hit| format!("[{}]\n{}", hit.document.term, hit.document.content))
            .collect::<Vec<_>>()
            .join("\n\n");

        let answer = self
            .llm
            .complete(ChatRequest {
                system: qa_system_prompt(),
                user: format!("참고 문서:\n{context}\n\n질문: {question}"),
                temperature: QA_TEMPERATURE,
            })
            .await?;

        Ok(ChatAnswer {
            success: true,
            answer,
            related_terms,
            source_count: hits.len(),
        })
    }

    pub async fn find_similar(&self, term: &str, k: usize) -> TermSearchResult {
        match self.find_similar_inner(term, k).await {
            Ok(terms) => TermSearchResult {
                success: true,
                error: None,
                terms,
            },
            Err(err) => {
                tracing::warn!(error = %err, "term search failed");
                TermSearchResult {
                    success: false,
                    error: Some(format!("{err:#}")),
                    terms: Vec::new(),
                }
            }
        }
    }

    async fn find_similar_inner(&self, term: &str, k: usize) -> anyhow::Result<Vec<TermHit>> {
        let query = self.embedder.embed(term).await?;
        let hits = self.index.search(&query, k);

        Ok(hits
            .iter()
            .filter(|hit| !hit.document.term.trim().is_empty())
            .map(|hit| TermHit {
                term: hit.document.term.clone(),
                content: truncate_snippet(&hit.document.content),
            })
            .collect())
    }
}

fn qa_system_prompt() -> String {
    [
        "당신은 경제용어를 쉽게 설명하는 금융 도우미입니다.",
        "제공된 참고 문서의 내용을 바탕으로 한국어로 정확하고 간결하게 답변해주세요.",
        "참고 문서에 없는 내용은 추측하지 말고 모른다고 답해주세요.",
    ]
    .join("\n")
}

/// Snippets cap at 200 characters with a trailing "...".
fn truncate_snippet(content: &str) -> String {
    if content.chars().count() > SNIPPET_CHARS {
        let cut: String = content.chars().take(SNIPPET_CHARS).collect();
        format!("{cut}...")
    } else {
        content.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Provider;
    use crate::retrieval::index::TermDocument;

    struct FixedEmbedder(Vec<f32>);

    #[async_trait::async_trait]
    impl Embedder for FixedEmbedder {
        async fn embed(&self, _text: &str) -> anyhow::Result<Vec<f32>> {
            Ok(self.0.clone())
        }
    }

    struct FailingEmbedder;

    #[async_trait::async_trait]
    impl Embedder for FailingEmbedder {
        async fn embed(&self, _text: &str) -> anyhow::Result<Vec<f32>> {
            anyhow::bail!("embedding service unavailable")
        }
    }

    struct ScriptedLlm(String);

    #[async_trait::async_trait]
    impl LlmClient for ScriptedLlm {
        fn provider(&self) -> Provider {
            Provider::OpenAi
        }

        async fn complete(&self, _req: ChatRequest) -> anyhow::Result<String> {
            Ok(self.0.clone())
        }
    }

    fn fixture_bot(embedder: Arc<dyn Embedder>) -> TermChatbot {
        let index = TermIndex::from_documents(
            "text-embedding-3-small".to_string(),
            vec![
                TermDocument {
                    term: "금리".to_string(),
                    content: "돈을 빌린 대가로 지급하는 이자의 비율".to_string(),
                    embedding: vec![1.0, 0.0],
                },
                TermDocument {
                    term: "금리".to_string(),
                    content: "중복 용어 문서".to_string(),
                    embedding: vec![0.9, 0.1],
                },
                TermDocument {
                    term: "환율".to_string(),
                    content: "ㄱ".repeat(250),
                    embedding: vec![0.0, 1.0],
                },
            ],
        )
        .unwrap();

        TermChatbot::new(
            Arc::new(index),
            embedder,
            Arc::new(ScriptedLlm("금리는 이자의 비율입니다.".to_string())),
        )
    }

    #[tokio::test]
    async fn answer_collects_unique_related_terms() {
        let bot = fixture_bot(Arc::new(FixedEmbedder(vec![1.0, 0.0])));
        let answer = bot.answer("금리가 뭐야?").await;

        assert!(answer.success);
        assert_eq!(answer.answer, "금리는 이자의 비율입니다.");
        assert_eq!(answer.related_terms, vec!["금리", "환율"]);
        assert_eq!(answer.source_count, 3);
    }

    #[tokio::test]
    async fn answer_reports_failure_in_band() {
        let bot = fixture_bot(Arc::new(FailingEmbedder));
        let answer = bot.answer("금리가 뭐야?").await;

        assert!(!answer.success);
        assert!(answer.answer.contains("답변 생성 중 오류가 발생했습니다"));
        assert!(answer.related_terms.is_empty());
        assert_eq!(answer.source_count, 0);
    }

    #[tokio::test]
    async fn find_similar_truncates_long_content() {
        let bot = fixture_bot(Arc::new(FixedEmbedder(vec![0.0, 1.0])));
        let result = bot.find_similar("환율", 1).await;

        assert!(result.success);
        assert_eq!(result.terms.len(), 1);
        let content = &result.terms[0].content;
        assert!(content.ends_with("..."));
        assert_eq!(content.chars().count(), 203);
    }

    #[tokio::test]
    async fn find_similar_failure_keeps_empty_terms() {
        let bot = fixture_bot(Arc::new(FailingEmbedder));
        let result = bot.find_similar("환율", 5).await;
        assert!(!result.success);
        assert!(result.terms.is_empty());
        assert!(result.error.as_deref().unwrap().contains("unavailable"));
    }

    #[test]
    fn short_snippets_are_untouched() {
        assert_eq!(truncate_snippet("짧은 설명"), "짧은 설명");
    }
}
