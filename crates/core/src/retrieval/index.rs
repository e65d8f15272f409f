use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

/// One indexed term document with its precomputed embedding.
#[derive(Debug, Clone, Deserialize)]
pub struct TermDocument {
    pub term: String,
    pub content: String,
    pub embedding: Vec<f32>,
}

#[derive(Debug, Clone, Deserialize)]
struct IndexFile {
    embedding_model: String,
    documents: Vec<TermDocument>,
}

/// A scored retrieval hit, highest cosine similarity first.
#[derive(Debug, Clone)]
pub struct ScoredDocument<'a> {
    pub document: &'a TermDocument,
    pub score: f32,
}

/// Read-only embedding index over the term corpus, loaded once at startup.
/// Search is an exhaustive cosine scan; the corpus is a few thousand short
/// documents, all resident in memory.
#[derive(Debug, Clone)]
pub struct TermIndex {
    embedding_model: String,
    documents: Vec<TermDocument>,
    dimension: usize,
}

impl TermIndex {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read term index at {}", path.display()))?;
        let file: IndexFile = serde_json::from_str(&raw)
            .with_context(|| format!("invalid term index at {}", path.display()))?;
        Self::from_documents(file.embedding_model, file.documents)
    }

    pub fn from_documents(
        embedding_model: String,
        documents: Vec<TermDocument>,
    ) -> anyhow::Result<Self> {
        anyhow::ensure!(!documents.is_empty(), "term index contains no documents");

        let dimension = documents[0].embedding.len();
        anyhow::ensure!(dimension > 0, "term index embeddings are empty");
        for doc in &documents {
            anyhow::ensure!(
                doc.embedding.len() == dimension,
                "inconsistent embedding dimension for term {:?}: expected {dimension}, got {}",
                doc.term,
                doc.embedding.len()
            );
        }

        Ok(Self {
            embedding_model,
            documents,
            dimension,
        })
    }

    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Top-k documents by cosine similarity, descending. Ties keep index
    /// order (stable sort), so results are deterministic.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<ScoredDocument<'_>> {
        let mut scored: Vec<ScoredDocument<'_>> = self
            .documents
            .iter()
            .map(|document| ScoredDocument {
                score: cosine_similarity(query, &document.embedding),
                document,
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k);
        scored
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let n = a.len().min(b.len());
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for i in 0..n {
        dot += a[i] * b[i];
        norm_a += a[i] * a[i];
        norm_b += b[i] * b[i];
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(term: &str, embedding: Vec<f32>) -> TermDocument {
        TermDocument {
            term: term.to_string(),
            content: format!("{term} 설명"),
            embedding,
        }
    }

    fn fixture_index() -> TermIndex {
        TermIndex::from_documents(
            "text-embedding-3-small".to_string(),
            vec![
                doc("금리", vec![1.0, 0.0, 0.0]),
                doc("환율", vec![0.0, 1.0, 0.0]),
                doc("기준금리", vec![0.9, 0.1, 0.0]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn search_orders_by_cosine_similarity_desc() {
        let index = fixture_index();
        let hits = index.search(&[1.0, 0.0, 0.0], 2);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].document.term, "금리");
        assert_eq!(hits[1].document.term, "기준금리");
        assert!(hits[0].score >= hits[1].score);
    }

    #[test]
    fn search_caps_at_k() {
        let index = fixture_index();
        assert_eq!(index.search(&[1.0, 1.0, 0.0], 10).len(), 3);
        assert_eq!(index.search(&[1.0, 1.0, 0.0], 1).len(), 1);
    }

    #[test]
    fn zero_vector_scores_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn rejects_empty_index() {
        assert!(TermIndex::from_documents("m".to_string(), vec![]).is_err());
    }

    #[test]
    fn rejects_inconsistent_dimensions() {
        let res = TermIndex::from_documents(
            "m".to_string(),
            vec![doc("a", vec![1.0, 0.0]), doc("b", vec![1.0])],
        );
        assert!(res.is_err());
    }
}
