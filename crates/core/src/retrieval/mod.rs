//! Retrieval-augmented Q&A over the prebuilt economic-terms index.

pub mod chatbot;
pub mod embeddings;
pub mod index;

pub use chatbot::TermChatbot;
pub use index::TermIndex;
