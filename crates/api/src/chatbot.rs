use crate::{error_response, ApiError, AppState};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use finmate_core::retrieval::chatbot::{ChatAnswer, TermSearchResult};
use serde::Deserialize;

const DEFAULT_SEARCH_K: usize = 5;

#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
    question: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    term: String,
    #[serde(default)]
    k: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    message: String,
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "running",
        "message": "경제용어 챗봇 API가 정상 동작중입니다",
        "endpoints": ["/chatbot/ask", "/chatbot/search", "/chatbot/chat"]
    }))
}

pub async fn ask(
    State(state): State<AppState>,
    Json(req): Json<QuestionRequest>,
) -> Result<Json<ChatAnswer>, ApiError> {
    let question = req.question.trim();
    if question.is_empty() {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "빈 질문은 처리할 수 없습니다",
        ));
    }

    Ok(Json(state.chatbot.answer(question).await))
}

pub async fn search(
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<TermSearchResult>, ApiError> {
    let term = req.term.trim();
    if term.is_empty() {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "빈 검색어는 처리할 수 없습니다",
        ));
    }

    let k = req.k.unwrap_or(DEFAULT_SEARCH_K);
    Ok(Json(state.chatbot.find_similar(term, k).await))
}

pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let message = req.message.trim();
    if message.is_empty() {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "메시지를 입력해주세요",
        ));
    }

    let answer = state.chatbot.answer(message).await;
    Ok(Json(serde_json::json!({
        "success": answer.success,
        "reply": answer.answer,
        "related_terms": answer.related_terms,
        "metadata": {
            "source_count": answer.source_count,
            "user_message": message
        }
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_request_defaults_k() {
        let req: SearchRequest = serde_json::from_str(r#"{"term": "금리"}"#).unwrap();
        assert_eq!(req.k, None);

        let req: SearchRequest = serde_json::from_str(r#"{"term": "금리", "k": 3}"#).unwrap();
        assert_eq!(req.k, Some(3));
    }
}
