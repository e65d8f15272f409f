use crate::{error_response, ApiError, AppState};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use finmate_core::domain::portfolio::RecommendationResult;
use finmate_core::domain::risk::RiskLevel;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    #[serde(rename = "riskLevel", alias = "risk_level")]
    risk_level: RiskLevel,
    #[serde(rename = "targetAmount", alias = "target_amount")]
    target_amount: i64,
    #[serde(
        rename = "period",
        alias = "investmentPeriod",
        alias = "investment_period"
    )]
    period: i64,
}

/// LLM failures never surface here: the recommender falls back to the static
/// allocation, so this handler only rejects invalid input.
pub async fn recommend(
    State(state): State<AppState>,
    Json(req): Json<RecommendRequest>,
) -> Result<Json<RecommendationResult>, ApiError> {
    if req.target_amount <= 0 {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "목표 투자금액은 0보다 커야 합니다",
        ));
    }
    if req.period <= 0 {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "투자기간은 0보다 커야 합니다",
        ));
    }
    let period = u32::try_from(req.period)
        .map_err(|_| error_response(StatusCode::BAD_REQUEST, "투자기간이 너무 깁니다"))?;

    let result = state
        .recommender
        .recommend(req.risk_level, req.target_amount, period)
        .await;

    Ok(Json(result))
}

pub async fn risk_levels() -> Json<serde_json::Value> {
    let levels: Vec<serde_json::Value> = RiskLevel::ALL
        .iter()
        .map(|level| {
            serde_json::json!({
                "value": level.label(),
                "description": level.description(),
            })
        })
        .collect();

    Json(serde_json::json!({ "risk_levels": levels }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_accepts_camel_case_and_snake_case() {
        let camel: RecommendRequest = serde_json::from_str(
            r#"{"riskLevel": "STABLE", "targetAmount": 10000000, "period": 24}"#,
        )
        .unwrap();
        assert_eq!(camel.risk_level, RiskLevel::Stable);
        assert_eq!(camel.target_amount, 10_000_000);
        assert_eq!(camel.period, 24);

        let snake: RecommendRequest = serde_json::from_str(
            r#"{"risk_level": "안정형", "target_amount": 5000, "investmentPeriod": 12}"#,
        )
        .unwrap();
        assert_eq!(snake.risk_level, RiskLevel::Stable);
        assert_eq!(snake.period, 12);
    }

    #[test]
    fn request_rejects_unknown_risk_level() {
        let res = serde_json::from_str::<RecommendRequest>(
            r#"{"riskLevel": "INVALID_LEVEL", "targetAmount": 1, "period": 1}"#,
        );
        assert!(res.is_err());
    }
}
