use crate::{error_response, ApiError, AppState};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use finmate_core::policy::PolicySummary;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct PoliciesQuery {
    address: String,
}

pub async fn policies(
    State(state): State<AppState>,
    Query(query): Query<PoliciesQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Some(service) = &state.policy else {
        return Err(error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "청년정책 API 키가 설정되지 않았습니다",
        ));
    };

    let address = query.address.trim();
    if address.is_empty() {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "주소를 입력해주세요",
        ));
    }

    let policies = service.region_policies(address).await.map_err(|e| {
        sentry_anyhow::capture_anyhow(&e);
        tracing::error!(error = %e, "region policy lookup failed");
        error_response(StatusCode::INTERNAL_SERVER_ERROR, "청년정책 조회에 실패했습니다")
    })?;

    Ok(Json(render_policies(policies)))
}

pub async fn top10(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Some(service) = &state.policy else {
        return Err(error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "청년정책 API 키가 설정되지 않았습니다",
        ));
    };

    let policies = service.top10().await.map_err(|e| {
        sentry_anyhow::capture_anyhow(&e);
        tracing::error!(error = %e, "policy top10 lookup failed");
        error_response(StatusCode::INTERNAL_SERVER_ERROR, "인기 정책 조회에 실패했습니다")
    })?;

    Ok(Json(render_policies(policies)))
}

fn render_policies(policies: Vec<PolicySummary>) -> serde_json::Value {
    if policies.is_empty() {
        serde_json::json!({ "message": "No Content" })
    } else {
        serde_json::json!({ "policies": policies })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_renders_no_content() {
        let v = render_policies(vec![]);
        assert_eq!(v["message"], "No Content");
        assert!(v.get("policies").is_none());
    }

    #[test]
    fn non_empty_list_renders_policies_array() {
        let v = render_policies(vec![PolicySummary {
            policy_no: None,
            name: "청년 월세 지원".to_string(),
            agency: "국토교통부".to_string(),
            views: 10,
            url: String::new(),
        }]);
        assert_eq!(v["policies"][0]["plcyNm"], "청년 월세 지원");
    }
}
