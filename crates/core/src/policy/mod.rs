pub mod juso;
pub mod youth;

use crate::policy::juso::JusoClient;
use crate::policy::youth::{PolicyRow, YouthPolicyClient};
use chrono::NaiveDate;
use serde::Serialize;

const REGION_RESULT_CAP: usize = 20;
const YOUTH_KEYWORD: &str = "청년";

/// Caller-facing policy entry. `plcyNo` is only present on the top-10
/// listing, matching the upstream payloads.
#[derive(Debug, Clone, Serialize)]
pub struct PolicySummary {
    #[serde(rename = "plcyNo", skip_serializing_if = "Option::is_none")]
    pub policy_no: Option<String>,
    #[serde(rename = "plcyNm")]
    pub name: String,
    #[serde(rename = "sprvsnInstCdNm")]
    pub agency: String,
    #[serde(rename = "inqCnt")]
    pub views: i64,
    pub url: String,
}

/// Region-scoped policy lookup plus the popularity top-10, combining the
/// address-lookup and youth-policy clients.
pub struct PolicyService {
    juso: JusoClient,
    youth: YouthPolicyClient,
}

impl PolicyService {
    pub fn new(juso: JusoClient, youth: YouthPolicyClient) -> Self {
        Self { juso, youth }
    }

    /// Open youth policies for an address, most viewed first, capped at 20.
    pub async fn region_policies(&self, address: &str) -> anyhow::Result<Vec<PolicySummary>> {
        let zip_prefix = self.juso.zip_code(address).await?;
        let keyword = region_keyword(address);
        let rows = self.youth.fetch_policies(&zip_prefix, &keyword).await?;

        let today = crate::time::today_kst(chrono::Utc::now());
        Ok(summarize_region_rows(rows, today))
    }

    /// Popularity top-10, enriched one by one; failed or empty details are
    /// logged and skipped.
    pub async fn top10(&self) -> anyhow::Result<Vec<PolicySummary>> {
        let policy_nos = self.youth.fetch_rank10().await?;

        let mut rows: Vec<PolicyRow> = Vec::with_capacity(policy_nos.len());
        for policy_no in &policy_nos {
            match self.youth.fetch_detail(policy_no).await {
                Ok(Some(row)) => rows.push(row),
                Ok(None) => {
                    tracing::warn!(policy_no, "rank entry has no detail; skipping");
                }
                Err(err) => {
                    tracing::warn!(policy_no, error = %err, "policy detail fetch failed; skipping");
                }
            }
        }

        Ok(summarize_rank_rows(rows))
    }
}

/// Second token of the address with administrative suffixes trimmed:
/// a trailing 시 or 군 is dropped, a trailing 구 only on names longer than
/// two characters ("남구" stays, "강남구" becomes "강남"). Single-token
/// addresses yield an empty keyword.
pub fn region_keyword(address: &str) -> String {
    let mut parts = address.split_whitespace();
    let _ = parts.next();
    let Some(second) = parts.next() else {
        return String::new();
    };

    let chars: Vec<char> = second.chars().collect();
    let trimmed: String = match chars.last() {
        Some('시') | Some('군') => chars[..chars.len() - 1].iter().collect(),
        Some('구') if chars.len() > 2 => chars[..chars.len() - 1].iter().collect(),
        _ => second.to_string(),
    };
    trimmed
}

/// Deadline from an apply window of the form "YYYYMMDD ~ YYYYMMDD".
/// `None` when the field is missing or malformed; such rows are kept.
pub fn parse_apply_deadline(window: &str) -> Option<NaiveDate> {
    let end = window.split('~').nth(1)?.trim();
    NaiveDate::parse_from_str(end, "%Y%m%d").ok()
}

fn summarize_region_rows(rows: Vec<PolicyRow>, today: NaiveDate) -> Vec<PolicySummary> {
    let mut out: Vec<PolicySummary> = rows
        .into_iter()
        .filter(|row| {
            let closed = row
                .apply_window
                .as_deref()
                .and_then(parse_apply_deadline)
                .is_some_and(|deadline| deadline < today);
            !closed
        })
        .filter(|row| {
            row.name
                .as_deref()
                .unwrap_or("")
                .contains(YOUTH_KEYWORD)
        })
        .map(|row| to_summary(row, false))
        .collect();

    out.sort_by_key(|s| std::cmp::Reverse(s.views));
    out.truncate(REGION_RESULT_CAP);
    out
}

fn summarize_rank_rows(rows: Vec<PolicyRow>) -> Vec<PolicySummary> {
    let mut out: Vec<PolicySummary> = rows.into_iter().map(|row| to_summary(row, true)).collect();
    out.sort_by_key(|s| std::cmp::Reverse(s.views));
    out
}

fn to_summary(row: PolicyRow, with_policy_no: bool) -> PolicySummary {
    let views = row.views();
    let url = row.resolved_url();
    PolicySummary {
        policy_no: if with_policy_no { row.policy_no } else { None },
        name: row.name.unwrap_or_default(),
        agency: row.agency.unwrap_or_default(),
        views,
        url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(v: serde_json::Value) -> PolicyRow {
        serde_json::from_value(v).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn region_keyword_strips_admin_suffixes() {
        assert_eq!(region_keyword("경기도 성남시"), "성남");
        assert_eq!(region_keyword("강원도 홍천군"), "홍천");
        assert_eq!(region_keyword("서울특별시 강남구"), "강남");
        // Two-character 구 names keep their suffix.
        assert_eq!(region_keyword("광주광역시 남구"), "남구");
        assert_eq!(region_keyword("세종특별자치시"), "");
    }

    #[test]
    fn parses_apply_deadline_from_window() {
        assert_eq!(
            parse_apply_deadline("20250101 ~ 20251231"),
            NaiveDate::from_ymd_opt(2025, 12, 31)
        );
        assert_eq!(parse_apply_deadline("상시"), None);
        assert_eq!(parse_apply_deadline("20250101 ~ 연중"), None);
    }

    #[test]
    fn region_rows_drop_closed_and_non_youth_policies() {
        let rows = vec![
            row(json!({"plcyNm": "청년 월세 지원", "aplyYmd": "20250101 ~ 20251231", "inqCnt": 10})),
            row(json!({"plcyNm": "청년 창업 지원", "aplyYmd": "20240101 ~ 20240601", "inqCnt": 99})),
            row(json!({"plcyNm": "노인 일자리", "aplyYmd": "20250101 ~ 20251231", "inqCnt": 50})),
            row(json!({"plcyNm": "청년 교통비", "aplyYmd": "상시", "inqCnt": 20})),
        ];

        let out = summarize_region_rows(rows, today());
        let names: Vec<_> = out.iter().map(|s| s.name.as_str()).collect();
        // Closed window and non-youth rows are gone; unparsable windows stay.
        assert_eq!(names, vec!["청년 교통비", "청년 월세 지원"]);
    }

    #[test]
    fn region_rows_sort_by_views_and_cap_at_20() {
        let rows: Vec<PolicyRow> = (0..30)
            .map(|i| {
                row(json!({
                    "plcyNm": format!("청년 정책 {i}"),
                    "inqCnt": i,
                }))
            })
            .collect();

        let out = summarize_region_rows(rows, today());
        assert_eq!(out.len(), 20);
        assert_eq!(out[0].views, 29);
        assert!(out.windows(2).all(|w| w[0].views >= w[1].views));
    }

    #[test]
    fn rank_rows_keep_policy_no_and_sort_by_views() {
        let rows = vec![
            row(json!({"plcyNo": "P1", "plcyNm": "청년 A", "inqCnt": 5})),
            row(json!({"plcyNo": "P2", "plcyNm": "청년 B", "inqCnt": 50})),
        ];

        let out = summarize_rank_rows(rows);
        assert_eq!(out[0].policy_no.as_deref(), Some("P2"));
        assert_eq!(out[1].policy_no.as_deref(), Some("P1"));
    }

    #[test]
    fn region_summaries_omit_policy_no_on_the_wire() {
        let out = summarize_region_rows(
            vec![row(json!({"plcyNo": "P1", "plcyNm": "청년 A", "inqCnt": 1}))],
            today(),
        );
        let v = serde_json::to_value(&out[0]).unwrap();
        assert!(v.get("plcyNo").is_none());
        assert_eq!(v["plcyNm"], "청년 A");
        assert_eq!(v["inqCnt"], 1);
    }
}
