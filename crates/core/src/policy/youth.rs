use crate::config::Settings;
use anyhow::Context;
use serde::Deserialize;
use std::time::Duration;

const YOUTH_POLICY_BASE_URL: &str = "https://www.youthcenter.go.kr/go/ythip/getPlcy";
const YOUTH_RANK_BASE_URL: &str = "https://www.youthcenter.go.kr";
const RANK_PATH: &str = "/wrk/yrm/plcy/RankPlcy";

const PAGE_SIZE: u32 = 100;
pub const MAX_ROWS: usize = 200;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// One policy row as returned by the youth-policy API. Fields the upstream
/// sometimes omits or returns as strings stay loose here; accessors below
/// normalize them.
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyRow {
    #[serde(rename = "plcyNo")]
    pub policy_no: Option<String>,
    #[serde(rename = "plcyNm")]
    pub name: Option<String>,
    #[serde(rename = "zipCd")]
    pub zip_cd: Option<String>,
    #[serde(rename = "aplyYmd")]
    pub apply_window: Option<String>,
    #[serde(rename = "sprvsnInstCdNm")]
    pub agency: Option<String>,
    #[serde(rename = "inqCnt")]
    pub inq_cnt: Option<serde_json::Value>,
    #[serde(rename = "aplyUrlAddr")]
    pub apply_url: Option<String>,
    #[serde(rename = "refUrlAddr1")]
    pub ref_url1: Option<String>,
    #[serde(rename = "refUrlAddr2")]
    pub ref_url2: Option<String>,
}

impl PolicyRow {
    /// View count; the API serves this as either a number or a string.
    pub fn views(&self) -> i64 {
        match &self.inq_cnt {
            Some(serde_json::Value::Number(n)) => n.as_i64().unwrap_or(0),
            Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or(0),
            _ => 0,
        }
    }

    /// Application URL, first non-empty of the three upstream fields.
    pub fn resolved_url(&self) -> String {
        [&self.apply_url, &self.ref_url1, &self.ref_url2]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .unwrap_or("")
            .to_string()
    }
}

#[derive(Debug, Clone, Deserialize)]
struct PolicyListResponse {
    result: Option<PolicyListResult>,
}

#[derive(Debug, Clone, Deserialize)]
struct PolicyListResult {
    #[serde(rename = "youthPolicyList", default)]
    youth_policy_list: Vec<PolicyRow>,
}

#[derive(Debug, Clone, Deserialize)]
struct RankResponse {
    result: Option<RankResult>,
}

#[derive(Debug, Clone, Deserialize)]
struct RankResult {
    #[serde(rename = "rankPlcyList", default)]
    rank_plcy_list: Vec<RankEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct RankEntry {
    #[serde(rename = "plcyNo")]
    plcy_no: Option<String>,
}

/// Youth-policy API client. The rank endpoint requires a session cookie,
/// so the underlying client keeps a cookie store.
#[derive(Debug, Clone)]
pub struct YouthPolicyClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    rank_base_url: String,
}

impl YouthPolicyClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let api_key = settings.require_youth_api_key()?.to_string();
        let base_url = std::env::var("YOUTH_POLICY_BASE_URL")
            .unwrap_or_else(|_| YOUTH_POLICY_BASE_URL.to_string());
        let rank_base_url = std::env::var("YOUTH_RANK_BASE_URL")
            .unwrap_or_else(|_| YOUTH_RANK_BASE_URL.to_string());

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .cookie_store(true)
            .build()
            .context("failed to build youth policy http client")?;

        Ok(Self {
            http,
            api_key,
            base_url,
            rank_base_url,
        })
    }

    /// Paged fetch scoped to a zip-code prefix, capped at `MAX_ROWS` rows.
    /// Stops on the first empty page. Rows outside the prefix are dropped
    /// page by page (an empty prefix keeps everything).
    pub async fn fetch_policies(
        &self,
        zip_prefix: &str,
        name_keyword: &str,
    ) -> anyhow::Result<Vec<PolicyRow>> {
        let mut all: Vec<PolicyRow> = Vec::new();
        let mut page: u32 = 1;

        while all.len() < MAX_ROWS {
            let page_num = page.to_string();
            let page_size = PAGE_SIZE.to_string();
            let res = self
                .http
                .get(&self.base_url)
                .query(&[
                    ("apiKeyNm", self.api_key.as_str()),
                    ("rtnType", "json"),
                    ("pageNum", page_num.as_str()),
                    ("pageSize", page_size.as_str()),
                    ("plcyNm", name_keyword),
                    ("zipCd", zip_prefix),
                ])
                .send()
                .await
                .context("youth policy request failed")?;

            let body: PolicyListResponse = res
                .json()
                .await
                .context("invalid youth policy response JSON")?;
            let rows = body
                .result
                .map(|r| r.youth_policy_list)
                .unwrap_or_default();
            if rows.is_empty() {
                break;
            }

            all.extend(rows.into_iter().filter(|row| {
                row.zip_cd
                    .as_deref()
                    .unwrap_or("")
                    .starts_with(zip_prefix)
            }));
            page += 1;
        }

        all.truncate(MAX_ROWS);
        Ok(all)
    }

    /// Top-10 policy numbers from the popularity rank endpoint. A plain GET
    /// against the site root first establishes the session cookie the rank
    /// endpoint expects.
    pub async fn fetch_rank10(&self) -> anyhow::Result<Vec<String>> {
        self.http
            .get(&self.rank_base_url)
            .send()
            .await
            .context("rank session request failed")?;

        let url = format!("{}{RANK_PATH}", self.rank_base_url.trim_end_matches('/'));
        let res = self
            .http
            .get(url)
            .query(&[("isMaskingYn", "Y")])
            .send()
            .await
            .context("rank request failed")?
            .error_for_status()
            .context("rank endpoint returned an error status")?;

        let body: RankResponse = res.json().await.context("invalid rank response JSON")?;
        Ok(body
            .result
            .map(|r| r.rank_plcy_list)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|e| e.plcy_no)
            .collect())
    }

    /// Detail lookup for one policy number. `None` when the API returns no
    /// matching row.
    pub async fn fetch_detail(&self, policy_no: &str) -> anyhow::Result<Option<PolicyRow>> {
        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("apiKeyNm", self.api_key.as_str()),
                ("plcyNo", policy_no),
            ])
            .send()
            .await
            .context("policy detail request failed")?;

        let body: PolicyListResponse = res
            .json()
            .await
            .context("invalid policy detail response JSON")?;
        Ok(body
            .result
            .map(|r| r.youth_policy_list)
            .unwrap_or_default()
            .into_iter()
            .next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn views_parses_numbers_and_strings() {
        let row: PolicyRow = serde_json::from_value(json!({"inqCnt": 42})).unwrap();
        assert_eq!(row.views(), 42);

        let row: PolicyRow = serde_json::from_value(json!({"inqCnt": "1234"})).unwrap();
        assert_eq!(row.views(), 1234);

        let row: PolicyRow = serde_json::from_value(json!({"inqCnt": null})).unwrap();
        assert_eq!(row.views(), 0);

        let row: PolicyRow = serde_json::from_value(json!({})).unwrap();
        assert_eq!(row.views(), 0);
    }

    #[test]
    fn resolved_url_takes_first_non_empty() {
        let row: PolicyRow = serde_json::from_value(json!({
            "aplyUrlAddr": "",
            "refUrlAddr1": "https://example.com/apply",
            "refUrlAddr2": "https://example.com/ref2"
        }))
        .unwrap();
        assert_eq!(row.resolved_url(), "https://example.com/apply");

        let row: PolicyRow = serde_json::from_value(json!({})).unwrap();
        assert_eq!(row.resolved_url(), "");
    }

    #[test]
    fn list_response_tolerates_missing_result() {
        let body: PolicyListResponse = serde_json::from_value(json!({})).unwrap();
        assert!(body.result.is_none());

        let body: PolicyListResponse = serde_json::from_value(json!({
            "result": {"youthPolicyList": [{"plcyNo": "P1", "plcyNm": "청년 월세 지원"}]}
        }))
        .unwrap();
        assert_eq!(body.result.unwrap().youth_policy_list.len(), 1);
    }
}
