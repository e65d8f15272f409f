use crate::config::Settings;
use anyhow::Context;
use serde::Deserialize;
use std::time::Duration;

const JUSO_BASE_URL: &str = "https://www.juso.go.kr/addrlink/addrLinkApi.do";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Address-lookup client. Resolves a free-text address to the 5-digit
/// administrative code prefix used to scope policy queries.
#[derive(Debug, Clone)]
pub struct JusoClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl JusoClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let api_key = settings.require_juso_api_key()?.to_string();
        let base_url =
            std::env::var("JUSO_BASE_URL").unwrap_or_else(|_| JUSO_BASE_URL.to_string());

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .context("failed to build juso http client")?;

        Ok(Self {
            http,
            api_key,
            base_url,
        })
    }

    /// First match's `admCd` truncated to 5 digits; empty when nothing
    /// matches (an empty prefix later matches every policy row).
    pub async fn zip_code(&self, keyword: &str) -> anyhow::Result<String> {
        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("confmKey", self.api_key.as_str()),
                ("currentPage", "1"),
                ("countPerPage", "1"),
                ("keyword", keyword),
                ("resultType", "json"),
            ])
            .send()
            .await
            .context("juso request failed")?
            .error_for_status()
            .context("juso returned an error status")?;

        let body: JusoResponse = res.json().await.context("invalid juso response JSON")?;
        Ok(extract_adm_prefix(&body))
    }
}

fn extract_adm_prefix(body: &JusoResponse) -> String {
    body.results
        .as_ref()
        .and_then(|r| r.juso.as_ref())
        .and_then(|list| list.first())
        .and_then(|item| item.adm_cd.as_deref())
        .map(|cd| cd.chars().take(5).collect())
        .unwrap_or_default()
}

#[derive(Debug, Clone, Deserialize)]
struct JusoResponse {
    results: Option<JusoResults>,
}

#[derive(Debug, Clone, Deserialize)]
struct JusoResults {
    juso: Option<Vec<JusoItem>>,
}

#[derive(Debug, Clone, Deserialize)]
struct JusoItem {
    #[serde(rename = "admCd")]
    adm_cd: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_five_digit_prefix() {
        let body: JusoResponse = serde_json::from_value(json!({
            "results": {"juso": [{"admCd": "2917010100"}]}
        }))
        .unwrap();
        assert_eq!(extract_adm_prefix(&body), "29170");
    }

    #[test]
    fn empty_result_yields_empty_prefix() {
        let body: JusoResponse = serde_json::from_value(json!({
            "results": {"juso": null}
        }))
        .unwrap();
        assert_eq!(extract_adm_prefix(&body), "");
    }
}
