pub mod projection;

use crate::catalog::ProductCatalog;
use crate::domain::allocation::{fallback_allocation, AllocationPlan, AssetClass};
use crate::domain::portfolio::{RecommendationResult, RecommendedProduct, RecommendedProducts};
use crate::domain::risk::RiskLevel;
use crate::llm::{json, ChatRequest, LlmClient};
use chrono::NaiveDate;
use std::sync::Arc;

const ALLOCATION_TEMPERATURE: f64 = 0.3;
const DEFAULT_MODEL_REASONING: &str = "GPT 기반 맞춤 추천";
const TOP_PER_CLASS: usize = 3;

/// Portfolio recommendation service. Constructed once at startup with the
/// read-only catalog and an LLM client; holds no per-request state.
pub struct Recommender {
    catalog: ProductCatalog,
    llm: Arc<dyn LlmClient>,
}

impl Recommender {
    pub fn new(catalog: ProductCatalog, llm: Arc<dyn LlmClient>) -> Self {
        Self { catalog, llm }
    }

    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    pub async fn recommend(
        &self,
        risk_level: RiskLevel,
        target_amount: i64,
        period_months: u32,
    ) -> RecommendationResult {
        let today = crate::time::today_kst(chrono::Utc::now());
        self.recommend_as_of(risk_level, target_amount, period_months, today)
            .await
    }

    pub async fn recommend_as_of(
        &self,
        risk_level: RiskLevel,
        target_amount: i64,
        period_months: u32,
        today: NaiveDate,
    ) -> RecommendationResult {
        let (allocation, reasoning) = self
            .resolve_allocation(risk_level, target_amount, period_months)
            .await;

        assemble(
            &self.catalog,
            risk_level,
            target_amount,
            period_months,
            allocation,
            reasoning,
            today,
        )
    }

    /// Model path first; any failure (transport, missing JSON, refusal) falls
    /// back to the static table immediately. No retry.
    async fn resolve_allocation(
        &self,
        risk_level: RiskLevel,
        target_amount: i64,
        period_months: u32,
    ) -> (AllocationPlan, String) {
        match self
            .propose_via_model(risk_level, target_amount, period_months)
            .await
        {
            Ok(resolved) => resolved,
            Err(err) => {
                tracing::warn!(
                    risk_level = risk_level.label(),
                    error = %err,
                    "allocation model failed; applying static fallback"
                );
                (
                    fallback_allocation(risk_level),
                    format!("GPT 오류로 인한 기본 배분 적용 (오류: {err:#})"),
                )
            }
        }
    }

    async fn propose_via_model(
        &self,
        risk_level: RiskLevel,
        target_amount: i64,
        period_months: u32,
    ) -> anyhow::Result<(AllocationPlan, String)> {
        let req = ChatRequest {
            system: system_prompt(),
            user: user_prompt(risk_level, target_amount, period_months),
            temperature: ALLOCATION_TEMPERATURE,
        };

        let text = self.llm.complete(req).await?;
        let raw = json::parse_allocation(&text)?;
        let reasoning = raw
            .reasoning
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL_REASONING.to_string());

        Ok((raw.normalize(), reasoning))
    }
}

fn system_prompt() -> String {
    [
        "당신은 전문 금융 자산배분 어드바이저입니다.",
        "사용자의 위험성향, 투자금액, 투자기간을 분석해서 최적의 포트폴리오 배분을 추천해주세요.",
        "",
        "배분 가능한 자산군:",
        "- deposit (예금): 안전하지만 수익률 낮음 (2-3%)",
        "- saving (적금): 예금보다 약간 높은 수익률 (3-4%)",
        "- bond (채권): 중간 수익률과 안정성 (4-5%)",
        "- etf (ETF): 높은 수익률 가능하지만 변동성 있음 (6-10%)",
        "",
        "규칙:",
        "1. 4개 자산군 모두 포함해야 함 (최소 5% 이상)",
        "2. 전체 비율 합계는 반드시 100%",
        "3. 위험성향에 따른 배분 가이드라인:",
        "   - 안정형: 예금+적금 위주 (60-80%)",
        "   - 안정추구형: 예금+적금+채권 균형 (각각 20-40%)",
        "   - 위험중립형: 4개 자산군 고른 배분",
        "   - 적극투자형: ETF 비중 높임 (40-60%)",
        "   - 공격투자형: ETF 최대 비중 (60-80%)",
        "",
        "응답 형식 (JSON만 출력):",
        "{",
        "  \"deposit\": 숫자,",
        "  \"saving\": 숫자,",
        "  \"bond\": 숫자,",
        "  \"etf\": 숫자,",
        "  \"reasoning\": \"배분 근거 설명\"",
        "}",
    ]
    .join("\n")
}

fn user_prompt(risk_level: RiskLevel, target_amount: i64, period_months: u32) -> String {
    format!(
        "사용자 정보:\n\
- 위험성향: {}\n\
- 투자금액: {}원\n\
- 투자기간: {}개월\n\n\
이 사용자에게 최적의 포트폴리오 자산배분을 추천해주세요.\n\
투자금액과 기간을 고려한 맞춤형 배분을 제시해주세요.",
        risk_level.label(),
        group_thousands(target_amount),
        period_months
    )
}

fn group_thousands(n: i64) -> String {
    let digits = n.abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    let rem = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - rem) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Build the response for a resolved allocation. The expected total adds, for
/// every product in a class bucket, that product's projection divided by the
/// bucket size; a class therefore contributes the average of its products
/// regardless of how many matched, and an empty class contributes nothing.
fn assemble(
    catalog: &ProductCatalog,
    risk_level: RiskLevel,
    target_amount: i64,
    period_months: u32,
    allocation: AllocationPlan,
    reasoning: String,
    today: NaiveDate,
) -> RecommendationResult {
    let mut recommended = RecommendedProducts::default();
    let mut expected_total = 0.0;

    for class in AssetClass::ALL {
        let percent = allocation.percent(class);
        let invest_amount = target_amount as f64 * percent as f64 / 100.0;

        let mut products = catalog.filter(class, period_months, today);
        products.truncate(TOP_PER_CLASS);

        let bucket = recommended.bucket_mut(class);
        for product in &products {
            let rate = product.quoted_rate();
            let expected_value = projection::future_value(invest_amount, rate, period_months);
            expected_total += expected_value / products.len() as f64;

            bucket.push(RecommendedProduct {
                name: product.display_name().to_string(),
                bank: product.issuer().to_string(),
                rate,
                term: product.term_label(),
                invest_amount: round2(invest_amount),
                expected_value: round2(expected_value),
            });
        }
    }

    RecommendationResult {
        risk_level: risk_level.label().to_string(),
        target_amount,
        investment_period: period_months,
        allocation,
        expected_total: round2(expected_total),
        recommended_products: recommended,
        gpt_reasoning: reasoning,
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
