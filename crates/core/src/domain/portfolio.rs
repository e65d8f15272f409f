use crate::domain::allocation::{AllocationPlan, AssetClass};
use serde::Serialize;

/// One recommended product inside a class bucket, with the amounts already
/// projected for the requested horizon.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendedProduct {
    pub name: String,
    pub bank: String,
    pub rate: f64,
    pub term: String,
    #[serde(rename = "investAmount")]
    pub invest_amount: f64,
    #[serde(rename = "expectedValue")]
    pub expected_value: f64,
}

/// Top-3 picks per asset class. A class with no eligible products keeps an
/// empty bucket rather than being omitted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecommendedProducts {
    pub deposit: Vec<RecommendedProduct>,
    pub saving: Vec<RecommendedProduct>,
    pub bond: Vec<RecommendedProduct>,
    pub etf: Vec<RecommendedProduct>,
}

impl RecommendedProducts {
    pub fn bucket_mut(&mut self, class: AssetClass) -> &mut Vec<RecommendedProduct> {
        match class {
            AssetClass::Deposit => &mut self.deposit,
            AssetClass::Saving => &mut self.saving,
            AssetClass::Bond => &mut self.bond,
            AssetClass::Etf => &mut self.etf,
        }
    }

    pub fn bucket(&self, class: AssetClass) -> &[RecommendedProduct] {
        match class {
            AssetClass::Deposit => &self.deposit,
            AssetClass::Saving => &self.saving,
            AssetClass::Bond => &self.bond,
            AssetClass::Etf => &self.etf,
        }
    }
}

/// Per-request recommendation payload. Built once per request and discarded
/// after the response is sent.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationResult {
    #[serde(rename = "riskLevel")]
    pub risk_level: String,
    #[serde(rename = "targetAmount")]
    pub target_amount: i64,
    #[serde(rename = "investmentPeriod")]
    pub investment_period: u32,
    pub allocation: AllocationPlan,
    #[serde(rename = "expectedTotal")]
    pub expected_total: f64,
    #[serde(rename = "recommendedProducts")]
    pub recommended_products: RecommendedProducts,
    #[serde(rename = "gptReasoning")]
    pub gpt_reasoning: String,
}
