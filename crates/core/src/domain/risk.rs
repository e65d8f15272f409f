use serde::{Deserialize, Serialize};

/// Investor risk appetite, ordered from most conservative to most aggressive.
///
/// The canonical wire values are the Korean labels used by the mobile client;
/// the English identifiers are accepted on input for script/tooling callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(rename = "안정형", alias = "STABLE")]
    Stable,
    #[serde(rename = "안정추구형", alias = "STABILITY_SEEKING")]
    StabilitySeeking,
    #[serde(rename = "위험중립형", alias = "RISK_NEUTRAL")]
    RiskNeutral,
    #[serde(rename = "적극투자형", alias = "ACTIVE_INVESTMENT")]
    ActiveInvestment,
    #[serde(rename = "공격투자형", alias = "AGGRESSIVE_INVESTMENT")]
    AggressiveInvestment,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 5] = [
        RiskLevel::Stable,
        RiskLevel::StabilitySeeking,
        RiskLevel::RiskNeutral,
        RiskLevel::ActiveInvestment,
        RiskLevel::AggressiveInvestment,
    ];

    /// Korean display value (the canonical wire form).
    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Stable => "안정형",
            RiskLevel::StabilitySeeking => "안정추구형",
            RiskLevel::RiskNeutral => "위험중립형",
            RiskLevel::ActiveInvestment => "적극투자형",
            RiskLevel::AggressiveInvestment => "공격투자형",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RiskLevel::Stable => "안전한 투자를 선호, 원금 보장 중시",
            RiskLevel::StabilitySeeking => "약간의 위험을 감수하며 안정적 수익 추구",
            RiskLevel::RiskNeutral => "적정 수준의 위험과 수익을 균형있게 추구",
            RiskLevel::ActiveInvestment => "높은 수익을 위해 상당한 위험 감수",
            RiskLevel::AggressiveInvestment => "최대 수익을 위해 높은 위험도 적극 감수",
        }
    }

    /// Allocation guidance shown to the model. Bands are advisory, not hard
    /// constraints.
    pub fn guidance(self) -> &'static str {
        match self {
            RiskLevel::Stable => "예금+적금 위주 (60-80%)",
            RiskLevel::StabilitySeeking => "예금+적금+채권 균형 (각각 20-40%)",
            RiskLevel::RiskNeutral => "4개 자산군 고른 배분",
            RiskLevel::ActiveInvestment => "ETF 비중 높임 (40-60%)",
            RiskLevel::AggressiveInvestment => "ETF 최대 비중 (60-80%)",
        }
    }
}
