use crate::domain::risk::RiskLevel;
use serde::{Deserialize, Serialize};

/// The four asset classes a plan allocates across, in response order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetClass {
    Deposit,
    Saving,
    Bond,
    Etf,
}

impl AssetClass {
    pub const ALL: [AssetClass; 4] = [
        AssetClass::Deposit,
        AssetClass::Saving,
        AssetClass::Bond,
        AssetClass::Etf,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AssetClass::Deposit => "deposit",
            AssetClass::Saving => "saving",
            AssetClass::Bond => "bond",
            AssetClass::Etf => "etf",
        }
    }
}

/// Integer percentage split across the four asset classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationPlan {
    pub deposit: i64,
    pub saving: i64,
    pub bond: i64,
    pub etf: i64,
}

impl AllocationPlan {
    pub fn percent(&self, class: AssetClass) -> i64 {
        match class {
            AssetClass::Deposit => self.deposit,
            AssetClass::Saving => self.saving,
            AssetClass::Bond => self.bond,
            AssetClass::Etf => self.etf,
        }
    }

    pub fn total(&self) -> i64 {
        self.deposit + self.saving + self.bond + self.etf
    }
}

/// Allocation as emitted by the model, before normalization. Any of the four
/// classes may be missing and values may be fractional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAllocation {
    pub deposit: Option<f64>,
    pub saving: Option<f64>,
    pub bond: Option<f64>,
    pub etf: Option<f64>,
    pub reasoning: Option<String>,
}

const DEFAULT_MISSING_PERCENT: f64 = 10.0;
const SUM_TOLERANCE: f64 = 1.0;

impl RawAllocation {
    /// Missing classes default to 10; when the sum strays more than 1 point
    /// from 100, every value is rescaled proportionally and rounded.
    pub fn normalize(&self) -> AllocationPlan {
        let mut values = [
            self.deposit.unwrap_or(DEFAULT_MISSING_PERCENT),
            self.saving.unwrap_or(DEFAULT_MISSING_PERCENT),
            self.bond.unwrap_or(DEFAULT_MISSING_PERCENT),
            self.etf.unwrap_or(DEFAULT_MISSING_PERCENT),
        ];

        let total: f64 = values.iter().sum();
        if (total - 100.0).abs() > SUM_TOLERANCE && total != 0.0 {
            for v in &mut values {
                *v = (*v * 100.0 / total).round();
            }
        }

        AllocationPlan {
            deposit: values[0].round() as i64,
            saving: values[1].round() as i64,
            bond: values[2].round() as i64,
            etf: values[3].round() as i64,
        }
    }
}

/// Deterministic per-risk-level split used whenever the model path fails.
pub fn fallback_allocation(risk_level: RiskLevel) -> AllocationPlan {
    match risk_level {
        RiskLevel::Stable => AllocationPlan {
            deposit: 40,
            saving: 30,
            bond: 20,
            etf: 10,
        },
        RiskLevel::StabilitySeeking => AllocationPlan {
            deposit: 30,
            saving: 25,
            bond: 25,
            etf: 20,
        },
        RiskLevel::RiskNeutral => AllocationPlan {
            deposit: 20,
            saving: 20,
            bond: 30,
            etf: 30,
        },
        RiskLevel::ActiveInvestment => AllocationPlan {
            deposit: 10,
            saving: 15,
            bond: 25,
            etf: 50,
        },
        RiskLevel::AggressiveInvestment => AllocationPlan {
            deposit: 5,
            saving: 10,
            bond: 15,
            etf: 70,
        },
    }
}
