pub mod filter;

use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

const NO_NAME: &str = "상품명 없음";
const NO_ISSUER: &str = "발행기관 없음";
const NO_TERM: &str = "기간 정보 없음";

/// Deposit and savings products share a schema: a best rate quoted for a best
/// term in months.
#[derive(Debug, Clone, Deserialize)]
pub struct TermProduct {
    #[serde(rename = "productName")]
    pub product_name: Option<String>,
    #[serde(rename = "bankName")]
    pub bank_name: Option<String>,
    #[serde(rename = "bestRate", default)]
    pub best_rate: f64,
    #[serde(rename = "bestTerm")]
    pub best_term: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BondProduct {
    #[serde(rename = "isinCdNm")]
    pub isin_name: Option<String>,
    #[serde(rename = "bondIsurNm")]
    pub issuer_name: Option<String>,
    #[serde(rename = "bondSrfcInrt", default)]
    pub surface_rate: f64,
    #[serde(rename = "bondExprDt")]
    pub maturity_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EtfProduct {
    #[serde(rename = "itmsNm")]
    pub item_name: Option<String>,
    #[serde(rename = "corpNm")]
    pub corp_name: Option<String>,
    #[serde(rename = "yield")]
    pub yield_rate: Option<f64>,
}

/// ETFs with no published yield are quoted (and projected) at this rate, but
/// sort as 0 so published yields always rank above them.
const ETF_ASSUMED_YIELD: f64 = 7.0;

/// One catalog entry, tagged by asset class so the per-class field priorities
/// become exhaustive matches instead of keyed lookups.
#[derive(Debug, Clone)]
pub enum Product {
    Deposit(TermProduct),
    Saving(TermProduct),
    Bond(BondProduct),
    Etf(EtfProduct),
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl Product {
    pub fn display_name(&self) -> &str {
        match self {
            Product::Deposit(p) | Product::Saving(p) => non_empty(&p.product_name),
            Product::Bond(p) => non_empty(&p.isin_name),
            Product::Etf(p) => non_empty(&p.item_name),
        }
        .unwrap_or(NO_NAME)
    }

    pub fn issuer(&self) -> &str {
        match self {
            Product::Deposit(p) | Product::Saving(p) => non_empty(&p.bank_name),
            Product::Bond(p) => non_empty(&p.issuer_name),
            Product::Etf(p) => non_empty(&p.corp_name),
        }
        .unwrap_or(NO_ISSUER)
    }

    /// Annual rate quoted to the caller and used for projection.
    pub fn quoted_rate(&self) -> f64 {
        match self {
            Product::Deposit(p) | Product::Saving(p) => p.best_rate,
            Product::Bond(p) => p.surface_rate,
            Product::Etf(p) => p.yield_rate.unwrap_or(ETF_ASSUMED_YIELD),
        }
    }

    /// Human-readable term: "{n}개월" for term products, the maturity date for
    /// bonds, a no-data notice otherwise. A zero best term counts as no data.
    pub fn term_label(&self) -> String {
        match self {
            Product::Deposit(p) | Product::Saving(p) => match p.best_term {
                Some(t) if t != 0 => format!("{t}개월"),
                _ => NO_TERM.to_string(),
            },
            Product::Bond(p) => non_empty(&p.maturity_date)
                .unwrap_or(NO_TERM)
                .to_string(),
            Product::Etf(_) => NO_TERM.to_string(),
        }
    }
}

/// Process-wide, read-only product catalog. Loaded once at startup; a load
/// failure must keep the service from starting.
#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    pub deposits: Vec<TermProduct>,
    pub savings: Vec<TermProduct>,
    pub bonds: Vec<BondProduct>,
    pub etfs: Vec<EtfProduct>,
}

#[derive(Debug, Deserialize)]
struct DatasetFile {
    #[serde(default)]
    deposits: Vec<TermProduct>,
    #[serde(default)]
    savings: Vec<TermProduct>,
    #[serde(default)]
    bonds: BondsSection,
    #[serde(default)]
    etfs: Vec<EtfProduct>,
}

/// Bonds arrive either as a flat list or as two pre-sorted lists that are
/// concatenated (interest-sorted first) before use.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BondsSection {
    Flat(Vec<BondProduct>),
    Split {
        #[serde(rename = "sortByInterest", default)]
        by_interest: Vec<BondProduct>,
        #[serde(rename = "sortByMaturity", default)]
        by_maturity: Vec<BondProduct>,
    },
}

impl Default for BondsSection {
    fn default() -> Self {
        BondsSection::Flat(Vec::new())
    }
}

impl BondsSection {
    fn into_flat(self) -> Vec<BondProduct> {
        match self {
            BondsSection::Flat(bonds) => bonds,
            BondsSection::Split {
                by_interest,
                by_maturity,
            } => {
                let mut out = by_interest;
                out.extend(by_maturity);
                out
            }
        }
    }
}

impl ProductCatalog {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read product dataset at {}", path.display()))?;
        let dataset: DatasetFile = serde_json::from_str(&raw)
            .with_context(|| format!("invalid product dataset at {}", path.display()))?;
        Ok(Self::from_dataset(dataset))
    }

    pub fn from_json_value(value: serde_json::Value) -> anyhow::Result<Self> {
        let dataset: DatasetFile =
            serde_json::from_value(value).context("invalid product dataset value")?;
        Ok(Self::from_dataset(dataset))
    }

    fn from_dataset(dataset: DatasetFile) -> Self {
        Self {
            deposits: dataset.deposits,
            savings: dataset.savings,
            bonds: dataset.bonds.into_flat(),
            etfs: dataset.etfs,
        }
    }

    pub fn product_count(&self) -> usize {
        self.deposits.len() + self.savings.len() + self.bonds.len() + self.etfs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn loads_flat_bond_list() {
        let catalog = ProductCatalog::from_json_value(json!({
            "deposits": [{"productName": "정기예금A", "bankName": "A은행", "bestRate": 3.5, "bestTerm": 12}],
            "savings": [],
            "bonds": [{"isinCdNm": "국채1", "bondIsurNm": "대한민국", "bondSrfcInrt": 4.1, "bondExprDt": "2027-03-01"}],
            "etfs": [{"itmsNm": "KODEX 200", "corpNm": "자산운용", "yield": 8.2}]
        }))
        .unwrap();

        assert_eq!(catalog.deposits.len(), 1);
        assert_eq!(catalog.bonds.len(), 1);
        assert_eq!(catalog.product_count(), 3);
    }

    #[test]
    fn concatenates_split_bond_lists_interest_first() {
        let catalog = ProductCatalog::from_json_value(json!({
            "bonds": {
                "sortByInterest": [{"isinCdNm": "회사채A", "bondSrfcInrt": 5.0, "bondExprDt": "2026-01-01"}],
                "sortByMaturity": [{"isinCdNm": "회사채B", "bondSrfcInrt": 3.0, "bondExprDt": "2026-06-01"}]
            }
        }))
        .unwrap();

        assert_eq!(catalog.bonds.len(), 2);
        assert_eq!(catalog.bonds[0].isin_name.as_deref(), Some("회사채A"));
        assert_eq!(catalog.bonds[1].isin_name.as_deref(), Some("회사채B"));
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let catalog = ProductCatalog::from_json_value(json!({})).unwrap();
        assert_eq!(catalog.product_count(), 0);
    }

    #[test]
    fn display_fields_fall_back_to_placeholders() {
        let etf = Product::Etf(EtfProduct {
            item_name: None,
            corp_name: Some("  ".to_string()),
            yield_rate: None,
        });
        assert_eq!(etf.display_name(), "상품명 없음");
        assert_eq!(etf.issuer(), "발행기관 없음");
        assert_eq!(etf.term_label(), "기간 정보 없음");
        assert_eq!(etf.quoted_rate(), 7.0);
    }

    #[test]
    fn zero_best_term_renders_no_term_label() {
        let deposit = Product::Deposit(TermProduct {
            product_name: Some("예금".to_string()),
            bank_name: None,
            best_rate: 2.0,
            best_term: Some(0),
        });
        assert_eq!(deposit.term_label(), "기간 정보 없음");

        let saving = Product::Saving(TermProduct {
            product_name: None,
            bank_name: None,
            best_rate: 3.0,
            best_term: Some(24),
        });
        assert_eq!(saving.term_label(), "24개월");
    }
}
