use crate::catalog::{BondProduct, Product, ProductCatalog};
use crate::domain::allocation::AssetClass;
use chrono::NaiveDate;

const MATURITY_FORMAT: &str = "%Y-%m-%d";

impl ProductCatalog {
    /// Products eligible for the horizon, sorted by descending rate. Ties keep
    /// catalog order (stable sort). Deterministic for identical inputs.
    pub fn filter(&self, class: AssetClass, period_months: u32, today: NaiveDate) -> Vec<Product> {
        match class {
            AssetClass::Deposit => {
                filter_term_products(&self.deposits, period_months, Product::Deposit)
            }
            AssetClass::Saving => {
                filter_term_products(&self.savings, period_months, Product::Saving)
            }
            AssetClass::Bond => filter_bonds(&self.bonds, period_months, today),
            AssetClass::Etf => {
                let mut out: Vec<Product> = self.etfs.iter().cloned().map(Product::Etf).collect();
                sort_by_rate_desc(&mut out, |p| match p {
                    // Missing yields sort last, below the assumed quote.
                    Product::Etf(e) => e.yield_rate.unwrap_or(0.0),
                    _ => 0.0,
                });
                out
            }
        }
    }
}

fn filter_term_products(
    products: &[crate::catalog::TermProduct],
    period_months: u32,
    wrap: fn(crate::catalog::TermProduct) -> Product,
) -> Vec<Product> {
    let mut out: Vec<Product> = products
        .iter()
        .filter(|p| p.best_term.unwrap_or(0) <= i64::from(period_months))
        .cloned()
        .map(wrap)
        .collect();
    sort_by_rate_desc(&mut out, Product::quoted_rate);
    out
}

fn filter_bonds(bonds: &[BondProduct], period_months: u32, today: NaiveDate) -> Vec<Product> {
    let mut out: Vec<Product> = bonds
        .iter()
        .filter(|b| bond_fits_horizon(b, period_months, today))
        .cloned()
        .map(Product::Bond)
        .collect();
    sort_by_rate_desc(&mut out, Product::quoted_rate);
    out
}

/// Whole years to maturity (floored, so already-matured bonds come out
/// negative and always fit), converted to months and compared against the
/// horizon. Bonds with a missing or unparsable maturity date are excluded.
fn bond_fits_horizon(bond: &BondProduct, period_months: u32, today: NaiveDate) -> bool {
    let Some(raw) = bond.maturity_date.as_deref() else {
        return false;
    };
    let Ok(maturity) = NaiveDate::parse_from_str(raw, MATURITY_FORMAT) else {
        return false;
    };

    let days = (maturity - today).num_days();
    let years = days.div_euclid(365);
    years * 12 <= i64::from(period_months)
}

fn sort_by_rate_desc(products: &mut [Product], key: impl Fn(&Product) -> f64) {
    products.sort_by(|a, b| {
        key(b)
            .partial_cmp(&key(a))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}
