/// Compounded future value with annual compounding over fractional years.
/// Zero rate or zero duration returns the principal unchanged. Intentionally
/// simple: months convert to years as `months / 12`, no day-count convention.
pub fn future_value(principal: f64, annual_rate_pct: f64, months: u32) -> f64 {
    if annual_rate_pct == 0.0 || months == 0 {
        return principal;
    }
    let years = f64::from(months) / 12.0;
    principal * (1.0 + annual_rate_pct / 100.0).powf(years)
}
