use chrono::{DateTime, NaiveDate, Utc};

const KST_OFFSET_SECS: i32 = 9 * 3600;

/// Calendar date in KST (UTC+9). Horizon filters and policy deadlines are
/// evaluated against the Korean calendar day, not the server's UTC day.
pub fn today_kst(now_utc: DateTime<Utc>) -> NaiveDate {
    let kst = chrono::FixedOffset::east_opt(KST_OFFSET_SECS).expect("valid KST offset");
    now_utc.with_timezone(&kst).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn rolls_to_next_day_after_utc_15() {
        // 2026-01-05 16:00 UTC = 2026-01-06 01:00 KST.
        let now = Utc.with_ymd_and_hms(2026, 1, 5, 16, 0, 0).unwrap();
        assert_eq!(today_kst(now), NaiveDate::from_ymd_opt(2026, 1, 6).unwrap());
    }

    #[test]
    fn matches_utc_date_in_the_morning() {
        let now = Utc.with_ymd_and_hms(2026, 1, 5, 8, 0, 0).unwrap();
        assert_eq!(today_kst(now), NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
    }
}
