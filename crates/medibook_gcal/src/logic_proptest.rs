#[cfg(test)]
mod tests {
    use crate::logic::BookingRules;
    use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, TimeZone, Timelike, Utc};
    use proptest::prelude::*;

    // Helper: a wall-clock time on the given day in the given offset.
    fn at(day: NaiveDate, minute_of_day: i64, offset_hours: i32) -> DateTime<FixedOffset> {
        let offset = FixedOffset::east_opt(offset_hours * 3600).unwrap();
        let naive = day.and_hms_opt(0, 0, 0).unwrap() + Duration::minutes(minute_of_day);
        offset.from_local_datetime(&naive).unwrap()
    }

    fn clock() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    proptest! {
        // Any window starting or ending on Saturday is rejected, whatever the time.
        #[test]
        fn test_saturday_always_rejected(
            week in 0..52i64,
            start_minute in 0..1410i64,
            length in 1..30i64,
            offset_hours in -12..14i32,
        ) {
            let saturday = NaiveDate::from_ymd_opt(2025, 5, 17).unwrap() + Duration::weeks(week);
            let start = at(saturday, start_minute, offset_hours);
            let end = start + Duration::minutes(length);
            prop_assume!(end.weekday() == chrono::Weekday::Sat);

            let decision = BookingRules::default()
                .evaluate_at(&start.to_rfc3339(), &end.to_rfc3339(), clock());
            prop_assert!(!decision.available);
        }

        // Windows inside the opening hours of a Sun-Thu with a valid length pass.
        #[test]
        fn test_regular_day_inside_hours_accepted(
            week in 0..52i64,
            day_shift in 0..5i64,
            start_minute in 540..990i64,
            length in 1..=30i64,
            offset_hours in -12..14i32,
        ) {
            // Sunday 2025-05-11 plus 0..5 days covers Sun..Thu.
            let day = NaiveDate::from_ymd_opt(2025, 5, 11).unwrap()
                + Duration::weeks(week)
                + Duration::days(day_shift);
            let start = at(day, start_minute, offset_hours);
            let end = start + Duration::minutes(length);
            prop_assume!(end.hour() < 17 || (end.hour() == 17 && end.minute() == 0));

            let decision = BookingRules::default()
                .evaluate_at(&start.to_rfc3339(), &end.to_rfc3339(), clock());
            prop_assert!(decision.available, "{:?}", decision);
        }

        // Friday windows that end after 13:00 are rejected.
        #[test]
        fn test_friday_afternoon_rejected(
            week in 0..52i64,
            start_minute in 780..1020i64,
            length in 1..=30i64,
        ) {
            let friday = NaiveDate::from_ymd_opt(2025, 5, 16).unwrap() + Duration::weeks(week);
            let start = at(friday, start_minute, 3);
            let end = start + Duration::minutes(length);

            let decision = BookingRules::default()
                .evaluate_at(&start.to_rfc3339(), &end.to_rfc3339(), clock());
            prop_assert_eq!(decision.reason.as_deref(), Some("Outside working hours"));
        }

        // Lengths over 30 minutes never pass.
        #[test]
        fn test_long_windows_rejected(
            day_shift in 0..5i64,
            length in 31..400i64,
        ) {
            let day = NaiveDate::from_ymd_opt(2025, 5, 11).unwrap() + Duration::days(day_shift);
            let start = at(day, 540, 3);
            let end = start + Duration::minutes(length);

            let decision = BookingRules::default()
                .evaluate_at(&start.to_rfc3339(), &end.to_rfc3339(), clock());
            prop_assert!(!decision.available);
        }

        // Evaluation is a pure function of its inputs.
        #[test]
        fn test_evaluate_is_deterministic(
            start_minute in 0..20000i64,
            length in -60..120i64,
        ) {
            let start = at(NaiveDate::from_ymd_opt(2025, 5, 10).unwrap(), start_minute, 3);
            let end = start + Duration::minutes(length);
            let rules = BookingRules::default();

            let first = rules.evaluate_at(&start.to_rfc3339(), &end.to_rfc3339(), clock());
            let second = rules.evaluate_at(&start.to_rfc3339(), &end.to_rfc3339(), clock());
            prop_assert_eq!(first, second);
        }
    }
}
