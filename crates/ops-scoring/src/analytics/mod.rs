//! KPI aggregation over time-stamped disruption and recovery records.

pub mod import;
mod insights;
mod record;
mod reducer;
mod summary;

pub use import::ImportError;
pub use insights::{most_frequent_category, top_categories, CategoryImpact, ImpactLevel};
pub use record::{KpiRecord, TimeWindow};
pub use reducer::AggregationReducer;
pub use summary::KpiSummary;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::io::Cursor;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, hour, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn window() -> (DateTime<Utc>, DateTime<Utc>) {
        (at(0), at(12))
    }

    fn recovery_logs() -> Vec<KpiRecord> {
        vec![
            KpiRecord::new(at(1), "Weather")
                .with_number("affected_passengers", 180.0)
                .with_number("actual_cost", 42_000.0)
                .with_flag("successful", true),
            KpiRecord::new(at(3), "Crew")
                .with_number("affected_passengers", 96.0)
                .with_flag("successful", false)
                .with_flag("hotac_required", true),
            KpiRecord::new(at(5), "Weather")
                .with_number("affected_passengers", 340.0)
                .with_flag("successful", true),
            // Exactly at the window end: excluded.
            KpiRecord::new(at(12), "Technical")
                .with_number("affected_passengers", 1_000.0)
                .with_flag("successful", false),
        ]
    }

    #[test]
    fn empty_input_yields_zeroes() {
        let (start, end) = window();
        let summary = AggregationReducer::new().aggregate(&[], start, end);

        assert!(summary.is_empty());
        assert!(summary.rates.is_empty());
        assert!(summary.totals.is_empty());
        assert!(summary.averages.is_empty());
        assert_eq!(summary.record_count(), 0);
        assert_eq!(summary.rate("successful"), 0.0);
        assert_eq!(summary.average("affected_passengers"), 0.0);
    }

    #[test]
    fn window_is_half_open() {
        let (start, end) = window();
        let records = vec![
            KpiRecord::new(start, "Weather"),
            KpiRecord::new(end, "Weather"),
            KpiRecord::new(start - Duration::seconds(1), "Weather"),
        ];

        let summary = AggregationReducer::new().aggregate(&records, start, end);
        assert_eq!(summary.count("Weather"), 1);
    }

    #[test]
    fn inverted_window_is_empty() {
        let (start, end) = window();
        let summary = AggregationReducer::new().aggregate(&recovery_logs(), end, start);
        assert_eq!(summary, KpiSummary::default());
    }

    #[test]
    fn computes_counts_rates_totals_and_averages() {
        let (start, end) = window();
        let summary = AggregationReducer::new().aggregate(&recovery_logs(), start, end);

        assert_eq!(summary.count("Weather"), 2);
        assert_eq!(summary.count("Crew"), 1);
        assert_eq!(summary.count("Technical"), 0);
        assert_eq!(summary.record_count(), 3);

        assert_eq!(summary.rate("successful"), 2.0 / 3.0);
        // Only one record defines the flag, and it is set.
        assert_eq!(summary.rate("hotac_required"), 1.0);

        assert_eq!(summary.total("affected_passengers"), 616.0);
        assert_eq!(summary.average("affected_passengers"), 616.0 / 3.0);
        // Missing values count as zero towards the mean.
        assert_eq!(summary.average("actual_cost"), 14_000.0);
    }

    #[test]
    fn aggregation_is_repeatable() {
        let (start, end) = window();
        let reducer = AggregationReducer::new();
        let records = recovery_logs();

        let first = reducer.aggregate(&records, start, end);
        let second = reducer.aggregate(&records, start, end);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).expect("serialises"),
            serde_json::to_string(&second).expect("serialises")
        );
    }

    #[test]
    fn top_categories_rank_by_field_total() {
        let (start, end) = window();
        let mut records = recovery_logs();
        records.push(KpiRecord::new(at(6), "Crew").with_number("affected_passengers", 150.0));

        let top = top_categories(
            &records,
            TimeWindow::new(start, end),
            "affected_passengers",
            1,
        );

        assert_eq!(top.len(), 1);
        assert_eq!(top[0].category, "Weather");
        assert_eq!(top[0].records, 2);
        assert_eq!(top[0].field_total, 520.0);
        assert_eq!(top[0].impact, ImpactLevel::High);
    }

    #[test]
    fn most_frequent_category_prefers_first_seen_on_ties() {
        let (start, end) = window();
        let records = vec![
            KpiRecord::new(at(1), "DXB-KHI"),
            KpiRecord::new(at(2), "DXB-BOM"),
            KpiRecord::new(at(3), "DXB-BOM"),
            KpiRecord::new(at(4), "DXB-KHI"),
        ];

        let busiest = most_frequent_category(&records, TimeWindow::new(start, end))
            .expect("records present");
        assert_eq!(busiest.category, "DXB-KHI");
        assert_eq!(busiest.impact, ImpactLevel::Medium);

        assert!(most_frequent_category(&[], TimeWindow::new(start, end)).is_none());
    }

    #[test]
    fn impact_thresholds() {
        assert_eq!(ImpactLevel::from_affected(500.0), ImpactLevel::Medium);
        assert_eq!(ImpactLevel::from_affected(501.0), ImpactLevel::High);
        assert_eq!(ImpactLevel::from_affected(200.0), ImpactLevel::Low);
        assert_eq!(ImpactLevel::from_occurrences(4), ImpactLevel::High);
        assert_eq!(ImpactLevel::from_occurrences(1), ImpactLevel::Low);
        assert_eq!(ImpactLevel::from_active_count(11), ImpactLevel::High);
        assert_eq!(ImpactLevel::from_active_count(4), ImpactLevel::Medium);
        assert_eq!(ImpactLevel::from_active_count(3).label(), "Low");
    }

    #[test]
    fn parses_csv_exports() {
        let csv = "timestamp,category,affected_passengers,successful,notes_flag\n\
                   2025-03-14T01:00:00Z,Weather,180,true,\n\
                   2025-03-14 03:00:00,Crew,96,FALSE,false\n\
                   2025-03-15,Technical,,true,\n";

        let records = import::parse_records(Cursor::new(csv)).expect("parses");

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].timestamp, at(1));
        assert_eq!(records[0].number("affected_passengers"), Some(180.0));
        assert_eq!(records[0].flags.get("successful"), Some(&true));
        assert!(records[0].flags.get("notes_flag").is_none());
        assert_eq!(records[1].timestamp, at(3));
        assert_eq!(records[1].flags.get("successful"), Some(&false));
        assert_eq!(records[1].flags.get("notes_flag"), Some(&false));
        assert_eq!(records[2].category, "Technical");
        assert!(records[2].numeric_fields.is_empty());
    }

    #[test]
    fn csv_import_reports_bad_cells() {
        let missing = import::parse_records(Cursor::new("when,category\n2025-03-14,Crew\n"));
        assert!(matches!(missing, Err(ImportError::MissingColumn("timestamp"))));

        let bad_time = import::parse_records(Cursor::new("timestamp,category\nyesterday,Crew\n"));
        assert!(matches!(
            bad_time,
            Err(ImportError::InvalidTimestamp { row: 1, .. })
        ));

        let bad_value = import::parse_records(Cursor::new(
            "timestamp,category,cost\n2025-03-14,Crew,lots\n",
        ));
        assert!(matches!(
            bad_value,
            Err(ImportError::InvalidValue { ref column, .. }) if column == "cost"
        ));
    }
}
