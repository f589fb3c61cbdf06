//! KPI aggregation over imported disruption logs.

use std::io::Cursor;

use chrono::{TimeZone, Utc};
use ops_scoring::analytics::{
    import, most_frequent_category, top_categories, AggregationReducer, ImpactLevel, TimeWindow,
};

const DISRUPTIONS: &str = "\
timestamp,category,affectedPassengers,delayMinutes,resolved
2025-02-10T06:00:00Z,LHR-JFK,180,95,true
2025-02-10T09:15:00Z,LHR-JFK,240,40,false
2025-02-10 12:30:00,DXB-BOM,410,,true
2025-02-11,LHR-JFK,90,15,true
";

fn window() -> TimeWindow {
    TimeWindow::new(
        Utc.with_ymd_and_hms(2025, 2, 10, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2025, 2, 11, 0, 0, 0).unwrap(),
    )
}

#[test]
fn imported_day_is_summarised() {
    let records = import::parse_records(Cursor::new(DISRUPTIONS)).expect("valid csv");
    assert_eq!(records.len(), 4);

    let summary = AggregationReducer::new().aggregate_window(&records, window());

    assert_eq!(summary.record_count(), 3);
    assert_eq!(summary.count("LHR-JFK"), 2);
    assert_eq!(summary.count("DXB-BOM"), 1);
    assert_eq!(summary.total("affectedPassengers"), 830.0);
    // The blank delay cell counts as zero towards the mean.
    assert_eq!(summary.average("delayMinutes"), 45.0);
    assert!((summary.rate("resolved") - 2.0 / 3.0).abs() < 1e-12);
}

#[test]
fn aggregation_is_repeatable() {
    let records = import::parse_records(Cursor::new(DISRUPTIONS)).expect("valid csv");
    let reducer = AggregationReducer::new();
    let window = window();
    assert_eq!(
        reducer.aggregate(&records, window.start, window.end),
        reducer.aggregate(&records, window.start, window.end)
    );
}

#[test]
fn busiest_routes_and_stations() {
    let records = import::parse_records(Cursor::new(DISRUPTIONS)).expect("valid csv");

    let busiest = most_frequent_category(&records, window()).expect("records in window");
    assert_eq!(busiest.category, "LHR-JFK");
    assert_eq!(busiest.impact, ImpactLevel::Medium);

    let top = top_categories(&records, window(), "affectedPassengers", 1);
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].category, "LHR-JFK");
    assert_eq!(top[0].field_total, 420.0);
    assert_eq!(top[0].impact, ImpactLevel::Medium);
}

#[test]
fn empty_input_yields_zeros() {
    let summary = AggregationReducer::new().aggregate_window(&[], window());
    assert!(summary.is_empty());
    assert_eq!(summary.rate("resolved"), 0.0);
    assert_eq!(summary.average("delayMinutes"), 0.0);
}
