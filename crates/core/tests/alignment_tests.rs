// ═══════════════════════════════════════════════════════════════════
// Date Alignment Tests: extract_date, record selection, trend windows
// ═══════════════════════════════════════════════════════════════════

mod common;

use common::d;
use health_report_core::models::measurement::{Dated, TimeSeriesRecord, WeightEntry};
use health_report_core::services::alignment::{
    aligned_day, extract_date, newest, oldest, select_for_date, trend,
};

fn weight(ts: &str, lb: f64) -> WeightEntry {
    WeightEntry::new(ts, lb)
}

fn lb(e: &WeightEntry) -> Option<f64> {
    Some(e.weight_lb)
}

// ═══════════════════════════════════════════════════════════════════
// extract_date
// ═══════════════════════════════════════════════════════════════════

mod extract {
    use super::*;

    #[test]
    fn plain_date_is_unchanged() {
        assert_eq!(extract_date("2025-01-15"), "2025-01-15");
    }

    #[test]
    fn datetime_is_truncated_to_day() {
        assert_eq!(extract_date("2025-01-15T23:59:59Z"), "2025-01-15");
        assert_eq!(extract_date("2025-01-15T07:30:00+01:00"), "2025-01-15");
        assert_eq!(extract_date("2025-01-15 07:30"), "2025-01-15");
    }

    #[test]
    fn non_date_strings_pass_through() {
        assert_eq!(extract_date("yesterday"), "yesterday");
        assert_eq!(extract_date(""), "");
        assert_eq!(extract_date("2025/01/15"), "2025/01/15");
        assert_eq!(extract_date("2025-1-15"), "2025-1-15");
    }

    #[test]
    fn extracting_twice_changes_nothing() {
        for ts in ["2025-01-15", "2025-01-15T23:59:59Z", "2025-01-15 07:30", "garbage"] {
            let once = extract_date(ts);
            assert_eq!(extract_date(&once), once);
        }
    }

    #[test]
    fn records_align_through_the_trait() {
        let r = TimeSeriesRecord::new("2025-01-15T06:00:00Z", 18, 930.0);
        assert_eq!(r.aligned_date(), "2025-01-15");
        assert_eq!(aligned_day(&r), Some(d(2025, 1, 15)));
    }

    #[test]
    fn unparseable_day_has_no_aligned_date() {
        let r = TimeSeriesRecord::new("2025-13-45", 18, 1.0);
        assert_eq!(r.aligned_date(), "2025-13-45");
        assert_eq!(aligned_day(&r), None);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Selection
// ═══════════════════════════════════════════════════════════════════

mod selection {
    use super::*;

    #[test]
    fn select_matches_datetime_records_by_day() {
        let entries = vec![
            weight("2025-01-16T08:00:00Z", 195.0),
            weight("2025-01-15T21:10:00Z", 196.0),
        ];
        let hit = select_for_date(&entries, d(2025, 1, 15)).unwrap();
        assert_eq!(hit.weight_lb, 196.0);
    }

    #[test]
    fn select_keeps_first_match_in_input_order() {
        let entries = vec![
            weight("2025-01-15T07:00:00Z", 196.0),
            weight("2025-01-15T21:00:00Z", 197.0),
        ];
        assert_eq!(select_for_date(&entries, d(2025, 1, 15)).unwrap().weight_lb, 196.0);
    }

    #[test]
    fn select_misses_other_days() {
        let entries = vec![weight("2025-01-14", 196.0)];
        assert!(select_for_date(&entries, d(2025, 1, 15)).is_none());
    }

    #[test]
    fn newest_and_oldest_ignore_input_order() {
        let entries = vec![
            weight("2025-01-10", 198.0),
            weight("2025-01-15", 196.0),
            weight("2024-10-01", 210.0),
            weight("not a date", 1.0),
        ];
        assert_eq!(newest(&entries).unwrap().weight_lb, 196.0);
        assert_eq!(oldest(&entries).unwrap().weight_lb, 210.0);
    }

    #[test]
    fn ties_keep_the_first_seen() {
        let entries = vec![weight("2025-01-15", 1.0), weight("2025-01-15T10:00:00Z", 2.0)];
        assert_eq!(newest(&entries).unwrap().weight_lb, 1.0);
        assert_eq!(oldest(&entries).unwrap().weight_lb, 1.0);
    }

    #[test]
    fn empty_input_has_no_extremes() {
        let entries: Vec<WeightEntry> = Vec::new();
        assert!(newest(&entries).is_none());
        assert!(oldest(&entries).is_none());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Trend windows
// ═══════════════════════════════════════════════════════════════════

mod trend_windows {
    use super::*;

    #[test]
    fn seven_day_window_includes_both_edges() {
        let entries = vec![
            weight("2025-01-15", 196.0),
            weight("2025-01-09", 198.0), // first day of the window
            weight("2025-01-08", 500.0), // one day too old
        ];
        assert_eq!(trend(&entries, d(2025, 1, 15), 7, lb), Some(197.0));
    }

    #[test]
    fn late_evening_reading_on_end_day_counts() {
        let entries = vec![weight("2025-01-15T23:59:00Z", 196.0)];
        assert_eq!(trend(&entries, d(2025, 1, 15), 7, lb), Some(196.0));
    }

    #[test]
    fn future_readings_are_excluded() {
        let entries = vec![weight("2025-01-15", 196.0), weight("2025-01-16", 100.0)];
        assert_eq!(trend(&entries, d(2025, 1, 15), 7, lb), Some(196.0));
    }

    #[test]
    fn order_of_records_does_not_matter() {
        let a = vec![weight("2025-01-15", 196.0), weight("2025-01-10", 198.0)];
        let b = vec![weight("2025-01-10", 198.0), weight("2025-01-15", 196.0)];
        assert_eq!(trend(&a, d(2025, 1, 15), 30, lb), trend(&b, d(2025, 1, 15), 30, lb));
    }

    #[test]
    fn empty_window_is_absent() {
        let entries = vec![weight("2024-01-01", 200.0)];
        assert_eq!(trend(&entries, d(2025, 1, 15), 30, lb), None);
        assert_eq!(trend(&entries, d(2025, 1, 15), 0, lb), None);
    }

    #[test]
    fn one_day_window_is_just_the_end_day() {
        let entries = vec![weight("2025-01-15", 196.0), weight("2025-01-14", 197.0)];
        assert_eq!(trend(&entries, d(2025, 1, 15), 1, lb), Some(196.0));
    }

    #[test]
    fn field_extractor_can_skip_records() {
        let entries = vec![weight("2025-01-15", 196.0), weight("2025-01-14", -1.0)];
        let positive = |e: &WeightEntry| Some(e.weight_lb).filter(|v| *v > 0.0);
        assert_eq!(trend(&entries, d(2025, 1, 15), 7, positive), Some(196.0));
    }

    #[test]
    fn unparseable_timestamps_are_ignored() {
        let entries = vec![weight("2025-01-15", 196.0), weight("garbage", 1000.0)];
        assert_eq!(trend(&entries, d(2025, 1, 15), 90, lb), Some(196.0));
    }
}
