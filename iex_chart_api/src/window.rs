//! End-of-day timestamps and the half-open window filter applied to chart records.
//!
//! Every record is placed at 23:59:59.000 UTC on its calendar date and kept only
//! when that instant lies strictly between the window bounds. A window starting
//! at midnight of a date therefore still includes that date, while a record whose
//! end-of-day equals the end bound is dropped.

use chrono::{NaiveDate, NaiveTime};

use crate::{types::ChartRecord, Error};

/// Offset from midnight to 23:59:59.000 on the same day.
pub const EOD_OFFSET_MILLIS: i64 = 86_399_000;

/// Millisecond interval used to select chart records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start_millis: i64,
    pub end_millis: i64,
}

impl TimeWindow {
    pub fn new(start_millis: i64, end_millis: i64) -> Self {
        Self {
            start_millis,
            end_millis,
        }
    }

    /// True when no end-of-day timestamp can fall inside the window.
    pub fn is_empty(&self) -> bool {
        self.start_millis >= self.end_millis
    }

    /// Both bounds are exclusive.
    pub fn contains(&self, eod_millis: i64) -> bool {
        self.start_millis < eod_millis && eod_millis < self.end_millis
    }
}

/// Parses `date` with `format` and returns 23:59:59.000 UTC of that day in Unix milliseconds.
pub fn eod_millis(date: &str, format: &str) -> Result<i64, Error> {
    let day = NaiveDate::parse_from_str(date, format).map_err(|e| {
        tracing::error!("Failed to parse record date '{}': {}", date, e);
        Error::InvalidDate {
            date: date.to_string(),
            source: e,
        }
    })?;
    let midnight = day.and_time(NaiveTime::MIN).and_utc().timestamp_millis();
    Ok(midnight + EOD_OFFSET_MILLIS)
}

/// Keeps the records whose end-of-day falls inside `window`, preserving order.
///
/// A single unparseable date fails the whole call; no partial result is returned.
pub fn filter_records(
    records: Vec<ChartRecord>,
    window: TimeWindow,
    date_format: &str,
) -> Result<Vec<ChartRecord>, Error> {
    if window.is_empty() {
        return Ok(Vec::new());
    }
    let mut kept = Vec::with_capacity(records.len());
    for record in records {
        if window.contains(eod_millis(&record.date, date_format)?) {
            kept.push(record);
        }
    }
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_DATE_FORMAT;

    const JAN_1_MIDNIGHT: i64 = 1_577_836_800_000;
    const JAN_1_EOD: i64 = 1_577_923_199_000;
    const JAN_2_EOD: i64 = 1_578_009_599_000;

    fn record(date: &str) -> ChartRecord {
        ChartRecord {
            date: date.to_string(),
            ..Default::default()
        }
    }

    fn dates(records: &[ChartRecord]) -> Vec<&str> {
        records.iter().map(|r| r.date.as_str()).collect()
    }

    #[test]
    fn eod_is_one_second_before_midnight() {
        assert_eq!(eod_millis("2020-01-01", DEFAULT_DATE_FORMAT).unwrap(), JAN_1_EOD);
        assert_eq!(eod_millis("2020-01-02", DEFAULT_DATE_FORMAT).unwrap(), JAN_2_EOD);
        assert_eq!(JAN_1_EOD - JAN_1_MIDNIGHT, EOD_OFFSET_MILLIS);
    }

    #[test]
    fn eod_before_epoch_is_negative() {
        assert_eq!(
            eod_millis("1969-12-31", DEFAULT_DATE_FORMAT).unwrap(),
            -86_400_000 + EOD_OFFSET_MILLIS
        );
    }

    #[test]
    fn eod_rejects_unparseable_date() {
        let err = eod_millis("01/02/2020", DEFAULT_DATE_FORMAT).unwrap_err();
        assert!(matches!(err, Error::InvalidDate { ref date, .. } if date == "01/02/2020"));
        assert!(eod_millis("", DEFAULT_DATE_FORMAT).is_err());
        assert!(eod_millis("2020-02-30", DEFAULT_DATE_FORMAT).is_err());
    }

    #[test]
    fn eod_honours_custom_format() {
        assert_eq!(eod_millis("01/01/2020", "%m/%d/%Y").unwrap(), JAN_1_EOD);
    }

    #[test]
    fn window_bounds_are_exclusive() {
        let window = TimeWindow::new(JAN_1_EOD, JAN_2_EOD);
        assert!(!window.contains(JAN_1_EOD));
        assert!(!window.contains(JAN_2_EOD));
        assert!(window.contains(JAN_1_EOD + 1));
        assert!(window.contains(JAN_2_EOD - 1));
    }

    #[test]
    fn window_emptiness() {
        assert!(TimeWindow::new(5, 5).is_empty());
        assert!(TimeWindow::new(6, 5).is_empty());
        assert!(!TimeWindow::new(4, 5).is_empty());
    }

    #[test]
    fn end_bound_equal_to_eod_excludes_record() {
        let records = vec![record("2020-01-01"), record("2020-01-02")];
        let window = TimeWindow::new(JAN_1_MIDNIGHT, JAN_2_EOD);
        let kept = filter_records(records, window, DEFAULT_DATE_FORMAT).unwrap();
        assert_eq!(dates(&kept), vec!["2020-01-01"]);
    }

    #[test]
    fn superset_window_keeps_everything_in_order() {
        let records = vec![
            record("2020-01-03"),
            record("2020-01-01"),
            record("2020-01-02"),
        ];
        let window = TimeWindow::new(i64::MIN, i64::MAX);
        let kept = filter_records(records.clone(), window, DEFAULT_DATE_FORMAT).unwrap();
        assert_eq!(kept, records);
    }

    #[test]
    fn window_outside_data_keeps_nothing() {
        let records = vec![record("2020-01-01"), record("2020-01-02")];
        let window = TimeWindow::new(0, JAN_1_MIDNIGHT);
        assert!(filter_records(records, window, DEFAULT_DATE_FORMAT)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn inverted_window_keeps_nothing_without_parsing() {
        let records = vec![record("not a date")];
        let window = TimeWindow::new(JAN_2_EOD, JAN_1_EOD);
        assert!(filter_records(records, window, DEFAULT_DATE_FORMAT)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn bad_date_fails_whole_filter() {
        let records = vec![record("2020-01-01"), record("garbage")];
        let window = TimeWindow::new(i64::MIN, i64::MAX);
        let err = filter_records(records, window, DEFAULT_DATE_FORMAT).unwrap_err();
        assert!(matches!(err, Error::InvalidDate { .. }));
    }

    #[test]
    fn every_kept_record_lies_strictly_inside() {
        let records: Vec<ChartRecord> = (1..=28)
            .map(|d| record(&format!("2020-02-{:02}", d)))
            .collect();
        let start = eod_millis("2020-02-05", DEFAULT_DATE_FORMAT).unwrap();
        let end = eod_millis("2020-02-20", DEFAULT_DATE_FORMAT).unwrap();
        let kept = filter_records(records, TimeWindow::new(start, end), DEFAULT_DATE_FORMAT).unwrap();
        assert_eq!(kept.len(), 14);
        assert_eq!(kept.first().unwrap().date, "2020-02-06");
        assert_eq!(kept.last().unwrap().date, "2020-02-19");
        for r in &kept {
            let eod = eod_millis(&r.date, DEFAULT_DATE_FORMAT).unwrap();
            assert!(start < eod && eod < end);
        }
    }
}
