//! Reduction of the raw 3-hourly sample list into per-date summaries.
//!
//! Pure and single-pass: correctness depends only on stable insertion-order
//! iteration of the per-date slots, never on sorting.

use chrono::{DateTime, NaiveDate, TimeZone};

use crate::model::{DailySummary, RawSample};

/// Default number of daily summaries kept for display.
pub const DEFAULT_DAY_LIMIT: usize = 5;

/// Reduce `samples` to one [`DailySummary`] per calendar date in the local
/// timezone, truncated to `limit` entries.
pub fn aggregate(samples: &[RawSample], limit: usize) -> Vec<DailySummary> {
    aggregate_in(samples, limit, &chrono::Local)
}

/// Timezone-explicit variant of [`aggregate`].
///
/// Samples are grouped by the calendar date of their timestamp in `tz`, in
/// input order. The first sample of a date seeds all five fields of its
/// summary; later samples of the same date only widen the temperature
/// extrema. Output order is first-occurrence order of the dates, and the
/// truncation to `limit` happens after the full pass, exactly as the slots
/// were inserted.
pub fn aggregate_in<Tz: TimeZone>(
    samples: &[RawSample],
    limit: usize,
    tz: &Tz,
) -> Vec<DailySummary> {
    let mut days: Vec<DailySummary> = Vec::new();

    for sample in samples {
        let Some(date) = date_key(sample.timestamp, tz) else {
            // Timestamp outside chrono's representable range; nothing
            // sensible to group it under.
            continue;
        };

        match days.iter_mut().find(|d| d.date == date) {
            Some(day) => {
                day.min_temp = day.min_temp.min(sample.min_temp);
                day.max_temp = day.max_temp.max(sample.max_temp);
                // pressure/humidity stay at the first sample's values
            }
            None => days.push(DailySummary {
                date,
                min_temp: sample.min_temp,
                max_temp: sample.max_temp,
                pressure: sample.pressure,
                humidity: sample.humidity,
            }),
        }
    }

    days.truncate(limit);
    days
}

fn date_key<Tz: TimeZone>(timestamp: i64, tz: &Tz) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp, 0).map(|utc| utc.with_timezone(tz).date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    const DAY: i64 = 86_400;

    fn sample(ts: i64, min: f64, max: f64, pressure: u32, humidity: u8) -> RawSample {
        RawSample { timestamp: ts, min_temp: min, max_temp: max, pressure, humidity }
    }

    #[test]
    fn worked_example_two_days() {
        // day1 00:00, day1 03:00, day2 00:00
        let samples = [
            sample(0, 10.0, 15.0, 1000, 50),
            sample(3 * 3600, 8.0, 16.0, 990, 40),
            sample(DAY, 5.0, 12.0, 1005, 60),
        ];

        let days = aggregate_in(&samples, 5, &Utc);

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].min_temp, 8.0);
        assert_eq!(days[0].max_temp, 16.0);
        assert_eq!(days[0].pressure, 1000);
        assert_eq!(days[0].humidity, 50);
        assert_eq!(days[1].min_temp, 5.0);
        assert_eq!(days[1].max_temp, 12.0);
        assert_eq!(days[1].pressure, 1005);
        assert_eq!(days[1].humidity, 60);
    }

    #[test]
    fn one_entry_per_date_in_first_occurrence_order() {
        // Interleaved: day2, day1, day2, day1 — day2 must come out first.
        let samples = [
            sample(DAY, 1.0, 2.0, 1000, 10),
            sample(0, 3.0, 4.0, 1001, 11),
            sample(DAY + 3 * 3600, 5.0, 6.0, 1002, 12),
            sample(3 * 3600, 7.0, 8.0, 1003, 13),
        ];

        let days = aggregate_in(&samples, 5, &Utc);

        assert_eq!(days.len(), 2);
        assert!(days[0].date > days[1].date, "first-occurrence order, not sorted");
    }

    #[test]
    fn extrema_span_all_samples_of_a_date() {
        let samples = [
            sample(0, 10.0, 11.0, 1000, 50),
            sample(3 * 3600, 4.0, 9.0, 990, 40),
            sample(6 * 3600, 12.0, 19.0, 980, 30),
        ];

        let days = aggregate_in(&samples, 5, &Utc);

        assert_eq!(days.len(), 1);
        assert_eq!(days[0].min_temp, 4.0);
        assert_eq!(days[0].max_temp, 19.0);
    }

    #[test]
    fn pressure_and_humidity_pinned_to_first_sample() {
        let samples = [
            sample(0, 10.0, 11.0, 1000, 50),
            sample(3 * 3600, 10.0, 11.0, 875, 99),
        ];

        let days = aggregate_in(&samples, 5, &Utc);

        assert_eq!(days[0].pressure, 1000);
        assert_eq!(days[0].humidity, 50);
    }

    #[test]
    fn truncates_to_limit_after_full_pass() {
        let samples: Vec<RawSample> =
            (0..7i64).map(|d| sample(d * DAY, d as f64, 20.0, 1000, 50)).collect();

        let days = aggregate_in(&samples, 5, &Utc);

        assert_eq!(days.len(), 5);
        assert_eq!(days[0].min_temp, 0.0);
        assert_eq!(days[4].min_temp, 4.0);
    }

    #[test]
    fn length_is_distinct_date_count_when_under_limit() {
        let samples = [sample(0, 1.0, 2.0, 1000, 50), sample(DAY, 1.0, 2.0, 1000, 50)];
        assert_eq!(aggregate_in(&samples, 5, &Utc).len(), 2);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(aggregate_in(&[], 5, &Utc).is_empty());
    }

    #[test]
    fn unrepresentable_timestamps_are_skipped() {
        let samples = [sample(i64::MAX, 1.0, 2.0, 1000, 50), sample(0, 3.0, 4.0, 1001, 51)];
        let days = aggregate_in(&samples, 5, &Utc);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].min_temp, 3.0);
    }
}
