//! Calendar-aware regrouping of time-indexed series. Every aggregation over
//! sub-hourly samples goes through an hourly-mean resample first; summing raw
//! sub-hourly power directly would over-count energy.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Timelike};
use itertools::Itertools;

/// One value per clock hour that has at least one sample, keyed by local date
/// and hour of day. Hours absent from the source stay absent.
#[derive(Clone, Debug, PartialEq)]
pub struct HourlySeries {
    pub hours: Vec<HourKey>,
    pub values: Vec<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HourKey {
    pub date: NaiveDate,
    pub hour: u32,
}

/// A per-calendar-month aggregate, in chronological order of appearance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonthlyValue {
    pub year: i32,
    /// calendar month, 1 to 12
    pub month: u32,
    pub value: f64,
}

/// Mean of the instantaneous samples within each clock hour.
pub fn hourly_means(timestamps: &[DateTime<FixedOffset>], values: &[f64]) -> HourlySeries {
    let mut hours = Vec::new();
    let mut means = Vec::new();
    let chunks = timestamps
        .iter()
        .zip(values)
        .chunk_by(|(timestamp, _)| (timestamp.date_naive(), timestamp.hour()));
    for ((date, hour), chunk) in &chunks {
        let (count, sum) = chunk.fold((0usize, 0.), |(count, sum), (_, value)| {
            (count + 1, sum + value)
        });
        hours.push(HourKey { date, hour });
        means.push(sum / count as f64);
    }

    HourlySeries {
        hours,
        values: means,
    }
}

/// Sum of hourly values within each calendar day.
pub fn daily_sums(hourly: &HourlySeries) -> Vec<(NaiveDate, f64)> {
    let mut daily = Vec::new();
    let chunks = hourly
        .hours
        .iter()
        .zip(&hourly.values)
        .chunk_by(|(key, _)| key.date);
    for (date, chunk) in &chunks {
        daily.push((date, chunk.map(|(_, value)| value).sum()));
    }

    daily
}

/// Mean of daily values within each calendar month.
pub fn monthly_mean_of_daily(daily: &[(NaiveDate, f64)]) -> Vec<MonthlyValue> {
    let mut monthly = Vec::new();
    let chunks = daily
        .iter()
        .chunk_by(|(date, _)| (date.year(), date.month()));
    for ((year, month), chunk) in &chunks {
        let (count, sum) = chunk.fold((0usize, 0.), |(count, sum), (_, value)| {
            (count + 1, sum + value)
        });
        monthly.push(MonthlyValue {
            year,
            month,
            value: sum / count as f64,
        });
    }

    monthly
}

/// Sum of hourly values within each calendar month.
pub fn monthly_sums(hourly: &HourlySeries) -> Vec<MonthlyValue> {
    let mut monthly = Vec::new();
    let chunks = hourly
        .hours
        .iter()
        .zip(&hourly.values)
        .chunk_by(|(key, _)| (key.date.year(), key.date.month()));
    for ((year, month), chunk) in &chunks {
        monthly.push(MonthlyValue {
            year,
            month,
            value: chunk.map(|(_, value)| value).sum(),
        });
    }

    monthly
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{FixedOffset, TimeZone};
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn ten_minute_stamps(count: usize) -> Vec<DateTime<FixedOffset>> {
        let offset = FixedOffset::west_opt(6 * 3600).unwrap();
        let start = offset
            .with_ymd_and_hms(2024, 1, 31, 22, 0, 0)
            .single()
            .unwrap();
        (0..count)
            .map(|i| start + chrono::Duration::minutes(10 * i as i64))
            .collect()
    }

    #[rstest]
    fn should_average_samples_within_each_hour() {
        // two full hours of 10-minute samples
        let timestamps = ten_minute_stamps(12);
        let values = vec![0., 60., 120., 180., 240., 300., 10., 10., 10., 10., 10., 10.];
        let hourly = hourly_means(&timestamps, &values);
        assert_eq!(hourly.hours.len(), 2);
        assert_eq!(hourly.hours[0].hour, 22);
        assert_relative_eq!(hourly.values[0], 150.);
        assert_relative_eq!(hourly.values[1], 10.);
    }

    #[rstest]
    fn should_keep_partial_hours_as_their_own_mean() {
        let timestamps = ten_minute_stamps(7);
        let values = vec![6., 6., 6., 6., 6., 6., 42.];
        let hourly = hourly_means(&timestamps, &values);
        assert_eq!(hourly.values, vec![6., 42.]);
    }

    #[rstest]
    fn should_group_days_and_months_across_boundaries() {
        // 2024-01-31 22:00 .. 2024-02-01 01:50, crossing day and month
        let timestamps = ten_minute_stamps(24);
        let values = vec![1.; 24];
        let hourly = hourly_means(&timestamps, &values);
        let daily = daily_sums(&hourly);
        assert_eq!(
            daily,
            vec![
                (NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(), 2.),
                (NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(), 2.),
            ]
        );

        let monthly = monthly_sums(&hourly);
        assert_eq!(monthly.len(), 2);
        assert_eq!((monthly[0].month, monthly[1].month), (1, 2));

        let means = monthly_mean_of_daily(&daily);
        assert_eq!(means[0].value, 2.);
        assert_eq!(means[1].value, 2.);
    }

    #[rstest]
    fn monthly_sums_conserve_the_hourly_total() {
        let timestamps = ten_minute_stamps(24);
        let values: Vec<f64> = (0..24).map(|i| i as f64 * 3.5).collect();
        let hourly = hourly_means(&timestamps, &values);
        let direct_total: f64 = hourly.values.iter().sum();
        let monthly_total: f64 = monthly_sums(&hourly).iter().map(|m| m.value).sum();
        assert_relative_eq!(direct_total, monthly_total, max_relative = 1e-12);
    }
}
