//! Peak-sun-hours statistics over a sweep of candidate tilts.

use crate::core::poa::transpose;
use crate::core::resample::{daily_sums, hourly_means, monthly_mean_of_daily};
use crate::core::units::{round_to_2dp, MONTH_NAMES, REFERENCE_IRRADIANCE};
use crate::input::SiteConfig;
use crate::weather::WeatherSeries;
use anyhow::bail;

/// Mean daily peak sun hours per calendar month for a fixed sweep of tilts.
/// Rows follow the sweep order and may repeat a tilt; columns are the months
/// present in the weather record, in chronological order, plus a row-wise
/// `Average`. Cells are in hours, rounded to 2 decimals.
#[derive(Clone, Debug, PartialEq)]
pub struct HspTable {
    /// month column labels, e.g. "January"
    pub months: Vec<String>,
    pub rows: Vec<HspRow>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HspRow {
    /// tilt label, e.g. "19.4°"
    pub label: String,
    pub monthly: Vec<f64>,
    pub average: f64,
}

/// The candidate tilts compared against the user's: flat, the selection
/// itself, 15 degrees either side of it, and vertical. Duplicates (e.g. a
/// 15-degree selection putting one offset at 0) are kept as separate rows,
/// and a selection under 15 degrees yields a negative candidate that is fed
/// to the transposition unclamped.
fn candidate_tilts(tilt: f64) -> [f64; 5] {
    [0., tilt, tilt - 15., tilt + 15., 90.]
}

/// Compute the peak-sun-hours table for the tilt sweep around the selection.
///
/// For every candidate tilt the plane-of-array global irradiance is resampled
/// to hourly means, summed per calendar day and divided by the reference
/// 1000 W/m2, giving kWh/m2/day numerically equal to hours of peak sun; daily
/// values are then averaged within each month.
pub fn hsp(
    weather: &WeatherSeries,
    site: &SiteConfig,
    tilt: f64,
    azimuth: f64,
) -> anyhow::Result<HspTable> {
    let mut months: Vec<String> = Vec::new();
    let mut rows = Vec::with_capacity(5);

    for candidate in candidate_tilts(tilt) {
        let poa = transpose(weather, site, candidate, azimuth)?;
        let hourly = hourly_means(&poa.timestamps, &poa.poa_global);
        let daily: Vec<_> = daily_sums(&hourly)
            .into_iter()
            .map(|(date, sum)| (date, sum / REFERENCE_IRRADIANCE))
            .collect();
        let monthly = monthly_mean_of_daily(&daily);

        let labels: Vec<String> = monthly
            .iter()
            .map(|entry| MONTH_NAMES[(entry.month - 1) as usize].to_string())
            .collect();
        if months.is_empty() {
            months = labels;
        } else if months != labels {
            bail!("tilt sweep produced mismatched month columns");
        }

        let monthly: Vec<f64> = monthly
            .iter()
            .map(|entry| round_to_2dp(entry.value))
            .collect();
        let average = round_to_2dp(monthly.iter().sum::<f64>() / monthly.len() as f64);
        rows.push(HspRow {
            label: tilt_label(candidate),
            monthly,
            average,
        });
    }

    Ok(HspTable { months, rows })
}

/// Row label for a candidate tilt, shown to one decimal where needed so that
/// offset arithmetic noise (19.4 - 15) does not leak into the table.
fn tilt_label(tilt: f64) -> String {
    format!("{}°", (tilt * 10.).round() / 10.)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::{site, synthetic_weather_day, synthetic_weather_year};
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn labels_follow_the_sweep_including_duplicates() {
        assert_eq!(candidate_tilts(15.), [0., 15., 0., 30., 90.]);
        assert_eq!(tilt_label(19.4 - 15.), "4.4°");
        assert_eq!(tilt_label(0.), "0°");
        assert_eq!(tilt_label(90.), "90°");
    }

    #[rstest]
    fn full_year_table_has_twelve_months_and_average() {
        let weather = synthetic_weather_year(2023);
        let table = hsp(&weather, &site(), 19.4, 180.).unwrap();
        assert_eq!(table.months.len(), 12);
        assert_eq!(table.months[0], "January");
        assert_eq!(table.months[11], "December");
        assert_eq!(table.rows.len(), 5);
        assert_eq!(
            table
                .rows
                .iter()
                .map(|row| row.label.as_str())
                .collect::<Vec<_>>(),
            vec!["0°", "19.4°", "4.4°", "34.4°", "90°"]
        );
        for row in &table.rows {
            assert_eq!(row.monthly.len(), 12);
            for value in row.monthly.iter().chain([&row.average]) {
                assert!(
                    (0. ..=24.).contains(value),
                    "daily peak sun hours {value} outside 0..24 for row {}",
                    row.label
                );
            }
        }
    }

    #[rstest]
    fn partial_year_only_lists_months_present() {
        let weather = synthetic_weather_day(2024, 3, 1);
        let table = hsp(&weather, &site(), 19.4, 180.).unwrap();
        assert_eq!(table.months, vec!["March".to_string()]);
        for row in &table.rows {
            assert_eq!(row.monthly.len(), 1);
            // a single month is its own average
            assert_eq!(row.average, row.monthly[0]);
        }
    }

    #[rstest]
    fn identical_inputs_yield_identical_tables() {
        let weather = synthetic_weather_year(2023);
        let first = hsp(&weather, &site(), 19.4, 180.).unwrap();
        let second = hsp(&weather, &site(), 19.4, 180.).unwrap();
        assert_eq!(first, second);
    }

    #[rstest]
    fn duplicate_tilt_rows_are_not_deduplicated() {
        let weather = synthetic_weather_day(2024, 3, 1);
        let table = hsp(&weather, &site(), 15., 180.).unwrap();
        assert_eq!(table.rows.len(), 5);
        assert_eq!(table.rows[0].label, "0°");
        assert_eq!(table.rows[2].label, "0°");
        assert_eq!(table.rows[0].monthly, table.rows[2].monthly);
    }
}
