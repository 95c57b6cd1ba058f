//! Shared fixtures for the pipeline tests: a Temixco-like site and synthetic
//! weather records with a half-sine daylight profile.

use crate::input::{ModuleSpec, SiteConfig};
use crate::weather::WeatherSeries;
use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, TimeZone, Timelike};
use std::f64::consts::PI;

pub(crate) fn site() -> SiteConfig {
    SiteConfig {
        latitude: 18.85,
        longitude: -99.23,
        ground_reflectivity: 0.2,
    }
}

pub(crate) fn module() -> ModuleSpec {
    ModuleSpec {
        rated_power_dc: 550.,
        temperature_coefficient: -0.004,
    }
}

fn offset() -> FixedOffset {
    FixedOffset::west_opt(6 * 3600).unwrap()
}

/// Irradiance shape for a clear day: zero outside 06:00-18:00, half sine in
/// between.
fn daylight_factor(timestamp: &DateTime<FixedOffset>) -> f64 {
    let decimal_hour = timestamp.hour() as f64 + timestamp.minute() as f64 / 60.;
    if !(6. ..=18.).contains(&decimal_hour) {
        return 0.;
    }
    (PI * (decimal_hour - 6.) / 12.).sin().max(0.)
}

/// Seasonal amplitude, swinging generation roughly 20 % around the mean with
/// its peak at midsummer.
fn seasonal_scale(timestamp: &DateTime<FixedOffset>) -> f64 {
    let day_of_year = timestamp.date_naive().ordinal() as f64;
    0.9 + 0.2 * (2. * PI * (day_of_year - 172.) / 365.).cos()
}

fn rows_for(timestamps: Vec<DateTime<FixedOffset>>) -> WeatherSeries {
    let factors: Vec<f64> = timestamps
        .iter()
        .map(|ts| daylight_factor(ts) * seasonal_scale(ts))
        .collect();
    let ghi = factors.iter().map(|x| 800. * x).collect();
    let dni = factors.iter().map(|x| 700. * x).collect();
    let dhi = factors.iter().map(|x| 150. * x).collect();
    let air_temps = factors.iter().map(|x| 18. + 10. * x).collect();
    let wind_speeds = vec![1.5; factors.len()];

    WeatherSeries::new(timestamps, ghi, dni, dhi, air_temps, wind_speeds)
        .expect("synthetic weather table must be well-formed")
}

/// One calendar day of 10-minute samples, 144 rows.
pub(crate) fn synthetic_weather_day(year: i32, month: u32, day: u32) -> WeatherSeries {
    let start = offset()
        .with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap();
    rows_for(
        (0..144)
            .map(|i| start + Duration::minutes(10 * i))
            .collect(),
    )
}

/// A full year of hourly samples, 8760 rows for a non-leap year.
pub(crate) fn synthetic_weather_year(year: i32) -> WeatherSeries {
    let days = NaiveDate::from_ymd_opt(year + 1, 1, 1)
        .unwrap()
        .signed_duration_since(NaiveDate::from_ymd_opt(year, 1, 1).unwrap())
        .num_days();
    let start = offset()
        .with_ymd_and_hms(year, 1, 1, 0, 0, 0)
        .single()
        .unwrap();
    rows_for((0..days * 24).map(|i| start + Duration::hours(i)).collect())
}
