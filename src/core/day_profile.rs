//! Hourly slices of a single calendar day, backing the measured-vs-POA
//! comparison, the daily AC power curve and the peak-sun-hours definition
//! overlay. A date outside the loaded record is a hard error; the caller must
//! not be left silently plotting an empty chart.

use crate::core::hsp::HspTable;
use crate::core::poa::PoaIrradiance;
use crate::core::power::PowerResult;
use crate::core::resample::{hourly_means, HourKey, HourlySeries};
use crate::core::units::REFERENCE_IRRADIANCE;
use crate::errors::PvCalcError;
use crate::weather::WeatherSeries;
use chrono::NaiveDate;

/// Hourly means of the measured horizontal components next to the transposed
/// plane-of-array components, for one day.
#[derive(Clone, Debug, PartialEq)]
pub struct IrradianceComparisonDay {
    pub date: NaiveDate,
    pub hours: Vec<u32>,
    pub ghi: Vec<f64>,
    pub dni: Vec<f64>,
    pub dhi: Vec<f64>,
    pub poa_global: Vec<f64>,
    pub poa_direct: Vec<f64>,
    pub poa_diffuse: Vec<f64>,
}

/// Hourly mean AC power of one module for one day, in W.
#[derive(Clone, Debug, PartialEq)]
pub struct AcPowerDay {
    pub date: NaiveDate,
    pub hours: Vec<u32>,
    pub ac_power: Vec<f64>,
}

/// The peak-sun-hours definition drawn over one day's irradiance curve: a
/// window as wide as the selection's annual-average HSP, centred on the hour
/// of maximum plane-of-array irradiance, against the 1000 W/m2 reference.
#[derive(Clone, Debug, PartialEq)]
pub struct HspWindow {
    pub date: NaiveDate,
    pub hours: Vec<u32>,
    pub poa_global: Vec<f64>,
    /// start of the window, in decimal hours of the day
    pub window_start: f64,
    /// end of the window, in decimal hours of the day
    pub window_end: f64,
    pub reference_irradiance: f64,
}

fn day_slice(hourly: &HourlySeries, date: NaiveDate) -> Result<(Vec<u32>, Vec<f64>), PvCalcError> {
    let day: Vec<(&HourKey, &f64)> = hourly
        .hours
        .iter()
        .zip(&hourly.values)
        .filter(|(key, _)| key.date == date)
        .collect();
    if day.is_empty() {
        return Err(PvCalcError::DegenerateWeatherWindow { date });
    }

    Ok((
        day.iter().map(|(key, _)| key.hour).collect(),
        day.iter().map(|(_, value)| **value).collect(),
    ))
}

/// Measured horizontal irradiance next to its plane-of-array transposition
/// for a single day, both as hourly means.
pub fn irradiance_comparison_day(
    weather: &WeatherSeries,
    poa: &PoaIrradiance,
    date: NaiveDate,
) -> anyhow::Result<IrradianceComparisonDay> {
    let slice = |values: &[f64]| -> Result<(Vec<u32>, Vec<f64>), PvCalcError> {
        day_slice(&hourly_means(weather.timestamps(), values), date)
    };
    let (hours, ghi) = slice(weather.ghi())?;
    let (_, dni) = slice(weather.dni())?;
    let (_, dhi) = slice(weather.dhi())?;
    let (_, poa_global) = day_slice(&hourly_means(&poa.timestamps, &poa.poa_global), date)?;
    let (_, poa_direct) = day_slice(&hourly_means(&poa.timestamps, &poa.poa_direct), date)?;
    let (_, poa_diffuse) = day_slice(&hourly_means(&poa.timestamps, &poa.poa_diffuse), date)?;

    Ok(IrradianceComparisonDay {
        date,
        hours,
        ghi,
        dni,
        dhi,
        poa_global,
        poa_direct,
        poa_diffuse,
    })
}

/// Hourly mean AC power for a single day.
pub fn ac_power_day(power: &PowerResult, date: NaiveDate) -> anyhow::Result<AcPowerDay> {
    let hourly = hourly_means(&power.timestamps, &power.ac_power);
    let (hours, ac_power) = day_slice(&hourly, date)?;

    Ok(AcPowerDay {
        date,
        hours,
        ac_power,
    })
}

/// Overlay the selection's annual-average peak sun hours on one day's
/// plane-of-array irradiance curve. The second sweep row is the selection's
/// own tilt; its average spans the window.
pub fn hsp_definition_window(
    poa: &PoaIrradiance,
    hsp_table: &HspTable,
    date: NaiveDate,
) -> anyhow::Result<HspWindow> {
    let annual_average = hsp_table
        .rows
        .get(1)
        .map(|row| row.average)
        .ok_or_else(|| anyhow::anyhow!("peak-sun-hours table is missing the selection tilt row"))?;
    let hourly = hourly_means(&poa.timestamps, &poa.poa_global);
    let (hours, poa_global) = day_slice(&hourly, date)?;

    let peak_position = poa_global
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(i, _)| i)
        .unwrap_or(0);
    let centre = hours[peak_position] as f64;
    let window_start = centre - annual_average / 2.;
    let window_end = centre + annual_average / 2.;

    Ok(HspWindow {
        date,
        hours,
        poa_global,
        window_start,
        window_end,
        reference_irradiance: REFERENCE_IRRADIANCE,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hsp::hsp;
    use crate::core::poa::transpose;
    use crate::core::power::power;
    use crate::core::test_support::{module, site, synthetic_weather_day};
    use crate::input::{InverterEfficiency, MountingAssembly};
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[rstest]
    fn comparison_day_slices_all_six_series(date: NaiveDate) {
        let weather = synthetic_weather_day(2024, 3, 1);
        let poa = transpose(&weather, &site(), 19.4, 180.).unwrap();
        let day = irradiance_comparison_day(&weather, &poa, date).unwrap();
        assert_eq!(day.hours.len(), 24);
        assert_eq!(day.hours[0], 0);
        assert_eq!(day.ghi.len(), 24);
        assert_eq!(day.poa_diffuse.len(), 24);
    }

    #[rstest]
    fn out_of_range_date_raises_degenerate_window(date: NaiveDate) {
        let weather = synthetic_weather_day(2024, 3, 1);
        let poa = transpose(&weather, &site(), 19.4, 180.).unwrap();
        let missing = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let error = irradiance_comparison_day(&weather, &poa, missing).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<PvCalcError>(),
            Some(PvCalcError::DegenerateWeatherWindow { .. })
        ));

        let result = power(
            &weather,
            &poa,
            MountingAssembly::OpenRackGlassPolymer,
            &module(),
            InverterEfficiency::new(0.98).unwrap(),
        )
        .unwrap();
        assert!(ac_power_day(&result, missing).is_err());
        assert!(ac_power_day(&result, date).is_ok());
    }

    #[rstest]
    fn hsp_window_is_centred_on_the_irradiance_peak(date: NaiveDate) {
        let weather = synthetic_weather_day(2024, 3, 1);
        let poa = transpose(&weather, &site(), 19.4, 180.).unwrap();
        let table = hsp(&weather, &site(), 19.4, 180.).unwrap();
        let window = hsp_definition_window(&poa, &table, date).unwrap();
        let width = window.window_end - window.window_start;
        approx::assert_relative_eq!(width, table.rows[1].average, max_relative = 1e-12);
        assert_eq!(window.reference_irradiance, 1000.);
        // the peak of a morning-to-evening curve sits in the middle of the day
        let centre = (window.window_start + window.window_end) / 2.;
        assert!((10. ..=14.).contains(&centre), "peak centre at {centre}");
    }
}
