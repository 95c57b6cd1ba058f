use crate::errors::PvCalcError;
use chrono::{DateTime, FixedOffset};

/// A time-indexed table of weather station measurements covering the analysis
/// period, localised to the site's time zone. Columns are stored as parallel
/// vectors sharing the timestamp index; the table is read-only once built and
/// every derived series is a new allocation.
///
/// Arguments to [`WeatherSeries::new`]:
/// * `timestamps` - sample times, time-zone aware, strictly ascending (which
///                  also guarantees deduplication); regular spacing is not
///                  required and gaps are never imputed
/// * `ghi` - global horizontal irradiance, in W/m2
/// * `dni` - direct normal irradiance, in W/m2
/// * `dhi` - diffuse horizontal irradiance, in W/m2
/// * `air_temps` - dry bulb air temperature, in deg C
/// * `wind_speeds` - wind speed, in m/s
#[derive(Clone, Debug)]
pub struct WeatherSeries {
    timestamps: Vec<DateTime<FixedOffset>>,
    ghi: Vec<f64>,
    dni: Vec<f64>,
    dhi: Vec<f64>,
    air_temps: Vec<f64>,
    wind_speeds: Vec<f64>,
}

impl WeatherSeries {
    pub fn new(
        timestamps: Vec<DateTime<FixedOffset>>,
        ghi: Vec<f64>,
        dni: Vec<f64>,
        dhi: Vec<f64>,
        air_temps: Vec<f64>,
        wind_speeds: Vec<f64>,
    ) -> anyhow::Result<Self> {
        if timestamps.is_empty() {
            return Err(PvCalcError::MalformedWeather("table has no rows".into()).into());
        }
        for (name, column) in [
            ("ghi", &ghi),
            ("dni", &dni),
            ("dhi", &dhi),
            ("air_temp", &air_temps),
            ("wind_speed", &wind_speeds),
        ] {
            if column.len() != timestamps.len() {
                return Err(PvCalcError::MalformedWeather(format!(
                    "column {name} has {} values for {} timestamps",
                    column.len(),
                    timestamps.len()
                ))
                .into());
            }
        }
        if let Some(pair) = timestamps.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(PvCalcError::MalformedWeather(format!(
                "index is not strictly ascending at {} -> {}",
                pair[0], pair[1]
            ))
            .into());
        }

        Ok(Self {
            timestamps,
            ghi,
            dni,
            dhi,
            air_temps,
            wind_speeds,
        })
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[DateTime<FixedOffset>] {
        &self.timestamps
    }

    pub fn ghi(&self) -> &[f64] {
        &self.ghi
    }

    pub fn dni(&self) -> &[f64] {
        &self.dni
    }

    pub fn dhi(&self) -> &[f64] {
        &self.dhi
    }

    pub fn air_temps(&self) -> &[f64] {
        &self.air_temps
    }

    pub fn wind_speeds(&self) -> &[f64] {
        &self.wind_speeds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use rstest::*;

    fn stamps(hours: &[u32]) -> Vec<DateTime<FixedOffset>> {
        let offset = FixedOffset::west_opt(6 * 3600).unwrap();
        hours
            .iter()
            .map(|hour| {
                offset
                    .with_ymd_and_hms(2024, 3, 1, *hour, 0, 0)
                    .single()
                    .unwrap()
            })
            .collect()
    }

    #[rstest]
    fn should_accept_well_formed_table() {
        let weather = WeatherSeries::new(
            stamps(&[9, 10, 11]),
            vec![400., 600., 750.],
            vec![500., 700., 800.],
            vec![90., 110., 120.],
            vec![18., 21., 24.],
            vec![1.2, 1.5, 0.8],
        );
        assert_eq!(weather.unwrap().len(), 3);
    }

    #[rstest]
    fn should_reject_empty_table() {
        let weather = WeatherSeries::new(vec![], vec![], vec![], vec![], vec![], vec![]);
        assert!(weather.is_err());
    }

    #[rstest]
    fn should_reject_column_length_mismatch() {
        let weather = WeatherSeries::new(
            stamps(&[9, 10]),
            vec![400.],
            vec![500., 700.],
            vec![90., 110.],
            vec![18., 21.],
            vec![1.2, 1.5],
        );
        assert!(weather.is_err());
    }

    #[rstest]
    fn should_reject_unsorted_or_duplicated_index() {
        for hours in [[10u32, 9, 11], [9, 9, 11]] {
            let weather = WeatherSeries::new(
                stamps(&hours),
                vec![400., 600., 750.],
                vec![500., 700., 800.],
                vec![90., 110., 120.],
                vec![18., 21., 24.],
                vec![1.2, 1.5, 0.8],
            );
            assert!(weather.is_err());
        }
    }
}
