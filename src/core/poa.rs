//! Transposition of measured horizontal irradiance onto the plane of array.

use crate::core::units::Azimuth360;
use crate::errors::PvCalcError;
use crate::input::SiteConfig;
use crate::solar::{inclined_surface_irradiance, solar_position};
use crate::weather::WeatherSeries;
use chrono::{DateTime, FixedOffset};

/// Plane-of-array irradiance aligned 1:1 with the weather index it was
/// derived from. Recomputed in full whenever the orientation or the weather
/// table changes; no interpolation or gap-filling happens here.
#[derive(Clone, Debug, PartialEq)]
pub struct PoaIrradiance {
    pub timestamps: Vec<DateTime<FixedOffset>>,
    pub poa_global: Vec<f64>,
    pub poa_direct: Vec<f64>,
    pub poa_diffuse: Vec<f64>,
}

impl PoaIrradiance {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Project the measured ghi/dni/dhi components onto a plane with the given
/// tilt and azimuth bearing.
///
/// Arguments:
/// * `weather` - the weather table for the analysis period
/// * `site` - coordinates used for the solar position, plus ground albedo
/// * `tilt` - plane tilt from horizontal, in degrees; out-of-range values are
///            passed through the trigonometry unclamped
/// * `azimuth` - plane azimuth bearing, 0 to 360, 180 = equator-facing
pub fn transpose(
    weather: &WeatherSeries,
    site: &SiteConfig,
    tilt: f64,
    azimuth: f64,
) -> anyhow::Result<PoaIrradiance> {
    if weather.is_empty() {
        return Err(PvCalcError::MalformedWeather("table has no rows".into()).into());
    }
    let orientation = Azimuth360::new(azimuth)?.transform_to_180();

    let mut poa_global = Vec::with_capacity(weather.len());
    let mut poa_direct = Vec::with_capacity(weather.len());
    let mut poa_diffuse = Vec::with_capacity(weather.len());
    for (i, timestamp) in weather.timestamps().iter().enumerate() {
        let position = solar_position(timestamp, site.latitude, site.longitude);
        let irradiance = inclined_surface_irradiance(
            &position,
            site.latitude,
            weather.ghi()[i],
            weather.dni()[i],
            weather.dhi()[i],
            tilt,
            orientation,
            site.ground_reflectivity,
        );
        poa_direct.push(irradiance.direct);
        poa_diffuse.push(irradiance.diffuse);
        poa_global.push(irradiance.global);
    }

    Ok(PoaIrradiance {
        timestamps: weather.timestamps().to_vec(),
        poa_global,
        poa_direct,
        poa_diffuse,
    })
}
