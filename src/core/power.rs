//! Cell temperature and DC/AC power conversion for a single module.

use crate::core::poa::PoaIrradiance;
use crate::core::units::REFERENCE_IRRADIANCE;
use crate::errors::PvCalcError;
use crate::input::{InverterEfficiency, ModuleSpec, MountingAssembly};
use crate::weather::WeatherSeries;
use chrono::{DateTime, FixedOffset};

/// Empirically derived SAPM cell temperature parameters (Sandia Array
/// Performance Model, King et al. 2004, table of published mounting
/// configurations). `a` and `b` shape the wind-dependent exponential of the
/// module-back temperature rise; `delta_t` is the cell-to-back offset at
/// reference irradiance, in deg C.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SapmParameters {
    pub a: f64,
    pub b: f64,
    pub delta_t: f64,
}

const SAPM_OPEN_RACK_GLASS_GLASS: SapmParameters = SapmParameters {
    a: -3.47,
    b: -0.0594,
    delta_t: 3.,
};
const SAPM_CLOSE_MOUNT_GLASS_GLASS: SapmParameters = SapmParameters {
    a: -2.98,
    b: -0.0471,
    delta_t: 1.,
};
const SAPM_OPEN_RACK_GLASS_POLYMER: SapmParameters = SapmParameters {
    a: -3.56,
    b: -0.075,
    delta_t: 3.,
};
const SAPM_INSULATED_BACK_GLASS_POLYMER: SapmParameters = SapmParameters {
    a: -2.81,
    b: -0.0455,
    delta_t: 0.,
};

impl MountingAssembly {
    /// Each assembly resolves to exactly one parameter set.
    pub fn sapm_parameters(&self) -> SapmParameters {
        match self {
            MountingAssembly::OpenRackGlassGlass => SAPM_OPEN_RACK_GLASS_GLASS,
            MountingAssembly::CloseMountGlassGlass => SAPM_CLOSE_MOUNT_GLASS_GLASS,
            MountingAssembly::OpenRackGlassPolymer => SAPM_OPEN_RACK_GLASS_POLYMER,
            MountingAssembly::InsulatedBackGlassPolymer => SAPM_INSULATED_BACK_GLASS_POLYMER,
        }
    }
}

/// Steady-state cell temperature from the SAPM thermal model, in deg C.
/// Monotonic in `poa_global` with the other inputs held fixed.
pub fn cell_temperature(
    poa_global: f64,
    air_temp: f64,
    wind_speed: f64,
    parameters: &SapmParameters,
) -> f64 {
    let module_temp = poa_global * f64::exp(parameters.a + parameters.b * wind_speed) + air_temp;
    module_temp + (poa_global / REFERENCE_IRRADIANCE) * parameters.delta_t
}

/// DC power of one module under the PVWatts model, anchored at 1000 W/m2 and
/// a cell temperature of 25 deg C, in W.
pub fn pvwatts_dc(poa_global: f64, cell_temperature: f64, module: &ModuleSpec) -> f64 {
    (poa_global / REFERENCE_IRRADIANCE)
        * module.rated_power_dc
        * (1. + module.temperature_coefficient * (cell_temperature - CELL_REFERENCE_TEMP))
}

const CELL_REFERENCE_TEMP: f64 = 25.;

/// The combined POA + power table: plane-of-array components plus the AC
/// power of a single module, on the weather index, in W at the source
/// resolution. Energy integration elsewhere resamples to hourly means first.
#[derive(Clone, Debug, PartialEq)]
pub struct PowerResult {
    pub timestamps: Vec<DateTime<FixedOffset>>,
    pub poa_global: Vec<f64>,
    pub poa_direct: Vec<f64>,
    pub poa_diffuse: Vec<f64>,
    pub ac_power: Vec<f64>,
}

impl PowerResult {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Convert plane-of-array irradiance into per-module AC power.
///
/// Arguments:
/// * `weather` - the weather table supplying air temperature and wind speed
/// * `poa` - transposed irradiance on the same index
/// * `assembly` - mounting configuration keying the thermal parameter set
/// * `module` - nameplate data of the selected module
/// * `inverter_efficiency` - scalar DC to AC derate; no clipping model
pub fn power(
    weather: &WeatherSeries,
    poa: &PoaIrradiance,
    assembly: MountingAssembly,
    module: &ModuleSpec,
    inverter_efficiency: InverterEfficiency,
) -> anyhow::Result<PowerResult> {
    if poa.len() != weather.len() {
        return Err(PvCalcError::MalformedWeather(format!(
            "plane-of-array table has {} rows for {} weather rows",
            poa.len(),
            weather.len()
        ))
        .into());
    }
    let parameters = assembly.sapm_parameters();

    let ac_power = (0..weather.len())
        .map(|i| {
            let cell_temp = cell_temperature(
                poa.poa_global[i],
                weather.air_temps()[i],
                weather.wind_speeds()[i],
                &parameters,
            );
            pvwatts_dc(poa.poa_global[i], cell_temp, module) * inverter_efficiency.ratio()
        })
        .collect();

    Ok(PowerResult {
        timestamps: poa.timestamps.clone(),
        poa_global: poa.poa_global.clone(),
        poa_direct: poa.poa_direct.clone(),
        poa_diffuse: poa.poa_diffuse.clone(),
        ac_power,
    })
}
