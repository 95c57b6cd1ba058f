pub mod core;
pub mod errors;
pub mod input;
pub mod output;
pub mod read_weather_file;
pub mod solar;
pub mod weather;

use crate::core::day_profile::{
    ac_power_day, hsp_definition_window, irradiance_comparison_day, AcPowerDay,
    HspWindow, IrradianceComparisonDay,
};
use crate::core::hsp::{hsp, HspTable};
use crate::core::poa::{transpose, PoaIrradiance};
use crate::core::power::{power, PowerResult};
use crate::core::sizing::{size, SizingResult};
use crate::input::ingest_request;
use crate::output::{write_hsp_file, write_poa_power_file, Output};
use crate::weather::WeatherSeries;
use std::io::Read;

/// Everything one recompute produces, handed back to the driving collaborator
/// for rendering. All values are pure functions of the weather table and the
/// current input selection; nothing is retained between runs.
#[derive(Clone, Debug)]
pub struct RunResults {
    pub poa: PoaIrradiance,
    pub power: PowerResult,
    pub hsp: HspTable,
    pub sizing: SizingResult,
    /// present when the request carries a reference date
    pub day_views: Option<DayViews>,
}

/// The single-day comparison views for the request's reference date.
#[derive(Clone, Debug)]
pub struct DayViews {
    pub irradiance: IrradianceComparisonDay,
    pub ac_power: AcPowerDay,
    pub hsp_window: HspWindow,
}

/// Run the whole pipeline for one request: resolve the catalog selection,
/// transpose irradiance onto the plane of array, convert to per-module AC
/// power, sweep the peak-sun-hours table, size the array against the demand
/// goal, and stream the two named CSV exports to `output`.
///
/// The weather table is injected by the caller, which owns its lifecycle;
/// this function never reaches into ambient state and recomputes everything
/// on every call.
pub fn run_project(
    input: impl Read,
    weather: &WeatherSeries,
    output: impl Output,
) -> anyhow::Result<RunResults> {
    let input = ingest_request(input)?;
    let resolved = input.catalogs.resolve(&input.selection)?;

    let poa = transpose(weather, &input.site, resolved.tilt, resolved.azimuth)?;
    let power = power(
        weather,
        &poa,
        resolved.assembly,
        &resolved.module,
        resolved.inverter,
    )?;
    let hsp = hsp(weather, &input.site, resolved.tilt, resolved.azimuth)?;
    let sizing = size(&power, resolved.demand_goal.annual_kwh())?;

    let day_views = match resolved.reference_date {
        Some(date) => Some(DayViews {
            irradiance: irradiance_comparison_day(weather, &poa, date)?,
            ac_power: ac_power_day(&power, date)?,
            hsp_window: hsp_definition_window(&poa, &hsp, date)?,
        }),
        None => None,
    };

    if !output.is_noop() {
        write_poa_power_file(&output, &power)?;
        write_hsp_file(&output, &hsp)?;
    }

    Ok(RunResults {
        poa,
        power,
        hsp,
        sizing,
        day_views,
    })
}
