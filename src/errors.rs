use chrono::NaiveDate;
use strum_macros::Display;
use thiserror::Error;

/// Failure kinds surfaced by the calculation pipeline. All of these are
/// terminal for the request that raised them: the pipeline is pure and fails
/// fast, leaving presentation of the message to the caller.
#[derive(Debug, Error)]
pub enum PvCalcError {
    #[error("selected {kind} \"{key}\" is not present in the catalog")]
    InvalidCatalogKey { kind: CatalogKind, key: String },
    #[error("no weather rows available for {date}; the requested day lies outside the loaded record")]
    DegenerateWeatherWindow { date: NaiveDate },
    #[error("demand goal must be greater than zero, got {0} kWh")]
    DegenerateDemandGoal(f64),
    #[error("weather record is malformed: {0}")]
    MalformedWeather(String),
}

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum CatalogKind {
    Module,
    Assembly,
    Inverter,
}
