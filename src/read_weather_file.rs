use crate::weather::WeatherSeries;
use anyhow::anyhow;
use chrono::DateTime;
use csv::ReaderBuilder as CsvReaderBuilder;
use std::io::Read;

const COLUMN_TIMESTAMP: usize = 0; // RFC 3339 with UTC offset, site-local
const COLUMN_GHI: usize = 1; // global horizontal irradiance in W/m2
const COLUMN_DNI: usize = 2; // direct normal irradiance in W/m2
const COLUMN_DHI: usize = 3; // diffuse horizontal irradiance in W/m2
const COLUMN_AIR_TEMP: usize = 4; // dry bulb temp in degrees
const COLUMN_WIND_SPEED: usize = 5; // wind speed in m/sec

/// Read the weather station export into a [`WeatherSeries`]. The file is a
/// headed CSV; timestamps must carry the site's UTC offset, rows must already
/// be cleaned and ascending.
pub fn weather_data_from_csv(file: impl Read) -> anyhow::Result<WeatherSeries> {
    let mut reader = CsvReaderBuilder::new()
        .has_headers(true)
        .from_reader(file);

    let mut timestamps = vec![];
    let mut ghi = vec![];
    let mut dni = vec![];
    let mut dhi = vec![];
    let mut air_temps = vec![];
    let mut wind_speeds = vec![];

    for (i, result) in reader.records().enumerate() {
        let record: csv::StringRecord = result?;
        let row = i + 2; // 1-based, after the header
        timestamps.push(
            DateTime::parse_from_rfc3339(field(&record, COLUMN_TIMESTAMP, row)?).map_err(
                |error| anyhow!("row {row}: timestamp is not RFC 3339 with an offset: {error}"),
            )?,
        );
        ghi.push(numeric_field(&record, COLUMN_GHI, "ghi", row)?);
        dni.push(numeric_field(&record, COLUMN_DNI, "dni", row)?);
        dhi.push(numeric_field(&record, COLUMN_DHI, "dhi", row)?);
        air_temps.push(numeric_field(&record, COLUMN_AIR_TEMP, "air_temp", row)?);
        wind_speeds.push(numeric_field(&record, COLUMN_WIND_SPEED, "wind_speed", row)?);
    }

    WeatherSeries::new(timestamps, ghi, dni, dhi, air_temps, wind_speeds)
}

fn field<'a>(record: &'a csv::StringRecord, column: usize, row: usize) -> anyhow::Result<&'a str> {
    record
        .get(column)
        .ok_or_else(|| anyhow!("row {row}: missing column {column}"))
}

fn numeric_field(
    record: &csv::StringRecord,
    column: usize,
    name: &str,
    row: usize,
) -> anyhow::Result<f64> {
    field(record, column, row)?
        .parse()
        .map_err(|error| anyhow!("row {row}: {name} is not numeric: {error}"))
}
