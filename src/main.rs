extern crate pvcalc;

use clap::Parser;
use pvcalc::output::FileOutput;
use pvcalc::read_weather_file::weather_data_from_csv;
use pvcalc::run_project;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct PvCalcArgs {
    /// computation request JSON: site, selection and optional catalogs
    input_file: String,
    /// weather station export CSV for the analysis year
    #[arg(long, short)]
    weather_file: String,
    /// directory receiving the named CSV exports
    #[arg(long, short, default_value = ".")]
    output_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    let args = PvCalcArgs::parse();

    info!("reading weather record from {}", args.weather_file);
    let weather = weather_data_from_csv(BufReader::new(File::open(&args.weather_file)?))?;
    info!("loaded {} weather rows", weather.len());

    let output = FileOutput::new(args.output_dir.clone(), "{}.csv".to_string());
    let results = run_project(
        BufReader::new(File::open(&args.input_file)?),
        &weather,
        &output,
    )?;

    let sizing = &results.sizing;
    info!(
        "{} modules cover {} kWh/yr, {:.2} % of the demand goal",
        sizing.module_count, sizing.covered_energy, sizing.coverage_percent,
    );
    info!("exports written to {}", args.output_dir.display());

    Ok(())
}
