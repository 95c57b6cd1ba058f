use crate::core::hsp::HspTable;
use crate::core::power::PowerResult;
use anyhow::anyhow;
use csv::WriterBuilder;
use formatx::formatx;
use std::fmt::Debug;
use std::fs::File;
use std::io;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Destination for the named CSV exports. The caller decides where a
/// location key lands; the export functions only stream rows into it.
pub trait Output: Debug {
    fn writer_for_location_key(&self, location_key: &str) -> anyhow::Result<impl Write>;
    /// Whether this output can be considered a no-op and therefore that any code that only writes to the output can be skipped.
    fn is_noop(&self) -> bool {
        false
    }
}

#[derive(Debug)]
pub struct FileOutput {
    directory_path: PathBuf,
    file_template: String,
}

impl FileOutput {
    pub fn new(directory_path: PathBuf, file_template: String) -> Self {
        Self {
            directory_path,
            file_template,
        }
    }
}

impl Output for FileOutput {
    fn writer_for_location_key(&self, location_key: &str) -> anyhow::Result<impl Write> {
        let file_name = formatx!(&self.file_template, location_key)
            .map_err(|error| anyhow!("bad output file template: {error}"))?;
        Ok(BufWriter::new(File::create(
            self.directory_path.join(file_name),
        )?))
    }
}

impl Output for &FileOutput {
    fn writer_for_location_key(&self, location_key: &str) -> anyhow::Result<impl Write> {
        <FileOutput as Output>::writer_for_location_key(self, location_key)
    }
}

/// An output that goes to nowhere/ a "sink"/ /dev/null.
#[derive(Debug, Default)]
pub struct SinkOutput;

impl Output for SinkOutput {
    fn writer_for_location_key(&self, _location_key: &str) -> anyhow::Result<impl Write> {
        Ok(io::sink())
    }

    fn is_noop(&self) -> bool {
        true
    }
}

pub const POA_POWER_OUTPUT_KEY: &str = "poa_power";
pub const HSP_OUTPUT_KEY: &str = "hsp";

/// Export the combined POA + power table: every timestamp, every column, the
/// index first.
pub fn write_poa_power_file(output: &impl Output, power: &PowerResult) -> anyhow::Result<()> {
    let writer = output.writer_for_location_key(POA_POWER_OUTPUT_KEY)?;
    let mut writer = WriterBuilder::new().from_writer(writer);

    writer.write_record([
        "timestamp",
        "poa_global",
        "poa_direct",
        "poa_diffuse",
        "ac_power",
    ])?;
    for i in 0..power.len() {
        writer.write_record([
            power.timestamps[i].to_rfc3339(),
            power.poa_global[i].to_string(),
            power.poa_direct[i].to_string(),
            power.poa_diffuse[i].to_string(),
            power.ac_power[i].to_string(),
        ])?;
    }
    writer.flush()?;

    Ok(())
}

/// Export the peak-sun-hours table: one row per sweep tilt, month columns in
/// chronological order, the Average column last.
pub fn write_hsp_file(output: &impl Output, table: &HspTable) -> anyhow::Result<()> {
    let writer = output.writer_for_location_key(HSP_OUTPUT_KEY)?;
    let mut writer = WriterBuilder::new().from_writer(writer);

    let mut headings = vec!["Tilt".to_string()];
    headings.extend(table.months.iter().cloned());
    headings.push("Average".to_string());
    writer.write_record(&headings)?;

    for row in &table.rows {
        let mut record = vec![row.label.clone()];
        record.extend(row.monthly.iter().map(|value| value.to_string()));
        record.push(row.average.to_string());
        writer.write_record(&record)?;
    }
    writer.flush()?;

    Ok(())
}
