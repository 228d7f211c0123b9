use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
    str::FromStr,
};

use anyhow::{Context, anyhow};
use log::info;
use crate::station::{StationRecord, StationRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    /// `.csv` files get CSV, everything else JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => OutputFormat::Csv,
            _ => OutputFormat::Json,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(anyhow!("unknown output format: {other}")),
        }
    }
}

pub fn write_to<W: Write>(mut writer: W, format: OutputFormat, stations: &[StationRecord]) -> anyhow::Result<()> {
    let rows = stations.iter().map(StationRow::from);
    match format {
        OutputFormat::Csv => {
            let mut csv_writer = csv::Writer::from_writer(writer);
            for row in rows {
                csv_writer.serialize(row)?;
            }
            csv_writer.flush()?;
        }
        OutputFormat::Json => {
            let rows: Vec<StationRow> = rows.collect();
            serde_json::to_writer_pretty(&mut writer, &rows)?;
            writer.flush()?;
        }
    }
    Ok(())
}

pub fn read_from<R: Read>(reader: R, format: OutputFormat) -> anyhow::Result<Vec<StationRecord>> {
    let rows: Vec<StationRow> = match format {
        OutputFormat::Csv => csv::Reader::from_reader(reader)
            .deserialize::<StationRow>()
            .collect::<Result<_, _>>()?,
        OutputFormat::Json => serde_json::from_reader(reader)?,
    };
    Ok(rows.into_iter().map(StationRecord::from).collect())
}

pub fn write_stations(path: &Path, format: OutputFormat, stations: &[StationRecord]) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    write_to(BufWriter::new(file), format, stations)
        .with_context(|| format!("failed to write stations to {}", path.display()))?;
    info!("Wrote {} stations to {} ({:?})", stations.len(), path.display(), format);
    Ok(())
}

pub fn read_stations(path: &Path, format: OutputFormat) -> anyhow::Result<Vec<StationRecord>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    read_from(BufReader::new(file), format)
        .with_context(|| format!("failed to read stations from {}", path.display()))
}
