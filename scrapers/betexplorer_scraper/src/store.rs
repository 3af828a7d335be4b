use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::types::{Match, RawMatch};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Each sport's matches live in one `{sport}.csv` per pipeline stage.
pub fn sport_file(dir: &Path, sport: &str) -> PathBuf {
    dir.join(format!("{sport}.csv"))
}

pub fn read_raw_table(path: &Path) -> Result<Vec<RawMatch>, StoreError> {
    let mut reader = csv::Reader::from_path(path)?;
    let rows = reader.deserialize().collect::<Result<Vec<RawMatch>, _>>()?;
    Ok(rows)
}

pub fn write_raw_table(path: &Path, rows: &[RawMatch]) -> Result<(), StoreError> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_match_table(path: &Path) -> Result<Vec<Match>, StoreError> {
    let mut reader = csv::Reader::from_path(path)?;
    let rows = reader.deserialize().collect::<Result<Vec<Match>, _>>()?;
    Ok(rows)
}

pub fn write_match_table(path: &Path, rows: &[Match]) -> Result<(), StoreError> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
