//! Plain JSON storage for point sets.
//!
//! The file holds nothing but the numbers, `[[f1, f2, ...], ...]`. Loading goes
//! through [`Hypervolume::with_config`], so stored sets are validated again.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use thiserror::Error;
use crate::config::HypervolumeConfig;
use crate::hv_error::HvError;
use crate::hypervolume::Hypervolume;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed point set: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid point set: {0}")]
    Invalid(#[from] HvError),
}

pub fn to_writer<W: Write>(hypervolume: &Hypervolume, writer: W) -> Result<(), PersistenceError> {
    serde_json::to_writer(writer, hypervolume.get_points())?;
    Ok(())
}

pub fn from_reader<R: Read>(reader: R, config: HypervolumeConfig) -> Result<Hypervolume, PersistenceError> {
    let points: Vec<Vec<f64>> = serde_json::from_reader(reader)?;
    Ok(Hypervolume::with_config(points, config)?)
}

pub fn to_json(hypervolume: &Hypervolume) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string(hypervolume.get_points())?)
}

pub fn from_json(json: &str) -> Result<Hypervolume, PersistenceError> {
    let points: Vec<Vec<f64>> = serde_json::from_str(json)?;
    Ok(Hypervolume::new(points)?)
}

pub fn save<P: AsRef<Path>>(hypervolume: &Hypervolume, path: P) -> Result<(), PersistenceError> {
    let mut writer = BufWriter::new(File::create(path)?);
    to_writer(hypervolume, &mut writer)?;
    writer.flush()?;
    Ok(())
}

pub fn load<P: AsRef<Path>>(path: P, config: HypervolumeConfig) -> Result<Hypervolume, PersistenceError> {
    from_reader(BufReader::new(File::open(path)?), config)
}
