use crate::core::models::structure::PooledStatistic;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
    Bond,
    Angle,
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterKind::Bond => write!(f, "bond"),
            ParameterKind::Angle => write!(f, "angle"),
        }
    }
}

/// One row of a backbone calibration table.
///
/// `atoms` names the measured atoms joined by `-`, with a `+1`/`-1` suffix on
/// atoms taken from the next or previous residue (e.g. `C-N+1`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterRecord {
    pub kind: ParameterKind,
    pub atoms: String,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

impl ParameterRecord {
    pub fn new(kind: ParameterKind, atoms: impl Into<String>, stat: &PooledStatistic) -> Self {
        Self {
            kind,
            atoms: atoms.into(),
            median: stat.median,
            min: stat.min,
            max: stat.max,
            count: stat.count,
        }
    }
}

#[derive(Debug, Error)]
pub enum ParameterFileError {
    #[error("CSV error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
}

pub fn write_parameters(
    path: &Path,
    records: &[ParameterRecord],
) -> Result<(), ParameterFileError> {
    let wrap = |source: csv::Error| ParameterFileError::Csv {
        path: path.to_string_lossy().to_string(),
        source,
    };
    let mut writer = csv::Writer::from_path(path).map_err(wrap)?;
    for record in records {
        writer.serialize(record).map_err(wrap)?;
    }
    writer.flush().map_err(|e| wrap(e.into()))?;
    Ok(())
}
