use crate::error::{CliError, Result};
use ibprest::engine::config::TerminalPolicy;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FileTerminalPolicy {
    Carboxylate,
    None,
}

impl From<FileTerminalPolicy> for TerminalPolicy {
    fn from(p: FileTerminalPolicy) -> Self {
        match p {
            FileTerminalPolicy::Carboxylate => TerminalPolicy::Carboxylate,
            FileTerminalPolicy::None => TerminalPolicy::None,
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileParserConfig {
    pub chain_ids: Option<Vec<char>>,
    pub atom_names: Option<Vec<String>>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileSynthesisConfig {
    pub model: Option<usize>,
    pub base_tolerance: Option<f64>,
    pub omega_tolerance: Option<f64>,
    pub flexible_tolerance: Option<f64>,
    pub flexible_residues: Option<Vec<isize>>,
    pub distance_cutoff: Option<f64>,
    pub distance_bound: Option<f64>,
    pub min_separation: Option<isize>,
    pub distance_atom_name: Option<String>,
    pub distance_atom_label: Option<String>,
    pub include_chirality: Option<bool>,
    pub terminal: Option<FileTerminalPolicy>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileIbpConfig {
    pub executable: Option<PathBuf>,
    pub verbosity: Option<u8>,
    pub params: Option<PathBuf>,
    pub topology: Option<PathBuf>,
    pub reorder: Option<PathBuf>,
    pub format: Option<String>,
    pub threads: Option<usize>,
    pub method: Option<String>,
    pub limit: Option<u64>,
    pub branch_eps: Option<f64>,
    pub branch_max: Option<u32>,
    pub vdw_scale: Option<f64>,
    pub ddf_tol: Option<f64>,
    pub timeout: Option<u64>,
}

/// Contents of an `ibprest` TOML configuration file. Every key is optional.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub parser: Option<FileParserConfig>,
    pub synthesis: Option<FileSynthesisConfig>,
    pub ibp: Option<FileIbpConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Reading configuration file {:?}", path);
        let content = std::fs::read_to_string(path).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}
