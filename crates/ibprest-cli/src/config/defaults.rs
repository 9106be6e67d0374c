use ibprest::core::io::pdb::{DEFAULT_ATOM_NAMES, DEFAULT_CHAIN_ID};
use ibprest::engine::config::SINGLE_MODEL_DISTANCE_CUTOFF;

/// Values used when neither the command line nor the configuration file sets them.
///
/// Synthesis and iBP-ng defaults live with their types in the library; this
/// covers what only the command line decides.
pub struct DefaultsConfig {
    pub chain_ids: Vec<char>,
    pub atom_names: Vec<String>,
    /// Extra phi/psi tolerance when a single model is restrained without `--eps`.
    pub eps: f64,
    /// Distance cutoff when a single model is restrained without `--cutoff`.
    pub single_model_cutoff: f64,
    /// Seconds an iBP-ng run may take; `None` waits indefinitely.
    pub timeout: Option<u64>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            chain_ids: vec![DEFAULT_CHAIN_ID],
            atom_names: DEFAULT_ATOM_NAMES.iter().map(|s| s.to_string()).collect(),
            eps: 0.0,
            single_model_cutoff: SINGLE_MODEL_DISTANCE_CUTOFF,
            timeout: None,
        }
    }
}
