pub mod calibrate;
pub mod compare;
pub mod loops;
pub mod prepare;
pub mod restraints;

use crate::error::{CliError, Result};
use ibprest::core::io::pdb::{AcceptancePolicy, PdbFile};
use ibprest::core::io::traits::StructureFile;
use ibprest::core::models::structure::Structure;
use std::path::Path;
use tracing::info;

/// Reads a PDB file, keeping the atoms `policy` accepts.
pub(crate) fn load_structure(path: &Path, policy: &AcceptancePolicy) -> Result<Structure> {
    info!("Loading input structure from {:?}", path);
    let structure =
        PdbFile::read_from_path(path, policy).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
    info!(
        models = structure.model_count(),
        "Structure loaded from {:?}.", path
    );
    Ok(structure)
}
