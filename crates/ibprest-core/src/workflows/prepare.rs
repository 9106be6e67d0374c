use crate::core::io::fasta::{FastaFile, FastaRecord};
use crate::core::io::restraints::RestraintFile;
use crate::core::io::runscript::{IbpInvocation, RunScript};
use crate::core::io::traits::OutputFile;
use crate::core::models::structure::Structure;
use crate::engine::config::SynthesisConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::ProgressReporter;
use crate::workflows::restraints;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, instrument};

pub const SEQUENCE_FILE: &str = "input.fa";
pub const RESTRAINT_FILE: &str = "input.res";
pub const RUN_SCRIPT: &str = "run";

#[derive(Debug, Error)]
pub enum PrepareError {
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("Failed to write '{path}': {source}")]
    Io { path: PathBuf, source: io::Error },
}

/// Files written for one iBP-ng run.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRun {
    pub sequence: PathBuf,
    pub restraints: PathBuf,
    pub script: PathBuf,
    pub dihedral_count: usize,
    pub distance_count: usize,
}

fn write_err(path: &Path) -> impl FnOnce(io::Error) -> PrepareError + '_ {
    move |source| PrepareError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Writes the sequence, the ensemble restraints and an executable run script
/// for `structure` into `directory`, which must exist.
///
/// The script calls iBP-ng on the files it sits next to, so the invocation
/// should name them relative to `directory`.
#[instrument(skip_all, name = "prepare_workflow", fields(directory = %directory.display()))]
pub fn run(
    structure: &Structure,
    directory: &Path,
    config: &SynthesisConfig,
    invocation: &IbpInvocation,
    reporter: &ProgressReporter,
) -> Result<PreparedRun, PrepareError> {
    let set = restraints::run(structure, config, reporter)?;

    let sequence = directory.join(SEQUENCE_FILE);
    let restraint_path = directory.join(RESTRAINT_FILE);
    let script = directory.join(RUN_SCRIPT);

    reporter.phase("Writing Inputs", || -> Result<(), PrepareError> {
        FastaFile::write_to_path(&FastaRecord::from_structure(structure), &sequence)
            .map_err(write_err(&sequence))?;
        RestraintFile::write_to_path(&set, &restraint_path).map_err(write_err(&restraint_path))?;
        let mut run_script = RunScript::new(invocation.clone());
        run_script.clean_action = true;
        run_script
            .write_executable(&script)
            .map_err(write_err(&script))?;
        Ok(())
    })?;

    info!(
        dihedrals = set.dihedral_count(),
        distances = set.distance_count(),
        "Run inputs written."
    );
    Ok(PreparedRun {
        sequence,
        restraints: restraint_path,
        script,
        dihedral_count: set.dihedral_count(),
        distance_count: set.distance_count(),
    })
}
