use crate::core::models::restraint::RestraintSet;
use crate::core::models::structure::Structure;
use crate::engine::config::SynthesisConfig;
use crate::engine::context::SynthesisContext;
use crate::engine::error::EngineError;
use crate::engine::progress::ProgressReporter;
use crate::engine::tasks;
use tracing::{info, instrument};

/// Derives the complete restraint set of a structure.
///
/// Blocks come out in file order: base restraints (if any), one block per
/// residue with its backbone dihedrals, then the distance restraints.
#[instrument(skip_all, name = "restraints_workflow", fields(source = structure.source_name()))]
pub fn run(
    structure: &Structure,
    config: &SynthesisConfig,
    reporter: &ProgressReporter,
) -> Result<RestraintSet, EngineError> {
    let ctx = SynthesisContext::new(structure, config, reporter)?;
    info!(
        models = structure.model_count(),
        residues = ctx.residue_count(),
        mode = ?config.mode,
        "Synthesizing restraints."
    );

    let mut set = RestraintSet::new();
    set.header = config.header.clone();

    if let Some(base) = tasks::base_restraints::run(&ctx) {
        set.blocks.push(base);
    }

    let dihedral_blocks = reporter.phase("Backbone Dihedrals", || {
        tasks::backbone_dihedrals::run(&ctx)
    })?;
    set.blocks.extend(dihedral_blocks);

    let distance_block = reporter.phase("Distance Restraints", || {
        tasks::distance_restraints::run(&ctx)
    })?;
    set.blocks.push(distance_block);

    info!(
        dihedrals = set.dihedral_count(),
        distances = set.distance_count(),
        "Restraint synthesis complete."
    );
    reporter.message(format!(
        "{} dihedral and {} distance restraints",
        set.dihedral_count(),
        set.distance_count()
    ));
    Ok(set)
}
