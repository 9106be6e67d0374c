use crate::core::models::restraint::{AtomRef, Restraint, RestraintBlock};
use crate::engine::config::{CARBOXYLATE_ANGLE, CHIRALITY_ANGLE, TerminalPolicy};
use crate::engine::context::SynthesisContext;
use tracing::debug;

fn exact(atoms: [AtomRef; 4], angle: f64) -> Restraint {
    Restraint::Dihedral {
        atoms,
        angle,
        tolerance: 0.0,
    }
}

/// Fixed restraints that do not depend on measured geometry: alpha-carbon
/// chirality on every residue and the terminal cap.
///
/// `None` when the configuration asks for neither.
pub fn run(ctx: &SynthesisContext) -> Option<RestraintBlock> {
    let config = ctx.config;
    if !config.include_chirality && config.terminal == TerminalPolicy::None {
        return None;
    }

    let mut block = RestraintBlock::new("base restraints");
    if config.include_chirality {
        for res_seq in ctx.residues() {
            let i = ctx.index_of(res_seq);
            block.restraints.push(exact(
                [
                    AtomRef::new(i, "N"),
                    AtomRef::new(i, "CA"),
                    AtomRef::new(i, "C"),
                    AtomRef::new(i, "HA"),
                ],
                CHIRALITY_ANGLE,
            ));
        }
    }

    if config.terminal == TerminalPolicy::Carboxylate {
        let last = ctx.index_of(*ctx.residues().end());
        block.restraints.push(exact(
            [
                AtomRef::new(last, "CA"),
                AtomRef::new(last, "O"),
                AtomRef::new(last, "C"),
                AtomRef::new(last, "O2"),
            ],
            CARBOXYLATE_ANGLE,
        ));
    }

    debug!(count = block.restraints.len(), "Built base restraints.");
    Some(block)
}
