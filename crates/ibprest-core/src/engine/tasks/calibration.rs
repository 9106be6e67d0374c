use crate::core::io::parameters::{ParameterKind, ParameterRecord};
use crate::core::models::structure::Structure;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A backbone bond or angle. Offsets place the later atoms in following
/// residues, relative to the residue of the first atom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackboneTerm {
    Bond {
        atoms: [&'static str; 2],
        offset: isize,
    },
    Angle {
        atoms: [&'static str; 3],
        offsets: [isize; 2],
    },
}

const fn bond(atoms: [&'static str; 2], offset: isize) -> BackboneTerm {
    BackboneTerm::Bond { atoms, offset }
}

const fn angle(atoms: [&'static str; 3], offsets: [isize; 2]) -> BackboneTerm {
    BackboneTerm::Angle { atoms, offsets }
}

/// Bonds and angles of the iBP-ng protein backbone, labelled with
/// `(+1)`/`(-1)` for atoms of the next/previous residue.
pub static BACKBONE_TERMS: [(&str, BackboneTerm); 13] = [
    ("N-CA", bond(["N", "CA"], 0)),
    ("CA-C", bond(["CA", "C"], 0)),
    ("C-O", bond(["C", "O"], 0)),
    ("C-N(+1)", bond(["C", "N"], 1)),
    ("N-H", bond(["N", "H"], 0)),
    ("CA-HA", bond(["CA", "HA"], 0)),
    ("N-CA-C", angle(["N", "CA", "C"], [0, 0])),
    ("CA-C-N(+1)", angle(["CA", "C", "N"], [0, 1])),
    ("C-N(+1)-CA(+1)", angle(["C", "N", "CA"], [1, 1])),
    ("CA-C-O", angle(["CA", "C", "O"], [0, 0])),
    ("O-C-N(+1)", angle(["O", "C", "N"], [0, 1])),
    ("C(-1)-N-H", angle(["C", "N", "H"], [1, 1])),
    ("N-CA-HA", angle(["N", "CA", "HA"], [0, 0])),
];

fn measure(
    structure: &Structure,
    label: &'static str,
    term: BackboneTerm,
) -> Result<Option<ParameterRecord>, EngineError> {
    let wrap = |source| EngineError::Calibration {
        parameter: label,
        source,
    };
    let record = match term {
        BackboneTerm::Bond { atoms, offset } => structure
            .bond_statistic(atoms[0], atoms[1], offset)
            .map_err(wrap)?
            .map(|stat| ParameterRecord::new(ParameterKind::Bond, label, &stat)),
        BackboneTerm::Angle { atoms, offsets } => structure
            .angle_statistic(atoms[0], atoms[1], atoms[2], offsets[0], offsets[1])
            .map_err(wrap)?
            .map(|stat| ParameterRecord::new(ParameterKind::Angle, label, &stat)),
    };
    if record.is_none() {
        warn!(parameter = label, "No measurements for backbone term.");
    }
    Ok(record)
}

/// Pooled median/min/max of every backbone term over all residues and models.
///
/// Terms with no measurement are left out of the result.
#[instrument(skip_all, name = "calibration_task")]
pub fn run(
    structure: &Structure,
    reporter: &ProgressReporter,
) -> Result<Vec<ParameterRecord>, EngineError> {
    if structure.residue_extent().is_none() {
        return Err(EngineError::EmptyStructure(
            structure.source_name().to_string(),
        ));
    }
    info!(models = structure.model_count(), "Measuring backbone bonds and angles.");
    reporter.report(Progress::TaskStart {
        total_steps: BACKBONE_TERMS.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = BACKBONE_TERMS.iter();

    #[cfg(feature = "parallel")]
    let iterator = BACKBONE_TERMS.par_iter();

    let records = iterator
        .map(|&(label, term)| {
            let record = measure(structure, label, term);
            reporter.report(Progress::TaskIncrement);
            record
        })
        .collect::<Result<Vec<_>, _>>()?;

    reporter.report(Progress::TaskFinish);
    Ok(records.into_iter().flatten().collect())
}
