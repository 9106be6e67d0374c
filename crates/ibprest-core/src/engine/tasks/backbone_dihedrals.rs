use crate::core::geometry::measures::dihedrals;
use crate::core::models::restraint::{Restraint, RestraintBlock};
use crate::core::statistics::{fix_omega, midrange};
use crate::engine::config::SynthesisMode;
use crate::engine::context::{AtomSpec, SynthesisContext};
use crate::engine::error::EngineError;
use crate::engine::progress::Progress;
use tracing::{debug, info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackboneAngle {
    Phi,
    Psi,
    Omega,
}

impl BackboneAngle {
    pub const ALL: [BackboneAngle; 3] = [
        BackboneAngle::Phi,
        BackboneAngle::Psi,
        BackboneAngle::Omega,
    ];

    /// The four atoms of the angle, relative to the residue it belongs to.
    pub fn atoms(self) -> &'static [AtomSpec; 4] {
        match self {
            BackboneAngle::Phi => &[(-1, "C"), (0, "N"), (0, "CA"), (0, "C")],
            BackboneAngle::Psi => &[(0, "N"), (0, "CA"), (0, "C"), (1, "N")],
            BackboneAngle::Omega => &[(0, "CA"), (0, "C"), (1, "N"), (1, "CA")],
        }
    }
}

#[instrument(skip_all, name = "backbone_dihedrals_task")]
pub fn run(ctx: &SynthesisContext) -> Result<Vec<RestraintBlock>, EngineError> {
    let residues: Vec<isize> = ctx.residues().collect();
    info!(residues = residues.len(), "Deriving backbone dihedral restraints.");
    ctx.reporter.report(Progress::TaskStart {
        total_steps: residues.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = residues.iter();

    #[cfg(feature = "parallel")]
    let iterator = residues.par_iter();

    let blocks = iterator
        .map(|&res_seq| {
            let block = residue_block(ctx, res_seq);
            ctx.reporter.report(Progress::TaskIncrement);
            block
        })
        .collect::<Result<Vec<_>, _>>()?;

    ctx.reporter.report(Progress::TaskFinish);
    Ok(blocks)
}

fn residue_block(ctx: &SynthesisContext, res_seq: isize) -> Result<RestraintBlock, EngineError> {
    let mut block = RestraintBlock::new(format!("resid {}", ctx.index_of(res_seq)));
    for angle in BackboneAngle::ALL {
        if let Some(restraint) = measure(ctx, res_seq, angle)? {
            block.restraints.push(restraint);
        }
    }
    Ok(block)
}

/// Restraint on one backbone dihedral of `res_seq`, or `None` when the
/// angle cannot be measured.
pub fn measure(
    ctx: &SynthesisContext,
    res_seq: isize,
    angle: BackboneAngle,
) -> Result<Option<Restraint>, EngineError> {
    let specs = angle.atoms();
    let Some(aligned) = ctx.sample_aligned(res_seq, specs) else {
        debug!(
            residue = res_seq,
            ?angle,
            "Skipping dihedral: atoms missing or in no common model."
        );
        return Ok(None);
    };

    let mut values = dihedrals(
        &aligned.columns[0],
        &aligned.columns[1],
        &aligned.columns[2],
        &aligned.columns[3],
    )
    .map_err(|source| EngineError::Geometry {
        residue: res_seq,
        source,
    })?;
    if angle == BackboneAngle::Omega && ctx.config.mode == SynthesisMode::Ensemble {
        values = fix_omega(&values);
    }
    let Some((center, half_range)) = midrange(&values) else {
        return Ok(None);
    };

    let tolerance = half_range
        + match angle {
            BackboneAngle::Omega => ctx.config.omega_tolerance,
            _ => ctx.config.backbone_tolerance(ctx.index_of(res_seq)),
        };

    Ok(Some(Restraint::Dihedral {
        atoms: (*specs).map(|(offset, name)| ctx.atom_ref(res_seq + offset, name)),
        angle: center,
        tolerance,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::restraint::AtomRef;
    use crate::core::models::structure::Structure;
    use crate::engine::config::SynthesisConfig;
    use crate::engine::progress::ProgressReporter;
    use crate::engine::tasks::test_support::backbone;

    const TOL: f64 = 1e-6;

    fn ensemble() -> Structure {
        let models = [(-60.0, 179.0), (-50.0, -179.0), (-70.0, 180.0)]
            .into_iter()
            .map(|(phi2, omega1)| {
                backbone(
                    10,
                    &[0.0, phi2, -65.0],
                    &[140.0, -40.0, 0.0],
                    &[omega1, 175.0, 0.0],
                )
            })
            .collect();
        Structure::new("ensemble", models)
    }

    fn unpack(r: &Restraint) -> (&[AtomRef], f64, f64) {
        match r {
            Restraint::Dihedral {
                atoms,
                angle,
                tolerance,
            } => (atoms, *angle, *tolerance),
            other => panic!("not a dihedral: {other:?}"),
        }
    }

    #[test]
    fn one_block_per_residue_with_applicable_angles() {
        let s = ensemble();
        let config = SynthesisConfig::ensemble();
        let reporter = ProgressReporter::new();
        let ctx = SynthesisContext::new(&s, &config, &reporter).unwrap();
        let blocks = run(&ctx).unwrap();

        let titles: Vec<_> = blocks.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, ["resid 1", "resid 2", "resid 3"]);
        // No phi on the first residue, no psi/omega on the last.
        assert_eq!(blocks[0].restraints.len(), 2);
        assert_eq!(blocks[1].restraints.len(), 3);
        assert_eq!(blocks[2].restraints.len(), 1);
    }

    #[test]
    fn phi_restraint_spans_the_ensemble() {
        let s = ensemble();
        let config = SynthesisConfig::ensemble();
        let reporter = ProgressReporter::new();
        let ctx = SynthesisContext::new(&s, &config, &reporter).unwrap();

        let phi = measure(&ctx, 11, BackboneAngle::Phi).unwrap().unwrap();
        let (atoms, angle, tolerance) = unpack(&phi);
        assert_eq!(
            atoms,
            &[
                AtomRef::new(1, "C"),
                AtomRef::new(2, "N"),
                AtomRef::new(2, "CA"),
                AtomRef::new(2, "C"),
            ]
        );
        assert!((angle + 60.0).abs() < TOL);
        assert!((tolerance - 10.0).abs() < TOL);
    }

    #[test]
    fn omega_straddling_the_boundary_is_unwrapped() {
        let s = ensemble();
        let config = SynthesisConfig::ensemble();
        let reporter = ProgressReporter::new();
        let ctx = SynthesisContext::new(&s, &config, &reporter).unwrap();

        let omega = measure(&ctx, 10, BackboneAngle::Omega).unwrap().unwrap();
        let (atoms, angle, tolerance) = unpack(&omega);
        assert_eq!(atoms[3], AtomRef::new(2, "CA"));
        assert!((angle - 180.0).abs() < TOL);
        assert!((tolerance - 1.0).abs() < TOL);
    }

    #[test]
    fn flexible_residues_widen_phi_and_psi_only() {
        let s = ensemble();
        let mut config = SynthesisConfig::ensemble();
        config.flexible_residues.insert(2);
        config.flexible_tolerance = 5.0;
        let reporter = ProgressReporter::new();
        let ctx = SynthesisContext::new(&s, &config, &reporter).unwrap();

        let (_, _, phi_tol) = unpack(&measure(&ctx, 11, BackboneAngle::Phi).unwrap().unwrap());
        let (_, _, psi_tol) = unpack(&measure(&ctx, 11, BackboneAngle::Psi).unwrap().unwrap());
        let (_, _, omega_tol) =
            unpack(&measure(&ctx, 11, BackboneAngle::Omega).unwrap().unwrap());
        assert!((phi_tol - 15.0).abs() < TOL);
        assert!((psi_tol - 5.0).abs() < TOL);
        assert!(omega_tol.abs() < TOL);
    }

    #[test]
    fn ensemble_eps_applies_to_the_default_loop_list() {
        let s = Structure::new(
            "loops.pdb",
            vec![
                backbone(1, &[-60.0; 14], &[-45.0; 14], &[180.0; 14]),
                backbone(1, &[-90.0; 14], &[-45.0; 14], &[180.0; 14]),
            ],
        );
        let config = SynthesisConfig {
            flexible_tolerance: 4.0,
            ..SynthesisConfig::ensemble()
        };
        let reporter = ProgressReporter::new();
        let ctx = SynthesisContext::new(&s, &config, &reporter).unwrap();

        let (_, _, loop_tol) = unpack(&measure(&ctx, 12, BackboneAngle::Phi).unwrap().unwrap());
        let (_, _, core_tol) = unpack(&measure(&ctx, 10, BackboneAngle::Phi).unwrap().unwrap());
        assert!((core_tol - 15.0).abs() < TOL);
        assert!((loop_tol - 19.0).abs() < TOL);
    }

    #[test]
    fn single_model_uses_fixed_tolerances() {
        let s = ensemble();
        let mut config = SynthesisConfig::single_model(1, 2.0, 10.0);
        config.flexible_residues = [2].into_iter().collect();
        let reporter = ProgressReporter::new();
        let ctx = SynthesisContext::new(&s, &config, &reporter).unwrap();

        let (_, phi, phi_tol) = unpack(&measure(&ctx, 11, BackboneAngle::Phi).unwrap().unwrap());
        assert!((phi + 50.0).abs() < TOL);
        assert!((phi_tol - 2.1).abs() < TOL);

        let (_, omega, omega_tol) =
            unpack(&measure(&ctx, 10, BackboneAngle::Omega).unwrap().unwrap());
        assert!((omega + 179.0).abs() < TOL);
        assert!((omega_tol - 0.1).abs() < TOL);
    }

    #[test]
    fn progress_counts_every_residue() {
        use std::sync::atomic::{AtomicU64, Ordering};
        let s = ensemble();
        let config = SynthesisConfig::ensemble();
        let steps = AtomicU64::new(0);
        let reporter = ProgressReporter::with_callback(Box::new(|e| {
            if e == Progress::TaskIncrement {
                steps.fetch_add(1, Ordering::SeqCst);
            }
        }));
        let ctx = SynthesisContext::new(&s, &config, &reporter).unwrap();
        run(&ctx).unwrap();
        assert_eq!(steps.load(Ordering::SeqCst), 3);
    }
}
