use crate::core::geometry::measures::distances;
use crate::core::models::restraint::{Restraint, RestraintBlock};
use crate::core::models::selection::{Selection, align};
use crate::core::statistics::mean_bounds;
use crate::engine::context::SynthesisContext;
use crate::engine::error::EngineError;
use crate::engine::progress::Progress;
use tracing::{debug, info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Distance restraints between amide protons of residues at least
/// `min_separation` apart.
///
/// A pair is restrained when at least one measured distance is within the
/// cutoff. The target is the mean over all measured models, with bounds
/// reaching the extremes unless a fixed bound is configured.
#[instrument(skip_all, name = "distance_restraints_task")]
pub fn run(ctx: &SynthesisContext) -> Result<RestraintBlock, EngineError> {
    let config = ctx.config;
    let residues: Vec<isize> = ctx.residues().collect();
    let protons: Vec<Option<Selection>> = residues
        .iter()
        .map(|&r| ctx.sample(r, &config.distance_atom_name))
        .collect();

    info!(
        cutoff = config.distance_cutoff,
        min_separation = config.min_separation,
        "Deriving distance restraints."
    );
    ctx.reporter.report(Progress::TaskStart {
        total_steps: residues.len() as u64,
    });

    let indices: Vec<usize> = (0..residues.len()).collect();

    #[cfg(not(feature = "parallel"))]
    let iterator = indices.iter();

    #[cfg(feature = "parallel")]
    let iterator = indices.par_iter();

    let rows = iterator
        .map(|&k| {
            let row = pairs_from(ctx, &residues, &protons, k);
            ctx.reporter.report(Progress::TaskIncrement);
            row
        })
        .collect::<Result<Vec<_>, _>>()?;

    ctx.reporter.report(Progress::TaskFinish);

    let mut block = RestraintBlock::new("distance restraints");
    block.restraints = rows.into_iter().flatten().collect();
    info!(count = block.restraints.len(), "Distance restraints derived.");
    Ok(block)
}

fn pairs_from(
    ctx: &SynthesisContext,
    residues: &[isize],
    protons: &[Option<Selection>],
    k: usize,
) -> Result<Vec<Restraint>, EngineError> {
    let config = ctx.config;
    let Some(first) = &protons[k] else {
        return Ok(Vec::new());
    };
    let start = k + config.min_separation as usize;
    let mut restraints = Vec::new();

    for (second_res, second) in residues.iter().zip(protons).skip(start) {
        let Some(second) = second else {
            continue;
        };
        let Some(aligned) = align(&[first, second]) else {
            debug!(
                residue_a = residues[k],
                residue_b = second_res,
                "Skipping pair: protons share no model."
            );
            continue;
        };
        let values = distances(&aligned.columns[0], &aligned.columns[1]).map_err(|source| {
            EngineError::Geometry {
                residue: residues[k],
                source,
            }
        })?;
        if !values.iter().any(|&d| d <= config.distance_cutoff) {
            continue;
        }
        let Some((mean, lower, upper)) = mean_bounds(&values) else {
            continue;
        };
        let (lower, upper) = config.distance_bound.map_or((lower, upper), |b| (b, b));
        restraints.push(Restraint::Distance {
            atoms: [
                ctx.atom_ref(residues[k], &config.distance_atom_label),
                ctx.atom_ref(*second_res, &config.distance_atom_label),
            ],
            distance: mean,
            lower,
            upper,
        });
    }
    Ok(restraints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::model::Model;
    use crate::core::models::restraint::AtomRef;
    use crate::core::models::structure::Structure;
    use crate::engine::config::SynthesisConfig;
    use crate::engine::progress::ProgressReporter;
    use nalgebra::Point3;

    const TOL: f64 = 1e-9;

    /// Protons on residues 1, 2, 3 and 6 of a six-residue fragment. Residues 2
    /// and 3 sit 1 A from residue 1; residue 6 sits `d[m]` away in model `m`.
    fn structure(d: &[f64]) -> Structure {
        let models = d
            .iter()
            .map(|&dist| {
                let h = |res, x| Atom::new(0, "H", "ALA", 'A', res, Point3::new(x, 0.0, 0.0));
                Model::from_atoms(vec![
                    h(1, 0.0),
                    h(2, 1.0),
                    h(3, -1.0),
                    Atom::new(0, "N", "ALA", 'A', 4, Point3::new(0.0, 9.0, 0.0)),
                    h(6, dist),
                ])
            })
            .collect();
        Structure::new("pairs", models)
    }

    fn derive(s: &Structure, config: &SynthesisConfig) -> RestraintBlock {
        let reporter = ProgressReporter::new();
        let ctx = SynthesisContext::new(s, config, &reporter).unwrap();
        run(&ctx).unwrap()
    }

    #[test]
    fn pair_with_one_distance_in_range_uses_mean_and_spread() {
        let s = structure(&[5.9, 6.1, 6.0]);
        let block = derive(&s, &SynthesisConfig::ensemble());

        assert_eq!(block.title, "distance restraints");
        assert_eq!(block.restraints.len(), 1);
        match &block.restraints[0] {
            Restraint::Distance {
                atoms,
                distance,
                lower,
                upper,
            } => {
                assert_eq!(atoms, &[AtomRef::new(1, "H1"), AtomRef::new(6, "H1")]);
                assert!((distance - 6.0).abs() < TOL);
                assert!((lower - 0.1).abs() < TOL);
                assert!((upper - 0.1).abs() < TOL);
            }
            other => panic!("unexpected restraint {other:?}"),
        }
    }

    #[test]
    fn close_neighbours_in_sequence_are_never_paired() {
        let s = structure(&[5.0]);
        let block = derive(&s, &SynthesisConfig::ensemble());
        for r in &block.restraints {
            let atoms = r.atoms();
            assert!(atoms[1].residue - atoms[0].residue >= 5);
        }
        assert_eq!(block.restraints.len(), 1);
    }

    #[test]
    fn pair_beyond_cutoff_in_every_model_is_dropped() {
        let s = structure(&[6.2, 7.0]);
        assert!(derive(&s, &SynthesisConfig::ensemble()).restraints.is_empty());
    }

    #[test]
    fn fixed_bounds_override_spread() {
        let s = structure(&[8.5, 3.0]);
        let config = SynthesisConfig::single_model(0, 0.0, 10.0);
        let block = derive(&s, &config);
        assert_eq!(
            block.restraints,
            vec![Restraint::Distance {
                atoms: [AtomRef::new(1, "H1"), AtomRef::new(6, "H1")],
                distance: 8.5,
                lower: 0.25,
                upper: 0.25,
            }]
        );
    }

    #[test]
    fn sparse_protons_are_paired_on_shared_models() {
        let mut models = structure(&[4.0, 5.0, 9.0]).models().to_vec();
        // Drop the residue 6 proton from model 1.
        let kept: Vec<Atom> = models[1]
            .atoms()
            .iter()
            .filter(|a| a.res_seq != 6)
            .cloned()
            .collect();
        models[1] = Model::from_atoms(kept);
        let s = Structure::new("sparse", models);

        let block = derive(&s, &SynthesisConfig::ensemble());
        match &block.restraints[0] {
            Restraint::Distance {
                distance,
                lower,
                upper,
                ..
            } => {
                assert!((distance - 6.5).abs() < TOL);
                assert!((lower - 2.5).abs() < TOL);
                assert!((upper - 2.5).abs() < TOL);
            }
            other => panic!("unexpected restraint {other:?}"),
        }
    }

    #[test]
    fn custom_label_and_larger_separation() {
        let s = structure(&[5.0]);
        let mut config = SynthesisConfig::ensemble();
        config.distance_atom_label = "HN".into();
        let block = derive(&s, &config);
        assert_eq!(block.restraints[0].atoms()[0], AtomRef::new(1, "HN"));

        config.min_separation = 6;
        assert!(derive(&s, &config).restraints.is_empty());
    }
}
