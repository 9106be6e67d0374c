use crate::core::geometry::superposition::aligned_rmsd;
use crate::core::io::dcd::Trajectory;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRmsd {
    pub frame: usize,
    pub rmsd: f64,
}

/// Aligned RMSD of every frame of `result` against one frame of `reference`.
#[instrument(skip_all, name = "compare_workflow")]
pub fn run(
    reference: &Trajectory,
    reference_frame: usize,
    result: &Trajectory,
    reporter: &ProgressReporter,
) -> Result<Vec<FrameRmsd>, EngineError> {
    let target = reference
        .frames()
        .get(reference_frame)
        .ok_or(EngineError::FrameOutOfRange {
            index: reference_frame,
            count: reference.frame_count(),
        })?;
    if result.atom_count() != reference.atom_count() {
        return Err(EngineError::TrajectoryMismatch {
            expected: reference.atom_count(),
            found: result.atom_count(),
        });
    }

    info!(
        frames = result.frame_count(),
        atoms = result.atom_count(),
        "Comparing trajectory frames."
    );
    reporter.report(Progress::TaskStart {
        total_steps: result.frame_count() as u64,
    });

    let frames: Vec<usize> = (0..result.frame_count()).collect();

    #[cfg(not(feature = "parallel"))]
    let iterator = frames.iter();

    #[cfg(feature = "parallel")]
    let iterator = frames.par_iter();

    let rmsds = iterator
        .map(|&frame| {
            let rmsd = aligned_rmsd(&result.frames()[frame], target)
                .map(|rmsd| FrameRmsd { frame, rmsd })
                .map_err(|source| EngineError::Superposition { frame, source });
            reporter.report(Progress::TaskIncrement);
            rmsd
        })
        .collect::<Result<Vec<_>, _>>()?;

    reporter.report(Progress::TaskFinish);
    Ok(rmsds)
}

/// The frame closest to the reference.
pub fn best(rmsds: &[FrameRmsd]) -> Option<FrameRmsd> {
    rmsds
        .iter()
        .copied()
        .min_by(|a, b| a.rmsd.total_cmp(&b.rmsd))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::dcd::tests::encode;

    fn rotated(frame: &[[f32; 3]]) -> Vec<[f32; 3]> {
        frame.iter().map(|&[x, y, z]| [-y + 3.0, x - 1.0, z + 2.0]).collect()
    }

    fn reference() -> Vec<[f32; 3]> {
        vec![
            [0.0, 0.0, 0.0],
            [1.5, 0.0, 0.0],
            [2.0, 1.4, 0.0],
            [3.3, 1.5, 0.7],
            [4.0, 2.6, -0.4],
        ]
    }

    #[test]
    fn rigidly_moved_frame_has_zero_rmsd() {
        let reference_traj = Trajectory::read_from_bytes(&encode(&[reference()], 5)).unwrap();
        let mut distorted = reference();
        distorted[4] = [4.0, 2.6, 0.6];
        let result_traj = Trajectory::read_from_bytes(&encode(
            &[rotated(&reference()), distorted],
            5,
        ))
        .unwrap();

        let rmsds = run(&reference_traj, 0, &result_traj, &ProgressReporter::new()).unwrap();
        assert_eq!(rmsds.len(), 2);
        assert!(rmsds[0].rmsd < 1e-5);
        assert!(rmsds[1].rmsd > 0.1);
        assert_eq!(best(&rmsds).map(|r| r.frame), Some(0));
    }

    #[test]
    fn missing_reference_frame_is_rejected() {
        let traj = Trajectory::read_from_bytes(&encode(&[reference()], 5)).unwrap();
        assert!(matches!(
            run(&traj, 3, &traj, &ProgressReporter::new()),
            Err(EngineError::FrameOutOfRange { index: 3, count: 1 })
        ));
    }

    #[test]
    fn trajectories_of_different_sizes_are_rejected() {
        let traj = Trajectory::read_from_bytes(&encode(&[reference()], 5)).unwrap();
        let small = Trajectory::read_from_bytes(&encode(&[reference()[..3].to_vec()], 3)).unwrap();
        assert!(matches!(
            run(&traj, 0, &small, &ProgressReporter::new()),
            Err(EngineError::TrajectoryMismatch { expected: 5, found: 3 })
        ));
    }

    #[test]
    fn best_of_nothing_is_none() {
        assert_eq!(best(&[]), None);
    }
}
