use crate::cli::CompareArgs;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use ibprest::core::io::dcd::Trajectory;
use ibprest::workflows::compare;
use std::path::Path;
use tracing::info;

fn load_trajectory(path: &Path) -> Result<Trajectory> {
    info!("Loading trajectory from {:?}", path);
    Trajectory::read_from_path(path).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

pub async fn run(args: CompareArgs, progress: &CliProgressHandler) -> Result<()> {
    let reference = load_trajectory(&args.reference)?;
    let result = load_trajectory(&args.result)?;

    let reporter = progress.reporter();
    let rmsds = tokio::task::block_in_place(|| {
        reporter.phase("Trajectory RMSD", || {
            compare::run(&reference, args.frame, &result, &reporter)
        })
    })?;

    for entry in &rmsds {
        println!("{:>6} {:>10.4}", entry.frame, entry.rmsd);
    }
    match compare::best(&rmsds) {
        Some(best) => println!(
            "✓ Closest frame to reference frame {}: {} (RMSD {:.4} Å)",
            args.frame, best.frame, best.rmsd
        ),
        None => println!("No frames to compare in {}.", args.result.display()),
    }
    Ok(())
}
