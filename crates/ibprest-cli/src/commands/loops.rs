use super::load_structure;
use crate::cli::{LoopsArgs, SynthesisArgs};
use crate::config::build_config;
use crate::error::{CliError, Result};
use crate::runner;
use crate::utils::progress::CliProgressHandler;
use ibprest::core::io::fasta::{FastaFile, FastaRecord};
use ibprest::core::io::restraints::RestraintFile;
use ibprest::core::io::runscript::RunScript;
use ibprest::core::io::traits::OutputFile;
use ibprest::workflows::loops::{self, LoopsConfig, LoopsReport};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

fn write_err(path: &Path) -> impl FnOnce(std::io::Error) -> CliError + '_ {
    move |e| CliError::FileWriting {
        path: path.to_path_buf(),
        source: e.into(),
    }
}

/// Writes the experiment files, optionally runs iBP-ng, and returns the
/// summary line. Without a run the experiment counts as unsolved.
pub async fn execute(args: &LoopsArgs, progress: &CliProgressHandler) -> Result<LoopsReport> {
    let synthesis_args = SynthesisArgs {
        model: Some(args.model),
        eps: Some(args.eps),
        cutoff: Some(args.dmax),
    };
    let app = build_config(&args.config, &synthesis_args, args.timeout)?;
    let structure = load_structure(&args.input, &app.policy)?;

    let config = LoopsConfig {
        model_index: args.model,
        synthesis: app.synthesis,
        ..LoopsConfig::new(args.eps, args.dmax)
    };
    let reporter = progress.reporter();
    let result = tokio::task::block_in_place(|| loops::run(&structure, &config, &reporter))?;

    let dir = &args.output_dir;
    tokio::fs::create_dir_all(dir).await?;
    let invocation = app.invocation.clone().with_stem(&result.stem);

    let sequence: PathBuf = dir.join(&invocation.input);
    FastaFile::write_to_path(&FastaRecord::from_structure(&structure), &sequence)
        .map_err(write_err(&sequence))?;
    let restraints = dir.join(&invocation.restraints);
    RestraintFile::write_to_path(&result.restraints, &restraints)
        .map_err(write_err(&restraints))?;
    let script_path = dir.join(format!("{}.sh", result.stem));
    let script = RunScript {
        log_stem: Some(result.stem.clone()),
        ..RunScript::new(invocation.clone())
    };
    script
        .write_executable(&script_path)
        .map_err(write_err(&script_path))?;
    info!(stem = %result.stem, "Experiment files written to {:?}", dir);

    let outcome = if args.run {
        println!("Running iBP-ng for {}...", result.stem);
        Some(runner::run_ibp(&invocation, dir, app.timeout, Some(&result.stem)).await?)
    } else {
        None
    };

    Ok(LoopsReport {
        eps: args.eps,
        dmax: args.dmax,
        distance_count: result.distance_count(),
        solved: outcome.is_some_and(|o| o.solved()),
        elapsed: outcome.map_or(Duration::ZERO, |o| o.elapsed()),
    })
}

pub async fn run(args: LoopsArgs, progress: &CliProgressHandler) -> Result<()> {
    let report = execute(&args, progress).await?;
    if !args.run {
        println!(
            "✓ Restraints written to: {}",
            args.output_dir
                .join(format!("{}.res", LoopsConfig::new(args.eps, args.dmax).stem()))
                .display()
        );
    }
    println!("{}", report);
    Ok(())
}
