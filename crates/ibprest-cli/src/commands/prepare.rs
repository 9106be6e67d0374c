use super::load_structure;
use crate::cli::PrepareArgs;
use crate::config::build_config;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use ibprest::workflows;
use tracing::info;

pub async fn run(args: PrepareArgs, progress: &CliProgressHandler) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let app = build_config(&args.config, &args.synthesis, None)?;

    let structure = load_structure(&args.input, &app.policy)?;
    tokio::fs::create_dir_all(&args.output).await?;

    println!("Preparing iBP-ng run in {}...", args.output.display());
    let reporter = progress.reporter();
    let prepared = tokio::task::block_in_place(|| {
        workflows::prepare::run(
            &structure,
            &args.output,
            &app.synthesis,
            &app.invocation,
            &reporter,
        )
    })?;

    println!(
        "✓ {} dihedral and {} distance restraints written to: {}",
        prepared.dihedral_count,
        prepared.distance_count,
        prepared.restraints.display()
    );
    println!("  Sequence:   {}", prepared.sequence.display());
    println!("  Run script: {}", prepared.script.display());
    Ok(())
}
