use super::load_structure;
use crate::cli::RestraintsArgs;
use crate::config::build_config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use ibprest::core::io::restraints::RestraintFile;
use ibprest::core::io::traits::OutputFile;
use ibprest::workflows;
use tracing::info;

pub async fn run(args: RestraintsArgs, progress: &CliProgressHandler) -> Result<()> {
    let mut app = build_config(&args.config, &args.synthesis, None)?;
    if let Some(header) = &args.header {
        app.synthesis.header = Some(header.clone());
    }

    let structure = load_structure(&args.input, &app.policy)?;

    println!("Deriving restraints from {}...", args.input.display());
    let reporter = progress.reporter();
    let set = tokio::task::block_in_place(|| {
        workflows::restraints::run(&structure, &app.synthesis, &reporter)
    })?;

    info!("Writing restraints to {:?}", &args.output);
    RestraintFile::write_to_path(&set, &args.output).map_err(|e| CliError::FileWriting {
        path: args.output.clone(),
        source: e.into(),
    })?;

    println!(
        "✓ {} dihedral and {} distance restraints written to: {}",
        set.dihedral_count(),
        set.distance_count(),
        args.output.display()
    );
    Ok(())
}
