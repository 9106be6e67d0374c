use super::load_structure;
use crate::cli::{CalibrateArgs, SynthesisArgs};
use crate::config::build_config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use ibprest::core::io::parameters::write_parameters;
use ibprest::workflows;
use tracing::warn;

pub async fn run(args: CalibrateArgs, progress: &CliProgressHandler) -> Result<()> {
    let app = build_config(&args.config, &SynthesisArgs::default(), None)?;
    let structure = load_structure(&args.input, &app.policy)?;

    println!("Calibrating backbone geometry of {}...", args.input.display());
    let reporter = progress.reporter();
    let records =
        tokio::task::block_in_place(|| workflows::calibrate::run(&structure, &reporter))?;
    if records.is_empty() {
        warn!("No backbone term could be measured.");
    }

    write_parameters(&args.output, &records).map_err(|e| CliError::FileWriting {
        path: args.output.clone(),
        source: e.into(),
    })?;

    for record in &records {
        println!(
            "  {:<5} {:<16} {:>9.4} [{:.4}, {:.4}] n={}",
            record.kind.to_string(),
            record.atoms,
            record.median,
            record.min,
            record.max,
            record.count
        );
    }
    println!(
        "✓ {} backbone terms written to: {}",
        records.len(),
        args.output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ConfigArgs;
    use crate::commands::test_support::ensemble_pdb;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test(flavor = "multi_thread")]
    async fn statistics_are_written_as_csv() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("ensemble.pdb");
        fs::write(&input, ensemble_pdb(2, 4)).unwrap();
        let output = dir.path().join("backbone.csv");

        let args = CalibrateArgs {
            input,
            output: output.clone(),
            config: ConfigArgs::default(),
        };
        run(args, &CliProgressHandler::hidden()).await.unwrap();

        let text = fs::read_to_string(&output).unwrap();
        assert!(text.starts_with("kind,atoms,median,min,max,count\n"));
        let n_ca: Vec<&str> = text
            .lines()
            .find(|line| line.starts_with("bond,N-CA,"))
            .unwrap()
            .split(',')
            .collect();
        assert_eq!(n_ca[5], "8");
        let median: f64 = n_ca[2].parse().unwrap();
        assert!((median - 1.2f64.hypot(0.8)).abs() < 1e-3);
    }
}
