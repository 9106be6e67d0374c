//! Single-model restraint experiments with widened loop tolerances.
//!
//! Each experiment restrains one model with its own dihedrals, widening phi
//! and psi of the flexible loop residues by `eps` degrees, and adds every
//! amide-proton distance up to `dmax`. Its outcome is summarized on one
//! whitespace-separated line, `eps dmax n_dist solved elapsed`.

use crate::core::models::restraint::RestraintSet;
use crate::core::models::structure::Structure;
use crate::engine::config::{ConfigError, SynthesisConfig, SynthesisMode};
use crate::engine::error::EngineError;
use crate::engine::progress::ProgressReporter;
use crate::workflows::restraints;
use std::fmt;
use std::time::Duration;
use tracing::{info, instrument};

/// Formats a parameter the way experiment file names spell it: whole
/// numbers keep one decimal (`10.0`), others print in shortest form (`2.5`).
pub fn format_parameter(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoopsConfig {
    pub eps: f64,
    pub dmax: f64,
    pub model_index: usize,
    /// Remaining synthesis parameters. Mode, flexible tolerance, cutoff and
    /// header are replaced by the experiment's own values.
    pub synthesis: SynthesisConfig,
}

impl LoopsConfig {
    pub fn new(eps: f64, dmax: f64) -> Self {
        Self {
            eps,
            dmax,
            model_index: 0,
            synthesis: SynthesisConfig::single_model(0, eps, dmax),
        }
    }

    /// Synthesis parameters of this experiment.
    pub fn synthesis_config(&self) -> Result<SynthesisConfig, ConfigError> {
        let config = SynthesisConfig {
            mode: SynthesisMode::SingleModel {
                model_index: self.model_index,
            },
            flexible_tolerance: self.eps,
            distance_cutoff: self.dmax,
            header: Some(format!(
                "loops.res: eps = {}, dmax = {}",
                format_parameter(self.eps),
                format_parameter(self.dmax)
            )),
            ..self.synthesis.clone()
        };
        config.validate()?;
        Ok(config)
    }

    /// Shared stem of every file of this experiment, e.g. `loops-2.0-8.0`.
    pub fn stem(&self) -> String {
        format!(
            "loops-{}-{}",
            format_parameter(self.eps),
            format_parameter(self.dmax)
        )
    }
}

#[derive(Debug, Clone)]
pub struct LoopsResult {
    pub stem: String,
    pub restraints: RestraintSet,
}

impl LoopsResult {
    pub fn distance_count(&self) -> usize {
        self.restraints.distance_count()
    }
}

#[instrument(skip_all, name = "loops_workflow", fields(eps = config.eps, dmax = config.dmax))]
pub fn run(
    structure: &Structure,
    config: &LoopsConfig,
    reporter: &ProgressReporter,
) -> Result<LoopsResult, EngineError> {
    let synthesis = config.synthesis_config()?;

    let restraints = restraints::run(structure, &synthesis, reporter)?;
    let result = LoopsResult {
        stem: config.stem(),
        restraints,
    };
    info!(
        stem = %result.stem,
        distances = result.distance_count(),
        "Loop restraints ready."
    );
    Ok(result)
}

/// Summary line of one experiment.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopsReport {
    pub eps: f64,
    pub dmax: f64,
    pub distance_count: usize,
    pub solved: bool,
    pub elapsed: Duration,
}

impl fmt::Display for LoopsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {:.3}",
            format_parameter(self.eps),
            format_parameter(self.dmax),
            self.distance_count,
            if self.solved { "True" } else { "False" },
            self.elapsed.as_secs_f64()
        )
    }
}
