use crate::core::io::parameters::ParameterRecord;
use crate::core::models::structure::Structure;
use crate::engine::error::EngineError;
use crate::engine::progress::ProgressReporter;
use crate::engine::tasks;
use tracing::{info, instrument};

/// Backbone bond and angle statistics pooled over every model of `structure`.
#[instrument(skip_all, name = "calibrate_workflow", fields(source = structure.source_name()))]
pub fn run(
    structure: &Structure,
    reporter: &ProgressReporter,
) -> Result<Vec<ParameterRecord>, EngineError> {
    let records = reporter.phase("Backbone Calibration", || {
        tasks::calibration::run(structure, reporter)
    })?;
    info!(terms = records.len(), "Calibration complete.");
    Ok(records)
}
