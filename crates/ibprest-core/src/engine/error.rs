use super::config::ConfigError;
use crate::core::geometry::GeometryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Structure '{0}' has no atoms in its first model")]
    EmptyStructure(String),

    #[error("Model {index} requested but the structure has {count} model(s)")]
    ModelOutOfRange { index: usize, count: usize },

    #[error("Geometry error at residue {residue}: {source}")]
    Geometry {
        residue: isize,
        #[source]
        source: GeometryError,
    },

    #[error("Geometry error while measuring {parameter}: {source}")]
    Calibration {
        parameter: &'static str,
        #[source]
        source: GeometryError,
    },

    #[error("Frame {index} requested but the trajectory has {count} frame(s)")]
    FrameOutOfRange { index: usize, count: usize },

    #[error("Trajectories differ in size: {expected} atoms in the reference, {found} in the result")]
    TrajectoryMismatch { expected: usize, found: usize },

    #[error("Superposition of frame {frame} failed: {source}")]
    Superposition {
        frame: usize,
        #[source]
        source: GeometryError,
    },

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
