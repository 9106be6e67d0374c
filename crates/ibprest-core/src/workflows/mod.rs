//! # Workflows Module
//!
//! End-to-end procedures built from the `core` and `engine` layers. Each
//! workflow takes parsed inputs and a [`ProgressReporter`](crate::engine::progress::ProgressReporter)
//! and returns plain results; only [`prepare`] touches the filesystem.
//!
//! - **Restraints** ([`restraints`]) - the full restraint set of a structure
//! - **Loops** ([`loops`]) - single-model restraints with widened loop tolerances
//! - **Calibration** ([`calibrate`]) - pooled backbone bond and angle statistics
//! - **Comparison** ([`compare`]) - aligned RMSD between trajectory frames
//! - **Preparation** ([`prepare`]) - sequence, restraints and run script for iBP-ng

pub mod calibrate;
pub mod compare;
pub mod loops;
pub mod prepare;
pub mod restraints;
