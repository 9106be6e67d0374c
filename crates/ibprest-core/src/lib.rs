//! # ibprest
//!
//! Restraint derivation for the iBP-ng protein structure solver. Coordinate
//! files (single structures or NMR ensembles) are measured to produce
//! dihedral and amide-proton distance restraints, backbone statistics, and
//! the input files of an iBP-ng run; the solver's DCD trajectories are read
//! back for comparison.
//!
//! The library has three layers:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Structure`, `Selection`,
//!   `Restraint`), geometric measures, summary statistics and file formats.
//!
//! - **[`engine`]: The Logic Core.** Restraint synthesis and calibration tasks
//!   driven by a `SynthesisConfig`, with progress reporting and optional rayon
//!   parallelism.
//!
//! - **[`workflows`]: The Public API.** Complete procedures such as deriving the
//!   restraints of an ensemble, running a loop experiment or preparing a run
//!   directory.

pub mod core;
pub mod engine;
pub mod workflows;
