//! # Engine Module
//!
//! Turns measurements on a read-only [`Structure`](crate::core::models::structure::Structure)
//! into restraints and backbone statistics.
//!
//! - **Configuration** ([`config`]) - synthesis parameters, modes and terminal policy
//! - **Context** ([`context`]) - the shared state handed to every task
//! - **Tasks** ([`tasks`]) - base, backbone dihedral and distance restraints, calibration
//! - **Progress Monitoring** ([`progress`]) - progress events for front ends
//! - **Error Handling** ([`error`]) - engine-specific error types
//!
//! Tasks work residue by residue and run on the rayon thread pool when the
//! `parallel` feature is enabled. Output order is residue order either way.

pub mod config;
pub mod context;
pub mod error;
pub mod progress;
pub mod tasks;
