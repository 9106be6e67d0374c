//! Readers and writers for the file formats exchanged with iBP-ng.
//!
//! Coordinate files are read through [`traits::StructureFile`]; the text
//! outputs (restraints, sequences, run scripts) are written through
//! [`traits::OutputFile`]. Binary trajectories and calibration tables have
//! their own entry points.

pub mod dcd;
pub mod fasta;
pub mod parameters;
pub mod pdb;
pub mod restraints;
pub mod runscript;
pub mod traits;
