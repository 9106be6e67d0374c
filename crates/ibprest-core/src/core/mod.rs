//! # Core Module
//!
//! Stateless building blocks: geometry, the structure model, ensemble
//! statistics and file formats. Nothing in this module holds state between
//! calls; a parsed [`models::structure::Structure`] is read-only.
//!
//! - **Geometry** ([`geometry`]) - vector helpers, distances, angles, dihedrals and superposition
//! - **Structure model** ([`models`]) - atoms, models, selections, residues and restraints
//! - **Statistics** ([`statistics`]) - summaries used to turn ensemble measurements into restraints
//! - **File I/O** ([`io`]) - PDB and DCD readers, restraint, FASTA, run script and CSV writers

pub mod geometry;
pub mod io;
pub mod models;
pub mod statistics;
