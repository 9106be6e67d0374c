//! # Core Models Module
//!
//! Typed in-memory representation of parsed coordinate files and of the
//! restraints derived from them.
//!
//! ## Key Components
//!
//! - [`atom`] - One fixed-width `ATOM` record
//! - [`model`] - One conformational snapshot (NMR model or trajectory frame)
//! - [`structure`] - All models of a file, with atom selection and pooled bond/angle statistics
//! - [`selection`] - Per-model positions of one atom, and pairing of sparse selections
//! - [`residue`] - Amino acid types and one-letter codes
//! - [`restraint`] - Dihedral and distance restraints grouped into titled blocks
//!
//! ## Usage
//!
//! ```ignore
//! use ibprest::core::io::pdb::{AcceptancePolicy, PdbFile};
//!
//! let structure = PdbFile::read_from_path("input.pdb", &AcceptancePolicy::default())?;
//! if let Some(ca) = structure.select(12, "CA") {
//!     println!("CA 12 found in {} models", ca.len());
//! }
//! ```

pub mod atom;
pub mod model;
pub mod residue;
pub mod restraint;
pub mod selection;
pub mod structure;
