//! # Geometry Module
//!
//! Vector primitives and the geometric measures (distances, bond angles and
//! signed dihedrals) that every restraint is derived from, together with
//! Kabsch superposition for comparing structures.
//!
//! ## Overview
//!
//! - [`vector`] - Subtraction, dot and cross products, magnitude and a checked normalization
//! - [`measures`] - Scalar and elementwise (ensemble) distance, angle and dihedral measures
//! - [`superposition`] - Optimal rigid-body alignment and aligned RMSD
//!
//! Degenerate input never silently produces `NaN`: a zero-length vector is
//! reported as [`GeometryError::DivideByZero`], and ensemble measures over
//! position lists of different lengths as [`GeometryError::LengthMismatch`].

pub mod measures;
pub mod superposition;
pub mod vector;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Cannot normalize a zero-length vector (coincident atoms?)")]
    DivideByZero,

    #[error("Position lists differ in length: {expected} vs {found}")]
    LengthMismatch { expected: usize, found: usize },

    #[error("Superposition requires at least one point pair")]
    EmptyPointSet,

    #[error("Singular value decomposition failed to produce {0}")]
    Decomposition(&'static str),
}
