use crate::core::io::traits::OutputFile;
use crate::core::models::restraint::{AtomRef, Restraint, RestraintSet};
use std::io::{self, Write};

fn selector(atom: &AtomRef) -> String {
    format!("(resid {:>2} and name {:>2})", atom.residue, atom.name)
}

/// Formats one restraint as an `assign` statement.
///
/// Distances fit on one line. Dihedrals span two lines, the second one
/// indented to line up under the first selector and carrying the force
/// constant, target, tolerance and exponent.
pub fn format_restraint(restraint: &Restraint) -> String {
    match restraint {
        Restraint::Distance {
            atoms,
            distance,
            lower,
            upper,
        } => format!(
            "assign {} {} {:>8.3} {:>8.3} {:>8.3}",
            selector(&atoms[0]),
            selector(&atoms[1]),
            distance,
            lower,
            upper
        ),
        Restraint::Dihedral {
            atoms,
            angle,
            tolerance,
        } => format!(
            "assign {} {}\n       {} {} 1.0 {:>8.3} {:>8.3} 1",
            selector(&atoms[0]),
            selector(&atoms[1]),
            selector(&atoms[2]),
            selector(&atoms[3]),
            angle,
            tolerance
        ),
    }
}

/// Writer for XPLOR-style restraint files read by iBP-ng.
///
/// Every block starts with a blank line and its title as a `{* ... *}`
/// comment, followed by one statement per restraint.
pub struct RestraintFile;

impl OutputFile for RestraintFile {
    type Content = RestraintSet;
    type Error = io::Error;

    fn write_to(set: &RestraintSet, writer: &mut impl Write) -> Result<(), Self::Error> {
        if let Some(header) = &set.header {
            writeln!(writer)?;
            writeln!(writer, "{{* {} *}}", header)?;
        }
        for block in &set.blocks {
            writeln!(writer)?;
            writeln!(writer, "{{* {} *}}", block.title)?;
            for restraint in &block.restraints {
                writeln!(writer, "{}", format_restraint(restraint))?;
            }
        }
        Ok(())
    }
}
