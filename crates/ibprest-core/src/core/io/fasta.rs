use crate::core::io::traits::OutputFile;
use crate::core::models::residue::sequence_letter;
use crate::core::models::structure::Structure;
use std::io::{self, Write};

/// Residues per sequence line.
pub const LINE_WIDTH: usize = 50;

/// A named one-letter sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    pub name: String,
    pub sequence: String,
}

impl FastaRecord {
    /// Builds the sequence of model 0, one letter per residue number.
    ///
    /// Letters follow the iBP-ng topology: prolines are written as alanine
    /// and unrecognized residues as `X`.
    pub fn from_structure(structure: &Structure) -> Self {
        Self {
            name: structure.source_name().to_string(),
            sequence: structure
                .sequence()
                .values()
                .map(|name| sequence_letter(name))
                .collect(),
        }
    }
}

pub struct FastaFile;

impl OutputFile for FastaFile {
    type Content = FastaRecord;
    type Error = io::Error;

    fn write_to(record: &FastaRecord, writer: &mut impl Write) -> Result<(), Self::Error> {
        write!(writer, "> {}", record.name)?;
        for chunk in record.sequence.as_bytes().chunks(LINE_WIDTH) {
            writer.write_all(b"\n")?;
            writer.write_all(chunk)?;
        }
        writer.write_all(b"\n\n")?;
        Ok(())
    }
}
