use crate::core::io::traits::StructureFile;
use crate::core::models::atom::Atom;
use crate::core::models::model::Model;
use crate::core::models::structure::Structure;
use nalgebra::Point3;
use std::collections::HashSet;
use std::io::{self, BufRead};
use thiserror::Error;
use tracing::{debug, warn};

/// Atom names kept by default: the backbone heavy atoms plus the amide and
/// alpha protons.
pub const DEFAULT_ATOM_NAMES: [&str; 6] = ["N", "CA", "C", "O", "H", "HA"];
pub const DEFAULT_CHAIN_ID: char = 'A';

/// Shortest line that still holds the z coordinate (columns 47-54).
const MIN_ATOM_LINE_LENGTH: usize = 54;

/// Which parsed atoms are retained in the structure.
///
/// An atom is kept when its chain identifier is one of `chain_ids` and its
/// name is one of `atom_names`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptancePolicy {
    chain_ids: HashSet<char>,
    atom_names: HashSet<String>,
}

impl Default for AcceptancePolicy {
    fn default() -> Self {
        Self::new([DEFAULT_CHAIN_ID], DEFAULT_ATOM_NAMES)
    }
}

impl AcceptancePolicy {
    pub fn new<C, N, S>(chain_ids: C, atom_names: N) -> Self
    where
        C: IntoIterator<Item = char>,
        N: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            chain_ids: chain_ids.into_iter().collect(),
            atom_names: atom_names
                .into_iter()
                .map(|s| s.as_ref().trim().to_string())
                .collect(),
        }
    }

    pub fn accepts(&self, atom: &Atom) -> bool {
        self.chain_ids.contains(&atom.chain_id) && self.atom_names.contains(&atom.name)
    }

    pub fn chain_ids(&self) -> &HashSet<char> {
        &self.chain_ids
    }

    pub fn atom_names(&self) -> &HashSet<String> {
        &self.atom_names
    }
}

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: PdbParseErrorKind },
    #[error("MODEL record on line {line} has no matching ENDMDL")]
    UnterminatedModel { line: usize },
    #[error("ENDMDL record on line {line} without an open MODEL")]
    UnexpectedEndModel { line: usize },
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Line is too short for an ATOM record (must be at least 54 chars, got {length})")]
    LineTooShort { length: usize },
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

fn column_char(line: &str, index: usize) -> char {
    line.get(index..index + 1)
        .and_then(|s| s.chars().next())
        .unwrap_or(' ')
}

fn parse_int<T: std::str::FromStr>(
    line: &str,
    start: usize,
    end: usize,
    line_num: usize,
) -> Result<T, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidInt {
            columns: format!("{}-{}", start + 1, end),
            value: value.into(),
        },
    })
}

fn parse_float(line: &str, start: usize, end: usize, line_num: usize) -> Result<f64, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: format!("{}-{}", start + 1, end),
            value: value.into(),
        },
    })
}

/// Parses one `ATOM` record using the standard fixed-width layout.
pub fn parse_atom_line(line: &str, line_num: usize) -> Result<Atom, PdbError> {
    if line.len() < MIN_ATOM_LINE_LENGTH {
        return Err(PdbError::Parse {
            line: line_num,
            kind: PdbParseErrorKind::LineTooShort { length: line.len() },
        });
    }

    let serial: usize = parse_int(line, 6, 11, line_num)?;
    let res_seq: isize = parse_int(line, 22, 26, line_num)?;
    let x = parse_float(line, 30, 38, line_num)?;
    let y = parse_float(line, 38, 46, line_num)?;
    let z = parse_float(line, 46, 54, line_num)?;

    Ok(Atom {
        serial,
        name: slice_and_trim(line, 12, 16).to_string(),
        alt_loc: column_char(line, 16),
        res_name: slice_and_trim(line, 17, 20).to_string(),
        chain_id: column_char(line, 21),
        res_seq,
        i_code: column_char(line, 26),
        position: Point3::new(x, y, z),
    })
}

/// Reader for Protein Data Bank coordinate files.
///
/// Models are delimited by `MODEL`/`ENDMDL` records and only `ATOM` records
/// inside a model are read. A file without any `MODEL` record is read as a
/// single model holding all of its `ATOM` records.
pub struct PdbFile;

impl StructureFile for PdbFile {
    type Options = AcceptancePolicy;
    type Error = PdbError;

    fn read_from(
        reader: &mut impl BufRead,
        source_name: &str,
        policy: &AcceptancePolicy,
    ) -> Result<Structure, Self::Error> {
        let mut models: Vec<Model> = Vec::new();
        let mut implicit = Model::new();
        let mut current: Option<(usize, Model)> = None;
        let mut seen_model_record = false;
        let mut atom_records = 0usize;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line = line.trim_end();
            let line_num = line_num + 1;

            if line.starts_with("MODEL ") || line == "MODEL" {
                if let Some((start, _)) = current {
                    return Err(PdbError::UnterminatedModel { line: start });
                }
                seen_model_record = true;
                current = Some((line_num, Model::new()));
            } else if line.starts_with("ENDMDL") {
                let (_, model) = current
                    .take()
                    .ok_or(PdbError::UnexpectedEndModel { line: line_num })?;
                models.push(model);
            } else if line.starts_with("ATOM  ") {
                atom_records += 1;
                let target = match current.as_mut() {
                    Some((_, model)) => model,
                    None if !seen_model_record => &mut implicit,
                    None => continue,
                };
                let atom = parse_atom_line(line, line_num)?;
                if !policy.accepts(&atom) {
                    continue;
                }
                let (res_seq, name) = (atom.res_seq, atom.name.clone());
                if !target.push(atom) {
                    warn!(
                        line = line_num,
                        "Duplicate atom '{}' in residue {}; keeping the first occurrence.",
                        name,
                        res_seq
                    );
                }
            }
        }

        if let Some((start, _)) = current {
            return Err(PdbError::UnterminatedModel { line: start });
        }
        if atom_records == 0 {
            return Err(PdbError::MissingRecord("ATOM records".into()));
        }
        if !seen_model_record {
            models.push(implicit);
        }
        if models.first().is_none_or(Model::is_empty) {
            warn!(
                source = source_name,
                "No atoms of model 0 passed the acceptance policy."
            );
        }

        debug!(
            source = source_name,
            models = models.len(),
            atom_records,
            "Parsed coordinate file."
        );
        Ok(Structure::new(source_name, models))
    }
}
