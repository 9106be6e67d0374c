use super::config::{SynthesisConfig, SynthesisMode};
use super::error::EngineError;
use super::progress::ProgressReporter;
use crate::core::models::restraint::AtomRef;
use crate::core::models::selection::{AlignedSelections, Selection, align};
use crate::core::models::structure::Structure;
use std::ops::RangeInclusive;

/// An atom of a restraint template: residue offset from the current residue
/// and atom name.
pub type AtomSpec = (isize, &'static str);

/// Shared, read-only state of one synthesis run.
#[derive(Clone, Copy)]
pub struct SynthesisContext<'a> {
    pub structure: &'a Structure,
    pub config: &'a SynthesisConfig,
    pub reporter: &'a ProgressReporter<'a>,
    first_residue: isize,
    last_residue: isize,
}

impl<'a> SynthesisContext<'a> {
    pub fn new(
        structure: &'a Structure,
        config: &'a SynthesisConfig,
        reporter: &'a ProgressReporter<'a>,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let (first_residue, last_residue) = structure
            .residue_extent()
            .ok_or_else(|| EngineError::EmptyStructure(structure.source_name().to_string()))?;
        if let SynthesisMode::SingleModel { model_index } = config.mode {
            if model_index >= structure.model_count() {
                return Err(EngineError::ModelOutOfRange {
                    index: model_index,
                    count: structure.model_count(),
                });
            }
        }
        Ok(Self {
            structure,
            config,
            reporter,
            first_residue,
            last_residue,
        })
    }

    /// Residue numbers from the first to the last residue of model 0.
    pub fn residues(&self) -> RangeInclusive<isize> {
        self.first_residue..=self.last_residue
    }

    pub fn residue_count(&self) -> usize {
        (self.last_residue - self.first_residue + 1) as usize
    }

    /// 1-based restraint index of a residue number.
    pub fn index_of(&self, res_seq: isize) -> isize {
        res_seq - self.first_residue + 1
    }

    pub fn atom_ref(&self, res_seq: isize, name: &str) -> AtomRef {
        AtomRef::new(self.index_of(res_seq), name)
    }

    /// Positions of an atom in the models measured by the current mode.
    pub fn sample(&self, res_seq: isize, name: &str) -> Option<Selection> {
        match self.config.mode {
            SynthesisMode::Ensemble => self.structure.select(res_seq, name),
            SynthesisMode::SingleModel { model_index } => {
                let atom = self.structure.models().get(model_index)?.find(res_seq, name)?;
                Selection::from_entries(vec![(model_index, atom.position)])
            }
        }
    }

    /// Positions of several atoms around `res_seq`, paired model by model.
    ///
    /// `None` when any atom is absent or the atoms share no model.
    pub fn sample_aligned(&self, res_seq: isize, atoms: &[AtomSpec]) -> Option<AlignedSelections> {
        let selections: Vec<Selection> = atoms
            .iter()
            .map(|&(offset, name)| self.sample(res_seq + offset, name))
            .collect::<Option<_>>()?;
        let refs: Vec<&Selection> = selections.iter().collect();
        align(&refs)
    }
}
