use super::model::Model;
use super::selection::{Selection, align};
use crate::core::geometry::GeometryError;
use crate::core::geometry::measures::{angles, distances};
use crate::core::statistics::{median, min_max};
use std::collections::BTreeMap;

/// Pooled summary of one bond or angle measured over a whole structure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PooledStatistic {
    pub median: f64,
    pub min: f64,
    pub max: f64,
    /// Number of pooled measurements (residues times contributing models).
    pub count: usize,
}

impl PooledStatistic {
    fn from_values(values: &[f64]) -> Option<Self> {
        let (min, max) = min_max(values)?;
        Some(Self {
            median: median(values)?,
            min,
            max,
            count: values.len(),
        })
    }
}

/// All models parsed from one coordinate file.
///
/// Every model is expected to share the residue numbering and atom-name
/// vocabulary of model 0, although any given atom may be missing from some
/// models. A structure is read-only once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Structure {
    source_name: String,
    models: Vec<Model>,
}

impl Structure {
    pub fn new(source_name: &str, models: Vec<Model>) -> Self {
        Self {
            source_name: source_name.to_string(),
            models,
        }
    }

    /// Name of the file (or stream) the structure was read from.
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// Collects the position of `(res_seq, name)` from every model that has it.
    ///
    /// # Return
    ///
    /// `None` when no model contains the atom. Absence is an ordinary outcome
    /// that simply makes a restraint inapplicable.
    pub fn select(&self, res_seq: isize, name: &str) -> Option<Selection> {
        let entries = self
            .models
            .iter()
            .enumerate()
            .filter_map(|(i, model)| model.find(res_seq, name).map(|atom| (i, atom.position)))
            .collect();
        Selection::from_entries(entries)
    }

    /// Residue numbers `(min, max)` observed in model 0.
    ///
    /// Model 0 is taken as representative of the numbering of the whole
    /// structure.
    pub fn residue_extent(&self) -> Option<(isize, isize)> {
        self.models.first()?.residue_extent()
    }

    /// Residue names of model 0 keyed by residue number.
    pub fn sequence(&self) -> BTreeMap<isize, String> {
        self.models
            .first()
            .map(|model| {
                model
                    .atoms()
                    .iter()
                    .map(|a| (a.res_seq, a.res_name.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every length of the bond `name_i(r) - name_j(r + offset_j)` over all
    /// residues `r` of the extent and all models holding both atoms.
    pub fn bond_lengths(
        &self,
        name_i: &str,
        name_j: &str,
        offset_j: isize,
    ) -> Result<Vec<f64>, GeometryError> {
        let Some((rmin, rmax)) = self.residue_extent() else {
            return Ok(Vec::new());
        };
        let mut pooled = Vec::new();
        for r in rmin..=rmax {
            let (Some(ai), Some(aj)) = (self.select(r, name_i), self.select(r + offset_j, name_j))
            else {
                continue;
            };
            if let Some(aligned) = align(&[&ai, &aj]) {
                pooled.extend(distances(&aligned.columns[0], &aligned.columns[1])?);
            }
        }
        Ok(pooled)
    }

    /// Every angle `name_i(r) - name_j(r + offset_j) - name_k(r + offset_k)`
    /// over all residues of the extent and all models holding the three atoms.
    pub fn bond_angles(
        &self,
        name_i: &str,
        name_j: &str,
        name_k: &str,
        offset_j: isize,
        offset_k: isize,
    ) -> Result<Vec<f64>, GeometryError> {
        let Some((rmin, rmax)) = self.residue_extent() else {
            return Ok(Vec::new());
        };
        let mut pooled = Vec::new();
        for r in rmin..=rmax {
            let (Some(ai), Some(aj), Some(ak)) = (
                self.select(r, name_i),
                self.select(r + offset_j, name_j),
                self.select(r + offset_k, name_k),
            ) else {
                continue;
            };
            if let Some(aligned) = align(&[&ai, &aj, &ak]) {
                pooled.extend(angles(
                    &aligned.columns[0],
                    &aligned.columns[1],
                    &aligned.columns[2],
                )?);
            }
        }
        Ok(pooled)
    }

    /// Median, minimum and maximum of [`Structure::bond_lengths`].
    ///
    /// Residues lacking either atom are skipped. `Ok(None)` when nothing was
    /// measured.
    pub fn bond_statistic(
        &self,
        name_i: &str,
        name_j: &str,
        offset_j: isize,
    ) -> Result<Option<PooledStatistic>, GeometryError> {
        let values = self.bond_lengths(name_i, name_j, offset_j)?;
        Ok(PooledStatistic::from_values(&values))
    }

    /// Median, minimum and maximum of [`Structure::bond_angles`].
    pub fn angle_statistic(
        &self,
        name_i: &str,
        name_j: &str,
        name_k: &str,
        offset_j: isize,
        offset_k: isize,
    ) -> Result<Option<PooledStatistic>, GeometryError> {
        let values = self.bond_angles(name_i, name_j, name_k, offset_j, offset_k)?;
        Ok(PooledStatistic::from_values(&values))
    }
}
