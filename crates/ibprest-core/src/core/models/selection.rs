use nalgebra::Point3;

/// Positions of one (residue, atom name) key across the models of a structure.
///
/// A selection is never empty: a key found in no model is represented by
/// `None` at the call site, not by an empty `Selection`. Entries are in model
/// order and each remembers the index of the model it was taken from, so
/// selections from sparse ensembles can be paired model by model.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    model_indices: Vec<usize>,
    positions: Vec<Point3<f64>>,
}

impl Selection {
    /// Builds a selection from `(model index, position)` pairs in model order.
    ///
    /// Returns `None` when `entries` is empty.
    pub fn from_entries(entries: Vec<(usize, Point3<f64>)>) -> Option<Self> {
        if entries.is_empty() {
            return None;
        }
        let (model_indices, positions): (Vec<usize>, Vec<Point3<f64>>) =
            entries.into_iter().unzip();
        Some(Self {
            model_indices,
            positions,
        })
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    pub fn model_indices(&self) -> &[usize] {
        &self.model_indices
    }

    pub fn position_in_model(&self, model_index: usize) -> Option<&Point3<f64>> {
        self.model_indices
            .binary_search(&model_index)
            .ok()
            .map(|k| &self.positions[k])
    }
}

/// Positions of several selections restricted to the models they all share.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedSelections {
    pub model_indices: Vec<usize>,
    /// One column per input selection, each with `model_indices.len()` entries.
    pub columns: Vec<Vec<Point3<f64>>>,
}

/// Pairs selections model by model.
///
/// Returns `None` when the selections have no model in common (or when no
/// selection is given).
pub fn align(selections: &[&Selection]) -> Option<AlignedSelections> {
    let (first, rest) = selections.split_first()?;
    let model_indices: Vec<usize> = first
        .model_indices()
        .iter()
        .copied()
        .filter(|m| rest.iter().all(|s| s.model_indices().binary_search(m).is_ok()))
        .collect();

    if model_indices.is_empty() {
        return None;
    }

    let columns = selections
        .iter()
        .map(|s| {
            model_indices
                .iter()
                .filter_map(|&m| s.position_in_model(m).copied())
                .collect()
        })
        .collect();

    Some(AlignedSelections {
        model_indices,
        columns,
    })
}
