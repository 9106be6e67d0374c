use super::atom::Atom;
use itertools::Itertools;
use std::collections::HashMap;

/// One conformational snapshot: an NMR model or a trajectory frame.
///
/// Atoms are kept in file order. Lookups by `(residue number, atom name)`
/// resolve to the first atom carrying that key; later duplicates (typically
/// alternate locations) stay in [`Model::atoms`] but are never selected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    atoms: Vec<Atom>,
    key_index: HashMap<(isize, String), usize>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a model from atoms in file order.
    pub fn from_atoms(atoms: Vec<Atom>) -> Self {
        let mut model = Self::new();
        for atom in atoms {
            model.push(atom);
        }
        model
    }

    /// Appends an atom, returning `false` if its key was already present.
    pub(crate) fn push(&mut self, atom: Atom) -> bool {
        let key = (atom.res_seq, atom.name.clone());
        let index = self.atoms.len();
        self.atoms.push(atom);
        match self.key_index.entry(key) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(index);
                true
            }
        }
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// The first atom with the given residue number and name.
    pub fn find(&self, res_seq: isize, name: &str) -> Option<&Atom> {
        self.key_index
            .get(&(res_seq, name.to_string()))
            .map(|&i| &self.atoms[i])
    }

    /// Smallest and largest residue number among the atoms of this model.
    pub fn residue_extent(&self) -> Option<(isize, isize)> {
        self.atoms.iter().map(|a| a.res_seq).minmax().into_option()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn atom(serial: usize, name: &str, res_seq: isize, x: f64) -> Atom {
        Atom::new(serial, name, "ALA", 'A', res_seq, Point3::new(x, 0.0, 0.0))
    }

    #[test]
    fn find_returns_first_occurrence_of_a_key() {
        let mut model = Model::new();
        assert!(model.push(atom(1, "CA", 4, 1.0)));
        assert!(!model.push(atom(2, "CA", 4, 2.0)));
        assert_eq!(model.len(), 2);
        assert_eq!(model.find(4, "CA").map(|a| a.serial), Some(1));
        assert!(model.find(4, "N").is_none());
    }

    #[test]
    fn residue_extent_spans_all_atoms() {
        let model = Model::from_atoms(vec![
            atom(1, "N", 7, 0.0),
            atom(2, "N", 3, 0.0),
            atom(3, "N", 12, 0.0),
        ]);
        assert_eq!(model.residue_extent(), Some((3, 12)));
        assert_eq!(Model::new().residue_extent(), None);
    }
}
