/// Reference to one atom in a restraint, by 1-based residue index and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AtomRef {
    pub residue: isize,
    pub name: String,
}

impl AtomRef {
    pub fn new(residue: isize, name: &str) -> Self {
        Self {
            residue,
            name: name.to_string(),
        }
    }
}

/// A synthesized geometric restraint.
#[derive(Debug, Clone, PartialEq)]
pub enum Restraint {
    /// Target dihedral angle (degrees) with a symmetric tolerance.
    Dihedral {
        atoms: [AtomRef; 4],
        angle: f64,
        tolerance: f64,
    },
    /// Target distance (Angstroms) with lower and upper deviations.
    Distance {
        atoms: [AtomRef; 2],
        distance: f64,
        lower: f64,
        upper: f64,
    },
}

impl Restraint {
    pub fn is_distance(&self) -> bool {
        matches!(self, Restraint::Distance { .. })
    }

    pub fn atoms(&self) -> &[AtomRef] {
        match self {
            Restraint::Dihedral { atoms, .. } => atoms,
            Restraint::Distance { atoms, .. } => atoms,
        }
    }
}

/// A titled group of restraints, written under a brace comment.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RestraintBlock {
    pub title: String,
    pub restraints: Vec<Restraint>,
}

impl RestraintBlock {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            restraints: Vec::new(),
        }
    }
}

/// Restraints in output order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RestraintSet {
    /// Optional heading written before the first block.
    pub header: Option<String>,
    pub blocks: Vec<RestraintBlock>,
}

impl RestraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn restraints(&self) -> impl Iterator<Item = &Restraint> {
        self.blocks.iter().flat_map(|b| b.restraints.iter())
    }

    pub fn distance_count(&self) -> usize {
        self.restraints().filter(|r| r.is_distance()).count()
    }

    pub fn dihedral_count(&self) -> usize {
        self.restraints().filter(|r| !r.is_distance()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dihedral() -> Restraint {
        Restraint::Dihedral {
            atoms: [
                AtomRef::new(1, "C"),
                AtomRef::new(2, "N"),
                AtomRef::new(2, "CA"),
                AtomRef::new(2, "C"),
            ],
            angle: -60.0,
            tolerance: 5.0,
        }
    }

    fn distance() -> Restraint {
        Restraint::Distance {
            atoms: [AtomRef::new(1, "H1"), AtomRef::new(7, "H1")],
            distance: 4.2,
            lower: 0.3,
            upper: 0.4,
        }
    }

    #[test]
    fn set_counts_restraints_by_kind_across_blocks() {
        let mut set = RestraintSet::new();
        let mut first = RestraintBlock::new("resid 2");
        first.restraints.push(dihedral());
        let mut second = RestraintBlock::new("distance restraints");
        second.restraints.push(distance());
        second.restraints.push(distance());
        set.blocks.push(first);
        set.blocks.push(second);

        assert_eq!(set.dihedral_count(), 1);
        assert_eq!(set.distance_count(), 2);
        assert_eq!(set.restraints().count(), 3);
    }

    #[test]
    fn atoms_exposes_all_references() {
        assert_eq!(dihedral().atoms().len(), 4);
        assert_eq!(distance().atoms()[1], AtomRef::new(7, "H1"));
    }
}
