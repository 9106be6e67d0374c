use nalgebra::Point3;

/// One `ATOM` record of a coordinate file.
///
/// Fields mirror the fixed-width columns of the record and are validated when
/// the line is parsed; an `Atom` is never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Serial number, in file order.
    pub serial: usize,
    /// The atom name (e.g., "CA", "N", "H").
    pub name: String,
    /// Alternate location indicator, `' '` when absent.
    pub alt_loc: char,
    /// Three-letter residue name (e.g., "ALA").
    pub res_name: String,
    /// Chain identifier.
    pub chain_id: char,
    /// Residue sequence number.
    pub res_seq: isize,
    /// Insertion code, `' '` when absent.
    pub i_code: char,
    /// Cartesian coordinates in Angstroms.
    pub position: Point3<f64>,
}

impl Atom {
    /// Creates an atom with blank alternate location and insertion code.
    ///
    /// Mostly useful for building structures in code; parsed atoms carry every
    /// field from the record.
    pub fn new(
        serial: usize,
        name: &str,
        res_name: &str,
        chain_id: char,
        res_seq: isize,
        position: Point3<f64>,
    ) -> Self {
        Self {
            serial,
            name: name.to_string(),
            alt_loc: ' ',
            res_name: res_name.to_string(),
            chain_id,
            res_seq,
            i_code: ' ',
            position,
        }
    }

    /// Whether this atom is addressed by the given residue number and name.
    #[inline]
    pub fn matches(&self, res_seq: isize, name: &str) -> bool {
        self.res_seq == res_seq && self.name == name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_atom_has_blank_optional_columns() {
        let atom = Atom::new(7, "CA", "GLY", 'A', 3, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(atom.serial, 7);
        assert_eq!(atom.name, "CA");
        assert_eq!(atom.res_name, "GLY");
        assert_eq!(atom.chain_id, 'A');
        assert_eq!(atom.res_seq, 3);
        assert_eq!(atom.alt_loc, ' ');
        assert_eq!(atom.i_code, ' ');
        assert_eq!(atom.position, Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn matches_requires_both_residue_and_name() {
        let atom = Atom::new(1, "N", "ALA", 'A', 10, Point3::origin());
        assert!(atom.matches(10, "N"));
        assert!(!atom.matches(11, "N"));
        assert!(!atom.matches(10, "CA"));
    }
}
