pub mod backbone_dihedrals;
pub mod base_restraints;
pub mod calibration;
pub mod distance_restraints;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::core::models::atom::Atom;
    use crate::core::models::model::Model;
    use nalgebra::{Point3, Vector3};

    /// Places `d` bonded to `c` with the given bond length, `b-c-d` angle
    /// and `a-b-c-d` dihedral (degrees).
    pub fn place(
        a: &Point3<f64>,
        b: &Point3<f64>,
        c: &Point3<f64>,
        bond: f64,
        angle: f64,
        torsion: f64,
    ) -> Point3<f64> {
        let bc = (c - b).normalize();
        let n = (b - a).cross(&bc).normalize();
        let m = n.cross(&bc);
        let (angle, torsion) = (angle.to_radians(), torsion.to_radians());
        let local = Vector3::new(
            -bond * angle.cos(),
            bond * angle.sin() * torsion.cos(),
            bond * angle.sin() * torsion.sin(),
        );
        c + bc * local.x + m * local.y + n * local.z
    }

    /// Builds a backbone (`N CA C O H HA`) numbered from `first_residue`
    /// with per-residue phi, psi and omega (degrees).
    ///
    /// The phi of the first residue and the psi/omega of the last one are
    /// ignored.
    pub fn backbone(first_residue: isize, phi: &[f64], psi: &[f64], omega: &[f64]) -> Model {
        let n_res = phi.len();
        let mut atoms = Vec::new();
        let mut n = Point3::new(0.0, 0.0, 0.0);
        let mut ca = Point3::new(1.458, 0.0, 0.0);
        let t = 111.2f64.to_radians();
        let mut c = ca + Vector3::new(-t.cos(), t.sin(), 0.0) * 1.525;
        let mut prev: Option<(Point3<f64>, Point3<f64>)> = None;

        for k in 0..n_res {
            let res_seq = first_residue + k as isize;
            if k > 0 {
                let (prev_ca, prev_c) = (ca, c);
                let prev_n = n;
                n = place(&prev_n, &prev_ca, &prev_c, 1.329, 116.2, psi[k - 1]);
                ca = place(&prev_ca, &prev_c, &n, 1.458, 121.7, omega[k - 1]);
                c = place(&prev_c, &n, &ca, 1.525, 111.2, phi[k]);
                prev = Some((prev_ca, prev_c));
            }
            let h = match prev {
                Some((prev_ca, prev_c)) => place(&prev_ca, &prev_c, &n, 1.01, 123.0, 0.0),
                None => place(&c, &ca, &n, 1.01, 109.5, 60.0),
            };
            let ha = place(&n, &c, &ca, 1.09, 109.5, -120.0);
            let o = place(&n, &ca, &c, 1.231, 120.5, psi.get(k).copied().unwrap_or(0.0) + 180.0);
            for (name, pos) in [("N", n), ("CA", ca), ("C", c), ("O", o), ("H", h), ("HA", ha)] {
                atoms.push(Atom::new(atoms.len() + 1, name, "ALA", 'A', res_seq, pos));
            }
        }
        Model::from_atoms(atoms)
    }
}
