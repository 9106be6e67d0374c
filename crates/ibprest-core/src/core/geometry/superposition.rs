use super::GeometryError;
use nalgebra::{Matrix3, Point3, Vector3};

/// Rigid-body transform that best maps a moving point set onto a reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Superposition {
    pub rotation: Matrix3<f64>,
    pub translation: Vector3<f64>,
    /// Root-mean-square deviation after alignment, in the input units.
    pub rmsd: f64,
}

impl Superposition {
    pub fn apply(&self, point: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.rotation * point.coords + self.translation)
    }
}

fn centroid(points: &[Point3<f64>]) -> Vector3<f64> {
    points.iter().map(|p| p.coords).sum::<Vector3<f64>>() / points.len() as f64
}

/// Computes the Kabsch superposition of `moving` onto `reference`.
///
/// Both sets are centered on their centroids, the covariance
/// `H = sum(p_k q_k^T)` is decomposed as `U S V^T`, and the rotation is
/// `V D U^T` where `D` flips the last axis when needed to exclude
/// reflections.
///
/// # Errors
///
/// Returns [`GeometryError::LengthMismatch`] for point sets of different
/// sizes, [`GeometryError::EmptyPointSet`] for empty input, and
/// [`GeometryError::Decomposition`] if the SVD does not yield its factors.
pub fn superpose(
    moving: &[Point3<f64>],
    reference: &[Point3<f64>],
) -> Result<Superposition, GeometryError> {
    if moving.len() != reference.len() {
        return Err(GeometryError::LengthMismatch {
            expected: reference.len(),
            found: moving.len(),
        });
    }
    if moving.is_empty() {
        return Err(GeometryError::EmptyPointSet);
    }

    let center_moving = centroid(moving);
    let center_reference = centroid(reference);

    let mut covariance = Matrix3::zeros();
    for (p, q) in moving.iter().zip(reference) {
        covariance += (p.coords - center_moving) * (q.coords - center_reference).transpose();
    }

    let svd = covariance.svd(true, true);
    let u = svd.u.ok_or(GeometryError::Decomposition("U"))?;
    let v_t = svd.v_t.ok_or(GeometryError::Decomposition("V^T"))?;

    let mut correction = Matrix3::identity();
    if (u.determinant() * v_t.determinant()) < 0.0 {
        correction[(2, 2)] = -1.0;
    }
    let rotation = v_t.transpose() * correction * u.transpose();
    let translation = center_reference - rotation * center_moving;

    let mut fit = Superposition {
        rotation,
        translation,
        rmsd: 0.0,
    };
    let squared_sum: f64 = moving
        .iter()
        .zip(reference)
        .map(|(p, q)| (fit.apply(p) - q).norm_squared())
        .sum();
    fit.rmsd = (squared_sum / moving.len() as f64).sqrt();
    Ok(fit)
}

/// RMSD between two point sets after optimal superposition.
pub fn aligned_rmsd(
    moving: &[Point3<f64>],
    reference: &[Point3<f64>],
) -> Result<f64, GeometryError> {
    superpose(moving, reference).map(|s| s.rmsd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Rotation3, Unit};

    fn chiral_points() -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.5, 0.0, 0.0),
            Point3::new(2.0, 1.4, 0.0),
            Point3::new(3.4, 1.6, 0.9),
            Point3::new(4.1, 2.9, 1.2),
        ]
    }

    #[test]
    fn rigidly_moved_copy_aligns_to_zero_rmsd() {
        let reference = chiral_points();
        let rotation =
            Rotation3::from_axis_angle(&Unit::new_normalize(Vector3::new(1.0, 2.0, 0.5)), 1.1);
        let shift = Vector3::new(-3.0, 7.5, 2.0);
        let moving: Vec<_> = reference.iter().map(|p| rotation * p + shift).collect();

        let fit = superpose(&moving, &reference).unwrap();
        assert!(fit.rmsd < 1e-9);
        for (m, r) in moving.iter().zip(&reference) {
            assert!((fit.apply(m) - r).norm() < 1e-9);
        }
    }

    #[test]
    fn mirror_image_is_not_superimposable() {
        let reference = chiral_points();
        let mirrored: Vec<_> = reference
            .iter()
            .map(|p| Point3::new(p.x, p.y, -p.z))
            .collect();
        let fit = superpose(&mirrored, &reference).unwrap();
        assert!(fit.rmsd > 1e-3);
        assert!((fit.rotation.determinant() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn identical_sets_have_zero_rmsd() {
        let points = chiral_points();
        assert!(aligned_rmsd(&points, &points).unwrap() < 1e-12);
    }

    #[test]
    fn mismatched_or_empty_sets_are_rejected() {
        let points = chiral_points();
        assert!(matches!(
            superpose(&points[..3], &points),
            Err(GeometryError::LengthMismatch { expected: 5, found: 3 })
        ));
        assert_eq!(superpose(&[], &[]), Err(GeometryError::EmptyPointSet));
    }
}
