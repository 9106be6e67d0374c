//! Distances, bond angles and signed dihedral angles.
//!
//! Every measure exists in two explicit forms: a scalar form over single
//! positions and an elementwise form over ensembles, where the `k`-th entry
//! of each input slice belongs to the same structural model. Angles are in
//! degrees.

use super::GeometryError;
use super::vector::{cross, dot, magnitude, normalize, subtract};
use nalgebra::Point3;

/// Euclidean distance between two positions.
pub fn distance(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    magnitude(&subtract(a, b))
}

/// Angle at vertex `b` formed by the rays `b -> a` and `b -> c`.
///
/// # Errors
///
/// Returns [`GeometryError::DivideByZero`] when either ray has zero length.
pub fn angle(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> Result<f64, GeometryError> {
    let ba = normalize(&subtract(a, b))?;
    let bc = normalize(&subtract(c, b))?;
    // Round-off on (anti)parallel rays can push the cosine just past +/-1.
    let cosine = dot(&ba, &bc).clamp(-1.0, 1.0);
    Ok(cosine.acos().to_degrees())
}

/// Signed dihedral angle about the `b-c` bond, in `(-180, 180]`.
///
/// Uses the two-plane-normal construction: with `b1 = a - b`, `b2 = b - c`
/// and `b3 = c - d`, the plane normals are `n1 = |b1 x b2|` and
/// `n2 = |b2 x b3|`, the in-plane reference is `m = n1 x |b2|`, and the
/// angle is `atan2(m . n2, n1 . n2)`. Restraint polarity depends on this
/// exact sign convention.
///
/// # Errors
///
/// Returns [`GeometryError::DivideByZero`] when three consecutive points are
/// collinear or two consecutive points coincide.
pub fn dihedral(
    a: &Point3<f64>,
    b: &Point3<f64>,
    c: &Point3<f64>,
    d: &Point3<f64>,
) -> Result<f64, GeometryError> {
    let b1 = subtract(a, b);
    let b2 = subtract(b, c);
    let b3 = subtract(c, d);

    let n1 = normalize(&cross(&b1, &b2))?;
    let n2 = normalize(&cross(&b2, &b3))?;
    let m = cross(&n1, &normalize(&b2)?);

    Ok(dot(&m, &n2).atan2(dot(&n1, &n2)).to_degrees())
}

fn check_lengths(lists: &[&[Point3<f64>]]) -> Result<usize, GeometryError> {
    let expected = lists.first().map_or(0, |l| l.len());
    for list in lists.iter().skip(1) {
        if list.len() != expected {
            return Err(GeometryError::LengthMismatch {
                expected,
                found: list.len(),
            });
        }
    }
    Ok(expected)
}

/// Elementwise [`distance`] over two ensembles of equal length.
pub fn distances(a: &[Point3<f64>], b: &[Point3<f64>]) -> Result<Vec<f64>, GeometryError> {
    check_lengths(&[a, b])?;
    Ok(a.iter().zip(b).map(|(p, q)| distance(p, q)).collect())
}

/// Elementwise [`angle`] over three ensembles of equal length.
pub fn angles(
    a: &[Point3<f64>],
    b: &[Point3<f64>],
    c: &[Point3<f64>],
) -> Result<Vec<f64>, GeometryError> {
    let n = check_lengths(&[a, b, c])?;
    (0..n).map(|k| angle(&a[k], &b[k], &c[k])).collect()
}

/// Elementwise [`dihedral`] over four ensembles of equal length.
pub fn dihedrals(
    a: &[Point3<f64>],
    b: &[Point3<f64>],
    c: &[Point3<f64>],
    d: &[Point3<f64>],
) -> Result<Vec<f64>, GeometryError> {
    let n = check_lengths(&[a, b, c, d])?;
    (0..n)
        .map(|k| dihedral(&a[k], &b[k], &c[k], &d[k]))
        .collect()
}
