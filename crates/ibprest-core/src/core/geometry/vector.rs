use super::GeometryError;
use nalgebra::{Point3, Vector3};

/// Returns the displacement `a - b`.
pub fn subtract(a: &Point3<f64>, b: &Point3<f64>) -> Vector3<f64> {
    a - b
}

pub fn dot(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    a.dot(b)
}

pub fn cross(a: &Vector3<f64>, b: &Vector3<f64>) -> Vector3<f64> {
    a.cross(b)
}

pub fn magnitude(v: &Vector3<f64>) -> f64 {
    v.norm()
}

/// Scales a vector to unit length.
///
/// # Errors
///
/// Returns [`GeometryError::DivideByZero`] when the vector has exactly zero
/// length, which happens for coincident atoms or collinear bond vectors fed
/// into a cross product.
pub fn normalize(v: &Vector3<f64>) -> Result<Vector3<f64>, GeometryError> {
    let length = magnitude(v);
    if length == 0.0 {
        return Err(GeometryError::DivideByZero);
    }
    Ok(v / length)
}
