//! 3D affine transforms and the coordinate-frame trait.

use super::{Point3, Vec3};
use num_traits::Float;

/// A coordinate frame that maps a spline's local space into world space.
///
/// Splines store everything in local space. A hosting scene supplies a
/// frame at query time to obtain world-space positions and directions.
pub trait Frame3<F> {
    /// Maps a local-space point into world space.
    fn point_to_world(&self, p: Point3<F>) -> Point3<F>;

    /// Maps a local-space direction into world space (no translation).
    fn vector_to_world(&self, v: Vec3<F>) -> Vec3<F>;

    /// Maps a world-space point back into local space.
    ///
    /// Returns `None` if the frame is not invertible.
    fn point_to_local(&self, p: Point3<F>) -> Option<Point3<F>>;
}

/// A 3D affine transformation.
///
/// Stored as a 3x3 linear part in row-major order plus a translation:
/// ```text
/// | m00 m01 m02 tx |
/// | m10 m11 m12 ty |
/// | m20 m21 m22 tz |
/// ```
///
/// # Example
///
/// ```
/// use curvum::primitives::{Affine3, Frame3, Point3, Vec3};
///
/// let frame: Affine3<f64> = Affine3::scale(2.0).then_translate(Vec3::new(0.0, 0.0, 5.0));
/// let world = frame.point_to_world(Point3::new(1.0, 1.0, 1.0));
/// assert_eq!(world, Point3::new(2.0, 2.0, 7.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Affine3<F> {
    /// Linear part, row-major.
    pub linear: [[F; 3]; 3],
    /// Translation applied after the linear part.
    pub translation: Vec3<F>,
}

impl<F: Float> Affine3<F> {
    #[inline]
    pub fn new(linear: [[F; 3]; 3], translation: Vec3<F>) -> Self {
        Self {
            linear,
            translation,
        }
    }

    /// Creates the identity transform.
    #[inline]
    pub fn identity() -> Self {
        Self::scale(F::one())
    }

    /// Creates a pure translation.
    #[inline]
    pub fn translation(offset: Vec3<F>) -> Self {
        Self {
            translation: offset,
            ..Self::identity()
        }
    }

    /// Creates a uniform scale around the origin.
    #[inline]
    pub fn scale(factor: F) -> Self {
        Self::scale_xyz(factor, factor, factor)
    }

    /// Creates a non-uniform scale around the origin.
    #[inline]
    pub fn scale_xyz(sx: F, sy: F, sz: F) -> Self {
        let o = F::zero();
        Self::new([[sx, o, o], [o, sy, o], [o, o, sz]], Vec3::zero())
    }

    /// Creates a rotation about the Z axis (radians, counter-clockwise).
    pub fn rotation_z(angle: F) -> Self {
        let (s, c) = angle.sin_cos();
        let (o, l) = (F::zero(), F::one());
        Self::new([[c, -s, o], [s, c, o], [o, o, l]], Vec3::zero())
    }

    /// Creates a rotation about the Y axis (radians).
    pub fn rotation_y(angle: F) -> Self {
        let (s, c) = angle.sin_cos();
        let (o, l) = (F::zero(), F::one());
        Self::new([[c, o, s], [o, l, o], [-s, o, c]], Vec3::zero())
    }

    /// Creates a rotation about the X axis (radians).
    pub fn rotation_x(angle: F) -> Self {
        let (s, c) = angle.sin_cos();
        let (o, l) = (F::zero(), F::one());
        Self::new([[l, o, o], [o, c, -s], [o, s, c]], Vec3::zero())
    }

    /// Applies this transform to a point.
    #[inline]
    pub fn apply_point(&self, p: Point3<F>) -> Point3<F> {
        Point3::from(self.apply_vec(p.to_vec()) + self.translation)
    }

    /// Applies the linear part to a vector (no translation).
    #[inline]
    pub fn apply_vec(&self, v: Vec3<F>) -> Vec3<F> {
        let m = &self.linear;
        Vec3::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }

    /// Composes this transform with another (`self * other`).
    ///
    /// The result applies `other` first, then `self`.
    pub fn compose(&self, other: &Self) -> Self {
        let a = &self.linear;
        let b = &other.linear;
        let mut linear = [[F::zero(); 3]; 3];
        for (i, row) in linear.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j];
            }
        }
        Self {
            linear,
            translation: self.apply_vec(other.translation) + self.translation,
        }
    }

    /// Returns a transform that applies `self` first, then `other`.
    #[inline]
    pub fn then(&self, other: Self) -> Self {
        other.compose(self)
    }

    /// Returns a transform that applies `self` first, then translates.
    #[inline]
    pub fn then_translate(&self, offset: Vec3<F>) -> Self {
        self.then(Self::translation(offset))
    }

    /// Returns the determinant of the linear part.
    pub fn determinant(&self) -> F {
        let m = &self.linear;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Returns the inverse transform, or `None` if the linear part is singular.
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det.abs() < F::epsilon() {
            return None;
        }

        let m = &self.linear;
        let inv_det = F::one() / det;
        // Adjugate (transposed cofactors) scaled by 1/det.
        let linear = [
            [
                (m[1][1] * m[2][2] - m[1][2] * m[2][1]) * inv_det,
                (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * inv_det,
                (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * inv_det,
            ],
            [
                (m[1][2] * m[2][0] - m[1][0] * m[2][2]) * inv_det,
                (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * inv_det,
                (m[0][2] * m[1][0] - m[0][0] * m[1][2]) * inv_det,
            ],
            [
                (m[1][0] * m[2][1] - m[1][1] * m[2][0]) * inv_det,
                (m[0][1] * m[2][0] - m[0][0] * m[2][1]) * inv_det,
                (m[0][0] * m[1][1] - m[0][1] * m[1][0]) * inv_det,
            ],
        ];

        let mut inverse = Self::new(linear, Vec3::zero());
        inverse.translation = -inverse.apply_vec(self.translation);
        Some(inverse)
    }
}

impl<F: Float> Default for Affine3<F> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<F: Float> Frame3<F> for Affine3<F> {
    #[inline]
    fn point_to_world(&self, p: Point3<F>) -> Point3<F> {
        self.apply_point(p)
    }

    #[inline]
    fn vector_to_world(&self, v: Vec3<F>) -> Vec3<F> {
        self.apply_vec(v)
    }

    fn point_to_local(&self, p: Point3<F>) -> Option<Point3<F>> {
        self.inverse().map(|inv| inv.apply_point(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn assert_point_eq(a: Point3<f64>, b: Point3<f64>) {
        assert_relative_eq!(a.x, b.x, epsilon = 1e-10);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-10);
        assert_relative_eq!(a.z, b.z, epsilon = 1e-10);
    }

    #[test]
    fn test_identity() {
        let id: Affine3<f64> = Affine3::identity();
        let p = Point3::new(1.0, -2.0, 3.0);
        assert_eq!(id.apply_point(p), p);
        assert_eq!(id.determinant(), 1.0);
    }

    #[test]
    fn test_translation_leaves_vectors_alone() {
        let t: Affine3<f64> = Affine3::translation(Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(t.apply_point(Point3::origin()), Point3::new(5.0, 0.0, 0.0));
        assert_eq!(t.apply_vec(Vec3::unit_y()), Vec3::unit_y());
    }

    #[test]
    fn test_rotation_z() {
        let r: Affine3<f64> = Affine3::rotation_z(FRAC_PI_2);
        assert_point_eq(r.apply_point(Point3::new(1.0, 0.0, 0.0)), Point3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_then_order() {
        // Rotate first, then translate.
        let t: Affine3<f64> = Affine3::rotation_z(FRAC_PI_2).then_translate(Vec3::new(10.0, 0.0, 0.0));
        assert_point_eq(t.apply_point(Point3::new(1.0, 0.0, 0.0)), Point3::new(10.0, 1.0, 0.0));
    }

    #[test]
    fn test_inverse_round_trip() {
        let t: Affine3<f64> = Affine3::rotation_x(0.3)
            .then(Affine3::scale_xyz(2.0, 3.0, 0.5))
            .then_translate(Vec3::new(1.0, -4.0, 2.0));
        let inv = t.inverse().unwrap();
        let p = Point3::new(0.7, -1.3, 2.9);
        assert_point_eq(inv.apply_point(t.apply_point(p)), p);
    }

    #[test]
    fn test_singular_has_no_inverse() {
        let flat: Affine3<f64> = Affine3::scale_xyz(1.0, 1.0, 0.0);
        assert!(flat.inverse().is_none());
        assert!(flat.point_to_local(Point3::origin()).is_none());
    }
}
