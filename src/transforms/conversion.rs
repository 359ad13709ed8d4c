//! Conversions between rotation matrices and quaternions.
//!
//! WARNING: `quaternion_to_matrix` produces the transpose of the usual
//! (Wikipedia, CSPICE) quaternion to matrix mapping, and
//! `matrix_to_quaternion` is its exact inverse. The pair round-trips, and the
//! SLERP resampling of matrix series relies only on that, but a quaternion
//! taken from here describes the inverse rotation under the usual convention.
//! Do not switch one side without the other.
use crate::core::numeric::Float;
use crate::core::matrix::Matrix3x3;
use crate::core::quaternion::Quaternion;
use rayon::prelude::*;

impl From<Quaternion> for Matrix3x3 {
    fn from(q: Quaternion) -> Matrix3x3 {
        let (w, x, y, z) = (q.w, q.v.x, q.v.y, q.v.z);
        let e00 = w * w;
        let e11 = x * x;
        let e22 = y * y;
        let e33 = z * z;
        let e01 = 2.0 * w * x;
        let e02 = 2.0 * w * y;
        let e03 = 2.0 * w * z;
        let e12 = 2.0 * x * y;
        let e13 = 2.0 * x * z;
        let e23 = 2.0 * y * z;

        // Transposed with respect to the usual convention, see module docs.
        Matrix3x3::new(
            e00 + e11 - e22 - e33, e12 + e03, e13 - e02,
            e12 - e03, e00 - e11 + e22 - e33, e23 + e01,
            e13 + e02, e23 - e01, e00 - e11 - e22 + e33
        )
    }
}

impl From<Matrix3x3> for Quaternion {
    fn from(m: Matrix3x3) -> Quaternion {
        let m = m.m;
        let trace = m[0][0] + m[1][1] + m[2][2];
        // Four times the square of each component.
        let d = [
            1.0 + trace,
            1.0 + m[0][0] - m[1][1] - m[2][2],
            1.0 - m[0][0] + m[1][1] - m[2][2],
            1.0 - m[0][0] - m[1][1] + m[2][2],
        ];
        // Products of component pairs, times four.
        let wx = m[1][2] - m[2][1];
        let wy = m[2][0] - m[0][2];
        let wz = m[0][1] - m[1][0];
        let xy = m[0][1] + m[1][0];
        let xz = m[0][2] + m[2][0];
        let yz = m[1][2] + m[2][1];

        // Solve from the largest component to keep the divisor away from zero
        let mut k = 0;
        for i in 1..4 {
            if d[i] > d[k] {
                k = i;
            }
        }
        let s = 2.0 * d[k].max(0.0).sqrt();
        let q = match k {
            0 => Quaternion::new(s / 4.0, wx / s, wy / s, wz / s),
            1 => Quaternion::new(wx / s, s / 4.0, xy / s, xz / s),
            2 => Quaternion::new(wy / s, xy / s, s / 4.0, yz / s),
            _ => Quaternion::new(wz / s, xz / s, yz / s, s / 4.0),
        };
        let q = q.normalize();
        if q.w < 0.0 { -q } else { q }
    }
}

/// Convert a batch of rotation matrices to quaternions with `w >= 0`.
pub fn matrix_to_quaternion(matrices: &[Matrix3x3]) -> Vec<Quaternion> {
    matrices.par_iter().map(|m| Quaternion::from(*m)).collect()
}

/// Convert a batch of quaternions to rotation matrices.
pub fn quaternion_to_matrix(quaternions: &[Quaternion]) -> Vec<Matrix3x3> {
    quaternions.par_iter().map(|q| Matrix3x3::from(*q)).collect()
}

/// Largest elementwise difference between two matrices.
pub fn max_abs_difference(a: &Matrix3x3, b: &Matrix3x3) -> Float {
    let mut diff: Float = 0.0;
    for i in 0..3 {
        for j in 0..3 {
            diff = diff.max((a.m[i][j] - b.m[i][j]).abs());
        }
    }
    diff
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Vector3f;
    use crate::core::numeric::{consts, radians};
    use approx::assert_abs_diff_eq;

    fn rotate_z(deg: Float) -> Matrix3x3 {
        let (s, c) = radians(deg).sin_cos();
        Matrix3x3::new(c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0)
    }

    #[test]
    fn test_identity() {
        assert_eq!(matrix_to_quaternion(&[Matrix3x3::default()]), vec![Quaternion::identity()]);
        assert_eq!(quaternion_to_matrix(&[Quaternion::identity()]), vec![Matrix3x3::default()]);
    }

    #[test]
    fn test_half_turn_about_z() {
        let q = Quaternion::from(Matrix3x3::diagonal(-1.0, -1.0, 1.0));
        assert_eq!(q, Quaternion::new(0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_transposed_convention() {
        // The usual convention maps +30 degrees about z to q = (cos 15, 0, 0, sin 15);
        // here it maps to the conjugate.
        let q = Quaternion::from(rotate_z(30.0));
        assert_abs_diff_eq!(q.w, radians(15.0).cos(), epsilon = 1e-15);
        assert_abs_diff_eq!(q.v.z, -radians(15.0).sin(), epsilon = 1e-15);
    }

    #[test]
    fn test_round_trip_every_branch() {
        let axes = [
            Vector3f::new(1.0, 0.0, 0.0),
            Vector3f::new(0.0, 1.0, 0.0),
            Vector3f::new(0.0, 0.0, 1.0),
            Vector3f::new(1.0, 1.0, 1.0),
            Vector3f::new(-0.3, 0.8, 0.2),
        ];
        let angles = [0.1, 1.0, 2.5, 3.1, consts::PI];
        let mut matrices = Vec::new();
        for axis in axes.iter() {
            for angle in angles.iter() {
                matrices.push(Matrix3x3::from(Quaternion::compose(axis, *angle, true, consts::AXIS_EPSILON)));
            }
        }
        let back = quaternion_to_matrix(&matrix_to_quaternion(&matrices));
        for (m, b) in matrices.iter().zip(back.iter()) {
            assert!(max_abs_difference(m, b) < 1e-12, "{:?} != {:?}", m, b);
        }
        for q in matrix_to_quaternion(&matrices) {
            assert!(q.w >= 0.0);
            assert_abs_diff_eq!(q.norm(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_noisy_matrix_is_normalized() {
        let mut m = rotate_z(179.9);
        m.m[2][2] += 1e-9;
        let q = Quaternion::from(m);
        assert_abs_diff_eq!(q.norm(), 1.0, epsilon = 1e-12);
    }
}
