use super::numeric::Float;
use super::geometry::Vector3f;
use super::error::{Error, Result};

/// A 3x3 row-major matrix, usually a rotation between two coordinate frames.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Matrix3x3 {
    pub m: [[Float; 3]; 3]
}

impl Matrix3x3 {
    pub fn new(
        t00: Float,
        t01: Float,
        t02: Float,
        t10: Float,
        t11: Float,
        t12: Float,
        t20: Float,
        t21: Float,
        t22: Float
    ) -> Matrix3x3 {
        Matrix3x3{
            m: [
                [t00, t01, t02],
                [t10, t11, t12],
                [t20, t21, t22]
            ]
        }
    }

    /// Build a matrix whose rows are the given vectors.
    pub fn from_rows(r0: &Vector3f, r1: &Vector3f, r2: &Vector3f) -> Matrix3x3 {
        Matrix3x3::new(r0.x, r0.y, r0.z, r1.x, r1.y, r1.z, r2.x, r2.y, r2.z)
    }

    /// Build a matrix from nine row-major values.
    pub fn from_slice(v: &[Float]) -> Result<Matrix3x3> {
        if v.len() != 9 {
            return Err(Error::shape(format!("expected 9 row-major matrix elements, got {}", v.len())));
        }
        Ok(Matrix3x3::new(v[0], v[1], v[2], v[3], v[4], v[5], v[6], v[7], v[8]))
    }

    /// The nine elements in row-major order.
    pub fn to_vec(&self) -> Vec<Float> {
        self.m.iter().flat_map(|r| r.iter().cloned()).collect()
    }

    pub fn row(&self, i: usize) -> Vector3f {
        Vector3f::new(self.m[i][0], self.m[i][1], self.m[i][2])
    }

    pub fn diagonal(d0: Float, d1: Float, d2: Float) -> Matrix3x3 {
        Matrix3x3::new(d0, 0.0, 0.0, 0.0, d1, 0.0, 0.0, 0.0, d2)
    }

    /// Transpose the Matrix3x3. For a rotation this is its inverse.
    #[inline]
    pub fn transpose(&self) -> Matrix3x3 {
        Matrix3x3 {
            m: [
                [self.m[0][0], self.m[1][0], self.m[2][0]],
                [self.m[0][1], self.m[1][1], self.m[2][1]],
                [self.m[0][2], self.m[1][2], self.m[2][2]],
            ]
        }
    }

    /// Multiply two Matrix3x3.
    pub fn mul(&self, m2: &Matrix3x3) -> Matrix3x3 {
        let mut r = Matrix3x3 { m: [[0.0; 3]; 3] };
        for i in 0..3 {
            for j in 0..3 {
                r.m[i][j] = self.m[i][0] * m2.m[0][j] + self.m[i][1] * m2.m[1][j] + self.m[i][2] * m2.m[2][j];
            }
        }
        r
    }

    /// Apply the matrix to a column vector.
    #[inline]
    pub fn mul_vector(&self, v: &Vector3f) -> Vector3f {
        Vector3f::new(
            self.m[0][0] * v.x + self.m[0][1] * v.y + self.m[0][2] * v.z,
            self.m[1][0] * v.x + self.m[1][1] * v.y + self.m[1][2] * v.z,
            self.m[2][0] * v.x + self.m[2][1] * v.y + self.m[2][2] * v.z
        )
    }

    pub fn determinant(&self) -> Float {
        let m = &self.m;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Test if every element is within `tolerance` of the identity matrix.
    pub fn is_identity(&self, tolerance: Float) -> bool {
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                // written so that NaN elements fail
                if !((self.m[i][j] - expected).abs() <= tolerance) {
                    return false;
                }
            }
        }
        true
    }

    /// Negate the first row, converting a left-handed basis to a right-handed
    /// one and back.
    #[inline]
    pub fn flip_first_row(&self) -> Matrix3x3 {
        let mut r = *self;
        for j in 0..3 {
            r.m[0][j] = -r.m[0][j];
        }
        r
    }
}

/// Default is the identity matrix.
impl Default for Matrix3x3 {
    fn default() -> Self {
        Matrix3x3{
            m: [
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, 1.0]
            ]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::numeric::radians;

    fn rotate_x(deg: Float) -> Matrix3x3 {
        let (s, c) = radians(deg).sin_cos();
        Matrix3x3::new(1.0, 0.0, 0.0, 0.0, c, -s, 0.0, s, c)
    }

    #[test]
    fn test_mul_and_transpose() {
        let r = rotate_x(30.0);
        assert!(r.mul(&r.transpose()).is_identity(1e-12));
        let a = Matrix3x3::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0);
        let b = Matrix3x3::new(9.0, 8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0);
        assert_eq!(a.mul(&b), Matrix3x3::new(30.0, 24.0, 18.0, 84.0, 69.0, 54.0, 138.0, 114.0, 90.0));
    }

    #[test]
    fn test_determinant() {
        assert_eq!(Matrix3x3::default().determinant(), 1.0);
        assert_eq!(Matrix3x3::diagonal(-1.0, 1.0, 1.0).determinant(), -1.0);
        assert_eq!(Matrix3x3::default().flip_first_row().determinant(), -1.0);
        assert!((rotate_x(73.0).determinant() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_is_identity() {
        assert!(Matrix3x3::default().is_identity(1e-5));
        assert!(Matrix3x3::diagonal(1.0 + 1e-6, 1.0, 1.0).is_identity(1e-5));
        assert!(!Matrix3x3::diagonal(1.0 + 1e-4, 1.0, 1.0).is_identity(1e-5));
        assert!(!Matrix3x3::diagonal(Float::NAN, 1.0, 1.0).is_identity(1e-5));
    }

    #[test]
    fn test_mul_vector_and_slices() {
        let v = rotate_x(90.0).mul_vector(&Vector3f::new(0.0, 1.0, 0.0));
        assert!(v.y.abs() < 1e-15 && (v.z - 1.0).abs() < 1e-15);
        let m = Matrix3x3::from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]).unwrap();
        assert_eq!(m.row(1), Vector3f::new(4.0, 5.0, 6.0));
        assert_eq!(m.to_vec(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        assert!(Matrix3x3::from_slice(&[1.0; 8]).is_err());
    }
}
