//! Batched checks on sequences of 3x3 rotation matrices.
use crate::core::numeric::{Float, consts};
use crate::core::matrix::Matrix3x3;
use crate::core::error::{Result, check_same_len};
use rayon::prelude::*;

/// Classification of a batch of matrices. A diagnostic fact about the input,
/// not an error: callers decide which states they can work with.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MatrixVerification {
    /// Both proper (det +1) and improper (det -1) rotations are present.
    MixedHandedness,
    /// No matrix is a proper or improper rotation. Also returned for an empty batch.
    AllInvalid,
    AllNan,
    SomeInvalid,
    SomeNan,
    AllValid,
}

/// Determinant of every matrix.
pub fn determinants(matrices: &[Matrix3x3]) -> Vec<Float> {
    matrices.par_iter().map(Matrix3x3::determinant).collect()
}

/// Whether each matrix is within `tolerance` of the identity, elementwise.
pub fn is_identity(matrices: &[Matrix3x3], tolerance: Float) -> Vec<bool> {
    matrices.par_iter().map(|m| m.is_identity(tolerance)).collect()
}

/// Pairwise product `a[i] * b[i]`.
pub fn multiply_batch(a: &[Matrix3x3], b: &[Matrix3x3]) -> Result<Vec<Matrix3x3>> {
    check_same_len("matrix batches", a.len(), b.len())?;
    Ok(a.par_iter().zip(b.par_iter()).map(|(a, b)| a.mul(b)).collect())
}

pub fn transpose_batch(matrices: &[Matrix3x3]) -> Vec<Matrix3x3> {
    matrices.par_iter().map(Matrix3x3::transpose).collect()
}

#[inline]
fn near(value: Float, target: Float, tolerance: Float) -> bool {
    (value - target).abs() <= tolerance
}

/// Classify a batch using the default identity tolerance.
pub fn verify(matrices: &[Matrix3x3]) -> MatrixVerification {
    verify_with_tolerance(matrices, consts::IDENTITY_TOLERANCE)
}

/// Classify a batch: a matrix is valid when `M * M^T` is the identity within
/// `tolerance` and its determinant is within `tolerance` of +1 or -1. NaNs are
/// counted from non-finite determinants.
pub fn verify_with_tolerance(matrices: &[Matrix3x3], tolerance: Float) -> MatrixVerification {
    if matrices.is_empty() {
        return MatrixVerification::AllInvalid;
    }
    let products: Vec<Matrix3x3> = matrices.par_iter().map(|m| m.mul(&m.transpose())).collect();
    let orthogonal = is_identity(&products, tolerance);
    let dets = determinants(matrices);

    let n = matrices.len();
    let mut nans = 0;
    let mut right = 0;
    let mut left = 0;
    for (det, ortho) in dets.iter().zip(orthogonal.iter()) {
        if !det.is_finite() {
            nans += 1;
        } else if *ortho && near(*det, 1.0, tolerance) {
            right += 1;
        } else if *ortho && near(*det, -1.0, tolerance) {
            left += 1;
        }
    }
    let invalid = n - nans - right - left;
    debug!("verified {} matrices: {} right-handed, {} left-handed, {} invalid, {} NaN", n, right, left, invalid, nans);

    if nans == n {
        MatrixVerification::AllNan
    } else if right > 0 && left > 0 {
        MatrixVerification::MixedHandedness
    } else if right + left == 0 {
        MatrixVerification::AllInvalid
    } else if invalid > 0 {
        MatrixVerification::SomeInvalid
    } else if nans > 0 {
        MatrixVerification::SomeNan
    } else {
        MatrixVerification::AllValid
    }
}

/// True if any matrix has a determinant near -1.
pub fn has_left_handed(matrices: &[Matrix3x3]) -> bool {
    has_left_handed_with_tolerance(matrices, consts::IDENTITY_TOLERANCE)
}

pub fn has_left_handed_with_tolerance(matrices: &[Matrix3x3], tolerance: Float) -> bool {
    matrices.par_iter().any(|m| near(m.determinant(), -1.0, tolerance))
}

/// Negate the first row of every matrix. Applying it twice is the identity.
pub fn swap_handedness(matrices: &[Matrix3x3]) -> Vec<Matrix3x3> {
    matrices.par_iter().map(Matrix3x3::flip_first_row).collect()
}
