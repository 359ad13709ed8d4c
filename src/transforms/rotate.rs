//! Apply a time-tagged series of rotation matrices to a vector series.
//!
//! When the matrices are not already on the vector timestamps they are
//! converted to quaternions, SLERP-resampled onto the vector times and
//! converted back. Left-handed matrices are flipped to right-handed before
//! the conversion and flipped back after it.
use crate::core::numeric::Float;
use crate::core::geometry::Vector3f;
use crate::core::matrix::Matrix3x3;
use crate::core::error::{Error, Result, check_same_len};
use crate::core::diagnostics::{Diagnosed, Diagnostic, DiagnosticCode};
use crate::core::options::CotransOptions;
use crate::core::series::{check_frame, CoordinateTag, Metadata, TimeSeries, TimeSeriesStore};
use super::conversion::{matrix_to_quaternion, quaternion_to_matrix};
use super::validation::{self, MatrixVerification};
use super::slerp::slerp_with_epsilon;
use rayon::prelude::*;

/// A rotation-matrix series ready to be applied to vectors.
#[derive(Debug, Clone)]
pub struct VectorRotation<'a> {
    matrices: &'a [Matrix3x3],
    times: &'a [Float],
    invert: bool,
    geometric: bool,
    slerp_tolerance: Float,
    identity_tolerance: Float,
    axis_epsilon: Float,
}

impl<'a> VectorRotation<'a> {
    /// Tolerances and the SLERP formula come from [`CotransOptions::instance`].
    pub fn new(matrices: &'a [Matrix3x3], times: &'a [Float]) -> VectorRotation<'a> {
        let options = CotransOptions::instance();
        VectorRotation {
            matrices,
            times,
            invert: false,
            geometric: options.geometric_slerp,
            slerp_tolerance: options.slerp_tolerance,
            identity_tolerance: options.identity_tolerance,
            axis_epsilon: options.axis_epsilon,
        }
    }

    /// Apply the inverse (transpose) of each rotation instead.
    pub fn invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    pub fn geometric(mut self, geometric: bool) -> Self {
        self.geometric = geometric;
        self
    }

    /// Interpolation steps whose rotation axis is shorter than `epsilon`
    /// leave the earlier rotation unchanged.
    pub fn axis_epsilon(mut self, epsilon: Float) -> Self {
        self.axis_epsilon = epsilon;
        self
    }

    /// The rotation matrices at `target` times. A single input matrix is
    /// returned alone, to be broadcast by the caller.
    pub fn resample(&self, target: &[Float]) -> Result<Diagnosed<Vec<Matrix3x3>>> {
        check_same_len("rotation matrices and their times", self.matrices.len(), self.times.len())?;
        if self.matrices.is_empty() {
            return Err(Error::shape("no rotation matrices"));
        }
        let mut diagnostics = Vec::new();

        let mut resampled = if self.matrices.len() == 1 || self.times == target {
            self.matrices.to_vec()
        } else {
            let state = validation::verify_with_tolerance(self.matrices, self.identity_tolerance);
            if state != MatrixVerification::AllValid {
                diagnostics.push(Diagnostic::new(DiagnosticCode::InvalidMatrices(state), "vector rotation"));
            }
            let before = target.iter().filter(|t| **t < self.times[0]).count();
            let after = target.iter().filter(|t| **t > self.times[self.times.len() - 1]).count();
            if before > 0 || after > 0 {
                diagnostics.push(Diagnostic::new(DiagnosticCode::Extrapolated { before, after }, "vector rotation"));
            }

            let left_handed = validation::has_left_handed_with_tolerance(self.matrices, self.identity_tolerance);
            let quaternions = if left_handed {
                debug!("swapping handedness of {} left-handed rotation matrices", self.matrices.len());
                matrix_to_quaternion(&validation::swap_handedness(self.matrices))
            } else {
                matrix_to_quaternion(self.matrices)
            };
            vlog!(1, "interpolating {} rotation matrices onto {} samples", self.matrices.len(), target.len());
            let interpolated = quaternion_to_matrix(
                &slerp_with_epsilon(&quaternions, self.times, target, self.geometric, self.slerp_tolerance, self.axis_epsilon)?);
            if left_handed {
                validation::swap_handedness(&interpolated)
            } else {
                interpolated
            }
        };

        if self.invert {
            resampled = validation::transpose_batch(&resampled);
        }
        Ok(Diagnosed::new(resampled, diagnostics))
    }

    /// Rotate `vectors` sampled at `times`: `out[i] = M(times[i]) * vectors[i]`.
    pub fn apply(&self, vectors: &[Vector3f], times: &[Float]) -> Result<Diagnosed<Vec<Vector3f>>> {
        check_same_len("vectors and their times", vectors.len(), times.len())?;
        let resampled = self.resample(times)?;
        Ok(resampled.map(|matrices| {
            if matrices.len() == 1 {
                let m = matrices[0];
                vectors.par_iter().map(|v| m.mul_vector(v)).collect()
            } else {
                matrices.par_iter().zip(vectors.par_iter()).map(|(m, v)| m.mul_vector(v)).collect()
            }
        }))
    }
}

/// Rotate a vector series by a (possibly differently sampled) matrix series.
pub fn rotate(
    matrices: &[Matrix3x3],
    matrix_times: &[Float],
    vectors: &[Vector3f],
    vector_times: &[Float]
) -> Result<Diagnosed<Vec<Vector3f>>> {
    VectorRotation::new(matrices, matrix_times).apply(vectors, vector_times)
}

/// Rotate the vector series `vector_name` by the matrix series `matrix_name`
/// and store the result as `output_name`.
///
/// Matrix rows hold nine row-major elements and vector rows three; anything
/// else is a shape error. The matrix series' frame tag, if present, is
/// checked against the vector's declared frame (a mismatch is only reported)
/// and its output frame becomes the result's frame.
pub fn rotate_series<S: TimeSeriesStore>(
    store: &mut S,
    matrix_name: &str,
    vector_name: &str,
    output_name: &str,
    invert: bool
) -> Result<Vec<Diagnostic>> {
    let matrix_series = store.require(matrix_name)?;
    let vector_series = store.require(vector_name)?;
    let matrices = matrix_series.matrices(matrix_name)?;
    let vectors = vector_series.vectors(vector_name)?;

    let mut diagnostics = Vec::new();
    let mut metadata = Metadata { coordinate_system: vector_series.metadata.coordinate_system.clone(), transform: None };
    if let Some(tag) = &matrix_series.metadata.transform {
        let tag = if invert {
            CoordinateTag::new(tag.output_frame.clone(), tag.input_frame.clone())
        } else {
            tag.clone()
        };
        diagnostics.extend(check_frame(&vector_series.metadata, &tag, vector_name));
        metadata.coordinate_system = Some(tag.output_frame);
    }

    let rotated = VectorRotation::new(&matrices, &matrix_series.times)
        .invert(invert)
        .apply(&vectors, &vector_series.times)?;
    diagnostics.extend(rotated.diagnostics);
    info!("rotated {} samples of {} into {}", vectors.len(), vector_name, output_name);
    store.put(output_name, TimeSeries::from_vectors(vector_series.times, &rotated.value, metadata));
    Ok(diagnostics)
}
