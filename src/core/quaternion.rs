//! Quaternion algebra on single values and on batches.
//!
//! Components are ordered `[w, x, y, z]`, `w` being the scalar (cosine of the
//! half angle) part. A batch is a plain slice of quaternions; a single
//! quaternion is a batch of one.
use super::numeric::{Float, consts};
use super::geometry::Vector3f;
use super::error::{Error, Result, check_same_len};
use super::options::CotransOptions;
use rayon::prelude::*;
use std::ops::{Add, Sub, Div, Mul, Neg};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Quaternion {
    pub v: Vector3f,
    pub w: Float
}

impl Quaternion {
    pub fn new(w: Float, x: Float, y: Float, z: Float) -> Quaternion {
        Quaternion{
            v: Vector3f{x, y, z},
            w
        }
    }

    pub fn identity() -> Quaternion {
        Quaternion::new(1.0, 0.0, 0.0, 0.0)
    }

    /// Build a Quaternion from `[w, x, y, z]`.
    pub fn from_slice(q: &[Float]) -> Result<Quaternion> {
        if q.len() != 4 {
            return Err(Error::shape(format!("a quaternion has 4 components, got {}", q.len())));
        }
        Ok(Quaternion::new(q[0], q[1], q[2], q[3]))
    }

    pub fn to_array(&self) -> [Float; 4] {
        [self.w, self.v.x, self.v.y, self.v.z]
    }

    /// Calculate the dot product between this Quaternion and another, treating
    /// both as 4-vectors.
    #[inline]
    pub fn dot(&self, q2: &Quaternion) -> Float {
        self.w * q2.w + self.v.dot(&q2.v)
    }

    /// The (un-squared) Euclidean norm.
    #[inline]
    pub fn norm(&self) -> Float {
        self.dot(self).sqrt()
    }

    pub fn conjugate(&self) -> Quaternion {
        Quaternion{
            v: -self.v,
            w: self.w
        }
    }

    /// Normalize this Quaternion.
    /// A scalar part that overshoots +-1 after the division is clamped and the
    /// vector part zeroed, giving the identity or a half turn.
    pub fn normalize(&self) -> Quaternion {
        let q = *self / self.norm();
        if q.w > 1.0 {
            Quaternion::new(1.0, 0.0, 0.0, 0.0)
        } else if q.w < -1.0 {
            Quaternion::new(-1.0, 0.0, 0.0, 0.0)
        } else {
            q
        }
    }

    /// Split into a rotation angle and unit axis.
    ///
    /// `w >= 1` gives angle 0 and `w <= -1` gives angle 2*pi, both with the x
    /// axis; no modular unwrapping is attempted at those boundaries. When the
    /// half-angle sine is below `epsilon` the axis also defaults to x.
    pub fn decompose(&self, epsilon: Float) -> (Float, Vector3f) {
        let x_axis = Vector3f::new(1.0, 0.0, 0.0);
        if self.w >= 1.0 {
            return (0.0, x_axis);
        }
        if self.w <= -1.0 {
            return (consts::TWO_PI, x_axis);
        }
        let angle = 2.0 * num::clamp(self.w, -1.0, 1.0).acos();
        let s = (angle / 2.0).sin();
        if s > epsilon {
            (angle, self.v / s)
        } else {
            (angle, x_axis)
        }
    }

    /// Build a rotation of `angle` radians about `axis`.
    ///
    /// With `free` unset the angle is first wrapped into `[0, pi)`. An axis
    /// shorter than `epsilon` yields the identity.
    pub fn compose(axis: &Vector3f, angle: Float, free: bool, epsilon: Float) -> Quaternion {
        let angle = if free { angle } else { angle.rem_euclid(consts::PI) };
        let length = axis.length();
        if length < epsilon {
            return Quaternion::identity();
        }
        let (s, c) = (angle / 2.0).sin_cos();
        Quaternion{
            v: *axis * (s / length),
            w: c
        }
    }
}

impl Default for Quaternion {
    fn default() -> Quaternion {
        Quaternion::identity()
    }
}

impl Neg for Quaternion {
    type Output = Quaternion;
    fn neg(self) -> Quaternion {
        Quaternion{
            v: -self.v,
            w: -self.w
        }
    }
}

impl Add for Quaternion {
    type Output = Quaternion;
    fn add(self, rhs: Quaternion) -> Quaternion {
        Quaternion{
            v: self.v + rhs.v,
            w: self.w + rhs.w
        }
    }
}

impl Sub for Quaternion {
    type Output = Quaternion;
    fn sub(self, rhs: Quaternion) -> Quaternion {
        Quaternion{
            v: self.v - rhs.v,
            w: self.w - rhs.w
        }
    }
}

/// Hamilton product.
impl Mul for Quaternion {
    type Output = Quaternion;
    fn mul(self, rhs: Quaternion) -> Quaternion {
        let (w1, x1, y1, z1) = (self.w, self.v.x, self.v.y, self.v.z);
        let (w2, x2, y2, z2) = (rhs.w, rhs.v.x, rhs.v.y, rhs.v.z);
        Quaternion::new(
            w1 * w2 - x1 * x2 - y1 * y2 - z1 * z2,
            x1 * w2 + w1 * x2 - z1 * y2 + y1 * z2,
            y1 * w2 + z1 * x2 + w1 * y2 - x1 * z2,
            z1 * w2 - y1 * x2 + x1 * y2 + w1 * z2
        )
    }
}

impl Mul<Float> for Quaternion {
    type Output = Quaternion;
    fn mul(self, rhs: Float) -> Quaternion {
        Quaternion{
            v: self.v * rhs,
            w: self.w * rhs
        }
    }
}

impl Div<Float> for Quaternion {
    type Output = Quaternion;
    fn div(self, rhs: Float) -> Quaternion {
        Quaternion{
            v: self.v / rhs,
            w: self.w / rhs
        }
    }
}

/// Turn raw row-major data into a quaternion batch.
///
/// `shape` is either `[4]` (a single quaternion, promoted to a batch of one)
/// or `[n, 4]`. Any other rank or trailing dimension is a shape error, as is
/// data whose length does not match the shape.
pub fn validate(data: &[Float], shape: &[usize]) -> Result<Vec<Quaternion>> {
    let n = match shape {
        [4] => 1,
        [n, 4] => *n,
        [.., last] if *last != 4 => {
            return Err(Error::shape(format!("quaternion arrays need a last dimension of 4, got {}", last)));
        }
        _ => {
            return Err(Error::shape(format!("quaternion arrays have 1 or 2 dimensions, got {}", shape.len())));
        }
    };
    if data.len() != n * 4 {
        return Err(Error::shape(format!("shape {:?} needs {} values, got {}", shape, n * 4, data.len())));
    }
    data.chunks(4).map(Quaternion::from_slice).collect()
}

/// Turn rows of `[w, x, y, z]` into a quaternion batch.
pub fn from_rows(rows: &[Vec<Float>]) -> Result<Vec<Quaternion>> {
    rows.iter().map(|r| Quaternion::from_slice(r)).collect()
}

/// Elementwise Hamilton product of two batches of equal length.
pub fn multiply(q1: &[Quaternion], q2: &[Quaternion]) -> Result<Vec<Quaternion>> {
    check_same_len("quaternion batches", q1.len(), q2.len())?;
    Ok(q1.par_iter().zip(q2.par_iter()).map(|(a, b)| *a * *b).collect())
}

pub fn conjugate(q: &[Quaternion]) -> Vec<Quaternion> {
    q.par_iter().map(Quaternion::conjugate).collect()
}

/// Elementwise 4-vector dot product of two batches of equal length.
pub fn dot(q1: &[Quaternion], q2: &[Quaternion]) -> Result<Vec<Float>> {
    check_same_len("quaternion batches", q1.len(), q2.len())?;
    Ok(q1.par_iter().zip(q2.par_iter()).map(|(a, b)| a.dot(b)).collect())
}

pub fn norm(q: &[Quaternion]) -> Vec<Float> {
    q.par_iter().map(Quaternion::norm).collect()
}

pub fn normalize(q: &[Quaternion]) -> Vec<Quaternion> {
    q.par_iter().map(Quaternion::normalize).collect()
}

/// Batched [`Quaternion::decompose`] with the configured axis epsilon.
pub fn decompose(q: &[Quaternion]) -> Vec<(Float, Vector3f)> {
    let epsilon = CotransOptions::instance().axis_epsilon;
    q.par_iter().map(|q| q.decompose(epsilon)).collect()
}

/// Batched [`Quaternion::compose`] with the configured axis epsilon.
pub fn compose(axes: &[Vector3f], angles: &[Float], free: bool) -> Result<Vec<Quaternion>> {
    check_same_len("axes and angles", axes.len(), angles.len())?;
    let epsilon = CotransOptions::instance().axis_epsilon;
    Ok(axes.par_iter()
        .zip(angles.par_iter())
        .map(|(axis, angle)| Quaternion::compose(axis, *angle, free, epsilon))
        .collect())
}
