//! Spherical linear interpolation of quaternion sequences.
use crate::core::numeric::{Float, consts, find_interval, first_unordered};
use crate::core::quaternion::Quaternion;
use crate::core::error::{Abscissa, Error, Result, check_same_len};
use rayon::prelude::*;

/// Resample the unit quaternions `q`, given at abscissas `x_in`, onto `x_out`.
///
/// Both abscissa arrays must be non-decreasing and every quaternion must be
/// unit length within `tolerance`. Outputs before the first or after the
/// last input abscissa repeat the nearest endpoint quaternion. An output that
/// falls within `tolerance` (as a fraction of its interval) of an input node
/// returns that node unchanged.
///
/// The default formula scales the angle of `q2 * conj(q1)` and applies it to
/// `q1`; `geometric` selects the textbook `sin` weighted form instead. Both
/// follow the shorter arc.
pub fn slerp(
    q: &[Quaternion],
    x_in: &[Float],
    x_out: &[Float],
    geometric: bool,
    tolerance: Float
) -> Result<Vec<Quaternion>> {
    slerp_with_epsilon(q, x_in, x_out, geometric, tolerance, consts::AXIS_EPSILON)
}

/// [`slerp`] with an explicit `axis_epsilon`: rotation steps whose axis is
/// shorter than it are treated as no rotation.
pub fn slerp_with_epsilon(
    q: &[Quaternion],
    x_in: &[Float],
    x_out: &[Float],
    geometric: bool,
    tolerance: Float,
    axis_epsilon: Float
) -> Result<Vec<Quaternion>> {
    if q.is_empty() {
        return Err(Error::shape("no quaternions to interpolate"));
    }
    check_same_len("quaternions and input abscissas", q.len(), x_in.len())?;
    for (index, quat) in q.iter().enumerate() {
        let norm = quat.norm();
        if !((norm - 1.0).abs() <= tolerance) {
            return Err(Error::Precision { index, norm, tolerance });
        }
    }
    if let Some(index) = first_unordered(x_in) {
        return Err(Error::Order { abscissa: Abscissa::Input, index });
    }
    if let Some(index) = first_unordered(x_out) {
        return Err(Error::Order { abscissa: Abscissa::Output, index });
    }
    vlog!(2, "slerp {} quaternions onto {} abscissas (geometric: {})", q.len(), x_out.len(), geometric);

    Ok(x_out.par_iter()
        .map(|x| sample(q, x_in, *x, geometric, tolerance, axis_epsilon))
        .collect())
}

fn sample(q: &[Quaternion], x_in: &[Float], x: Float, geometric: bool, tolerance: Float, axis_epsilon: Float) -> Quaternion {
    let n = q.len();
    if n == 1 || x < x_in[0] {
        return q[0];
    }
    if x >= x_in[n - 1] {
        return q[n - 1];
    }
    let i = find_interval(n, |k| x_in[k] <= x);
    let t = (x - x_in[i]) / (x_in[i + 1] - x_in[i]);
    if t <= tolerance {
        return q[i];
    }
    interpolate_pair(&q[i], &q[i + 1], t, geometric, tolerance, axis_epsilon)
}

/// Interpolate a fraction `t` of the way from `q1` to `q2` along the shorter
/// arc. The result is renormalized; colinear inputs return `q1`.
pub fn interpolate_pair(
    q1: &Quaternion,
    q2: &Quaternion,
    t: Float,
    geometric: bool,
    tolerance: Float,
    axis_epsilon: Float
) -> Quaternion {
    let mut q2 = *q2;
    let mut cos_theta = q1.dot(&q2);
    // q and -q are the same rotation
    if cos_theta < 0.0 {
        q2 = -q2;
        cos_theta = -cos_theta;
    }
    if (cos_theta - 1.0).abs() <= tolerance {
        return *q1;
    }
    let q = if geometric {
        let theta = num::clamp(cos_theta, -1.0, 1.0).acos();
        (*q1 * ((1.0 - t) * theta).sin() + q2 * (t * theta).sin()) / theta.sin()
    } else {
        let delta = q2 * q1.conjugate();
        let (angle, axis) = delta.decompose(axis_epsilon);
        Quaternion::compose(&axis, angle * t, true, axis_epsilon) * *q1
    };
    q.normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Vector3f;
    use approx::assert_abs_diff_eq;

    const TOL: Float = consts::SLERP_TOLERANCE;

    fn about(axis: Vector3f, angle: Float) -> Quaternion {
        Quaternion::compose(&axis, angle, true, consts::AXIS_EPSILON)
    }

    #[test]
    fn test_endpoints_are_exact() {
        let q1 = about(Vector3f::new(0.0, 0.0, 1.0), 0.4);
        let q2 = about(Vector3f::new(1.0, 1.0, 0.0), 2.0);
        let out = slerp(&[q1, q2], &[0.0, 1.0], &[0.0, 1.0], false, 1e-9).unwrap();
        assert_eq!(out, vec![q1, q2]);
    }

    #[test]
    fn test_extrapolation_holds_endpoints() {
        let q1 = about(Vector3f::new(0.0, 1.0, 0.0), 0.2);
        let q2 = about(Vector3f::new(0.0, 1.0, 0.0), 1.2);
        let out = slerp(&[q1, q2], &[10.0, 20.0], &[0.0, 5.0, 25.0, 1e9], false, 1e-9).unwrap();
        assert_eq!(out, vec![q1, q1, q2, q2]);
    }

    #[test]
    fn test_midpoint_about_one_axis() {
        let axis = Vector3f::new(0.0, 0.0, 1.0);
        let out = slerp(&[about(axis, 0.0), about(axis, 1.0)], &[0.0, 2.0], &[0.5, 1.0], false, TOL).unwrap();
        let expected = [about(axis, 0.25), about(axis, 0.5)];
        for (q, e) in out.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(q.w, e.w, epsilon = 1e-12);
            assert_abs_diff_eq!(q.v.z, e.v.z, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_shorter_arc() {
        let axis = Vector3f::new(1.0, 0.0, 0.0);
        let q1 = about(axis, 0.1);
        // -q2 is the same rotation; interpolation must not take the long way round
        let q2 = -about(axis, 0.3);
        let out = slerp(&[q1, q2], &[0.0, 1.0], &[0.5], false, TOL).unwrap();
        let (angle, _) = out[0].decompose(consts::AXIS_EPSILON);
        assert_abs_diff_eq!(angle, 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_axis_epsilon_suppresses_short_axes() {
        let axis = Vector3f::new(0.0, 0.0, 1.0);
        let q = [about(axis, 0.0), about(axis, 1.0)];
        let out = slerp_with_epsilon(&q, &[0.0, 1.0], &[0.5], false, TOL, 1e3).unwrap();
        assert_eq!(out[0], q[0]);
        // the geometric form never decomposes
        let out = slerp_with_epsilon(&q, &[0.0, 1.0], &[0.5], true, TOL, 1e3).unwrap();
        assert_abs_diff_eq!(out[0].v.z, (0.25 as Float).sin(), epsilon = 1e-12);
    }

    #[test]
    fn test_colinear_returns_first() {
        let q = about(Vector3f::new(0.0, 1.0, 0.0), 0.7);
        let out = slerp(&[q, q], &[0.0, 1.0], &[0.3], false, TOL).unwrap();
        assert_eq!(out[0], q);
    }

    #[test]
    fn test_unit_norm_outputs() {
        let q1 = about(Vector3f::new(0.3, -1.0, 0.2), 0.9);
        let q2 = about(Vector3f::new(-0.5, 0.1, 1.0), 2.9);
        let x_out: Vec<Float> = (0..50).map(|i| i as Float / 49.0).collect();
        for geometric in [false, true].iter() {
            for q in slerp(&[q1, q2], &[0.0, 1.0], &x_out, *geometric, TOL).unwrap() {
                assert_abs_diff_eq!(q.norm(), 1.0, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_single_quaternion_broadcasts() {
        let q = about(Vector3f::new(0.0, 0.0, 1.0), 1.0);
        let out = slerp(&[q], &[5.0], &[0.0, 5.0, 10.0], false, TOL).unwrap();
        assert_eq!(out, vec![q, q, q]);
    }

    #[test]
    fn test_preconditions() {
        let q = Quaternion::identity();
        match slerp(&[q, Quaternion::new(1.0, 1.0, 0.0, 0.0)], &[0.0, 1.0], &[0.5], false, TOL) {
            Err(Error::Precision { index: 1, .. }) => {}
            r => panic!("expected precision error, got {:?}", r),
        }
        match slerp(&[q, q], &[0.0], &[0.5], false, TOL) {
            Err(Error::Shape { .. }) => {}
            r => panic!("expected shape error, got {:?}", r),
        }
        match slerp(&[q, q], &[1.0, 0.0], &[0.5], false, TOL) {
            Err(Error::Order { abscissa: Abscissa::Input, index: 1 }) => {}
            r => panic!("expected input order error, got {:?}", r),
        }
        match slerp(&[q, q], &[0.0, 1.0], &[0.5, 0.2], false, TOL) {
            Err(Error::Order { abscissa: Abscissa::Output, index: 1 }) => {}
            r => panic!("expected output order error, got {:?}", r),
        }
        assert!(slerp(&[], &[], &[0.5], false, TOL).is_err());
        assert!(slerp(&[q, q], &[0.0, 1.0], &[], false, TOL).unwrap().is_empty());
    }
}
