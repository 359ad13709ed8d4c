use super::numeric::{Float, find_interval, first_unordered, lerp};
use super::error::{Abscissa, Error, Result, check_same_len};
use rayon::prelude::*;

/// Piecewise-linear interpolation of `values` sampled at `nodes` onto `x`.
///
/// `nodes` must be non-decreasing. Outside the node range the nearest end
/// value is held constant. An empty input interpolates to NaNs.
pub fn interp_linear(nodes: &[Float], values: &[Float], x: &[Float]) -> Result<Vec<Float>> {
    check_same_len("interpolation nodes and values", nodes.len(), values.len())?;
    if let Some(index) = first_unordered(nodes) {
        return Err(Error::Order { abscissa: Abscissa::Input, index });
    }
    Ok(x.par_iter().map(|x| interp_one(nodes, values, *x)).collect())
}

fn interp_one(nodes: &[Float], values: &[Float], x: Float) -> Float {
    let n = nodes.len();
    if n == 0 || x.is_nan() {
        return Float::NAN;
    }
    if x <= nodes[0] {
        return values[0];
    }
    if x >= nodes[n - 1] {
        return values[n - 1];
    }
    let idx = find_interval(n, |i| nodes[i] <= x);
    let t = (x - nodes[idx]) / (nodes[idx + 1] - nodes[idx]);
    lerp(t, values[idx], values[idx + 1])
}

/// Replace NaN entries with `default`.
pub fn fill_nan(values: &[Float], default: Float) -> Vec<Float> {
    values.iter().map(|v| if v.is_nan() { default } else { *v }).collect()
}
