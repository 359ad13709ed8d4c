//! Magnetopause boundary-normal (LMN) coordinates from GSM.
//!
//! The local normal comes from the Shue et al. (1998) magnetopause shape
//! `r = r0 * (2 / (1 + cos(theta)))^alpha`, where the flaring exponent
//! `alpha` depends on solar-wind dynamic pressure and IMF Bz. Only the shape
//! matters here, so `r0` never enters.
use crate::core::numeric::Float;
use crate::core::geometry::Vector3f;
use crate::core::matrix::Matrix3x3;
use crate::core::error::{Result, check_same_len};
use crate::core::diagnostics::{Diagnosed, Diagnostic, DiagnosticCode};
use crate::core::interpolation::{fill_nan, interp_linear};
use crate::core::options::CotransOptions;
use crate::core::series::{check_frame, CoordinateTag, Metadata, TimeSeries, TimeSeriesStore};
use rayon::prelude::*;

/// Dynamic pressure floor in nPa, keeps the logarithm finite.
const MIN_DYNAMIC_PRESSURE: Float = 0.01;

/// Shue et al. (1998) flaring exponent for dynamic pressure `dp` (nPa) and
/// IMF `bz` (nT).
pub fn shue_alpha(dp: Float, bz: Float) -> Float {
    (0.58 - 0.007 * bz) * (1.0 + 0.024 * dp.max(MIN_DYNAMIC_PRESSURE).ln())
}

/// True where the tangent-plane construction is singular and the LMN frame
/// falls back to the coordinate axes.
pub fn on_sun_earth_line(position: &Vector3f) -> bool {
    axis_distance(position) == 0.0
}

fn axis_distance(position: &Vector3f) -> Float {
    (position.y * position.y + position.z * position.z).sqrt()
}

/// The GSM to LMN rotation at `position` (GSM): rows are L, M and N.
pub fn lmn_matrix(position: &Vector3f, dp: Float, bz: Float) -> Matrix3x3 {
    let (x, y, z) = (position.x, position.y, position.z);
    let rho = axis_distance(position);
    if rho == 0.0 {
        // N = x, M = y, L = z
        return Matrix3x3::new(
            0.0, 0.0, 1.0,
            0.0, 1.0, 0.0,
            1.0, 0.0, 0.0
        );
    }
    let alpha = shue_alpha(dp, bz);
    let theta = num::clamp(x / position.length(), -1.0, 1.0).acos();

    let t1 = Vector3f::new(0.0, z, -y).normalize();
    let t2 = (*position * (alpha * theta.sin() / (1.0 + theta.cos()))
        + Vector3f::new(-rho, x * y / rho, x * z / rho)).normalize();
    let n = t1.cross(&t2);
    let m = n.cross(&Vector3f::new(0.0, 0.0, 1.0)).normalize();
    let l = m.cross(&n);
    Matrix3x3::from_rows(&l, &m, &n)
}

/// Solar-wind monitor data on its own cadence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolarWind {
    pub times: Vec<Float>,
    /// nPa
    pub dynamic_pressure: Vec<Float>,
    /// nT
    pub imf_bz: Vec<Float>,
}

impl SolarWind {
    pub fn new(times: Vec<Float>, dynamic_pressure: Vec<Float>, imf_bz: Vec<Float>) -> SolarWind {
        SolarWind { times, dynamic_pressure, imf_bz }
    }

    /// Dp and Bz at `times`. NaNs are replaced by the configured defaults,
    /// then both are interpolated linearly, holding the end values outside
    /// the monitor's time range.
    pub fn resample(&self, times: &[Float], options: &CotransOptions) -> Result<(Vec<Float>, Vec<Float>)> {
        check_same_len("solar wind times and dynamic pressure", self.times.len(), self.dynamic_pressure.len())?;
        check_same_len("solar wind times and IMF Bz", self.times.len(), self.imf_bz.len())?;
        let dp = fill_nan(&self.dynamic_pressure, options.default_dynamic_pressure);
        let bz = fill_nan(&self.imf_bz, options.default_imf_bz);
        Ok((interp_linear(&self.times, &dp, times)?, interp_linear(&self.times, &bz, times)?))
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// Express `fields` (GSM) in the LMN frame at the matching `positions` (GSM).
///
/// Without solar-wind data, or with an empty series, Dp and Bz take the
/// defaults from [`CotransOptions`] and a `SolarWindDefaulted` diagnostic is
/// returned.
pub fn gsm_to_lmn(
    times: &[Float],
    positions: &[Vector3f],
    fields: &[Vector3f],
    solar_wind: Option<&SolarWind>
) -> Result<Diagnosed<Vec<Vector3f>>> {
    check_same_len("field times and samples", times.len(), fields.len())?;
    check_same_len("positions and fields", positions.len(), fields.len())?;
    let options = CotransOptions::instance();
    let mut diagnostics = Vec::new();

    let (dp, bz) = match solar_wind {
        Some(sw) if !sw.is_empty() => sw.resample(times, &options)?,
        _ => {
            diagnostics.push(Diagnostic::new(DiagnosticCode::SolarWindDefaulted, format!(
                "using Dp = {} nPa, Bz = {} nT", options.default_dynamic_pressure, options.default_imf_bz)));
            (vec![options.default_dynamic_pressure; times.len()], vec![options.default_imf_bz; times.len()])
        }
    };

    let degenerate = positions.iter().filter(|p| on_sun_earth_line(p)).count();
    if degenerate > 0 {
        diagnostics.push(Diagnostic::new(DiagnosticCode::DegenerateBoundaryNormal { count: degenerate }, "gsm to lmn"));
    }

    let out = (0..fields.len()).into_par_iter()
        .map(|i| lmn_matrix(&positions[i], dp[i], bz[i]).mul_vector(&fields[i]))
        .collect();
    Ok(Diagnosed::new(out, diagnostics))
}

/// Load a GSM position and field series from `store`, transform the field to
/// LMN and store it as `output_name`.
///
/// Positions sampled on other times are interpolated linearly onto the field
/// times. `solar_wind` names a dynamic-pressure and an IMF Bz series; Bz is
/// interpolated onto the pressure times when the two differ.
pub fn gsm_to_lmn_series<S: TimeSeriesStore>(
    store: &mut S,
    position_name: &str,
    field_name: &str,
    solar_wind: Option<(&str, &str)>,
    output_name: &str
) -> Result<Vec<Diagnostic>> {
    let position_series = store.require(position_name)?;
    let field_series = store.require(field_name)?;
    let mut positions = position_series.vectors(position_name)?;
    let fields = field_series.vectors(field_name)?;
    let times = &field_series.times;

    let gsm = CoordinateTag::new("GSM", "LMN");
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    diagnostics.extend(check_frame(&position_series.metadata, &gsm, position_name));
    diagnostics.extend(check_frame(&field_series.metadata, &gsm, field_name));

    if position_series.times != *times {
        debug!("interpolating {} onto the {} time stamps", position_name, field_name);
        positions = resample_vectors(&position_series.times, &positions, times)?;
    }

    let sw = match solar_wind {
        Some((dp_name, bz_name)) => {
            let dp_series = store.require(dp_name)?;
            let bz_series = store.require(bz_name)?;
            let dp = dp_series.scalars(dp_name)?;
            let mut bz = bz_series.scalars(bz_name)?;
            if bz_series.times != dp_series.times {
                let defaults = CotransOptions::instance();
                bz = interp_linear(&bz_series.times, &fill_nan(&bz, defaults.default_imf_bz), &dp_series.times)?;
            }
            Some(SolarWind::new(dp_series.times, dp, bz))
        }
        None => None,
    };

    let lmn = gsm_to_lmn(times, &positions, &fields, sw.as_ref())?;
    diagnostics.extend(lmn.diagnostics);
    let metadata = Metadata { coordinate_system: Some(gsm.output_frame.clone()), transform: Some(gsm) };
    info!("transformed {} samples of {} to LMN as {}", fields.len(), field_name, output_name);
    store.put(output_name, TimeSeries::from_vectors(field_series.times.clone(), &lmn.value, metadata));
    Ok(diagnostics)
}

fn resample_vectors(nodes: &[Float], values: &[Vector3f], times: &[Float]) -> Result<Vec<Vector3f>> {
    let component = |k: usize| -> Result<Vec<Float>> {
        let c: Vec<Float> = values.iter().map(|v| v[k]).collect();
        interp_linear(nodes, &c, times)
    };
    let (x, y, z) = (component(0)?, component(1)?, component(2)?);
    Ok((0..times.len()).map(|i| Vector3f::new(x[i], y[i], z[i])).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn assert_orthonormal(m: &Matrix3x3) {
        assert!(m.mul(&m.transpose()).is_identity(1e-12), "{:?} is not orthonormal", m);
        assert_abs_diff_eq!(m.determinant(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_alpha() {
        assert_abs_diff_eq!(shue_alpha(1.0, 0.0), 0.58, epsilon = 1e-15);
        assert_abs_diff_eq!(shue_alpha(1.0, -10.0), 0.65, epsilon = 1e-15);
        // pressure is floored at 0.01 nPa
        assert_eq!(shue_alpha(0.0, 0.0), shue_alpha(0.01, 0.0));
        assert_eq!(shue_alpha(-3.0, 0.0), shue_alpha(0.01, 0.0));
    }

    #[test]
    fn test_subsolar_point_uses_axes() {
        let m = lmn_matrix(&Vector3f::new(10.0, 0.0, 0.0), 2.0, -3.0);
        assert_eq!(m.row(0), Vector3f::new(0.0, 0.0, 1.0));
        assert_eq!(m.row(1), Vector3f::new(0.0, 1.0, 0.0));
        assert_eq!(m.row(2), Vector3f::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_underflowing_offset_is_degenerate() {
        let p = Vector3f::new(10.0, 1e-200, 0.0);
        assert!(on_sun_earth_line(&p));
        let out = gsm_to_lmn(&[0.0], &[p], &[Vector3f::new(1.0, 2.0, 3.0)], None).unwrap();
        assert_eq!(out.value[0], Vector3f::new(3.0, 2.0, 1.0));
        assert!(out.has(|c| *c == DiagnosticCode::DegenerateBoundaryNormal { count: 1 }));
    }

    #[test]
    fn test_frame_is_right_handed_and_normal_points_out() {
        let positions = [
            Vector3f::new(10.0, 5.0, 0.0),
            Vector3f::new(8.0, -3.0, 4.0),
            Vector3f::new(0.0, 12.0, -2.0),
            Vector3f::new(-5.0, 10.0, 6.0),
        ];
        for p in positions.iter() {
            let m = lmn_matrix(p, 2.088, 0.0);
            assert_orthonormal(&m);
            // outward: the normal has a positive radial component off the axis
            let n = m.row(2);
            assert!(n.dot(&Vector3f::new(0.0, p.y, p.z)) > 0.0);
            // M is perpendicular to z
            assert_abs_diff_eq!(m.row(1).z, 0.0, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_solar_wind_resample() {
        let sw = SolarWind::new(vec![0.0, 10.0], vec![Float::NAN, 4.0], vec![-2.0, Float::NAN]);
        let (dp, bz) = sw.resample(&[-5.0, 5.0, 20.0], &CotransOptions::default()).unwrap();
        assert_abs_diff_eq!(dp[0], 2.088, epsilon = 1e-15);
        assert_abs_diff_eq!(dp[1], (2.088 + 4.0) / 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(dp[2], 4.0, epsilon = 1e-15);
        assert_eq!(bz, vec![-2.0, -1.0, 0.0]);
        assert!(SolarWind::new(vec![0.0], vec![], vec![1.0]).resample(&[0.0], &CotransOptions::default()).is_err());
    }

    #[test]
    fn test_defaults_reported() {
        let out = gsm_to_lmn(&[0.0], &[Vector3f::new(10.0, 1.0, 1.0)], &[Vector3f::new(1.0, 2.0, 3.0)], None).unwrap();
        assert!(out.has(|c| *c == DiagnosticCode::SolarWindDefaulted));
        // rotation preserves magnitude
        assert_abs_diff_eq!(out.value[0].length(), (14.0 as Float).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_length_mismatch() {
        assert!(gsm_to_lmn(&[0.0, 1.0], &[Vector3f::zero()], &[Vector3f::zero(); 2], None).is_err());
        assert!(gsm_to_lmn(&[0.0], &[Vector3f::zero()], &[Vector3f::zero(); 2], None).is_err());
    }
}
