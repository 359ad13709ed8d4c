use super::numeric::{Float, consts};
use parking_lot::RwLock;

/// Tolerances and physical defaults used by the transform pipelines.
#[derive(Debug, Clone, PartialEq)]
pub struct CotransOptions {
    /// Unit-norm and node-coincidence tolerance for SLERP.
    pub slerp_tolerance: Float,
    /// Elementwise tolerance for identity and determinant checks.
    pub identity_tolerance: Float,
    pub axis_epsilon: Float,
    /// Solar-wind dynamic pressure in nPa used when no monitor data is available.
    pub default_dynamic_pressure: Float,
    /// IMF Bz in nT used when no monitor data is available.
    pub default_imf_bz: Float,
    /// Use the geometric SLERP formula instead of the quaternion-exponential one.
    pub geometric_slerp: bool,
}

impl Default for CotransOptions {
    fn default() -> CotransOptions {
        CotransOptions {
            slerp_tolerance: consts::SLERP_TOLERANCE,
            identity_tolerance: consts::IDENTITY_TOLERANCE,
            axis_epsilon: consts::AXIS_EPSILON,
            default_dynamic_pressure: 2.088,
            default_imf_bz: 0.0,
            geometric_slerp: false,
        }
    }
}

lazy_static! {
    static ref INSTANCE: RwLock<CotransOptions> = RwLock::new(CotransOptions::default());
}

impl CotransOptions {
    /// Returns a snapshot of the process-wide options.
    pub fn instance() -> CotransOptions {
        INSTANCE.read().clone()
    }

    /// Replace the process-wide options.
    pub fn set(options: CotransOptions) {
        *INSTANCE.write() = options;
    }
}
