//! Rotation-matrix resampling and frame transforms built on the core algebra.
pub mod conversion;
pub mod validation;
pub mod slerp;
pub mod rotate;
pub mod lmn;

pub use conversion::{matrix_to_quaternion, quaternion_to_matrix};
pub use validation::{MatrixVerification, verify, has_left_handed, swap_handedness};
pub use slerp::slerp;
pub use rotate::{rotate, rotate_series, VectorRotation};
pub use lmn::{gsm_to_lmn, gsm_to_lmn_series, lmn_matrix, SolarWind};
