#[macro_use]
pub mod vlog;

pub mod numeric;
pub mod error;
pub mod diagnostics;
pub mod options;
pub mod geometry;
pub mod matrix;
pub mod quaternion;
pub mod interpolation;
pub mod series;
