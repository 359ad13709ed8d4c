//! Coordinate-transform interpolation for space-physics vector time series.
//!
//! Quaternion algebra, SLERP resampling of time-varying rotation matrices,
//! rotation-matrix validation and the magnetopause boundary-normal (LMN)
//! frame of Shue et al. (1998).
#[macro_use]
extern crate log;

#[macro_use]
extern crate lazy_static;

extern crate rayon;

#[macro_use]
pub mod core;
pub mod transforms;

pub use crate::core::error::{Error, Result};
