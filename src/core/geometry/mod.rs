pub mod vector3;
pub use vector3::*;
