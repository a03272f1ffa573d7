//! Floating-point geometric primitives.

mod affine3;
mod point3;
mod segment3;
mod vec3;

pub use affine3::{Affine3, Frame3};
pub use point3::Point3;
pub use segment3::Segment3;
pub use vec3::Vec3;
