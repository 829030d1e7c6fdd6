//! Math layer for the scene core.
//!
//! Vector, matrix and quaternion types come from `glam`; this module adds
//! the checked operations and bounding volumes the engine needs on top.

pub mod bounding;
pub mod transform;

pub use bounding::{box_enclosing_transformed_sphere, transform_sphere, BoundingBox, BoundingSphere};
pub use transform::{
    checked_invert, checked_normalize, compose_local_transform, matrix_from_unit_quat,
    quat_from_matrix, EPSILON,
};
