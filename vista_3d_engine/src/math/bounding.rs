/// Bounding volumes for world objects.
///
/// A box is valid whenever `min[i] <= max[i]` on every axis; operations
/// here preserve that invariant. World-space volumes are derived from
/// model-space spheres: the sphere transforms rigidly (centre moved,
/// radius kept), the box is the envelope of the transformed corners of
/// the sphere's bounding cube.

use glam::{Mat4, Vec3};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner (x, y, z)
    pub min: Vec3,
    /// Maximum corner (x, y, z)
    pub max: Vec3,
}

impl BoundingBox {
    /// Build a box from its two corners.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// An empty box positioned at the origin.
    pub fn zero() -> Self {
        Self { min: Vec3::ZERO, max: Vec3::ZERO }
    }

    /// Whether `min[i] <= max[i]` holds on every axis.
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// The eight corner points of this box.
    pub fn corners(&self) -> [Vec3; 8] {
        let (mn, mx) = (self.min, self.max);
        [
            Vec3::new(mn.x, mn.y, mn.z),
            Vec3::new(mx.x, mn.y, mn.z),
            Vec3::new(mn.x, mx.y, mn.z),
            Vec3::new(mx.x, mx.y, mn.z),
            Vec3::new(mn.x, mn.y, mx.z),
            Vec3::new(mx.x, mn.y, mx.z),
            Vec3::new(mn.x, mx.y, mx.z),
            Vec3::new(mx.x, mx.y, mx.z),
        ]
    }

    /// Grow the box to cover `point`.
    pub fn expand_to(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }
}

/// Bounding sphere with a non-negative radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// Centre point
    pub center: Vec3,
    /// Radius, `>= 0`
    pub radius: f32,
}

impl BoundingSphere {
    /// Build a sphere; the radius is clamped to be non-negative.
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius: radius.max(0.0) }
    }

    /// A zero-radius sphere at the origin.
    pub fn zero() -> Self {
        Self { center: Vec3::ZERO, radius: 0.0 }
    }
}

/// Transform a model-space sphere to world space.
///
/// The centre goes through the matrix; the radius is kept as-is
/// (transforms in this engine are rigid).
pub fn transform_sphere(sphere: &BoundingSphere, local_to_world: &Mat4) -> BoundingSphere {
    BoundingSphere {
        center: local_to_world.transform_point3(sphere.center),
        radius: sphere.radius,
    }
}

/// World-space AABB for a model-space sphere under a transform.
///
/// Envelope of the eight transformed corners of the sphere's bounding cube.
pub fn box_enclosing_transformed_sphere(
    sphere: &BoundingSphere,
    local_to_world: &Mat4,
) -> BoundingBox {
    let r = Vec3::splat(sphere.radius);
    let cube = BoundingBox::new(sphere.center - r, sphere.center + r);

    let corners = cube.corners();
    let first = local_to_world.transform_point3(corners[0]);
    let mut result = BoundingBox::new(first, first);
    for &corner in &corners[1..] {
        result.expand_to(local_to_world.transform_point3(corner));
    }
    result
}

#[cfg(test)]
#[path = "bounding_tests.rs"]
mod tests;
