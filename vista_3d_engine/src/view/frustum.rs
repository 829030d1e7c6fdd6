/// View frustum: eight corners and six culling planes.
///
/// Corners are computed in camera space from the field of view and the
/// clip distances, then carried to world space through the camera's
/// local-to-world matrix. Planes are stored as `(a, b, c, d)` with the
/// normal pointing inward: a point is inside when `a*x + b*y + c*z + d >= 0`
/// for all six planes.

use glam::{Mat4, Vec3, Vec4};

use crate::engine_err;
use crate::error::Result;
use crate::math::BoundingBox;

/// Frustum plane indices
pub const PLANE_NEAR: usize = 0;
pub const PLANE_FAR: usize = 1;
pub const PLANE_LEFT: usize = 2;
pub const PLANE_RIGHT: usize = 3;
pub const PLANE_TOP: usize = 4;
pub const PLANE_BOTTOM: usize = 5;

#[derive(Debug, Clone)]
pub struct Frustum {
    /// Corners in camera space: near quad then far quad, counter-clockwise
    /// from bottom-left as seen from the camera (looking down +Z)
    corners_camera: [Vec3; 8],
    /// The same corners in world space
    corners_world: [Vec3; 8],
    /// Culling planes: near, far, left, right, top, bottom
    planes: [Vec4; 6],
}

impl Frustum {
    /// Build a frustum.
    ///
    /// `fov_degrees` is the full vertical field of view, `front`/`back`
    /// the clip distances, `width`/`height` the viewport size used for
    /// the aspect ratio, `camera_to_world` the camera's local-to-world
    /// matrix. Fails with `InvalidParameters` when the viewport height
    /// or the front distance is not positive.
    pub fn build(
        fov_degrees: f32,
        front: f32,
        back: f32,
        width: f32,
        height: f32,
        camera_to_world: &Mat4,
    ) -> Result<Self> {
        if height <= 0.0 || front <= 0.0 {
            return Err(engine_err!(InvalidParameters, "vista3d::Frustum",
                "height ({}) and front ({}) must be positive", height, front));
        }

        let half_tan = (fov_degrees.to_radians() * 0.5).tan();
        let near_h = front * half_tan;
        let near_w = near_h * width / height;
        let far_h = back * half_tan;
        let far_w = far_h * width / height;

        let corners_camera = [
            Vec3::new(-near_w, -near_h, front),
            Vec3::new(near_w, -near_h, front),
            Vec3::new(near_w, near_h, front),
            Vec3::new(-near_w, near_h, front),
            Vec3::new(-far_w, -far_h, back),
            Vec3::new(far_w, -far_h, back),
            Vec3::new(far_w, far_h, back),
            Vec3::new(-far_w, far_h, back),
        ];

        let corners_world =
            corners_camera.map(|corner| camera_to_world.transform_point3(corner));

        // Interior reference point for orienting the plane normals inward
        let centroid = corners_world.iter().copied().sum::<Vec3>() / 8.0;

        let planes = [
            // Near: the near quad
            plane_from_points(corners_world[0], corners_world[1], corners_world[2], centroid),
            // Far: the far quad
            plane_from_points(corners_world[4], corners_world[6], corners_world[5], centroid),
            // Left
            plane_from_points(corners_world[0], corners_world[3], corners_world[7], centroid),
            // Right
            plane_from_points(corners_world[1], corners_world[5], corners_world[6], centroid),
            // Top
            plane_from_points(corners_world[3], corners_world[2], corners_world[6], centroid),
            // Bottom
            plane_from_points(corners_world[0], corners_world[4], corners_world[5], centroid),
        ];

        Ok(Self { corners_camera, corners_world, planes })
    }

    pub fn corners_camera(&self) -> &[Vec3; 8] {
        &self.corners_camera
    }

    pub fn corners_world(&self) -> &[Vec3; 8] {
        &self.corners_world
    }

    pub fn planes(&self) -> &[Vec4; 6] {
        &self.planes
    }

    /// Test whether a point satisfies all six plane inequalities.
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.truncate().dot(point) + plane.w >= 0.0)
    }

    /// AABB visibility test.
    ///
    /// For each plane the box extent is projected along the plane normal:
    /// the corner most aligned with the normal decides. A wholly-outside
    /// result on any plane culls the box. Conservative: may keep a box
    /// that only nearly intersects, never culls a visible one.
    pub fn is_box_visible(&self, bounding_box: &BoundingBox) -> bool {
        for plane in &self.planes {
            let normal = plane.truncate();
            let extent_vertex = Vec3::new(
                if normal.x >= 0.0 { bounding_box.max.x } else { bounding_box.min.x },
                if normal.y >= 0.0 { bounding_box.max.y } else { bounding_box.min.y },
                if normal.z >= 0.0 { bounding_box.max.z } else { bounding_box.min.z },
            );
            if normal.dot(extent_vertex) + plane.w < 0.0 {
                return false;
            }
        }
        true
    }
}

/// Plane through three points, oriented so `interior` lies on the
/// non-negative side.
fn plane_from_points(a: Vec3, b: Vec3, c: Vec3, interior: Vec3) -> Vec4 {
    let normal = (b - a).cross(c - a).normalize_or_zero();
    let d = -normal.dot(a);
    if normal.dot(interior) + d < 0.0 {
        Vec4::new(-normal.x, -normal.y, -normal.z, -d)
    } else {
        normal.extend(d)
    }
}

#[cfg(test)]
#[path = "frustum_tests.rs"]
mod tests;
