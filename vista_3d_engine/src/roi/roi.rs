/// ROI data: transform, bounding volumes, LOD handle, geometry group.

use std::sync::Arc;

use bitflags::bitflags;
use glam::{Mat4, Vec3};
use slotmap::new_key_type;

use crate::error::Result;
use crate::lod::LodListKey;
use crate::math::{box_enclosing_transformed_sphere, transform_sphere, BoundingBox, BoundingSphere};
use crate::renderer::{Group, MatrixRows};

new_key_type! {
    /// Stable key of an ROI within its arena.
    pub struct RoiKey;
}

bitflags! {
    /// Re-evaluation marker bits.
    ///
    /// `NEEDS_REEVALUATION` asks the view manager to revisit this ROI;
    /// `REEVALUATION_SEEN` is the sticky companion that stays set once
    /// the ROI was ever marked.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RoiUpdateFlags: u32 {
        const NEEDS_REEVALUATION = 0x01;
        const REEVALUATION_SEEN = 0x02;
    }
}

/// An orientable world object.
///
/// The transform invariants are maintained by [`RoiArena`](super::RoiArena):
/// after any successful transform mutation the world bounding volumes
/// match `local_to_world` and the renderer group carries the same
/// transform.
pub struct Roi {
    name: String,
    visible: bool,
    intrinsic_importance: f32,

    /// Shared LOD list, held through the cache (reference counted there)
    lods: Option<LodListKey>,

    /// Compound children, owned (arena keys)
    pub(super) children: Vec<RoiKey>,
    /// Non-owning parent link
    pub(super) parent: Option<RoiKey>,

    pub(super) local_to_world: Mat4,
    /// Transform relative to the parent; equals `local_to_world` for roots
    pub(super) local_relative: Mat4,

    model_bounding_box: BoundingBox,
    model_bounding_sphere: BoundingSphere,
    world_bounding_box: BoundingBox,
    world_bounding_sphere: BoundingSphere,
    world_velocity: Vec3,

    update_flags: RoiUpdateFlags,

    /// Scene graph node owned by this ROI
    geometry: Arc<dyn Group>,
    /// Detail level currently attached to `geometry`; -1 when none
    pub(crate) last_lod: i32,
}

impl Roi {
    pub fn new(name: impl Into<String>, geometry: Arc<dyn Group>) -> Self {
        Self {
            name: name.into(),
            visible: true,
            intrinsic_importance: 1.0,
            lods: None,
            children: Vec::new(),
            parent: None,
            local_to_world: Mat4::IDENTITY,
            local_relative: Mat4::IDENTITY,
            model_bounding_box: BoundingBox::zero(),
            model_bounding_sphere: BoundingSphere::zero(),
            world_bounding_box: BoundingBox::zero(),
            world_bounding_sphere: BoundingSphere::zero(),
            world_velocity: Vec3::ZERO,
            update_flags: RoiUpdateFlags::empty(),
            geometry,
            last_lod: -1,
        }
    }

    /// Set the model-space bounding volumes; world volumes follow on the
    /// next transform update.
    pub fn set_model_bounds(&mut self, sphere: BoundingSphere, bounding_box: BoundingBox) {
        self.model_bounding_sphere = sphere;
        self.model_bounding_box = bounding_box;
        self.update_world_bounding_volumes();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn visibility(&self) -> bool {
        self.visible
    }

    pub fn set_visibility(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn intrinsic_importance(&self) -> f32 {
        self.intrinsic_importance
    }

    pub fn set_intrinsic_importance(&mut self, importance: f32) {
        self.intrinsic_importance = importance;
    }

    pub fn lods(&self) -> Option<LodListKey> {
        self.lods
    }

    pub fn set_lods(&mut self, lods: Option<LodListKey>) {
        self.lods = lods;
    }

    pub fn children(&self) -> &[RoiKey] {
        &self.children
    }

    pub fn parent(&self) -> Option<RoiKey> {
        self.parent
    }

    pub fn local_to_world(&self) -> &Mat4 {
        &self.local_to_world
    }

    pub fn world_position(&self) -> Vec3 {
        self.local_to_world.w_axis.truncate()
    }

    pub fn world_direction(&self) -> Vec3 {
        self.local_to_world.z_axis.truncate()
    }

    pub fn world_up(&self) -> Vec3 {
        self.local_to_world.y_axis.truncate()
    }

    pub fn world_bounding_box(&self) -> &BoundingBox {
        &self.world_bounding_box
    }

    pub fn world_bounding_sphere(&self) -> &BoundingSphere {
        &self.world_bounding_sphere
    }

    pub fn world_velocity(&self) -> Vec3 {
        self.world_velocity
    }

    pub fn set_world_velocity(&mut self, velocity: Vec3) {
        self.world_velocity = velocity;
    }

    pub fn update_flags(&self) -> RoiUpdateFlags {
        self.update_flags
    }

    /// Mark or unmark this ROI for re-evaluation.
    ///
    /// Marking sets both bits; unmarking clears only the pending bit,
    /// the sticky companion stays.
    pub fn set_reevaluation(&mut self, enable: bool) {
        if enable {
            self.update_flags |=
                RoiUpdateFlags::NEEDS_REEVALUATION | RoiUpdateFlags::REEVALUATION_SEEN;
        } else {
            self.update_flags &= !RoiUpdateFlags::NEEDS_REEVALUATION;
        }
    }

    pub fn geometry(&self) -> &Arc<dyn Group> {
        &self.geometry
    }

    /// Detail level currently attached to the geometry group, -1 for none.
    pub fn last_lod(&self) -> i32 {
        self.last_lod
    }

    /// Recompute world bounding volumes from the current transform.
    pub(super) fn update_world_bounding_volumes(&mut self) {
        self.world_bounding_sphere =
            transform_sphere(&self.model_bounding_sphere, &self.local_to_world);
        self.world_bounding_box =
            box_enclosing_transformed_sphere(&self.model_bounding_sphere, &self.local_to_world);
    }

    /// Push the current transform into the renderer group.
    pub(super) fn mirror_transform_to_geometry(&self) -> Result<()> {
        self.geometry.set_transformation(&matrix_rows(&self.local_to_world))
    }
}

/// Renderer-facing row layout of a transform.
///
/// Rows are `[right, up, direction, position]`; with glam's column-vector
/// convention that is exactly the column array.
pub(crate) fn matrix_rows(m: &Mat4) -> MatrixRows {
    m.to_cols_array_2d()
}

#[cfg(test)]
#[path = "roi_tests.rs"]
mod tests;
