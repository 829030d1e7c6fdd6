/// Scene-wide visibility and detail management.
///
/// The view manager owns the ROI arena, walks the top-level ROIs once
/// per frame, culls their world bounding boxes against the frustum,
/// selects a detail level from each ROI's shared LOD list based on
/// projected size, and keeps the renderer scene graph in sync by
/// attaching and detaching mesh-builder groups.

use std::f32::consts::PI;
use std::sync::Arc;

use bitflags::bitflags;
use glam::Mat4;
use rustc_hash::FxHashMap;

use crate::engine_err;
use crate::error::Result;
use crate::lod::{LodCache, LodObject};
use crate::math::{checked_invert, BoundingSphere};
use crate::renderer::{Group, GroupId, View};
use crate::roi::{Roi, RoiArena, RoiKey};

use super::frustum::Frustum;
use super::realtime_view::LodSettings;

/// Detail hint: choose the level from the projected size.
pub const LOD_AUTO: i32 = -1;
/// Detail hint: force the object hidden.
pub const LOD_HIDE: i32 = -2;

bitflags! {
    /// Internal view manager state.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ViewFlags: u32 {
        /// Transient marker set while an update pass runs
        const WORK_PENDING = 0x01;
        /// View transform changed; world-space planes need a rebuild
        const VIEW_TRANSFORM_DIRTY = 0x02;
        /// Frustum parameters changed; everything needs a rebuild
        const FRUSTUM_DIRTY = 0x04;
        /// Frustum planes are currently valid
        const FRUSTUM_VALID = 0x08;
    }
}

pub struct ViewManager {
    /// Top-level scene group; ROI geometry attaches here
    scene: Arc<dyn Group>,
    arena: RoiArena,
    roots: Vec<RoiKey>,
    visible_rois: Vec<RoiKey>,
    settings: LodSettings,
    flags: ViewFlags,

    width: f32,
    height: f32,
    fov_degrees: f32,
    front: f32,
    back: f32,

    /// Camera local-to-world
    pov: Mat4,
    inv_pov: Mat4,
    frustum: Option<Frustum>,
    /// Area of the view rectangle at unit distance
    view_area_at_one: f32,
    prev_render_time: f32,
}

impl ViewManager {
    pub fn new(scene: Arc<dyn Group>) -> Self {
        Self {
            scene,
            arena: RoiArena::new(),
            roots: Vec::new(),
            visible_rois: Vec::new(),
            settings: LodSettings::new(),
            flags: ViewFlags::FRUSTUM_DIRTY,
            width: 640.0,
            height: 480.0,
            fov_degrees: 90.0,
            front: 0.1,
            back: 100.0,
            pov: Mat4::IDENTITY,
            inv_pov: Mat4::IDENTITY,
            frustum: None,
            view_area_at_one: 1.0,
            prev_render_time: 0.0,
        }
    }

    // ===== ROI BOOKKEEPING =====

    pub fn arena(&self) -> &RoiArena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut RoiArena {
        &mut self.arena
    }

    /// Register a top-level ROI for visibility management.
    pub fn add(&mut self, key: RoiKey) {
        if !self.roots.contains(&key) {
            self.roots.push(key);
        }
    }

    pub fn roots(&self) -> &[RoiKey] {
        &self.roots
    }

    /// ROIs found visible by the last update pass.
    pub fn visible_rois(&self) -> &[RoiKey] {
        &self.visible_rois
    }

    /// Remove an ROI (and its compound children) from the scene.
    ///
    /// Detaches any attached detail, removes the subtree from the arena
    /// and releases the LOD list references of every removed object.
    pub fn remove(&mut self, key: RoiKey, cache: &mut LodCache) -> Result<()> {
        self.hide_subtree(key, cache)?;

        let removed = self.arena.remove_recursive(key);
        for roi in &removed {
            if let Some(lods) = roi.lods() {
                cache.release(lods);
            }
        }

        self.roots.retain(|&existing| existing != key);
        let arena = &self.arena;
        self.visible_rois.retain(|&existing| arena.contains(existing));
        Ok(())
    }

    /// Remove every managed ROI.
    pub fn remove_all(&mut self, cache: &mut LodCache) -> Result<()> {
        for root in std::mem::take(&mut self.roots) {
            self.hide_subtree(root, cache)?;
            let removed = self.arena.remove_recursive(root);
            for roi in &removed {
                if let Some(lods) = roi.lods() {
                    cache.release(lods);
                }
            }
        }
        self.visible_rois.clear();
        Ok(())
    }

    // ===== VIEW PARAMETERS =====

    pub fn settings(&self) -> &LodSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut LodSettings {
        &mut self.settings
    }

    /// Set the viewport resolution; the frustum is rebuilt on the next
    /// update.
    pub fn set_resolution(&mut self, width: u32, height: u32) {
        self.width = width as f32;
        self.height = height as f32;
        self.flags.insert(ViewFlags::FRUSTUM_DIRTY);
        self.flags.remove(ViewFlags::FRUSTUM_VALID);
    }

    /// Set the projection parameters; the frustum is rebuilt on the next
    /// update.
    pub fn set_frustum(&mut self, fov_degrees: f32, front: f32, back: f32) {
        self.fov_degrees = fov_degrees;
        self.front = front;
        self.back = back;
        self.flags.insert(ViewFlags::FRUSTUM_DIRTY);
        self.flags.remove(ViewFlags::FRUSTUM_VALID);
    }

    /// Use `camera_to_world` as the point of view.
    pub fn set_pov_source(&mut self, camera_to_world: &Mat4) {
        self.pov = *camera_to_world;
        self.flags.insert(ViewFlags::VIEW_TRANSFORM_DIRTY);
    }

    /// Use an ROI's transform as the point of view.
    pub fn set_pov_source_roi(&mut self, key: RoiKey) -> Result<()> {
        let pov = *self
            .arena
            .get(key)
            .ok_or_else(|| engine_err!(NotFound, "vista3d::ViewManager", "dead POV source key"))?
            .local_to_world();
        self.set_pov_source(&pov);
        Ok(())
    }

    pub fn flags(&self) -> ViewFlags {
        self.flags
    }

    /// Accumulated render time handed to `update`.
    pub fn prev_render_time(&self) -> f32 {
        self.prev_render_time
    }

    pub fn frustum(&self) -> Option<&Frustum> {
        self.frustum.as_ref()
    }

    // ===== FRAME UPDATE =====

    /// Per-frame entry point: refresh dirty view state, then walk the
    /// ROI graph managing visibility and detail.
    pub fn update(&mut self, cache: &LodCache, delta_seconds: f32) -> Result<()> {
        self.flags.insert(ViewFlags::WORK_PENDING);
        let result = self.update_inner(cache, delta_seconds);
        self.flags.remove(ViewFlags::WORK_PENDING);
        result
    }

    fn update_inner(&mut self, cache: &LodCache, delta_seconds: f32) -> Result<()> {
        if self
            .flags
            .intersects(ViewFlags::FRUSTUM_DIRTY | ViewFlags::VIEW_TRANSFORM_DIRTY)
        {
            self.update_view_transformations()?;
        }

        self.prev_render_time += delta_seconds;

        if !self.flags.contains(ViewFlags::FRUSTUM_VALID) {
            return Ok(());
        }

        self.visible_rois.clear();
        for root in self.roots.clone() {
            self.manage_visibility_and_detail_recursively(root, LOD_AUTO, cache)?;
        }
        Ok(())
    }

    /// Rebuild the frustum planes and derived view quantities from the
    /// current parameters and point of view.
    pub fn update_view_transformations(&mut self) -> Result<()> {
        let frustum = Frustum::build(
            self.fov_degrees,
            self.front,
            self.back,
            self.width,
            self.height,
            &self.pov,
        )?;
        self.inv_pov = checked_invert(&self.pov)?;

        let half_tan = (self.fov_degrees.to_radians() * 0.5).tan();
        let aspect = self.width / self.height;
        self.view_area_at_one = 4.0 * half_tan * half_tan * aspect;

        self.frustum = Some(frustum);
        self.flags
            .remove(ViewFlags::FRUSTUM_DIRTY | ViewFlags::VIEW_TRANSFORM_DIRTY);
        self.flags.insert(ViewFlags::FRUSTUM_VALID);
        Ok(())
    }

    // ===== CULLING AND LOD SELECTION =====

    /// Frustum test for a world-space AABB. Boxes are kept while the
    /// frustum is invalid.
    pub fn is_bounding_box_in_frustum(&self, bounding_box: &crate::math::BoundingBox) -> bool {
        match &self.frustum {
            Some(frustum) => frustum.is_box_visible(bounding_box),
            None => true,
        }
    }

    /// Ratio of a sphere's projected area to the view area at unit
    /// distance. Distance is measured along the camera forward axis.
    pub fn projected_size(&self, sphere: &BoundingSphere) -> f32 {
        let z = self.camera_space_depth(sphere);
        let denominator = z * z * self.view_area_at_one;
        if denominator <= f32::EPSILON {
            return f32::MAX;
        }
        PI * sphere.radius * sphere.radius / denominator
    }

    fn camera_space_depth(&self, sphere: &BoundingSphere) -> f32 {
        self.inv_pov.transform_point3(sphere.center).z
    }

    /// Pick the detail level for an ROI from its projected size.
    ///
    /// `None` means the object should be hidden (behind the near plane).
    fn select_lod_level(&self, roi: &Roi, cache: &LodCache) -> Option<i32> {
        let sphere = roi.world_bounding_sphere();
        if self.camera_space_depth(sphere) < self.front {
            return None;
        }

        let lods = cache.get(roi.lods()?)?;
        if lods.is_empty() {
            return None;
        }

        let area = self.projected_size(sphere) * roi.intrinsic_importance();

        // Small on screen: clamp to the coarsest level
        if area < self.settings.max_lod_power() {
            return Some(0);
        }

        // Highest-detail level whose recommended area fits, ties broken
        // toward the coarser entry
        for index in (0..lods.len()).rev() {
            let lod = lods.get(index)?;
            let threshold = lod.avg_poly_area() * lod.num_polys() as f64;
            if threshold <= area as f64 {
                let mut chosen = index;
                while chosen > 0 {
                    let coarser = lods.get(chosen - 1)?;
                    if coarser.avg_poly_area() * coarser.num_polys() as f64 == threshold {
                        chosen -= 1;
                    } else {
                        break;
                    }
                }
                return Some(chosen as i32);
            }
        }

        Some(0)
    }

    // ===== SCENE GRAPH SYNCHRONISATION =====

    /// Attach the chosen detail level to the ROI's geometry, detaching
    /// the previous one. A no-op when `level` is already attached.
    pub fn update_roi_detail_based_on_lod(
        &mut self,
        key: RoiKey,
        level: i32,
        cache: &LodCache,
    ) -> Result<()> {
        let (lods_key, last_lod, geometry) = {
            let roi = self
                .arena
                .get(key)
                .ok_or_else(|| engine_err!(NotFound, "vista3d::ViewManager", "dead ROI key"))?;
            if roi.last_lod() == level {
                return Ok(());
            }
            match roi.lods() {
                Some(lods) => (lods, roi.last_lod(), Arc::clone(roi.geometry())),
                None => return Ok(()),
            }
        };

        let lods = cache
            .get(lods_key)
            .ok_or_else(|| engine_err!(NotFound, "vista3d::ViewManager", "stale LOD list key"))?;
        let new_lod = lods.get(level as usize).ok_or_else(|| {
            engine_err!(InvalidParameters, "vista3d::ViewManager",
                "LOD level {} out of range ({} available)", level, lods.len())
        })?;

        if last_lod >= 0 {
            if let Some(old_lod) = lods.get(last_lod as usize) {
                geometry.remove_mesh_builder(old_lod.mesh_builder())?;
            }
        } else {
            // First detail for this ROI: bring its geometry into the scene
            self.scene.add_group(&geometry)?;
        }

        geometry.add_mesh_builder(new_lod.mesh_builder())?;

        if let Some(roi) = self.arena.get_mut(key) {
            roi.last_lod = level;
        }
        Ok(())
    }

    /// Detach the ROI's current detail and take its geometry out of the
    /// scene. A no-op when nothing is attached.
    pub fn remove_roi_detail_from_scene(&mut self, key: RoiKey, cache: &LodCache) -> Result<()> {
        let (lods_key, last_lod, geometry) = {
            let Some(roi) = self.arena.get(key) else {
                return Ok(());
            };
            if roi.last_lod() < 0 {
                return Ok(());
            }
            (roi.lods(), roi.last_lod(), Arc::clone(roi.geometry()))
        };

        let detached = lods_key
            .and_then(|lods| cache.get(lods))
            .and_then(|lods| lods.get(last_lod as usize))
            .map(|lod| geometry.remove_mesh_builder(lod.mesh_builder()))
            .transpose()?
            .is_some();
        if !detached {
            // LOD list already gone: drop whatever is still attached
            geometry.remove_all()?;
        }

        self.scene.remove_group(&geometry)?;
        if let Some(roi) = self.arena.get_mut(key) {
            roi.last_lod = -1;
        }
        Ok(())
    }

    fn hide_subtree(&mut self, key: RoiKey, cache: &LodCache) -> Result<()> {
        self.remove_roi_detail_from_scene(key, cache)?;
        let children = match self.arena.get(key) {
            Some(roi) => roi.children().to_vec(),
            None => return Ok(()),
        };
        for child in children {
            self.hide_subtree(child, cache)?;
        }
        Ok(())
    }

    /// Recursive visibility and detail pass.
    ///
    /// `hint` is a detail level to force, [`LOD_AUTO`] to derive it from
    /// the projected size, or [`LOD_HIDE`] to hide the subtree.
    pub fn manage_visibility_and_detail_recursively(
        &mut self,
        key: RoiKey,
        hint: i32,
        cache: &LodCache,
    ) -> Result<()> {
        let mut effective = hint;

        if effective != LOD_HIDE {
            if !self.arena.is_visible_with_children(key) {
                effective = LOD_HIDE;
            } else if let Some(roi) = self.arena.get(key) {
                if !self.is_bounding_box_in_frustum(roi.world_bounding_box()) {
                    effective = LOD_HIDE;
                }
            }
        }

        if effective == LOD_HIDE {
            self.remove_roi_detail_from_scene(key, cache)?;
        } else {
            let (self_visible, has_lods) = match self.arena.get(key) {
                Some(roi) => (roi.visibility(), roi.lods().is_some()),
                None => (false, false),
            };

            if self_visible && has_lods {
                let level = if effective >= 0 {
                    Some(effective)
                } else {
                    self.arena.get(key).and_then(|roi| self.select_lod_level(roi, cache))
                };

                match level {
                    Some(level) => {
                        self.update_roi_detail_based_on_lod(key, level, cache)?;
                        self.visible_rois.push(key);
                    }
                    None => self.remove_roi_detail_from_scene(key, cache)?,
                }
            }
        }

        let children = match self.arena.get(key) {
            Some(roi) => roi.children().to_vec(),
            None => Vec::new(),
        };
        for child in children {
            self.manage_visibility_and_detail_recursively(child, effective, cache)?;
        }
        Ok(())
    }

    // ===== PICKING =====

    /// Find the frontmost ROI under viewport coordinates `(x, y)`.
    ///
    /// The renderer view supplies ordered hit-group chains; each chain is
    /// walked up to the top-level ROI owning it. `None` on miss.
    pub fn pick(&self, view: &dyn View, x: u32, y: u32) -> Result<Option<RoiKey>> {
        let records = view.pick(x, y)?;
        if records.is_empty() {
            return Ok(None);
        }

        let mut by_group: FxHashMap<GroupId, RoiKey> = FxHashMap::default();
        for (key, roi) in self.arena.iter() {
            by_group.insert(roi.geometry().group_id(), key);
        }

        for record in &records {
            for group_id in &record.group_chain {
                if let Some(&key) = by_group.get(group_id) {
                    return Ok(Some(self.top_level_of(key)));
                }
            }
        }
        Ok(None)
    }

    fn top_level_of(&self, key: RoiKey) -> RoiKey {
        let mut current = key;
        while let Some(parent) = self.arena.get(current).and_then(|roi| roi.parent()) {
            current = parent;
        }
        current
    }
}

#[cfg(test)]
#[path = "view_manager_tests.rs"]
mod tests;
