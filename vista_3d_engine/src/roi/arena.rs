/// Arena owning every ROI and maintaining the graph invariants.
///
/// All transform mutations go through the arena so the world bounding
/// volumes and the renderer-side group transform stay consistent with
/// `local_to_world` after every successful call.

use glam::Mat4;
use slotmap::SlotMap;

use crate::engine_err;
use crate::error::Result;
use crate::math::checked_invert;

use super::roi::{Roi, RoiKey};

pub struct RoiArena {
    rois: SlotMap<RoiKey, Roi>,
}

impl RoiArena {
    pub fn new() -> Self {
        Self { rois: SlotMap::with_key() }
    }

    pub fn insert(&mut self, roi: Roi) -> RoiKey {
        self.rois.insert(roi)
    }

    pub fn get(&self, key: RoiKey) -> Option<&Roi> {
        self.rois.get(key)
    }

    pub fn get_mut(&mut self, key: RoiKey) -> Option<&mut Roi> {
        self.rois.get_mut(key)
    }

    pub fn contains(&self, key: RoiKey) -> bool {
        self.rois.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.rois.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rois.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RoiKey, &Roi)> {
        self.rois.iter()
    }

    /// First ROI with the given name, if any. Names are case-sensitive.
    pub fn find_by_name(&self, name: &str) -> Option<RoiKey> {
        self.rois.iter().find(|(_, roi)| roi.name() == name).map(|(key, _)| key)
    }

    /// Link `child` under `parent` as part of its compound object.
    pub fn attach_child(&mut self, parent: RoiKey, child: RoiKey) -> Result<()> {
        if !self.rois.contains_key(child) {
            return Err(engine_err!(NotFound, "vista3d::RoiArena", "attach of dead child key"));
        }
        let parent_l2w = match self.rois.get_mut(parent) {
            Some(roi) => {
                if !roi.children.contains(&child) {
                    roi.children.push(child);
                }
                roi.local_to_world
            }
            None => {
                return Err(engine_err!(NotFound, "vista3d::RoiArena", "attach to dead parent key"))
            }
        };

        let child_roi = self.roi_mut(child)?;
        child_roi.parent = Some(parent);
        // Derive the stored relative transform against the new parent
        child_roi.local_relative = checked_invert(&parent_l2w)? * child_roi.local_to_world;
        Ok(())
    }

    /// Reparent an ROI; `None` makes it a root. The world transform is
    /// re-derived by the next `update_world_data` pass.
    pub fn set_parent(&mut self, key: RoiKey, parent: Option<RoiKey>) -> Result<()> {
        if let Some(old_parent) = self.roi(key)?.parent {
            if let Some(roi) = self.rois.get_mut(old_parent) {
                roi.children.retain(|&existing| existing != key);
            }
        }
        match parent {
            Some(parent) => self.attach_child(parent, key),
            None => {
                let roi = self.roi_mut(key)?;
                roi.parent = None;
                roi.local_relative = roi.local_to_world;
                Ok(())
            }
        }
    }

    /// Replace the local-to-world transform.
    ///
    /// Recomputes the world bounding volumes and mirrors the transform
    /// into the renderer group.
    pub fn set_local_transform(&mut self, key: RoiKey, transform: &Mat4) -> Result<()> {
        let parent_l2w = match self.roi(key)?.parent {
            Some(parent) => Some(self.roi(parent)?.local_to_world),
            None => None,
        };

        let roi = self.roi_mut(key)?;
        roi.local_to_world = *transform;
        roi.local_relative = match parent_l2w {
            Some(parent_l2w) => checked_invert(&parent_l2w)? * *transform,
            None => *transform,
        };
        roi.update_world_bounding_volumes();
        roi.mirror_transform_to_geometry()
    }

    /// Post-multiply the current transform by `transform`.
    pub fn post_mul_transform(&mut self, key: RoiKey, transform: &Mat4) -> Result<()> {
        let combined = self.roi(key)?.local_to_world * *transform;
        self.set_local_transform(key, &combined)
    }

    /// Re-derive world data from a parent transform and recurse into the
    /// compound children with the updated matrix.
    pub fn update_world_data(&mut self, key: RoiKey, parent_to_world: &Mat4) -> Result<()> {
        let world = {
            let roi = self.roi_mut(key)?;
            roi.local_to_world = *parent_to_world * roi.local_relative;
            roi.update_world_bounding_volumes();
            roi.mirror_transform_to_geometry()?;
            roi.local_to_world
        };

        let children = self.roi(key)?.children.clone();
        for child in children {
            self.update_world_data(child, &world)?;
        }
        Ok(())
    }

    /// Transform of `key` relative to its parent; `local_to_world` itself
    /// for roots.
    pub fn get_local_transform(&self, key: RoiKey) -> Result<Mat4> {
        let roi = self.roi(key)?;
        match roi.parent {
            Some(parent) => {
                let parent_l2w = self.roi(parent)?.local_to_world;
                Ok(checked_invert(&parent_l2w)? * roi.local_to_world)
            }
            None => Ok(roi.local_to_world),
        }
    }

    /// Compound visibility: an ROI counts as visible when it or any of
    /// its children is visible.
    pub fn is_visible_with_children(&self, key: RoiKey) -> bool {
        let Some(roi) = self.rois.get(key) else {
            return false;
        };
        if roi.visibility() {
            return true;
        }
        roi.children.iter().any(|&child| self.is_visible_with_children(child))
    }

    /// Remove an ROI and its compound children, returning the removed
    /// objects so the caller can release LOD handles and detach geometry.
    pub fn remove_recursive(&mut self, key: RoiKey) -> Vec<Roi> {
        let Some(roi) = self.rois.remove(key) else {
            return Vec::new();
        };

        if let Some(parent) = roi.parent {
            if let Some(parent_roi) = self.rois.get_mut(parent) {
                parent_roi.children.retain(|&existing| existing != key);
            }
        }

        let mut removed = Vec::new();
        for child in roi.children.clone() {
            removed.extend(self.remove_recursive(child));
        }
        removed.push(roi);
        removed
    }

    fn roi(&self, key: RoiKey) -> Result<&Roi> {
        self.rois
            .get(key)
            .ok_or_else(|| engine_err!(NotFound, "vista3d::RoiArena", "dead ROI key"))
    }

    fn roi_mut(&mut self, key: RoiKey) -> Result<&mut Roi> {
        self.rois
            .get_mut(key)
            .ok_or_else(|| engine_err!(NotFound, "vista3d::RoiArena", "dead ROI key"))
    }
}

impl Default for RoiArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "arena_tests.rs"]
mod tests;
