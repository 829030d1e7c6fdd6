/// Renderable LOD backed by a mesh builder.

use std::f64::consts::PI;
use std::sync::Arc;

use bitflags::bitflags;

use crate::renderer::MeshBuilder;

use super::lod_list::LodObject;

bitflags! {
    /// Per-LOD state bits. Four bits are meaningful; the view manager
    /// reads them when deciding whether a level may be attached.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ViewLodFlags: u32 {
        const BIT1 = 0x01;
        const BIT2 = 0x02;
        const BIT3 = 0x04;
        const BIT4 = 0x10;
    }
}

/// One detail level of a view ROI: a mesh builder group plus statistics
/// consumed by projected-size LOD selection.
pub struct ViewLod {
    mesh_builder: Arc<dyn MeshBuilder>,
    flags: ViewLodFlags,
    num_polys: i32,
    num_verts: i32,
    avg_poly_area: f64,
    importance: f32,
}

impl ViewLod {
    /// Build a level from explicit mesh statistics.
    pub fn new(
        mesh_builder: Arc<dyn MeshBuilder>,
        num_polys: i32,
        num_verts: i32,
        avg_poly_area: f64,
    ) -> Self {
        Self {
            mesh_builder,
            flags: ViewLodFlags::BIT1 | ViewLodFlags::BIT2,
            num_polys,
            num_verts,
            avg_poly_area,
            importance: 1.0,
        }
    }

    /// Build a level estimating area and vertex count from the polygon
    /// count alone (`2*pi*10 / num_polys`, two vertices per polygon).
    pub fn with_estimated_stats(mesh_builder: Arc<dyn MeshBuilder>, num_polys: i32) -> Self {
        let polys = num_polys.max(1);
        Self::new(
            mesh_builder,
            num_polys,
            num_polys * 2,
            2.0 * PI * 10.0 / polys as f64,
        )
    }

    pub fn mesh_builder(&self) -> &Arc<dyn MeshBuilder> {
        &self.mesh_builder
    }

    pub fn flags(&self) -> ViewLodFlags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: ViewLodFlags) {
        self.flags |= flags;
    }

    pub fn clear_flags(&mut self, flags: ViewLodFlags) {
        self.flags &= !flags;
    }

    pub fn set_importance(&mut self, importance: f32) {
        self.importance = importance;
    }
}

impl LodObject for ViewLod {
    fn avg_poly_area(&self) -> f64 {
        self.avg_poly_area
    }

    fn num_verts(&self) -> i32 {
        self.num_verts
    }

    fn num_polys(&self) -> i32 {
        self.num_polys
    }

    fn importance(&self) -> f32 {
        self.importance
    }
}

#[cfg(test)]
#[path = "view_lod_tests.rs"]
mod tests;
