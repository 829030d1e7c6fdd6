//! ROI graph: orientable, placeable world objects.
//!
//! An ROI ("real-time object instance") carries a local-to-world
//! transform, world bounding volumes, a shared LOD list handle and a
//! renderer scene-graph group. Compound objects (a vehicle and its
//! wheels) are modelled as parent/child links between ROIs.
//!
//! Ownership follows the arena pattern: [`RoiArena`] owns every ROI,
//! children are strong links (arena keys listed on the parent), the
//! parent link is weak (just a key). World-update recursion is top-down,
//! so children never reach back into parents.

mod arena;
#[allow(clippy::module_inception)]
mod roi;

pub use arena::RoiArena;
pub use roi::{Roi, RoiKey, RoiUpdateFlags};
