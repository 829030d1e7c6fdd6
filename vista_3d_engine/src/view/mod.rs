//! View management: frustum culling, projected-size LOD selection,
//! scene-graph synchronisation and screen picking.

mod frustum;
mod realtime_view;
mod view_manager;

pub use frustum::Frustum;
pub use realtime_view::LodSettings;
pub use view_manager::{ViewFlags, ViewManager, LOD_AUTO, LOD_HIDE};
