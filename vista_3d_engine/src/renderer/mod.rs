//! Retained-mode renderer contract.
//!
//! The engine never talks to a concrete backend directly; everything goes
//! through the trait surface in this module. Backends implement the traits
//! and hand out `Arc<dyn _>` resources. [`MockRenderer`](mock_renderer)
//! implements the whole contract without a GPU and backs the engine's own
//! tests as well as headless hosts.

mod mock_renderer;
mod renderer;
mod types;

pub use mock_renderer::{MockGroup, MockMeshBuilder, MockRenderer, MockView};
pub use renderer::{
    Camera, Device, Group, Light, Mesh, MeshBuilder, Renderer, Texture, View,
};
pub use types::{
    ColorModel, ErrorCallback, ErrorCallbacks, GroupId, LightType, MaterialMode, MatrixRows,
    MeshData, PickRecord, ProjectionType, RendererConfig, ShadingModel, TextureMappingMode,
};
