/*!
# Vista 3D Engine

Core of the Vista3D real-time scene engine.

This crate maintains a hierarchy of oriented world objects (ROIs), selects
per-object geometric detail levels from a pool of shared LOD meshes, culls
them against a camera frustum, and issues draw calls through an abstract
retained-mode renderer.

## Architecture

- **math**: bounding volumes and the checked matrix/quaternion operations
  the scene core needs on top of `glam`
- **lod**: LOD object traits, ordered LOD lists, and the named
  reference-counted LOD list cache
- **roi**: the arena-based graph of orientable world objects
- **renderer**: the retained-mode backend contract (traits only) plus a
  mock backend for tests and headless hosts
- **view**: frustum culling, projected-size LOD selection, and the
  per-frame visibility/detail pass
- **texture**: palette image and named texture descriptors

The streaming media pipeline that drives ROIs lives in the companion
`vista_3d_engine_media` crate.
*/

// Error handling module
pub mod error;

// Internal logging system
pub mod log;

// Math and bounding volumes
pub mod math;

// LOD data and the shared LOD list cache
pub mod lod;

// ROI graph
pub mod roi;

// Retained-mode renderer contract
pub mod renderer;

// View manager: culling, LOD selection, picking
pub mod view;

// Palette image and named texture descriptors
pub mod texture;

// Re-export error types at crate root
pub use error::{Error, Result};

// Re-export math library
pub use glam;
