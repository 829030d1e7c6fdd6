/// Common types shared across the renderer contract.

use std::sync::Arc;

use crate::error::Error;

/// Color model of a rendering device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorModel {
    Ramp,
    Rgb,
}

/// Shading model for meshes and devices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadingModel {
    Wireframe,
    UnlitFlat,
    Flat,
    Gouraud,
    Phong,
}

/// Light source categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightType {
    Ambient,
    Point,
    Spot,
    Directional,
    ParallelPoint,
}

/// Projection mode of a view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionType {
    Perspective,
    Orthographic,
}

/// Texture coordinate interpolation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureMappingMode {
    Linear,
    PerspectiveCorrect,
}

/// Where a group takes its material properties from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialMode {
    FromParent,
    FromFrame,
    FromMesh,
}

/// Matrices cross the renderer boundary as plain 4x4 float rows.
pub type MatrixRows = [[f32; 4]; 4];

/// Identity of a scene graph group, unique per renderer instance.
pub type GroupId = u64;

/// One pick hit: the chain of groups under the pick ray.
///
/// `group_chain[0]` is the top-level group, later entries are nested
/// children. The scene root itself is never part of a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickRecord {
    pub group_chain: Vec<GroupId>,
}

/// Parallel-array mesh description consumed by `MeshBuilder::create_mesh`.
///
/// `face_indices` and `texture_face_indices` index into `positions` /
/// `normals` and `uvs` respectively, three entries per face.
#[derive(Debug, Clone, Copy)]
pub struct MeshData<'a> {
    pub positions: &'a [[f32; 3]],
    pub normals: &'a [[f32; 3]],
    pub uvs: &'a [[f32; 2]],
    pub face_indices: &'a [[u32; 3]],
    pub texture_face_indices: &'a [[u32; 3]],
    pub shading_model: ShadingModel,
}

impl<'a> MeshData<'a> {
    pub fn face_count(&self) -> usize {
        self.face_indices.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}

/// Error callback signature for the installable handler pair.
pub type ErrorCallback = Arc<dyn Fn(&Error) + Send + Sync>;

/// Installable non-fatal / fatal error handler pair.
///
/// Non-fatal failures (lost resources, recoverable allocation misses) go
/// through `non_fatal`; unrecoverable ones (device creation failure) go
/// through `fatal`, whose caller is expected to tear the renderer down.
#[derive(Clone)]
pub struct ErrorCallbacks {
    pub non_fatal: ErrorCallback,
    pub fatal: ErrorCallback,
}

impl Default for ErrorCallbacks {
    fn default() -> Self {
        Self {
            non_fatal: Arc::new(|error: &Error| {
                crate::engine_warn!("vista3d::Renderer", "non-fatal renderer error: {}", error);
            }),
            fatal: Arc::new(|error: &Error| {
                crate::engine_error!("vista3d::Renderer", "fatal renderer error: {}", error);
            }),
        }
    }
}

impl std::fmt::Debug for ErrorCallbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorCallbacks").finish_non_exhaustive()
    }
}

/// Renderer configuration
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Default shade count for newly created textures
    pub texture_default_shade_count: u32,
    /// Default color count for newly created textures
    pub texture_default_color_count: u32,
    /// Error handler pair invoked on renderer failures
    pub error_callbacks: ErrorCallbacks,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            texture_default_shade_count: 32,
            texture_default_color_count: 64,
            error_callbacks: ErrorCallbacks::default(),
        }
    }
}
