/// Renderer trait family - the retained-mode backend contract.
///
/// Every operation returns `Result`; nothing here panics. When a resource
/// cannot be acquired the backend returns `ResourceAllocation` (or
/// `DeviceLost`) and the caller unwinds, releasing anything it built so
/// far. Scene graph mutation happens only on the host thread.

use std::sync::Arc;

use glam::Vec3;

use crate::error::Result;
use crate::texture::PaletteEntry;

use super::types::{
    ColorModel, GroupId, LightType, MaterialMode, MatrixRows, MeshData, PickRecord,
    ProjectionType, ShadingModel, TextureMappingMode,
};

// ============================================================================
// Renderer factory
// ============================================================================

/// Main renderer trait
///
/// The central factory for scene resources. Implemented by backends; the
/// engine only ever holds `dyn Renderer`.
pub trait Renderer: Send + Sync {
    /// Create a rendering device bound to an output surface of the given size
    fn create_device(&self, width: u32, height: u32) -> Result<Arc<dyn Device>>;

    /// Create a view over a device, covering the given viewport rectangle
    fn create_view(
        &self,
        device: &Arc<dyn Device>,
        camera: &Arc<dyn Camera>,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> Result<Arc<dyn View>>;

    /// Create a camera
    fn create_camera(&self) -> Result<Arc<dyn Camera>>;

    /// Create a light of the given type and color
    fn create_light(&self, kind: LightType, red: f32, green: f32, blue: f32)
        -> Result<Arc<dyn Light>>;

    /// Create a scene graph group, optionally parented
    fn create_group(&self, parent: Option<&Arc<dyn Group>>) -> Result<Arc<dyn Group>>;

    /// Create a mesh builder
    fn create_mesh_builder(&self) -> Result<Arc<dyn MeshBuilder>>;

    /// Create an empty texture
    fn create_texture(&self) -> Result<Arc<dyn Texture>>;

    /// Create a texture initialised with texels and an optional palette
    fn create_texture_with_texels(
        &self,
        width: u32,
        height: u32,
        bits_per_texel: u32,
        texels: &[u8],
        palette: Option<&[PaletteEntry]>,
    ) -> Result<Arc<dyn Texture>>;

    /// Set the default shade count applied to newly created textures
    fn set_texture_default_shade_count(&self, count: u32) -> Result<()>;

    /// Set the default color count applied to newly created textures
    fn set_texture_default_color_count(&self, count: u32) -> Result<()>;
}

// ============================================================================
// Device
// ============================================================================

/// A rendering device/context.
pub trait Device: Send + Sync {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    fn set_color_model(&self, model: ColorModel) -> Result<()>;
    fn set_shading_model(&self, model: ShadingModel) -> Result<()>;
    fn set_shade_count(&self, count: u32) -> Result<()>;
    fn set_dither(&self, dither: bool) -> Result<()>;

    /// Flip/update the device output. May report `DeviceLost`.
    fn update(&self) -> Result<()>;

    /// Host activation notification; lost devices are recreated here.
    fn handle_activate(&self, active: bool) -> Result<()>;

    /// Host repaint notification.
    fn handle_paint(&self) -> Result<()>;
}

// ============================================================================
// View
// ============================================================================

/// A camera viewport with rendering state.
pub trait View: Send + Sync {
    fn add_light(&self, light: &Arc<dyn Light>) -> Result<()>;
    fn remove_light(&self, light: &Arc<dyn Light>) -> Result<()>;

    fn set_camera(&self, camera: &Arc<dyn Camera>) -> Result<()>;
    fn set_projection(&self, projection: ProjectionType) -> Result<()>;

    /// Set the viewing frustum: near plane, far plane, field of view in degrees
    fn set_frustum(&self, front: f32, back: f32, fov_degrees: f32) -> Result<()>;

    fn set_background_color(&self, red: f32, green: f32, blue: f32) -> Result<()>;
    fn background_color(&self) -> Result<(f32, f32, f32)>;

    /// Clear the viewport to the background color
    fn clear(&self) -> Result<()>;

    /// Render one frame of the scene rooted at `root`
    fn render(&self, root: &Arc<dyn Group>) -> Result<()>;

    /// Force a region of the output to refresh
    fn force_update(&self, x: u32, y: u32, width: u32, height: u32) -> Result<()>;

    /// Project a world-space point to screen space (x, y, z, w)
    fn transform_world_to_screen(&self, world: Vec3) -> Result<[f32; 4]>;

    /// Unproject a screen-space point (x, y, z, w) back to world space
    fn transform_screen_to_world(&self, screen: [f32; 4]) -> Result<Vec3>;

    /// Pick the groups under viewport coordinates `(x, y)`.
    ///
    /// Hits are ordered front to back. Each record's chain starts at a
    /// top-level group; the scene root is never returned.
    fn pick(&self, x: u32, y: u32) -> Result<Vec<PickRecord>>;
}

// ============================================================================
// Camera and lights
// ============================================================================

/// A viewpoint in the 3D world.
pub trait Camera: Send + Sync {
    fn set_transformation(&self, matrix: &MatrixRows) -> Result<()>;
}

/// A scene light.
pub trait Light: Send + Sync {
    fn set_transformation(&self, matrix: &MatrixRows) -> Result<()>;
    fn set_color(&self, red: f32, green: f32, blue: f32) -> Result<()>;
}

// ============================================================================
// Scene graph group
// ============================================================================

/// Hierarchical scene graph node.
///
/// Groups carry a transform and hold child groups and mesh builders.
/// Identity (`group_id`) is stable for the lifetime of the group and is
/// what pick results refer to.
pub trait Group: Send + Sync {
    /// Stable identity of this group within its renderer
    fn group_id(&self) -> GroupId;

    fn set_transformation(&self, matrix: &MatrixRows) -> Result<()>;
    fn set_color(&self, red: f32, green: f32, blue: f32, alpha: f32) -> Result<()>;

    /// Set or, with `None`, unset the group texture
    fn set_texture(&self, texture: Option<&Arc<dyn Texture>>) -> Result<()>;
    fn set_material_mode(&self, mode: MaterialMode) -> Result<()>;

    fn add_group(&self, child: &Arc<dyn Group>) -> Result<()>;
    fn remove_group(&self, child: &Arc<dyn Group>) -> Result<()>;
    fn add_mesh_builder(&self, builder: &Arc<dyn MeshBuilder>) -> Result<()>;
    fn remove_mesh_builder(&self, builder: &Arc<dyn MeshBuilder>) -> Result<()>;

    /// Detach every child group and mesh builder
    fn remove_all(&self) -> Result<()>;

    /// Bounding box of the group's content, `(min, max)`
    fn bounds(&self) -> Result<(Vec3, Vec3)>;
}

// ============================================================================
// Mesh construction
// ============================================================================

/// Builder for mesh data; the unit of geometry attached to groups.
pub trait MeshBuilder: Send + Sync {
    /// Stable identity of this builder within its renderer
    fn builder_id(&self) -> u64;

    /// Create a sub-mesh from parallel vertex/face arrays
    fn create_mesh(&self, data: &MeshData<'_>) -> Result<Arc<dyn Mesh>>;

    /// Bounding box of all meshes created so far, `(min, max)`
    fn bounding_box(&self) -> Result<(Vec3, Vec3)>;

    /// Clone the builder together with its meshes
    fn clone_builder(&self) -> Result<Arc<dyn MeshBuilder>>;
}

/// One drawable sub-mesh.
pub trait Mesh: Send + Sync {
    fn set_color(&self, red: f32, green: f32, blue: f32, alpha: f32) -> Result<()>;

    /// Set or, with `None`, unset the mesh texture
    fn set_texture(&self, texture: Option<&Arc<dyn Texture>>) -> Result<()>;
    fn texture(&self) -> Option<Arc<dyn Texture>>;

    fn set_texture_mapping_mode(&self, mode: TextureMappingMode) -> Result<()>;
    fn set_shading_model(&self, model: ShadingModel) -> Result<()>;

    /// Full copy: new mesh data owned by `builder`
    fn deep_clone(&self, builder: &Arc<dyn MeshBuilder>) -> Result<Arc<dyn Mesh>>;

    /// Aliasing copy: shares mesh data with the original
    fn shallow_clone(&self, builder: &Arc<dyn MeshBuilder>) -> Result<Arc<dyn Mesh>>;
}

// ============================================================================
// Texture
// ============================================================================

/// A texture resource.
pub trait Texture: Send + Sync {
    fn set_texels(&self, width: u32, height: u32, bits_per_texel: u32, texels: &[u8])
        -> Result<()>;

    fn set_palette(&self, entries: &[PaletteEntry]) -> Result<()>;

    /// Notify the backend that texels and/or the palette changed in place
    fn changed(&self, texels_changed: bool, palette_changed: bool) -> Result<()>;
}
