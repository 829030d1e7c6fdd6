/// Mock renderer (no GPU required).
///
/// Implements the whole renderer contract with plain data structures so
/// the view manager, the LOD pipeline and the media presenters can be
/// exercised headless. Groups record their children and transforms,
/// views replay scripted pick results, and every factory call is logged
/// on the renderer for assertions.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use glam::Vec3;

use crate::engine_err;
use crate::error::Result;
use crate::texture::PaletteEntry;

use super::renderer::{
    Camera, Device, Group, Light, Mesh, MeshBuilder, Renderer, Texture, View,
};
use super::types::{
    ColorModel, GroupId, LightType, MaterialMode, MatrixRows, MeshData, PickRecord,
    ProjectionType, RendererConfig, ShadingModel, TextureMappingMode,
};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

const IDENTITY: MatrixRows = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

// ============================================================================
// Mock texture
// ============================================================================

#[derive(Default)]
struct TextureState {
    width: u32,
    height: u32,
    bits_per_texel: u32,
    texels: Vec<u8>,
    palette: Vec<PaletteEntry>,
    change_notifications: u32,
}

pub struct MockTexture {
    state: Mutex<TextureState>,
}

impl MockTexture {
    pub fn new() -> Self {
        Self { state: Mutex::new(TextureState::default()) }
    }

    pub fn change_notifications(&self) -> u32 {
        self.state.lock().unwrap().change_notifications
    }
}

impl Texture for MockTexture {
    fn set_texels(
        &self,
        width: u32,
        height: u32,
        bits_per_texel: u32,
        texels: &[u8],
    ) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.width = width;
        state.height = height;
        state.bits_per_texel = bits_per_texel;
        state.texels = texels.to_vec();
        Ok(())
    }

    fn set_palette(&self, entries: &[PaletteEntry]) -> Result<()> {
        self.state.lock().unwrap().palette = entries.to_vec();
        Ok(())
    }

    fn changed(&self, _texels_changed: bool, _palette_changed: bool) -> Result<()> {
        self.state.lock().unwrap().change_notifications += 1;
        Ok(())
    }
}

// ============================================================================
// Mock mesh and mesh builder
// ============================================================================

struct MeshState {
    color: (f32, f32, f32, f32),
    texture: Option<Arc<dyn Texture>>,
    mapping_mode: TextureMappingMode,
    shading_model: ShadingModel,
}

/// Shallow clones alias the same state; deep clones copy it.
pub struct MockMesh {
    state: Arc<Mutex<MeshState>>,
}

impl Mesh for MockMesh {
    fn set_color(&self, red: f32, green: f32, blue: f32, alpha: f32) -> Result<()> {
        self.state.lock().unwrap().color = (red, green, blue, alpha);
        Ok(())
    }

    fn set_texture(&self, texture: Option<&Arc<dyn Texture>>) -> Result<()> {
        self.state.lock().unwrap().texture = texture.cloned();
        Ok(())
    }

    fn texture(&self) -> Option<Arc<dyn Texture>> {
        self.state.lock().unwrap().texture.clone()
    }

    fn set_texture_mapping_mode(&self, mode: TextureMappingMode) -> Result<()> {
        self.state.lock().unwrap().mapping_mode = mode;
        Ok(())
    }

    fn set_shading_model(&self, model: ShadingModel) -> Result<()> {
        self.state.lock().unwrap().shading_model = model;
        Ok(())
    }

    fn deep_clone(&self, _builder: &Arc<dyn MeshBuilder>) -> Result<Arc<dyn Mesh>> {
        let state = self.state.lock().unwrap();
        Ok(Arc::new(MockMesh {
            state: Arc::new(Mutex::new(MeshState {
                color: state.color,
                texture: state.texture.clone(),
                mapping_mode: state.mapping_mode,
                shading_model: state.shading_model,
            })),
        }))
    }

    fn shallow_clone(&self, _builder: &Arc<dyn MeshBuilder>) -> Result<Arc<dyn Mesh>> {
        Ok(Arc::new(MockMesh { state: Arc::clone(&self.state) }))
    }
}

struct BuilderState {
    /// (face_count, vertex_count) per created sub-mesh
    meshes: Vec<(usize, usize)>,
    bounds_min: Vec3,
    bounds_max: Vec3,
    has_bounds: bool,
}

pub struct MockMeshBuilder {
    id: u64,
    state: Mutex<BuilderState>,
}

impl MockMeshBuilder {
    pub fn new() -> Self {
        Self {
            id: next_id(),
            state: Mutex::new(BuilderState {
                meshes: Vec::new(),
                bounds_min: Vec3::ZERO,
                bounds_max: Vec3::ZERO,
                has_bounds: false,
            }),
        }
    }

    /// Number of sub-meshes created through this builder.
    pub fn mesh_count(&self) -> usize {
        self.state.lock().unwrap().meshes.len()
    }
}

impl MeshBuilder for MockMeshBuilder {
    fn builder_id(&self) -> u64 {
        self.id
    }

    fn create_mesh(&self, data: &MeshData<'_>) -> Result<Arc<dyn Mesh>> {
        if data.positions.len() != data.normals.len() {
            return Err(engine_err!(InvalidParameters, "vista3d::MockRenderer",
                "positions/normals length mismatch: {} vs {}",
                data.positions.len(), data.normals.len()));
        }
        if data.face_indices.len() != data.texture_face_indices.len()
            && !data.texture_face_indices.is_empty()
        {
            return Err(engine_err!(InvalidParameters, "vista3d::MockRenderer",
                "face/texture-face length mismatch: {} vs {}",
                data.face_indices.len(), data.texture_face_indices.len()));
        }

        let mut state = self.state.lock().unwrap();
        state.meshes.push((data.face_count(), data.vertex_count()));
        for p in data.positions {
            let point = Vec3::from_array(*p);
            if state.has_bounds {
                state.bounds_min = state.bounds_min.min(point);
                state.bounds_max = state.bounds_max.max(point);
            } else {
                state.bounds_min = point;
                state.bounds_max = point;
                state.has_bounds = true;
            }
        }

        Ok(Arc::new(MockMesh {
            state: Arc::new(Mutex::new(MeshState {
                color: (1.0, 1.0, 1.0, 1.0),
                texture: None,
                mapping_mode: TextureMappingMode::Linear,
                shading_model: data.shading_model,
            })),
        }))
    }

    fn bounding_box(&self) -> Result<(Vec3, Vec3)> {
        let state = self.state.lock().unwrap();
        Ok((state.bounds_min, state.bounds_max))
    }

    fn clone_builder(&self) -> Result<Arc<dyn MeshBuilder>> {
        let state = self.state.lock().unwrap();
        Ok(Arc::new(MockMeshBuilder {
            id: next_id(),
            state: Mutex::new(BuilderState {
                meshes: state.meshes.clone(),
                bounds_min: state.bounds_min,
                bounds_max: state.bounds_max,
                has_bounds: state.has_bounds,
            }),
        }))
    }
}

// ============================================================================
// Mock group
// ============================================================================

struct GroupState {
    transform: MatrixRows,
    color: (f32, f32, f32, f32),
    material_mode: MaterialMode,
    has_texture: bool,
    child_groups: Vec<(GroupId, Arc<dyn Group>)>,
    mesh_builders: Vec<(u64, Arc<dyn MeshBuilder>)>,
}

pub struct MockGroup {
    id: GroupId,
    state: Mutex<GroupState>,
}

impl MockGroup {
    pub fn new() -> Self {
        Self {
            id: next_id(),
            state: Mutex::new(GroupState {
                transform: IDENTITY,
                color: (1.0, 1.0, 1.0, 1.0),
                material_mode: MaterialMode::FromParent,
                has_texture: false,
                child_groups: Vec::new(),
                mesh_builders: Vec::new(),
            }),
        }
    }

    /// Current transform rows, for assertions.
    pub fn transformation(&self) -> MatrixRows {
        self.state.lock().unwrap().transform
    }

    /// Ids of attached child groups, in attach order.
    pub fn child_group_ids(&self) -> Vec<GroupId> {
        self.state.lock().unwrap().child_groups.iter().map(|(id, _)| *id).collect()
    }

    /// Ids of attached mesh builders, in attach order.
    pub fn mesh_builder_ids(&self) -> Vec<u64> {
        self.state.lock().unwrap().mesh_builders.iter().map(|(id, _)| *id).collect()
    }
}

impl Group for MockGroup {
    fn group_id(&self) -> GroupId {
        self.id
    }

    fn set_transformation(&self, matrix: &MatrixRows) -> Result<()> {
        self.state.lock().unwrap().transform = *matrix;
        Ok(())
    }

    fn set_color(&self, red: f32, green: f32, blue: f32, alpha: f32) -> Result<()> {
        self.state.lock().unwrap().color = (red, green, blue, alpha);
        Ok(())
    }

    fn set_texture(&self, texture: Option<&Arc<dyn Texture>>) -> Result<()> {
        self.state.lock().unwrap().has_texture = texture.is_some();
        Ok(())
    }

    fn set_material_mode(&self, mode: MaterialMode) -> Result<()> {
        self.state.lock().unwrap().material_mode = mode;
        Ok(())
    }

    fn add_group(&self, child: &Arc<dyn Group>) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let id = child.group_id();
        if !state.child_groups.iter().any(|(existing, _)| *existing == id) {
            state.child_groups.push((id, Arc::clone(child)));
        }
        Ok(())
    }

    fn remove_group(&self, child: &Arc<dyn Group>) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let id = child.group_id();
        state.child_groups.retain(|(existing, _)| *existing != id);
        Ok(())
    }

    fn add_mesh_builder(&self, builder: &Arc<dyn MeshBuilder>) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let id = builder.builder_id();
        if !state.mesh_builders.iter().any(|(existing, _)| *existing == id) {
            state.mesh_builders.push((id, Arc::clone(builder)));
        }
        Ok(())
    }

    fn remove_mesh_builder(&self, builder: &Arc<dyn MeshBuilder>) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let id = builder.builder_id();
        state.mesh_builders.retain(|(existing, _)| *existing != id);
        Ok(())
    }

    fn remove_all(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.child_groups.clear();
        state.mesh_builders.clear();
        Ok(())
    }

    fn bounds(&self) -> Result<(Vec3, Vec3)> {
        let state = self.state.lock().unwrap();
        let mut min = Vec3::ZERO;
        let mut max = Vec3::ZERO;
        let mut first = true;
        for (_, builder) in &state.mesh_builders {
            let (bmin, bmax) = builder.bounding_box()?;
            if first {
                min = bmin;
                max = bmax;
                first = false;
            } else {
                min = min.min(bmin);
                max = max.max(bmax);
            }
        }
        Ok((min, max))
    }
}

// ============================================================================
// Mock device, camera, light
// ============================================================================

pub struct MockDevice {
    width: u32,
    height: u32,
}

impl Device for MockDevice {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn set_color_model(&self, _model: ColorModel) -> Result<()> {
        Ok(())
    }

    fn set_shading_model(&self, _model: ShadingModel) -> Result<()> {
        Ok(())
    }

    fn set_shade_count(&self, _count: u32) -> Result<()> {
        Ok(())
    }

    fn set_dither(&self, _dither: bool) -> Result<()> {
        Ok(())
    }

    fn update(&self) -> Result<()> {
        Ok(())
    }

    fn handle_activate(&self, _active: bool) -> Result<()> {
        Ok(())
    }

    fn handle_paint(&self) -> Result<()> {
        Ok(())
    }
}

pub struct MockCamera {
    transform: Mutex<MatrixRows>,
}

impl Camera for MockCamera {
    fn set_transformation(&self, matrix: &MatrixRows) -> Result<()> {
        *self.transform.lock().unwrap() = *matrix;
        Ok(())
    }
}

pub struct MockLight {
    transform: Mutex<MatrixRows>,
    color: Mutex<(f32, f32, f32)>,
}

impl Light for MockLight {
    fn set_transformation(&self, matrix: &MatrixRows) -> Result<()> {
        *self.transform.lock().unwrap() = *matrix;
        Ok(())
    }

    fn set_color(&self, red: f32, green: f32, blue: f32) -> Result<()> {
        *self.color.lock().unwrap() = (red, green, blue);
        Ok(())
    }
}

// ============================================================================
// Mock view
// ============================================================================

#[derive(Default)]
struct ViewState {
    frustum: Option<(f32, f32, f32)>,
    projection: Option<ProjectionType>,
    background: (f32, f32, f32),
    render_calls: u32,
    scripted_picks: HashMap<(u32, u32), Vec<PickRecord>>,
}

/// Mock view with scripted pick results.
pub struct MockView {
    state: Mutex<ViewState>,
}

impl MockView {
    pub fn new() -> Self {
        Self { state: Mutex::new(ViewState::default()) }
    }

    /// Script the records returned by `pick(x, y)`.
    pub fn set_pick_result(&self, x: u32, y: u32, records: Vec<PickRecord>) {
        self.state.lock().unwrap().scripted_picks.insert((x, y), records);
    }

    pub fn render_calls(&self) -> u32 {
        self.state.lock().unwrap().render_calls
    }
}

impl View for MockView {
    fn add_light(&self, _light: &Arc<dyn Light>) -> Result<()> {
        Ok(())
    }

    fn remove_light(&self, _light: &Arc<dyn Light>) -> Result<()> {
        Ok(())
    }

    fn set_camera(&self, _camera: &Arc<dyn Camera>) -> Result<()> {
        Ok(())
    }

    fn set_projection(&self, projection: ProjectionType) -> Result<()> {
        self.state.lock().unwrap().projection = Some(projection);
        Ok(())
    }

    fn set_frustum(&self, front: f32, back: f32, fov_degrees: f32) -> Result<()> {
        if front <= 0.0 || back <= front {
            return Err(engine_err!(InvalidParameters, "vista3d::MockRenderer",
                "bad frustum: front {} back {}", front, back));
        }
        self.state.lock().unwrap().frustum = Some((front, back, fov_degrees));
        Ok(())
    }

    fn set_background_color(&self, red: f32, green: f32, blue: f32) -> Result<()> {
        self.state.lock().unwrap().background = (red, green, blue);
        Ok(())
    }

    fn background_color(&self) -> Result<(f32, f32, f32)> {
        Ok(self.state.lock().unwrap().background)
    }

    fn clear(&self) -> Result<()> {
        Ok(())
    }

    fn render(&self, _root: &Arc<dyn Group>) -> Result<()> {
        self.state.lock().unwrap().render_calls += 1;
        Ok(())
    }

    fn force_update(&self, _x: u32, _y: u32, _width: u32, _height: u32) -> Result<()> {
        Ok(())
    }

    fn transform_world_to_screen(&self, world: Vec3) -> Result<[f32; 4]> {
        Ok([world.x, world.y, world.z, 1.0])
    }

    fn transform_screen_to_world(&self, screen: [f32; 4]) -> Result<Vec3> {
        Ok(Vec3::new(screen[0], screen[1], screen[2]))
    }

    fn pick(&self, x: u32, y: u32) -> Result<Vec<PickRecord>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .scripted_picks
            .get(&(x, y))
            .cloned()
            .unwrap_or_default())
    }
}

// ============================================================================
// Mock renderer
// ============================================================================

#[derive(Default)]
struct RendererState {
    created_groups: Vec<GroupId>,
    created_builders: Vec<u64>,
    created_textures: u32,
    texture_default_shade_count: u32,
    texture_default_color_count: u32,
}

/// Mock renderer that tracks created resources.
pub struct MockRenderer {
    config: RendererConfig,
    state: Mutex<RendererState>,
}

impl MockRenderer {
    pub fn new() -> Self {
        Self::with_config(RendererConfig::default())
    }

    pub fn with_config(config: RendererConfig) -> Self {
        let state = RendererState {
            texture_default_shade_count: config.texture_default_shade_count,
            texture_default_color_count: config.texture_default_color_count,
            ..RendererState::default()
        };
        Self { config, state: Mutex::new(state) }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Ids of groups created through this renderer, in creation order.
    pub fn created_group_ids(&self) -> Vec<GroupId> {
        self.state.lock().unwrap().created_groups.clone()
    }

    /// Ids of mesh builders created through this renderer.
    pub fn created_builder_ids(&self) -> Vec<u64> {
        self.state.lock().unwrap().created_builders.clone()
    }

    pub fn created_texture_count(&self) -> u32 {
        self.state.lock().unwrap().created_textures
    }

    /// Effective texture defaults: `(shade_count, color_count)`.
    pub fn texture_defaults(&self) -> (u32, u32) {
        let state = self.state.lock().unwrap();
        (state.texture_default_shade_count, state.texture_default_color_count)
    }
}

impl Default for MockRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for MockRenderer {
    fn create_device(&self, width: u32, height: u32) -> Result<Arc<dyn Device>> {
        if width == 0 || height == 0 {
            return Err(engine_err!(ResourceAllocation, "vista3d::MockRenderer",
                "device surface must be non-empty, got {}x{}", width, height));
        }
        Ok(Arc::new(MockDevice { width, height }))
    }

    fn create_view(
        &self,
        _device: &Arc<dyn Device>,
        _camera: &Arc<dyn Camera>,
        _x: u32,
        _y: u32,
        _width: u32,
        _height: u32,
    ) -> Result<Arc<dyn View>> {
        Ok(Arc::new(MockView::new()))
    }

    fn create_camera(&self) -> Result<Arc<dyn Camera>> {
        Ok(Arc::new(MockCamera { transform: Mutex::new(IDENTITY) }))
    }

    fn create_light(
        &self,
        _kind: LightType,
        red: f32,
        green: f32,
        blue: f32,
    ) -> Result<Arc<dyn Light>> {
        Ok(Arc::new(MockLight {
            transform: Mutex::new(IDENTITY),
            color: Mutex::new((red, green, blue)),
        }))
    }

    fn create_group(&self, parent: Option<&Arc<dyn Group>>) -> Result<Arc<dyn Group>> {
        let group: Arc<dyn Group> = Arc::new(MockGroup::new());
        self.state.lock().unwrap().created_groups.push(group.group_id());
        if let Some(parent) = parent {
            parent.add_group(&group)?;
        }
        Ok(group)
    }

    fn create_mesh_builder(&self) -> Result<Arc<dyn MeshBuilder>> {
        let builder = Arc::new(MockMeshBuilder::new());
        self.state.lock().unwrap().created_builders.push(builder.builder_id());
        Ok(builder)
    }

    fn create_texture(&self) -> Result<Arc<dyn Texture>> {
        self.state.lock().unwrap().created_textures += 1;
        Ok(Arc::new(MockTexture::new()))
    }

    fn create_texture_with_texels(
        &self,
        width: u32,
        height: u32,
        bits_per_texel: u32,
        texels: &[u8],
        palette: Option<&[PaletteEntry]>,
    ) -> Result<Arc<dyn Texture>> {
        let texture = self.create_texture()?;
        texture.set_texels(width, height, bits_per_texel, texels)?;
        if let Some(palette) = palette {
            texture.set_palette(palette)?;
        }
        Ok(texture)
    }

    fn set_texture_default_shade_count(&self, count: u32) -> Result<()> {
        self.state.lock().unwrap().texture_default_shade_count = count;
        Ok(())
    }

    fn set_texture_default_color_count(&self, count: u32) -> Result<()> {
        self.state.lock().unwrap().texture_default_color_count = count;
        Ok(())
    }
}

#[cfg(test)]
#[path = "mock_renderer_tests.rs"]
mod tests;
