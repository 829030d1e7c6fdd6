use std::sync::Arc;

use super::*;
use crate::renderer::{
    Group, Mesh, MeshBuilder, MeshData, PickRecord, Renderer, ShadingModel, View,
};

fn triangle_data() -> MeshData<'static> {
    static POSITIONS: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
    static NORMALS: [[f32; 3]; 3] = [[0.0, 0.0, 1.0]; 3];
    static UVS: [[f32; 2]; 3] = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
    static FACES: [[u32; 3]; 1] = [[0, 1, 2]];
    MeshData {
        positions: &POSITIONS,
        normals: &NORMALS,
        uvs: &UVS,
        face_indices: &FACES,
        texture_face_indices: &FACES,
        shading_model: ShadingModel::Gouraud,
    }
}

// ============================================================================
// Factory behaviour
// ============================================================================

#[test]
fn test_group_ids_are_unique() {
    let renderer = MockRenderer::new();
    let a = renderer.create_group(None).unwrap();
    let b = renderer.create_group(None).unwrap();
    assert_ne!(a.group_id(), b.group_id());
    assert_eq!(renderer.created_group_ids(), vec![a.group_id(), b.group_id()]);
}

#[test]
fn test_create_group_with_parent_attaches() {
    let renderer = MockRenderer::new();
    let parent_concrete = Arc::new(MockGroup::new());
    let parent: Arc<dyn crate::renderer::Group> = parent_concrete.clone();
    let child = renderer.create_group(Some(&parent)).unwrap();
    assert_eq!(parent_concrete.child_group_ids(), vec![child.group_id()]);
}

#[test]
fn test_device_rejects_empty_surface() {
    let renderer = MockRenderer::new();
    assert!(renderer.create_device(0, 480).is_err());
    assert!(renderer.create_device(640, 480).is_ok());
}

#[test]
fn test_texture_defaults_follow_setters() {
    let renderer = MockRenderer::new();
    renderer.set_texture_default_shade_count(16).unwrap();
    renderer.set_texture_default_color_count(128).unwrap();
    assert_eq!(renderer.texture_defaults(), (16, 128));
    assert_eq!(renderer.created_texture_count(), 0);
}

// ============================================================================
// Group state
// ============================================================================

#[test]
fn test_group_add_remove_mesh_builder() {
    let renderer = MockRenderer::new();
    let group = Arc::new(MockGroup::new());
    let builder = renderer.create_mesh_builder().unwrap();

    group.add_mesh_builder(&builder).unwrap();
    assert_eq!(group.mesh_builder_ids(), vec![builder.builder_id()]);

    // Adding twice is a no-op
    group.add_mesh_builder(&builder).unwrap();
    assert_eq!(group.mesh_builder_ids().len(), 1);

    group.remove_mesh_builder(&builder).unwrap();
    assert!(group.mesh_builder_ids().is_empty());
}

#[test]
fn test_group_transform_recorded() {
    let group = MockGroup::new();
    let rows = [
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [3.0, 4.0, 5.0, 1.0],
    ];
    group.set_transformation(&rows).unwrap();
    assert_eq!(group.transformation(), rows);
}

// ============================================================================
// Mesh construction
// ============================================================================

#[test]
fn test_create_mesh_and_bounds() {
    let builder = MockMeshBuilder::new();
    let mesh = builder.create_mesh(&triangle_data()).unwrap();
    assert_eq!(builder.mesh_count(), 1);

    let (min, max) = builder.bounding_box().unwrap();
    assert_eq!(min, glam::Vec3::ZERO);
    assert_eq!(max, glam::Vec3::new(1.0, 1.0, 0.0));

    // set/unset texture round trip
    let texture: Arc<dyn crate::renderer::Texture> = Arc::new(MockTexture::new());
    mesh.set_texture(Some(&texture)).unwrap();
    assert!(mesh.texture().is_some());
    mesh.set_texture(None).unwrap();
    assert!(mesh.texture().is_none());
}

#[test]
fn test_create_mesh_rejects_mismatched_arrays() {
    let builder = MockMeshBuilder::new();
    let mut data = triangle_data();
    static SHORT_NORMALS: [[f32; 3]; 1] = [[0.0, 0.0, 1.0]];
    data.normals = &SHORT_NORMALS;
    assert!(builder.create_mesh(&data).is_err());
}

#[test]
fn test_shallow_clone_aliases_deep_clone_copies() {
    let builder = MockMeshBuilder::new();
    let dyn_builder: Arc<dyn crate::renderer::MeshBuilder> = Arc::new(MockMeshBuilder::new());
    let mesh = builder.create_mesh(&triangle_data()).unwrap();

    let shallow = mesh.shallow_clone(&dyn_builder).unwrap();
    let deep = mesh.deep_clone(&dyn_builder).unwrap();

    let texture: Arc<dyn crate::renderer::Texture> = Arc::new(MockTexture::new());
    mesh.set_texture(Some(&texture)).unwrap();

    assert!(shallow.texture().is_some(), "shallow clone aliases the original");
    assert!(deep.texture().is_none(), "deep clone is independent");
}

// ============================================================================
// View picking
// ============================================================================

#[test]
fn test_view_replays_scripted_picks() {
    let view = MockView::new();
    let record = PickRecord { group_chain: vec![7, 8] };
    view.set_pick_result(10, 20, vec![record.clone()]);

    assert_eq!(view.pick(10, 20).unwrap(), vec![record]);
    assert!(view.pick(0, 0).unwrap().is_empty());
}

#[test]
fn test_view_rejects_bad_frustum() {
    let view = MockView::new();
    assert!(view.set_frustum(0.0, 100.0, 60.0).is_err());
    assert!(view.set_frustum(1.0, 0.5, 60.0).is_err());
    assert!(view.set_frustum(1.0, 100.0, 60.0).is_ok());
}
