use super::*;
use crate::renderer::{MockRenderer, Renderer, ShadingModel, TextureMappingMode};

// ============================================================================
// Defaults and mutation
// ============================================================================

#[test]
fn test_defaults() {
    let mesh = Mesh::new(2);
    assert_eq!(mesh.group_index(), 2);
    assert!(!mesh.is_textured());
    assert_eq!(mesh.color(), (255, 255, 255));
    assert_eq!(mesh.alpha(), 1.0);
    assert_eq!(mesh.shading(), ShadingModel::Flat);
    assert_eq!(mesh.mapping(), TextureMappingMode::Linear);
    assert!(mesh.texture().is_none());
}

#[test]
fn test_alpha_clamped() {
    let mut mesh = Mesh::new(0);
    mesh.set_alpha(3.0);
    assert_eq!(mesh.alpha(), 1.0);
    mesh.set_alpha(-1.0);
    assert_eq!(mesh.alpha(), 0.0);
}

#[test]
fn test_texture_attachment_drives_flag() {
    let renderer = MockRenderer::new();
    let mut mesh = Mesh::new(0);

    let texture = renderer.create_texture().unwrap();
    mesh.set_texture(Some(texture));
    assert!(mesh.is_textured());

    mesh.set_texture(None);
    assert!(!mesh.is_textured());
    assert!(mesh.texture().is_none());
}

// ============================================================================
// Blob round trip
// ============================================================================

#[test]
fn test_round_trip() {
    let mut mesh = Mesh::new(7);
    mesh.set_color(10, 20, 30);
    mesh.set_alpha(0.5);
    mesh.set_shading(ShadingModel::Gouraud);
    mesh.set_mapping(TextureMappingMode::PerspectiveCorrect);

    let mut blob = Vec::new();
    mesh.write_to(&mut blob);

    let parsed = Mesh::read_from(&blob).unwrap();
    assert_eq!(parsed.group_index(), 7);
    assert_eq!(parsed.color(), (10, 20, 30));
    assert_eq!(parsed.alpha(), 0.5);
    assert_eq!(parsed.shading(), ShadingModel::Gouraud);
    assert_eq!(parsed.mapping(), TextureMappingMode::PerspectiveCorrect);
    assert_eq!(parsed.texture_name(), None);
    assert_eq!(parsed.material_name(), None);
}

#[test]
fn test_names_are_lowercased_on_read() {
    let mesh = Mesh::new(0);
    let mut blob = Vec::new();
    mesh.write_to(&mut blob);

    // Swap the empty name fields for an uppercase texture name
    blob.truncate(blob.len() - 4);
    blob.extend_from_slice(&4u16.to_le_bytes());
    blob.extend_from_slice(b"BRIK");
    blob.extend_from_slice(&0u16.to_le_bytes());

    let parsed = Mesh::read_from(&blob).unwrap();
    assert_eq!(parsed.texture_name(), Some("brik"));
}

#[test]
fn test_truncated_blob_fails() {
    let mesh = Mesh::new(0);
    let mut blob = Vec::new();
    mesh.write_to(&mut blob);
    blob.truncate(6);
    assert!(Mesh::read_from(&blob).is_err());
}

#[test]
fn test_unknown_shading_byte_fails() {
    let mesh = Mesh::new(0);
    let mut blob = Vec::new();
    mesh.write_to(&mut blob);
    blob[12] = 0xEE;
    assert!(Mesh::read_from(&blob).is_err());
}
