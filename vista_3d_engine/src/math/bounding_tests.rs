use glam::{Mat4, Vec3};
use super::*;

// ============================================================================
// BoundingBox
// ============================================================================

#[test]
fn test_box_validity() {
    let good = BoundingBox::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
    assert!(good.is_valid());

    let bad = BoundingBox::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(-1.0, 1.0, 1.0));
    assert!(!bad.is_valid());
}

#[test]
fn test_box_expand_keeps_validity() {
    let mut b = BoundingBox::new(Vec3::ZERO, Vec3::ZERO);
    b.expand_to(Vec3::new(2.0, -3.0, 1.0));
    b.expand_to(Vec3::new(-1.0, 4.0, 0.5));
    assert!(b.is_valid());
    assert_eq!(b.min, Vec3::new(-1.0, -3.0, 0.0));
    assert_eq!(b.max, Vec3::new(2.0, 4.0, 1.0));
}

#[test]
fn test_box_corners_count_and_extremes() {
    let b = BoundingBox::new(Vec3::ZERO, Vec3::ONE);
    let corners = b.corners();
    assert_eq!(corners.len(), 8);
    assert!(corners.contains(&Vec3::ZERO));
    assert!(corners.contains(&Vec3::ONE));
}

// ============================================================================
// BoundingSphere
// ============================================================================

#[test]
fn test_sphere_radius_clamped_non_negative() {
    let s = BoundingSphere::new(Vec3::ZERO, -2.0);
    assert_eq!(s.radius, 0.0);
}

// ============================================================================
// transform_sphere
// ============================================================================

#[test]
fn test_transform_sphere_moves_center_keeps_radius() {
    let s = BoundingSphere::new(Vec3::new(1.0, 0.0, 0.0), 2.5);
    let m = Mat4::from_translation(Vec3::new(0.0, 10.0, 0.0));
    let world = transform_sphere(&s, &m);
    assert!((world.center - Vec3::new(1.0, 10.0, 0.0)).length() < 1e-5);
    assert_eq!(world.radius, 2.5);
}

#[test]
fn test_transform_sphere_rotation() {
    let s = BoundingSphere::new(Vec3::new(1.0, 0.0, 0.0), 1.0);
    let m = Mat4::from_rotation_z(std::f32::consts::FRAC_PI_2);
    let world = transform_sphere(&s, &m);
    assert!((world.center - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-5);
}

// ============================================================================
// box_enclosing_transformed_sphere
// ============================================================================

#[test]
fn test_world_box_envelopes_sphere() {
    let s = BoundingSphere::new(Vec3::ZERO, 1.0);
    let m = Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0));
    let b = box_enclosing_transformed_sphere(&s, &m);
    assert!(b.is_valid());
    assert!((b.min - Vec3::new(4.0, -1.0, -1.0)).length() < 1e-5);
    assert!((b.max - Vec3::new(6.0, 1.0, 1.0)).length() < 1e-5);
}

#[test]
fn test_world_box_valid_under_rotation() {
    let s = BoundingSphere::new(Vec3::new(2.0, 0.0, 0.0), 0.5);
    let m = Mat4::from_rotation_y(0.8);
    let b = box_enclosing_transformed_sphere(&s, &m);
    assert!(b.is_valid());

    // The transformed centre must sit inside the box
    let center = m.transform_point3(s.center);
    assert!(center.x >= b.min.x && center.x <= b.max.x);
    assert!(center.y >= b.min.y && center.y <= b.max.y);
    assert!(center.z >= b.min.z && center.z <= b.max.z);
}
