use glam::{Mat4, Quat, Vec3};
use super::*;

// ============================================================================
// checked_normalize
// ============================================================================

#[test]
fn test_normalize_unit_result() {
    let v = checked_normalize(Vec3::new(3.0, 4.0, 0.0)).unwrap();
    assert!((v.length() - 1.0).abs() < EPSILON);
    assert!((v - Vec3::new(0.6, 0.8, 0.0)).length() < EPSILON);
}

#[test]
fn test_normalize_zero_vector_fails() {
    assert!(checked_normalize(Vec3::ZERO).is_err());
}

// ============================================================================
// checked_invert
// ============================================================================

#[test]
fn test_invert_identity() {
    let inv = checked_invert(&Mat4::IDENTITY).unwrap();
    assert!(inv.abs_diff_eq(Mat4::IDENTITY, EPSILON));
}

#[test]
fn test_invert_round_trip() {
    let m = Mat4::from_rotation_y(0.7)
        * Mat4::from_translation(Vec3::new(3.0, -2.0, 5.0))
        * Mat4::from_scale(Vec3::new(2.0, 1.0, 0.5));
    let inv = checked_invert(&m).unwrap();
    assert!((m * inv).abs_diff_eq(Mat4::IDENTITY, 1e-4));
}

#[test]
fn test_invert_needs_pivoting() {
    // Zero on the first diagonal entry: plain elimination would fail,
    // partial pivoting must not.
    let m = Mat4::from_cols_array_2d(&[
        [0.0, 1.0, 0.0, 0.0],
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);
    let inv = checked_invert(&m).unwrap();
    assert!((m * inv).abs_diff_eq(Mat4::IDENTITY, EPSILON));
}

#[test]
fn test_invert_singular_fails() {
    let m = Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0));
    assert!(checked_invert(&m).is_err());
}

#[test]
fn test_invert_does_not_modify_input() {
    let m = Mat4::from_rotation_x(1.1);
    let copy = m;
    let _ = checked_invert(&m).unwrap();
    assert_eq!(m, copy);
}

// ============================================================================
// quaternion <-> matrix
// ============================================================================

#[test]
fn test_quat_matrix_round_trip() {
    let q = Quat::from_axis_angle(Vec3::new(1.0, 2.0, 3.0).normalize(), 0.9);
    let m = matrix_from_unit_quat(q).unwrap();
    let q2 = quat_from_matrix(&m);

    // q and -q encode the same rotation
    let same = (q - q2).length() < 1e-5 || (q + q2).length() < 1e-5;
    assert!(same, "expected {:?} ~ +/-{:?}", q, q2);
}

#[test]
fn test_non_unit_quat_fails() {
    let q = Quat::from_xyzw(0.0, 0.0, 0.0, 2.0);
    assert!(matrix_from_unit_quat(q).is_err());
}

// ============================================================================
// compose_local_transform
// ============================================================================

#[test]
fn test_compose_basis_is_orthonormal() {
    let m = compose_local_transform(
        Vec3::new(1.0, 2.0, 3.0),
        Vec3::new(0.0, 0.0, 2.0),
        Vec3::new(0.0, 1.0, 0.0),
    );

    let right = m.x_axis.truncate();
    let up = m.y_axis.truncate();
    let dir = m.z_axis.truncate();

    assert!((right.length() - 1.0).abs() < EPSILON);
    assert!((up.length() - 1.0).abs() < EPSILON);
    assert!((dir.length() - 1.0).abs() < EPSILON);
    assert!(right.dot(up).abs() < EPSILON);
    assert!(right.dot(dir).abs() < EPSILON);
    assert!(up.dot(dir).abs() < EPSILON);
    assert_eq!(m.w_axis.truncate(), Vec3::new(1.0, 2.0, 3.0));
}

#[test]
fn test_compose_normalizes_direction() {
    let m = compose_local_transform(Vec3::ZERO, Vec3::new(0.0, 0.0, 5.0), Vec3::Y);
    assert!((m.z_axis.truncate() - Vec3::Z).length() < EPSILON);
}

#[test]
fn test_compose_degenerate_falls_back_to_identity_basis() {
    // Direction of zero length
    let m = compose_local_transform(Vec3::new(7.0, 8.0, 9.0), Vec3::ZERO, Vec3::Y);
    assert_eq!(m.x_axis.truncate(), Vec3::X);
    assert_eq!(m.y_axis.truncate(), Vec3::Y);
    assert_eq!(m.z_axis.truncate(), Vec3::Z);
    assert_eq!(m.w_axis.truncate(), Vec3::new(7.0, 8.0, 9.0));

    // Up parallel to direction
    let m = compose_local_transform(Vec3::ZERO, Vec3::Y, Vec3::Y);
    assert_eq!(m.x_axis.truncate(), Vec3::X);
}
