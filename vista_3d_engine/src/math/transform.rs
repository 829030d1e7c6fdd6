/// Checked matrix and quaternion operations.
///
/// `glam` provides the raw types; the functions here add the failure modes
/// the scene core depends on: normalisation of a zero-length vector,
/// inversion of a singular matrix and conversion of a non-unit quaternion
/// all report `InvalidParameters` instead of producing NaNs.

use glam::{Mat4, Quat, Vec3, Vec4};

use crate::engine_err;
use crate::error::Result;

/// Tolerance used by the checked operations in this module.
pub const EPSILON: f32 = 1e-5;

/// Normalize a vector, failing on (near-)zero length.
pub fn checked_normalize(v: Vec3) -> Result<Vec3> {
    let len = v.length();
    if len <= EPSILON {
        return Err(engine_err!(InvalidParameters, "vista3d::math",
            "cannot normalize zero-length vector"));
    }
    Ok(v / len)
}

/// Invert a matrix by Gaussian elimination with partial pivoting.
///
/// Fails with `InvalidParameters` when a pivot vanishes within [`EPSILON`].
/// The result is written to a fresh matrix; the input is never aliased.
pub fn checked_invert(m: &Mat4) -> Result<Mat4> {
    // Work on rows: a[r][c]
    let cols = m.to_cols_array_2d();
    let mut a = [[0.0f32; 4]; 4];
    let mut inv = [[0.0f32; 4]; 4];
    for r in 0..4 {
        for c in 0..4 {
            a[r][c] = cols[c][r];
        }
        inv[r][r] = 1.0;
    }

    for col in 0..4 {
        // Partial pivoting: swap in the row with the largest magnitude pivot
        let mut pivot_row = col;
        for r in (col + 1)..4 {
            if a[r][col].abs() > a[pivot_row][col].abs() {
                pivot_row = r;
            }
        }
        if a[pivot_row][col].abs() <= EPSILON {
            return Err(engine_err!(InvalidParameters, "vista3d::math",
                "matrix is singular, cannot invert"));
        }
        if pivot_row != col {
            a.swap(pivot_row, col);
            inv.swap(pivot_row, col);
        }

        let pivot = a[col][col];
        for c in 0..4 {
            a[col][c] /= pivot;
            inv[col][c] /= pivot;
        }

        for r in 0..4 {
            if r == col {
                continue;
            }
            let factor = a[r][col];
            if factor != 0.0 {
                for c in 0..4 {
                    a[r][c] -= factor * a[col][c];
                    inv[r][c] -= factor * inv[col][c];
                }
            }
        }
    }

    Ok(Mat4::from_cols(
        Vec4::new(inv[0][0], inv[1][0], inv[2][0], inv[3][0]),
        Vec4::new(inv[0][1], inv[1][1], inv[2][1], inv[3][1]),
        Vec4::new(inv[0][2], inv[1][2], inv[2][2], inv[3][2]),
        Vec4::new(inv[0][3], inv[1][3], inv[2][3], inv[3][3]),
    ))
}

/// Build a rotation matrix from a quaternion, failing on non-unit input.
///
/// The destination is untouched on failure (the caller keeps its matrix).
pub fn matrix_from_unit_quat(q: Quat) -> Result<Mat4> {
    if (q.length() - 1.0).abs() > EPSILON {
        return Err(engine_err!(InvalidParameters, "vista3d::math",
            "quaternion must be unit length, |q| = {}", q.length()));
    }
    Ok(Mat4::from_quat(q))
}

/// Extract the rotation quaternion from a matrix (trace form).
pub fn quat_from_matrix(m: &Mat4) -> Quat {
    Quat::from_mat4(m)
}

/// Compose a local transform from position, direction and up vectors.
///
/// The basis is `right = normalize(up x dir')`, `up' = dir' x right`,
/// `dir' = normalize(direction)`; right-handed. Degenerate inputs
/// (zero-length direction, up parallel to direction) silently fall back
/// to the identity basis while keeping the position.
pub fn compose_local_transform(position: Vec3, direction: Vec3, up: Vec3) -> Mat4 {
    let mut basis = (Vec3::X, Vec3::Y, Vec3::Z);

    let dir_len = direction.length();
    if dir_len > EPSILON {
        let dir = direction / dir_len;
        let cross = up.cross(dir);
        let cross_len = cross.length();
        if cross_len > EPSILON {
            let right = cross / cross_len;
            basis = (right, dir.cross(right), dir);
        }
    }

    let (right, up, dir) = basis;
    Mat4::from_cols(
        right.extend(0.0),
        up.extend(0.0),
        dir.extend(0.0),
        position.extend(1.0),
    )
}

#[cfg(test)]
#[path = "transform_tests.rs"]
mod tests;
