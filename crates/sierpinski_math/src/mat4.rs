//! 4x4 Matrix utilities for the transform stack
//!
//! Matrices are column-major (`m[column][row]`), matching WGSL's `mat4x4<f32>`
//! so they can be uploaded to the GPU without transposition. Only affine
//! transforms are composed on the stack; [`perspective`] is used for the
//! projection uniform alone.

use crate::Vec3;

/// 4x4 matrix type (column-major)
pub type Mat4 = [[f32; 4]; 4];

/// Identity matrix
pub const IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Translation matrix
pub fn translation(offset: Vec3) -> Mat4 {
    let mut m = IDENTITY;
    m[3][0] = offset.x;
    m[3][1] = offset.y;
    m[3][2] = offset.z;
    m
}

/// Non-uniform scale matrix
pub fn scaling(factors: Vec3) -> Mat4 {
    let mut m = IDENTITY;
    m[0][0] = factors.x;
    m[1][1] = factors.y;
    m[2][2] = factors.z;
    m
}

/// Rotation of `degrees` around `axis` (right-handed, counter-clockwise when
/// looking down the axis towards the origin).
///
/// The axis does not need to be normalized. A zero axis yields the identity.
pub fn rotation_axis_angle(degrees: f32, axis: Vec3) -> Mat4 {
    let a = axis.normalized();
    if a == Vec3::ZERO {
        return IDENTITY;
    }

    let (s, c) = degrees.to_radians().sin_cos();
    let t = 1.0 - c;
    let (x, y, z) = (a.x, a.y, a.z);

    [
        [x * x * t + c, y * x * t + z * s, x * z * t - y * s, 0.0],
        [x * y * t - z * s, y * y * t + c, y * z * t + x * s, 0.0],
        [x * z * t + y * s, y * z * t - x * s, z * z * t + c, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Matrix product `a * b` (apply `b` first, then `a`)
pub fn mul(a: &Mat4, b: &Mat4) -> Mat4 {
    let mut result = [[0.0f32; 4]; 4];
    for (col, out_col) in result.iter_mut().enumerate() {
        for (row, out) in out_col.iter_mut().enumerate() {
            *out = (0..4).map(|k| a[k][row] * b[col][k]).sum();
        }
    }
    result
}

/// Transform a point (w = 1), including translation
pub fn transform_point(m: &Mat4, p: Vec3) -> Vec3 {
    Vec3::new(
        m[0][0] * p.x + m[1][0] * p.y + m[2][0] * p.z + m[3][0],
        m[0][1] * p.x + m[1][1] * p.y + m[2][1] * p.z + m[3][1],
        m[0][2] * p.x + m[1][2] * p.y + m[2][2] * p.z + m[3][2],
    )
}

/// Transform a direction (w = 0), ignoring translation
pub fn transform_vector(m: &Mat4, v: Vec3) -> Vec3 {
    Vec3::new(
        m[0][0] * v.x + m[1][0] * v.y + m[2][0] * v.z,
        m[0][1] * v.x + m[1][1] * v.y + m[2][1] * v.z,
        m[0][2] * v.x + m[1][2] * v.y + m[2][2] * v.z,
    )
}

/// Right-handed perspective projection with a 0..1 depth range
///
/// `fov_y_degrees` is the full vertical field of view.
pub fn perspective(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let f = 1.0 / (fov_y_degrees.to_radians() / 2.0).tan();
    let nf = 1.0 / (near - far);

    [
        [f / aspect, 0.0, 0.0, 0.0],
        [0.0, f, 0.0, 0.0],
        [0.0, 0.0, far * nf, -1.0],
        [0.0, 0.0, near * far * nf, 0.0],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_translation_moves_points_not_vectors() {
        let m = translation(Vec3::new(1.0, -2.0, 3.0));
        assert_eq!(transform_point(&m, Vec3::ZERO), Vec3::new(1.0, -2.0, 3.0));
        assert_eq!(transform_vector(&m, Vec3::X), Vec3::X);
    }

    #[test]
    fn test_rotation_about_z() {
        let m = rotation_axis_angle(90.0, Vec3::Z);
        let p = transform_point(&m, Vec3::X);
        assert!(p.approx_eq(Vec3::Y, EPSILON), "got {:?}", p);
    }

    #[test]
    fn test_rotation_about_y() {
        // +90 degrees about Y takes +Z to +X
        let m = rotation_axis_angle(90.0, Vec3::Y);
        let p = transform_point(&m, Vec3::Z);
        assert!(p.approx_eq(Vec3::X, EPSILON), "got {:?}", p);
    }

    #[test]
    fn test_rotation_zero_axis_is_identity() {
        assert_eq!(rotation_axis_angle(45.0, Vec3::ZERO), IDENTITY);
    }

    #[test]
    fn test_rotation_preserves_length() {
        let m = rotation_axis_angle(33.0, Vec3::new(1.0, 2.0, -0.5));
        let v = Vec3::new(0.3, -1.2, 2.0);
        assert!((transform_vector(&m, v).length() - v.length()).abs() < EPSILON);
    }

    #[test]
    fn test_mul_applies_right_first() {
        let t = translation(Vec3::new(1.0, 0.0, 0.0));
        let s = scaling(Vec3::new(2.0, 2.0, 2.0));
        // scale then translate
        let m = mul(&t, &s);
        assert!(transform_point(&m, Vec3::X).approx_eq(Vec3::new(3.0, 0.0, 0.0), EPSILON));
        // translate then scale
        let m = mul(&s, &t);
        assert!(transform_point(&m, Vec3::X).approx_eq(Vec3::new(4.0, 0.0, 0.0), EPSILON));
    }

    #[test]
    fn test_mul_identity() {
        let r = rotation_axis_angle(10.0, Vec3::X);
        assert_eq!(mul(&IDENTITY, &r), r);
        assert_eq!(mul(&r, &IDENTITY), r);
    }

    #[test]
    fn test_perspective_depth_range() {
        let (near, far) = (0.1, 50.0);
        let m = perspective(70.0, 1.5, near, far);

        let depth = |z: f32| {
            let clip_z = m[2][2] * z + m[3][2];
            let clip_w = m[2][3] * z;
            clip_z / clip_w
        };
        assert!(depth(-near).abs() < EPSILON);
        assert!((depth(-far) - 1.0).abs() < EPSILON);
    }
}
