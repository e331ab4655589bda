//! Row-major matrices and small vector helpers. Matrices are uploaded
//! with `transpose = true`.

pub type Mat4x4 = [f32; 16];
pub type Vec3 = [f32; 3];

pub fn mat4x4_identity() -> Mat4x4 {
    [
      1.0, 0.0, 0.0, 0.0,
      0.0, 1.0, 0.0, 0.0,
      0.0, 0.0, 1.0, 0.0,
      0.0, 0.0, 0.0, 1.0
    ]
}

pub fn mat4x4_translate(x: f32, y: f32, z: f32) -> Mat4x4 {
    [
      1.0, 0.0, 0.0,  x,
      0.0, 1.0, 0.0,  y,
      0.0, 0.0, 1.0,  z,
      0.0, 0.0, 0.0, 1.0
    ]
}

pub fn mat4x4_scale(x: f32, y: f32, z: f32) -> Mat4x4 {
    [
       x,  0.0, 0.0, 0.0,
      0.0,  y,  0.0, 0.0,
      0.0, 0.0,  z,  0.0,
      0.0, 0.0, 0.0, 1.0
    ]
}

pub fn mat4x4_row(mat: &Mat4x4, row: usize) -> [f32; 4] {
    let start_idx = row * 4;
    [mat[start_idx], mat[start_idx + 1], mat[start_idx + 2], mat[start_idx + 3]]
}

pub fn mat4x4_col(mat: &Mat4x4, col: usize) -> [f32; 4] {
    [mat[col], mat[4 + col], mat[8 + col], mat[12 + col]]
}

pub fn vec4_dot(a: [f32; 4], b: [f32; 4]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3]
}

pub fn mat4x4_mul(a: Mat4x4, b: Mat4x4) -> Mat4x4 {
    let mut ret = [0.0; 16];
    for (i, cell) in ret.iter_mut().enumerate() {
        *cell = vec4_dot(mat4x4_row(&a, i / 4), mat4x4_col(&b, i % 4));
    }
    ret
}

pub fn mat4x4_transform_point(mat: &Mat4x4, p: Vec3) -> Vec3 {
    let v = [p[0], p[1], p[2], 1.0];
    let w = vec4_dot(mat4x4_row(mat, 3), v);
    [
        vec4_dot(mat4x4_row(mat, 0), v) / w,
        vec4_dot(mat4x4_row(mat, 1), v) / w,
        vec4_dot(mat4x4_row(mat, 2), v) / w,
    ]
}

pub fn mat4x4_perspective(fov_y_radians: f32, aspect_ratio: f32, near: f32, far: f32) -> Mat4x4 {
    let f = 1.0 / (fov_y_radians * 0.5).tan();
    let range_inv = 1.0 / (near - far);

    [
        f / aspect_ratio, 0.0, 0.0,                          0.0,
        0.0,              f,   0.0,                          0.0,
        0.0,              0.0, (near + far) * range_inv,     (2.0 * near * far) * range_inv,
        0.0,              0.0, -1.0,                         0.0,
    ]
}

/// Right-handed view matrix looking from `eye` towards `center`.
pub fn mat4x4_look_at(eye: Vec3, center: Vec3, up: Vec3) -> Mat4x4 {
    let f = vec3_normalize(vec3_sub(center, eye));
    let s = vec3_normalize(vec3_cross(f, up));
    let u = vec3_cross(s, f);

    [
        s[0],  s[1],  s[2],  -vec3_dot(s, eye),
        u[0],  u[1],  u[2],  -vec3_dot(u, eye),
        -f[0], -f[1], -f[2], vec3_dot(f, eye),
        0.0,   0.0,   0.0,   1.0,
    ]
}

pub fn vec3_add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

pub fn vec3_sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub fn vec3_scale(v: Vec3, s: f32) -> Vec3 {
    [v[0] * s, v[1] * s, v[2] * s]
}

pub fn vec3_dot(a: Vec3, b: Vec3) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub fn vec3_cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

pub fn vec3_length(v: Vec3) -> f32 {
    vec3_dot(v, v).sqrt()
}

/// Zero vectors are returned unchanged.
pub fn vec3_normalize(v: Vec3) -> Vec3 {
    let len = vec3_length(v);
    if len > f32::EPSILON {
        vec3_scale(v, 1.0 / len)
    } else {
        v
    }
}

// Linear interpolation utility function
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

pub fn vec3_lerp(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    [lerp(a[0], b[0], t), lerp(a[1], b[1], t), lerp(a[2], b[2], t)]
}

/// Rotates `v` by `angle` radians around `axis` (Rodrigues' formula).
pub fn rotate_about_axis(v: Vec3, angle: f32, axis: Vec3) -> Vec3 {
    let k = vec3_normalize(axis);
    let (s, c) = angle.sin_cos();
    let term1 = vec3_scale(v, c);
    let term2 = vec3_scale(vec3_cross(k, v), s);
    let term3 = vec3_scale(k, vec3_dot(k, v) * (1.0 - c));
    vec3_add(vec3_add(term1, term2), term3)
}
