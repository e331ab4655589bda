//! Procedural vertex and index data. Pure functions, no GPU access.
//!
//! Cube corners are numbered so that bits 0, 1 and 2 of the index pick the
//! sign of x, y and z. Faces wind counter-clockwise seen from outside.

use std::f32::consts::PI;

use super::math::Vec3;

/// Index of a vertex within a particular vertex set.
pub type Point = u32;
pub type Edge = [Point; 2];
pub type Quad = [Point; 4];

pub fn cube_vertices() -> [Vec3; 8] {
    std::array::from_fn(|i| {
        let sign = |bit: usize| if i & bit != 0 { 1.0 } else { -1.0 };
        [sign(1), sign(2), sign(4)]
    })
}

pub fn cube_points() -> [Point; 8] {
    std::array::from_fn(|i| i as Point)
}

/// The 12 edges, each joining corners one bit apart, lower index first.
pub fn cube_edges() -> [Edge; 12] {
    let mut edges = [[0; 2]; 12];
    let mut k = 0;
    for i in 0..8u32 {
        for axis in 0..3 {
            let neighbour = i ^ (1 << axis);
            if neighbour > i {
                edges[k] = [i, neighbour];
                k += 1;
            }
        }
    }
    edges
}

/// Faces in the order -x, +x, -y, +y, -z, +z.
///
/// Each face walks a unit square over the two free axes, in opposite
/// directions for the negative and positive side so both wind outward.
pub fn cube_faces() -> [Quad; 6] {
    const NEGATIVE: [[u32; 2]; 4] = [[0, 0], [0, 1], [1, 1], [1, 0]];
    const POSITIVE: [[u32; 2]; 4] = [[0, 0], [1, 0], [1, 1], [0, 1]];

    let mut faces = [[0; 4]; 6];
    for axis in 0..3 {
        let first = (axis + 1) % 3;
        let second = (axis + 2) % 3;
        for sign in 0..2u32 {
            let walk = if sign == 0 { &NEGATIVE } else { &POSITIVE };
            let face = &mut faces[axis * 2 + sign as usize];
            for (corner, [a, b]) in face.iter_mut().zip(walk) {
                *corner = (sign << axis) | (a << first) | (b << second);
            }
        }
    }
    faces
}

/// Two outward-facing triangles per face: (0,1,2) and (2,3,0).
pub fn cube_triangles() -> [Point; 36] {
    triangulate(|f| [f[0], f[1], f[2], f[2], f[3], f[0]])
}

/// Same triangles wound the other way, for surfaces seen from inside.
pub fn cube_inner_triangles() -> [Point; 36] {
    triangulate(|f| [f[2], f[1], f[0], f[0], f[3], f[2]])
}

fn triangulate(split: impl Fn(&Quad) -> [Point; 6]) -> [Point; 36] {
    let mut indices = [0; 36];
    for (chunk, face) in indices.chunks_exact_mut(6).zip(cube_faces().iter()) {
        chunk.copy_from_slice(&split(face));
    }
    indices
}

/// Index count of a `w` x `h` grid, or `None` when it exceeds what a
/// single draw call can submit (`i32::MAX`). Every vertex index of such a
/// grid also fits in a [`Point`].
pub fn grid_index_count(w: u32, h: u32) -> Option<usize> {
    if w < 2 || h < 2 {
        return Some(0);
    }
    let count = ((w - 1) as usize).checked_mul((h - 1) as usize)?.checked_mul(6)?;
    (count <= i32::MAX as usize).then_some(count)
}

/// Samples `f` on a `w` x `h` grid of `(u, v)` in `[0, 1]^2`.
///
/// The outer loop runs over `u`, so sample `(i, j)` lands at `i * h + j`.
/// Grids narrower than 2 in either direction are empty, and so are grids
/// whose vertices cannot all be addressed by a [`Point`].
pub fn generate_surface(w: u32, h: u32, f: impl Fn(f32, f32) -> Vec3) -> Vec<Vec3> {
    if w < 2 || h < 2 || w.checked_mul(h).is_none() {
        return Vec::new();
    }
    let mut vertices = Vec::with_capacity(w as usize * h as usize);
    for i in 0..w {
        for j in 0..h {
            let u = i as f32 / (w - 1) as f32;
            let v = j as f32 / (h - 1) as f32;
            vertices.push(f(u, v));
        }
    }
    vertices
}

/// Two triangles per cell of a row-major grid with `w` vertices per row.
/// Grids too large for one draw call are empty; see [`grid_index_count`].
pub fn generate_grid_indices(w: u32, h: u32) -> Vec<Point> {
    let count = match grid_index_count(w, h) {
        Some(count) if count > 0 => count,
        _ => {
            return Vec::new();
        }
    };
    let mut indices = Vec::with_capacity(count);
    for i in 0..h - 1 {
        for j in 0..w - 1 {
            let lt = i * w + j;
            let rt = lt + 1;
            let lb = lt + w;
            let rb = lb + 1;
            indices.extend_from_slice(&[lt, lb, rt, rt, lb, rb]);
        }
    }
    indices
}

/// Vertices and matching indices for a parametric surface.
pub fn surface_mesh_data(w: u32, h: u32, f: impl Fn(f32, f32) -> Vec3) -> (Vec<Vec3>, Vec<Point>) {
    // Rows of the sampled grid run along v, so they are `h` long.
    (generate_surface(w, h, f), generate_grid_indices(h, w))
}

pub fn sphere(u: f32, v: f32) -> Vec3 {
    let theta = u * 2.0 * PI;
    let phi = v * PI;
    [theta.cos() * phi.sin(), phi.cos(), theta.sin() * phi.sin()]
}

pub fn torus(u: f32, v: f32) -> Vec3 {
    const MAJOR: f32 = 1.0;
    const MINOR: f32 = 0.5;
    let theta = u * 2.0 * PI;
    let phi = v * 2.0 * PI;
    let ring = MAJOR + MINOR * phi.cos();
    [ring * theta.cos(), ring * theta.sin(), MINOR * phi.sin()]
}

pub fn helicoid(u: f32, v: f32) -> Vec3 {
    let u = u * 2.0 * PI;
    let v = v * 2.0 * PI;
    [u * v.cos(), u * v.sin(), v]
}
