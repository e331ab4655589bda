use std::rc::Rc;

use crate::engine::components::Mesh;
use crate::engine::config::SurfaceConfig;
use crate::engine::gl::{
    Buffer,
    GlResult,
    GraphicsApi,
    MapAccess,
    PrimitiveMode,
    Program,
    ShaderStage,
    StorageFlags,
    UniformLocation,
};
use crate::engine::utils::geometry::{ cube_inner_triangles, cube_triangles, cube_vertices, surface_mesh_data, torus };
use crate::engine::utils::math::{
    Mat4x4,
    mat4x4_look_at,
    mat4x4_mul,
    mat4x4_perspective,
    mat4x4_scale,
    mat4x4_translate,
};

use super::state::AppState;

const VERTEX_SHADER: &str = include_str!("../assets/shaders/vertex_surface.glsl");
const FRAGMENT_SHADER: &str = include_str!("../assets/shaders/fragment_surface.glsl");

/// Uniform block binding of the `camera` block: view then projection.
const MATRICES_BINDING: u32 = 0;
const VIEW: usize = 0;
const PROJECTION: usize = 1;

const FOV_Y_DEGREES: f32 = 45.0;
const NEAR: f32 = 0.1;
const FAR: f32 = 100.0;

const LIGHT_SCALE: f32 = 0.1;
const WALLS_SCALE: f32 = 5.0;

#[derive(Debug)]
struct Uniforms {
    model: Option<UniformLocation>,
    color: Option<UniformLocation>,
    light_position: Option<UniformLocation>,
    camera_position: Option<UniformLocation>,
}

impl Uniforms {
    fn lookup(program: &Program) -> GlResult<Self> {
        Ok(Self {
            model: program.uniform_location("model")?,
            color: program.uniform_location("color_u")?,
            light_position: program.uniform_location("light_position")?,
            camera_position: program.uniform_location("camera_position")?,
        })
    }
}

/// A lit torus, a small cube marking the light and a room around both.
pub struct Scene {
    api: Rc<dyn GraphicsApi>,
    program: Program,
    uniforms: Uniforms,
    matrices: Buffer,
    surface: Mesh,
    light: Mesh,
    walls: Mesh,
}

impl Scene {
    pub fn new(api: &Rc<dyn GraphicsApi>, surface: &SurfaceConfig, width: u32, height: u32) -> GlResult<Self> {
        api.enable_depth_and_culling();

        let program = Program::from_stages(api, &[
            (ShaderStage::Vertex, VERTEX_SHADER),
            (ShaderStage::Fragment, FRAGMENT_SHADER),
        ])?;
        let uniforms = Uniforms::lookup(&program)?;

        let mut matrices = Buffer::allocate_array::<Mat4x4>(api, 2, StorageFlags::DEFAULT_ALLOC)?;
        matrices.bind_uniform(MATRICES_BINDING);
        matrices.map_as::<Mat4x4>(MapAccess::Write)?[VIEW] = mat4x4_look_at(
            [0.0, 0.0, 5.0],
            [0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0]
        );

        let (vertices, indices) = surface_mesh_data(surface.grid_width, surface.grid_height, torus);
        let surface = Mesh::build(api, &vertices, &indices)?;
        let light = Mesh::build(api, &cube_vertices(), &cube_triangles())?;
        let walls = Mesh::build(api, &cube_vertices(), &cube_inner_triangles())?;

        log::info!("scene ready: torus with {} indices", surface.index_count());

        let mut scene = Self {
            api: api.clone(),
            program,
            uniforms,
            matrices,
            surface,
            light,
            walls,
        };
        scene.resize(width, height)?;
        Ok(scene)
    }

    /// Ignores zero-sized surfaces, which a minimised window reports.
    pub fn resize(&mut self, width: u32, height: u32) -> GlResult<()> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.api.viewport(width as i32, height as i32);

        let aspect = width as f32 / height as f32;
        let projection = mat4x4_perspective(FOV_Y_DEGREES.to_radians(), aspect, NEAR, FAR);
        self.matrices.map_as::<Mat4x4>(MapAccess::Write)?[PROJECTION] = projection;
        Ok(())
    }

    pub fn render(&mut self, state: &AppState) -> GlResult<()> {
        if state.camera_enabled {
            self.matrices.map_as::<Mat4x4>(MapAccess::Write)?[VIEW] = state.camera.compute_view_matrix();
        }

        self.api.clear(state.clear_color);
        self.program.use_program()?;
        self.program.set_vec3(self.uniforms.light_position, state.light_position);
        self.program.set_vec3(self.uniforms.camera_position, state.camera.position());

        let [sx, sy, sz] = state.scale;
        self.draw(&self.surface, &mat4x4_scale(sx, sy, sz), state.model_color)?;

        let [lx, ly, lz] = state.light_position;
        let light_model = mat4x4_mul(
            mat4x4_translate(lx, ly, lz),
            mat4x4_scale(LIGHT_SCALE, LIGHT_SCALE, LIGHT_SCALE)
        );
        self.draw(&self.light, &light_model, state.light_color)?;
        self.draw(&self.walls, &mat4x4_scale(WALLS_SCALE, WALLS_SCALE, WALLS_SCALE), state.light_color)
    }

    fn draw(&self, mesh: &Mesh, model: &Mat4x4, color: [f32; 4]) -> GlResult<()> {
        self.program.set_mat4(self.uniforms.model, model);
        self.program.set_vec4(self.uniforms.color, color);
        mesh.draw(PrimitiveMode::Triangles)
    }

    pub fn matrices(&self) -> &Buffer {
        &self.matrices
    }

    pub fn surface(&self) -> &Mesh {
        &self.surface
    }
}
