use super::error::GlResult;
use super::types::{
    AttributeFormat,
    IndexType,
    Name,
    PrimitiveMode,
    ShaderStage,
    StorageFlags,
    UniformLocation,
};

/// Everything the resource layer asks of the graphics driver.
///
/// Objects are addressed by name, never by binding point; the native
/// implementation hides whatever binding dance the driver needs.
/// All calls must be made from the thread that owns the context.
pub trait GraphicsApi {
    fn create_buffer(&self) -> GlResult<Name>;
    fn delete_buffer(&self, buffer: Name);
    fn create_vertex_array(&self) -> GlResult<Name>;
    fn delete_vertex_array(&self, vertex_array: Name);
    fn create_texture(&self) -> GlResult<Name>;
    fn delete_texture(&self, texture: Name);
    fn create_framebuffer(&self) -> GlResult<Name>;
    fn delete_framebuffer(&self, framebuffer: Name);
    fn create_shader(&self, stage: ShaderStage) -> GlResult<Name>;
    fn delete_shader(&self, shader: Name);
    fn create_program(&self) -> GlResult<Name>;
    fn delete_program(&self, program: Name);

    /// Allocates immutable storage; `data`, when given, must be `size` bytes.
    fn buffer_storage(&self, buffer: Name, size: usize, data: Option<&[u8]>, flags: StorageFlags) -> GlResult<()>;
    /// Yields null when the driver refuses the mapping.
    fn map_buffer(&self, buffer: Name, offset: usize, length: usize, access_bits: u32) -> GlResult<*mut u8>;
    fn unmap_buffer(&self, buffer: Name);
    fn bind_uniform_buffer(&self, index: u32, buffer: Name);

    fn vertex_array_vertex_buffer(
        &self,
        vertex_array: Name,
        slot: u32,
        buffer: Name,
        offset: usize,
        stride: usize
    ) -> GlResult<()>;
    fn vertex_array_element_buffer(&self, vertex_array: Name, buffer: Name);
    fn enable_vertex_array_attrib(&self, vertex_array: Name, index: u32);
    fn vertex_array_attrib_format(&self, vertex_array: Name, index: u32, format: AttributeFormat);
    fn vertex_array_attrib_binding(&self, vertex_array: Name, index: u32, slot: u32);

    fn shader_source(&self, shader: Name, source: &str);
    /// Compiles and reports the info log on failure.
    fn compile_shader(&self, shader: Name) -> Result<(), String>;
    fn attach_shader(&self, program: Name, shader: Name);
    /// Links and reports the info log on failure.
    fn link_program(&self, program: Name) -> Result<(), String>;
    fn use_program(&self, program: Name);
    fn get_uniform_location(&self, program: Name, uniform: &str) -> Option<UniformLocation>;

    fn uniform_1_f32(&self, location: UniformLocation, value: f32);
    fn uniform_3_f32(&self, location: UniformLocation, value: [f32; 3]);
    fn uniform_4_f32(&self, location: UniformLocation, value: [f32; 4]);
    /// Row-major matrices are uploaded with `transpose = true`.
    fn uniform_matrix_4_f32(&self, location: UniformLocation, transpose: bool, value: &[f32; 16]);

    fn draw_elements(
        &self,
        vertex_array: Name,
        mode: PrimitiveMode,
        count: usize,
        index_type: IndexType,
        offset: usize
    ) -> GlResult<()>;

    fn viewport(&self, width: i32, height: i32);
    /// Clears color and depth of the default framebuffer.
    fn clear(&self, color: [f32; 4]);
    fn enable_depth_and_culling(&self);
}
