use glow::HasContext;

use super::api::GraphicsApi;
use super::error::{ gl_int, GlError, GlResult };
use super::types::{
    AttributeFormat,
    IndexType,
    Name,
    PrimitiveMode,
    ShaderStage,
    StorageFlags,
    UniformLocation,
};

// Scratch binding point used to reach a buffer by name.
const EDIT_TARGET: u32 = glow::COPY_WRITE_BUFFER;

fn allocation(kind: &'static str) -> impl FnOnce(String) -> GlError {
    move |reason| GlError::Allocation { kind, reason }
}

fn location(location: UniformLocation) -> glow::UniformLocation {
    glow::NativeUniformLocation(location)
}

impl GraphicsApi for glow::Context {
    fn create_buffer(&self) -> GlResult<Name> {
        unsafe { HasContext::create_buffer(self).map(|b| b.0).map_err(allocation("buffer")) }
    }

    fn delete_buffer(&self, buffer: Name) {
        unsafe { HasContext::delete_buffer(self, glow::NativeBuffer(buffer)) }
    }

    fn create_vertex_array(&self) -> GlResult<Name> {
        unsafe { HasContext::create_vertex_array(self).map(|v| v.0).map_err(allocation("vertex array")) }
    }

    fn delete_vertex_array(&self, vertex_array: Name) {
        unsafe { HasContext::delete_vertex_array(self, glow::NativeVertexArray(vertex_array)) }
    }

    fn create_texture(&self) -> GlResult<Name> {
        unsafe { HasContext::create_texture(self).map(|t| t.0).map_err(allocation("texture")) }
    }

    fn delete_texture(&self, texture: Name) {
        unsafe { HasContext::delete_texture(self, glow::NativeTexture(texture)) }
    }

    fn create_framebuffer(&self) -> GlResult<Name> {
        unsafe { HasContext::create_framebuffer(self).map(|f| f.0).map_err(allocation("framebuffer")) }
    }

    fn delete_framebuffer(&self, framebuffer: Name) {
        unsafe { HasContext::delete_framebuffer(self, glow::NativeFramebuffer(framebuffer)) }
    }

    fn create_shader(&self, stage: ShaderStage) -> GlResult<Name> {
        unsafe {
            HasContext::create_shader(self, stage.gl_enum())
                .map(|s| s.0)
                .map_err(allocation("shader"))
        }
    }

    fn delete_shader(&self, shader: Name) {
        unsafe { HasContext::delete_shader(self, glow::NativeShader(shader)) }
    }

    fn create_program(&self) -> GlResult<Name> {
        unsafe { HasContext::create_program(self).map(|p| p.0).map_err(allocation("program")) }
    }

    fn delete_program(&self, program: Name) {
        unsafe { HasContext::delete_program(self, glow::NativeProgram(program)) }
    }

    fn buffer_storage(&self, buffer: Name, size: usize, data: Option<&[u8]>, flags: StorageFlags) -> GlResult<()> {
        let size = gl_int("buffer size", size)?;
        unsafe {
            self.bind_buffer(EDIT_TARGET, Some(glow::NativeBuffer(buffer)));
            HasContext::buffer_storage(self, EDIT_TARGET, size, data, flags.bits());
            self.bind_buffer(EDIT_TARGET, None);
        }
        Ok(())
    }

    fn map_buffer(&self, buffer: Name, offset: usize, length: usize, access_bits: u32) -> GlResult<*mut u8> {
        let offset = gl_int("mapping offset", offset)?;
        let length = gl_int("mapping length", length)?;
        unsafe {
            self.bind_buffer(EDIT_TARGET, Some(glow::NativeBuffer(buffer)));
            let ptr = self.map_buffer_range(EDIT_TARGET, offset, length, access_bits);
            self.bind_buffer(EDIT_TARGET, None);
            Ok(ptr)
        }
    }

    fn unmap_buffer(&self, buffer: Name) {
        unsafe {
            self.bind_buffer(EDIT_TARGET, Some(glow::NativeBuffer(buffer)));
            HasContext::unmap_buffer(self, EDIT_TARGET);
            self.bind_buffer(EDIT_TARGET, None);
        }
    }

    fn bind_uniform_buffer(&self, index: u32, buffer: Name) {
        unsafe {
            self.bind_buffer_base(glow::UNIFORM_BUFFER, index, Some(glow::NativeBuffer(buffer)));
        }
    }

    fn vertex_array_vertex_buffer(
        &self,
        vertex_array: Name,
        slot: u32,
        buffer: Name,
        offset: usize,
        stride: usize
    ) -> GlResult<()> {
        let offset = gl_int("vertex buffer offset", offset)?;
        let stride = gl_int("vertex stride", stride)?;
        unsafe {
            self.bind_vertex_array(Some(glow::NativeVertexArray(vertex_array)));
            self.bind_vertex_buffer(slot, Some(glow::NativeBuffer(buffer)), offset, stride);
            self.bind_vertex_array(None);
        }
        Ok(())
    }

    fn vertex_array_element_buffer(&self, vertex_array: Name, buffer: Name) {
        unsafe {
            // The element binding is VAO state, so leave it bound when the VAO is released.
            self.bind_vertex_array(Some(glow::NativeVertexArray(vertex_array)));
            self.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(glow::NativeBuffer(buffer)));
            self.bind_vertex_array(None);
        }
    }

    fn enable_vertex_array_attrib(&self, vertex_array: Name, index: u32) {
        unsafe {
            self.bind_vertex_array(Some(glow::NativeVertexArray(vertex_array)));
            self.enable_vertex_attrib_array(index);
            self.bind_vertex_array(None);
        }
    }

    fn vertex_array_attrib_format(&self, vertex_array: Name, index: u32, format: AttributeFormat) {
        unsafe {
            self.bind_vertex_array(Some(glow::NativeVertexArray(vertex_array)));
            self.vertex_attrib_format_f32(
                index,
                format.components,
                format.component_type.gl_enum(),
                format.normalized,
                format.relative_offset
            );
            self.bind_vertex_array(None);
        }
    }

    fn vertex_array_attrib_binding(&self, vertex_array: Name, index: u32, slot: u32) {
        unsafe {
            self.bind_vertex_array(Some(glow::NativeVertexArray(vertex_array)));
            self.vertex_attrib_binding(index, slot);
            self.bind_vertex_array(None);
        }
    }

    fn shader_source(&self, shader: Name, source: &str) {
        unsafe { HasContext::shader_source(self, glow::NativeShader(shader), source) }
    }

    fn compile_shader(&self, shader: Name) -> Result<(), String> {
        let shader = glow::NativeShader(shader);
        unsafe {
            HasContext::compile_shader(self, shader);
            if self.get_shader_compile_status(shader) {
                Ok(())
            } else {
                Err(self.get_shader_info_log(shader))
            }
        }
    }

    fn attach_shader(&self, program: Name, shader: Name) {
        unsafe {
            HasContext::attach_shader(self, glow::NativeProgram(program), glow::NativeShader(shader));
        }
    }

    fn link_program(&self, program: Name) -> Result<(), String> {
        let program = glow::NativeProgram(program);
        unsafe {
            HasContext::link_program(self, program);
            if self.get_program_link_status(program) {
                Ok(())
            } else {
                Err(self.get_program_info_log(program))
            }
        }
    }

    fn use_program(&self, program: Name) {
        unsafe { HasContext::use_program(self, Some(glow::NativeProgram(program))) }
    }

    fn get_uniform_location(&self, program: Name, uniform: &str) -> Option<UniformLocation> {
        unsafe {
            HasContext::get_uniform_location(self, glow::NativeProgram(program), uniform).map(|loc| loc.0)
        }
    }

    fn uniform_1_f32(&self, loc: UniformLocation, value: f32) {
        unsafe { HasContext::uniform_1_f32(self, Some(&location(loc)), value) }
    }

    fn uniform_3_f32(&self, loc: UniformLocation, value: [f32; 3]) {
        unsafe { self.uniform_3_f32_slice(Some(&location(loc)), &value) }
    }

    fn uniform_4_f32(&self, loc: UniformLocation, value: [f32; 4]) {
        unsafe { self.uniform_4_f32_slice(Some(&location(loc)), &value) }
    }

    fn uniform_matrix_4_f32(&self, loc: UniformLocation, transpose: bool, value: &[f32; 16]) {
        unsafe { self.uniform_matrix_4_f32_slice(Some(&location(loc)), transpose, value) }
    }

    fn draw_elements(
        &self,
        vertex_array: Name,
        mode: PrimitiveMode,
        count: usize,
        index_type: IndexType,
        offset: usize
    ) -> GlResult<()> {
        let count = gl_int("index count", count)?;
        let offset = gl_int("index offset", offset)?;
        unsafe {
            self.bind_vertex_array(Some(glow::NativeVertexArray(vertex_array)));
            HasContext::draw_elements(self, mode.gl_enum(), count, index_type.gl_enum(), offset);
        }
        Ok(())
    }

    fn viewport(&self, width: i32, height: i32) {
        unsafe { HasContext::viewport(self, 0, 0, width, height) }
    }

    fn clear(&self, color: [f32; 4]) {
        let [r, g, b, a] = color;
        unsafe {
            self.clear_color(r, g, b, a);
            HasContext::clear(self, glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }

    fn enable_depth_and_culling(&self) {
        unsafe {
            self.enable(glow::DEPTH_TEST);
            self.enable(glow::CULL_FACE);
        }
    }
}
