//! In-memory [`GraphicsApi`] that records every call, so resource
//! lifetimes and mesh wiring can be checked without a GPU.

use std::cell::{ Cell, RefCell };
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::rc::Rc;

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

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateBuffer(Name),
    DeleteBuffer(Name),
    CreateVertexArray(Name),
    DeleteVertexArray(Name),
    CreateTexture(Name),
    DeleteTexture(Name),
    CreateFramebuffer(Name),
    DeleteFramebuffer(Name),
    CreateShader(Name, ShaderStage),
    DeleteShader(Name),
    CreateProgram(Name),
    DeleteProgram(Name),
    BufferStorage {
        buffer: Name,
        size: usize,
        data: Option<Vec<u8>>,
        flags: StorageFlags,
    },
    MapBuffer {
        buffer: Name,
        length: usize,
        access_bits: u32,
    },
    UnmapBuffer(Name),
    BindUniformBuffer(u32, Name),
    VertexBuffer {
        vertex_array: Name,
        slot: u32,
        buffer: Name,
        offset: usize,
        stride: usize,
    },
    ElementBuffer {
        vertex_array: Name,
        buffer: Name,
    },
    EnableAttrib {
        vertex_array: Name,
        index: u32,
    },
    AttribFormat {
        vertex_array: Name,
        index: u32,
        format: AttributeFormat,
    },
    AttribBinding {
        vertex_array: Name,
        index: u32,
        slot: u32,
    },
    ShaderSource(Name, String),
    CompileShader(Name),
    AttachShader {
        program: Name,
        shader: Name,
    },
    LinkProgram(Name),
    UseProgram(Name),
    UniformLookup(Name, String),
    Uniform1(UniformLocation, f32),
    Uniform3(UniformLocation, [f32; 3]),
    Uniform4(UniformLocation, [f32; 4]),
    UniformMatrix4(UniformLocation, bool, [f32; 16]),
    DrawElements {
        vertex_array: Name,
        mode: PrimitiveMode,
        count: usize,
        index_type: IndexType,
        offset: usize,
    },
    Viewport(i32, i32),
    Clear([f32; 4]),
    EnableDepthAndCulling,
}

impl Call {
    fn is_deletion(&self) -> bool {
        matches!(
            self,
            Call::DeleteBuffer(_) |
                Call::DeleteVertexArray(_) |
                Call::DeleteTexture(_) |
                Call::DeleteFramebuffer(_) |
                Call::DeleteShader(_) |
                Call::DeleteProgram(_)
        )
    }
}

#[derive(Default)]
pub struct RecordingApi {
    next_name: Cell<u32>,
    calls: RefCell<Vec<Call>>,
    fail_allocation: Cell<bool>,
    compile_error: RefCell<Option<String>>,
    link_error: RefCell<Option<String>>,
    // u64 words keep mapped views aligned for any scalar element type.
    storage: RefCell<HashMap<Name, Vec<u64>>>,
}

impl RecordingApi {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn deletions(&self) -> Vec<Call> {
        self.calls.borrow().iter().filter(|call| call.is_deletion()).cloned().collect()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn fail_next_allocation(&self) {
        self.fail_allocation.set(true);
    }

    pub fn fail_compilation(&self, log: &str) {
        *self.compile_error.borrow_mut() = Some(log.to_owned());
    }

    pub fn fail_link(&self, log: &str) {
        *self.link_error.borrow_mut() = Some(log.to_owned());
    }

    /// Current contents of a buffer's storage.
    pub fn buffer_bytes(&self, buffer: Name, size: usize) -> Vec<u8> {
        let storage = self.storage.borrow();
        let words = storage.get(&buffer).map(Vec::as_slice).unwrap_or(&[]);
        bytemuck::cast_slice::<u64, u8>(words)[..size].to_vec()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn allocate(&self, kind: &'static str) -> GlResult<Name> {
        if self.fail_allocation.replace(false) {
            return Err(GlError::Allocation {
                kind,
                reason: "out of names".to_owned(),
            });
        }
        let next = self.next_name.get() + 1;
        self.next_name.set(next);
        Ok(NonZeroU32::new(next).expect("name counter starts at one"))
    }
}

impl GraphicsApi for RecordingApi {
    fn create_buffer(&self) -> GlResult<Name> {
        let name = self.allocate("buffer")?;
        self.record(Call::CreateBuffer(name));
        Ok(name)
    }

    fn delete_buffer(&self, buffer: Name) {
        self.storage.borrow_mut().remove(&buffer);
        self.record(Call::DeleteBuffer(buffer));
    }

    fn create_vertex_array(&self) -> GlResult<Name> {
        let name = self.allocate("vertex array")?;
        self.record(Call::CreateVertexArray(name));
        Ok(name)
    }

    fn delete_vertex_array(&self, vertex_array: Name) {
        self.record(Call::DeleteVertexArray(vertex_array));
    }

    fn create_texture(&self) -> GlResult<Name> {
        let name = self.allocate("texture")?;
        self.record(Call::CreateTexture(name));
        Ok(name)
    }

    fn delete_texture(&self, texture: Name) {
        self.record(Call::DeleteTexture(texture));
    }

    fn create_framebuffer(&self) -> GlResult<Name> {
        let name = self.allocate("framebuffer")?;
        self.record(Call::CreateFramebuffer(name));
        Ok(name)
    }

    fn delete_framebuffer(&self, framebuffer: Name) {
        self.record(Call::DeleteFramebuffer(framebuffer));
    }

    fn create_shader(&self, stage: ShaderStage) -> GlResult<Name> {
        let name = self.allocate("shader")?;
        self.record(Call::CreateShader(name, stage));
        Ok(name)
    }

    fn delete_shader(&self, shader: Name) {
        self.record(Call::DeleteShader(shader));
    }

    fn create_program(&self) -> GlResult<Name> {
        let name = self.allocate("program")?;
        self.record(Call::CreateProgram(name));
        Ok(name)
    }

    fn delete_program(&self, program: Name) {
        self.record(Call::DeleteProgram(program));
    }

    fn buffer_storage(&self, buffer: Name, size: usize, data: Option<&[u8]>, flags: StorageFlags) -> GlResult<()> {
        gl_int("buffer size", size)?;
        let mut words = vec![0u64; size.div_ceil(8)];
        if let Some(bytes) = data {
            bytemuck::cast_slice_mut::<u64, u8>(&mut words)[..bytes.len()].copy_from_slice(bytes);
        }
        self.storage.borrow_mut().insert(buffer, words);
        self.record(Call::BufferStorage {
            buffer,
            size,
            data: data.map(<[u8]>::to_vec),
            flags,
        });
        Ok(())
    }

    fn map_buffer(&self, buffer: Name, offset: usize, length: usize, access_bits: u32) -> GlResult<*mut u8> {
        gl_int("mapping offset", offset)?;
        gl_int("mapping length", length)?;
        self.record(Call::MapBuffer { buffer, length, access_bits });
        let mut storage = self.storage.borrow_mut();
        Ok(match storage.get_mut(&buffer) {
            Some(words) => bytemuck::cast_slice_mut::<u64, u8>(words)[offset..].as_mut_ptr(),
            None => std::ptr::null_mut(),
        })
    }

    fn unmap_buffer(&self, buffer: Name) {
        self.record(Call::UnmapBuffer(buffer));
    }

    fn bind_uniform_buffer(&self, index: u32, buffer: Name) {
        self.record(Call::BindUniformBuffer(index, buffer));
    }

    fn vertex_array_vertex_buffer(
        &self,
        vertex_array: Name,
        slot: u32,
        buffer: Name,
        offset: usize,
        stride: usize
    ) -> GlResult<()> {
        gl_int("vertex buffer offset", offset)?;
        gl_int("vertex stride", stride)?;
        self.record(Call::VertexBuffer { vertex_array, slot, buffer, offset, stride });
        Ok(())
    }

    fn vertex_array_element_buffer(&self, vertex_array: Name, buffer: Name) {
        self.record(Call::ElementBuffer { vertex_array, buffer });
    }

    fn enable_vertex_array_attrib(&self, vertex_array: Name, index: u32) {
        self.record(Call::EnableAttrib { vertex_array, index });
    }

    fn vertex_array_attrib_format(&self, vertex_array: Name, index: u32, format: AttributeFormat) {
        self.record(Call::AttribFormat { vertex_array, index, format });
    }

    fn vertex_array_attrib_binding(&self, vertex_array: Name, index: u32, slot: u32) {
        self.record(Call::AttribBinding { vertex_array, index, slot });
    }

    fn shader_source(&self, shader: Name, source: &str) {
        self.record(Call::ShaderSource(shader, source.to_owned()));
    }

    fn compile_shader(&self, shader: Name) -> Result<(), String> {
        self.record(Call::CompileShader(shader));
        match self.compile_error.borrow_mut().take() {
            Some(log) => Err(log),
            None => Ok(()),
        }
    }

    fn attach_shader(&self, program: Name, shader: Name) {
        self.record(Call::AttachShader { program, shader });
    }

    fn link_program(&self, program: Name) -> Result<(), String> {
        self.record(Call::LinkProgram(program));
        match self.link_error.borrow_mut().take() {
            Some(log) => Err(log),
            None => Ok(()),
        }
    }

    fn use_program(&self, program: Name) {
        self.record(Call::UseProgram(program));
    }

    fn get_uniform_location(&self, program: Name, uniform: &str) -> Option<UniformLocation> {
        self.record(Call::UniformLookup(program, uniform.to_owned()));
        // Uniforms prefixed with "unused" behave like ones the linker optimised away.
        if uniform.starts_with("unused") {
            None
        } else {
            Some(uniform.len() as UniformLocation)
        }
    }

    fn uniform_1_f32(&self, location: UniformLocation, value: f32) {
        self.record(Call::Uniform1(location, value));
    }

    fn uniform_3_f32(&self, location: UniformLocation, value: [f32; 3]) {
        self.record(Call::Uniform3(location, value));
    }

    fn uniform_4_f32(&self, location: UniformLocation, value: [f32; 4]) {
        self.record(Call::Uniform4(location, value));
    }

    fn uniform_matrix_4_f32(&self, location: UniformLocation, transpose: bool, value: &[f32; 16]) {
        self.record(Call::UniformMatrix4(location, transpose, *value));
    }

    fn draw_elements(
        &self,
        vertex_array: Name,
        mode: PrimitiveMode,
        count: usize,
        index_type: IndexType,
        offset: usize
    ) -> GlResult<()> {
        gl_int("index count", count)?;
        gl_int("index offset", offset)?;
        self.record(Call::DrawElements { vertex_array, mode, count, index_type, offset });
        Ok(())
    }

    fn viewport(&self, width: i32, height: i32) {
        self.record(Call::Viewport(width, height));
    }

    fn clear(&self, color: [f32; 4]) {
        self.record(Call::Clear(color));
    }

    fn enable_depth_and_culling(&self) {
        self.record(Call::EnableDepthAndCulling);
    }
}
