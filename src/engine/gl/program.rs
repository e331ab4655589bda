use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::api::GraphicsApi;
use super::error::{ GlError, GlResult };
use super::handle::{ Handle, ProgramKind, ShaderKind };
use super::types::{ Name, ShaderStage, UniformLocation };
use crate::engine::utils::math::Mat4x4;

#[derive(Debug)]
pub struct Shader {
    handle: Handle<ShaderKind>,
    name: Name,
    stage: ShaderStage,
    source: String,
    compiled: bool,
}

impl Shader {
    pub fn new(api: &Rc<dyn GraphicsApi>, stage: ShaderStage) -> GlResult<Self> {
        let handle = Handle::<ShaderKind>::create(api.clone(), stage)?;
        let name = handle.name().ok_or_else(|| GlError::Allocation {
            kind: "shader",
            reason: "driver returned no name".to_owned(),
        })?;

        Ok(Self {
            handle,
            name,
            stage,
            source: String::new(),
            compiled: false,
        })
    }

    /// Creates, sources and compiles in one go.
    pub fn from_source(api: &Rc<dyn GraphicsApi>, stage: ShaderStage, source: &str) -> GlResult<Self> {
        let mut shader = Self::new(api, stage)?;
        shader.set_source(source);
        shader.compile()?;
        Ok(shader)
    }

    pub fn name(&self) -> Name {
        self.name
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled
    }

    /// Replaces the source text. The shader must be compiled again afterwards.
    pub fn set_source(&mut self, source: &str) {
        self.handle.api().shader_source(self.name, source);
        self.source = source.to_owned();
        self.compiled = false;
    }

    pub fn compile(&mut self) -> GlResult<()> {
        match self.handle.api().compile_shader(self.name) {
            Ok(()) => {
                self.compiled = true;
                log::debug!("compiled {:?} shader {}", self.stage, self.name);
                Ok(())
            }
            Err(info_log) => {
                self.compiled = false;
                log::error!("{:?} shader {} failed to compile", self.stage, self.name);
                Err(GlError::Compile {
                    stage: self.stage,
                    log: info_log,
                })
            }
        }
    }
}

#[derive(Debug)]
pub struct Program {
    handle: Handle<ProgramKind>,
    name: Name,
    attached: Vec<Name>,
    linked: bool,
    locations: RefCell<HashMap<String, Option<UniformLocation>>>,
}

impl Program {
    pub fn new(api: &Rc<dyn GraphicsApi>) -> GlResult<Self> {
        let handle = Handle::<ProgramKind>::create(api.clone(), ())?;
        let name = handle.name().ok_or_else(|| GlError::Allocation {
            kind: "program",
            reason: "driver returned no name".to_owned(),
        })?;

        Ok(Self {
            handle,
            name,
            attached: Vec::new(),
            linked: false,
            locations: RefCell::new(HashMap::new()),
        })
    }

    /// Compiles one shader per stage, links them and drops the shaders.
    pub fn from_stages(api: &Rc<dyn GraphicsApi>, stages: &[(ShaderStage, &str)]) -> GlResult<Self> {
        let shaders = stages
            .iter()
            .map(|&(stage, source)| Shader::from_source(api, stage, source))
            .collect::<GlResult<Vec<_>>>()?;

        let mut program = Self::new(api)?;
        for shader in &shaders {
            program.attach(shader);
        }
        program.link()?;
        Ok(program)
    }

    pub fn name(&self) -> Name {
        self.name
    }

    pub fn is_linked(&self) -> bool {
        self.linked
    }

    pub fn attached(&self) -> &[Name] {
        &self.attached
    }

    pub fn attach(&mut self, shader: &Shader) {
        if self.attached.contains(&shader.name()) {
            return;
        }
        self.handle.api().attach_shader(self.name, shader.name());
        self.attached.push(shader.name());
    }

    pub fn link(&mut self) -> GlResult<()> {
        self.locations.borrow_mut().clear();
        match self.handle.api().link_program(self.name) {
            Ok(()) => {
                self.linked = true;
                log::debug!("linked program {} from {} shaders", self.name, self.attached.len());
                Ok(())
            }
            Err(info_log) => {
                self.linked = false;
                log::error!("program {} failed to link", self.name);
                Err(GlError::Link { log: info_log })
            }
        }
    }

    /// Makes this program current for subsequent draws.
    pub fn use_program(&self) -> GlResult<()> {
        self.ensure_linked("use")?;
        self.handle.api().use_program(self.name);
        Ok(())
    }

    /// `Ok(None)` when the uniform does not exist or was optimised away.
    pub fn uniform_location(&self, uniform: &str) -> GlResult<Option<UniformLocation>> {
        self.ensure_linked("uniform lookup")?;
        if let Some(&location) = self.locations.borrow().get(uniform) {
            return Ok(location);
        }

        let location = self.handle.api().get_uniform_location(self.name, uniform);
        if location.is_none() {
            log::warn!("program {}: no active uniform `{}`", self.name, uniform);
        }
        self.locations.borrow_mut().insert(uniform.to_owned(), location);
        Ok(location)
    }

    pub fn set_f32(&self, location: Option<UniformLocation>, value: f32) {
        if let Some(location) = location {
            self.handle.api().uniform_1_f32(location, value);
        }
    }

    pub fn set_vec3(&self, location: Option<UniformLocation>, value: [f32; 3]) {
        if let Some(location) = location {
            self.handle.api().uniform_3_f32(location, value);
        }
    }

    pub fn set_vec4(&self, location: Option<UniformLocation>, value: [f32; 4]) {
        if let Some(location) = location {
            self.handle.api().uniform_4_f32(location, value);
        }
    }

    /// Uploads a row-major matrix.
    pub fn set_mat4(&self, location: Option<UniformLocation>, value: &Mat4x4) {
        if let Some(location) = location {
            self.handle.api().uniform_matrix_4_f32(location, true, value);
        }
    }

    fn ensure_linked(&self, operation: &'static str) -> GlResult<()> {
        if self.linked {
            Ok(())
        } else {
            Err(GlError::NotLinked { operation })
        }
    }
}
