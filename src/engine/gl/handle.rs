use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use super::api::GraphicsApi;
use super::error::GlResult;
use super::types::{ Name, ShaderStage };

/// The construct/destruct pair of one GL object kind.
pub trait Lifecycle {
    const KIND: &'static str;

    /// Extra input the driver needs to create a name of this kind.
    type Params: Copy;

    fn construct(api: &dyn GraphicsApi, params: Self::Params) -> GlResult<Name>;
    fn destruct(api: &dyn GraphicsApi, name: Name);
}

/// Owns exactly one GL object name.
///
/// Rust moves already transfer ownership without running `Drop` on the
/// source; [`Handle::take`] and [`Handle::assign`] cover the cases where
/// the source must stay usable in its empty state.
pub struct Handle<K: Lifecycle> {
    api: Rc<dyn GraphicsApi>,
    name: Option<Name>,
    kind: PhantomData<K>,
}

impl<K: Lifecycle> Handle<K> {
    pub fn create(api: Rc<dyn GraphicsApi>, params: K::Params) -> GlResult<Self> {
        let name = K::construct(api.as_ref(), params)?;
        log::trace!("created {} {}", K::KIND, name);
        Ok(Self::adopt(api, name))
    }

    /// Takes ownership of a name obtained elsewhere. The caller must not
    /// let anything else delete it.
    pub fn adopt(api: Rc<dyn GraphicsApi>, name: Name) -> Self {
        Self {
            api,
            name: Some(name),
            kind: PhantomData,
        }
    }

    /// A handle that owns nothing.
    pub fn empty(api: Rc<dyn GraphicsApi>) -> Self {
        Self {
            api,
            name: None,
            kind: PhantomData,
        }
    }

    pub fn name(&self) -> Option<Name> {
        self.name
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
    }

    pub fn api(&self) -> &Rc<dyn GraphicsApi> {
        &self.api
    }

    /// Moves the name out, leaving `self` empty.
    pub fn take(&mut self) -> Self {
        Self {
            api: self.api.clone(),
            name: self.name.take(),
            kind: PhantomData,
        }
    }

    /// Move-assignment: releases the current name (unless `other` owns the
    /// very same one) and takes over `other`'s.
    pub fn assign(&mut self, mut other: Self) {
        let incoming = other.name.take();
        if let Some(current) = self.name {
            if Some(current) != incoming {
                self.destroy(current);
            }
        }
        self.name = incoming;
        self.api = other.api.clone();
    }

    /// Gives up ownership without destroying the object.
    pub fn into_raw(mut self) -> Option<Name> {
        self.name.take()
    }

    fn destroy(&self, name: Name) {
        log::trace!("deleting {} {}", K::KIND, name);
        K::destruct(self.api.as_ref(), name);
    }
}

impl<K: Lifecycle> Drop for Handle<K> {
    fn drop(&mut self) {
        if let Some(name) = self.name.take() {
            self.destroy(name);
        }
    }
}

impl<K: Lifecycle> fmt::Debug for Handle<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle").field("kind", &K::KIND).field("name", &self.name).finish()
    }
}

// ================================================================================================
// OBJECT KINDS
// ================================================================================================

macro_rules! object_kind {
    ($marker:ident, $label:literal, $create:ident, $delete:ident) => {
        #[derive(Debug)]
        pub enum $marker {}

        impl Lifecycle for $marker {
            const KIND: &'static str = $label;
            type Params = ();

            fn construct(api: &dyn GraphicsApi, _: ()) -> GlResult<Name> {
                api.$create()
            }

            fn destruct(api: &dyn GraphicsApi, name: Name) {
                api.$delete(name)
            }
        }
    };
}

object_kind!(BufferKind, "buffer", create_buffer, delete_buffer);
object_kind!(VertexArrayKind, "vertex array", create_vertex_array, delete_vertex_array);
object_kind!(TextureKind, "texture", create_texture, delete_texture);
object_kind!(FramebufferKind, "framebuffer", create_framebuffer, delete_framebuffer);
object_kind!(ProgramKind, "program", create_program, delete_program);

#[derive(Debug)]
pub enum ShaderKind {}

impl Lifecycle for ShaderKind {
    const KIND: &'static str = "shader";
    type Params = ShaderStage;

    fn construct(api: &dyn GraphicsApi, stage: ShaderStage) -> GlResult<Name> {
        api.create_shader(stage)
    }

    fn destruct(api: &dyn GraphicsApi, name: Name) {
        api.delete_shader(name)
    }
}
