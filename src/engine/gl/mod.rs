//! Owning wrappers over OpenGL objects.
//!
//! Every object holds the [`GraphicsApi`] it was created with and deletes
//! its name exactly once when dropped. Objects are single-threaded: they
//! must stay on the thread that owns the context.

pub mod api;
pub mod debug;
pub mod error;
pub mod handle;
pub mod native;
pub mod objects;
pub mod program;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use api::GraphicsApi;
pub use debug::install_debug_output;
pub use error::{ GlError, GlResult };
pub use handle::{ Handle, Lifecycle };
pub use objects::{ AttributeState, Buffer, BufferMapping, Framebuffer, SlotBinding, Texture, VertexArray };
pub use program::{ Program, Shader };
pub use types::{
    AttributeFormat,
    ComponentType,
    IndexType,
    MapAccess,
    Name,
    PrimitiveMode,
    ShaderStage,
    StorageFlags,
    UniformLocation,
};
