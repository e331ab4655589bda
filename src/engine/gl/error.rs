use thiserror::Error;

use super::types::{ IndexType, ShaderStage, StorageFlags };

/// Errors surfaced by the GPU resource layer.
///
/// `Allocation` is fatal for the caller (the context is assumed healthy);
/// `Compile`/`Link` carry the driver's info log; the rest are caller
/// contract violations caught before they reach the driver.
#[derive(Debug, Error)]
pub enum GlError {
    #[error("failed to allocate {kind} object: {reason}")]
    Allocation {
        kind: &'static str,
        reason: String,
    },

    #[error("{stage:?} shader failed to compile:\n{log}")]
    Compile {
        stage: ShaderStage,
        log: String,
    },

    #[error("program failed to link:\n{log}")]
    Link {
        log: String,
    },

    #[error("program must be linked before {operation}")]
    NotLinked {
        operation: &'static str,
    },

    #[error("buffer storage flags {available:?} do not include {required:?}")]
    MissingCapability {
        required: StorageFlags,
        available: StorageFlags,
    },

    #[error("mapping of {size} bytes cannot be viewed as elements of {element} bytes")]
    MisalignedMapping {
        size: usize,
        element: usize,
    },

    #[error("cannot create zero-sized {what} storage")]
    EmptyStorage {
        what: &'static str,
    },

    #[error("unsupported index width of {0} bytes (expected 1, 2 or 4)")]
    UnsupportedIndexWidth(usize),

    #[error("attribute {index} is not fully described (enabled: {enabled}, formatted: {formatted}, slot: {slot:?})")]
    IncompleteAttribute {
        index: u32,
        enabled: bool,
        formatted: bool,
        slot: Option<u32>,
    },

    #[error("attribute {index} reads binding slot {slot} which has no vertex buffer")]
    UnboundSlot {
        index: u32,
        slot: u32,
    },

    #[error("no index buffer bound for {index_type:?} draw")]
    NoIndexBuffer {
        index_type: IndexType,
    },

    #[error("driver returned a null pointer when mapping buffer")]
    MapFailed,

    #[error("attribute {index} has {components} components (expected 1 to 4)")]
    InvalidAttributeFormat {
        index: u32,
        components: i32,
    },

    #[error("index {index} points past the {vertex_count} uploaded vertices")]
    IndexOutOfRange {
        index: usize,
        vertex_count: usize,
    },

    #[error("{what} of {value} does not fit a GL integer")]
    OutOfRange {
        what: &'static str,
        value: usize,
    },
}

pub type GlResult<T> = Result<T, GlError>;

/// Converts a size, offset or count to the `GLint`/`GLsizei` the driver takes.
pub fn gl_int(what: &'static str, value: usize) -> GlResult<i32> {
    i32::try_from(value).map_err(|_| GlError::OutOfRange { what, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gl_int_rejects_values_past_i32() {
        assert_eq!(gl_int("count", 36).unwrap(), 36);
        assert_eq!(gl_int("count", i32::MAX as usize).unwrap(), i32::MAX);
        assert!(matches!(
            gl_int("buffer size", 1 << 31),
            Err(GlError::OutOfRange { what: "buffer size", value }) if value == 1 << 31
        ));
    }
}
