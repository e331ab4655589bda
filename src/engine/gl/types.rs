use std::num::NonZeroU32;

use bitflags::bitflags;

use super::error::{ GlError, GlResult };

/// A live GL object name. Zero is never a valid name, so `Option<Name>`
/// doubles as the empty (moved-from) state.
pub type Name = NonZeroU32;

/// Location of a uniform inside a linked program.
pub type UniformLocation = u32;

bitflags! {
    /// Capabilities requested when immutable buffer storage is allocated.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StorageFlags: u32 {
        const MAP_READ = glow::MAP_READ_BIT;
        const MAP_WRITE = glow::MAP_WRITE_BIT;
        const MAP_PERSISTENT = glow::MAP_PERSISTENT_BIT;
        const MAP_COHERENT = glow::MAP_COHERENT_BIT;
        const DYNAMIC_STORAGE = glow::DYNAMIC_STORAGE_BIT;
        const CLIENT_STORAGE = glow::CLIENT_STORAGE_BIT;
    }
}

impl StorageFlags {
    /// Host-visible storage that stays mapped for its whole lifetime.
    pub const DEFAULT_ALLOC: Self = Self::MAP_PERSISTENT
        .union(Self::MAP_COHERENT)
        .union(Self::MAP_READ)
        .union(Self::MAP_WRITE);

    /// Upload-once storage for static vertex and index data.
    pub const DEFAULT_STORE: Self = Self::DYNAMIC_STORAGE;
}

impl Default for StorageFlags {
    fn default() -> Self {
        Self::DEFAULT_ALLOC
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapAccess {
    Read,
    Write,
    #[default]
    ReadWrite,
}

impl MapAccess {
    /// Storage capability this access mode needs.
    pub fn required_flags(self) -> StorageFlags {
        match self {
            MapAccess::Read => StorageFlags::MAP_READ,
            MapAccess::Write => StorageFlags::MAP_WRITE,
            MapAccess::ReadWrite => StorageFlags::MAP_READ | StorageFlags::MAP_WRITE,
        }
    }

    /// Bits for `glMapBufferRange`; persistence and coherency follow the
    /// flags the storage was allocated with.
    pub fn range_bits(self, storage: StorageFlags) -> u32 {
        let persistence = storage & (StorageFlags::MAP_PERSISTENT | StorageFlags::MAP_COHERENT);
        (self.required_flags() | persistence).bits()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Geometry,
    Compute,
    TessControl,
    TessEvaluation,
}

impl ShaderStage {
    pub fn gl_enum(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
            ShaderStage::Geometry => glow::GEOMETRY_SHADER,
            ShaderStage::Compute => glow::COMPUTE_SHADER,
            ShaderStage::TessControl => glow::TESS_CONTROL_SHADER,
            ShaderStage::TessEvaluation => glow::TESS_EVALUATION_SHADER,
        }
    }
}

/// Scalar type of a single vertex attribute component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentType {
    Byte,
    UnsignedByte,
    Short,
    UnsignedShort,
    Int,
    UnsignedInt,
    HalfFloat,
    Float,
}

impl ComponentType {
    pub fn gl_enum(self) -> u32 {
        match self {
            ComponentType::Byte => glow::BYTE,
            ComponentType::UnsignedByte => glow::UNSIGNED_BYTE,
            ComponentType::Short => glow::SHORT,
            ComponentType::UnsignedShort => glow::UNSIGNED_SHORT,
            ComponentType::Int => glow::INT,
            ComponentType::UnsignedInt => glow::UNSIGNED_INT,
            ComponentType::HalfFloat => glow::HALF_FLOAT,
            ComponentType::Float => glow::FLOAT,
        }
    }

    pub fn size(self) -> usize {
        match self {
            ComponentType::Byte | ComponentType::UnsignedByte => 1,
            ComponentType::Short | ComponentType::UnsignedShort | ComponentType::HalfFloat => 2,
            ComponentType::Int | ComponentType::UnsignedInt | ComponentType::Float => 4,
        }
    }
}

/// Element type of an index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    U8,
    U16,
    U32,
}

impl IndexType {
    pub fn from_width(bytes: usize) -> GlResult<Self> {
        match bytes {
            1 => Ok(IndexType::U8),
            2 => Ok(IndexType::U16),
            4 => Ok(IndexType::U32),
            other => Err(GlError::UnsupportedIndexWidth(other)),
        }
    }

    pub fn width(self) -> usize {
        match self {
            IndexType::U8 => 1,
            IndexType::U16 => 2,
            IndexType::U32 => 4,
        }
    }

    pub fn gl_enum(self) -> u32 {
        match self {
            IndexType::U8 => glow::UNSIGNED_BYTE,
            IndexType::U16 => glow::UNSIGNED_SHORT,
            IndexType::U32 => glow::UNSIGNED_INT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveMode {
    Points,
    Lines,
    LineStrip,
    LineLoop,
    Triangles,
    TriangleStrip,
    TriangleFan,
}

impl PrimitiveMode {
    pub fn gl_enum(self) -> u32 {
        match self {
            PrimitiveMode::Points => glow::POINTS,
            PrimitiveMode::Lines => glow::LINES,
            PrimitiveMode::LineStrip => glow::LINE_STRIP,
            PrimitiveMode::LineLoop => glow::LINE_LOOP,
            PrimitiveMode::Triangles => glow::TRIANGLES,
            PrimitiveMode::TriangleStrip => glow::TRIANGLE_STRIP,
            PrimitiveMode::TriangleFan => glow::TRIANGLE_FAN,
        }
    }
}

/// Layout of one vertex attribute relative to its binding slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeFormat {
    pub components: i32,
    pub component_type: ComponentType,
    pub normalized: bool,
    pub relative_offset: u32,
}

impl AttributeFormat {
    /// `components` tightly packed 32-bit floats at `relative_offset`.
    pub fn floats(components: i32, relative_offset: u32) -> Self {
        Self {
            components,
            component_type: ComponentType::Float,
            normalized: false,
            relative_offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_width_selection() {
        assert_eq!(IndexType::from_width(1).unwrap(), IndexType::U8);
        assert_eq!(IndexType::from_width(2).unwrap(), IndexType::U16);
        assert_eq!(IndexType::from_width(4).unwrap(), IndexType::U32);
        assert!(matches!(IndexType::from_width(8), Err(GlError::UnsupportedIndexWidth(8))));
        assert!(matches!(IndexType::from_width(3), Err(GlError::UnsupportedIndexWidth(3))));
    }

    #[test]
    fn default_alloc_is_persistent_read_write() {
        let flags = StorageFlags::DEFAULT_ALLOC;
        assert!(flags.contains(StorageFlags::MAP_READ | StorageFlags::MAP_WRITE));
        assert!(flags.contains(StorageFlags::MAP_PERSISTENT | StorageFlags::MAP_COHERENT));
        assert!(!flags.contains(StorageFlags::DYNAMIC_STORAGE));
    }

    #[test]
    fn map_bits_follow_storage_persistence() {
        let bits = MapAccess::Write.range_bits(StorageFlags::DEFAULT_ALLOC);
        assert_eq!(bits & glow::MAP_READ_BIT, 0);
        assert_ne!(bits & glow::MAP_WRITE_BIT, 0);
        assert_ne!(bits & glow::MAP_PERSISTENT_BIT, 0);

        let transient = MapAccess::ReadWrite.range_bits(StorageFlags::MAP_READ | StorageFlags::MAP_WRITE);
        assert_eq!(transient & glow::MAP_PERSISTENT_BIT, 0);
    }
}
