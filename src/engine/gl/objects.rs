use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::mem::{ align_of, size_of };
use std::ops::{ Deref, DerefMut };
use std::ptr::NonNull;
use std::rc::Rc;

use bytemuck::Pod;

use super::api::GraphicsApi;
use super::error::{ GlError, GlResult };
use super::handle::{ BufferKind, FramebufferKind, Handle, TextureKind, VertexArrayKind };
use super::types::{ AttributeFormat, IndexType, MapAccess, Name, PrimitiveMode, StorageFlags };

// ================================================================================================
// BUFFER
// ================================================================================================

/// Fixed-size GPU storage. The size is chosen at allocation and never changes.
#[derive(Debug)]
pub struct Buffer {
    handle: Handle<BufferKind>,
    name: Name,
    size: usize,
    flags: StorageFlags,
    persistent: Option<NonNull<u8>>,
}

impl Buffer {
    /// Zero-initialised storage of `size` bytes.
    pub fn allocate(api: &Rc<dyn GraphicsApi>, size: usize, flags: StorageFlags) -> GlResult<Self> {
        Self::with_storage(api, size, None, flags)
    }

    /// Storage sized for exactly one `T`.
    pub fn allocate_typed<T>(api: &Rc<dyn GraphicsApi>, flags: StorageFlags) -> GlResult<Self> {
        Self::allocate(api, size_of::<T>(), flags)
    }

    /// Storage sized for `count` consecutive `T`s.
    pub fn allocate_array<T>(api: &Rc<dyn GraphicsApi>, count: usize, flags: StorageFlags) -> GlResult<Self> {
        Self::allocate(api, size_of::<T>() * count, flags)
    }

    /// Upload-once storage initialised from `data`.
    pub fn store<T: Pod>(api: &Rc<dyn GraphicsApi>, data: &[T], flags: StorageFlags) -> GlResult<Self> {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        Self::with_storage(api, bytes.len(), Some(bytes), flags)
    }

    fn with_storage(
        api: &Rc<dyn GraphicsApi>,
        size: usize,
        data: Option<&[u8]>,
        flags: StorageFlags
    ) -> GlResult<Self> {
        if size == 0 {
            return Err(GlError::EmptyStorage { what: "buffer" });
        }

        let handle = Handle::<BufferKind>::create(api.clone(), ())?;
        let name = handle.name().ok_or_else(|| GlError::Allocation {
            kind: "buffer",
            reason: "driver returned no name".to_owned(),
        })?;
        api.buffer_storage(name, size, data, flags)?;
        log::debug!("buffer {name}: {size} bytes, flags {flags:?}");

        Ok(Self {
            handle,
            name,
            size,
            flags,
            persistent: None,
        })
    }

    pub fn name(&self) -> Name {
        self.name
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn flags(&self) -> StorageFlags {
        self.flags
    }

    /// Views the whole buffer as `[T]` in host memory.
    ///
    /// Persistently mappable storage is mapped once and stays mapped until
    /// the buffer is deleted; anything else is unmapped when the returned
    /// view is dropped. Writes through a coherent persistent mapping become
    /// visible to the next draw without further synchronisation.
    pub fn map_as<T: Pod>(&mut self, access: MapAccess) -> GlResult<BufferMapping<'_, T>> {
        let required = access.required_flags();
        if !self.flags.contains(required) {
            return Err(GlError::MissingCapability {
                required,
                available: self.flags,
            });
        }

        let element = size_of::<T>();
        if element == 0 || self.size % element != 0 {
            return Err(GlError::MisalignedMapping {
                size: self.size,
                element,
            });
        }

        let persistent = self.flags.contains(StorageFlags::MAP_PERSISTENT);
        let ptr = match (persistent, self.persistent) {
            (true, Some(ptr)) => ptr,
            (true, None) => {
                let mapping = StorageFlags::MAP_READ |
                    StorageFlags::MAP_WRITE |
                    StorageFlags::MAP_PERSISTENT |
                    StorageFlags::MAP_COHERENT;
                let ptr = self.map_raw((self.flags & mapping).bits())?;
                self.persistent = Some(ptr);
                ptr
            }
            (false, _) => self.map_raw(access.range_bits(self.flags))?,
        };

        if (ptr.as_ptr() as usize) % align_of::<T>() != 0 {
            if !persistent {
                self.handle.api().unmap_buffer(self.name);
            }
            return Err(GlError::MisalignedMapping {
                size: self.size,
                element,
            });
        }

        let len = self.size / element;
        Ok(BufferMapping {
            buffer: self,
            ptr: ptr.cast(),
            len,
            unmap_on_drop: !persistent,
            marker: PhantomData,
        })
    }

    fn map_raw(&self, bits: u32) -> GlResult<NonNull<u8>> {
        let ptr = self.handle.api().map_buffer(self.name, 0, self.size, bits)?;
        NonNull::new(ptr).ok_or(GlError::MapFailed)
    }

    /// Binds the whole buffer to the indexed uniform block `slot`.
    pub fn bind_uniform(&self, slot: u32) {
        self.handle.api().bind_uniform_buffer(slot, self.name);
    }
}

/// Host view of a mapped [`Buffer`]; cannot outlive it.
pub struct BufferMapping<'a, T> {
    buffer: &'a Buffer,
    ptr: NonNull<T>,
    len: usize,
    unmap_on_drop: bool,
    marker: PhantomData<&'a mut [T]>,
}

impl<T: Pod> Deref for BufferMapping<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        // The mapping covers `len` aligned elements and lives as long as the
        // exclusive borrow of the buffer.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl<T: Pod> DerefMut for BufferMapping<'_, T> {
    fn deref_mut(&mut self) -> &mut [T] {
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<T> Drop for BufferMapping<'_, T> {
    fn drop(&mut self) {
        if self.unmap_on_drop {
            self.buffer.handle.api().unmap_buffer(self.buffer.name);
        }
    }
}

// ================================================================================================
// VERTEX ARRAY
// ================================================================================================

/// What has been declared so far for one vertex attribute.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AttributeState {
    pub enabled: bool,
    pub format: Option<AttributeFormat>,
    pub slot: Option<u32>,
}

impl AttributeState {
    pub fn is_complete(&self) -> bool {
        self.enabled && self.format.is_some() && self.slot.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotBinding {
    pub buffer: Name,
    pub offset: usize,
    pub stride: usize,
}

/// Binds vertex buffers, an index buffer and attribute layouts together.
///
/// Buffers are referenced by name only: the caller keeps every bound
/// buffer alive for as long as this vertex array draws from it.
#[derive(Debug)]
pub struct VertexArray {
    handle: Handle<VertexArrayKind>,
    name: Name,
    attributes: BTreeMap<u32, AttributeState>,
    slots: BTreeMap<u32, SlotBinding>,
    index_buffer: Option<Name>,
}

impl VertexArray {
    pub fn new(api: &Rc<dyn GraphicsApi>) -> GlResult<Self> {
        let handle = Handle::<VertexArrayKind>::create(api.clone(), ())?;
        let name = handle.name().ok_or_else(|| GlError::Allocation {
            kind: "vertex array",
            reason: "driver returned no name".to_owned(),
        })?;

        Ok(Self {
            handle,
            name,
            attributes: BTreeMap::new(),
            slots: BTreeMap::new(),
            index_buffer: None,
        })
    }

    pub fn name(&self) -> Name {
        self.name
    }

    pub fn bind_vertex_buffer(&mut self, slot: u32, buffer: &Buffer, offset: usize, stride: usize) -> GlResult<()> {
        self.handle.api().vertex_array_vertex_buffer(self.name, slot, buffer.name(), offset, stride)?;
        self.slots.insert(slot, SlotBinding {
            buffer: buffer.name(),
            offset,
            stride,
        });
        Ok(())
    }

    /// Binds `buffer` with the stride of one `V`.
    pub fn bind_vertex_buffer_for<V>(&mut self, slot: u32, buffer: &Buffer, offset: usize) -> GlResult<()> {
        self.bind_vertex_buffer(slot, buffer, offset, size_of::<V>())
    }

    pub fn bind_index_buffer(&mut self, buffer: &Buffer) {
        self.handle.api().vertex_array_element_buffer(self.name, buffer.name());
        self.index_buffer = Some(buffer.name());
    }

    pub fn enable_attribute(&mut self, index: u32) {
        self.handle.api().enable_vertex_array_attrib(self.name, index);
        self.attributes.entry(index).or_default().enabled = true;
    }

    /// GL fetches 1 to 4 components per attribute; anything else is rejected
    /// before it reaches the driver.
    pub fn format_attribute(&mut self, index: u32, format: AttributeFormat) -> GlResult<()> {
        if !(1..=4).contains(&format.components) {
            return Err(GlError::InvalidAttributeFormat {
                index,
                components: format.components,
            });
        }
        self.handle.api().vertex_array_attrib_format(self.name, index, format);
        self.attributes.entry(index).or_default().format = Some(format);
        Ok(())
    }

    pub fn bind_attribute(&mut self, index: u32, slot: u32) {
        self.handle.api().vertex_array_attrib_binding(self.name, index, slot);
        self.attributes.entry(index).or_default().slot = Some(slot);
    }

    pub fn attribute(&self, index: u32) -> Option<&AttributeState> {
        self.attributes.get(&index)
    }

    pub fn slot(&self, slot: u32) -> Option<&SlotBinding> {
        self.slots.get(&slot)
    }

    pub fn index_buffer(&self) -> Option<Name> {
        self.index_buffer
    }

    /// Checks that every attribute touched so far can be fetched.
    pub fn validate(&self) -> GlResult<()> {
        for (&index, state) in &self.attributes {
            if !state.is_complete() {
                return Err(GlError::IncompleteAttribute {
                    index,
                    enabled: state.enabled,
                    formatted: state.format.is_some(),
                    slot: state.slot,
                });
            }
            if let Some(slot) = state.slot {
                if !self.slots.contains_key(&slot) {
                    return Err(GlError::UnboundSlot { index, slot });
                }
            }
        }
        Ok(())
    }

    /// Indexed draw with whatever program is currently in use.
    pub fn draw_elements(
        &self,
        mode: PrimitiveMode,
        count: usize,
        index_type: IndexType,
        offset: usize
    ) -> GlResult<()> {
        self.validate()?;
        if self.index_buffer.is_none() {
            return Err(GlError::NoIndexBuffer { index_type });
        }
        self.handle.api().draw_elements(self.name, mode, count, index_type, offset)
    }
}

// ================================================================================================
// TEXTURE / FRAMEBUFFER
// ================================================================================================

#[derive(Debug)]
pub struct Texture {
    handle: Handle<TextureKind>,
}

impl Texture {
    pub fn new(api: &Rc<dyn GraphicsApi>) -> GlResult<Self> {
        Ok(Self {
            handle: Handle::create(api.clone(), ())?,
        })
    }

    pub fn name(&self) -> Option<Name> {
        self.handle.name()
    }
}

#[derive(Debug)]
pub struct Framebuffer {
    handle: Handle<FramebufferKind>,
}

impl Framebuffer {
    pub fn new(api: &Rc<dyn GraphicsApi>) -> GlResult<Self> {
        Ok(Self {
            handle: Handle::create(api.clone(), ())?,
        })
    }

    pub fn name(&self) -> Option<Name> {
        self.handle.name()
    }
}
