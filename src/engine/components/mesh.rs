use std::mem::size_of;
use std::rc::Rc;

use bytemuck::Pod;

use crate::engine::gl::{
    AttributeFormat,
    Buffer,
    GlError,
    GlResult,
    GraphicsApi,
    IndexType,
    PrimitiveMode,
    StorageFlags,
    VertexArray,
};

/// A vertex made of `COMPONENTS` tightly packed 32-bit floats.
pub trait Vertex: Pod {
    const COMPONENTS: i32;
}

impl<const L: usize> Vertex for [f32; L] {
    const COMPONENTS: i32 = if L > i32::MAX as usize { i32::MAX } else { L as i32 };
}

/// Unsigned integer types GL accepts as index elements.
pub trait IndexElement: Pod {
    const TYPE: IndexType;

    fn as_usize(self) -> usize;
}

macro_rules! index_element {
    ($ty:ty, $index_type:expr) => {
        impl IndexElement for $ty {
            const TYPE: IndexType = $index_type;

            fn as_usize(self) -> usize {
                self as usize
            }
        }
    };
}

index_element!(u8, IndexType::U8);
index_element!(u16, IndexType::U16);
index_element!(u32, IndexType::U32);

const POSITION_ATTRIBUTE: u32 = 0;
const VERTEX_SLOT: u32 = 0;

/// One drawable object: its vertex array plus the storage it reads.
///
/// Field order matters: the vertex array is released before the buffers
/// it references.
#[derive(Debug)]
pub struct Mesh {
    vao: VertexArray,
    vertex_buffer: Buffer,
    index_buffer: Buffer,
    vertex_count: usize,
    index_count: usize,
    index_type: IndexType,
    index_offset: usize,
}

impl Mesh {
    /// Uploads `vertices` and `indices` and wires attribute 0 to the vertex layout.
    ///
    /// Every index must address one of `vertices`.
    pub fn build<V: Vertex, I: IndexElement>(
        api: &Rc<dyn GraphicsApi>,
        vertices: &[V],
        indices: &[I]
    ) -> GlResult<Self> {
        if let Some(index) = indices.iter().map(|&i| i.as_usize()).find(|&i| i >= vertices.len()) {
            return Err(GlError::IndexOutOfRange {
                index,
                vertex_count: vertices.len(),
            });
        }

        let vertex_buffer = Buffer::store(api, vertices, StorageFlags::DEFAULT_STORE)?;
        let index_buffer = Buffer::store(api, indices, StorageFlags::DEFAULT_STORE)?;

        let mut vao = VertexArray::new(api)?;
        vao.bind_vertex_buffer(VERTEX_SLOT, &vertex_buffer, 0, size_of::<V>())?;
        vao.bind_index_buffer(&index_buffer);
        vao.enable_attribute(POSITION_ATTRIBUTE);
        vao.format_attribute(POSITION_ATTRIBUTE, AttributeFormat::floats(V::COMPONENTS, 0))?;
        vao.bind_attribute(POSITION_ATTRIBUTE, VERTEX_SLOT);

        log::debug!(
            "mesh {}: {} vertices x {} floats, {} {:?} indices",
            vao.name(),
            vertices.len(),
            V::COMPONENTS,
            indices.len(),
            I::TYPE
        );

        Ok(Self {
            vao,
            vertex_buffer,
            index_buffer,
            vertex_count: vertices.len(),
            index_count: indices.len(),
            index_type: I::TYPE,
            index_offset: 0,
        })
    }

    /// Draws every index with the program and uniforms currently bound.
    pub fn draw(&self, mode: PrimitiveMode) -> GlResult<()> {
        self.vao.draw_elements(mode, self.index_count, self.index_type, self.index_offset)
    }

    pub fn vertex_array(&self) -> &VertexArray {
        &self.vao
    }

    pub fn vertex_buffer(&self) -> &Buffer {
        &self.vertex_buffer
    }

    pub fn index_buffer(&self) -> &Buffer {
        &self.index_buffer
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn index_count(&self) -> usize {
        self.index_count
    }

    pub fn index_type(&self) -> IndexType {
        self.index_type
    }

    pub fn index_offset(&self) -> usize {
        self.index_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::gl::testing::{ Call, RecordingApi };
    use crate::engine::gl::ComponentType;
    use crate::engine::utils::geometry::{ cube_triangles, cube_vertices, surface_mesh_data, torus };

    fn setup() -> (Rc<RecordingApi>, Rc<dyn GraphicsApi>) {
        let api = RecordingApi::new();
        let gl: Rc<dyn GraphicsApi> = api.clone();
        (api, gl)
    }

    #[test]
    fn cube_mesh_records_index_metadata() {
        let (_api, gl) = setup();
        let mesh = Mesh::build(&gl, &cube_vertices(), &cube_triangles()).unwrap();

        assert_eq!(mesh.index_count(), 36);
        assert_eq!(mesh.index_type(), IndexType::U32);
        assert_eq!(mesh.index_offset(), 0);
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.vertex_buffer().size(), 8 * 12);
        assert_eq!(mesh.index_buffer().size(), 36 * 4);
    }

    #[test]
    fn index_count_ignores_vertex_content() {
        let (_api, gl) = setup();
        let indices: Vec<u16> = (0..4).chain([0]).collect();
        let a = Mesh::build(&gl, &[[0.0f32; 3]; 4], &indices).unwrap();
        let b = Mesh::build(&gl, &[[9.0f32, -1.0]; 11], &indices).unwrap();

        assert_eq!(a.index_count(), 5);
        assert_eq!(b.index_count(), 5);
        assert_eq!(b.index_type(), IndexType::U16);
    }

    #[test]
    fn attribute_zero_matches_vertex_layout() {
        let (api, gl) = setup();
        let mesh = Mesh::build(&gl, &[[0.0f32; 4]; 3], &[0u8, 1, 2]).unwrap();
        let vao = mesh.vertex_array();
        let state = vao.attribute(0).unwrap();

        assert!(state.is_complete());
        assert_eq!(state.format, Some(AttributeFormat {
            components: 4,
            component_type: ComponentType::Float,
            normalized: false,
            relative_offset: 0,
        }));
        assert_eq!(vao.slot(0).unwrap().stride, 16);
        assert_eq!(vao.slot(0).unwrap().buffer, mesh.vertex_buffer().name());
        assert_eq!(vao.index_buffer(), Some(mesh.index_buffer().name()));
        assert!(api.calls().contains(&Call::AttribBinding {
            vertex_array: vao.name(),
            index: 0,
            slot: 0,
        }));
    }

    #[test]
    fn draw_submits_stored_metadata() {
        let (api, gl) = setup();
        let (vertices, indices) = surface_mesh_data(3, 3, torus);
        let mesh = Mesh::build(&gl, &vertices, &indices).unwrap();
        mesh.draw(PrimitiveMode::Triangles).unwrap();

        assert_eq!(api.calls().last(), Some(&Call::DrawElements {
            vertex_array: mesh.vertex_array().name(),
            mode: PrimitiveMode::Triangles,
            count: 24,
            index_type: IndexType::U32,
            offset: 0,
        }));
    }

    #[test]
    fn empty_input_is_rejected() {
        let (_api, gl) = setup();
        let no_indices: &[u32] = &[];

        assert!(matches!(
            Mesh::build(&gl, &cube_vertices(), no_indices),
            Err(GlError::EmptyStorage { .. })
        ));
    }

    #[test]
    fn wide_vertices_are_rejected_before_upload() {
        let (api, gl) = setup();

        assert!(matches!(
            Mesh::build(&gl, &[[0.0f32; 5]; 3], &[0u32, 1, 2]),
            Err(GlError::InvalidAttributeFormat { index: 0, components: 5 })
        ));
        // Everything created on the way is released again.
        let created = api
            .calls()
            .iter()
            .filter(|call| matches!(call, Call::CreateBuffer(_) | Call::CreateVertexArray(_)))
            .count();
        assert_eq!(api.deletions().len(), created);
        assert!(!api.calls().iter().any(|call| matches!(call, Call::AttribFormat { .. })));
    }

    #[test]
    fn indices_must_address_uploaded_vertices() {
        let (api, gl) = setup();

        assert!(matches!(
            Mesh::build(&gl, &[[0.0f32; 3]; 3], &[0u8, 1, 3]),
            Err(GlError::IndexOutOfRange { index: 3, vertex_count: 3 })
        ));
        assert!(api.calls().is_empty());
    }

    #[test]
    fn drop_releases_vertex_array_before_buffers() {
        let (api, gl) = setup();
        let mesh = Mesh::build(&gl, &cube_vertices(), &cube_triangles()).unwrap();
        let (vao, vbo, ibo) = (mesh.vertex_array().name(), mesh.vertex_buffer().name(), mesh.index_buffer().name());
        drop(mesh);

        assert_eq!(api.deletions(), vec![
            Call::DeleteVertexArray(vao),
            Call::DeleteBuffer(vbo),
            Call::DeleteBuffer(ibo),
        ]);
    }
}
