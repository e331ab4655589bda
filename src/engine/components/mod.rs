pub mod camera;
pub mod mesh;

pub use camera::{ Direction, FlyCamera };
pub use mesh::{ IndexElement, Mesh, Vertex };
