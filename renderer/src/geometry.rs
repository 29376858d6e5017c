//! Static cube mesh.

use bytemuck::{Pod, Zeroable};

use crate::backend::{Format, VertexAttribute};

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

const fn vertex(position: [f32; 3], color: [f32; 3]) -> Vertex {
    Vertex { position, color }
}

pub const CUBE_VERTICES: [Vertex; 8] = [
    vertex([-1.0, -1.0, -1.0], [0.0, 0.0, 0.0]),
    vertex([-1.0, 1.0, -1.0], [0.0, 1.0, 0.0]),
    vertex([1.0, 1.0, -1.0], [1.0, 1.0, 0.0]),
    vertex([1.0, -1.0, -1.0], [1.0, 0.0, 0.0]),
    vertex([-1.0, -1.0, 1.0], [0.0, 0.0, 1.0]),
    vertex([-1.0, 1.0, 1.0], [0.0, 1.0, 1.0]),
    vertex([1.0, 1.0, 1.0], [1.0, 1.0, 1.0]),
    vertex([1.0, -1.0, 1.0], [1.0, 0.0, 1.0]),
];

#[rustfmt::skip]
pub const CUBE_INDICES: [u16; 36] = [
    0, 1, 2, 0, 2, 3,
    4, 6, 5, 4, 7, 6,
    4, 5, 1, 4, 1, 0,
    3, 2, 6, 3, 6, 7,
    1, 5, 6, 1, 6, 2,
    4, 0, 3, 4, 3, 7,
];

pub const VERTEX_LAYOUT: [VertexAttribute; 2] = [
    VertexAttribute {
        semantic: "POSITION",
        format: Format::Rgb32Float,
        offset: 0,
    },
    VertexAttribute {
        semantic: "COLOR",
        format: Format::Rgb32Float,
        offset: 12,
    },
];
