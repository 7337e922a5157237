//! Errors reported to callers. Building an acceleration structure and
//! loading a mesh can fail; traversal never does.

use thiserror::Error;

/// Reasons an acceleration structure cannot be built for a mesh.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BuildError {
    /// The radix tree needs at least two primitives.
    #[error("at least 2 triangles are required to build a hierarchy, got {count}")]
    TooFewPrimitives { count: usize },
    /// Some vertex is NaN or infinite.
    #[error("scene bounding box is not finite (triangle {face} has a non-finite vertex)")]
    NonFiniteBounds { face: usize },
}

/// Reasons a triangle mesh cannot be read.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("I/O error while reading mesh: {0}")]
    Io(#[from] std::io::Error),
    #[error("PLY file has no \"{0}\" element")]
    MissingElement(&'static str),
    #[error("vertex {index} has no usable \"{property}\" property")]
    MissingProperty {
        index: usize,
        property: &'static str,
    },
    #[error("face {face} has {count} vertices, at least 3 are required")]
    FaceArity { face: usize, count: usize },
    #[error("face {face} references vertex {vertex}, but the mesh has {n_vertices} vertices")]
    IndexOutOfRange {
        face: usize,
        vertex: usize,
        n_vertices: usize,
    },
    #[error("vertex index count {0} is not a multiple of 3")]
    IndexCount(usize),
    #[error("{n_normals} normals given for {n_vertices} vertices")]
    NormalCount { n_normals: usize, n_vertices: usize },
    #[error("{n_materials} material ids given for {n_triangles} triangles")]
    MaterialCount {
        n_materials: usize,
        n_triangles: usize,
    },
}
