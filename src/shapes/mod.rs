//! While a natural representation would be to have a **Triangle**
//! shape implementation where each triangle stored the positions of
//! its three vertices, a more memory-efficient representation is to
//! separately store entire triangle meshes with an array of vertex
//! positions where each individual triangle just stores three offsets
//! into this array for its three vertices.
//!
//! - TriangleMesh (implements **Mesh**)
//! - PLY files are read into a **TriangleMesh** by the plymesh module

pub mod plymesh;
pub mod triangle;
