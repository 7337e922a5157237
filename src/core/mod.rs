//! The core of the library: basic types shared by all acceleration
//! structures.
//!
//! - pbrt: **Float**, error bounds and small numeric helpers
//! - geometry: points, vectors, normals, rays and bounding boxes
//! - mesh: the **Mesh** trait, the only view of the triangles an
//!   acceleration structure gets
//! - accelerator: the **SpacePartitioner** query contract
//! - interaction: the closest hit returned by a query
//! - parallel: first-arrival flags for bottom-up reductions
//! - error: build and mesh loading errors

pub mod accelerator;
pub mod error;
pub mod geometry;
pub mod interaction;
pub mod mesh;
pub mod parallel;
pub mod pbrt;
