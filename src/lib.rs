//! # rs_lbvh
//!
//! [Rust][rust] crate to build linear bounding volume hierarchies
//! (LBVH) over triangle meshes and answer ray queries with them.
//!
//! Triangles are ordered along a 3D Morton curve, sorted with a binary
//! radix sort, and a binary radix tree is derived from the sorted keys
//! following Karras, "Maximizing Parallelism in the Construction of
//! BVHs, Octrees, and k-d Trees" (HPG 2012). Bounding boxes are then
//! combined bottom-up, in parallel, with one first-arrival flag per
//! internal node. The [LinearBVH] and the surface area heuristic
//! [BVHAccel] both implement the [SpacePartitioner] query contract.
//!
//! [rust]: https://www.rust-lang.org
//! [LinearBVH]: accelerators/lbvh/struct.LinearBVH.html
//! [BVHAccel]: accelerators/bvh/struct.BVHAccel.html
//! [SpacePartitioner]: core/accelerator/trait.SpacePartitioner.html

#[macro_use] extern crate impl_ops;

pub mod accelerators;
pub mod blockqueue;
pub mod core;
pub mod shapes;
