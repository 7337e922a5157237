//! Acceleration structures are one of the components at the heart of
//! any ray tracer. Without algorithms to reduce the number of
//! unnecessary ray intersection tests, tracing a single ray through a
//! scene would take time linear in the number of primitives in the
//! scene, since the ray would need to be tested against each
//! primitive in turn to find the closest intersection.
//!
//! - LinearBVH (Morton codes and a binary radix tree, built in parallel)
//! - BVHAccel (recursive surface area heuristic)
//!
//! ```rust
//! use rs_lbvh::accelerators::{create_accelerator, AcceleratorKind, AcceleratorOptions};
//! use rs_lbvh::core::geometry::{Point3f, Ray, Vector3f};
//! use rs_lbvh::shapes::triangle::TriangleMesh;
//!
//!     let mesh = TriangleMesh::from_triangles(&[
//!         [
//!             Point3f::new(0.0, 0.0, 0.0),
//!             Point3f::new(1.0, 0.0, 0.0),
//!             Point3f::new(1.0, 1.0, 0.0),
//!         ],
//!         [
//!             Point3f::new(0.0, 0.0, 0.0),
//!             Point3f::new(1.0, 1.0, 0.0),
//!             Point3f::new(0.0, 1.0, 0.0),
//!         ],
//!     ]);
//!     let options = AcceleratorOptions {
//!         kind: AcceleratorKind::from_name("lbvh"),
//!         ..AcceleratorOptions::default()
//!     };
//!     let accel = create_accelerator(&mesh, &options).unwrap();
//!     let ray = Ray::new(
//!         Point3f::new(0.25, 0.75, 1.0),
//!         Vector3f::new(0.0, 0.0, -1.0),
//!     );
//!
//!     assert_eq!(accel.intersect(&mesh, &ray).unwrap().face_id, 1);
//! ```

pub mod bvh;
pub mod lbvh;
pub mod morton;
pub mod radix_sort;

// others
use log::warn;
// lbvh
use crate::accelerators::bvh::{BVHAccel, SAHOptions};
use crate::accelerators::lbvh::{LBVHOptions, LinearBVH};
use crate::core::accelerator::SpacePartitioner;
use crate::core::error::BuildError;
use crate::core::mesh::Mesh;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AcceleratorKind {
    LBVH,
    SAH,
}

impl Default for AcceleratorKind {
    fn default() -> Self {
        AcceleratorKind::LBVH
    }
}

impl AcceleratorKind {
    /// Unknown names fall back to "lbvh" with a warning.
    pub fn from_name(name: &str) -> AcceleratorKind {
        if name == "lbvh" {
            AcceleratorKind::LBVH
        } else if name == "sah" || name == "bvh" {
            AcceleratorKind::SAH
        } else {
            warn!("Accelerator \"{}\" unknown.  Using \"lbvh\".", name);
            AcceleratorKind::LBVH
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct AcceleratorOptions {
    pub kind: AcceleratorKind,
    pub lbvh: LBVHOptions,
    pub sah: SAHOptions,
}

pub fn create_accelerator(
    mesh: &dyn Mesh,
    options: &AcceleratorOptions,
) -> Result<Box<dyn SpacePartitioner>, BuildError> {
    Ok(match options.kind {
        AcceleratorKind::LBVH => Box::new(LinearBVH::new(mesh, &options.lbvh)?),
        AcceleratorKind::SAH => Box::new(BVHAccel::new(mesh, &options.sah)?),
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn names_are_parsed_with_fallback() {
        assert_eq!(AcceleratorKind::from_name("lbvh"), AcceleratorKind::LBVH);
        assert_eq!(AcceleratorKind::from_name("sah"), AcceleratorKind::SAH);
        assert_eq!(AcceleratorKind::from_name("kdtree"), AcceleratorKind::LBVH);
    }
}
