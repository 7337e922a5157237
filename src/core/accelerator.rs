//! The query contract every acceleration structure implements.

// lbvh
use crate::core::geometry::{Bounds3f, Ray};
use crate::core::interaction::Intersection;
use crate::core::mesh::Mesh;

/// A spatial index over the triangles of one mesh.
///
/// The index only stores triangle numbers, so every query takes the
/// mesh it was built from. Implementations are immutable after
/// construction and safe to query from many threads at once.
pub trait SpacePartitioner: Send + Sync {
    /// Closest hit with `0 < t < ray.t_max`, or **None**.
    fn intersect(&self, mesh: &dyn Mesh, ray: &Ray) -> Option<Intersection>;
    /// Is there any hit with `0 < t < ray.t_max`?
    fn intersect_p(&self, mesh: &dyn Mesh, ray: &Ray) -> bool;
    /// Recursively checks that every node's box encloses its children.
    fn is_valid(&self) -> bool;
    fn world_bound(&self) -> Bounds3f;
}
