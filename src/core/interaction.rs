// lbvh
use crate::core::geometry::{Normal3f, Point3f, Ray};
use crate::core::mesh::{MaterialId, Mesh, TriangleHit};
use crate::core::pbrt::Float;

// see interaction.h

/// The closest hit found along a ray.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Intersection {
    /// parametric distance along the ray
    pub t: Float,
    /// barycentric coordinates with respect to vertices 1 and 2
    pub u: Float,
    pub v: Float,
    pub face_id: usize,
    pub material: MaterialId,
    /// hit point in world space
    pub p: Point3f,
    pub n: Normal3f,
}

impl Intersection {
    pub fn new(mesh: &dyn Mesh, ray: &Ray, face_id: usize, hit: &TriangleHit) -> Self {
        Intersection {
            t: hit.t,
            u: hit.u,
            v: hit.v,
            face_id,
            material: mesh.material_of(face_id),
            p: ray.position(hit.t),
            n: mesh.normal_of(face_id),
        }
    }
}
