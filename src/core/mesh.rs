//! The boundary to whatever owns the triangles. Acceleration
//! structures only see a mesh through this trait: vertex positions to
//! bound and sort the triangles, and a ray/triangle test plus shading
//! attributes to answer queries.

// lbvh
use crate::core::geometry::{bnd3_union_pnt3f, Bounds3f, Normal3f, Point3f, Ray};
use crate::core::pbrt::Float;
use crate::shapes::triangle::moller_trumbore;

/// Opaque material handle, passed through to the caller untouched.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct MaterialId(pub u32);

/// Result of a single ray/triangle test: barycentric coordinates of
/// the hit and its parametric distance along the ray.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct TriangleHit {
    pub u: Float,
    pub v: Float,
    pub t: Float,
}

pub trait Mesh: Send + Sync {
    fn triangle_count(&self) -> usize;
    /// Position of corner *corner* (0, 1 or 2) of triangle *face*.
    fn vertex_of(&self, face: usize, corner: usize) -> Point3f;
    fn material_of(&self, face: usize) -> MaterialId;
    fn normal_of(&self, face: usize) -> Normal3f;
    fn triangle_bound(&self, face: usize) -> Bounds3f {
        bnd3_union_pnt3f(
            &Bounds3f::new(self.vertex_of(face, 0), self.vertex_of(face, 1)),
            &self.vertex_of(face, 2),
        )
    }
    /// First triangle with a NaN or infinite vertex, if any. Boxes
    /// cannot tell, **f32::min()** and **f32::max()** ignore NaN.
    fn first_non_finite_triangle(&self) -> Option<usize> {
        (0..self.triangle_count())
            .find(|&face| (0..3).any(|corner| !self.vertex_of(face, corner).is_finite()))
    }
    fn scene_bounding_box(&self) -> Bounds3f {
        let mut bounds: Bounds3f = Bounds3f::default();
        for face in 0..self.triangle_count() {
            for corner in 0..3 {
                bounds = bnd3_union_pnt3f(&bounds, &self.vertex_of(face, corner));
            }
        }
        bounds
    }
    fn ray_triangle_test(&self, ray: &Ray, face: usize) -> Option<TriangleHit> {
        moller_trumbore(
            ray,
            &self.vertex_of(face, 0),
            &self.vertex_of(face, 1),
            &self.vertex_of(face, 2),
        )
    }
}
