// lbvh
use crate::core::error::MeshError;
use crate::core::geometry::{vec3_cross_vec3, vec3_dot_vec3f};
use crate::core::geometry::{Normal3f, Point3f, Ray, Vector3f};
use crate::core::mesh::{MaterialId, Mesh, TriangleHit};
use crate::core::pbrt::{Float, PARALLEL_EPSILON};

// see triangle.h

/// Möller–Trumbore ray/triangle intersection.
///
/// Returns the barycentric coordinates *(u, v)* with respect to *p1*
/// and *p2* and the hit distance *t*. Rays (nearly) parallel to the
/// triangle's plane miss, and so do hits at `t <= 0` or beyond
/// `ray.t_max`.
pub fn moller_trumbore(
    ray: &Ray,
    p0: &Point3f,
    p1: &Point3f,
    p2: &Point3f,
) -> Option<TriangleHit> {
    // edge vectors
    let e1: Vector3f = p1 - p0;
    let e2: Vector3f = p2 - p0;
    let pvec: Vector3f = vec3_cross_vec3(&ray.d, &e2);
    let det: Float = vec3_dot_vec3f(&e1, &pvec);
    if det.abs() < PARALLEL_EPSILON {
        return None;
    }
    let inv_det: Float = 1.0 / det;
    let tvec: Vector3f = ray.o - p0;
    let u: Float = vec3_dot_vec3f(&tvec, &pvec) * inv_det;
    if u < 0.0 || u > 1.0 {
        return None;
    }
    let qvec: Vector3f = vec3_cross_vec3(&tvec, &e1);
    let v: Float = vec3_dot_vec3f(&ray.d, &qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t: Float = vec3_dot_vec3f(&e2, &qvec) * inv_det;
    if t <= 0.0 || t >= ray.t_max {
        return None;
    }
    Some(TriangleHit { u, v, t })
}

#[derive(Debug, Clone)]
pub struct TriangleMesh {
    /// the total number of triangles in the mesh
    pub n_triangles: usize,
    /// vector of vertex indices, three per triangle
    pub vertex_indices: Vec<usize>,
    /// vector of vertex positions
    pub p: Vec<Point3f>,
    /// an optional vector of per-vertex normals (can be empty)
    pub n: Vec<Normal3f>,
    /// an optional vector of per-triangle materials (can be empty)
    pub material_ids: Vec<MaterialId>,
}

impl TriangleMesh {
    pub fn new(
        vertex_indices: Vec<usize>,
        p: Vec<Point3f>,
        n: Vec<Normal3f>,
        material_ids: Vec<MaterialId>,
    ) -> Result<Self, MeshError> {
        if vertex_indices.len() % 3 != 0 {
            return Err(MeshError::IndexCount(vertex_indices.len()));
        }
        let n_triangles: usize = vertex_indices.len() / 3;
        if let Some((i, &vertex)) = vertex_indices
            .iter()
            .enumerate()
            .find(|(_, &vertex)| vertex >= p.len())
        {
            return Err(MeshError::IndexOutOfRange {
                face: i / 3,
                vertex,
                n_vertices: p.len(),
            });
        }
        if !n.is_empty() && n.len() != p.len() {
            return Err(MeshError::NormalCount {
                n_normals: n.len(),
                n_vertices: p.len(),
            });
        }
        if !material_ids.is_empty() && material_ids.len() != n_triangles {
            return Err(MeshError::MaterialCount {
                n_materials: material_ids.len(),
                n_triangles,
            });
        }
        Ok(TriangleMesh {
            n_triangles,
            vertex_indices,
            p,
            n,
            material_ids,
        })
    }
    /// A mesh without normals and materials, one triangle per entry of
    /// *triangles*.
    pub fn from_triangles(triangles: &[[Point3f; 3]]) -> Self {
        let p: Vec<Point3f> = triangles.iter().flat_map(|tri| tri.iter().copied()).collect();
        TriangleMesh {
            n_triangles: triangles.len(),
            vertex_indices: (0..p.len()).collect(),
            p,
            n: Vec::new(),
            material_ids: Vec::new(),
        }
    }
    /// Geometric normal, following the winding order p0 -> p1 -> p2.
    pub fn geometric_normal(&self, face: usize) -> Normal3f {
        let p0: Point3f = self.vertex_of(face, 0);
        let dp01: Vector3f = self.vertex_of(face, 1) - p0;
        let dp02: Vector3f = self.vertex_of(face, 2) - p0;
        let cross: Vector3f = vec3_cross_vec3(&dp01, &dp02);
        if cross.length_squared() == 0.0 {
            // degenerate triangle
            Normal3f::default()
        } else {
            Normal3f::from(cross.normalize())
        }
    }
}

impl Mesh for TriangleMesh {
    fn triangle_count(&self) -> usize {
        self.n_triangles
    }
    fn vertex_of(&self, face: usize, corner: usize) -> Point3f {
        self.p[self.vertex_indices[face * 3 + corner]]
    }
    fn material_of(&self, face: usize) -> MaterialId {
        if self.material_ids.is_empty() {
            MaterialId::default()
        } else {
            self.material_ids[face]
        }
    }
    fn normal_of(&self, face: usize) -> Normal3f {
        if self.n.is_empty() {
            return self.geometric_normal(face);
        }
        let sum: Normal3f = self.n[self.vertex_indices[face * 3]]
            + self.n[self.vertex_indices[face * 3 + 1]]
            + self.n[self.vertex_indices[face * 3 + 2]];
        if sum.length_squared() == 0.0 {
            self.geometric_normal(face)
        } else {
            sum.normalize()
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn unit_triangle() -> [Point3f; 3] {
        [
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn hit_reports_barycentrics_and_distance() {
        let [p0, p1, p2] = unit_triangle();
        let ray = Ray::new(Point3f::new(0.25, 0.5, -2.0), Vector3f::new(0.0, 0.0, 1.0));
        let hit = moller_trumbore(&ray, &p0, &p1, &p2).unwrap();
        assert_abs_diff_eq!(hit.u, 0.25, epsilon = 1.0e-6);
        assert_abs_diff_eq!(hit.v, 0.5, epsilon = 1.0e-6);
        assert_abs_diff_eq!(hit.t, 2.0, epsilon = 1.0e-6);
    }

    #[test]
    fn misses_outside_and_behind() {
        let [p0, p1, p2] = unit_triangle();
        let outside = Ray::new(Point3f::new(0.75, 0.75, -1.0), Vector3f::new(0.0, 0.0, 1.0));
        assert!(moller_trumbore(&outside, &p0, &p1, &p2).is_none());
        let behind = Ray::new(Point3f::new(0.25, 0.25, 1.0), Vector3f::new(0.0, 0.0, 1.0));
        assert!(moller_trumbore(&behind, &p0, &p1, &p2).is_none());
    }

    #[test]
    fn parallel_ray_misses() {
        let [p0, p1, p2] = unit_triangle();
        let grazing = Ray::new(Point3f::new(-1.0, 0.25, 0.0), Vector3f::new(1.0, 0.0, 0.0));
        assert!(moller_trumbore(&grazing, &p0, &p1, &p2).is_none());
    }

    #[test]
    fn t_max_limits_hits() {
        let [p0, p1, p2] = unit_triangle();
        let mut ray = Ray::new(Point3f::new(0.25, 0.25, -2.0), Vector3f::new(0.0, 0.0, 1.0));
        ray.t_max = 1.5;
        assert!(moller_trumbore(&ray, &p0, &p1, &p2).is_none());
    }

    #[test]
    fn new_validates_indices() {
        let p = unit_triangle().to_vec();
        assert!(matches!(
            TriangleMesh::new(vec![0, 1], p.clone(), Vec::new(), Vec::new()),
            Err(MeshError::IndexCount(2))
        ));
        assert!(matches!(
            TriangleMesh::new(vec![0, 1, 3], p.clone(), Vec::new(), Vec::new()),
            Err(MeshError::IndexOutOfRange { face: 0, vertex: 3, .. })
        ));
        assert!(matches!(
            TriangleMesh::new(vec![0, 1, 2], p.clone(), Vec::new(), vec![MaterialId(1); 2]),
            Err(MeshError::MaterialCount { .. })
        ));
        let mesh = TriangleMesh::new(vec![0, 1, 2], p, Vec::new(), vec![MaterialId(7)]).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.material_of(0), MaterialId(7));
    }

    #[test]
    fn normals_follow_winding_or_vertex_normals() {
        let mesh = TriangleMesh::from_triangles(&[unit_triangle()]);
        assert_eq!(mesh.normal_of(0), Normal3f { x: 0.0, y: 0.0, z: 1.0 });
        let up = Normal3f { x: 0.0, y: 1.0, z: 0.0 };
        let shaded = TriangleMesh::new(
            vec![0, 1, 2],
            unit_triangle().to_vec(),
            vec![up; 3],
            Vec::new(),
        )
        .unwrap();
        assert_eq!(shaded.normal_of(0), up);
    }

    #[test]
    fn scene_bounding_box_encloses_all_vertices() {
        let mesh = TriangleMesh::from_triangles(&[
            unit_triangle(),
            [
                Point3f::new(2.0, 2.0, 2.0),
                Point3f::new(3.0, 2.0, 2.0),
                Point3f::new(2.0, 3.0, -1.0),
            ],
        ]);
        let bounds = mesh.scene_bounding_box();
        assert_eq!(bounds.p_min, Point3f::new(0.0, 0.0, -1.0));
        assert_eq!(bounds.p_max, Point3f::new(3.0, 3.0, 2.0));
    }
}
