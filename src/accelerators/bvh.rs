// std
use std::time::Instant;
// others
use log::info;
use typed_arena::Arena;
// lbvh
use crate::core::accelerator::SpacePartitioner;
use crate::core::error::BuildError;
use crate::core::geometry::{bnd3_union_bnd3f, bnd3_union_pnt3f};
use crate::core::geometry::{Bounds3f, Point3f, Ray, Vector3f, XYZEnum};
use crate::core::interaction::Intersection;
use crate::core::mesh::{Mesh, TriangleHit};
use crate::core::pbrt::Float;

// see bvh.h

const N_BUCKETS: usize = 12;

#[derive(Debug, Clone)]
pub struct SAHOptions {
    /// leaves hold at most this many triangles (capped at 255), unless
    /// their centroids coincide
    pub max_prims_in_node: usize,
}

impl Default for SAHOptions {
    fn default() -> Self {
        SAHOptions {
            max_prims_in_node: 4,
        }
    }
}

#[derive(Debug, Default, Copy, Clone)]
pub struct BVHPrimitiveInfo {
    primitive_number: usize,
    bounds: Bounds3f,
    centroid: Point3f,
}

impl BVHPrimitiveInfo {
    pub fn new(primitive_number: usize, bounds: Bounds3f) -> Self {
        BVHPrimitiveInfo {
            primitive_number,
            bounds,
            centroid: bounds.p_min * 0.5 + bounds.p_max * 0.5,
        }
    }
}

#[derive(Debug)]
pub struct BVHBuildNode<'a> {
    pub bounds: Bounds3f,
    pub child1: Option<&'a mut BVHBuildNode<'a>>,
    pub child2: Option<&'a mut BVHBuildNode<'a>>,
    pub split_axis: u8,
    pub first_prim_offset: usize,
    pub n_primitives: usize,
}

impl<'a> Default for BVHBuildNode<'a> {
    fn default() -> Self {
        BVHBuildNode {
            bounds: Bounds3f::default(),
            child1: None,
            child2: None,
            split_axis: 0_u8,
            first_prim_offset: 0_usize,
            n_primitives: 0_usize,
        }
    }
}

impl<'a> BVHBuildNode<'a> {
    pub fn init_leaf(&mut self, first: usize, n: usize, b: &Bounds3f) {
        self.first_prim_offset = first;
        self.n_primitives = n;
        self.bounds = *b;
        self.child1 = None;
        self.child2 = None;
    }
    pub fn init_interior(
        &mut self,
        axis: u8,
        c0: &'a mut BVHBuildNode<'a>,
        c1: &'a mut BVHBuildNode<'a>,
    ) {
        self.n_primitives = 0;
        self.bounds = bnd3_union_bnd3f(&c0.bounds, &c1.bounds);
        self.child1 = Some(c0);
        self.child2 = Some(c1);
        self.split_axis = axis;
    }
}

#[derive(Debug, Copy, Clone)]
struct BucketInfo {
    count: usize,
    bounds: Bounds3f,
}

impl Default for BucketInfo {
    fn default() -> Self {
        BucketInfo {
            count: 0_usize,
            bounds: Bounds3f::default(),
        }
    }
}

#[derive(Debug, Default, Copy, Clone)]
pub struct LinearBVHNode {
    bounds: Bounds3f,
    // leaf: offset of the first primitive
    // interior: offset of the second child
    offset: usize,
    n_primitives: usize,
    axis: u8,
}

/// Recursive surface area heuristic BVH over the triangles of a mesh,
/// flattened into depth-first order: the first child of an interior
/// node directly follows it.
pub struct BVHAccel {
    max_prims_in_node: usize,
    /// triangle numbers, reordered so that every leaf covers a range
    pub primitives: Vec<usize>,
    /// triangle bounds, in the order of **primitives**
    primitive_bounds: Vec<Bounds3f>,
    pub nodes: Vec<LinearBVHNode>,
}

impl BVHAccel {
    pub fn new(mesh: &dyn Mesh, options: &SAHOptions) -> Result<Self, BuildError> {
        let num_prims: usize = mesh.triangle_count();
        if num_prims < 2 {
            return Err(BuildError::TooFewPrimitives { count: num_prims });
        }
        if let Some(face) = mesh.first_non_finite_triangle() {
            return Err(BuildError::NonFiniteBounds { face });
        }
        let max_prims_in_node: usize = options.max_prims_in_node.clamp(1, 255);
        let mut primitive_info: Vec<BVHPrimitiveInfo> = (0..num_prims)
            .map(|i| BVHPrimitiveInfo::new(i, mesh.triangle_bound(i)))
            .collect();
        let start = Instant::now();
        let arena: Arena<BVHBuildNode> = Arena::with_capacity(2 * num_prims);
        let mut total_nodes: usize = 0;
        let mut ordered_prims: Vec<usize> = Vec::with_capacity(num_prims);
        let root = BVHAccel::recursive_build(
            &arena,
            &mut primitive_info,
            0,
            num_prims,
            max_prims_in_node,
            &mut total_nodes,
            &mut ordered_prims,
        );
        // flatten first
        let mut nodes = vec![LinearBVHNode::default(); total_nodes];
        let mut offset: usize = 0;
        BVHAccel::flatten_bvh_tree(root, &mut nodes, &mut offset);
        debug_assert_eq!(offset, total_nodes);
        let primitive_bounds: Vec<Bounds3f> = ordered_prims
            .iter()
            .map(|&prim_num| mesh.triangle_bound(prim_num))
            .collect();
        info!(
            "SAH BVH: {} primitives, {} nodes, built in {:?}",
            num_prims,
            total_nodes,
            start.elapsed()
        );
        let bvh = BVHAccel {
            max_prims_in_node,
            primitives: ordered_prims,
            primitive_bounds,
            nodes,
        };
        debug_assert!(bvh.is_valid(), "SAH BVH violates the containment invariant");
        Ok(bvh)
    }
    pub fn max_prims_in_node(&self) -> usize {
        self.max_prims_in_node
    }
    pub fn recursive_build<'a>(
        arena: &'a Arena<BVHBuildNode<'a>>,
        primitive_info: &mut Vec<BVHPrimitiveInfo>,
        start: usize,
        end: usize,
        max_prims_in_node: usize,
        total_nodes: &mut usize,
        ordered_prims: &mut Vec<usize>,
    ) -> &'a mut BVHBuildNode<'a> {
        assert_ne!(start, end);
        let node: &mut BVHBuildNode<'a> = arena.alloc(BVHBuildNode::default());
        *total_nodes += 1_usize;
        // compute bounds of all primitives in BVH node
        let mut bounds: Bounds3f = Bounds3f::default();
        for info in &primitive_info[start..end] {
            bounds = bnd3_union_bnd3f(&bounds, &info.bounds);
        }
        let n_primitives: usize = end - start;
        let mut make_leaf = |node: &mut BVHBuildNode<'a>, primitive_info: &[BVHPrimitiveInfo]| {
            let first_prim_offset: usize = ordered_prims.len();
            for info in &primitive_info[start..end] {
                ordered_prims.push(info.primitive_number);
            }
            node.init_leaf(first_prim_offset, n_primitives, &bounds);
        };
        if n_primitives == 1 {
            // create leaf _BVHBuildNode_
            make_leaf(&mut *node, &primitive_info[..]);
            return node;
        }
        // compute bound of primitive centroids, choose split dimension _dim_
        let mut centroid_bounds: Bounds3f = Bounds3f::default();
        for info in &primitive_info[start..end] {
            centroid_bounds = bnd3_union_pnt3f(&centroid_bounds, &info.centroid);
        }
        let dim: u8 = centroid_bounds.maximum_extent();
        let axis: XYZEnum = XYZEnum::from_axis(dim);
        if centroid_bounds.p_max[axis] == centroid_bounds.p_min[axis] {
            // create leaf _BVHBuildNode_
            make_leaf(&mut *node, &primitive_info[..]);
            return node;
        }
        // partition primitives into two sets and build children
        let mid: usize;
        if n_primitives <= 2 {
            mid = (start + end) / 2;
            if primitive_info[end - 1].centroid[axis] < primitive_info[start].centroid[axis] {
                primitive_info.swap(start, end - 1);
            }
        } else {
            let bucket_of = |centroid: &Point3f| -> usize {
                let b: usize =
                    (N_BUCKETS as Float * centroid_bounds.offset(centroid)[axis]) as usize;
                b.min(N_BUCKETS - 1)
            };
            // initialize _BucketInfo_ for SAH partition buckets
            let mut buckets: [BucketInfo; N_BUCKETS] = [BucketInfo::default(); N_BUCKETS];
            for info in &primitive_info[start..end] {
                let b: usize = bucket_of(&info.centroid);
                buckets[b].count += 1;
                buckets[b].bounds = bnd3_union_bnd3f(&buckets[b].bounds, &info.bounds);
            }
            // compute costs for splitting after each bucket
            let mut cost: [Float; N_BUCKETS - 1] = [0.0; N_BUCKETS - 1];
            for (i, c) in cost.iter_mut().enumerate() {
                let mut b0: Bounds3f = Bounds3f::default();
                let mut b1: Bounds3f = Bounds3f::default();
                let mut count0: usize = 0;
                let mut count1: usize = 0;
                for bucket in &buckets[..=i] {
                    b0 = bnd3_union_bnd3f(&b0, &bucket.bounds);
                    count0 += bucket.count;
                }
                for bucket in &buckets[(i + 1)..] {
                    b1 = bnd3_union_bnd3f(&b1, &bucket.bounds);
                    count1 += bucket.count;
                }
                // an empty side has no area, not the area of an inverted box
                let area0: Float = if count0 > 0 { b0.surface_area() } else { 0.0 };
                let area1: Float = if count1 > 0 { b1.surface_area() } else { 0.0 };
                *c = 1.0 + (count0 as Float * area0 + count1 as Float * area1) / bounds.surface_area();
            }
            // find bucket to split at that minimizes SAH metric
            let mut min_cost: Float = cost[0];
            let mut min_cost_split_bucket: usize = 0;
            for (i, &c) in cost.iter().enumerate() {
                if c < min_cost {
                    min_cost = c;
                    min_cost_split_bucket = i;
                }
            }
            // either create leaf or split primitives at selected SAH bucket
            let leaf_cost: Float = n_primitives as Float;
            if n_primitives > max_prims_in_node || min_cost < leaf_cost {
                let (left, right): (Vec<BVHPrimitiveInfo>, Vec<BVHPrimitiveInfo>) = primitive_info
                    [start..end]
                    .iter()
                    .copied()
                    .partition(|pi| bucket_of(&pi.centroid) <= min_cost_split_bucket);
                mid = start + left.len();
                primitive_info[start..mid].copy_from_slice(&left);
                primitive_info[mid..end].copy_from_slice(&right);
            } else {
                // create leaf _BVHBuildNode_
                make_leaf(&mut *node, &primitive_info[..]);
                return node;
            }
        }
        let c0 = BVHAccel::recursive_build(
            arena,
            primitive_info,
            start,
            mid,
            max_prims_in_node,
            total_nodes,
            ordered_prims,
        );
        let c1 = BVHAccel::recursive_build(
            arena,
            primitive_info,
            mid,
            end,
            max_prims_in_node,
            total_nodes,
            ordered_prims,
        );
        node.init_interior(dim, c0, c1);
        node
    }
    fn flatten_bvh_tree<'a>(
        node: &mut BVHBuildNode<'a>,
        nodes: &mut Vec<LinearBVHNode>,
        offset: &mut usize,
    ) -> usize {
        let my_offset: usize = *offset;
        *offset += 1;
        if node.n_primitives > 0 {
            // leaf
            nodes[my_offset] = LinearBVHNode {
                bounds: node.bounds,
                offset: node.first_prim_offset,
                n_primitives: node.n_primitives,
                axis: 0_u8,
            };
        } else {
            // interior
            if let Some(ref mut child1) = node.child1 {
                BVHAccel::flatten_bvh_tree(child1, nodes, offset);
            }
            if let Some(ref mut child2) = node.child2 {
                nodes[my_offset] = LinearBVHNode {
                    bounds: node.bounds,
                    offset: BVHAccel::flatten_bvh_tree(child2, nodes, offset),
                    n_primitives: 0_usize,
                    axis: node.split_axis,
                };
            }
        }
        my_offset
    }
    fn check_node(&self, index: usize) -> bool {
        let node: &LinearBVHNode = &self.nodes[index];
        if node.bounds.is_empty() {
            return false;
        }
        if node.n_primitives > 0 {
            return self.primitive_bounds[node.offset..node.offset + node.n_primitives]
                .iter()
                .all(|b| node.bounds.contains_bounds_edge_inclusive(b));
        }
        let (first, second) = (index + 1, node.offset);
        node.bounds
            .contains_bounds_edge_inclusive(&self.nodes[first].bounds)
            && node
                .bounds
                .contains_bounds_edge_inclusive(&self.nodes[second].bounds)
            && self.check_node(first)
            && self.check_node(second)
    }
}

impl SpacePartitioner for BVHAccel {
    fn intersect(&self, mesh: &dyn Mesh, r: &Ray) -> Option<Intersection> {
        let mut ray: Ray = *r;
        let mut closest: Option<(usize, TriangleHit)> = None;
        let inv_dir: Vector3f = ray.inv_dir();
        let dir_is_neg: [u8; 3] = [
            (inv_dir.x < 0.0) as u8,
            (inv_dir.y < 0.0) as u8,
            (inv_dir.z < 0.0) as u8,
        ];
        // follow ray through BVH nodes to find primitive intersections
        let mut to_visit_offset: usize = 0;
        let mut current_node_index: usize = 0;
        let mut nodes_to_visit: [usize; 64] = [0_usize; 64];
        loop {
            let node: &LinearBVHNode = &self.nodes[current_node_index];
            // check ray against BVH node
            if node.bounds.intersect_p(&ray, &inv_dir) {
                if node.n_primitives > 0 {
                    // intersect ray with primitives in leaf BVH node
                    for &face in &self.primitives[node.offset..node.offset + node.n_primitives] {
                        if let Some(hit) = mesh.ray_triangle_test(&ray, face) {
                            // later hits have to be closer
                            ray.t_max = hit.t;
                            closest = Some((face, hit));
                        }
                    }
                    if to_visit_offset == 0 {
                        break;
                    }
                    to_visit_offset -= 1;
                    current_node_index = nodes_to_visit[to_visit_offset];
                } else {
                    // put far BVH node on _nodesToVisit_ stack,
                    // advance to near node
                    if dir_is_neg[node.axis as usize] == 1_u8 {
                        nodes_to_visit[to_visit_offset] = current_node_index + 1;
                        current_node_index = node.offset;
                    } else {
                        nodes_to_visit[to_visit_offset] = node.offset;
                        current_node_index += 1;
                    }
                    to_visit_offset += 1;
                }
            } else {
                if to_visit_offset == 0 {
                    break;
                }
                to_visit_offset -= 1;
                current_node_index = nodes_to_visit[to_visit_offset];
            }
        }
        closest.map(|(face, hit)| Intersection::new(mesh, r, face, &hit))
    }
    fn intersect_p(&self, mesh: &dyn Mesh, ray: &Ray) -> bool {
        let inv_dir: Vector3f = ray.inv_dir();
        let dir_is_neg: [u8; 3] = [
            (inv_dir.x < 0.0) as u8,
            (inv_dir.y < 0.0) as u8,
            (inv_dir.z < 0.0) as u8,
        ];
        let mut to_visit_offset: usize = 0;
        let mut current_node_index: usize = 0;
        let mut nodes_to_visit: [usize; 64] = [0_usize; 64];
        loop {
            let node: &LinearBVHNode = &self.nodes[current_node_index];
            if node.bounds.intersect_p(ray, &inv_dir) {
                // process BVH node _node_ for traversal
                if node.n_primitives > 0 {
                    for &face in &self.primitives[node.offset..node.offset + node.n_primitives] {
                        if mesh.ray_triangle_test(ray, face).is_some() {
                            return true;
                        }
                    }
                    if to_visit_offset == 0 {
                        break;
                    }
                    to_visit_offset -= 1;
                    current_node_index = nodes_to_visit[to_visit_offset];
                } else {
                    if dir_is_neg[node.axis as usize] == 1_u8 {
                        nodes_to_visit[to_visit_offset] = current_node_index + 1;
                        current_node_index = node.offset;
                    } else {
                        nodes_to_visit[to_visit_offset] = node.offset;
                        current_node_index += 1;
                    }
                    to_visit_offset += 1;
                }
            } else {
                if to_visit_offset == 0 {
                    break;
                }
                to_visit_offset -= 1;
                current_node_index = nodes_to_visit[to_visit_offset];
            }
        }
        false
    }
    fn is_valid(&self) -> bool {
        !self.nodes.is_empty() && self.check_node(0)
    }
    fn world_bound(&self) -> Bounds3f {
        if self.nodes.is_empty() {
            Bounds3f::default()
        } else {
            self.nodes[0].bounds
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shapes::triangle::TriangleMesh;

    fn strip(n: usize) -> TriangleMesh {
        let triangles: Vec<[Point3f; 3]> = (0..n)
            .map(|i| {
                let x = i as Float;
                [
                    Point3f::new(x, 0.0, 0.0),
                    Point3f::new(x + 1.0, 0.0, 0.0),
                    Point3f::new(x, 1.0, 0.0),
                ]
            })
            .collect();
        TriangleMesh::from_triangles(&triangles)
    }

    #[test]
    fn every_primitive_lands_in_exactly_one_leaf() {
        let bvh = BVHAccel::new(&strip(100), &SAHOptions::default()).unwrap();
        let mut seen: Vec<usize> = bvh.primitives.clone();
        seen.sort_unstable();
        assert_eq!(seen, (0..100).collect::<Vec<usize>>());
        assert!(bvh.is_valid());
    }

    #[test]
    fn closest_hit_on_strip() {
        let mesh = strip(32);
        let bvh = BVHAccel::new(&mesh, &SAHOptions::default()).unwrap();
        let ray = Ray::new(Point3f::new(10.25, 0.25, 5.0), Vector3f::new(0.0, 0.0, -1.0));
        let isect = bvh.intersect(&mesh, &ray).unwrap();
        assert_eq!(isect.face_id, 10);
        assert!(bvh.intersect_p(&mesh, &ray));
        let miss = Ray::new(Point3f::new(10.75, 0.75, 5.0), Vector3f::new(0.0, 0.0, -1.0));
        assert!(bvh.intersect(&mesh, &miss).is_none());
        assert!(!bvh.intersect_p(&mesh, &miss));
    }

    #[test]
    fn stacked_triangles_report_nearest() {
        let mut triangles: Vec<[Point3f; 3]> = Vec::new();
        for k in 0..8 {
            let z = k as Float;
            triangles.push([
                Point3f::new(0.0, 0.0, z),
                Point3f::new(1.0, 0.0, z),
                Point3f::new(0.0, 1.0, z),
            ]);
        }
        let mesh = TriangleMesh::from_triangles(&triangles);
        let bvh = BVHAccel::new(&mesh, &SAHOptions { max_prims_in_node: 1 }).unwrap();
        let down = Ray::new(Point3f::new(0.2, 0.2, 10.0), Vector3f::new(0.0, 0.0, -1.0));
        assert_eq!(bvh.intersect(&mesh, &down).unwrap().face_id, 7);
        let up = Ray::new(Point3f::new(0.2, 0.2, -10.0), Vector3f::new(0.0, 0.0, 1.0));
        assert_eq!(bvh.intersect(&mesh, &up).unwrap().face_id, 0);
    }

    #[test]
    fn identical_centroids_share_a_leaf() {
        let tri = [
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(0.0, 1.0, 0.0),
        ];
        let mesh = TriangleMesh::from_triangles(&[tri; 5]);
        let bvh = BVHAccel::new(&mesh, &SAHOptions { max_prims_in_node: 1 }).unwrap();
        assert_eq!(bvh.nodes.len(), 1);
        assert!(bvh.is_valid());
    }

    #[test]
    fn max_prims_is_capped() {
        let bvh = BVHAccel::new(&strip(4), &SAHOptions { max_prims_in_node: 1000 }).unwrap();
        assert_eq!(bvh.max_prims_in_node(), 255);
    }

    #[test]
    fn too_few_primitives() {
        assert_eq!(
            BVHAccel::new(&strip(1), &SAHOptions::default()).err(),
            Some(BuildError::TooFewPrimitives { count: 1 })
        );
    }
}
