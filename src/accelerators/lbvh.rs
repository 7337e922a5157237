//! Linear bounding volume hierarchy.
//!
//! Triangles are sorted along a 3D Morton curve and a binary radix
//! tree is derived from the sorted keys (Karras, "Maximizing
//! Parallelism in the Construction of BVHs, Octrees, and k-d Trees",
//! HPG 2012). Every internal node is computed independently of all
//! others, bounding boxes are then combined bottom-up, one upward walk
//! per leaf, and the first child to reach an internal node leaves the
//! combination to its sibling.
//!
//! For *N* triangles there are *N* leaves (in sorted order) and
//! *N - 1* internal nodes; internal node 0 is always the root.

// std
use std::sync::OnceLock;
use std::time::Instant;
// others
use log::{debug, info};
use rayon::prelude::*;
use smallvec::SmallVec;
// lbvh
use crate::accelerators::morton::PrimitiveIdentifier;
use crate::accelerators::radix_sort::{par_radix_sort, radix_sort};
use crate::core::accelerator::SpacePartitioner;
use crate::core::error::BuildError;
use crate::core::geometry::{bnd3_union_bnd3f, Bounds3f, Ray, Vector3f};
use crate::core::interaction::Intersection;
use crate::core::mesh::{Mesh, TriangleHit};
use crate::core::parallel::{Arrival, ArrivalGate};
use crate::core::pbrt::Float;

/// A child link. Leaf and internal node indices are separate ranges.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum NodeRef {
    /// index into the leaves, i.e. a position in Morton order
    Leaf(usize),
    /// index into the internal nodes
    Internal(usize),
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct LeafNode {
    pub parent_index: Option<usize>,
    pub primitive_index: usize,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct InternalNode {
    pub self_index: usize,
    pub left: NodeRef,
    pub right: NodeRef,
    pub parent_index: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct LBVHOptions {
    /// compute codes, nodes and bounds on the rayon thread pool
    pub parallel: bool,
    /// radix sort partitions longer than this are sorted concurrently
    pub parallel_sort_threshold: usize,
}

impl Default for LBVHOptions {
    fn default() -> Self {
        LBVHOptions {
            parallel: true,
            parallel_sort_threshold: 4096,
        }
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct BuildStats {
    pub primitives: usize,
    pub internal_nodes: usize,
    /// number of internal nodes on the longest root-to-leaf path
    pub max_depth: usize,
    /// adjacent sorted primitives sharing a Morton code
    pub duplicate_codes: usize,
}

/// Length of the common prefix of the keys at sorted positions *a*
/// and *b*, or -1 if *b* is out of range.
///
/// Equal Morton codes are told apart by their positions: the position
/// acts as a lower-order extension of the key, so the result is
/// `32 + clz(a ^ b)` and always longer than any prefix two different
/// codes can share.
pub fn common_prefix(codes: &[u32], a: i64, b: i64) -> i64 {
    if b < 0 || b >= codes.len() as i64 {
        return -1;
    }
    let code_a: u32 = codes[a as usize];
    let code_b: u32 = codes[b as usize];
    if code_a == code_b {
        32 + ((a ^ b) as u64).leading_zeros() as i64
    } else {
        (code_a ^ code_b).leading_zeros() as i64
    }
}

/// Children of internal node *i*, from nothing but the sorted codes.
pub fn generate_node(codes: &[u32], i: usize) -> InternalNode {
    let i_s: i64 = i as i64;
    // direction of the range
    let d: i64 = if common_prefix(codes, i_s, i_s + 1) - common_prefix(codes, i_s, i_s - 1) >= 0 {
        1
    } else {
        -1
    };
    // upper bound for the length of the range
    let delta_min: i64 = common_prefix(codes, i_s, i_s - d);
    let mut l_max: i64 = 2;
    while common_prefix(codes, i_s, i_s + l_max * d) > delta_min {
        l_max *= 2;
    }
    // other end by binary search
    let mut l: i64 = 0;
    let mut t: i64 = l_max / 2;
    while t >= 1 {
        if common_prefix(codes, i_s, i_s + (l + t) * d) > delta_min {
            l += t;
        }
        t /= 2;
    }
    let j: i64 = i_s + l * d;
    // split position by binary search
    let delta_node: i64 = common_prefix(codes, i_s, j);
    let mut s: i64 = 0;
    let mut step: i64 = l;
    loop {
        step = (step + 1) / 2;
        if common_prefix(codes, i_s, i_s + (s + step) * d) > delta_node {
            s += step;
        }
        if step <= 1 {
            break;
        }
    }
    let split: i64 = i_s + s * d + d.min(0);
    let left: NodeRef = if i_s.min(j) == split {
        NodeRef::Leaf(split as usize)
    } else {
        NodeRef::Internal(split as usize)
    };
    let right: NodeRef = if i_s.max(j) == split + 1 {
        NodeRef::Leaf(split as usize + 1)
    } else {
        NodeRef::Internal(split as usize + 1)
    };
    InternalNode {
        self_index: i,
        left,
        right,
        parent_index: None,
    }
}

/// Binary radix tree over *sorted*: leaves in
/// sorted order and the internal nodes, parent links filled in.
pub fn generate_hierarchy(
    sorted: &[PrimitiveIdentifier],
    parallel: bool,
) -> (Vec<LeafNode>, Vec<InternalNode>) {
    let codes: Vec<u32> = sorted.iter().map(|id| id.morton_code).collect();
    let n_internal: usize = codes.len().saturating_sub(1);
    let mut nodes: Vec<InternalNode> = if parallel {
        (0..n_internal)
            .into_par_iter()
            .map(|i| generate_node(&codes, i))
            .collect()
    } else {
        (0..n_internal).map(|i| generate_node(&codes, i)).collect()
    };
    let mut leaves: Vec<LeafNode> = sorted
        .iter()
        .map(|id| LeafNode {
            parent_index: None,
            primitive_index: id.primitive_index,
        })
        .collect();
    // every child has exactly one parent, so the order of these
    // writes does not matter
    for i in 0..n_internal {
        let (left, right) = (nodes[i].left, nodes[i].right);
        for child in [left, right].iter() {
            match *child {
                NodeRef::Leaf(k) => {
                    debug_assert!(leaves[k].parent_index.is_none());
                    leaves[k].parent_index = Some(i);
                }
                NodeRef::Internal(c) => {
                    debug_assert!(nodes[c].parent_index.is_none());
                    nodes[c].parent_index = Some(i);
                }
            }
        }
    }
    (leaves, nodes)
}

/// Ascend from the first leaf until a node without parent shows up.
pub fn find_root(leaves: &[LeafNode], nodes: &[InternalNode]) -> usize {
    let mut current: usize = match leaves.first().and_then(|leaf| leaf.parent_index) {
        Some(p) => p,
        None => return 0,
    };
    while let Some(parent) = nodes[current].parent_index {
        current = parent;
    }
    current
}

/// Bottom-up bounds, one leaf after the other. The first child to
/// arrive at a node parks its box there and stops; the second one
/// combines, stores and carries on upwards.
pub fn reduce_bounds_sequential(
    leaves: &[LeafNode],
    nodes: &[InternalNode],
    leaf_bounds: &[Bounds3f],
) -> Vec<Bounds3f> {
    let mut arrived: Vec<bool> = vec![false; nodes.len()];
    let mut stored: Vec<Bounds3f> = vec![Bounds3f::default(); nodes.len()];
    for leaf in leaves {
        let mut bounds: Bounds3f = leaf_bounds[leaf.primitive_index];
        let mut parent: Option<usize> = leaf.parent_index;
        while let Some(p) = parent {
            if !arrived[p] {
                arrived[p] = true;
                stored[p] = bounds;
                break;
            }
            bounds = bnd3_union_bnd3f(&stored[p], &bounds);
            stored[p] = bounds;
            parent = nodes[p].parent_index;
        }
    }
    stored
}

/// Bottom-up bounds with all leaves walking upwards concurrently. A
/// node's box is published exactly once, by the second child to
/// arrive, after both children's boxes are final.
pub fn reduce_bounds_parallel(
    leaves: &[LeafNode],
    nodes: &[InternalNode],
    leaf_bounds: &[Bounds3f],
) -> Vec<Bounds3f> {
    let gate: ArrivalGate = ArrivalGate::new(nodes.len());
    let slots: Vec<OnceLock<Bounds3f>> = (0..nodes.len()).map(|_| OnceLock::new()).collect();
    let child_bounds = |child: NodeRef| -> Bounds3f {
        match child {
            NodeRef::Leaf(k) => leaf_bounds[leaves[k].primitive_index],
            NodeRef::Internal(c) => *slots[c]
                .get()
                .expect("child bounds are published before its parent is entered"),
        }
    };
    leaves.par_iter().for_each(|leaf| {
        let mut parent: Option<usize> = leaf.parent_index;
        while let Some(p) = parent {
            if gate.arrive(p) == Arrival::First {
                break;
            }
            let node: &InternalNode = &nodes[p];
            let bounds: Bounds3f =
                bnd3_union_bnd3f(&child_bounds(node.left), &child_bounds(node.right));
            let _ = slots[p].set(bounds);
            parent = node.parent_index;
        }
    });
    slots
        .into_iter()
        .map(|slot| slot.into_inner().unwrap_or_default())
        .collect()
}

pub struct LinearBVH {
    sorted: Vec<PrimitiveIdentifier>,
    leaves: Vec<LeafNode>,
    nodes: Vec<InternalNode>,
    /// per triangle, indexed by primitive (not sorted) index
    leaf_bounds: Vec<Bounds3f>,
    /// per internal node
    internal_bounds: Vec<Bounds3f>,
    root: usize,
}

impl LinearBVH {
    pub fn new(mesh: &dyn Mesh, options: &LBVHOptions) -> Result<Self, BuildError> {
        let num_prims: usize = mesh.triangle_count();
        if num_prims < 2 {
            return Err(BuildError::TooFewPrimitives { count: num_prims });
        }
        let start = Instant::now();
        if let Some(face) = mesh.first_non_finite_triangle() {
            return Err(BuildError::NonFiniteBounds { face });
        }
        // per-triangle and scene bounds
        let leaf_bounds: Vec<Bounds3f> = if options.parallel {
            (0..num_prims)
                .into_par_iter()
                .map(|i| mesh.triangle_bound(i))
                .collect()
        } else {
            (0..num_prims).map(|i| mesh.triangle_bound(i)).collect()
        };
        let scene: Bounds3f = mesh.scene_bounding_box();
        // Morton codes of the box centers, then sort
        let mut sorted: Vec<PrimitiveIdentifier> = if options.parallel {
            leaf_bounds
                .par_iter()
                .enumerate()
                .map(|(i, b)| PrimitiveIdentifier::new(i, &b.center(), &scene))
                .collect()
        } else {
            leaf_bounds
                .iter()
                .enumerate()
                .map(|(i, b)| PrimitiveIdentifier::new(i, &b.center(), &scene))
                .collect()
        };
        if options.parallel {
            par_radix_sort(&mut sorted, options.parallel_sort_threshold);
        } else {
            radix_sort(&mut sorted);
        }
        debug!("LBVH: codes sorted after {:?}", start.elapsed());
        // topology, then bounds
        let (leaves, nodes) = generate_hierarchy(&sorted, options.parallel);
        let root: usize = find_root(&leaves, &nodes);
        debug!("LBVH: hierarchy generated after {:?}", start.elapsed());
        let internal_bounds: Vec<Bounds3f> = if options.parallel {
            reduce_bounds_parallel(&leaves, &nodes, &leaf_bounds)
        } else {
            reduce_bounds_sequential(&leaves, &nodes, &leaf_bounds)
        };
        let bvh = LinearBVH {
            sorted,
            leaves,
            nodes,
            leaf_bounds,
            internal_bounds,
            root,
        };
        debug_assert!(bvh.is_valid(), "LBVH violates the containment invariant");
        let stats: BuildStats = bvh.stats();
        info!(
            "LBVH: {} primitives, {} internal nodes, depth {}, {} duplicate codes, built in {:?}",
            stats.primitives,
            stats.internal_nodes,
            stats.max_depth,
            stats.duplicate_codes,
            start.elapsed()
        );
        Ok(bvh)
    }
    pub fn root(&self) -> usize {
        self.root
    }
    pub fn leaves(&self) -> &[LeafNode] {
        &self.leaves
    }
    pub fn nodes(&self) -> &[InternalNode] {
        &self.nodes
    }
    pub fn internal_bounds(&self) -> &[Bounds3f] {
        &self.internal_bounds
    }
    pub fn leaf_bounds(&self) -> &[Bounds3f] {
        &self.leaf_bounds
    }
    /// Primitive identifiers in Morton order.
    pub fn sorted_primitives(&self) -> &[PrimitiveIdentifier] {
        &self.sorted
    }
    pub fn bounds_of(&self, node: NodeRef) -> Bounds3f {
        match node {
            NodeRef::Leaf(k) => self.leaf_bounds[self.leaves[k].primitive_index],
            NodeRef::Internal(i) => self.internal_bounds[i],
        }
    }
    pub fn stats(&self) -> BuildStats {
        let mut max_depth: usize = 0;
        let mut to_visit: Vec<(usize, usize)> = vec![(self.root, 1)];
        while let Some((i, depth)) = to_visit.pop() {
            max_depth = max_depth.max(depth);
            for child in [self.nodes[i].left, self.nodes[i].right].iter() {
                if let NodeRef::Internal(c) = *child {
                    to_visit.push((c, depth + 1));
                }
            }
        }
        BuildStats {
            primitives: self.leaves.len(),
            internal_nodes: self.nodes.len(),
            max_depth,
            duplicate_codes: self
                .sorted
                .windows(2)
                .filter(|w| w[0].morton_code == w[1].morton_code)
                .count(),
        }
    }
    fn check_node(&self, i: usize, n_leaves: &mut usize, n_nodes: &mut usize) -> bool {
        *n_nodes += 1;
        let node: &InternalNode = &self.nodes[i];
        let bounds: Bounds3f = self.internal_bounds[i];
        if node.self_index != i || bounds.is_empty() {
            return false;
        }
        for child in [node.left, node.right].iter() {
            if !bounds.contains_bounds_edge_inclusive(&self.bounds_of(*child)) {
                return false;
            }
            let valid: bool = match *child {
                NodeRef::Leaf(k) => {
                    *n_leaves += 1;
                    self.leaves[k].parent_index == Some(i)
                }
                NodeRef::Internal(c) => {
                    self.nodes[c].parent_index == Some(i) && self.check_node(c, n_leaves, n_nodes)
                }
            };
            if !valid {
                return false;
            }
        }
        true
    }
    fn closest_hit(&self, mesh: &dyn Mesh, ray: &Ray) -> Option<(usize, TriangleHit)> {
        let inv_dir: Vector3f = ray.inv_dir();
        let mut closest: Option<(usize, TriangleHit)> = None;
        let mut best_t: Float = ray.t_max;
        match self.internal_bounds[self.root].intersect_b(ray, &inv_dir) {
            Some((t_near, _)) if t_near < best_t => {}
            _ => return None,
        }
        // follow ray through BVH nodes, nearer child popped first
        let mut to_visit: SmallVec<[(usize, Float); 64]> = SmallVec::new();
        to_visit.push((self.root, 0.0));
        while let Some((i, t_near)) = to_visit.pop() {
            // pruned while it was waiting on the stack?
            if t_near >= best_t {
                continue;
            }
            let node: &InternalNode = &self.nodes[i];
            let mut entered: SmallVec<[(usize, Float); 2]> = SmallVec::new();
            for child in [node.left, node.right].iter() {
                match *child {
                    NodeRef::Leaf(k) => {
                        let face: usize = self.leaves[k].primitive_index;
                        if let Some(hit) = mesh.ray_triangle_test(ray, face) {
                            if hit.t > 0.0 && hit.t < best_t {
                                best_t = hit.t;
                                closest = Some((face, hit));
                            }
                        }
                    }
                    NodeRef::Internal(c) => {
                        if let Some((near, _far)) = self.internal_bounds[c].intersect_b(ray, &inv_dir)
                        {
                            if near < best_t {
                                entered.push((c, near));
                            }
                        }
                    }
                }
            }
            // push the farther child first
            if entered.len() == 2 && entered[0].1 < entered[1].1 {
                entered.swap(0, 1);
            }
            to_visit.extend(entered);
        }
        closest
    }
}

impl SpacePartitioner for LinearBVH {
    fn intersect(&self, mesh: &dyn Mesh, ray: &Ray) -> Option<Intersection> {
        self.closest_hit(mesh, ray)
            .map(|(face, hit)| Intersection::new(mesh, ray, face, &hit))
    }
    fn intersect_p(&self, mesh: &dyn Mesh, ray: &Ray) -> bool {
        let inv_dir: Vector3f = ray.inv_dir();
        if !self.internal_bounds[self.root].intersect_p(ray, &inv_dir) {
            return false;
        }
        let mut to_visit: SmallVec<[usize; 64]> = SmallVec::new();
        to_visit.push(self.root);
        while let Some(i) = to_visit.pop() {
            let node: &InternalNode = &self.nodes[i];
            for child in [node.left, node.right].iter() {
                match *child {
                    NodeRef::Leaf(k) => {
                        let face: usize = self.leaves[k].primitive_index;
                        if let Some(hit) = mesh.ray_triangle_test(ray, face) {
                            if hit.t > 0.0 && hit.t < ray.t_max {
                                return true;
                            }
                        }
                    }
                    NodeRef::Internal(c) => {
                        if self.internal_bounds[c].intersect_p(ray, &inv_dir) {
                            to_visit.push(c);
                        }
                    }
                }
            }
        }
        false
    }
    fn is_valid(&self) -> bool {
        if self.nodes.len() + 1 != self.leaves.len() || self.nodes[self.root].parent_index.is_some()
        {
            return false;
        }
        let mut n_leaves: usize = 0;
        let mut n_nodes: usize = 0;
        self.check_node(self.root, &mut n_leaves, &mut n_nodes)
            && n_leaves == self.leaves.len()
            && n_nodes == self.nodes.len()
    }
    fn world_bound(&self) -> Bounds3f {
        self.internal_bounds[self.root]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::geometry::{Point3f, Vector3f};
    use crate::shapes::triangle::TriangleMesh;
    use approx::assert_abs_diff_eq;

    fn identifiers(codes: &[u32]) -> Vec<PrimitiveIdentifier> {
        codes
            .iter()
            .enumerate()
            .map(|(primitive_index, &morton_code)| PrimitiveIdentifier {
                primitive_index,
                morton_code,
            })
            .collect()
    }

    // the eight keys of figure 3 in the Karras paper
    const KARRAS_CODES: [u32; 8] = [
        0b00001, 0b00010, 0b00100, 0b00101, 0b10011, 0b11000, 0b11001, 0b11110,
    ];

    #[test]
    fn common_prefix_of_codes_and_ties() {
        let codes = [0b0100, 0b0110, 0b0110];
        assert_eq!(common_prefix(&codes, 0, 1), 30);
        assert_eq!(common_prefix(&codes, 0, -1), -1);
        assert_eq!(common_prefix(&codes, 0, 3), -1);
        // tie broken by position, longer than any code prefix
        assert_eq!(common_prefix(&codes, 1, 2), 32 + 62);
        assert!(common_prefix(&codes, 1, 2) > common_prefix(&codes, 0, 1));
    }

    #[test]
    fn karras_paper_topology() {
        let (leaves, nodes) = generate_hierarchy(&identifiers(&KARRAS_CODES), false);
        use NodeRef::{Internal, Leaf};
        let children: Vec<(NodeRef, NodeRef)> = nodes.iter().map(|n| (n.left, n.right)).collect();
        assert_eq!(
            children,
            vec![
                (Internal(3), Internal(4)),
                (Leaf(0), Leaf(1)),
                (Leaf(2), Leaf(3)),
                (Internal(1), Internal(2)),
                (Leaf(4), Internal(5)),
                (Internal(6), Leaf(7)),
                (Leaf(5), Leaf(6)),
            ]
        );
        assert_eq!(find_root(&leaves, &nodes), 0);
        assert_eq!(nodes[0].parent_index, None);
        assert_eq!(nodes[6].parent_index, Some(5));
        assert_eq!(leaves[7].parent_index, Some(5));
    }

    #[test]
    fn every_node_has_one_parent_with_duplicate_codes() {
        for n in 2..40 {
            let codes: Vec<u32> = (0..n).map(|i| (i / 3) as u32).collect();
            let (leaves, nodes) = generate_hierarchy(&identifiers(&codes), false);
            assert_eq!(nodes.len(), n - 1);
            assert!(leaves.iter().all(|l| l.parent_index.is_some()));
            let roots: Vec<&InternalNode> = nodes
                .iter()
                .filter(|node| node.parent_index.is_none())
                .collect();
            assert_eq!(roots.len(), 1);
            assert_eq!(roots[0].self_index, 0);
        }
    }

    #[test]
    fn all_equal_codes_still_form_a_binary_tree() {
        let (leaves, nodes) = generate_hierarchy(&identifiers(&[7; 16]), false);
        assert_eq!(find_root(&leaves, &nodes), 0);
        let mut child_count = vec![0; nodes.len()];
        for node in &nodes {
            if let Some(p) = node.parent_index {
                child_count[p] += 1;
            }
        }
        for leaf in &leaves {
            child_count[leaf.parent_index.unwrap()] += 1;
        }
        assert!(child_count.iter().all(|&c| c == 2));
    }

    #[test]
    fn parallel_and_sequential_hierarchies_agree() {
        let codes: Vec<u32> = (0..500_u32).map(|i| i.wrapping_mul(2_654_435_761) >> 2).collect();
        let mut ids = identifiers(&codes);
        radix_sort(&mut ids);
        assert_eq!(generate_hierarchy(&ids, false), generate_hierarchy(&ids, true));
    }

    fn triangle_pair() -> TriangleMesh {
        TriangleMesh::from_triangles(&[
            [
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(1.0, 1.0, 0.0),
            ],
            [
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 1.0, 0.0),
                Point3f::new(0.0, 1.0, 0.0),
            ],
        ])
    }

    #[test]
    fn reductions_agree() {
        let mut triangles: Vec<[Point3f; 3]> = Vec::new();
        for i in 0..50 {
            let x = (i % 7) as Float;
            let y = (i / 7) as Float;
            let z = ((i * 13) % 5) as Float;
            triangles.push([
                Point3f::new(x, y, z),
                Point3f::new(x + 0.5, y, z + 0.25),
                Point3f::new(x, y + 0.5, z - 0.25),
            ]);
        }
        let mesh = TriangleMesh::from_triangles(&triangles);
        let sequential = LinearBVH::new(
            &mesh,
            &LBVHOptions {
                parallel: false,
                ..LBVHOptions::default()
            },
        )
        .unwrap();
        let leaf_bounds: Vec<Bounds3f> = sequential.leaf_bounds().to_vec();
        let parallel =
            reduce_bounds_parallel(sequential.leaves(), sequential.nodes(), &leaf_bounds);
        assert_eq!(sequential.internal_bounds(), &parallel[..]);
        assert_eq!(sequential.world_bound(), mesh.scene_bounding_box());
    }

    #[test]
    fn too_few_primitives() {
        let one = TriangleMesh::from_triangles(&[[
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(0.0, 1.0, 0.0),
        ]]);
        assert_eq!(
            LinearBVH::new(&one, &LBVHOptions::default()).err(),
            Some(BuildError::TooFewPrimitives { count: 1 })
        );
        let none = TriangleMesh::from_triangles(&[]);
        assert_eq!(
            LinearBVH::new(&none, &LBVHOptions::default()).err(),
            Some(BuildError::TooFewPrimitives { count: 0 })
        );
    }

    #[test]
    fn non_finite_vertices_are_rejected() {
        let mut mesh = triangle_pair();
        mesh.p[4].y = std::f32::NAN;
        assert_eq!(
            LinearBVH::new(&mesh, &LBVHOptions::default()).err(),
            Some(BuildError::NonFiniteBounds { face: 1 })
        );
    }

    #[test]
    fn quad_hit_and_miss() {
        let mesh = triangle_pair();
        let bvh = LinearBVH::new(&mesh, &LBVHOptions::default()).unwrap();
        assert!(bvh.is_valid());
        let ray = Ray::new(Point3f::new(0.25, 0.75, 1.0), Vector3f::new(0.0, 0.0, -1.0));
        let isect = bvh.intersect(&mesh, &ray).unwrap();
        assert_eq!(isect.face_id, 1);
        assert_abs_diff_eq!(isect.t, 1.0, epsilon = 1.0e-6);
        assert!(bvh.intersect_p(&mesh, &ray));
        let outside = Ray::new(Point3f::new(1.5, 0.5, 1.0), Vector3f::new(0.0, 0.0, -1.0));
        assert!(bvh.intersect(&mesh, &outside).is_none());
        assert!(!bvh.intersect_p(&mesh, &outside));
    }

    #[test]
    fn stats_of_triangle_pair() {
        let bvh = LinearBVH::new(&triangle_pair(), &LBVHOptions::default()).unwrap();
        let stats = bvh.stats();
        assert_eq!(stats.primitives, 2);
        assert_eq!(stats.internal_nodes, 1);
        assert_eq!(stats.max_depth, 1);
    }

    #[test]
    fn corrupted_bounds_are_detected() {
        let mesh = triangle_pair();
        let mut bvh = LinearBVH::new(&mesh, &LBVHOptions::default()).unwrap();
        assert!(bvh.is_valid());
        bvh.internal_bounds[0] = Bounds3f::new(
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(0.5, 0.5, 0.5),
        );
        assert!(!bvh.is_valid());
        bvh.internal_bounds[0] = Bounds3f::default();
        assert!(!bvh.is_valid());
    }
}
