//! Almost all nontrivial graphics programs are built on a foundation
//! of geometric classes. These classes represent mathematical
//! constructs like points, vectors, and rays.
//!
//! # Points, Vectors and Normals
//!
//! A **point** is a zero-dimensional location in 3D space, a
//! **vector** a direction, and a **normal** a vector perpendicular to
//! a surface at a particular position. All three use x, y, z
//! coordinates of type **Float**.
//!
//! ```rust
//! use rs_lbvh::core::geometry::{Point3f, Vector3f};
//!
//!     let origin = Point3f { x: 0.0, y: 0.0, z: -1.0 };
//!     let up = Vector3f { x: 0.0, y: 0.0, z: 1.0 };
//!     let p = origin + up * 2.0;
//!
//!     assert_eq!(p.z, 1.0);
//! ```
//!
//! # Rays
//!
//! A **ray** is a semi-infinite line specified by its origin and
//! direction. The segment actually considered is limited by
//! **t_max**.
//!
//! # Bounding Boxes
//!
//! The bounding volume hierarchies use 3D axis-aligned boxes
//! (**Bounds3f**) to bound triangles and groups of triangles. A
//! default constructed box is *empty*: its minimum is larger than its
//! maximum, so the union with any other box is that other box.
//!
//! ```rust
//! use rs_lbvh::core::geometry::{Bounds3f, Point3f, Ray, Vector3f};
//!
//!     let unit_cube = Bounds3f::new(
//!         Point3f { x: 0.0, y: 0.0, z: 0.0 },
//!         Point3f { x: 1.0, y: 1.0, z: 1.0 },
//!     );
//!     let ray = Ray::new(
//!         Point3f { x: 0.5, y: 0.5, z: -1.0 },
//!         Vector3f { x: 0.0, y: 0.0, z: 1.0 },
//!     );
//!     let (near, _far) = unit_cube.intersect_b(&ray, &ray.inv_dir()).unwrap();
//!
//!     assert_eq!(near, 1.0);
//! ```

// std
use std::ops;
use std::ops::{Index, IndexMut};
// others
use strum::IntoEnumIterator;
use strum_macros::EnumIter;
// lbvh
use crate::core::pbrt::Float;
use crate::core::pbrt::{gamma, lerp};

// see geometry.h

#[derive(EnumIter, Debug, Copy, Clone)]
#[repr(u8)]
pub enum MinMaxEnum {
    Min = 0,
    Max = 1,
}

#[derive(EnumIter, Debug, Copy, Clone, PartialEq)]
#[repr(u8)]
pub enum XYZEnum {
    X = 0,
    Y = 1,
    Z = 2,
}

impl XYZEnum {
    pub fn from_axis(axis: u8) -> XYZEnum {
        match axis {
            0 => XYZEnum::X,
            1 => XYZEnum::Y,
            _ => XYZEnum::Z,
        }
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Vector3f {
    pub x: Float,
    pub y: Float,
    pub z: Float,
}

impl Vector3f {
    pub fn new(x: Float, y: Float, z: Float) -> Self {
        Vector3f { x, y, z }
    }
    pub fn has_nans(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }
    pub fn abs(&self) -> Vector3f {
        Vector3f {
            x: self.x.abs(),
            y: self.y.abs(),
            z: self.z.abs(),
        }
    }
    pub fn length_squared(&self) -> Float {
        self.x * self.x + self.y * self.y + self.z * self.z
    }
    pub fn length(&self) -> Float {
        self.length_squared().sqrt()
    }
    pub fn normalize(&self) -> Vector3f {
        *self / self.length()
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Point3f {
    pub x: Float,
    pub y: Float,
    pub z: Float,
}

impl Point3f {
    pub fn new(x: Float, y: Float, z: Float) -> Self {
        Point3f { x, y, z }
    }
    pub fn has_nans(&self) -> bool {
        self.x.is_nan() || self.y.is_nan() || self.z.is_nan()
    }
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Normal3f {
    pub x: Float,
    pub y: Float,
    pub z: Float,
}

impl Normal3f {
    pub fn length_squared(&self) -> Float {
        self.x * self.x + self.y * self.y + self.z * self.z
    }
    pub fn length(&self) -> Float {
        self.length_squared().sqrt()
    }
    pub fn normalize(&self) -> Normal3f {
        let len: Float = self.length();
        Normal3f {
            x: self.x / len,
            y: self.y / len,
            z: self.z / len,
        }
    }
}

impl_op!(-|a: Vector3f| -> Vector3f {
    Vector3f {
        x: -a.x,
        y: -a.y,
        z: -a.z,
    }
});

impl_op!(-|a: Normal3f| -> Normal3f {
    Normal3f {
        x: -a.x,
        y: -a.y,
        z: -a.z,
    }
});

impl_op_ex!(+|a: &Point3f, b: &Point3f| -> Point3f {
    Point3f {
        x: a.x + b.x,
        y: a.y + b.y,
        z: a.z + b.z,
    }
});

impl_op_ex!(+|a: &Vector3f, b: &Vector3f| -> Vector3f {
    Vector3f {
        x: a.x + b.x,
        y: a.y + b.y,
        z: a.z + b.z,
    }
});

impl_op_ex!(+|a: &Normal3f, b: &Normal3f| -> Normal3f {
    Normal3f {
        x: a.x + b.x,
        y: a.y + b.y,
        z: a.z + b.z,
    }
});

impl_op_ex!(-|a: &Vector3f, b: &Vector3f| -> Vector3f {
    Vector3f {
        x: a.x - b.x,
        y: a.y - b.y,
        z: a.z - b.z,
    }
});

impl_op_ex!(+|a: &Point3f, b: &Vector3f| -> Point3f {
    Point3f {
        x: a.x + b.x,
        y: a.y + b.y,
        z: a.z + b.z,
    }
});

impl_op_ex!(-|a: &Point3f, b: &Point3f| -> Vector3f {
    Vector3f {
        x: a.x - b.x,
        y: a.y - b.y,
        z: a.z - b.z,
    }
});

impl_op_ex!(-|a: &Point3f, b: &Vector3f| -> Point3f {
    Point3f {
        x: a.x - b.x,
        y: a.y - b.y,
        z: a.z - b.z,
    }
});

impl_op_ex!(*|a: &Point3f, b: Float| -> Point3f {
    Point3f {
        x: a.x * b,
        y: a.y * b,
        z: a.z * b,
    }
});

impl_op_ex!(*|a: &Normal3f, b: Float| -> Normal3f {
    Normal3f {
        x: a.x * b,
        y: a.y * b,
        z: a.z * b,
    }
});

impl_op_ex!(*|a: &Vector3f, b: Float| -> Vector3f {
    Vector3f {
        x: a.x * b,
        y: a.y * b,
        z: a.z * b,
    }
});

impl_op_ex!(/|a: &Point3f, b: Float| -> Point3f {
    assert_ne!(b, 0.0 as Float);
    let inv: Float = 1.0 as Float / b;
    Point3f {
        x: a.x * inv,
        y: a.y * inv,
        z: a.z * inv,
    }
});

impl_op_ex!(/|a: &Vector3f, b: Float| -> Vector3f {
    assert_ne!(b, 0.0 as Float);
    let inv: Float = 1.0 as Float / b;
    Vector3f {
        x: a.x * inv,
        y: a.y * inv,
        z: a.z * inv,
    }
});

impl_op!(+= |a: &mut Point3f, b: Vector3f| {
    a.x += b.x;
    a.y += b.y;
    a.z += b.z;
});

impl_op!(*= |a: &mut Vector3f, b: Float| {
    a.x *= b;
    a.y *= b;
    a.z *= b;
});

impl Index<XYZEnum> for Vector3f {
    type Output = Float;
    fn index(&self, index: XYZEnum) -> &Float {
        match index {
            XYZEnum::X => &self.x,
            XYZEnum::Y => &self.y,
            _ => &self.z,
        }
    }
}

impl IndexMut<XYZEnum> for Vector3f {
    fn index_mut(&mut self, index: XYZEnum) -> &mut Float {
        match index {
            XYZEnum::X => &mut self.x,
            XYZEnum::Y => &mut self.y,
            _ => &mut self.z,
        }
    }
}

impl Index<XYZEnum> for Point3f {
    type Output = Float;
    fn index(&self, index: XYZEnum) -> &Float {
        match index {
            XYZEnum::X => &self.x,
            XYZEnum::Y => &self.y,
            _ => &self.z,
        }
    }
}

impl IndexMut<XYZEnum> for Point3f {
    fn index_mut(&mut self, index: XYZEnum) -> &mut Float {
        match index {
            XYZEnum::X => &mut self.x,
            XYZEnum::Y => &mut self.y,
            _ => &mut self.z,
        }
    }
}

impl From<Point3f> for Vector3f {
    fn from(p: Point3f) -> Self {
        Vector3f {
            x: p.x,
            y: p.y,
            z: p.z,
        }
    }
}

impl From<Vector3f> for Normal3f {
    fn from(v: Vector3f) -> Self {
        Normal3f {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

/// Product of the Euclidean magnitudes of the two vectors and the
/// cosine of the angle between them.
pub fn vec3_dot_vec3f(v1: &Vector3f, v2: &Vector3f) -> Float {
    v1.x * v2.x + v1.y * v2.y + v1.z * v2.z
}

/// Given two vectors in 3D, the cross product is a vector that is
/// perpendicular to both of them.
pub fn vec3_cross_vec3(v1: &Vector3f, v2: &Vector3f) -> Vector3f {
    let v1x: f64 = v1.x as f64;
    let v1y: f64 = v1.y as f64;
    let v1z: f64 = v1.z as f64;
    let v2x: f64 = v2.x as f64;
    let v2y: f64 = v2.y as f64;
    let v2z: f64 = v2.z as f64;
    Vector3f {
        x: ((v1y * v2z) - (v1z * v2y)) as Float,
        y: ((v1z * v2x) - (v1x * v2z)) as Float,
        z: ((v1x * v2y) - (v1y * v2x)) as Float,
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bounds3f {
    pub p_min: Point3f,
    pub p_max: Point3f,
}

// work around bug
// https://github.com/rust-lang/rust/issues/40395
impl Default for Bounds3f {
    fn default() -> Bounds3f {
        let min_num: Float = std::f32::MIN;
        let max_num: Float = std::f32::MAX;
        // Bounds3f
        Bounds3f {
            p_min: Point3f {
                x: max_num,
                y: max_num,
                z: max_num,
            },
            p_max: Point3f {
                x: min_num,
                y: min_num,
                z: min_num,
            },
        }
    }
}

impl Bounds3f {
    pub fn new(p1: Point3f, p2: Point3f) -> Self {
        let p_min: Point3f = Point3f {
            x: p1.x.min(p2.x),
            y: p1.y.min(p2.y),
            z: p1.z.min(p2.z),
        };
        let p_max: Point3f = Point3f {
            x: p1.x.max(p2.x),
            y: p1.y.max(p2.y),
            z: p1.z.max(p2.z),
        };
        Bounds3f { p_min, p_max }
    }
    /// Strictly positive extent along every axis.
    pub fn is_valid(&self) -> bool {
        self.p_min.x < self.p_max.x && self.p_min.y < self.p_max.y && self.p_min.z < self.p_max.z
    }
    /// Zero-initialized box, both corners at the origin.
    pub fn is_collapsed(&self) -> bool {
        let origin: Point3f = Point3f::default();
        self.p_min == origin && self.p_max == origin
    }
    /// Inverted on at least one axis, e.g. the **Default** box.
    pub fn is_empty(&self) -> bool {
        self.p_min.x > self.p_max.x || self.p_min.y > self.p_max.y || self.p_min.z > self.p_max.z
    }
    /// Half-open test, points on the maximum faces are outside.
    pub fn contains(&self, p: &Point3f) -> bool {
        p.x >= self.p_min.x
            && p.x < self.p_max.x
            && p.y >= self.p_min.y
            && p.y < self.p_max.y
            && p.z >= self.p_min.z
            && p.z < self.p_max.z
    }
    pub fn contains_edge_inclusive(&self, p: &Point3f) -> bool {
        p.x >= self.p_min.x
            && p.x <= self.p_max.x
            && p.y >= self.p_min.y
            && p.y <= self.p_max.y
            && p.z >= self.p_min.z
            && p.z <= self.p_max.z
    }
    /// Does this box enclose *other* completely (touching faces allowed)?
    pub fn contains_bounds_edge_inclusive(&self, other: &Bounds3f) -> bool {
        self.contains_edge_inclusive(&other.p_min) && self.contains_edge_inclusive(&other.p_max)
    }
    /// Strict overlap, boxes which only share a face do not overlap.
    pub fn overlaps(&self, other: &Bounds3f) -> bool {
        self.p_max.x > other.p_min.x
            && self.p_min.x < other.p_max.x
            && self.p_max.y > other.p_min.y
            && self.p_min.y < other.p_max.y
            && self.p_max.z > other.p_min.z
            && self.p_min.z < other.p_max.z
    }
    pub fn overlaps_edge_inclusive(&self, other: &Bounds3f) -> bool {
        self.p_max.x >= other.p_min.x
            && self.p_min.x <= other.p_max.x
            && self.p_max.y >= other.p_min.y
            && self.p_min.y <= other.p_max.y
            && self.p_max.z >= other.p_min.z
            && self.p_min.z <= other.p_max.z
    }
    pub fn center(&self) -> Point3f {
        self.p_min * 0.5 + self.p_max * 0.5
    }
    pub fn diagonal(&self) -> Vector3f {
        self.p_max - self.p_min
    }
    pub fn surface_area(&self) -> Float {
        let d: Vector3f = self.diagonal();
        // 2 * (d.x * d.y + d.x * d.z + d.y * d.z)
        let r: Float = d.x * d.y + d.x * d.z + d.y * d.z;
        r + r // avoid '2 *'
    }
    pub fn volume(&self) -> Float {
        let d: Vector3f = self.diagonal();
        d.x * d.y * d.z
    }
    pub fn maximum_extent(&self) -> u8 {
        let d: Vector3f = self.diagonal();
        if d.x > d.y && d.x > d.z {
            0_u8
        } else if d.y > d.z {
            1_u8
        } else {
            2_u8
        }
    }
    /// Position of *p* relative to the box, (0, 0, 0) at the minimum
    /// corner and (1, 1, 1) at the maximum corner. Axes without extent
    /// map to 0.
    pub fn offset(&self, p: &Point3f) -> Vector3f {
        let mut o: Vector3f = p - self.p_min;
        if self.p_max.x > self.p_min.x {
            o.x /= self.p_max.x - self.p_min.x;
        } else {
            o.x = 0.0;
        }
        if self.p_max.y > self.p_min.y {
            o.y /= self.p_max.y - self.p_min.y;
        } else {
            o.y = 0.0;
        }
        if self.p_max.z > self.p_min.z {
            o.z /= self.p_max.z - self.p_min.z;
        } else {
            o.z = 0.0;
        }
        o
    }
    pub fn lerp(&self, t: &Point3f) -> Point3f {
        Point3f {
            x: lerp(t.x, self.p_min.x, self.p_max.x),
            y: lerp(t.y, self.p_min.y, self.p_max.y),
            z: lerp(t.z, self.p_min.z, self.p_max.z),
        }
    }
    /// Slab test returning the parametric entry and exit distances
    /// *(near, far)*.
    ///
    /// *near* is the geometric entry distance and is negative if the
    /// ray origin lies inside the box (or the box straddles the
    /// origin); it is never swapped with *far*. A box entirely behind
    /// the origin is a miss. Use **contains_edge_inclusive()** on the
    /// ray origin to detect the inside case explicitly.
    pub fn intersect_b(&self, ray: &Ray, inv_dir: &Vector3f) -> Option<(Float, Float)> {
        let mut t0: Float = std::f32::NEG_INFINITY;
        let mut t1: Float = std::f32::INFINITY;
        for i in XYZEnum::iter() {
            if ray.d[i] == 0.0 as Float {
                // parallel to the slab, inside it or never
                if ray.o[i] < self.p_min[i] || ray.o[i] > self.p_max[i] {
                    return None;
                }
                continue;
            }
            // update interval for _i_th bounding box slab
            let mut t_near: Float = (self.p_min[i] - ray.o[i]) * inv_dir[i];
            let mut t_far: Float = (self.p_max[i] - ray.o[i]) * inv_dir[i];
            // update parametric interval from slab intersection $t$ values
            if t_near > t_far {
                std::mem::swap(&mut t_near, &mut t_far);
            }
            // update _t_far_ to ensure robust ray--bounds intersection
            t_far *= 1.0 as Float + 2.0 as Float * gamma(3_i32);
            if t_near > t0 {
                t0 = t_near;
            }
            if t_far < t1 {
                t1 = t_far;
            }
            if t0 > t1 {
                return None;
            }
        }
        if t1 < 0.0 as Float {
            return None;
        }
        Some((t0, t1))
    }
    /// Does the ray hit the box before *ray.t_max*?
    pub fn intersect_p(&self, ray: &Ray, inv_dir: &Vector3f) -> bool {
        match self.intersect_b(ray, inv_dir) {
            Some((t_near, _t_far)) => t_near < ray.t_max,
            None => false,
        }
    }
}

impl Index<MinMaxEnum> for Bounds3f {
    type Output = Point3f;
    fn index(&self, i: MinMaxEnum) -> &Point3f {
        match i {
            MinMaxEnum::Min => &self.p_min,
            _ => &self.p_max,
        }
    }
}

/// Given a bounding box and a point, the **bnd3_union_pnt3f()**
/// function returns a new bounding box that encompasses that point as
/// well as the original box.
pub fn bnd3_union_pnt3f(b: &Bounds3f, p: &Point3f) -> Bounds3f {
    let p_min: Point3f = Point3f {
        x: b.p_min.x.min(p.x),
        y: b.p_min.y.min(p.y),
        z: b.p_min.z.min(p.z),
    };
    let p_max: Point3f = Point3f {
        x: b.p_max.x.max(p.x),
        y: b.p_max.y.max(p.y),
        z: b.p_max.z.max(p.z),
    };
    Bounds3f { p_min, p_max }
}

/// Construct a new box that bounds the space encompassed by two other
/// bounding boxes.
pub fn bnd3_union_bnd3f(b1: &Bounds3f, b2: &Bounds3f) -> Bounds3f {
    let p_min: Point3f = Point3f {
        x: b1.p_min.x.min(b2.p_min.x),
        y: b1.p_min.y.min(b2.p_min.y),
        z: b1.p_min.z.min(b2.p_min.z),
    };
    let p_max: Point3f = Point3f {
        x: b1.p_max.x.max(b2.p_max.x),
        y: b1.p_max.y.max(b2.p_max.y),
        z: b1.p_max.z.max(b2.p_max.z),
    };
    Bounds3f { p_min, p_max }
}

#[derive(Debug, Copy, Clone)]
pub struct Ray {
    /// origin
    pub o: Point3f,
    /// direction
    pub d: Vector3f,
    /// limits the ray to a segment along its infinite extent
    pub t_max: Float,
}

impl Ray {
    pub fn new(o: Point3f, d: Vector3f) -> Self {
        Ray {
            o,
            d,
            t_max: std::f32::INFINITY,
        }
    }
    // Point3f operator()(Float t) const { return o + d * t; }
    pub fn position(&self, t: Float) -> Point3f {
        self.o + self.d * t
    }
    /// Componentwise reciprocal of the direction, shared by all slab
    /// tests of one traversal.
    pub fn inv_dir(&self) -> Vector3f {
        Vector3f {
            x: 1.0 / self.d.x,
            y: 1.0 / self.d.y,
            z: 1.0 / self.d.z,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn unit_cube() -> Bounds3f {
        Bounds3f::new(Point3f::new(0.0, 0.0, 0.0), Point3f::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn new_orders_corners() {
        let b = Bounds3f::new(Point3f::new(1.0, -2.0, 3.0), Point3f::new(-1.0, 2.0, 0.0));
        assert_eq!(b.p_min, Point3f::new(-1.0, -2.0, 0.0));
        assert_eq!(b.p_max, Point3f::new(1.0, 2.0, 3.0));
        assert!(b.is_valid());
    }

    #[test]
    fn default_box_is_empty_and_union_neutral() {
        let empty = Bounds3f::default();
        assert!(empty.is_empty());
        assert!(!empty.is_collapsed());
        assert_eq!(bnd3_union_bnd3f(&empty, &unit_cube()), unit_cube());
    }

    #[test]
    fn collapsed_box() {
        let zero = Bounds3f::new(Point3f::default(), Point3f::default());
        assert!(zero.is_collapsed());
        assert!(!zero.is_valid());
        assert!(!zero.is_empty());
    }

    #[test]
    fn flat_box_is_not_valid() {
        let flat = Bounds3f::new(Point3f::new(0.0, 0.0, 0.5), Point3f::new(1.0, 1.0, 0.5));
        assert!(!flat.is_valid());
        assert_eq!(flat.volume(), 0.0);
        assert_eq!(flat.surface_area(), 2.0);
    }

    #[test]
    fn containment_half_open_vs_closed() {
        let b = unit_cube();
        let corner = Point3f::new(1.0, 1.0, 1.0);
        assert!(!b.contains(&corner));
        assert!(b.contains_edge_inclusive(&corner));
        assert!(b.contains(&Point3f::new(0.0, 0.0, 0.0)));
        assert!(!b.contains_edge_inclusive(&Point3f::new(1.5, 0.5, 0.5)));
    }

    #[test]
    fn overlap_half_open_vs_closed() {
        let a = unit_cube();
        let touching = Bounds3f::new(Point3f::new(1.0, 0.0, 0.0), Point3f::new(2.0, 1.0, 1.0));
        let inside = Bounds3f::new(Point3f::new(0.5, 0.5, 0.5), Point3f::new(2.0, 2.0, 2.0));
        assert!(!a.overlaps(&touching));
        assert!(a.overlaps_edge_inclusive(&touching));
        assert!(a.overlaps(&inside));
        assert!(a.contains_bounds_edge_inclusive(&a));
        assert!(!a.contains_bounds_edge_inclusive(&inside));
    }

    #[test]
    fn center_area_volume_extent() {
        let b = Bounds3f::new(Point3f::new(0.0, 0.0, 0.0), Point3f::new(4.0, 2.0, 1.0));
        assert_eq!(b.center(), Point3f::new(2.0, 1.0, 0.5));
        assert_eq!(b.surface_area(), 2.0 * (8.0 + 4.0 + 2.0));
        assert_eq!(b.volume(), 8.0);
        assert_eq!(b.maximum_extent(), 0);
    }

    #[test]
    fn offset_handles_degenerate_axes() {
        let flat = Bounds3f::new(Point3f::new(0.0, 0.0, 2.0), Point3f::new(2.0, 4.0, 2.0));
        let o = flat.offset(&Point3f::new(1.0, 1.0, 2.0));
        assert_eq!(o, Vector3f::new(0.5, 0.25, 0.0));
    }

    #[test]
    fn slab_test_unit_cube_from_below() {
        let ray = Ray::new(Point3f::new(0.0, 0.0, -1.0), Vector3f::new(0.0, 0.0, 1.0));
        let (near, far) = unit_cube().intersect_b(&ray, &ray.inv_dir()).unwrap();
        assert_abs_diff_eq!(near, 1.0, epsilon = 1.0e-5);
        assert_abs_diff_eq!(far, 2.0, epsilon = 1.0e-5);
        assert!(unit_cube().intersect_p(&ray, &ray.inv_dir()));
    }

    #[test]
    fn slab_test_origin_inside_keeps_negative_near() {
        let ray = Ray::new(Point3f::new(0.5, 0.5, 0.5), Vector3f::new(1.0, 0.0, 0.0));
        let (near, far) = unit_cube().intersect_b(&ray, &ray.inv_dir()).unwrap();
        assert_abs_diff_eq!(near, -0.5, epsilon = 1.0e-5);
        assert_abs_diff_eq!(far, 0.5, epsilon = 1.0e-5);
        assert!(unit_cube().contains_edge_inclusive(&ray.o));
    }

    #[test]
    fn slab_test_misses() {
        let away = Ray::new(Point3f::new(0.5, 0.5, -1.0), Vector3f::new(0.0, 0.0, -1.0));
        assert!(unit_cube().intersect_b(&away, &away.inv_dir()).is_none());
        let beside = Ray::new(Point3f::new(2.0, 0.5, -1.0), Vector3f::new(0.0, 0.0, 1.0));
        assert!(unit_cube().intersect_b(&beside, &beside.inv_dir()).is_none());
        let diagonal = Ray::new(Point3f::new(-1.0, 3.0, 0.5), Vector3f::new(1.0, 1.0, 0.0));
        assert!(unit_cube().intersect_b(&diagonal, &diagonal.inv_dir()).is_none());
    }

    #[test]
    fn slab_test_respects_t_max() {
        let mut ray = Ray::new(Point3f::new(0.5, 0.5, -1.0), Vector3f::new(0.0, 0.0, 1.0));
        ray.t_max = 0.5;
        assert!(!unit_cube().intersect_p(&ray, &ray.inv_dir()));
    }

    #[test]
    fn vector_helpers() {
        let x = Vector3f::new(1.0, 0.0, 0.0);
        let y = Vector3f::new(0.0, 1.0, 0.0);
        assert_eq!(vec3_cross_vec3(&x, &y), Vector3f::new(0.0, 0.0, 1.0));
        assert_eq!(vec3_dot_vec3f(&x, &y), 0.0);
        assert_eq!(Vector3f::new(3.0, 4.0, 0.0).length(), 5.0);
    }
}
