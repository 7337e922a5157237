//! 3D Morton codes with 10 bits of resolution per axis.
//!
//! Spatially close points tend to get numerically close codes, which
//! is what lets the linear BVH derive a hierarchy from a sorted array.

// lbvh
use crate::core::geometry::{Bounds3f, Point3f, Vector3f};
use crate::core::pbrt::{clamp_t, Float};

pub const MORTON_BITS: u32 = 10;
pub const MORTON_SCALE: Float = (1_u32 << MORTON_BITS) as Float;
/// Number of significant bits of a 3D code.
pub const MORTON_CODE_BITS: u32 = 3 * MORTON_BITS;

/// One per triangle, reordered by the radix sort.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct PrimitiveIdentifier {
    pub primitive_index: usize,
    pub morton_code: u32,
}

/// Insert two 0 bits after each of the low 10 bits of x.
pub fn expand_bits(v: u32) -> u32 {
    let mut v: u32 = v & 0x0000_03ff;
    v = v.wrapping_mul(0x0001_0001) & 0xff00_00ff;
    v = v.wrapping_mul(0x0000_0101) & 0x0f00_f00f;
    v = v.wrapping_mul(0x0000_0011) & 0xc30c_30c3;
    v = v.wrapping_mul(0x0000_0005) & 0x4924_9249;
    v
}

/// Interleave three 10-bit coordinates, *x* ending up in the most
/// significant position of each 3-bit group.
pub fn morton3(x: u32, y: u32, z: u32) -> u32 {
    expand_bits(x) * 4 + expand_bits(y) * 2 + expand_bits(z)
}

/// Morton code of *p* after normalizing it against *scene*. Points on
/// (or slightly beyond) the maximum faces are clamped into range.
pub fn encode_morton3(p: &Point3f, scene: &Bounds3f) -> u32 {
    let o: Vector3f = scene.offset(p);
    let max: Float = MORTON_SCALE - 1.0;
    let x: Float = clamp_t(o.x * MORTON_SCALE, 0.0, max);
    let y: Float = clamp_t(o.y * MORTON_SCALE, 0.0, max);
    let z: Float = clamp_t(o.z * MORTON_SCALE, 0.0, max);
    morton3(x as u32, y as u32, z as u32)
}

impl PrimitiveIdentifier {
    pub fn new(primitive_index: usize, centroid: &Point3f, scene: &Bounds3f) -> Self {
        PrimitiveIdentifier {
            primitive_index,
            morton_code: encode_morton3(centroid, scene),
        }
    }
}
