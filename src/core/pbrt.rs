//! Type definition of Float, otherwise constants and functions which
//! can be used almost everywhere else in the code.

// see pbrt.h

pub type Float = f32;

pub const MACHINE_EPSILON: Float = std::f32::EPSILON * 0.5;

/// Determinant threshold below which a ray counts as parallel to a
/// triangle's plane.
pub const PARALLEL_EPSILON: Float = 1.0e-8;

/// Error propagation.
pub fn gamma(n: i32) -> Float {
    (n as Float * MACHINE_EPSILON) / (1.0 - n as Float * MACHINE_EPSILON)
}

/// Clamp the given value *val* to lie between the values *low* and *high*.
pub fn clamp_t<T>(val: T, low: T, high: T) -> T
where
    T: PartialOrd,
{
    let r: T;
    if val < low {
        r = low;
    } else if val > high {
        r = high;
    } else {
        r = val;
    }
    r
}

/// Interpolate linearly between two provided values.
pub fn lerp(t: Float, a: Float, b: Float) -> Float {
    a * (1.0 - t) + b * t
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn clamp_t_keeps_values_in_range() {
        assert_eq!(clamp_t(1500_u32, 0, 1023), 1023);
        assert_eq!(clamp_t(-0.5 as Float, 0.0, 1.0), 0.0);
        assert_eq!(clamp_t(0.25 as Float, 0.0, 1.0), 0.25);
    }

    #[test]
    fn gamma_grows_with_n() {
        assert!(gamma(3) > gamma(1));
        assert!(gamma(3) < 1.0e-6);
    }
}
