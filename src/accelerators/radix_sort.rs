//! Binary MSD radix sort of primitive identifiers by Morton code.
//!
//! One bit at a time, starting at the guard bit just above the code,
//! elements with the bit set are swapped to the tail of the slice;
//! both halves are then sorted by the next lower bit. Halves are
//! disjoint, so large ones are sorted concurrently.

// lbvh
use crate::accelerators::morton::{PrimitiveIdentifier, MORTON_CODE_BITS};

/// Highest bit tested; one above the most significant code bit.
pub const GUARD_BIT: u32 = 1 << MORTON_CODE_BITS;

/// Move elements with *mask* set behind those without it and return
/// the length of the leading (bit clear) part.
fn partition(ids: &mut [PrimitiveIdentifier], mask: u32) -> usize {
    let mut i: usize = 0;
    let mut end: usize = ids.len();
    while i < end {
        if ids[i].morton_code & mask != 0 {
            end -= 1;
            ids.swap(i, end);
        } else {
            i += 1;
        }
    }
    end
}

fn sort_by_bit(ids: &mut [PrimitiveIdentifier], mask: u32) {
    if ids.len() <= 1 || mask == 0 {
        return;
    }
    let mid: usize = partition(ids, mask);
    let (lower, upper) = ids.split_at_mut(mid);
    sort_by_bit(lower, mask >> 1);
    sort_by_bit(upper, mask >> 1);
}

fn par_sort_by_bit(ids: &mut [PrimitiveIdentifier], mask: u32, threshold: usize) {
    if ids.len() <= threshold {
        sort_by_bit(ids, mask);
        return;
    }
    if mask == 0 {
        return;
    }
    let mid: usize = partition(ids, mask);
    let (lower, upper) = ids.split_at_mut(mid);
    rayon::join(
        || par_sort_by_bit(lower, mask >> 1, threshold),
        || par_sort_by_bit(upper, mask >> 1, threshold),
    );
}

/// Sort *ids* in place so that Morton codes are non-decreasing.
pub fn radix_sort(ids: &mut [PrimitiveIdentifier]) {
    sort_by_bit(ids, GUARD_BIT);
}

/// Like **radix_sort()**, but partitions longer than *threshold* are
/// split across the rayon thread pool.
pub fn par_radix_sort(ids: &mut [PrimitiveIdentifier], threshold: usize) {
    par_sort_by_bit(ids, GUARD_BIT, threshold.max(1));
}

#[cfg(test)]
mod test {
    use super::*;

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

    fn pseudo_random_codes(n: usize, seed: u32) -> Vec<u32> {
        let mut state: u32 = seed;
        (0..n)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                state & (GUARD_BIT - 1)
            })
            .collect()
    }

    fn is_sorted(ids: &[PrimitiveIdentifier]) -> bool {
        ids.windows(2).all(|w| w[0].morton_code <= w[1].morton_code)
    }

    #[test]
    fn empty_and_single() {
        let mut empty: Vec<PrimitiveIdentifier> = Vec::new();
        radix_sort(&mut empty);
        let mut single = identifiers(&[42]);
        radix_sort(&mut single);
        assert_eq!(single[0].morton_code, 42);
    }

    #[test]
    fn sorts_small_input() {
        let mut ids = identifiers(&[5, 3, 9, 0, 3, (1 << 29) + 1, 7]);
        radix_sort(&mut ids);
        let codes: Vec<u32> = ids.iter().map(|id| id.morton_code).collect();
        assert_eq!(codes, vec![0, 3, 3, 5, 7, 9, (1 << 29) + 1]);
    }

    #[test]
    fn keeps_every_primitive_exactly_once() {
        let mut ids = identifiers(&pseudo_random_codes(1000, 7));
        radix_sort(&mut ids);
        assert!(is_sorted(&ids));
        let mut seen: Vec<usize> = ids.iter().map(|id| id.primitive_index).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..1000).collect::<Vec<usize>>());
    }

    #[test]
    fn sorted_for_every_length() {
        for n in 0..64 {
            let mut ids = identifiers(&pseudo_random_codes(n, 12345 + n as u32));
            radix_sort(&mut ids);
            assert!(is_sorted(&ids), "length {}", n);
        }
    }

    #[test]
    fn parallel_matches_sequential_order_of_codes() {
        let codes = pseudo_random_codes(5000, 99);
        let mut sequential = identifiers(&codes);
        let mut parallel = identifiers(&codes);
        radix_sort(&mut sequential);
        par_radix_sort(&mut parallel, 64);
        assert!(is_sorted(&parallel));
        // identical partition steps give identical permutations
        assert_eq!(sequential, parallel);
    }
}
