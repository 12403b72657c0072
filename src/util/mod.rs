//! Generic slice helpers the lists delegate to.

use std::cmp::Ordering;

/// Sorts `[from, to)` of the slice in place with the given ordering.
/// Stable.
///
/// Panics if range is out of bounds.
pub fn sort_range<T, F>(slice: &mut [T], from: usize, to: usize, compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    slice[from..to].sort_by(compare);
}

/// Assigns `value` to every position of `[from, to)`.
///
/// Panics if range is out of bounds.
pub fn fill_range<T: Copy>(slice: &mut [T], from: usize, to: usize, value: T) {
    slice[from..to].fill(value);
}

/// Copies `src` into a new vec of exactly `len` elements,
/// truncating or padding with default values.
pub fn copy_resized<T: Copy + Default>(src: &[T], len: usize) -> Vec<T> {
    let mut copy = Vec::with_capacity(len);
    copy.extend_from_slice(&src[..len.min(src.len())]);
    copy.resize(len, T::default());
    copy
}

/// Fills every slot with a freshly constructed value.
pub fn fill_with<T>(slice: &mut [T], mut factory: impl FnMut() -> T) {
    for slot in slice.iter_mut() {
        *slot = factory();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_sub_range() {
        let mut data = [5, 4, 3, 2, 1];
        sort_range(&mut data, 1, 4, |a, b| a.cmp(b));
        assert_eq!(data, [5, 2, 3, 4, 1]);
    }

    #[test]
    fn sort_is_stable() {
        let mut data = [(1, 'a'), (0, 'b'), (1, 'c'), (0, 'd')];
        sort_range(&mut data, 0, 4, |a, b| a.0.cmp(&b.0));
        assert_eq!(data, [(0, 'b'), (0, 'd'), (1, 'a'), (1, 'c')]);
    }

    #[test]
    fn fill() {
        let mut data = [1u8; 6];
        fill_range(&mut data, 2, 5, 0);
        assert_eq!(data, [1, 1, 0, 0, 0, 1]);
    }

    #[test]
    fn resize_copy() {
        assert_eq!(copy_resized(&[1, 2, 3], 5), vec![1, 2, 3, 0, 0]);
        assert_eq!(copy_resized(&[1, 2, 3], 2), vec![1, 2]);
        assert!(copy_resized::<i64>(&[], 0).is_empty());
    }

    #[test]
    fn factory_fill() {
        let mut next = 0;
        let mut data = vec![String::new(); 3];
        fill_with(&mut data, || {
            next += 1;
            next.to_string()
        });
        assert_eq!(data, ["1", "2", "3"]);
    }

    #[should_panic]
    #[test]
    fn fill_out_of_range() {
        let mut data = [0u8; 2];
        fill_range(&mut data, 1, 3, 7);
    }
}
