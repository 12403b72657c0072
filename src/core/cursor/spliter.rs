use super::{ListError, Result, Sequence};
use modular_bitfield::prelude::*;

/// Traits of the element source a [`Spliter`] traverses.
#[bitfield]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Characteristics {
    pub ordered: bool,
    pub distinct: bool,
    pub sorted: bool,
    pub sized: bool,
    pub nonnull: bool,
    pub immutable: bool,
    pub concurrent: bool,
    pub subsized: bool,
}

/// Late binding, splittable cursor.
///
/// Range and expected modification count are fixed on first use, not on
/// creation. Interference is checked after traversal, so a bulk traversal
/// may hand out elements before reporting it.
pub struct Spliter<'a, S: Sequence + ?Sized> {
    seq: &'a S,
    /// Next index in root coordinates.
    index: usize,
    /// One past the last index, None until bound.
    fence: Option<usize>,
    expected: usize,
}

impl<'a, S: Sequence + ?Sized> Spliter<'a, S> {
    pub(crate) fn new(seq: &'a S) -> Self {
        Self {
            seq,
            index: seq.base(),
            fence: None,
            expected: 0,
        }
    }

    fn fence(&mut self) -> usize {
        match self.fence {
            Some(fence) => fence,
            None => {
                let fence = self.seq.base() + self.seq.window_len();
                self.expected = self.seq.expected_mod_count();
                self.fence = Some(fence);
                fence
            }
        }
    }

    /// Hands the lower half of the remaining range to a new cursor.
    /// None if there is nothing worth splitting.
    pub fn try_split(&mut self) -> Option<Self> {
        let hi = self.fence();
        let lo = self.index;
        let mid = (lo + hi) >> 1;
        if lo >= mid {
            return None;
        }
        self.index = mid;
        Some(Self {
            seq: self.seq,
            index: lo,
            fence: Some(mid),
            expected: self.expected,
        })
    }

    /// Passes the next element to `action`.
    /// Returns false if there are no remaining elements.
    pub fn try_advance(&mut self, action: impl FnOnce(S::Item)) -> Result<bool> {
        let hi = self.fence();
        let i = self.index;
        if i >= hi {
            return Ok(false);
        }
        let root = self.seq.root();
        self.index = i + 1;
        action(root.element_at(i)?);
        if root.mod_count() != self.expected {
            return Err(ListError::Interference);
        }
        Ok(true)
    }

    pub fn for_each_remaining(&mut self, mut action: impl FnMut(S::Item)) -> Result<()> {
        let hi = self.fence();
        let root = self.seq.root();
        if hi > root.capacity() {
            return Err(ListError::Interference);
        }
        let lo = std::mem::replace(&mut self.index, hi);
        for i in lo..hi {
            action(root.element_at(i)?);
        }
        if root.mod_count() != self.expected {
            return Err(ListError::Interference);
        }
        Ok(())
    }

    pub fn estimate_size(&mut self) -> usize {
        self.fence().saturating_sub(self.index)
    }

    pub fn characteristics(&self) -> Characteristics {
        Characteristics::new()
            .with_ordered(true)
            .with_sized(true)
            .with_subsized(true)
    }
}

#[cfg(test)]
mod tests {
    use crate::core::{ListError, PrimList};

    #[test]
    fn advance() {
        let list = PrimList::from(vec![1i16, 2]);
        let mut spliter = list.spliterator();
        let mut seen = Vec::new();
        while spliter.try_advance(|x| seen.push(x)).unwrap() {}
        assert_eq!(seen, [1, 2]);
        assert_eq!(spliter.estimate_size(), 0);
    }

    #[test]
    fn binds_late() {
        let list = PrimList::from(vec![1, 2]);
        let mut spliter = list.spliterator();
        list.add(3).unwrap();
        assert_eq!(spliter.estimate_size(), 3);
        let mut seen = Vec::new();
        spliter.for_each_remaining(|x| seen.push(x)).unwrap();
        assert_eq!(seen, [1, 2, 3]);
    }

    #[test]
    fn split_halves() {
        let list = (0..10).collect::<PrimList<i32>>();
        let mut upper = list.spliterator();
        let mut lower = upper.try_split().unwrap();
        assert_eq!(lower.estimate_size(), 5);
        assert_eq!(upper.estimate_size(), 5);

        let mut seen = Vec::new();
        lower.for_each_remaining(|x| seen.push(x)).unwrap();
        assert_eq!(seen, [0, 1, 2, 3, 4]);

        let mut lowest = upper.try_split().unwrap();
        let mut seen = Vec::new();
        lowest.for_each_remaining(|x| seen.push(x)).unwrap();
        assert_eq!(seen, [5, 6]);

        let view = list.sub_list(3, 4).unwrap();
        let mut spliter = view.spliterator().unwrap();
        assert!(spliter.try_split().is_none());
    }

    #[test]
    fn over_view() {
        let list = (0..6).collect::<PrimList<i32>>();
        let view = list.sub_list(2, 5).unwrap();
        let mut spliter = view.spliterator().unwrap();
        assert_eq!(spliter.estimate_size(), 3);
        let mut seen = Vec::new();
        spliter.for_each_remaining(|x| seen.push(x)).unwrap();
        assert_eq!(seen, [2, 3, 4]);
    }

    #[test]
    fn view_binds_late() {
        let list = (0..5).collect::<PrimList<i32>>();
        let view = list.sub_list(1, 4).unwrap();
        let mut spliter = view.spliterator().unwrap();
        view.add(9).unwrap();
        let mut seen = Vec::new();
        spliter.for_each_remaining(|x| seen.push(x)).unwrap();
        assert_eq!(seen, [1, 2, 3, 9]);
    }

    #[test]
    fn stale_view_binds_as_interference() {
        let list = (0..5).collect::<PrimList<i32>>();
        let view = list.sub_list(1, 4).unwrap();
        let mut spliter = view.spliterator().unwrap();
        list.add(5).unwrap();
        assert_eq!(spliter.try_advance(|_| ()), Err(ListError::Interference));
    }

    #[test]
    fn reports_interference_after_traversal() {
        let list = PrimList::from(vec![1, 2, 3]);
        let mut spliter = list.spliterator();
        let mut seen = Vec::new();
        let result = spliter.for_each_remaining(|x| {
            seen.push(x);
            if x == 1 {
                list.set(2, 7).unwrap();
                list.add(4).unwrap();
            }
        });
        assert_eq!(result, Err(ListError::Interference));
        assert_eq!(seen, [1, 2, 7]);

        let mut spliter = list.spliterator();
        assert!(spliter.try_advance(|_| ()).unwrap());
        list.remove_at(0).unwrap();
        assert_eq!(spliter.try_advance(|_| ()), Err(ListError::Interference));
    }

    #[test]
    fn characteristics() {
        let list = PrimList::<bool>::new();
        let traits = list.spliterator().characteristics();
        assert!(traits.ordered() && traits.sized() && traits.subsized());
        assert!(!traits.distinct() && !traits.sorted() && !traits.immutable());
    }
}
