mod list_cursor;
mod spliter;

pub use list_cursor::ListCursor;
pub use spliter::{Characteristics, Spliter};

use super::{ListError, Result, Sequence};

/// Forward cursor over a list or view.
///
/// Fail-fast: any structural modification not made through this cursor is
/// reported as [`ListError::Interference`] on the next access.
pub struct Iter<'a, S: Sequence + ?Sized> {
    seq: &'a S,
    /// Index of the next element, local to the window.
    cursor: usize,
    /// Index of the last returned element, None after `remove`/`add`.
    last: Option<usize>,
    expected: usize,
    /// Set once Iterator::next yielded an error.
    fused: bool,
}

impl<'a, S: Sequence + ?Sized> Iter<'a, S> {
    /// Index must already be checked.
    pub(crate) fn new(seq: &'a S, index: usize) -> Self {
        Self {
            seq,
            cursor: index,
            last: None,
            expected: seq.root().mod_count(),
            fused: false,
        }
    }

    pub fn has_next(&self) -> bool {
        self.cursor != self.seq.window_len()
    }

    pub fn try_next(&mut self) -> Result<S::Item> {
        self.check_for_comodification()?;
        let i = self.cursor;
        if i >= self.seq.window_len() {
            return Err(ListError::NoSuchElement);
        }
        let value = self.seq.root().element_at(self.seq.base() + i)?;
        self.cursor = i + 1;
        self.last = Some(i);
        Ok(value)
    }

    /// Removes the last returned element.
    pub fn remove(&mut self) -> Result<()> {
        let last = self
            .last
            .ok_or(ListError::IllegalState("no element to remove"))?;
        self.check_for_comodification()?;
        self.seq.remove_at(last).map_err(index_interference)?;
        self.cursor = last;
        self.last = None;
        self.resync();
        Ok(())
    }

    /// Passes the rest of the elements to `action`.
    /// Modification by `action` stops the traversal and is reported at the end.
    pub fn for_each_remaining(&mut self, mut action: impl FnMut(S::Item)) -> Result<()> {
        let size = self.seq.window_len();
        let mut i = self.cursor;
        if i >= size {
            return Ok(());
        }
        let root = self.seq.root();
        let base = self.seq.base();
        if base + size > root.capacity() {
            return Err(ListError::Interference);
        }
        while i != size && root.mod_count() == self.expected {
            action(root.element_at(base + i)?);
            i += 1;
        }
        self.cursor = i;
        self.last = i.checked_sub(1);
        self.check_for_comodification()
    }

    fn check_for_comodification(&self) -> Result<()> {
        if self.seq.root().mod_count() != self.expected {
            Err(ListError::Interference)
        } else {
            Ok(())
        }
    }

    fn resync(&mut self) {
        self.expected = self.seq.root().mod_count();
    }
}

impl<'a, S: Sequence + ?Sized> Iterator for Iter<'a, S> {
    type Item = Result<S::Item>;

    /// Yields an interference error once, then ends.
    fn next(&mut self) -> Option<Self::Item> {
        if self.fused || !self.has_next() {
            return None;
        }
        let result = self.try_next();
        self.fused = result.is_err();
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.fused {
            return (0, Some(0));
        }
        let remaining = self.seq.window_len().saturating_sub(self.cursor);
        (remaining, Some(remaining))
    }
}

/// Index errors while editing through a cursor mean the window moved underneath.
fn index_interference(error: ListError) -> ListError {
    match error {
        ListError::IndexOutOfBounds { .. } | ListError::RangeOutOfBounds { .. } => {
            ListError::Interference
        }
        error => error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PrimList;

    #[test]
    fn iterates_in_order() {
        let list = PrimList::from(vec![1, 2, 3]);
        let collected = list.iter().collect::<Result<Vec<_>>>().unwrap();
        assert_eq!(collected, [1, 2, 3]);
        assert_eq!(list.iter().size_hint(), (3, Some(3)));
    }

    #[test]
    fn exhausted() {
        let list = PrimList::from(vec![1]);
        let mut iter = list.iter();
        assert_eq!(iter.try_next().unwrap(), 1);
        assert!(!iter.has_next());
        assert_eq!(iter.try_next(), Err(ListError::NoSuchElement));
        assert!(iter.next().is_none());
    }

    #[test]
    fn remove_through_cursor() {
        let list = PrimList::from(vec![1, 2, 3, 4]);
        let mut iter = list.iter();
        assert_eq!(
            iter.remove(),
            Err(ListError::IllegalState("no element to remove"))
        );
        while iter.has_next() {
            if iter.try_next().unwrap() % 2 == 0 {
                iter.remove().unwrap();
            }
        }
        assert_eq!(list.to_vec(), [1, 3]);
        assert!(iter.remove().is_err());
    }

    #[test]
    fn fails_fast() {
        let list = PrimList::from(vec![1, 2, 3]);
        let mut iter = list.iter();
        iter.try_next().unwrap();
        list.add(4).unwrap();
        assert_eq!(iter.try_next(), Err(ListError::Interference));
        assert_eq!(iter.remove(), Err(ListError::Interference));

        let mut iter = list.iter();
        list.remove_at(0).unwrap();
        assert_eq!(iter.next(), Some(Err(ListError::Interference)));
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn set_is_not_interference() {
        let list = PrimList::from(vec![1, 2]);
        let mut iter = list.iter();
        iter.try_next().unwrap();
        list.set(1, 5).unwrap();
        assert_eq!(iter.try_next().unwrap(), 5);
    }

    #[test]
    fn for_each_remaining() {
        let list = PrimList::from(vec![1, 2, 3, 4]);
        let mut iter = list.iter();
        iter.try_next().unwrap();
        let mut seen = Vec::new();
        iter.for_each_remaining(|x| seen.push(x)).unwrap();
        assert_eq!(seen, [2, 3, 4]);
        assert!(!iter.has_next());
        iter.remove().unwrap();
        assert_eq!(list.to_vec(), [1, 2, 3]);
    }

    #[test]
    fn for_each_remaining_stops_on_write() {
        let list = PrimList::from(vec![1, 2, 3, 4]);
        let mut iter = list.iter();
        let mut seen = Vec::new();
        let result = iter.for_each_remaining(|x| {
            seen.push(x);
            list.add(0).unwrap();
        });
        assert_eq!(result, Err(ListError::Interference));
        assert_eq!(seen, [1]);
    }

    #[test]
    fn over_view() {
        let list = PrimList::from(vec![0, 1, 2, 3, 4]);
        let view = list.sub_list(1, 4).unwrap();
        let mut iter = view.iter().unwrap();
        assert_eq!(iter.try_next().unwrap(), 1);
        iter.remove().unwrap();
        assert_eq!(iter.try_next().unwrap(), 2);
        assert_eq!(view.to_vec().unwrap(), [2, 3]);
        assert_eq!(list.to_vec(), [0, 2, 3, 4]);
        assert_eq!(iter.try_next().unwrap(), 3);
        assert!(!iter.has_next());
    }
}
