use super::{index_interference, Iter, ListError, Result, Sequence};

/// Bidirectional cursor that can also replace and insert elements.
///
/// Positioned between elements: `next_index` is the index of the element
/// `try_next` would return.
pub struct ListCursor<'a, S: Sequence + ?Sized> {
    iter: Iter<'a, S>,
}

impl<'a, S: Sequence + ?Sized> ListCursor<'a, S> {
    /// Index must already be checked.
    pub(crate) fn new(seq: &'a S, index: usize) -> Self {
        Self {
            iter: Iter::new(seq, index),
        }
    }

    pub fn has_next(&self) -> bool {
        self.iter.has_next()
    }

    pub fn try_next(&mut self) -> Result<S::Item> {
        self.iter.try_next()
    }

    pub fn has_previous(&self) -> bool {
        self.iter.cursor != 0
    }

    pub fn try_previous(&mut self) -> Result<S::Item> {
        self.iter.check_for_comodification()?;
        let i = self
            .iter
            .cursor
            .checked_sub(1)
            .ok_or(ListError::NoSuchElement)?;
        let seq = self.iter.seq;
        let value = seq.root().element_at(seq.base() + i)?;
        self.iter.cursor = i;
        self.iter.last = Some(i);
        Ok(value)
    }

    pub fn next_index(&self) -> usize {
        self.iter.cursor
    }

    /// None at the start.
    pub fn previous_index(&self) -> Option<usize> {
        self.iter.cursor.checked_sub(1)
    }

    /// Removes the element last returned by `try_next` or `try_previous`.
    pub fn remove(&mut self) -> Result<()> {
        self.iter.remove()
    }

    /// Replaces the element last returned by `try_next` or `try_previous`.
    pub fn set(&mut self, value: S::Item) -> Result<()> {
        let last = self
            .iter
            .last
            .ok_or(ListError::IllegalState("no element to set"))?;
        self.iter.check_for_comodification()?;
        self.iter
            .seq
            .set(last, value)
            .map_err(index_interference)?;
        Ok(())
    }

    /// Inserts before the cursor, a following `try_previous` returns it.
    pub fn add(&mut self, value: S::Item) -> Result<()> {
        self.iter.check_for_comodification()?;
        let i = self.iter.cursor;
        self.iter
            .seq
            .insert(i, value)
            .map_err(index_interference)?;
        self.iter.cursor = i + 1;
        self.iter.last = None;
        self.iter.resync();
        Ok(())
    }

    pub fn for_each_remaining(&mut self, action: impl FnMut(S::Item)) -> Result<()> {
        self.iter.for_each_remaining(action)
    }
}

impl<'a, S: Sequence + ?Sized> Iterator for ListCursor<'a, S> {
    type Item = Result<S::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use crate::core::{ListError, PrimList};

    #[test]
    fn walks_both_ways() {
        let list = PrimList::from(vec!['a', 'b', 'c']);
        let mut cursor = list.list_cursor(3).unwrap();
        assert!(!cursor.has_next());
        assert_eq!(cursor.previous_index(), Some(2));
        assert_eq!(cursor.try_previous().unwrap(), 'c');
        assert_eq!(cursor.try_previous().unwrap(), 'b');
        assert_eq!(cursor.next_index(), 1);
        assert_eq!(cursor.try_next().unwrap(), 'b');
        assert_eq!(cursor.try_previous().unwrap(), 'b');
        assert_eq!(cursor.try_previous().unwrap(), 'a');
        assert!(!cursor.has_previous());
        assert_eq!(cursor.previous_index(), None);
        assert_eq!(cursor.try_previous(), Err(ListError::NoSuchElement));

        assert!(list.list_cursor(4).is_err());
    }

    #[test]
    fn set_and_add() {
        let list = PrimList::from(vec![1, 2, 3]);
        let mut cursor = list.list_cursor(0).unwrap();
        assert_eq!(
            cursor.set(0),
            Err(ListError::IllegalState("no element to set"))
        );
        cursor.try_next().unwrap();
        cursor.set(10).unwrap();
        cursor.add(15).unwrap();
        assert_eq!(cursor.set(0), Err(ListError::IllegalState("no element to set")));
        assert_eq!(cursor.try_next().unwrap(), 2);
        assert_eq!(list.to_vec(), [10, 15, 2, 3]);

        assert_eq!(cursor.try_previous().unwrap(), 2);
        cursor.remove().unwrap();
        assert_eq!(cursor.try_previous().unwrap(), 15);
        assert_eq!(list.to_vec(), [10, 15, 3]);
    }

    #[test]
    fn add_at_end_of_view() {
        let list = PrimList::from(vec![1, 2, 3, 4]);
        let view = list.sub_list(1, 3).unwrap();
        let mut cursor = view.list_cursor(2).unwrap();
        cursor.add(9).unwrap();
        assert!(!cursor.has_next());
        assert_eq!(cursor.try_previous().unwrap(), 9);
        assert_eq!(view.to_vec().unwrap(), [2, 3, 9]);
        assert_eq!(list.to_vec(), [1, 2, 3, 9, 4]);
    }

    #[test]
    fn fails_fast() {
        let list = PrimList::from(vec![1, 2, 3]);
        let mut cursor = list.list_cursor(1).unwrap();
        list.clear();
        assert_eq!(cursor.try_previous(), Err(ListError::Interference));
        assert_eq!(cursor.add(1), Err(ListError::Interference));
    }
}
