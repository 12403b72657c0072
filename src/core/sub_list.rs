use super::{
    check_index, check_position, check_range, Element, ElementSource, Iter, ListCursor,
    ListError, Membership, PrimList, Result, Sequence, Spliter,
};
use getset::CopyGetters;
use log::trace;
use std::{cell::Cell, cmp::Ordering, fmt};

/// Live window onto `[offset, offset + len)` of a root list.
///
/// Doesn't own any elements, every operation is forwarded to the root.
/// Changes made through the view or its sub views keep it valid, any other
/// structural change of the root makes it fail with
/// [`ListError::Interference`].
#[derive(CopyGetters)]
pub struct SubList<'a, T: Element> {
    root: &'a PrimList<T>,
    parent: Option<&'a SubList<'a, T>>,
    /// Position of the first element in the root.
    #[getset(get_copy = "pub")]
    offset: usize,
    size: Cell<usize>,
    mod_count: Cell<usize>,
}

impl<'a, T: Element> SubList<'a, T> {
    /// Range must already be checked.
    pub(crate) fn of_root(root: &'a PrimList<T>, from: usize, to: usize) -> Self {
        trace!("View [{}, {}) of list with {} elements", from, to, root.len());
        Self {
            root,
            parent: None,
            offset: from,
            size: Cell::new(to - from),
            mod_count: Cell::new(root.mod_count()),
        }
    }

    fn of_parent(parent: &'a SubList<'a, T>, from: usize, to: usize) -> Self {
        Self {
            root: parent.root,
            parent: Some(parent),
            offset: parent.offset + from,
            size: Cell::new(to - from),
            mod_count: Cell::new(parent.mod_count.get()),
        }
    }

    pub fn len(&self) -> Result<usize> {
        self.check_for_comodification()?;
        Ok(self.size.get())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    pub fn get(&self, index: usize) -> Result<T> {
        check_index(index, self.size.get())?;
        self.check_for_comodification()?;
        self.root.element_at(self.offset + index)
    }

    /// Returns previous value.
    pub fn set(&self, index: usize, value: T) -> Result<T> {
        check_index(index, self.size.get())?;
        self.check_for_comodification()?;
        let old = self.root.element_at(self.offset + index)?;
        self.root.store(self.offset + index, value)?;
        Ok(old)
    }

    /// Appends to the end of the view, which inserts into the root.
    pub fn add(&self, value: T) -> Result<()> {
        self.insert(self.size.get(), value)
    }

    pub fn insert(&self, index: usize, value: T) -> Result<()> {
        check_position(index, self.size.get())?;
        self.check_for_comodification()?;
        self.root.insert(self.offset + index, value)?;
        self.update_size_and_mod_count(1);
        Ok(())
    }

    pub fn remove_at(&self, index: usize) -> Result<T> {
        check_index(index, self.size.get())?;
        self.check_for_comodification()?;
        let value = self.root.remove_at(self.offset + index)?;
        self.update_size_and_mod_count(-1);
        Ok(value)
    }

    pub fn remove_value(&self, value: T) -> Result<bool> {
        match self.index_of(value)? {
            Some(index) => {
                self.remove_at(index)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn remove_range(&self, from: usize, to: usize) -> Result<()> {
        check_range(from, to, self.size.get())?;
        self.check_for_comodification()?;
        self.root
            .remove_range_unchecked(self.offset + from, self.offset + to);
        self.update_size_and_mod_count(-((to - from) as isize));
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.remove_range(0, self.size.get())
    }

    pub fn index_of(&self, value: T) -> Result<Option<usize>> {
        let (from, to) = self.bounds()?;
        Ok(self
            .root
            .index_of_range(value, from, to)
            .map(|i| i - self.offset))
    }

    pub fn last_index_of(&self, value: T) -> Result<Option<usize>> {
        let (from, to) = self.bounds()?;
        Ok(self
            .root
            .last_index_of_range(value, from, to)
            .map(|i| i - self.offset))
    }

    pub fn contains(&self, value: T) -> Result<bool> {
        Ok(self.index_of(value)?.is_some())
    }

    pub fn add_all<S: ElementSource<T> + ?Sized>(&self, source: &S) -> Result<bool> {
        self.insert_all(self.size.get(), source)
    }

    pub fn insert_all<S: ElementSource<T> + ?Sized>(&self, index: usize, source: &S) -> Result<bool> {
        check_position(index, self.size.get())?;
        let elements = source.elements()?;
        if elements.is_empty() {
            return Ok(false);
        }
        self.check_for_comodification()?;
        self.root.insert_slice(self.offset + index, &elements)?;
        self.update_size_and_mod_count(elements.len() as isize);
        Ok(true)
    }

    pub fn remove_all<M: Membership<T> + ?Sized>(&self, members: &M) -> Result<bool> {
        self.batch_remove(members, false)
    }

    pub fn retain_all<M: Membership<T> + ?Sized>(&self, members: &M) -> Result<bool> {
        self.batch_remove(members, true)
    }

    fn batch_remove<M: Membership<T> + ?Sized>(&self, members: &M, complement: bool) -> Result<bool> {
        let (from, to) = self.bounds()?;
        let old_len = self.root.len();
        let result = self.root.batch_remove(members, complement, from, to);
        match result {
            // Root was changed by someone else, stay stale.
            Ok(false) | Err(ListError::Interference) => (),
            Ok(true) | Err(_) => {
                self.update_size_and_mod_count(self.root.len() as isize - old_len as isize)
            }
        }
        result
    }

    pub fn remove_if(&self, filter: impl FnMut(T) -> bool) -> Result<bool> {
        let (from, to) = self.bounds()?;
        let old_len = self.root.len();
        let removed = self.root.remove_if_range(filter, from, to)?;
        if removed {
            self.update_size_and_mod_count(self.root.len() as isize - old_len as isize);
        }
        Ok(removed)
    }

    pub fn replace_all(&self, operator: impl FnMut(T) -> T) -> Result<()> {
        let (from, to) = self.bounds()?;
        self.root.replace_all_range(operator, from, to)?;
        self.root.bump(1);
        self.update_size_and_mod_count(0);
        Ok(())
    }

    /// Sorts the window by natural order of element keys.
    pub fn sort(&self) -> Result<()> {
        self.sort_by(|a, b| a.key().cmp(&b.key()))
    }

    pub fn sort_by(&self, compare: impl FnMut(T, T) -> Ordering) -> Result<()> {
        let (from, to) = self.bounds()?;
        self.root.sort_range_by(from, to, compare)?;
        self.update_size_and_mod_count(0);
        Ok(())
    }

    pub fn for_each(&self, action: impl FnMut(T)) -> Result<()> {
        let (from, to) = self.bounds()?;
        self.root.for_each_range(action, from, to)
    }

    pub fn iter(&self) -> Result<Iter<'_, Self>> {
        self.check_for_comodification()?;
        Ok(Iter::new(self, 0))
    }

    pub fn list_cursor(&self, index: usize) -> Result<ListCursor<'_, Self>> {
        self.check_for_comodification()?;
        check_position(index, self.size.get())?;
        Ok(ListCursor::new(self, index))
    }

    pub fn spliterator(&self) -> Result<Spliter<'_, Self>> {
        self.check_for_comodification()?;
        Ok(Spliter::new(self))
    }

    /// View of `[from, to)` of this view.
    pub fn sub_list(&self, from: usize, to: usize) -> Result<SubList<'_, T>> {
        self.check_for_comodification()?;
        check_range(from, to, self.size.get())?;
        Ok(SubList::of_parent(self, from, to))
    }

    pub fn to_vec(&self) -> Result<Vec<T>> {
        let (from, to) = self.bounds()?;
        Ok(self.root.snapshot(from, to))
    }

    pub fn try_eq<S: Sequence<Item = T> + ?Sized>(&self, other: &S) -> Result<bool> {
        let (from, to) = self.bounds()?;
        other.check()?;
        self.root.equals_window(from, to, other)
    }

    pub fn equals_iter<I: IntoIterator<Item = T>>(&self, other: I) -> Result<bool> {
        let (from, to) = self.bounds()?;
        self.root.equals_range_iter(other, from, to)
    }

    pub fn hash_code(&self) -> Result<i32> {
        let (from, to) = self.bounds()?;
        self.root.hash_code_range(from, to)
    }

    /// Validated window in root coordinates.
    fn bounds(&self) -> Result<(usize, usize)> {
        self.check_for_comodification()?;
        Ok((self.offset, self.offset + self.size.get()))
    }

    fn check_for_comodification(&self) -> Result<()> {
        if self.root.mod_count() != self.mod_count.get() {
            Err(ListError::Interference)
        } else {
            Ok(())
        }
    }

    /// Applies size change to this view and all of its ancestors.
    fn update_size_and_mod_count(&self, delta: isize) {
        let mod_count = self.root.mod_count();
        let mut view = Some(self);
        while let Some(current) = view {
            current
                .size
                .set(current.size.get().wrapping_add_signed(delta));
            current.mod_count.set(mod_count);
            view = current.parent;
        }
    }
}

impl<'a, T: Element> Sequence for SubList<'a, T> {
    type Item = T;

    fn root(&self) -> &PrimList<T> {
        self.root
    }

    fn base(&self) -> usize {
        self.offset
    }

    fn window_len(&self) -> usize {
        self.size.get()
    }

    fn check(&self) -> Result<()> {
        self.check_for_comodification()
    }

    fn expected_mod_count(&self) -> usize {
        self.mod_count.get()
    }

    fn get(&self, index: usize) -> Result<T> {
        SubList::get(self, index)
    }

    fn set(&self, index: usize, value: T) -> Result<T> {
        SubList::set(self, index, value)
    }

    fn insert(&self, index: usize, value: T) -> Result<()> {
        SubList::insert(self, index, value)
    }

    fn remove_at(&self, index: usize) -> Result<T> {
        SubList::remove_at(self, index)
    }
}

impl<'a, T: Element> fmt::Debug for SubList<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_vec() {
            Ok(elements) => f.debug_list().entries(elements.iter()).finish(),
            Err(_) => write!(f, "[stale view]"),
        }
    }
}
