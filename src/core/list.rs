use super::{
    buffer::{Buffer, DEFAULT_CAPACITY},
    check_index, check_position, check_range, Element, ElementSource, Iter, ListCursor,
    ListError, Membership, Result, Sequence, Spliter, SubList,
};
use crate::util;
use bitvec::prelude::*;
use log::warn;
use std::{
    cell::{Cell, RefCell},
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
};

/// Growable array of unboxed elements.
///
/// All operations take `&self`, so views, cursors, and the list itself can
/// coexist as shared handles on one thread. Every structural modification
/// increments a modification counter which views and cursors compare against
/// their snapshot, failing with [`ListError::Interference`] on mismatch.
///
/// Buffer is never borrowed while user code (predicates, operators,
/// comparators, membership tests) runs, so such code may read the list.
///
/// Not thread safe, and deliberately `!Sync`.
pub struct PrimList<T: Element> {
    buffer: RefCell<Buffer<T>>,
    len: Cell<usize>,
    mod_count: Cell<usize>,
}

impl<T: Element> PrimList<T> {
    /// Empty list which allocates default capacity on first insertion.
    pub fn new() -> Self {
        Self::from_parts(Buffer::lazy(), 0)
    }

    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Ok(Self::from_parts(Buffer::with_capacity(capacity)?, 0))
    }

    /// Takes over the vec without copying, all of it is content.
    pub fn wrap(elements: Vec<T>) -> Self {
        let len = elements.len();
        Self::from_parts(Buffer::from_vec(elements), len)
    }

    /// Takes over the vec without copying as empty reserved capacity.
    pub fn wrap_reserved(mut slots: Vec<T>) -> Self {
        slots.fill(T::default());
        Self::from_parts(Buffer::from_vec(slots), 0)
    }

    fn from_parts(buffer: Buffer<T>, len: usize) -> Self {
        Self {
            buffer: RefCell::new(buffer),
            len: Cell::new(len),
            mod_count: Cell::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.len.get()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.buffer.borrow().capacity()
    }

    /// Number of structural modifications so far, wrapping.
    pub fn mod_count(&self) -> usize {
        self.mod_count.get()
    }

    pub fn get(&self, index: usize) -> Result<T> {
        check_index(index, self.len())?;
        Ok(self.buffer.borrow().slots()[index])
    }

    /// Returns previous value.
    pub fn set(&self, index: usize, value: T) -> Result<T> {
        check_index(index, self.len())?;
        let mut buffer = self.buffer.borrow_mut();
        Ok(std::mem::replace(&mut buffer.slots_mut()[index], value))
    }

    pub fn add(&self, value: T) -> Result<()> {
        let len = self.len();
        self.ensure_explicit(self.required(1)?)?;
        self.buffer.borrow_mut().slots_mut()[len] = value;
        self.len.set(len + 1);
        Ok(())
    }

    pub fn insert(&self, index: usize, value: T) -> Result<()> {
        let len = self.len();
        check_position(index, len)?;
        self.ensure_explicit(self.required(1)?)?;

        let mut buffer = self.buffer.borrow_mut();
        let slots = buffer.slots_mut();
        slots.copy_within(index..len, index + 1);
        slots[index] = value;
        self.len.set(len + 1);
        Ok(())
    }

    /// Removes and returns element at index, shifting the tail left.
    pub fn remove_at(&self, index: usize) -> Result<T> {
        check_index(index, self.len())?;
        let value = self.buffer.borrow().slots()[index];
        self.fast_remove(index);
        Ok(value)
    }

    /// Removes first occurrence of the value.
    pub fn remove_value(&self, value: T) -> bool {
        match self.index_of(value) {
            Some(index) => {
                self.fast_remove(index);
                true
            }
            None => false,
        }
    }

    /// Removes `[from, to)`.
    pub fn remove_range(&self, from: usize, to: usize) -> Result<()> {
        check_range(from, to, self.len())?;
        self.bump(1);
        self.shift_tail_over_gap(from, to);
        Ok(())
    }

    pub fn clear(&self) {
        self.bump(1);
        let len = self.len();
        let mut buffer = self.buffer.borrow_mut();
        util::fill_range(buffer.slots_mut(), 0, len, T::default());
        self.len.set(0);
    }

    pub fn index_of(&self, value: T) -> Option<usize> {
        self.index_of_range(value, 0, self.len())
    }

    pub fn last_index_of(&self, value: T) -> Option<usize> {
        self.last_index_of_range(value, 0, self.len())
    }

    /// Searches only `[from, to)`, returned index is relative to the list.
    pub fn index_of_in(&self, value: T, from: usize, to: usize) -> Result<Option<usize>> {
        check_range(from, to, self.len())?;
        Ok(self.index_of_range(value, from, to))
    }

    pub fn last_index_of_in(&self, value: T, from: usize, to: usize) -> Result<Option<usize>> {
        check_range(from, to, self.len())?;
        Ok(self.last_index_of_range(value, from, to))
    }

    pub fn contains(&self, value: T) -> bool {
        self.index_of(value).is_some()
    }

    /// Appends all elements of the source.
    /// Returns false, without a modification, if source is empty.
    pub fn add_all<S: ElementSource<T> + ?Sized>(&self, source: &S) -> Result<bool> {
        let elements = source.elements()?;
        self.insert_slice(self.len(), &elements)
    }

    pub fn insert_all<S: ElementSource<T> + ?Sized>(&self, index: usize, source: &S) -> Result<bool> {
        check_position(index, self.len())?;
        let elements = source.elements()?;
        self.insert_slice(index, &elements)
    }

    /// Appends elements in iteration order.
    pub fn extend_iter<I: IntoIterator<Item = T>>(&self, iter: I) -> Result<bool> {
        let staged = iter.into_iter().collect::<Vec<_>>();
        self.insert_slice(self.len(), &staged)
    }

    pub fn insert_iter<I: IntoIterator<Item = T>>(&self, index: usize, iter: I) -> Result<bool> {
        check_position(index, self.len())?;
        let staged = iter.into_iter().collect::<Vec<_>>();
        self.insert_slice(index, &staged)
    }

    /// Removes every element that is a member of `members`.
    ///
    /// If membership test fails midway, elements that weren't tested yet are
    /// kept and the error is returned.
    pub fn remove_all<M: Membership<T> + ?Sized>(&self, members: &M) -> Result<bool> {
        self.batch_remove(members, false, 0, self.len())
    }

    /// Removes every element that is not a member of `members`.
    pub fn retain_all<M: Membership<T> + ?Sized>(&self, members: &M) -> Result<bool> {
        self.batch_remove(members, true, 0, self.len())
    }

    pub fn remove_if(&self, filter: impl FnMut(T) -> bool) -> Result<bool> {
        self.remove_if_range(filter, 0, self.len())
    }

    pub fn replace_all(&self, operator: impl FnMut(T) -> T) -> Result<()> {
        self.replace_all_range(operator, 0, self.len())?;
        self.bump(1);
        Ok(())
    }

    /// Sorts by natural order of element keys.
    pub fn sort(&self) -> Result<()> {
        self.sort_range_by(0, self.len(), |a, b| a.key().cmp(&b.key()))
    }

    pub fn sort_by(&self, compare: impl FnMut(T, T) -> Ordering) -> Result<()> {
        self.sort_range_by(0, self.len(), compare)
    }

    pub fn for_each(&self, action: impl FnMut(T)) -> Result<()> {
        self.for_each_range(action, 0, self.len())
    }

    /// Makes room for at least `min` elements.
    pub fn ensure_capacity(&self, min: usize) -> Result<()> {
        let min_expand = if self.buffer.borrow().is_lazy() {
            DEFAULT_CAPACITY
        } else {
            0
        };
        if min > min_expand {
            self.ensure_explicit(min)?;
        }
        Ok(())
    }

    /// Drops unused capacity.
    pub fn trim_to_size(&self) -> Result<()> {
        self.bump(1);
        self.buffer.borrow_mut().trim(self.len())
    }

    pub fn iter(&self) -> Iter<'_, Self> {
        Iter::new(self, 0)
    }

    /// Bidirectional cursor positioned before `index`.
    pub fn list_cursor(&self, index: usize) -> Result<ListCursor<'_, Self>> {
        check_position(index, self.len())?;
        Ok(ListCursor::new(self, index))
    }

    pub fn spliterator(&self) -> Spliter<'_, Self> {
        Spliter::new(self)
    }

    /// Live view of `[from, to)`.
    pub fn sub_list(&self, from: usize, to: usize) -> Result<SubList<'_, T>> {
        check_range(from, to, self.len())?;
        Ok(SubList::of_root(self, from, to))
    }

    /// Element-wise equality with any list or view.
    pub fn try_eq<S: Sequence<Item = T> + ?Sized>(&self, other: &S) -> Result<bool> {
        other.check()?;
        self.equals_window(0, self.len(), other)
    }

    /// Element-wise equality with a generic sequence of elements.
    pub fn equals_iter<I: IntoIterator<Item = T>>(&self, other: I) -> Result<bool> {
        self.equals_range_iter(other, 0, self.len())
    }

    /// Conventional sequence hash: `31 * h + element` starting from 1.
    pub fn hash_code(&self) -> Result<i32> {
        self.hash_code_range(0, self.len())
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.snapshot(0, self.len())
    }

    /// Copies into `dst` if it's large enough, else into a new vec of exact size.
    /// When `dst` has room, slot right after the copied data is set to None.
    pub fn to_array_into(&self, mut dst: Vec<Option<T>>) -> Vec<Option<T>> {
        let len = self.len();
        let buffer = self.buffer.borrow();
        let elements = buffer.slots()[..len].iter().copied().map(Some);
        if dst.len() < len {
            return elements.collect();
        }
        for (slot, value) in dst.iter_mut().zip(elements) {
            *slot = value;
        }
        if dst.len() > len {
            dst[len] = None;
        }
        dst
    }

    // ************************ Shared with views ************************ //

    pub(crate) fn bump(&self, by: usize) {
        self.mod_count.set(self.mod_count.get().wrapping_add(by));
    }

    fn required(&self, additional: usize) -> Result<usize> {
        self.len()
            .checked_add(additional)
            .ok_or(ListError::CapacityOverflow {
                requested: usize::MAX,
            })
    }

    /// Structural modification that may grow the buffer.
    fn ensure_explicit(&self, min: usize) -> Result<()> {
        self.buffer.borrow_mut().ensure(min)?;
        self.bump(1);
        Ok(())
    }

    fn fast_remove(&self, index: usize) {
        self.bump(1);
        self.shift_tail_over_gap(index, index + 1);
    }

    /// Moves `[hi, len)` to `lo` and clears vacated slots.
    fn shift_tail_over_gap(&self, lo: usize, hi: usize) {
        let len = self.len();
        let mut buffer = self.buffer.borrow_mut();
        let slots = buffer.slots_mut();
        slots.copy_within(hi..len, lo);
        let new_len = len - (hi - lo);
        util::fill_range(slots, new_len, len, T::default());
        self.len.set(new_len);
    }

    /// Interference if index is past the buffer.
    pub(crate) fn element_at(&self, index: usize) -> Result<T> {
        self.buffer
            .borrow()
            .slots()
            .get(index)
            .copied()
            .ok_or(ListError::Interference)
    }

    pub(crate) fn store(&self, index: usize, value: T) -> Result<()> {
        let mut buffer = self.buffer.borrow_mut();
        let slot = buffer
            .slots_mut()
            .get_mut(index)
            .ok_or(ListError::Interference)?;
        *slot = value;
        Ok(())
    }

    pub(crate) fn snapshot(&self, from: usize, to: usize) -> Vec<T> {
        self.buffer.borrow().slots()[from..to].to_vec()
    }

    pub(crate) fn index_of_range(&self, value: T, from: usize, to: usize) -> Option<usize> {
        self.buffer.borrow().slots()[from..to]
            .iter()
            .position(|e| e.same(value))
            .map(|i| i + from)
    }

    pub(crate) fn last_index_of_range(&self, value: T, from: usize, to: usize) -> Option<usize> {
        self.buffer.borrow().slots()[from..to]
            .iter()
            .rposition(|e| e.same(value))
            .map(|i| i + from)
    }

    /// Index must already be checked.
    pub(crate) fn insert_slice(&self, index: usize, elements: &[T]) -> Result<bool> {
        if elements.is_empty() {
            return Ok(false);
        }
        let len = self.len();
        self.ensure_explicit(self.required(elements.len())?)?;

        let mut buffer = self.buffer.borrow_mut();
        let slots = buffer.slots_mut();
        slots.copy_within(index..len, index + elements.len());
        slots[index..index + elements.len()].copy_from_slice(elements);
        self.len.set(len + elements.len());
        Ok(true)
    }

    /// Replaces all content, the vec's length becomes capacity.
    pub(crate) fn replace_with(&self, elements: Vec<T>) {
        self.bump(1);
        let len = elements.len();
        *self.buffer.borrow_mut() = Buffer::from_vec(elements);
        self.len.set(len);
    }

    pub(crate) fn remove_range_unchecked(&self, from: usize, to: usize) {
        self.bump(1);
        self.shift_tail_over_gap(from, to);
    }

    /// Keeps elements of `[from, end)` whose membership equals `complement`.
    pub(crate) fn batch_remove<M: Membership<T> + ?Sized>(
        &self,
        members: &M,
        complement: bool,
        from: usize,
        end: usize,
    ) -> Result<bool> {
        let expected = self.mod_count();

        // Initial run of survivors.
        let mut r = from;
        loop {
            if r == end {
                return Ok(false);
            }
            if members.has(self.element_at(r)?)? != complement {
                break;
            }
            r += 1;
        }

        // Compaction finishes in drop, also when a membership test fails.
        let mut compaction = Compaction {
            list: self,
            w: r,
            r: r + 1,
            end,
        };
        while compaction.r < end {
            let value = self.element_at(compaction.r)?;
            let keep = members.has(value)? == complement;
            if self.mod_count() != expected {
                warn!("Membership test modified the list during batch remove");
                return Err(ListError::Interference);
            }
            if keep {
                self.store(compaction.w, value)?;
                compaction.w += 1;
            }
            compaction.r += 1;
        }

        Ok(true)
    }

    pub(crate) fn remove_if_range(
        &self,
        mut filter: impl FnMut(T) -> bool,
        from: usize,
        end: usize,
    ) -> Result<bool> {
        let expected = self.mod_count();

        // Initial run of survivors.
        let mut i = from;
        while i < end && !filter(self.element_at(i)?) {
            i += 1;
        }

        if i == end {
            return if self.mod_count() != expected {
                Err(ListError::Interference)
            } else {
                Ok(false)
            };
        }

        let begin = i;
        let mut doomed = bitvec![0; end - begin];
        doomed.set(0, true);
        for i in begin + 1..end {
            if filter(self.element_at(i)?) {
                doomed.set(i - begin, true);
            }
        }
        if self.mod_count() != expected {
            warn!("Filter modified the list during remove_if");
            return Err(ListError::Interference);
        }

        self.bump(1);
        let mut w = begin;
        {
            let mut buffer = self.buffer.borrow_mut();
            let slots = buffer.slots_mut();
            for i in begin..end {
                if !doomed[i - begin] {
                    slots[w] = slots[i];
                    w += 1;
                }
            }
        }
        self.shift_tail_over_gap(w, end);
        Ok(true)
    }

    /// Doesn't count as modification by itself.
    pub(crate) fn replace_all_range(
        &self,
        mut operator: impl FnMut(T) -> T,
        from: usize,
        end: usize,
    ) -> Result<()> {
        let expected = self.mod_count();
        let mut i = from;
        while self.mod_count() == expected && i < end {
            let value = operator(self.element_at(i)?);
            self.store(i, value)?;
            i += 1;
        }
        if self.mod_count() != expected {
            return Err(ListError::Interference);
        }
        Ok(())
    }

    /// Comparator runs on a copy, result is written back only if
    /// the list wasn't modified in the meantime.
    pub(crate) fn sort_range_by(
        &self,
        from: usize,
        to: usize,
        mut compare: impl FnMut(T, T) -> Ordering,
    ) -> Result<()> {
        let expected = self.mod_count();
        let mut sorted = self.snapshot(from, to);
        let len = sorted.len();
        util::sort_range(&mut sorted, 0, len, |a, b| compare(*a, *b));
        if self.mod_count() != expected {
            return Err(ListError::Interference);
        }

        self.buffer.borrow_mut().slots_mut()[from..to].copy_from_slice(&sorted);
        self.bump(1);
        Ok(())
    }

    pub(crate) fn for_each_range(
        &self,
        mut action: impl FnMut(T),
        from: usize,
        end: usize,
    ) -> Result<()> {
        let expected = self.mod_count();
        let mut i = from;
        while self.mod_count() == expected && i < end {
            action(self.element_at(i)?);
            i += 1;
        }
        if self.mod_count() != expected {
            return Err(ListError::Interference);
        }
        Ok(())
    }

    /// Compares `[from, to)` with the window of another sequence.
    pub(crate) fn equals_window<S: Sequence<Item = T> + ?Sized>(
        &self,
        from: usize,
        to: usize,
        other: &S,
    ) -> Result<bool> {
        let expected = self.mod_count();
        let other_root = other.root();
        let other_expected = other_root.mod_count();

        let equal = {
            let this = self.buffer.borrow();
            let that = other_root.buffer.borrow();
            let base = other.base();
            slices_equal(
                &this.slots()[from..to],
                &that.slots()[base..base + other.window_len()],
            )
        };

        if self.mod_count() != expected || other_root.mod_count() != other_expected {
            return Err(ListError::Interference);
        }
        Ok(equal)
    }

    pub(crate) fn equals_range_iter<I: IntoIterator<Item = T>>(
        &self,
        other: I,
        from: usize,
        to: usize,
    ) -> Result<bool> {
        let expected = self.mod_count();
        let mut i = from;
        let mut equal = true;
        for value in other {
            if i >= to || !self.element_at(i)?.same(value) {
                equal = false;
                break;
            }
            i += 1;
        }
        let equal = equal && i == to;

        if self.mod_count() != expected {
            return Err(ListError::Interference);
        }
        Ok(equal)
    }

    pub(crate) fn hash_code_range(&self, from: usize, to: usize) -> Result<i32> {
        let expected = self.mod_count();
        let hash = self.buffer.borrow().slots()[from..to]
            .iter()
            .fold(1i32, |hash, e| hash.wrapping_mul(31).wrapping_add(e.hash_code()));
        if self.mod_count() != expected {
            return Err(ListError::Interference);
        }
        Ok(hash)
    }
}

/// Finishes batch removal: preserves not yet scanned elements,
/// closes the gap, and counts removed elements as modifications.
struct Compaction<'a, T: Element> {
    list: &'a PrimList<T>,
    /// Write position.
    w: usize,
    /// Read position.
    r: usize,
    end: usize,
}

impl<'a, T: Element> Drop for Compaction<'a, T> {
    fn drop(&mut self) {
        let list = self.list;
        let len = list.len();
        // Clamped in case the list shrank underneath.
        let end = self.end.min(len);
        let r = self.r.min(end);
        let mut w = self.w.min(r);

        if r < end {
            list.buffer.borrow_mut().slots_mut().copy_within(r..end, w);
            w += end - r;
        }
        list.bump(end - w);
        list.shift_tail_over_gap(w, end);
    }
}

fn slices_equal<T: Element>(a: &[T], b: &[T]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same(*y))
}

impl<T: Element> Default for PrimList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Copy of exact size with fresh modification count.
impl<T: Element> Clone for PrimList<T> {
    fn clone(&self) -> Self {
        let buffer = self.buffer.borrow();
        Self::wrap(util::copy_resized(buffer.slots(), self.len()))
    }
}

impl<T: Element> PartialEq for PrimList<T> {
    fn eq(&self, other: &Self) -> bool {
        let this = self.buffer.borrow();
        let that = other.buffer.borrow();
        slices_equal(&this.slots()[..self.len()], &that.slots()[..other.len()])
    }
}

impl<T: Element> Eq for PrimList<T> {}

impl<T: Element> Hash for PrimList<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let buffer = self.buffer.borrow();
        let elements = &buffer.slots()[..self.len()];
        state.write_usize(elements.len());
        for e in elements {
            e.key().hash(state);
        }
    }
}

impl<T: Element> fmt::Debug for PrimList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let buffer = self.buffer.borrow();
        f.debug_list()
            .entries(buffer.slots()[..self.len()].iter())
            .finish()
    }
}

impl<T: Element> FromIterator<T> for PrimList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::wrap(iter.into_iter().collect())
    }
}

impl<T: Element> From<Vec<T>> for PrimList<T> {
    fn from(elements: Vec<T>) -> Self {
        Self::wrap(elements)
    }
}

impl<T: Element> From<&[T]> for PrimList<T> {
    fn from(elements: &[T]) -> Self {
        Self::wrap(elements.to_vec())
    }
}
