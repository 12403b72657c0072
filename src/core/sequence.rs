use super::{Element, PrimList, Result};

/// Window of a root list that cursors can traverse and edit.
///
/// Indices are local to the window.
pub trait Sequence {
    type Item: Element;

    /// List owning the buffer.
    fn root(&self) -> &PrimList<Self::Item>;

    /// Position of the window's first element in the root.
    fn base(&self) -> usize;

    /// Length of the window as last observed, without validation.
    fn window_len(&self) -> usize;

    /// Interference if the window is stale.
    fn check(&self) -> Result<()>;

    /// Modification count of the root this window is valid for.
    fn expected_mod_count(&self) -> usize;

    fn get(&self, index: usize) -> Result<Self::Item>;

    fn set(&self, index: usize, value: Self::Item) -> Result<Self::Item>;

    fn insert(&self, index: usize, value: Self::Item) -> Result<()>;

    fn remove_at(&self, index: usize) -> Result<Self::Item>;
}

impl<T: Element> Sequence for PrimList<T> {
    type Item = T;

    fn root(&self) -> &PrimList<T> {
        self
    }

    fn base(&self) -> usize {
        0
    }

    fn window_len(&self) -> usize {
        self.len()
    }

    fn check(&self) -> Result<()> {
        Ok(())
    }

    fn expected_mod_count(&self) -> usize {
        self.mod_count()
    }

    fn get(&self, index: usize) -> Result<T> {
        PrimList::get(self, index)
    }

    fn set(&self, index: usize, value: T) -> Result<T> {
        PrimList::set(self, index, value)
    }

    fn insert(&self, index: usize, value: T) -> Result<()> {
        PrimList::insert(self, index, value)
    }

    fn remove_at(&self, index: usize) -> Result<T> {
        PrimList::remove_at(self, index)
    }
}
