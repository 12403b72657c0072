//! Interop with dynamically typed values.
//!
//! `None` stands for a missing reference. A value of another kind is never an
//! error, it just isn't found.

use super::{Element, ListError, PrimList, Result};
use std::{any::Any, cmp::Ordering};

/// Comparator accepted by [`PrimList::sort_boxed`].
pub type Comparator<T> = fn(T, T) -> Ordering;

fn unbox<T: Element>(value: Option<&dyn Any>) -> Option<T> {
    value?.downcast_ref::<T>().copied()
}

impl<T: Element> PrimList<T> {
    /// Copies elements of a boxed sequence.
    /// Fails if there is no sequence or an element is of another kind.
    pub fn from_boxed(source: Option<&[Box<dyn Any>]>) -> Result<Self> {
        let source = source.ok_or(ListError::ContractViolation("source collection is missing"))?;
        source
            .iter()
            .map(|value| {
                value
                    .downcast_ref::<T>()
                    .copied()
                    .ok_or(ListError::ContractViolation("element of another kind"))
            })
            .collect::<Result<Vec<_>>>()
            .map(Self::wrap)
    }

    pub fn index_of_boxed(&self, value: Option<&dyn Any>) -> Option<usize> {
        unbox(value).and_then(|value| self.index_of(value))
    }

    pub fn last_index_of_boxed(&self, value: Option<&dyn Any>) -> Option<usize> {
        unbox(value).and_then(|value| self.last_index_of(value))
    }

    pub fn contains_boxed(&self, value: Option<&dyn Any>) -> bool {
        self.index_of_boxed(value).is_some()
    }

    /// Removes first occurrence, if the value is of this kind.
    pub fn remove_boxed(&self, value: Option<&dyn Any>) -> bool {
        match unbox(value) {
            Some(value) => self.remove_value(value),
            None => false,
        }
    }

    /// Sorts with natural order for `None`, or with a [`Comparator`] of this
    /// kind. Any other comparator is refused.
    pub fn sort_boxed(&self, comparator: Option<&dyn Any>) -> Result<()> {
        match comparator {
            None => self.sort(),
            Some(comparator) => {
                let compare = comparator.downcast_ref::<Comparator<T>>().ok_or(
                    ListError::ContractViolation("use a comparator specialized for the element kind"),
                )?;
                self.sort_by(*compare)
            }
        }
    }

    pub fn to_boxed(&self) -> Vec<Box<dyn Any>> {
        self.to_vec()
            .into_iter()
            .map(|value| Box::new(value) as Box<dyn Any>)
            .collect()
    }

    /// Element-wise equality with a boxed sequence.
    pub fn equals_boxed(&self, other: &[Box<dyn Any>]) -> Result<bool> {
        let mut elements = Vec::with_capacity(other.len());
        for value in other {
            match value.downcast_ref::<T>() {
                Some(&value) => elements.push(value),
                None => return Ok(false),
            }
        }
        self.equals_iter(elements)
    }
}
