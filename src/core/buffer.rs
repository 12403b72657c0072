use super::{ListError, Result};
use log::debug;

/// Capacity given to a default constructed list on its first insertion.
pub const DEFAULT_CAPACITY: usize = 10;

/// Contiguous block of initialized elements that grows by 1.5x.
///
/// Every slot up to capacity holds a valid value, slots past the logical
/// length of the owning list hold default values.
pub(crate) struct Buffer<T> {
    slots: Vec<T>,
    /// Empty buffer of a default constructed list.
    /// Jumps directly to DEFAULT_CAPACITY on first growth.
    lazy_default: bool,
}

impl<T: Copy + Default> Buffer<T> {
    pub fn lazy() -> Self {
        Self {
            slots: Vec::new(),
            lazy_default: true,
        }
    }

    pub fn empty() -> Self {
        Self {
            slots: Vec::new(),
            lazy_default: false,
        }
    }

    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut buffer = Self::empty();
        if capacity > 0 {
            buffer.reallocate(capacity)?;
        }
        Ok(buffer)
    }

    /// Takes over the vec, its length becomes capacity.
    pub fn from_vec(slots: Vec<T>) -> Self {
        Self {
            slots,
            lazy_default: false,
        }
    }

    /// Largest number of elements a buffer can hold.
    pub fn max_len() -> usize {
        isize::MAX as usize / std::mem::size_of::<T>().max(1)
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn is_lazy(&self) -> bool {
        self.lazy_default
    }

    pub fn slots(&self) -> &[T] {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut [T] {
        &mut self.slots
    }

    /// Makes sure there is room for at least `min` elements.
    /// Returns true if it reallocated.
    pub fn ensure(&mut self, min: usize) -> Result<bool> {
        let min = if self.lazy_default {
            min.max(DEFAULT_CAPACITY)
        } else {
            min
        };
        if min <= self.capacity() {
            return Ok(false);
        }
        self.grow(min)?;
        Ok(true)
    }

    fn grow(&mut self, min: usize) -> Result<()> {
        let max = Self::max_len();
        if min > max {
            return Err(ListError::CapacityOverflow { requested: min });
        }

        let old = self.capacity();
        let capacity = (old + (old >> 1)).min(max).max(min);
        self.reallocate(capacity)?;
        debug!("Grew buffer of {} from {} to {}", std::any::type_name::<T>(), old, capacity);
        Ok(())
    }

    /// Drops capacity past `len`.
    pub fn trim(&mut self, len: usize) -> Result<()> {
        let old = self.capacity();
        if len < old {
            if len == 0 {
                self.slots = Vec::new();
                self.lazy_default = false;
            } else {
                self.reallocate(len)?;
            }
            debug!("Trimmed buffer from {} to {}", old, len);
        }
        Ok(())
    }

    fn reallocate(&mut self, capacity: usize) -> Result<()> {
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| ListError::CapacityOverflow {
                requested: capacity,
            })?;
        slots.extend_from_slice(&self.slots[..self.slots.len().min(capacity)]);
        slots.resize(capacity, T::default());

        self.slots = slots;
        self.lazy_default = false;
        Ok(())
    }
}
