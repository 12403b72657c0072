use std::fmt::Display;

pub type Result<T> = std::result::Result<T, ListError>;

/// List level errors.
/// Every one of them is reported to the direct caller, nothing is retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    /// Index outside of `[0, len)` for access or `[0, len]` for insertion.
    IndexOutOfBounds { index: usize, len: usize },
    /// Range is reversed or reaches past the end.
    RangeOutOfBounds { from: usize, to: usize, len: usize },
    /// Structural modification was observed through a stale cursor or view.
    ///
    /// The traversal that got this must be considered aborted.
    Interference,
    /// Cursor has no more elements in the requested direction.
    NoSuchElement,
    /// Cursor operation that needs a previously returned element.
    IllegalState(&'static str),
    /// Requested capacity can't be represented or allocated.
    CapacityOverflow { requested: usize },
    /// Operation was called with an argument it doesn't accept.
    ContractViolation(&'static str),
    /// Persisted state reported an impossible length.
    CorruptState { reported_len: i64 },
}

impl ListError {
    pub fn out_of_bounds(index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds { index, len }
    }

    pub fn out_of_range(from: usize, to: usize, len: usize) -> Self {
        Self::RangeOutOfBounds { from, to, len }
    }

    pub fn is_interference(&self) -> bool {
        matches!(self, Self::Interference)
    }
}

impl Display for ListError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "Index {} out of bounds for length {}.", index, len)
            }
            Self::RangeOutOfBounds { from, to, len } if from > to => write!(
                f,
                "From index {} is greater than to index {} for length {}.",
                from, to, len
            ),
            Self::RangeOutOfBounds { from, to, len } => write!(
                f,
                "Range [{}, {}) out of bounds for length {}.",
                from, to, len
            ),
            Self::Interference => write!(f, "List was structurally modified during the operation."),
            Self::NoSuchElement => write!(f, "No more elements."),
            Self::IllegalState(what) => write!(f, "Illegal cursor state: {}.", what),
            Self::CapacityOverflow { requested } => {
                write!(f, "Capacity {} can't be allocated.", requested)
            }
            Self::ContractViolation(what) => write!(f, "Contract violation: {}.", what),
            Self::CorruptState { reported_len } => {
                write!(f, "Persisted list reports invalid length {}.", reported_len)
            }
        }
    }
}

impl std::error::Error for ListError {}

/// Checks that `index` can be read or written in a sequence of `len`.
pub(crate) fn check_index(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(ListError::out_of_bounds(index, len))
    }
}

/// Checks that `index` is a valid insertion point in a sequence of `len`.
pub(crate) fn check_position(index: usize, len: usize) -> Result<()> {
    if index <= len {
        Ok(())
    } else {
        Err(ListError::out_of_bounds(index, len))
    }
}

/// Checks that `[from, to)` is a valid range in a sequence of `len`.
pub(crate) fn check_range(from: usize, to: usize, len: usize) -> Result<()> {
    if from <= to && to <= len {
        Ok(())
    } else {
        Err(ListError::out_of_range(from, to, len))
    }
}
