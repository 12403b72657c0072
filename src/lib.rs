//! # Goal
//! Growable arrays that store primitive values unboxed, as a drop-in
//! substitute for a generic array of boxed values.
//!
//! # Features
//! - One container, [`PrimList`](core::PrimList), generic over the closed set
//!   of [`Element`](core::Element) kinds, with an alias per kind.
//! - Amortized 1.5x growth with a lazily allocated default capacity.
//! - Live range views, [`SubList`](core::SubList), which can be nested.
//! - Forward, bidirectional, and splittable cursors.
//! - Fail-fast detection of interference: a structural modification that a
//!   view or cursor didn't make itself is reported as
//!   [`ListError::Interference`](core::ListError::Interference) instead of
//!   silently producing wrong results.
//!
//! # Architecture
//! - Buffer - owns the slots and the growth policy.
//! - List - owns a buffer, logical length, and modification counter.
//! - Views and cursors - borrow the list and validate against the counter
//!   before touching the buffer.
//!
//! All of them are used through shared references on one thread.
//! Containers are neither `Sync` nor meant to be shared across threads.
//!
//! # Cargo features
//! - `floats` (default) - `f32` and `f64` element kinds.
//! - `serde` - `Serialize`/`Deserialize` for lists.

pub mod core;
pub mod persist;
// Generic things
pub mod util;

pub use crate::core::{ListError, PrimList, Result, SubList};
pub use persist::PersistError;

pub type ByteList = PrimList<i8>;
pub type ShortList = PrimList<i16>;
pub type IntList = PrimList<i32>;
pub type LongList = PrimList<i64>;
#[cfg(feature = "floats")]
pub type FloatList = PrimList<f32>;
#[cfg(feature = "floats")]
pub type DoubleList = PrimList<f64>;
pub type CharList = PrimList<char>;
pub type BoolList = PrimList<bool>;
