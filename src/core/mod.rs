mod boxed;
mod buffer;
mod cursor;
mod element;
mod error;
mod list;
mod sequence;
mod source;
mod sub_list;

pub use boxed::Comparator;
pub use buffer::DEFAULT_CAPACITY;
pub use cursor::{Characteristics, Iter, ListCursor, Spliter};
pub use element::Element;
pub use error::{ListError, Result};
pub use list::PrimList;
pub use sequence::Sequence;
pub use source::{ElementSource, Matching, Membership};
pub use sub_list::SubList;

pub(crate) use error::{check_index, check_position, check_range};
