use super::{Element, PrimList, Result, SubList};
use ahash::AHashSet;
use std::{
    borrow::Cow,
    collections::{BTreeSet, HashSet},
    hash::BuildHasher,
};

/// Source of elements for bulk insertion.
///
/// Lists and views hand over a raw copy of their buffer so bulk insertion is
/// a single block copy.
pub trait ElementSource<T: Element> {
    fn elements(&self) -> Result<Cow<'_, [T]>>;
}

impl<T: Element> ElementSource<T> for PrimList<T> {
    fn elements(&self) -> Result<Cow<'_, [T]>> {
        Ok(Cow::Owned(self.to_vec()))
    }
}

impl<'a, T: Element> ElementSource<T> for SubList<'a, T> {
    fn elements(&self) -> Result<Cow<'_, [T]>> {
        Ok(Cow::Owned(self.to_vec()?))
    }
}

impl<T: Element> ElementSource<T> for [T] {
    fn elements(&self) -> Result<Cow<'_, [T]>> {
        Ok(Cow::Borrowed(self))
    }
}

impl<T: Element> ElementSource<T> for Vec<T> {
    fn elements(&self) -> Result<Cow<'_, [T]>> {
        Ok(Cow::Borrowed(self))
    }
}

impl<T: Element, const N: usize> ElementSource<T> for [T; N] {
    fn elements(&self) -> Result<Cow<'_, [T]>> {
        Ok(Cow::Borrowed(self))
    }
}

/// Set membership test used by batch removal.
///
/// Can fail, for example when the members are a view that went stale.
pub trait Membership<T: Element> {
    fn has(&self, value: T) -> Result<bool>;
}

impl<T: Element> Membership<T> for PrimList<T> {
    fn has(&self, value: T) -> Result<bool> {
        Ok(self.contains(value))
    }
}

impl<'a, T: Element> Membership<T> for SubList<'a, T> {
    fn has(&self, value: T) -> Result<bool> {
        self.contains(value)
    }
}

impl<T: Element> Membership<T> for [T] {
    fn has(&self, value: T) -> Result<bool> {
        Ok(self.iter().any(|e| e.same(value)))
    }
}

impl<T: Element> Membership<T> for Vec<T> {
    fn has(&self, value: T) -> Result<bool> {
        self.as_slice().has(value)
    }
}

impl<T: Element> Membership<T> for AHashSet<T::Key> {
    fn has(&self, value: T) -> Result<bool> {
        Ok(self.contains(&value.key()))
    }
}

impl<T: Element, S: BuildHasher> Membership<T> for HashSet<T::Key, S> {
    fn has(&self, value: T) -> Result<bool> {
        Ok(self.contains(&value.key()))
    }
}

impl<T: Element> Membership<T> for BTreeSet<T::Key> {
    fn has(&self, value: T) -> Result<bool> {
        Ok(self.contains(&value.key()))
    }
}

/// Membership defined by a fallible test.
pub struct Matching<F>(pub F);

impl<T: Element, F: Fn(T) -> Result<bool>> Membership<T> for Matching<F> {
    fn has(&self, value: T) -> Result<bool> {
        (self.0)(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_borrow() {
        let data = vec![1, 2, 3];
        assert!(matches!(data.elements().unwrap(), Cow::Borrowed(_)));
        assert!(matches!([4, 5].elements().unwrap(), Cow::Borrowed(_)));
    }

    #[test]
    fn list_snapshots() {
        let list = PrimList::from(vec![1i16, 2]);
        assert_eq!(&*list.elements().unwrap(), &[1, 2]);
    }

    #[test]
    fn membership_by_key() {
        let set = [1, 3].into_iter().collect::<HashSet<i32>>();
        assert!(set.has(3i32).unwrap());
        assert!(!set.has(2i32).unwrap());

        let set = ['a'].into_iter().collect::<BTreeSet<char>>();
        assert!(set.has('a').unwrap());
        assert!(!vec![true].has(false).unwrap());
    }

    #[cfg(feature = "floats")]
    #[test]
    fn float_membership() {
        let set = [ordered_float::OrderedFloat(f64::NAN)]
            .into_iter()
            .collect::<AHashSet<_>>();
        assert!(set.has(f64::NAN).unwrap());
        assert!([0.0f32][..].has(-0.0).unwrap());
    }

    #[test]
    fn stale_view_membership_fails() {
        let list = PrimList::from(vec![1, 2, 3]);
        let view = list.sub_list(0, 2).unwrap();
        assert!(view.has(2).unwrap());
        list.clear();
        assert!(view.has(2).is_err());
    }
}
