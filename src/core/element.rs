use std::{fmt::Debug, hash::Hash};

/// A fixed-width unboxed value that can be stored in a [`PrimList`](super::PrimList).
///
/// Implemented for a closed set of primitive kinds. All of the list
/// algorithms are written once against this trait.
pub trait Element: Copy + Default + PartialEq + Debug + 'static {
    /// Value used for equality, searching, natural ordering, and hashing.
    ///
    /// For integer kinds this is the value itself. Float kinds use a total
    /// order wrapper so that equality is reflexive even for NaN.
    type Key: Copy + Eq + Ord + Hash + Debug;

    /// Human readable name of the kind.
    const KIND: &'static str;

    /// Number of bytes written by [`Element::encode`].
    const ENCODED_LEN: usize;

    fn key(self) -> Self::Key;

    /// Contribution of this element to the sequence hash.
    /// Consistent with equality of keys.
    fn hash_code(self) -> i32;

    /// Appends big-endian encoding of self.
    fn encode(self, out: &mut Vec<u8>);

    /// Decodes from exactly [`Element::ENCODED_LEN`] bytes.
    /// None if the bytes don't represent a value of this kind.
    fn decode(bytes: &[u8]) -> Option<Self>;

    fn same(self, other: Self) -> bool {
        self.key() == other.key()
    }
}

macro_rules! integer_element {
    ($($ty:ty => $kind:literal, |$v:ident| $hash:expr;)*) => {$(
        impl Element for $ty {
            type Key = $ty;

            const KIND: &'static str = $kind;

            const ENCODED_LEN: usize = std::mem::size_of::<$ty>();

            #[inline]
            fn key(self) -> Self::Key {
                self
            }

            #[inline]
            fn hash_code(self) -> i32 {
                let $v = self;
                $hash
            }

            fn encode(self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_be_bytes());
            }

            fn decode(bytes: &[u8]) -> Option<Self> {
                Some(<$ty>::from_be_bytes(bytes.try_into().ok()?))
            }
        }
    )*};
}

integer_element! {
    i8 => "byte", |v| v as i32;
    i16 => "short", |v| v as i32;
    i32 => "int", |v| v;
    i64 => "long", |v| (v ^ ((v as u64) >> 32) as i64) as i32;
}

#[cfg(feature = "floats")]
macro_rules! float_element {
    ($($ty:ty => $kind:literal, $bits:ty, |$b:ident| $fold:expr;)*) => {$(
        impl Element for $ty {
            type Key = ordered_float::OrderedFloat<$ty>;

            const KIND: &'static str = $kind;

            const ENCODED_LEN: usize = std::mem::size_of::<$ty>();

            #[inline]
            fn key(self) -> Self::Key {
                ordered_float::OrderedFloat(self)
            }

            fn hash_code(self) -> i32 {
                // Keys consider -0.0 equal to 0.0 and all NaNs equal.
                let canonical = if self.is_nan() {
                    <$ty>::NAN
                } else if self == 0.0 {
                    0.0
                } else {
                    self
                };
                let $b = canonical.to_bits();
                $fold
            }

            fn encode(self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_bits().to_be_bytes());
            }

            fn decode(bytes: &[u8]) -> Option<Self> {
                Some(<$ty>::from_bits(<$bits>::from_be_bytes(bytes.try_into().ok()?)))
            }
        }
    )*};
}

#[cfg(feature = "floats")]
float_element! {
    f32 => "float", u32, |b| b as i32;
    f64 => "double", u64, |b| (b ^ (b >> 32)) as i32;
}

impl Element for char {
    type Key = char;

    const KIND: &'static str = "char";

    const ENCODED_LEN: usize = 4;

    #[inline]
    fn key(self) -> Self::Key {
        self
    }

    fn hash_code(self) -> i32 {
        self as u32 as i32
    }

    fn encode(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&(self as u32).to_be_bytes());
    }

    fn decode(bytes: &[u8]) -> Option<Self> {
        char::from_u32(u32::from_be_bytes(bytes.try_into().ok()?))
    }
}

impl Element for bool {
    type Key = bool;

    const KIND: &'static str = "boolean";

    const ENCODED_LEN: usize = 1;

    #[inline]
    fn key(self) -> Self::Key {
        self
    }

    fn hash_code(self) -> i32 {
        if self {
            1231
        } else {
            1237
        }
    }

    fn encode(self, out: &mut Vec<u8>) {
        out.push(self as u8);
    }

    fn decode(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [0] => Some(false),
            [_] => Some(true),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_hash_folds_halves() {
        assert_eq!(1i64.hash_code(), 1);
        assert_eq!((1i64 << 32).hash_code(), 1);
        assert_eq!((-1i64).hash_code(), 0);
    }

    #[cfg(feature = "floats")]
    #[test]
    fn float_keys_are_reflexive() {
        assert!(f64::NAN.same(f64::NAN));
        assert!(0.0f64.same(-0.0));
        assert_eq!(0.0f64.hash_code(), (-0.0f64).hash_code());
        assert_eq!(f32::NAN.hash_code(), (-f32::NAN).hash_code());
        assert!(!1.0f32.same(2.0));
    }

    #[test]
    fn encode_is_big_endian() {
        let mut out = Vec::new();
        0x0102_0304i32.encode(&mut out);
        true.encode(&mut out);
        'A'.encode(&mut out);
        assert_eq!(out, [1, 2, 3, 4, 1, 0, 0, 0, 0x41]);
        assert_eq!(i32::decode(&out[..4]), Some(0x0102_0304));
        assert_eq!(bool::decode(&out[4..5]), Some(true));
        assert_eq!(char::decode(&out[5..]), Some('A'));
    }

    #[test]
    fn decode_rejects_invalid() {
        assert_eq!(char::decode(&0xD800u32.to_be_bytes()), None);
        assert_eq!(i16::decode(&[1]), None);
        assert_eq!(bool::decode(&[]), None);
    }
}
