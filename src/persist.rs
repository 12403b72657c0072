//! Byte stream persistence of lists.
//!
//! Format is a big-endian `i32` element count followed by every element in
//! its fixed big-endian encoding, see [`Element::encode`].

use crate::core::{Element, ListError, PrimList};
use log::warn;
use std::{
    fmt::Display,
    io::{self, Read, Write},
};

/// Elements are staged in steps of this many, so a forged count
/// can't make the reader allocate more than the stream backs.
const STAGING_STEP: usize = 4096;

#[derive(Debug)]
pub enum PersistError {
    Io(io::Error),
    List(ListError),
}

impl Display for PersistError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(error) => write!(f, "Persistence I/O failed: {}", error),
            Self::List(error) => write!(f, "Persisted list rejected: {}", error),
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(error) => Some(error),
            Self::List(error) => Some(error),
        }
    }
}

impl From<io::Error> for PersistError {
    fn from(error: io::Error) -> Self {
        Self::Io(error)
    }
}

impl From<ListError> for PersistError {
    fn from(error: ListError) -> Self {
        Self::List(error)
    }
}

impl<T: Element> PrimList<T> {
    /// Writes live element count followed by the elements.
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), PersistError> {
        let elements = self.to_vec();
        let len = i32::try_from(elements.len()).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "list is too long for the persisted format",
            )
        })?;

        let mut bytes = Vec::with_capacity(4 + elements.len() * T::ENCODED_LEN);
        bytes.extend_from_slice(&len.to_be_bytes());
        for element in elements {
            element.encode(&mut bytes);
        }
        writer.write_all(&bytes)?;
        Ok(())
    }

    /// Reads a list written by [`PrimList::write_to`].
    pub fn read_from<R: Read + ?Sized>(reader: &mut R) -> Result<Self, PersistError> {
        let mut header = [0u8; 4];
        reader.read_exact(&mut header)?;
        let reported_len = i32::from_be_bytes(header);
        if reported_len < 0 {
            warn!(
                "Rejected persisted {} list with length {}",
                T::KIND,
                reported_len
            );
            return Err(ListError::CorruptState {
                reported_len: reported_len.into(),
            }
            .into());
        }
        let len = reported_len as usize;

        let mut elements = Vec::new();
        let mut encoded = vec![0u8; T::ENCODED_LEN];
        while elements.len() < len {
            if elements.len() == elements.capacity() {
                elements.reserve_exact((len - elements.len()).min(STAGING_STEP));
            }
            reader.read_exact(&mut encoded)?;
            let element = T::decode(&encoded).ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("bytes {:?} aren't a valid {}", encoded, T::KIND),
                )
            })?;
            elements.push(element);
        }

        Ok(Self::wrap(elements))
    }

    /// Replaces content with a list read from the stream.
    /// On failure the list is left as it was.
    pub fn import_from<R: Read + ?Sized>(&self, reader: &mut R) -> Result<(), PersistError> {
        let imported = Self::read_from(reader)?;
        self.replace_with(imported.to_vec());
        Ok(())
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::*;
    use serde::{
        de::{Deserialize, Deserializer},
        ser::{Serialize, SerializeSeq, Serializer},
    };

    impl<T: Element + Serialize> Serialize for PrimList<T> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let elements = self.to_vec();
            let mut seq = serializer.serialize_seq(Some(elements.len()))?;
            for element in &elements {
                seq.serialize_element(element)?;
            }
            seq.end()
        }
    }

    impl<'de, T: Element + Deserialize<'de>> Deserialize<'de> for PrimList<T> {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            Vec::<T>::deserialize(deserializer).map(Self::wrap)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes_of<T: Element>(list: &PrimList<T>) -> Vec<u8> {
        let mut bytes = Vec::new();
        list.write_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn layout() {
        let list = PrimList::from(vec![1i16, -2]);
        assert_eq!(bytes_of(&list), [0, 0, 0, 2, 0, 1, 0xff, 0xfe]);

        let list = PrimList::from(vec![true, false]);
        assert_eq!(bytes_of(&list), [0, 0, 0, 2, 1, 0]);
    }

    #[test]
    fn writes_only_live_elements() {
        let list = PrimList::<i64>::with_capacity(16).unwrap();
        list.add(7).unwrap();
        assert_eq!(bytes_of(&list).len(), 4 + 8);
    }

    #[test]
    fn restores() {
        let list = PrimList::from(vec!['x', 'é', '\u{1F600}']);
        let bytes = bytes_of(&list);
        let restored = PrimList::<char>::read_from(&mut bytes.as_slice()).unwrap();
        assert_eq!(restored, list);
        assert_eq!(restored.capacity(), 3);

        let empty = PrimList::<i32>::read_from(&mut [0u8, 0, 0, 0].as_slice()).unwrap();
        assert!(empty.is_empty());
    }

    #[cfg(feature = "floats")]
    #[test]
    fn restores_nan() {
        let list = PrimList::from(vec![f64::NAN, -0.0]);
        let restored = PrimList::<f64>::read_from(&mut bytes_of(&list).as_slice()).unwrap();
        assert!(restored.get(0).unwrap().is_nan());
        assert!(restored.get(1).unwrap().is_sign_negative());
    }

    #[test]
    fn negative_length_is_corrupt() {
        let bytes = (-1i32).to_be_bytes();
        match PrimList::<i32>::read_from(&mut bytes.as_slice()) {
            Err(PersistError::List(ListError::CorruptState { reported_len })) => {
                assert_eq!(reported_len, -1)
            }
            other => panic!("Expected corrupt state, got {:?}", other),
        }
    }

    #[test]
    fn truncated() {
        let bytes = [0u8, 0, 0, 3, 0, 0, 0, 1];
        match PrimList::<i32>::read_from(&mut bytes.as_slice()) {
            Err(PersistError::Io(error)) => {
                assert_eq!(error.kind(), io::ErrorKind::UnexpectedEof)
            }
            other => panic!("Expected EOF, got {:?}", other),
        }
    }

    #[test]
    fn huge_count_fails_without_allocating_it() {
        let bytes = i32::MAX.to_be_bytes();
        assert!(matches!(
            PrimList::<i64>::read_from(&mut bytes.as_slice()),
            Err(PersistError::Io(_))
        ));
    }

    #[test]
    fn undecodable() {
        let bytes = [0u8, 0, 0, 1, 0, 0x11, 0, 0];
        match PrimList::<char>::read_from(&mut bytes.as_slice()) {
            Err(PersistError::Io(error)) => {
                assert_eq!(error.kind(), io::ErrorKind::InvalidData)
            }
            other => panic!("Expected invalid data, got {:?}", other),
        }
    }

    #[test]
    fn import_replaces_or_keeps() {
        let list = PrimList::from(vec![1, 2, 3]);
        let count = list.mod_count();

        let bad = (-5i32).to_be_bytes();
        assert!(list.import_from(&mut bad.as_slice()).is_err());
        assert_eq!(list.to_vec(), [1, 2, 3]);
        assert_eq!(list.mod_count(), count);

        let good = bytes_of(&PrimList::from(vec![9]));
        list.import_from(&mut good.as_slice()).unwrap();
        assert_eq!(list.to_vec(), [9]);
        assert_eq!(list.mod_count(), count + 1);
    }

    #[test]
    fn error_display() {
        let error = PersistError::from(ListError::CorruptState { reported_len: -2 });
        assert_eq!(
            error.to_string(),
            "Persisted list rejected: Persisted list reports invalid length -2."
        );
    }
}
