//! Serde plumbing shared by the 32-byte encodings.
//!
//! Values serialize as a fixed-length tuple of bytes so that binary formats
//! emit exactly 32 bytes with no length prefix. Validation of the decoded
//! bytes is left to the caller's `from_bytes`.

use core::fmt;

use serde::de::{Error, SeqAccess, Visitor};
use serde::ser::SerializeTuple;
use serde::{Deserializer, Serializer};

pub(crate) fn serialize_bytes32<S: Serializer>(
    bytes: &[u8; 32],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut tup = serializer.serialize_tuple(32)?;
    for byte in bytes.iter() {
        tup.serialize_element(byte)?;
    }
    tup.end()
}

pub(crate) fn deserialize_bytes32<'de, D: Deserializer<'de>>(
    deserializer: D,
    what: &'static str,
) -> Result<[u8; 32], D::Error> {
    struct Bytes32Visitor(&'static str);

    impl<'de> Visitor<'de> for Bytes32Visitor {
        type Value = [u8; 32];

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            write!(formatter, "32 bytes encoding {}", self.0)
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<[u8; 32], A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut bytes = [0u8; 32];
            for (i, byte) in bytes.iter_mut().enumerate() {
                *byte = seq
                    .next_element()?
                    .ok_or_else(|| A::Error::invalid_length(i, &"expected 32 bytes"))?;
            }
            Ok(bytes)
        }
    }

    deserializer.deserialize_tuple(32, Bytes32Visitor(what))
}
