//! Value codec
//!
//! Values cross the store boundary as bincode-encoded bytes. Anything that
//! implements `serde::Serialize` can be stored and anything implementing
//! `serde::de::DeserializeOwned` can be read back.
//!
//! ## Absent values
//! A value whose serialized form is `none` or `unit` (looking through newtype
//! wrappers) carries nothing to store and is rejected with `BadValue` before
//! any bytes are produced. Empty strings, zero and empty collections are
//! ordinary values.
//!
//! ```text
//! None::<String>      -> absent   (BadValue)
//! ()                  -> absent   (BadValue)
//! Some(String::new()) -> present
//! ""                  -> present
//! ```

use std::fmt;

use serde::de::DeserializeOwned;
use serde::ser::{self, Impossible, Serialize, Serializer};

use crate::error::{KvError, Result};

/// Encode a value, rejecting absent ones
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    if is_absent(value) {
        return Err(KvError::BadValue);
    }
    Ok(bincode::serialize(value)?)
}

/// Decode bytes produced by [`encode`]
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(bincode::deserialize(bytes)?)
}

/// Whether a value serializes to nothing (`None` or `()`)
pub fn is_absent<T: Serialize + ?Sized>(value: &T) -> bool {
    value.serialize(AbsenceProbe).is_ok()
}

// =============================================================================
// Absence Probe
// =============================================================================

/// Serializer that succeeds only for `none`/`unit`. Any other shape bails out
/// with `Present` on the first call, so probing never walks a whole value.
struct AbsenceProbe;

#[derive(Debug)]
struct Present;

impl fmt::Display for Present {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("value is present")
    }
}

impl std::error::Error for Present {}

impl ser::Error for Present {
    fn custom<M: fmt::Display>(_msg: M) -> Self {
        Present
    }
}

macro_rules! present {
    ($($method:ident($ty:ty)),* $(,)?) => {
        $(
            fn $method(self, _v: $ty) -> std::result::Result<(), Present> {
                Err(Present)
            }
        )*
    };
}

impl Serializer for AbsenceProbe {
    type Ok = ();
    type Error = Present;

    type SerializeSeq = Impossible<(), Present>;
    type SerializeTuple = Impossible<(), Present>;
    type SerializeTupleStruct = Impossible<(), Present>;
    type SerializeTupleVariant = Impossible<(), Present>;
    type SerializeMap = Impossible<(), Present>;
    type SerializeStruct = Impossible<(), Present>;
    type SerializeStructVariant = Impossible<(), Present>;

    present!(
        serialize_bool(bool),
        serialize_i8(i8),
        serialize_i16(i16),
        serialize_i32(i32),
        serialize_i64(i64),
        serialize_u8(u8),
        serialize_u16(u16),
        serialize_u32(u32),
        serialize_u64(u64),
        serialize_f32(f32),
        serialize_f64(f64),
        serialize_char(char),
        serialize_str(&str),
        serialize_bytes(&[u8]),
        serialize_unit_struct(&'static str),
    );

    fn serialize_none(self) -> std::result::Result<(), Present> {
        Ok(())
    }

    fn serialize_unit(self) -> std::result::Result<(), Present> {
        Ok(())
    }

    fn serialize_some<T: Serialize + ?Sized>(self, _value: &T) -> std::result::Result<(), Present> {
        Err(Present)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> std::result::Result<(), Present> {
        Err(Present)
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> std::result::Result<(), Present> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> std::result::Result<(), Present> {
        Err(Present)
    }

    fn serialize_seq(self, _len: Option<usize>) -> std::result::Result<Self::SerializeSeq, Present> {
        Err(Present)
    }

    fn serialize_tuple(self, _len: usize) -> std::result::Result<Self::SerializeTuple, Present> {
        Err(Present)
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> std::result::Result<Self::SerializeTupleStruct, Present> {
        Err(Present)
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> std::result::Result<Self::SerializeTupleVariant, Present> {
        Err(Present)
    }

    fn serialize_map(self, _len: Option<usize>) -> std::result::Result<Self::SerializeMap, Present> {
        Err(Present)
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> std::result::Result<Self::SerializeStruct, Present> {
        Err(Present)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> std::result::Result<Self::SerializeStructVariant, Present> {
        Err(Present)
    }
}
