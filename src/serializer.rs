use std::fmt;

use serde::ser::{
    Error as SerdeError, Impossible, Serialize, SerializeSeq,
    SerializeTuple, SerializeTupleStruct, Serializer,
};

use crate::error::{Error, Result};

const NOT_A_SEQUENCE: &str = "record must be a sequence";
const KEYED: &str = "keyed mappings are not supported";
const NESTED: &str = "nested containers are not supported";

/// Convert `value` into the fields of one record.
///
/// `Ok(None)` means there is nothing to write. No output is produced here,
/// so a value that fails halfway never leaves a partial line behind.
pub(crate) fn to_fields<S: Serialize + ?Sized>(
    value: &S,
) -> Result<Option<Vec<String>>> {
    value.serialize(SeRecord)
}

fn err<T>(msg: &str) -> Result<T> {
    Err(Error::custom(msg))
}

/// Serializes the top level value: a sequence of scalars, or nothing.
struct SeRecord;

/// Collects the elements of the top level sequence.
struct SeFields {
    fields: Vec<String>,
}

/// Serializes one scalar into the text of a field.
struct SeField;

impl Serializer for SeRecord {
    type Ok = Option<Vec<String>>;
    type Error = Error;
    type SerializeSeq = SeFields;
    type SerializeTuple = SeFields;
    type SerializeTupleStruct = SeFields;
    type SerializeTupleVariant = Impossible<Option<Vec<String>>, Error>;
    type SerializeMap = Impossible<Option<Vec<String>>, Error>;
    type SerializeStruct = Impossible<Option<Vec<String>>, Error>;
    type SerializeStructVariant = Impossible<Option<Vec<String>>, Error>;

    fn serialize_bool(self, _: bool) -> Result<Self::Ok> {
        err(NOT_A_SEQUENCE)
    }

    fn serialize_i8(self, _: i8) -> Result<Self::Ok> {
        err(NOT_A_SEQUENCE)
    }

    fn serialize_i16(self, _: i16) -> Result<Self::Ok> {
        err(NOT_A_SEQUENCE)
    }

    fn serialize_i32(self, _: i32) -> Result<Self::Ok> {
        err(NOT_A_SEQUENCE)
    }

    fn serialize_i64(self, _: i64) -> Result<Self::Ok> {
        err(NOT_A_SEQUENCE)
    }

    fn serialize_u8(self, _: u8) -> Result<Self::Ok> {
        err(NOT_A_SEQUENCE)
    }

    fn serialize_u16(self, _: u16) -> Result<Self::Ok> {
        err(NOT_A_SEQUENCE)
    }

    fn serialize_u32(self, _: u32) -> Result<Self::Ok> {
        err(NOT_A_SEQUENCE)
    }

    fn serialize_u64(self, _: u64) -> Result<Self::Ok> {
        err(NOT_A_SEQUENCE)
    }

    fn serialize_f32(self, _: f32) -> Result<Self::Ok> {
        err(NOT_A_SEQUENCE)
    }

    fn serialize_f64(self, _: f64) -> Result<Self::Ok> {
        err(NOT_A_SEQUENCE)
    }

    fn serialize_char(self, _: char) -> Result<Self::Ok> {
        err(NOT_A_SEQUENCE)
    }

    fn serialize_str(self, _: &str) -> Result<Self::Ok> {
        err(NOT_A_SEQUENCE)
    }

    fn serialize_bytes(self, _: &[u8]) -> Result<Self::Ok> {
        err(NOT_A_SEQUENCE)
    }

    fn serialize_none(self) -> Result<Self::Ok> {
        Ok(None)
    }

    fn serialize_some<T: ?Sized + Serialize>(
        self,
        value: &T,
    ) -> Result<Self::Ok> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Self::Ok> {
        Ok(None)
    }

    fn serialize_unit_struct(self, _: &'static str) -> Result<Self::Ok> {
        Ok(None)
    }

    fn serialize_unit_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
    ) -> Result<Self::Ok> {
        err(NOT_A_SEQUENCE)
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _: &'static str,
        value: &T,
    ) -> Result<Self::Ok> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: &T,
    ) -> Result<Self::Ok> {
        err(NOT_A_SEQUENCE)
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeFields> {
        Ok(SeFields { fields: Vec::with_capacity(len.unwrap_or(0)) })
    }

    fn serialize_tuple(self, len: usize) -> Result<SeFields> {
        Ok(SeFields { fields: Vec::with_capacity(len) })
    }

    fn serialize_tuple_struct(
        self,
        _: &'static str,
        len: usize,
    ) -> Result<SeFields> {
        Ok(SeFields { fields: Vec::with_capacity(len) })
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        err(NOT_A_SEQUENCE)
    }

    fn serialize_map(self, _: Option<usize>) -> Result<Self::SerializeMap> {
        err(KEYED)
    }

    fn serialize_struct(
        self,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeStruct> {
        err(KEYED)
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeStructVariant> {
        err(KEYED)
    }
}

impl SerializeSeq for SeFields {
    type Ok = Option<Vec<String>>;
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(
        &mut self,
        value: &T,
    ) -> Result<()> {
        self.fields.push(value.serialize(SeField)?);
        Ok(())
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(Some(self.fields))
    }
}

impl SerializeTuple for SeFields {
    type Ok = Option<Vec<String>>;
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(
        &mut self,
        value: &T,
    ) -> Result<()> {
        SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Self::Ok> {
        SerializeSeq::end(self)
    }
}

impl SerializeTupleStruct for SeFields {
    type Ok = Option<Vec<String>>;
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        value: &T,
    ) -> Result<()> {
        SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Self::Ok> {
        SerializeSeq::end(self)
    }
}

impl Serializer for SeField {
    type Ok = String;
    type Error = Error;
    type SerializeSeq = Impossible<String, Error>;
    type SerializeTuple = Impossible<String, Error>;
    type SerializeTupleStruct = Impossible<String, Error>;
    type SerializeTupleVariant = Impossible<String, Error>;
    type SerializeMap = Impossible<String, Error>;
    type SerializeStruct = Impossible<String, Error>;
    type SerializeStructVariant = Impossible<String, Error>;

    fn serialize_bool(self, v: bool) -> Result<String> {
        Ok(if v { "true" } else { "false" }.to_string())
    }

    fn serialize_i8(self, v: i8) -> Result<String> {
        Ok(itoa::Buffer::new().format(v).to_string())
    }

    fn serialize_i16(self, v: i16) -> Result<String> {
        Ok(itoa::Buffer::new().format(v).to_string())
    }

    fn serialize_i32(self, v: i32) -> Result<String> {
        Ok(itoa::Buffer::new().format(v).to_string())
    }

    fn serialize_i64(self, v: i64) -> Result<String> {
        Ok(itoa::Buffer::new().format(v).to_string())
    }

    fn serialize_i128(self, v: i128) -> Result<String> {
        Ok(itoa::Buffer::new().format(v).to_string())
    }

    fn serialize_u8(self, v: u8) -> Result<String> {
        Ok(itoa::Buffer::new().format(v).to_string())
    }

    fn serialize_u16(self, v: u16) -> Result<String> {
        Ok(itoa::Buffer::new().format(v).to_string())
    }

    fn serialize_u32(self, v: u32) -> Result<String> {
        Ok(itoa::Buffer::new().format(v).to_string())
    }

    fn serialize_u64(self, v: u64) -> Result<String> {
        Ok(itoa::Buffer::new().format(v).to_string())
    }

    fn serialize_u128(self, v: u128) -> Result<String> {
        Ok(itoa::Buffer::new().format(v).to_string())
    }

    fn serialize_f32(self, v: f32) -> Result<String> {
        Ok(ryu::Buffer::new().format(v).to_string())
    }

    fn serialize_f64(self, v: f64) -> Result<String> {
        Ok(ryu::Buffer::new().format(v).to_string())
    }

    fn serialize_char(self, v: char) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_str(self, v: &str) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<String> {
        match std::str::from_utf8(v) {
            Ok(s) => Ok(s.to_string()),
            Err(_) => err("byte fields must be valid UTF-8"),
        }
    }

    fn serialize_none(self) -> Result<String> {
        Ok(String::new())
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<String> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<String> {
        Ok(String::new())
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<String> {
        Ok(name.to_string())
    }

    fn serialize_unit_variant(
        self,
        _: &'static str,
        _: u32,
        variant: &'static str,
    ) -> Result<String> {
        Ok(variant.to_string())
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _: &'static str,
        value: &T,
    ) -> Result<String> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        value: &T,
    ) -> Result<String> {
        value.serialize(self)
    }

    fn serialize_seq(self, _: Option<usize>) -> Result<Self::SerializeSeq> {
        err(NESTED)
    }

    fn serialize_tuple(self, _: usize) -> Result<Self::SerializeTuple> {
        err(NESTED)
    }

    fn serialize_tuple_struct(
        self,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        err(NESTED)
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        err(NESTED)
    }

    fn serialize_map(self, _: Option<usize>) -> Result<Self::SerializeMap> {
        err(KEYED)
    }

    fn serialize_struct(
        self,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeStruct> {
        err(KEYED)
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeStructVariant> {
        err(KEYED)
    }

    fn collect_str<T: ?Sized + fmt::Display>(self, value: &T) -> Result<String> {
        Ok(value.to_string())
    }
}
