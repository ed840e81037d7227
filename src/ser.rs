//! Properties serialization.
//!
//! This module provides the [`Serializer`] that flattens Rust data structures
//! into `key=value` entries.
//!
//! ## Overview
//!
//! The serializer walks the value top-down and emits one entry per leaf:
//!
//! - **Structs**: each field extends the key with `.field`
//! - **Maps**: each entry extends the key with `.key`
//! - **Sequences**: each element extends the key with `[index]`
//! - **Options**: `Some` is transparent, `None` emits nothing
//!
//! Only structs and maps can sit at the top level: a bare scalar or sequence
//! has no key to live under.
//!
//! Keys containing `=` or a line break, and values containing a line break,
//! are rejected with [`Error::UnsupportedType`] since the text form would
//! not read them back.
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use serde_properties::to_string;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Data { x: i32, tags: Vec<String> }
//!
//! let data = Data { x: 1, tags: vec!["a".to_string(), "b".to_string()] };
//! assert_eq!(to_string(&data).unwrap(), "x=1\ntags[0]=a\ntags[1]=b\n");
//! ```
//!
//! ## Direct Serializer Usage
//!
//! ```rust
//! use serde_properties::{Serializer, PropertiesOptions};
//! use serde::Serialize;
//! use std::collections::BTreeMap;
//!
//! let mut serializer = Serializer::new(PropertiesOptions::new());
//!
//! let mut data = BTreeMap::new();
//! data.insert("answer", 42);
//! data.serialize(&mut serializer).unwrap();
//!
//! let props = serializer.into_inner();
//! assert_eq!(props.get("answer"), Some("42"));
//! ```

use crate::{path, Error, Properties, PropertiesOptions, Result};
use serde::ser::Impossible;
use serde::{ser, Serialize};
use tracing::trace;

/// The properties serializer.
///
/// Collects entries into a [`Properties`] mapping in traversal order.
/// Created via [`Serializer::new`].
pub struct Serializer {
    output: Properties,
    options: PropertiesOptions,
}

impl Serializer {
    pub fn new(options: PropertiesOptions) -> Self {
        Serializer {
            output: Properties::new(),
            options,
        }
    }

    /// Returns the collected entries, ordered by key if `sort_keys` is set.
    pub fn into_inner(self) -> Properties {
        if self.options.sort_keys {
            self.output.sorted()
        } else {
            self.output
        }
    }

    fn root(&self) -> String {
        self.options.root.clone().unwrap_or_default()
    }

    /// Records one entry. The text form has no escaping, so a key holding
    /// `=` or a line break, or a value holding a line break, would not read
    /// back as the same entry.
    fn write(&mut self, key: String, value: String) -> Result<()> {
        if key.contains(['=', '\n', '\r']) {
            return Err(Error::unsupported_type(&key, "key containing `=` or a line break"));
        }
        if value.contains(['\n', '\r']) {
            return Err(Error::unsupported_type(&key, "value containing a line break"));
        }
        self.output.insert(key, value);
        Ok(())
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new(PropertiesOptions::default())
    }
}

/// The top level accepts only keyed shapes; everything else is rejected with
/// [`Error::InvalidSource`].
impl<'a> ser::Serializer for &'a mut Serializer {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = Impossible<(), Error>;
    type SerializeTuple = Impossible<(), Error>;
    type SerializeTupleStruct = Impossible<(), Error>;
    type SerializeTupleVariant = Impossible<(), Error>;
    type SerializeMap = MapSerializer<'a>;
    type SerializeStruct = StructSerializer<'a>;
    type SerializeStructVariant = Impossible<(), Error>;

    fn serialize_bool(self, _v: bool) -> Result<Self::Ok> {
        Err(Error::invalid_source("bool"))
    }

    fn serialize_i8(self, _v: i8) -> Result<Self::Ok> {
        Err(Error::invalid_source("integer"))
    }

    fn serialize_i16(self, _v: i16) -> Result<Self::Ok> {
        Err(Error::invalid_source("integer"))
    }

    fn serialize_i32(self, _v: i32) -> Result<Self::Ok> {
        Err(Error::invalid_source("integer"))
    }

    fn serialize_i64(self, _v: i64) -> Result<Self::Ok> {
        Err(Error::invalid_source("integer"))
    }

    fn serialize_u8(self, _v: u8) -> Result<Self::Ok> {
        Err(Error::invalid_source("integer"))
    }

    fn serialize_u16(self, _v: u16) -> Result<Self::Ok> {
        Err(Error::invalid_source("integer"))
    }

    fn serialize_u32(self, _v: u32) -> Result<Self::Ok> {
        Err(Error::invalid_source("integer"))
    }

    fn serialize_u64(self, _v: u64) -> Result<Self::Ok> {
        Err(Error::invalid_source("integer"))
    }

    fn serialize_f32(self, _v: f32) -> Result<Self::Ok> {
        Err(Error::invalid_source("float"))
    }

    fn serialize_f64(self, _v: f64) -> Result<Self::Ok> {
        Err(Error::invalid_source("float"))
    }

    fn serialize_char(self, _v: char) -> Result<Self::Ok> {
        Err(Error::invalid_source("char"))
    }

    fn serialize_str(self, _v: &str) -> Result<Self::Ok> {
        Err(Error::invalid_source("string"))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Self::Ok> {
        Err(Error::invalid_source("bytes"))
    }

    fn serialize_none(self) -> Result<Self::Ok> {
        Err(Error::invalid_source("none"))
    }

    fn serialize_some<T>(self, value: &T) -> Result<Self::Ok>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Self::Ok> {
        Err(Error::invalid_source("unit"))
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Self::Ok> {
        Err(Error::invalid_source(name))
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<Self::Ok> {
        Err(Error::invalid_source(name))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Self::Ok>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Self::Ok>
    where
        T: ?Sized + Serialize,
    {
        Err(Error::invalid_source(name))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(Error::invalid_source("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(Error::invalid_source("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(Error::invalid_source(name))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(Error::invalid_source(name))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        let prefix = self.root();
        Ok(MapSerializer {
            ser: self,
            prefix,
            current_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        let prefix = self.root();
        Ok(StructSerializer { ser: self, prefix })
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(Error::invalid_source(name))
    }
}

/// Serializes one value at a fixed key path.
pub struct KeySerializer<'a> {
    ser: &'a mut Serializer,
    key: String,
}

impl<'a> KeySerializer<'a> {
    fn new(ser: &'a mut Serializer, key: String) -> Self {
        KeySerializer { ser, key }
    }

    fn leaf(self, value: String) -> Result<()> {
        self.ser.write(self.key, value)
    }
}

impl<'a> ser::Serializer for KeySerializer<'a> {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = SeqSerializer<'a>;
    type SerializeTuple = SeqSerializer<'a>;
    type SerializeTupleStruct = SeqSerializer<'a>;
    type SerializeTupleVariant = Impossible<(), Error>;
    type SerializeMap = MapSerializer<'a>;
    type SerializeStruct = StructSerializer<'a>;
    type SerializeStructVariant = Impossible<(), Error>;

    fn serialize_bool(self, v: bool) -> Result<Self::Ok> {
        self.leaf(v.to_string())
    }

    fn serialize_i8(self, v: i8) -> Result<Self::Ok> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i16(self, v: i16) -> Result<Self::Ok> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i32(self, v: i32) -> Result<Self::Ok> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i64(self, v: i64) -> Result<Self::Ok> {
        self.leaf(v.to_string())
    }

    fn serialize_i128(self, v: i128) -> Result<Self::Ok> {
        self.leaf(v.to_string())
    }

    fn serialize_u8(self, v: u8) -> Result<Self::Ok> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u16(self, v: u16) -> Result<Self::Ok> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u32(self, v: u32) -> Result<Self::Ok> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u64(self, v: u64) -> Result<Self::Ok> {
        self.leaf(v.to_string())
    }

    fn serialize_u128(self, v: u128) -> Result<Self::Ok> {
        self.leaf(v.to_string())
    }

    // Formatted as f32 so the shortest round-tripping digits are kept.
    fn serialize_f32(self, v: f32) -> Result<Self::Ok> {
        self.leaf(v.to_string())
    }

    fn serialize_f64(self, v: f64) -> Result<Self::Ok> {
        self.leaf(v.to_string())
    }

    fn serialize_char(self, v: char) -> Result<Self::Ok> {
        self.leaf(v.to_string())
    }

    fn serialize_str(self, v: &str) -> Result<Self::Ok> {
        self.leaf(v.to_string())
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Self::Ok> {
        use ser::SerializeSeq;
        let mut seq = self.serialize_seq(Some(v.len()))?;
        for byte in v {
            seq.serialize_element(byte)?;
        }
        seq.end()
    }

    fn serialize_none(self) -> Result<Self::Ok> {
        trace!(key = %self.key, "skipping absent value");
        Ok(())
    }

    fn serialize_some<T>(self, value: &T) -> Result<Self::Ok>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Self::Ok> {
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Self::Ok> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Self::Ok> {
        self.serialize_str(variant)
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Self::Ok>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<Self::Ok>
    where
        T: ?Sized + Serialize,
    {
        Err(Error::unsupported_type(&self.key, "newtype variant"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Ok(SeqSerializer {
            ser: self.ser,
            prefix: self.key,
            index: 0,
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(Error::unsupported_type(&self.key, "tuple variant"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Ok(MapSerializer {
            ser: self.ser,
            prefix: self.key,
            current_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Ok(StructSerializer {
            ser: self.ser,
            prefix: self.key,
        })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(Error::unsupported_type(&self.key, "struct variant"))
    }
}

pub struct SeqSerializer<'a> {
    ser: &'a mut Serializer,
    prefix: String,
    index: usize,
}

impl<'a> SeqSerializer<'a> {
    fn element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = path::element(&self.prefix, self.index);
        self.index += 1;
        value.serialize(KeySerializer::new(self.ser, key))
    }
}

impl<'a> ser::SerializeSeq for SeqSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(())
    }
}

impl<'a> ser::SerializeTuple for SeqSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(())
    }
}

impl<'a> ser::SerializeTupleStruct for SeqSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.element(value)
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(())
    }
}

pub struct MapSerializer<'a> {
    ser: &'a mut Serializer,
    prefix: String,
    current_key: Option<String>,
}

impl<'a> ser::SerializeMap for MapSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let name = key.serialize(MapKeySerializer {
            parent: &self.prefix,
        })?;
        self.current_key = Some(path::child(&self.prefix, &name));
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        value.serialize(KeySerializer::new(self.ser, key))
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(())
    }
}

pub struct StructSerializer<'a> {
    ser: &'a mut Serializer,
    prefix: String,
}

impl<'a> ser::SerializeStruct for StructSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = path::child(&self.prefix, key);
        value.serialize(KeySerializer::new(self.ser, key))
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(())
    }
}

/// Turns a map key into the single path step it occupies.
struct MapKeySerializer<'p> {
    parent: &'p str,
}

impl<'p> MapKeySerializer<'p> {
    fn unsupported(&self, kind: &str) -> Error {
        Error::unsupported_type(self.parent, &format!("map key of type {}", kind))
    }
}

impl<'p> ser::Serializer for MapKeySerializer<'p> {
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
        Ok(v.to_string())
    }

    fn serialize_i8(self, v: i8) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i16(self, v: i16) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i32(self, v: i32) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_i64(self, v: i64) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u8(self, v: u8) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u16(self, v: u16) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u32(self, v: u32) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_u64(self, v: u64) -> Result<String> {
        Ok(v.to_string())
    }

    // A float key would put a `.` into the path.
    fn serialize_f32(self, _v: f32) -> Result<String> {
        Err(self.unsupported("f32"))
    }

    fn serialize_f64(self, _v: f64) -> Result<String> {
        Err(self.unsupported("f64"))
    }

    fn serialize_char(self, v: char) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_str(self, v: &str) -> Result<String> {
        Ok(v.to_string())
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<String> {
        Err(self.unsupported("bytes"))
    }

    fn serialize_none(self) -> Result<String> {
        Err(self.unsupported("option"))
    }

    fn serialize_some<T>(self, _value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        Err(self.unsupported("option"))
    }

    fn serialize_unit(self) -> Result<String> {
        Err(self.unsupported("unit"))
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<String> {
        Err(self.unsupported(name))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<String> {
        Ok(variant.to_string())
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        Err(self.unsupported(name))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(self.unsupported("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(self.unsupported("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(self.unsupported(name))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(self.unsupported(name))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(self.unsupported("map"))
    }

    fn serialize_struct(self, name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(self.unsupported(name))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(self.unsupported(name))
    }
}
