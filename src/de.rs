//! Properties deserialization.
//!
//! This module provides the [`Deserializer`] that rebuilds Rust data
//! structures from a flat [`Properties`] mapping.
//!
//! ## Overview
//!
//! Decoding is driven by the shape the target type asks for. At every level
//! the deserializer knows the key path it stands on:
//!
//! - **Scalars** look the path up. A missing key yields the zero value of the
//!   requested type (`0`, `false`, `""`), never an error.
//! - **Structs** visit every declared field at `path.field`.
//! - **Maps** group the keys under `path.` by the next path step.
//! - **Sequences** group the keys under `path[` by index and stop at the
//!   first missing index. Each element is decoded once, in index order,
//!   whether it is a scalar (`path[i]=...`) or nested (`path[i].field=...`).
//! - **Options** are `Some` when anything exists at or below the path. A
//!   top-level `Option` is transparent and always decodes to `Some`.
//!
//! Every level hands its children only the keys below them, so the keys are
//! split once per level of nesting instead of rescanned per lookup.
//!
//! ## Usage
//!
//! ```rust
//! use serde_properties::{from_properties, properties};
//! use serde::Deserialize;
//! use std::collections::HashMap;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Data {
//!     a: HashMap<String, String>,
//!     b: Vec<i32>,
//! }
//!
//! let props = properties! { "a.x" => "hello", "b[0]" => "1", "b[1]" => "2" };
//! let data: Data = from_properties(&props).unwrap();
//! assert_eq!(data.a["x"], "hello");
//! assert_eq!(data.b, vec![1, 2]);
//! ```
//!
//! ## Sparse Sequences
//!
//! Indices must be contiguous from zero. Elements after a gap are not
//! decoded:
//!
//! ```rust
//! use serde_properties::{from_properties, properties};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Data { b: Vec<i32> }
//!
//! let props = properties! { "b[0]" => "1", "b[2]" => "2" };
//! let data: Data = from_properties(&props).unwrap();
//! assert_eq!(data.b, vec![1]);
//! ```
//!
//! ## Limitations
//!
//! Missing fields decode to zero values, so a struct visits every name serde
//! declares for it. `#[serde(alias = "...")]` adds names to that list, and an
//! alias would then collide with its own field. Aliased structs fail with a
//! duplicate field error that says aliases are not supported.
//!
//! `#[serde(flatten)]` decodes members through the untyped path, which sees
//! every leaf as a string. Flattened members work when their leaves are
//! strings (for example a `BTreeMap<String, String>` of extras). A flattened
//! struct with a number or bool field fails with a type error.

use crate::path::{self, Scope};
use crate::{scalar, Error, Properties, Result};
use indexmap::IndexMap;
use serde::de::{self, IntoDeserializer};
use std::collections::BTreeMap;
use serde::forward_to_deserialize_any;
use tracing::{debug, trace};

/// The properties deserializer.
///
/// Reads from a borrowed [`Properties`] mapping. Only structs and maps (or
/// an `Option` or newtype around one) can be decoded at the top level; other
/// targets fail with [`Error::InvalidTarget`].
pub struct Deserializer<'de> {
    props: &'de Properties,
}

impl<'de> Deserializer<'de> {
    pub fn new(props: &'de Properties) -> Self {
        Deserializer { props }
    }

    fn top(&self) -> KeyDeserializer<'de> {
        KeyDeserializer::new(self.props, String::new(), self.props.keys().collect())
    }
}

macro_rules! reject_target {
    ($($method:ident => $kind:expr),* $(,)?) => {
        $(
            fn $method<V>(self, _visitor: V) -> Result<V::Value>
            where
                V: de::Visitor<'de>,
            {
                Err(Error::invalid_target($kind))
            }
        )*
    };
}

impl<'de, 'a> de::Deserializer<'de> for &'a mut Deserializer<'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.top().deserialize_map(visitor)
    }

    reject_target! {
        deserialize_bool => "bool",
        deserialize_i8 => "i8",
        deserialize_i16 => "i16",
        deserialize_i32 => "i32",
        deserialize_i64 => "i64",
        deserialize_i128 => "i128",
        deserialize_u8 => "u8",
        deserialize_u16 => "u16",
        deserialize_u32 => "u32",
        deserialize_u64 => "u64",
        deserialize_u128 => "u128",
        deserialize_f32 => "f32",
        deserialize_f64 => "f64",
        deserialize_char => "char",
        deserialize_str => "string",
        deserialize_string => "string",
        deserialize_bytes => "bytes",
        deserialize_byte_buf => "bytes",
        deserialize_unit => "unit",
        deserialize_seq => "sequence",
        deserialize_identifier => "identifier",
        deserialize_ignored_any => "ignored value",
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_unit_struct<V>(self, name: &'static str, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::invalid_target(name))
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_tuple<V>(self, _len: usize, _visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::invalid_target("tuple"))
    }

    fn deserialize_tuple_struct<V>(
        self,
        name: &'static str,
        _len: usize,
        _visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::invalid_target(name))
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.top().deserialize_map(visitor)
    }

    fn deserialize_struct<V>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.top().deserialize_struct(name, fields, visitor)
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        _variants: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        Err(Error::invalid_target(name))
    }
}

/// Deserializes the value addressed by one key path.
///
/// `scope` holds every key at or below that path.
pub struct KeyDeserializer<'de> {
    props: &'de Properties,
    key: String,
    scope: Scope<'de>,
}

impl<'de> KeyDeserializer<'de> {
    fn new(props: &'de Properties, key: String, scope: Scope<'de>) -> Self {
        KeyDeserializer { props, key, scope }
    }

    fn value(&self) -> Option<&'de str> {
        self.props.get(&self.key)
    }

    fn visit_entries<V>(self, entries: IndexMap<&'de str, Scope<'de>>, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        trace!(key = %self.key, entries = entries.len(), "discovered map entries");
        visitor.visit_map(MapDeserializer::new(self.props, self.key, entries))
    }

    fn visit_elements<V>(self, elements: BTreeMap<usize, Scope<'de>>, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let len = path::contiguous_len(&elements);
        if elements.len() > len {
            debug!(
                key = %self.key,
                decoded = len,
                dropped = elements.len() - len,
                "ignoring sequence elements after index gap"
            );
        }
        trace!(key = %self.key, elements = len, "discovered sequence elements");
        visitor.visit_seq(SeqDeserializer::new(self.props, self.key, elements, len))
    }
}

macro_rules! deserialize_signed {
    ($method:ident, $visit:ident, $ty:ty) => {
        fn $method<V>(self, visitor: V) -> Result<V::Value>
        where
            V: de::Visitor<'de>,
        {
            match self.value() {
                Some(s) => visitor.$visit(scalar::parse_signed::<$ty>(&self.key, s, stringify!($ty))?),
                None => visitor.$visit(0),
            }
        }
    };
}

macro_rules! deserialize_unsigned {
    ($method:ident, $visit:ident, $ty:ty) => {
        fn $method<V>(self, visitor: V) -> Result<V::Value>
        where
            V: de::Visitor<'de>,
        {
            match self.value() {
                Some(s) => visitor.$visit(scalar::parse_unsigned::<$ty>(&self.key, s, stringify!($ty))?),
                None => visitor.$visit(0),
            }
        }
    };
}

impl<'de> de::Deserializer<'de> for KeyDeserializer<'de> {
    type Error = Error;

    /// Untyped targets: an exact key is a string, keys below `path.` make a
    /// map, keys below `path[` make a sequence, and nothing at all is unit.
    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if let Some(s) = self.value() {
            return visitor.visit_borrowed_str(s);
        }
        let entries = path::entries(&self.scope, &self.key);
        if !entries.is_empty() {
            return self.visit_entries(entries, visitor);
        }
        let elements = path::elements(&self.scope, &self.key);
        if elements.contains_key(&0) {
            return self.visit_elements(elements, visitor);
        }
        visitor.visit_unit()
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value() {
            Some(s) => visitor.visit_bool(scalar::parse_bool(&self.key, s)?),
            None => visitor.visit_bool(false),
        }
    }

    deserialize_signed!(deserialize_i8, visit_i8, i8);
    deserialize_signed!(deserialize_i16, visit_i16, i16);
    deserialize_signed!(deserialize_i32, visit_i32, i32);
    deserialize_signed!(deserialize_i64, visit_i64, i64);
    deserialize_unsigned!(deserialize_u8, visit_u8, u8);
    deserialize_unsigned!(deserialize_u16, visit_u16, u16);
    deserialize_unsigned!(deserialize_u32, visit_u32, u32);
    deserialize_unsigned!(deserialize_u64, visit_u64, u64);

    fn deserialize_i128<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value() {
            Some(s) => visitor.visit_i128(scalar::parse_i128(&self.key, s)?),
            None => visitor.visit_i128(0),
        }
    }

    fn deserialize_u128<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value() {
            Some(s) => visitor.visit_u128(scalar::parse_u128(&self.key, s)?),
            None => visitor.visit_u128(0),
        }
    }

    fn deserialize_f32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value() {
            Some(s) => visitor.visit_f32(scalar::parse_f32(&self.key, s)?),
            None => visitor.visit_f32(0.0),
        }
    }

    fn deserialize_f64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value() {
            Some(s) => visitor.visit_f64(scalar::parse_f64(&self.key, s)?),
            None => visitor.visit_f64(0.0),
        }
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value() {
            Some(s) => visitor.visit_char(scalar::parse_char(&self.key, s)?),
            None => visitor.visit_char('\0'),
        }
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_borrowed_str(self.value().unwrap_or(""))
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        if !self.scope.is_empty() {
            visitor.visit_some(self)
        } else {
            visitor.visit_none()
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let elements = path::elements(&self.scope, &self.key);
        self.visit_elements(elements, visitor)
    }

    /// Tuples and fixed-size arrays always visit `len` elements; missing ones
    /// decode to zero values.
    fn deserialize_tuple<V>(self, len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let elements = path::elements(&self.scope, &self.key);
        visitor.visit_seq(SeqDeserializer::new(self.props, self.key, elements, len))
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_tuple(len, visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let entries = path::entries(&self.scope, &self.key);
        self.visit_entries(entries, visitor)
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_map(StructDeserializer::new(self.props, self.key, self.scope, fields))
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let s = self.value().unwrap_or("");
        visitor
            .visit_enum(s.into_deserializer())
            .map_err(|_: Error| Error::conversion(&self.key, s, &format!("variant of {}", name)))
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_unit()
    }
}

struct SeqDeserializer<'de> {
    props: &'de Properties,
    prefix: String,
    elements: BTreeMap<usize, Scope<'de>>,
    index: usize,
    len: usize,
}

impl<'de> SeqDeserializer<'de> {
    fn new(
        props: &'de Properties,
        prefix: String,
        elements: BTreeMap<usize, Scope<'de>>,
        len: usize,
    ) -> Self {
        SeqDeserializer {
            props,
            prefix,
            elements,
            index: 0,
            len,
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer<'de> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        if self.index >= self.len {
            return Ok(None);
        }
        let key = path::element(&self.prefix, self.index);
        let scope = self.elements.remove(&self.index).unwrap_or_default();
        self.index += 1;
        seed.deserialize(KeyDeserializer::new(self.props, key, scope))
            .map(Some)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.len - self.index)
    }
}

struct MapDeserializer<'de> {
    props: &'de Properties,
    prefix: String,
    entries: indexmap::map::IntoIter<&'de str, Scope<'de>>,
    value: Option<(String, Scope<'de>)>,
}

impl<'de> MapDeserializer<'de> {
    fn new(props: &'de Properties, prefix: String, entries: IndexMap<&'de str, Scope<'de>>) -> Self {
        MapDeserializer {
            props,
            prefix,
            entries: entries.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer<'de> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.entries.next() {
            Some((name, scope)) => {
                let key = path::child(&self.prefix, name);
                let value = seed.deserialize(MapKeyDeserializer {
                    name: name.to_string(),
                    key: key.clone(),
                })?;
                self.value = Some((key, scope));
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some((key, scope)) => seed.deserialize(KeyDeserializer::new(self.props, key, scope)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}

/// Visits every declared field of a struct, present in the input or not.
struct StructDeserializer<'de> {
    props: &'de Properties,
    prefix: String,
    scope: Scope<'de>,
    groups: IndexMap<&'de str, Scope<'de>>,
    fields: std::slice::Iter<'static, &'static str>,
    value: Option<(String, Scope<'de>)>,
}

impl<'de> StructDeserializer<'de> {
    fn new(
        props: &'de Properties,
        prefix: String,
        scope: Scope<'de>,
        fields: &'static [&'static str],
    ) -> Self {
        let groups = path::entries(&scope, &prefix);
        StructDeserializer {
            props,
            prefix,
            scope,
            groups,
            fields: fields.iter(),
            value: None,
        }
    }

    /// Keys at or below `prefix.field`. A renamed field may itself contain
    /// `.` or `[`, which the grouping by first step cannot see.
    fn field_scope(&mut self, field: &str, key: &str) -> Scope<'de> {
        if field.contains(['.', '[']) {
            path::narrow(&self.scope, key)
        } else {
            self.groups.swap_remove(field).unwrap_or_default()
        }
    }
}

impl<'de> de::MapAccess<'de> for StructDeserializer<'de> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.fields.next() {
            Some(field) => {
                let key = path::child(&self.prefix, field);
                let scope = self.field_scope(field, &key);
                self.value = Some((key, scope));
                seed.deserialize((*field).into_deserializer()).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some((key, scope)) => seed.deserialize(KeyDeserializer::new(self.props, key, scope)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.fields.len())
    }
}

/// Deserializes a map key from its path step, parsing it when the key type
/// is not a string.
struct MapKeyDeserializer {
    name: String,
    key: String,
}

macro_rules! deserialize_key_signed {
    ($method:ident, $visit:ident, $ty:ty) => {
        fn $method<V>(self, visitor: V) -> Result<V::Value>
        where
            V: de::Visitor<'de>,
        {
            visitor.$visit(scalar::parse_signed::<$ty>(&self.key, &self.name, stringify!($ty))?)
        }
    };
}

macro_rules! deserialize_key_unsigned {
    ($method:ident, $visit:ident, $ty:ty) => {
        fn $method<V>(self, visitor: V) -> Result<V::Value>
        where
            V: de::Visitor<'de>,
        {
            visitor.$visit(scalar::parse_unsigned::<$ty>(&self.key, &self.name, stringify!($ty))?)
        }
    };
}

impl<'de> de::Deserializer<'de> for MapKeyDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_string(self.name)
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_bool(scalar::parse_bool(&self.key, &self.name)?)
    }

    deserialize_key_signed!(deserialize_i8, visit_i8, i8);
    deserialize_key_signed!(deserialize_i16, visit_i16, i16);
    deserialize_key_signed!(deserialize_i32, visit_i32, i32);
    deserialize_key_signed!(deserialize_i64, visit_i64, i64);
    deserialize_key_unsigned!(deserialize_u8, visit_u8, u8);
    deserialize_key_unsigned!(deserialize_u16, visit_u16, u16);
    deserialize_key_unsigned!(deserialize_u32, visit_u32, u32);
    deserialize_key_unsigned!(deserialize_u64, visit_u64, u64);

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_char(scalar::parse_char(&self.key, &self.name)?)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let (key, value) = (self.key, self.name);
        visitor
            .visit_enum(value.as_str().into_deserializer())
            .map_err(|_: Error| Error::conversion(&key, &value, &format!("variant of {}", name)))
    }

    forward_to_deserialize_any! {
        i128 u128 f32 f64 str string bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}
