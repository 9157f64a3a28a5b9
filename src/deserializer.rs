//! Serde bridge from resolved trees to Rust types
//!
//! `Value` implements `serde::Deserializer`, so a resolved document can be
//! turned into any `Deserialize` type without going back through JSON text.

use crate::error::{Result, VariableJsonError};
use crate::options::Options;
use crate::parser::parse_with_options;
use crate::value::{Array, Object, Value};
use serde::de::{self, DeserializeOwned, DeserializeSeed, Visitor};

impl<'de> de::Deserializer<'de> for Value {
    type Error = VariableJsonError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self {
            Value::Null => visitor.visit_unit(),
            Value::Boolean(b) => visitor.visit_bool(b),
            Value::Number(n) => {
                if let Some(u) = n.as_u64() {
                    visitor.visit_u64(u)
                } else if let Some(i) = n.as_i64() {
                    visitor.visit_i64(i)
                } else {
                    visitor.visit_f64(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => visitor.visit_string(s),
            Value::Array(arr) => visitor.visit_seq(SeqAccess::new(arr)),
            Value::Object(obj) => visitor.visit_map(MapAccess::new(obj)),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self {
            Value::Null => visitor.visit_none(),
            other => visitor.visit_some(other),
        }
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self {
            // Unit variant: "Variant"
            Value::String(variant) => visitor.visit_enum(EnumAccess {
                variant,
                value: None,
            }),
            // Data variant: {"Variant": data}
            Value::Object(obj) if obj.len() == 1 => {
                let mut entries = obj.into_iter();
                match entries.next() {
                    Some((variant, value)) => visitor.visit_enum(EnumAccess {
                        variant,
                        value: Some(value),
                    }),
                    None => Err(de::Error::custom("enum object has no variant")),
                }
            }
            other => Err(de::Error::invalid_type(
                unexpected(&other),
                &"enum (string or single-key object)",
            )),
        }
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    serde::forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier
    }
}

fn unexpected(value: &Value) -> de::Unexpected<'_> {
    match value {
        Value::Null => de::Unexpected::Unit,
        Value::Boolean(b) => de::Unexpected::Bool(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => de::Unexpected::Signed(i),
            None => de::Unexpected::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => de::Unexpected::Str(s),
        Value::Array(_) => de::Unexpected::Seq,
        Value::Object(_) => de::Unexpected::Map,
    }
}

/// Sequence access for arrays
struct SeqAccess {
    array: smallvec::IntoIter<[Value; 4]>,
}

impl SeqAccess {
    fn new(array: Box<Array>) -> Self {
        Self {
            array: (*array).into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqAccess {
    type Error = VariableJsonError;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: DeserializeSeed<'de>,
    {
        match self.array.next() {
            Some(value) => seed.deserialize(value).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        let (lower, upper) = self.array.size_hint();
        upper.or(Some(lower))
    }
}

/// Map access for objects
struct MapAccess {
    object: indexmap::map::IntoIter<String, Value>,
    current_value: Option<Value>,
}

impl MapAccess {
    fn new(object: Object) -> Self {
        Self {
            object: object.into_iter(),
            current_value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapAccess {
    type Error = VariableJsonError;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: DeserializeSeed<'de>,
    {
        match self.object.next() {
            Some((key, value)) => {
                self.current_value = Some(value);
                seed.deserialize(Value::String(key)).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: DeserializeSeed<'de>,
    {
        match self.current_value.take() {
            Some(value) => seed.deserialize(value),
            None => Err(de::Error::custom("no value available for map entry")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.object.len())
    }
}

/// Enum access for externally tagged enums
struct EnumAccess {
    variant: String,
    value: Option<Value>,
}

impl<'de> de::EnumAccess<'de> for EnumAccess {
    type Error = VariableJsonError;
    type Variant = VariantAccess;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(Value::String(self.variant))?;
        Ok((variant, VariantAccess { value: self.value }))
    }
}

/// Variant access for enum payloads
struct VariantAccess {
    value: Option<Value>,
}

impl<'de> de::VariantAccess<'de> for VariantAccess {
    type Error = VariableJsonError;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            None | Some(Value::Null) => Ok(()),
            Some(_) => Err(de::Error::custom("expected unit variant, found data")),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: DeserializeSeed<'de>,
    {
        match self.value {
            Some(value) => seed.deserialize(value),
            None => Err(de::Error::custom("expected newtype variant data, found unit")),
        }
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Some(Value::Array(array)) => visitor.visit_seq(SeqAccess::new(array)),
            Some(_) => Err(de::Error::custom("expected tuple variant data (array)")),
            None => Err(de::Error::custom("expected tuple variant data, found unit")),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Some(Value::Object(object)) => visitor.visit_map(MapAccess::new(object)),
            Some(_) => Err(de::Error::custom("expected struct variant data (object)")),
            None => Err(de::Error::custom("expected struct variant data, found unit")),
        }
    }
}

/// Deserializes a resolved tree into a Rust type
pub fn from_value<T>(value: Value) -> Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(value)
}

/// Resolves `json` with default options and deserializes the result
pub fn from_str<T>(json: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_str_with_options(json, Options::default())
}

/// Resolves `json` with the given options and deserializes the result
pub fn from_str_with_options<T>(json: &str, options: Options) -> Result<T>
where
    T: DeserializeOwned,
{
    from_value(parse_with_options(json, options)?)
}
