//! Binding decoded JSON onto typed Rust values.
//!
//! [`bind`] deserializes a [`serde_json::Value`] into any `DeserializeOwned`
//! type and reports the path of every value the target type actually
//! consumed. Fields the target does not declare are skipped through
//! `deserialize_ignored_any` and are not reported.
//!
//! Binding is lenient in the way typed extraction needs: `null` becomes the
//! zero value of the requested type (`false`, `0`, `""`, an empty sequence or
//! map, a struct of zero fields). `Option` fields still see `None` for `null`.
//!
//! Fields missing from an object are left to serde, so `Option` fields become
//! `None` and `#[serde(default)]` applies. Put `#[serde(default)]` on the
//! target type to zero-fill every missing field.

use std::cell::RefCell;
use std::fmt;

use serde::de::{self, DeserializeOwned, IntoDeserializer, Visitor};
use serde_json::{Map, Value};

use crate::error::ProviderError;
use crate::property::{PathSegment, PropertyPath};

/// A failure to bind a value onto the target type.
#[derive(Debug)]
pub struct BindError {
    message: String,
    path: Option<PropertyPath>,
    consumed: Vec<PropertyPath>,
}

impl BindError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
            consumed: Vec::new(),
        }
    }

    /// Attach `path` unless a deeper path is already known.
    fn at(mut self, path: &PropertyPath) -> Self {
        if self.path.is_none() && !path.is_empty() {
            self.path = Some(path.clone());
        }
        self
    }

    /// The path of the value that failed to bind, if it is not the root.
    pub fn path(&self) -> Option<&PropertyPath> {
        self.path.as_ref()
    }

    /// The paths consumed before the failure.
    pub fn consumed(&self) -> &[PropertyPath] {
        &self.consumed
    }
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl de::Error for BindError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        BindError::new(msg.to_string())
    }
}

impl std::error::Error for BindError {}

impl From<BindError> for ProviderError {
    fn from(value: BindError) -> Self {
        ProviderError::Bind(value.message)
    }
}

/// Deserialize `value` into `T`, returning the paths of the values consumed.
pub fn bind<T>(value: &Value) -> Result<(T, Vec<PropertyPath>), BindError>
where
    T: DeserializeOwned,
{
    let used = RefCell::new(Vec::new());
    let target = T::deserialize(Binder {
        value,
        path: PropertyPath::new(),
        used: &used,
        synthetic: false,
    });
    match target {
        Ok(target) => Ok((target, used.into_inner())),
        Err(mut err) => {
            err.consumed = used.into_inner();
            Err(err)
        },
    }
}

static NULL: Value = Value::Null;

struct Binder<'a> {
    value: &'a Value,
    path: PropertyPath,
    used: &'a RefCell<Vec<PropertyPath>>,
    /// Set for zero values standing in for the fields of a null struct.
    synthetic: bool,
}

impl<'a> Binder<'a> {
    fn child(&self, value: &'a Value, segment: PathSegment, synthetic: bool) -> Binder<'a> {
        Binder {
            value,
            path: self.path.child(segment),
            used: self.used,
            synthetic: self.synthetic || synthetic,
        }
    }

    fn record(&self) {
        if self.synthetic || self.path.is_empty() {
            return;
        }
        let mut used = self.used.borrow_mut();
        if used.last() != Some(&self.path) {
            used.push(self.path.clone());
        }
    }

    fn invalid(&self, expected: &str) -> BindError {
        BindError::new(format!(
            "{}: expected {}, found {}",
            display_path(&self.path),
            expected,
            kind(self.value)
        ))
        .at(&self.path)
    }

    fn integral(&self) -> Option<Result<i64, f64>> {
        let n = self.value.as_f64()?;
        if n.is_finite() && n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 {
            Some(Ok(n as i64))
        } else {
            Some(Err(n))
        }
    }

    fn visit_number<'de, V>(self, visitor: V) -> Result<V::Value, BindError>
    where
        V: Visitor<'de>,
    {
        match self.integral() {
            Some(Ok(i)) => visitor.visit_i64(i),
            Some(Err(f)) => visitor.visit_f64(f),
            None => Err(self.invalid("number")),
        }
    }

    /// Visit `map`, adding a null entry for each of `zero_fields`.
    fn visit_object<'de, V>(
        self,
        map: &'a Map<String, Value>,
        zero_fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, BindError>
    where
        V: Visitor<'de>,
    {
        let mut entries: Vec<(&'a str, &'a Value, bool)> =
            map.iter().map(|(k, v)| (k.as_str(), v, false)).collect();
        entries.extend(zero_fields.iter().map(|field| (*field, &NULL, true)));
        visitor.visit_map(MapBinder {
            parent: self,
            entries: entries.into_iter(),
            pending: None,
        })
    }
}

fn display_path(path: &PropertyPath) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        path.to_string()
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

macro_rules! zero_or_number {
    ($($method:ident)*) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value, Self::Error>
            where
                V: Visitor<'de>,
            {
                self.record();
                match self.value {
                    Value::Null => visitor.visit_i64(0),
                    _ => self.visit_number(visitor),
                }
            }
        )*
    };
}

impl<'de, 'a> de::Deserializer<'de> for Binder<'a> {
    type Error = BindError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.record();
        match self.value {
            Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(*b),
            Value::Number(_) => self.visit_number(visitor),
            Value::String(s) => visitor.visit_str(s),
            Value::Array(items) => visitor.visit_seq(SeqBinder {
                parent: self,
                items: items.iter().enumerate(),
            }),
            Value::Object(map) => self.visit_object(map, &[], visitor),
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.record();
        match self.value {
            Value::Null => visitor.visit_bool(false),
            Value::Bool(b) => visitor.visit_bool(*b),
            _ => Err(self.invalid("bool")),
        }
    }

    zero_or_number! {
        deserialize_i8 deserialize_i16 deserialize_i32 deserialize_i64 deserialize_i128
        deserialize_u8 deserialize_u16 deserialize_u32 deserialize_u64 deserialize_u128
    }

    fn deserialize_f32<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_f64(visitor)
    }

    fn deserialize_f64<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.record();
        match self.value {
            Value::Null => visitor.visit_f64(0.0),
            Value::Number(n) => visitor.visit_f64(n.as_f64().unwrap_or_default()),
            _ => Err(self.invalid("number")),
        }
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.record();
        match self.value {
            Value::Null => visitor.visit_str(""),
            Value::String(s) => visitor.visit_str(s),
            _ => Err(self.invalid("string")),
        }
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.record();
        match self.value {
            Value::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.record();
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.record();
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.record();
        let items: &'a [Value] = match self.value {
            Value::Null => &[],
            Value::Array(items) => items,
            _ => return Err(self.invalid("array")),
        };
        visitor.visit_seq(SeqBinder {
            parent: self,
            items: items.iter().enumerate(),
        })
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_struct("", &[], visitor)
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.record();
        static EMPTY: std::sync::OnceLock<Map<String, Value>> = std::sync::OnceLock::new();
        match self.value {
            Value::Null => self.visit_object(EMPTY.get_or_init(Map::new), fields, visitor),
            Value::Object(map) => self.visit_object(map, &[], visitor),
            _ => Err(self.invalid("object")),
        }
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.record();
        match self.value {
            Value::String(s) => visitor.visit_enum(s.as_str().into_deserializer()),
            Value::Object(map) if map.len() == 1 => {
                let Some((variant, value)) = map.iter().next() else {
                    return Err(self.invalid("single-key object"));
                };
                let payload = self.child(value, PathSegment::Key(variant.clone()), false);
                visitor.visit_enum(EnumBinder {
                    variant: variant.as_str(),
                    payload,
                })
            },
            _ => Err(self.invalid("string or single-key object")),
        }
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }
}

struct SeqBinder<'a> {
    parent: Binder<'a>,
    items: std::iter::Enumerate<std::slice::Iter<'a, Value>>,
}

impl<'de, 'a> de::SeqAccess<'de> for SeqBinder<'a> {
    type Error = BindError;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>, Self::Error>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.items.next() {
            Some((i, value)) => seed
                .deserialize(self.parent.child(value, PathSegment::Index(i), false))
                .map(Some)
                .map_err(|e| e.at(&self.parent.path.child(PathSegment::Index(i)))),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.items.len())
    }
}

struct MapBinder<'a> {
    parent: Binder<'a>,
    entries: std::vec::IntoIter<(&'a str, &'a Value, bool)>,
    pending: Option<(&'a str, &'a Value, bool)>,
}

impl<'de, 'a> de::MapAccess<'de> for MapBinder<'a> {
    type Error = BindError;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>, Self::Error>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.entries.next() {
            Some(entry) => {
                self.pending = Some(entry);
                let key: de::value::StrDeserializer<'a, BindError> = entry.0.into_deserializer();
                seed.deserialize(key).map(Some)
            },
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value, Self::Error>
    where
        V: de::DeserializeSeed<'de>,
    {
        let Some((key, value, synthetic)) = self.pending.take() else {
            return Err(BindError::new("map value requested before its key"));
        };
        let segment = PathSegment::Key(key.to_string());
        seed.deserialize(self.parent.child(value, segment.clone(), synthetic))
            .map_err(|e| e.at(&self.parent.path.child(segment)))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}

struct EnumBinder<'a> {
    variant: &'a str,
    payload: Binder<'a>,
}

impl<'de, 'a> de::EnumAccess<'de> for EnumBinder<'a> {
    type Error = BindError;
    type Variant = Binder<'a>;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant), Self::Error>
    where
        V: de::DeserializeSeed<'de>,
    {
        let name: de::value::StrDeserializer<'a, BindError> = self.variant.into_deserializer();
        let variant = seed.deserialize(name)?;
        Ok((variant, self.payload))
    }
}

impl<'de, 'a> de::VariantAccess<'de> for Binder<'a> {
    type Error = BindError;

    fn unit_variant(self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value, Self::Error>
    where
        T: de::DeserializeSeed<'de>,
    {
        seed.deserialize(self)
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        de::Deserializer::deserialize_seq(self, visitor)
    }

    fn struct_variant<V>(
        self,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        de::Deserializer::deserialize_struct(self, "", fields, visitor)
    }
}
