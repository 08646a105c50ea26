//! Decoding of JSON-encoded provider configuration.
//!
//! Older engines send every non-string configuration value as a JSON
//! document inside a string. [`ConfigEncoding`] knows the declared type of
//! each configuration variable and turns those strings back into structured
//! property values.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::codec::{unknown_placeholder, unmarshal_properties, MarshalOptions};
use crate::error::ProviderError;
use crate::generated::Struct;
use crate::property::{make_computed, make_secret, sig, Output, PropertyMap, PropertyValue};

/// The declared type of a configuration variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigType {
    /// A string. Never JSON-decoded.
    String,
    /// A boolean.
    Bool,
    /// An integer.
    Int,
    /// A floating point number.
    Float,
    /// A list.
    List,
    /// A set, encoded as a list.
    Set,
    /// An object.
    Object,
}

impl ConfigType {
    /// The value an empty string decodes to.
    pub fn zero_value(self) -> PropertyValue {
        match self {
            ConfigType::String => PropertyValue::String(String::new()),
            ConfigType::Bool => PropertyValue::Bool(false),
            ConfigType::Int | ConfigType::Float => PropertyValue::Number(0.0),
            ConfigType::List | ConfigType::Set => PropertyValue::Array(Vec::new()),
            ConfigType::Object => PropertyValue::Object(PropertyMap::new()),
        }
    }
}

/// Decoder for configuration keyed by variable name.
#[derive(Debug, Clone, Default)]
pub struct ConfigEncoding {
    types: BTreeMap<String, ConfigType>,
}

impl ConfigEncoding {
    /// Create a decoder from the declared variable types.
    pub fn new(types: BTreeMap<String, ConfigType>) -> Self {
        Self { types }
    }

    /// Declare the type of one more variable.
    pub fn with_variable(mut self, name: impl Into<String>, ty: ConfigType) -> Self {
        self.types.insert(name.into(), ty);
        self
    }

    /// Unmarshal configuration, decoding JSON-encoded strings of declared
    /// non-string variables.
    ///
    /// Nulls are dropped and assets are rejected. Variables without a
    /// declared type pass through unchanged.
    pub fn unmarshal_properties(&self, s: &Struct) -> Result<PropertyMap, ProviderError> {
        let opts = MarshalOptions::lossless()
            .with_skip_nulls(true)
            .with_reject_assets(true);
        let props = unmarshal_properties(s, &opts)?;

        let mut out = PropertyMap::new();
        for (key, v) in props {
            let decoded = match self.types.get(&key) {
                Some(ty) => decode_config_value(*ty, v).map_err(|e| {
                    ProviderError::Configuration(format!(
                        "error unmarshalling property \"{}\": {}",
                        key, e
                    ))
                })?,
                None => v,
            };
            out.insert(key, decoded);
        }
        Ok(out)
    }
}

fn decode_config_value(
    ty: ConfigType,
    v: PropertyValue,
) -> Result<PropertyValue, serde_json::Error> {
    match v {
        PropertyValue::String(s) => decode_string(ty, s),
        PropertyValue::Secret(element) => match *element {
            PropertyValue::String(s) => Ok(make_secret(decode_string(ty, s)?)),
            other => Ok(PropertyValue::secret(other)),
        },
        PropertyValue::Computed(element) if is_empty_string(&element) => {
            Ok(PropertyValue::computed(ty.zero_value()))
        },
        PropertyValue::Output(o) if !o.known && is_empty_string(&o.element) => {
            Ok(PropertyValue::Output(Output {
                element: Box::new(ty.zero_value()),
                ..o
            }))
        },
        other => Ok(other),
    }
}

fn is_empty_string(v: &PropertyValue) -> bool {
    matches!(v, PropertyValue::String(s) if s.is_empty())
}

fn decode_string(ty: ConfigType, s: String) -> Result<PropertyValue, serde_json::Error> {
    if ty == ConfigType::String {
        return Ok(PropertyValue::String(s));
    }
    if s.is_empty() {
        return Ok(ty.zero_value());
    }
    let json: Value = serde_json::from_str(&s)?;
    Ok(from_config_json(&json))
}

/// Like [`PropertyValue::from_json`], but recognizes secret objects and
/// unknown sentinels embedded in the document.
fn from_config_json(v: &Value) -> PropertyValue {
    match v {
        Value::String(s) => match unknown_placeholder(s) {
            Some(placeholder) => make_computed(placeholder),
            None => PropertyValue::String(s.clone()),
        },
        Value::Array(items) => PropertyValue::Array(items.iter().map(from_config_json).collect()),
        Value::Object(map) => {
            if map.get(sig::KEY).and_then(Value::as_str) == Some(sig::SECRET) {
                let element = map.get("value").map(from_config_json).unwrap_or_default();
                return make_secret(element);
            }
            PropertyValue::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), from_config_json(v)))
                    .collect(),
            )
        },
        other => PropertyValue::from_json(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::marshal_properties;
    use crate::property::Asset;

    fn encoding() -> ConfigEncoding {
        ConfigEncoding::default()
            .with_variable("name", ConfigType::String)
            .with_variable("enabled", ConfigType::Bool)
            .with_variable("count", ConfigType::Int)
            .with_variable("ratio", ConfigType::Float)
            .with_variable("tags", ConfigType::List)
            .with_variable("zones", ConfigType::Set)
            .with_variable("settings", ConfigType::Object)
    }

    fn wire(entries: Vec<(&str, PropertyValue)>) -> Struct {
        let props: PropertyMap = entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        let opts = MarshalOptions::lossless().with_keep_output_values(false);
        marshal_properties(&props, &opts).unwrap()
    }

    #[test]
    fn test_json_encoded_values_are_decoded() {
        let s = wire(vec![
            ("enabled", PropertyValue::from("true")),
            ("count", PropertyValue::from("42")),
            ("ratio", PropertyValue::from("0.5")),
            ("tags", PropertyValue::from(r#"["a","b"]"#)),
            ("settings", PropertyValue::from(r#"{"k":1}"#)),
        ]);
        let m = encoding().unmarshal_properties(&s).unwrap();
        assert_eq!(m["enabled"], PropertyValue::Bool(true));
        assert_eq!(m["count"], PropertyValue::Number(42.0));
        assert_eq!(m["ratio"], PropertyValue::Number(0.5));
        assert_eq!(
            m["tags"],
            PropertyValue::array(vec![PropertyValue::from("a"), PropertyValue::from("b")])
        );
        assert_eq!(m["settings"], PropertyValue::object([("k", PropertyValue::from(1))]));
    }

    #[test]
    fn test_string_variables_are_not_decoded() {
        let s = wire(vec![("name", PropertyValue::from("42"))]);
        let m = encoding().unmarshal_properties(&s).unwrap();
        assert_eq!(m["name"], PropertyValue::from("42"));
    }

    #[test]
    fn test_empty_strings_decode_to_zero_values() {
        let s = wire(vec![
            ("name", PropertyValue::from("")),
            ("enabled", PropertyValue::from("")),
            ("count", PropertyValue::from("")),
            ("zones", PropertyValue::from("")),
            ("settings", PropertyValue::from("")),
        ]);
        let m = encoding().unmarshal_properties(&s).unwrap();
        assert_eq!(m["name"], PropertyValue::from(""));
        assert_eq!(m["enabled"], PropertyValue::Bool(false));
        assert_eq!(m["count"], PropertyValue::Number(0.0));
        assert_eq!(m["zones"], PropertyValue::Array(vec![]));
        assert_eq!(m["settings"], PropertyValue::Object(PropertyMap::new()));
    }

    #[test]
    fn test_secret_strings_are_decoded_and_stay_secret() {
        let s = wire(vec![("count", make_secret(PropertyValue::from("7")))]);
        let m = encoding().unmarshal_properties(&s).unwrap();
        assert_eq!(m["count"], PropertyValue::secret(PropertyValue::Number(7.0)));
    }

    #[test]
    fn test_nested_secret_objects() {
        let doc = format!(
            r#"{{"password":{{"{}":"{}","value":"hunter2"}},"user":"admin"}}"#,
            sig::KEY,
            sig::SECRET
        );
        let s = wire(vec![("settings", PropertyValue::from(doc))]);
        let m = encoding().unmarshal_properties(&s).unwrap();
        assert_eq!(
            m["settings"],
            PropertyValue::object([
                ("password", PropertyValue::secret(PropertyValue::from("hunter2"))),
                ("user", PropertyValue::from("admin")),
            ])
        );
    }

    #[test]
    fn test_computed_placeholder_becomes_typed_unknown() {
        let s = wire(vec![("tags", PropertyValue::computed(PropertyValue::from("")))]);
        let m = encoding().unmarshal_properties(&s).unwrap();
        assert_eq!(m["tags"], PropertyValue::computed(PropertyValue::Array(vec![])));
    }

    #[test]
    fn test_undeclared_variables_pass_through() {
        let s = wire(vec![("other", PropertyValue::from("[1,2]"))]);
        let m = encoding().unmarshal_properties(&s).unwrap();
        assert_eq!(m["other"], PropertyValue::from("[1,2]"));
    }

    #[test]
    fn test_nulls_are_skipped() {
        let s = wire(vec![("count", PropertyValue::Null)]);
        let m = encoding().unmarshal_properties(&s).unwrap();
        assert!(m.is_empty());
    }

    #[test]
    fn test_invalid_json_names_the_property() {
        let s = wire(vec![("count", PropertyValue::from("not json"))]);
        let err = encoding().unmarshal_properties(&s).unwrap_err();
        assert!(matches!(err, ProviderError::Configuration(_)));
        assert!(err.to_string().contains("error unmarshalling property \"count\""));
    }

    #[test]
    fn test_assets_are_rejected() {
        let s = wire(vec![("file", PropertyValue::Asset(Asset::from_text("x")))]);
        let err = encoding().unmarshal_properties(&s).unwrap_err();
        assert!(matches!(err, ProviderError::AssetRejected(_)));
    }
}
