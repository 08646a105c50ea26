//! Best-effort projection of property values onto plain JSON.
//!
//! Decoding strips every marker: secrets and known outputs become their
//! element, unknowns become `null`. Assets decode to an object tagged with
//! the asset signature so they can be deserialized back into [`Asset`].
//!
//! Archives and resource references have no plain form. Reaching one is an
//! integration error and panics.
//!
//! [`Asset`]: crate::property::Asset

use serde_json::{Map, Value};

use crate::property::{sig, Asset, PropertyMap, PropertyValue};

/// Decode a property map into a JSON object.
///
/// # Panics
///
/// Panics if the map contains an archive or resource reference.
pub fn decode(props: &PropertyMap) -> Map<String, Value> {
    props
        .iter()
        .map(|(k, v)| (k.clone(), decode_value(v)))
        .collect()
}

/// Decode a single property value.
///
/// Non-finite numbers have no JSON form and decode to `null`.
///
/// # Panics
///
/// Panics on an archive or resource reference.
pub fn decode_value(v: &PropertyValue) -> Value {
    match v {
        PropertyValue::Null => Value::Null,
        PropertyValue::Bool(b) => Value::Bool(*b),
        PropertyValue::Number(n) => serde_json::Number::from_f64(*n)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        PropertyValue::String(s) => Value::String(s.clone()),
        PropertyValue::Array(items) => Value::Array(items.iter().map(decode_value).collect()),
        PropertyValue::Object(map) => Value::Object(decode(map)),
        PropertyValue::Asset(asset) => decode_asset(asset),
        PropertyValue::Computed(_) => Value::Null,
        PropertyValue::Output(o) if !o.known => Value::Null,
        PropertyValue::Output(o) => decode_value(&o.element),
        PropertyValue::Secret(e) => decode_value(e),
        PropertyValue::Archive(_) | PropertyValue::ResourceReference(_) => {
            panic!("unsupported value type '{}'", v.type_name())
        },
    }
}

fn decode_asset(asset: &Asset) -> Value {
    let mut obj = Map::new();
    obj.insert(sig::KEY.to_string(), Value::from(sig::ASSET));
    for (key, field) in [
        ("hash", &asset.hash),
        ("text", &asset.text),
        ("path", &asset.path),
        ("uri", &asset.uri),
    ] {
        if !field.is_empty() {
            obj.insert(key.to_string(), Value::from(field.as_str()));
        }
    }
    Value::Object(obj)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{make_secret, Archive, Output};
    use serde_json::json;

    fn props(entries: Vec<(&str, PropertyValue)>) -> PropertyMap {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn test_unknown_output_decodes_to_null() {
        let m = props(vec![(
            "value",
            PropertyValue::Output(Output::unknown(PropertyValue::from("foo"))),
        )]);
        assert_eq!(Value::Object(decode(&m)), json!({"value": null}));
    }

    #[test]
    fn test_secret_decodes_to_element() {
        let m = props(vec![("value", make_secret(PropertyValue::from("foo")))]);
        assert_eq!(Value::Object(decode(&m)), json!({"value": "foo"}));
    }

    #[test]
    fn test_nested_values() {
        let m = props(vec![
            (
                "list",
                PropertyValue::array(vec![
                    PropertyValue::from(1.0),
                    PropertyValue::computed(PropertyValue::from(0.0)),
                    PropertyValue::Output(Output::new(PropertyValue::from(true))),
                ]),
            ),
            ("obj", PropertyValue::object([("k", PropertyValue::Null)])),
        ]);
        assert_eq!(
            Value::Object(decode(&m)),
            json!({"list": [1.0, null, true], "obj": {"k": null}})
        );
    }

    #[test]
    fn test_asset_decodes_with_signature() {
        let v = decode_value(&PropertyValue::Asset(Asset::from_text("hello")));
        assert_eq!(
            v,
            json!({
                "4dabf18193072939515e22adb298388d": "c44067f5952c0a294b673a41bacd8c17",
                "text": "hello",
            })
        );
    }

    #[test]
    fn test_non_finite_number_decodes_to_null() {
        assert_eq!(decode_value(&PropertyValue::from(f64::INFINITY)), Value::Null);
    }

    #[test]
    #[should_panic(expected = "unsupported value type 'archive'")]
    fn test_archive_panics() {
        decode_value(&PropertyValue::Archive(Archive::from_path("dir")));
    }
}
