//! Typed extraction of property maps.
//!
//! [`unmarshal`] works in two phases. The property map is first decoded to
//! plain JSON (see [`decode`]) and bound onto the target type, recording every
//! path the target consumed. Each recorded path is then traversed in the
//! original property map to learn whether the consumed data was unknown or
//! secret and which resources it depends on.
//!
//! Properties the target type does not declare are never traversed, so their
//! markers do not affect the result.
//!
//! Field names follow the target's serde attributes; the usual convention is
//! `#[serde(rename_all = "camelCase")]`.
//!
//! [`decode`]: crate::decode::decode

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::bind::bind;
use crate::decode::decode;
use crate::error::{ContainsUnknownsError, ProviderError};
use crate::property::{traverse, PropertyMap, PropertyPath, PropertyValue, Urn};

/// Options for [`unmarshal`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnmarshalOptions {
    /// Fail with [`ContainsUnknownsError`] if any extracted value is unknown.
    pub reject_unknowns: bool,
}

impl UnmarshalOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether unknowns are rejected.
    pub fn with_reject_unknowns(mut self, reject: bool) -> Self {
        self.reject_unknowns = reject;
        self
    }
}

/// Summary of the markers found in extracted data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnmarshalResult {
    /// Resources the extracted data depends on, in first-seen order.
    pub dependencies: Vec<Urn>,
    /// Whether any extracted value was unknown.
    pub contains_unknowns: bool,
    /// Whether any extracted value was secret.
    pub contains_secrets: bool,
}

/// Alias of [`UnmarshalOptions`] under the extraction name.
pub type ExtractOptions = UnmarshalOptions;

/// Alias of [`UnmarshalResult`] under the extraction name.
pub type ExtractResult = UnmarshalResult;

impl UnmarshalResult {
    fn observe(&mut self, v: &PropertyValue) {
        match v {
            PropertyValue::Computed(_) => self.contains_unknowns = true,
            PropertyValue::Output(o) => {
                for dep in &o.dependencies {
                    if !self.dependencies.contains(dep) {
                        self.dependencies.push(dep.clone());
                    }
                }
                if !o.known {
                    self.contains_unknowns = true;
                }
                self.contains_secrets = self.contains_secrets || o.secret;
            },
            PropertyValue::Secret(_) => self.contains_secrets = true,
            _ => {},
        }
    }

    fn visit(&mut self, root: &PropertyValue, paths: &[PropertyPath]) {
        for path in paths {
            traverse(root, path, |v| self.observe(v));
        }
    }
}

/// Extract `props` into a value of type `T`.
///
/// Unknown values bind as the zero value of their field type. Array
/// elements that are unknown stay in place as zero values so indices line
/// up with the original array. Missing fields follow the target's serde
/// attributes; `#[serde(default)]` zero-fills them.
///
/// Some types have no zero value, enums among them. If binding fails and
/// unknowns are rejected, the consumed paths and the failing path are still
/// inspected, and an unknown there is reported as [`ContainsUnknownsError`]
/// rather than as a bind error.
///
/// # Panics
///
/// Panics if `props` contains an archive or resource reference.
pub fn unmarshal<T>(
    props: &PropertyMap,
    opts: UnmarshalOptions,
) -> Result<(T, UnmarshalResult), ProviderError>
where
    T: DeserializeOwned,
{
    let decoded = Value::Object(decode(props));
    let root = PropertyValue::Object(props.clone());
    let (target, used) = match bind::<T>(&decoded) {
        Ok(bound) => bound,
        Err(err) => {
            if opts.reject_unknowns {
                let mut result = UnmarshalResult::default();
                result.visit(&root, err.consumed());
                if let Some(path) = err.path() {
                    result.visit(&root, std::slice::from_ref(path));
                }
                if result.contains_unknowns {
                    return Err(ContainsUnknownsError::new(result.dependencies).into());
                }
            }
            return Err(err.into());
        },
    };

    let mut result = UnmarshalResult::default();
    result.visit(&root, &used);

    if opts.reject_unknowns && result.contains_unknowns {
        return Err(ContainsUnknownsError::new(result.dependencies).into());
    }
    Ok((target, result))
}

/// Extract `props` into a value of type `T`.
///
/// Same as [`unmarshal`].
pub fn extract<T>(
    props: &PropertyMap,
    opts: ExtractOptions,
) -> Result<(T, ExtractResult), ProviderError>
where
    T: DeserializeOwned,
{
    unmarshal(props, opts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{make_computed, make_secret, Asset, Output};
    use serde::Deserialize;

    fn res1() -> Urn {
        Urn::from("urn:pulumi:test::test::kubernetes:core/v1:Namespace::some-namespace")
    }

    fn res2() -> Urn {
        Urn::from("urn:pulumi:test::test::kubernetes:core/v1:Namespace::other-namespace")
    }

    #[derive(Debug, Default, PartialEq, Deserialize)]
    #[serde(default)]
    struct Nested {
        string: String,
    }

    #[derive(Debug, Default, PartialEq, Deserialize)]
    #[serde(default)]
    struct Required {
        number: i32,
        numbers: Vec<i32>,
        #[serde(rename = "struct")]
        nested: Nested,
        structs: Vec<Nested>,
    }

    #[derive(Debug, Default, PartialEq, Deserialize)]
    #[serde(default)]
    struct Optional {
        number: Option<i32>,
        numbers: Vec<Option<i32>>,
        #[serde(rename = "struct")]
        nested: Option<Nested>,
        asset: Option<Asset>,
    }

    fn props(entries: Vec<(&str, PropertyValue)>) -> PropertyMap {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    fn unknown(element: PropertyValue, deps: Vec<Urn>) -> PropertyValue {
        PropertyValue::Output(Output::unknown(element).with_dependencies(deps))
    }

    #[test]
    fn test_reject_unknowns() {
        let m = props(vec![("number", unknown(PropertyValue::from(42), vec![res1()]))]);
        let err = unmarshal::<Required>(&m, UnmarshalOptions::new().with_reject_unknowns(true))
            .unwrap_err();
        match err {
            ProviderError::ContainsUnknowns(e) => assert_eq!(e.dependencies, vec![res1()]),
            other => panic!("expected ContainsUnknowns, got {other:?}"),
        }
    }

    #[test]
    fn test_null_values() {
        let m = props(vec![("number", PropertyValue::Null)]);
        let (required, result) = unmarshal::<Required>(&m, UnmarshalOptions::new()).unwrap();
        assert_eq!(required.number, 0);
        assert_eq!(result, UnmarshalResult::default());

        let (optional, _) = unmarshal::<Optional>(&m, UnmarshalOptions::new()).unwrap();
        assert_eq!(optional.number, None);
    }

    #[test]
    fn test_plain_value() {
        let m = props(vec![("number", PropertyValue::from(42))]);
        let (required, result) = unmarshal::<Required>(&m, UnmarshalOptions::new()).unwrap();
        assert_eq!(required.number, 42);
        assert_eq!(result, UnmarshalResult::default());
    }

    #[test]
    fn test_asset() {
        let m = props(vec![("asset", PropertyValue::Asset(Asset::from_text("value")))]);
        let (optional, result) = unmarshal::<Optional>(&m, UnmarshalOptions::new()).unwrap();
        assert_eq!(optional.asset, Some(Asset::from_text("value")));
        assert!(!result.contains_secrets && !result.contains_unknowns);
    }

    #[test]
    fn test_secret_value() {
        let m = props(vec![("number", make_secret(PropertyValue::from(42)))]);
        let (required, result) = unmarshal::<Required>(&m, UnmarshalOptions::new()).unwrap();
        assert_eq!(required.number, 42);
        assert!(result.contains_secrets);
        assert!(!result.contains_unknowns);
    }

    #[test]
    fn test_secret_computed() {
        let m = props(vec![(
            "number",
            make_secret(make_computed(PropertyValue::from(42))),
        )]);
        let (required, result) = unmarshal::<Required>(&m, UnmarshalOptions::new()).unwrap();
        assert_eq!(required.number, 0);
        assert!(result.contains_secrets);
        assert!(result.contains_unknowns);
    }

    #[test]
    fn test_unknown_array_element_keeps_index() {
        let m = props(vec![(
            "numbers",
            PropertyValue::array(vec![
                PropertyValue::from(1),
                unknown(PropertyValue::from(0), vec![res1()]),
                PropertyValue::from(3),
            ]),
        )]);
        let (required, result) = unmarshal::<Required>(&m, UnmarshalOptions::new()).unwrap();
        assert_eq!(required.numbers, vec![1, 0, 3]);
        assert!(result.contains_unknowns);
        assert_eq!(result.dependencies, vec![res1()]);

        let (optional, _) = unmarshal::<Optional>(&m, UnmarshalOptions::new()).unwrap();
        assert_eq!(optional.numbers, vec![Some(1), None, Some(3)]);
    }

    #[test]
    fn test_nested_struct_dependencies() {
        let m = props(vec![
            (
                "struct",
                PropertyValue::Output(
                    Output::new(PropertyValue::object([(
                        "string",
                        PropertyValue::Output(
                            Output::new(PropertyValue::from("x")).with_dependencies(vec![res2()]),
                        ),
                    )]))
                    .with_dependencies(vec![res1()]),
                ),
            ),
            (
                "structs",
                PropertyValue::array(vec![PropertyValue::object([(
                    "string",
                    make_secret(PropertyValue::from("y")),
                )])]),
            ),
        ]);
        let (required, result) = unmarshal::<Required>(&m, UnmarshalOptions::new()).unwrap();
        assert_eq!(required.nested.string, "x");
        assert_eq!(required.structs[0].string, "y");
        assert_eq!(result.dependencies, vec![res1(), res2()]);
        assert!(result.contains_secrets);
        assert!(!result.contains_unknowns);
    }

    #[test]
    fn test_unmapped_fields_are_ignored() {
        let m = props(vec![
            ("number", PropertyValue::from(1)),
            ("extraUnknown", unknown(PropertyValue::from(""), vec![res1()])),
            ("extraSecret", make_secret(PropertyValue::from("s"))),
        ]);
        let (required, result) = unmarshal::<Required>(&m, UnmarshalOptions::new()).unwrap();
        assert_eq!(required.number, 1);
        assert!(!result.contains_unknowns);
        assert!(!result.contains_secrets);
        assert!(result.dependencies.is_empty());
    }

    #[test]
    fn test_extract_is_unmarshal() {
        let m = props(vec![("number", make_secret(PropertyValue::from(7)))]);
        let (required, result) = extract::<Required>(&m, ExtractOptions::new()).unwrap();
        assert_eq!(required.number, 7);
        assert!(result.contains_secrets);
    }

    #[derive(Debug, Default, PartialEq, Deserialize)]
    #[serde(rename_all = "lowercase")]
    enum Mode {
        #[default]
        Fast,
        Slow,
    }

    #[derive(Debug, PartialEq, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Settings {
        #[serde(default = "default_retries")]
        retries: u32,
        mode: Mode,
    }

    fn default_retries() -> u32 {
        5
    }

    #[test]
    fn test_missing_field_uses_serde_default() {
        let m = props(vec![("mode", PropertyValue::from("slow"))]);
        let (settings, result) = unmarshal::<Settings>(&m, UnmarshalOptions::new()).unwrap();
        assert_eq!(settings.retries, 5);
        assert_eq!(settings.mode, Mode::Slow);
        assert_eq!(result, UnmarshalResult::default());
    }

    #[test]
    fn test_unknown_enum_is_rejected_as_unknown() {
        let m = props(vec![
            ("retries", PropertyValue::from(1)),
            ("mode", unknown(PropertyValue::from(""), vec![res1()])),
        ]);
        let err = unmarshal::<Settings>(&m, UnmarshalOptions::new().with_reject_unknowns(true))
            .unwrap_err();
        match err {
            ProviderError::ContainsUnknowns(e) => assert_eq!(e.dependencies, vec![res1()]),
            other => panic!("expected ContainsUnknowns, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_enum_without_rejection_is_bind_error() {
        let m = props(vec![("mode", make_computed(PropertyValue::from("")))]);
        let err = unmarshal::<Settings>(&m, UnmarshalOptions::new()).unwrap_err();
        assert!(matches!(err, ProviderError::Bind(_)));
    }

    #[test]
    fn test_invalid_known_value_stays_bind_error_when_rejecting() {
        let m = props(vec![("mode", PropertyValue::from("medium"))]);
        let err = unmarshal::<Settings>(&m, UnmarshalOptions::new().with_reject_unknowns(true))
            .unwrap_err();
        assert!(matches!(err, ProviderError::Bind(_)));
    }

    #[test]
    fn test_type_mismatch_is_bind_error() {
        let m = props(vec![("number", PropertyValue::from("not a number"))]);
        let err = unmarshal::<Required>(&m, UnmarshalOptions::new()).unwrap_err();
        assert!(matches!(err, ProviderError::Bind(_)));
    }
}
