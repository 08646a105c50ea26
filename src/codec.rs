//! Wire codec between property values and protobuf `Struct`/`Value`.
//!
//! Markers and special values travel as objects tagged with
//! [`sig::KEY`](crate::property::sig::KEY). Which of them are kept is decided
//! by [`MarshalOptions`]:
//!
//! - `keep_secrets` off: secrets are sent as their plain element.
//! - `keep_output_values` off: outputs are lowered to a computed value, a
//!   secret, or their plain element.
//! - `keep_unknowns` on without output values: unknowns are sent as a fixed
//!   sentinel string chosen by the placeholder's type; off, they are dropped.
//! - `keep_resources` off: resource references are sent as their ID, or their
//!   URN when they have no ID.
//!
//! [`MarshalOptions::lossless`] keeps everything, so
//! `unmarshal_properties(marshal_properties(m))` equals `m` under
//! [`deep_equals`](crate::property::deep_equals).

use std::collections::BTreeMap;

use crate::error::ProviderError;
use crate::generated::{value::Kind, ListValue, NullValue, Struct, Value};
use crate::property::{
    sig, Archive, ArchiveMember, Asset, Output, PropertyMap, PropertyValue, ResourceReference, Urn,
};
use crate::types::Capabilities;

/// Sentinel strings standing in for unknown values of each type.
pub mod unknown {
    /// An unknown bool.
    pub const BOOL: &str = "1c4a061d-8072-4f0a-a4cb-0ff528b18fe7";
    /// An unknown number.
    pub const NUMBER: &str = "3eeb2bf0-c639-47a8-9e75-3b44932eb421";
    /// An unknown string.
    pub const STRING: &str = "04da6b54-80e4-46f7-96ec-b56ff0331ba9";
    /// An unknown array.
    pub const ARRAY: &str = "6a19a0b0-7e62-4c92-b797-7f8e31da9cc2";
    /// An unknown asset.
    pub const ASSET: &str = "030794c1-ac77-496b-92df-f27374a8bd58";
    /// An unknown archive.
    pub const ARCHIVE: &str = "e48ece36-62e2-4504-bad9-02848725956a";
    /// An unknown object.
    pub const OBJECT: &str = "dd056dcd-154b-4c76-9bd3-c8f88648b5ff";
}

const VALUE_KEY: &str = "value";
const KNOWN_KEY: &str = "known";
const SECRET_KEY: &str = "secret";
const DEPENDENCIES_KEY: &str = "dependencies";
const URN_KEY: &str = "urn";
const ID_KEY: &str = "id";
const PACKAGE_VERSION_KEY: &str = "packageVersion";
const HASH_KEY: &str = "hash";
const TEXT_KEY: &str = "text";
const PATH_KEY: &str = "path";
const URI_KEY: &str = "uri";
const ASSETS_KEY: &str = "assets";

/// Controls which markers survive marshaling and unmarshaling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarshalOptions {
    /// Drop null values instead of encoding them.
    pub skip_nulls: bool,
    /// Keep unknown values. When off, unknowns are dropped.
    pub keep_unknowns: bool,
    /// Keep secret markers. When off, secrets become their element.
    pub keep_secrets: bool,
    /// Keep resource references. When off, they become their ID or URN.
    pub keep_resources: bool,
    /// Keep output markers. When off, outputs are lowered.
    pub keep_output_values: bool,
    /// Fail on assets and archives.
    pub reject_assets: bool,
}

impl MarshalOptions {
    /// Options that drop every marker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that keep every marker. Round-trips are exact under deep equality.
    pub fn lossless() -> Self {
        Self {
            skip_nulls: false,
            keep_unknowns: true,
            keep_secrets: true,
            keep_resources: true,
            keep_output_values: true,
            reject_assets: false,
        }
    }

    /// Options for sending values to a peer with the given capabilities.
    ///
    /// Unknowns are always kept.
    pub fn for_capabilities(caps: &Capabilities) -> Self {
        Self {
            skip_nulls: false,
            keep_unknowns: true,
            keep_secrets: caps.accept_secrets,
            keep_resources: caps.accept_resources,
            keep_output_values: caps.accept_outputs,
            reject_assets: false,
        }
    }

    /// Set whether nulls are skipped.
    pub fn with_skip_nulls(mut self, skip: bool) -> Self {
        self.skip_nulls = skip;
        self
    }

    /// Set whether unknowns are kept.
    pub fn with_keep_unknowns(mut self, keep: bool) -> Self {
        self.keep_unknowns = keep;
        self
    }

    /// Set whether secrets are kept.
    pub fn with_keep_secrets(mut self, keep: bool) -> Self {
        self.keep_secrets = keep;
        self
    }

    /// Set whether resource references are kept.
    pub fn with_keep_resources(mut self, keep: bool) -> Self {
        self.keep_resources = keep;
        self
    }

    /// Set whether output values are kept.
    pub fn with_keep_output_values(mut self, keep: bool) -> Self {
        self.keep_output_values = keep;
        self
    }

    /// Set whether assets and archives are rejected.
    pub fn with_reject_assets(mut self, reject: bool) -> Self {
        self.reject_assets = reject;
        self
    }
}

// ============================================================================
// Wire value helpers
// ============================================================================

fn wire(kind: Kind) -> Value {
    Value { kind: Some(kind) }
}

fn wire_null() -> Value {
    wire(Kind::NullValue(NullValue::NullValue as i32))
}

fn wire_string(s: impl Into<String>) -> Value {
    wire(Kind::StringValue(s.into()))
}

fn wire_bool(b: bool) -> Value {
    wire(Kind::BoolValue(b))
}

fn wire_struct(fields: BTreeMap<String, Value>) -> Value {
    wire(Kind::StructValue(Struct { fields }))
}

fn signed(signature: &str) -> BTreeMap<String, Value> {
    let mut fields = BTreeMap::new();
    fields.insert(sig::KEY.to_string(), wire_string(signature));
    fields
}

fn insert_non_empty(fields: &mut BTreeMap<String, Value>, key: &str, value: &str) {
    if !value.is_empty() {
        fields.insert(key.to_string(), wire_string(value));
    }
}

// ============================================================================
// Marshal
// ============================================================================

/// Marshal a property map into a wire struct.
pub fn marshal_properties(
    props: &PropertyMap,
    opts: &MarshalOptions,
) -> Result<Struct, ProviderError> {
    let mut fields = BTreeMap::new();
    for (key, v) in props {
        if let Some(value) = marshal_value(v, opts)? {
            fields.insert(key.clone(), value);
        }
    }
    Ok(Struct { fields })
}

/// Marshal a single property value.
///
/// Returns `Ok(None)` when the options say the value should be omitted.
pub fn marshal_value(
    v: &PropertyValue,
    opts: &MarshalOptions,
) -> Result<Option<Value>, ProviderError> {
    let value = match v {
        PropertyValue::Null if opts.skip_nulls => return Ok(None),
        PropertyValue::Null => wire_null(),
        PropertyValue::Bool(b) => wire_bool(*b),
        PropertyValue::Number(n) => wire(Kind::NumberValue(*n)),
        PropertyValue::String(s) => wire_string(s.as_str()),
        PropertyValue::Array(items) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                values.push(marshal_value(item, opts)?.unwrap_or_else(wire_null));
            }
            wire(Kind::ListValue(ListValue { values }))
        },
        PropertyValue::Object(map) => wire(Kind::StructValue(marshal_properties(map, opts)?)),
        PropertyValue::Asset(asset) => {
            if opts.reject_assets {
                return Err(ProviderError::AssetRejected("asset".to_string()));
            }
            wire_struct(marshal_asset(asset))
        },
        PropertyValue::Archive(archive) => {
            if opts.reject_assets {
                return Err(ProviderError::AssetRejected("archive".to_string()));
            }
            wire_struct(marshal_archive(archive))
        },
        PropertyValue::ResourceReference(reference) => {
            return marshal_resource_reference(reference, opts);
        },
        PropertyValue::Secret(element) => {
            if !opts.keep_secrets {
                return marshal_value(element, opts);
            }
            let mut fields = signed(sig::SECRET);
            let inner = marshal_value(element, opts)?.unwrap_or_else(wire_null);
            fields.insert(VALUE_KEY.to_string(), inner);
            wire_struct(fields)
        },
        PropertyValue::Computed(element) => {
            if opts.keep_output_values {
                return marshal_output(&Output::unknown((**element).clone()), opts).map(Some);
            }
            return Ok(marshal_unknown(element, opts));
        },
        PropertyValue::Output(output) => {
            if opts.keep_output_values {
                return marshal_output(output, opts).map(Some);
            }
            if !output.known {
                return Ok(marshal_unknown(&output.element, opts));
            }
            if output.secret && opts.keep_secrets {
                return marshal_value(&PropertyValue::secret((*output.element).clone()), opts);
            }
            return marshal_value(&output.element, opts);
        },
    };
    Ok(Some(value))
}

fn marshal_output(output: &Output, opts: &MarshalOptions) -> Result<Value, ProviderError> {
    let mut fields = signed(sig::OUTPUT_VALUE);
    let inner = marshal_value(&output.element, opts)?.unwrap_or_else(wire_null);
    fields.insert(VALUE_KEY.to_string(), inner);
    if !output.known {
        fields.insert(KNOWN_KEY.to_string(), wire_bool(false));
    }
    if output.secret {
        fields.insert(SECRET_KEY.to_string(), wire_bool(true));
    }
    if !output.dependencies.is_empty() {
        let values = output
            .dependencies
            .iter()
            .map(|urn| wire_string(urn.as_str()))
            .collect();
        fields.insert(
            DEPENDENCIES_KEY.to_string(),
            wire(Kind::ListValue(ListValue { values })),
        );
    }
    Ok(wire_struct(fields))
}

/// Encode an unknown value as a sentinel, or drop it.
fn marshal_unknown(element: &PropertyValue, opts: &MarshalOptions) -> Option<Value> {
    if !opts.keep_unknowns {
        return None;
    }
    Some(wire_string(unknown_sentinel(element)))
}

fn unknown_sentinel(element: &PropertyValue) -> &'static str {
    match element {
        PropertyValue::Bool(_) => unknown::BOOL,
        PropertyValue::Number(_) => unknown::NUMBER,
        PropertyValue::String(_) => unknown::STRING,
        PropertyValue::Array(_) => unknown::ARRAY,
        PropertyValue::Object(_) => unknown::OBJECT,
        PropertyValue::Asset(_) => unknown::ASSET,
        PropertyValue::Archive(_) => unknown::ARCHIVE,
        PropertyValue::Secret(e) | PropertyValue::Computed(e) => unknown_sentinel(e),
        PropertyValue::Output(o) => unknown_sentinel(&o.element),
        PropertyValue::Null | PropertyValue::ResourceReference(_) => unknown::STRING,
    }
}

fn marshal_resource_reference(
    reference: &ResourceReference,
    opts: &MarshalOptions,
) -> Result<Option<Value>, ProviderError> {
    if opts.keep_resources {
        let mut fields = signed(sig::RESOURCE_REFERENCE);
        fields.insert(URN_KEY.to_string(), wire_string(reference.urn.as_str()));
        if let Some(id) = &reference.id {
            fields.insert(ID_KEY.to_string(), wire_string(id.as_str()));
        }
        insert_non_empty(&mut fields, PACKAGE_VERSION_KEY, &reference.package_version);
        return Ok(Some(wire_struct(fields)));
    }
    match reference.id.as_deref() {
        Some("") => Ok(marshal_unknown(&PropertyValue::String(String::new()), opts)),
        Some(id) => Ok(Some(wire_string(id))),
        None => Ok(Some(wire_string(reference.urn.as_str()))),
    }
}

fn marshal_asset(asset: &Asset) -> BTreeMap<String, Value> {
    let mut fields = signed(sig::ASSET);
    insert_non_empty(&mut fields, HASH_KEY, &asset.hash);
    insert_non_empty(&mut fields, TEXT_KEY, &asset.text);
    insert_non_empty(&mut fields, PATH_KEY, &asset.path);
    insert_non_empty(&mut fields, URI_KEY, &asset.uri);
    fields
}

fn marshal_archive(archive: &Archive) -> BTreeMap<String, Value> {
    let mut fields = signed(sig::ARCHIVE);
    insert_non_empty(&mut fields, HASH_KEY, &archive.hash);
    insert_non_empty(&mut fields, PATH_KEY, &archive.path);
    insert_non_empty(&mut fields, URI_KEY, &archive.uri);
    if !archive.assets.is_empty() {
        let members = archive
            .assets
            .iter()
            .map(|(name, member)| {
                let encoded = match member {
                    ArchiveMember::Asset(asset) => marshal_asset(asset),
                    ArchiveMember::Archive(archive) => marshal_archive(archive),
                };
                (name.clone(), wire_struct(encoded))
            })
            .collect();
        fields.insert(ASSETS_KEY.to_string(), wire_struct(members));
    }
    fields
}

// ============================================================================
// Unmarshal
// ============================================================================

/// Unmarshal a wire struct into a property map.
pub fn unmarshal_properties(
    s: &Struct,
    opts: &MarshalOptions,
) -> Result<PropertyMap, ProviderError> {
    let mut props = PropertyMap::new();
    for (key, value) in &s.fields {
        if let Some(v) = unmarshal_value(value, opts)? {
            props.insert(key.clone(), v);
        }
    }
    Ok(props)
}

/// Unmarshal a single wire value.
///
/// Returns `Ok(None)` when the options say the value should be omitted.
pub fn unmarshal_value(
    value: &Value,
    opts: &MarshalOptions,
) -> Result<Option<PropertyValue>, ProviderError> {
    let v = match &value.kind {
        None | Some(Kind::NullValue(_)) => {
            if opts.skip_nulls {
                return Ok(None);
            }
            PropertyValue::Null
        },
        Some(Kind::BoolValue(b)) => PropertyValue::Bool(*b),
        Some(Kind::NumberValue(n)) => PropertyValue::Number(*n),
        Some(Kind::StringValue(s)) => match unknown_placeholder(s) {
            Some(placeholder) if opts.keep_unknowns => PropertyValue::computed(placeholder),
            Some(_) => return Ok(None),
            None => PropertyValue::String(s.clone()),
        },
        Some(Kind::ListValue(list)) => {
            let mut items = Vec::with_capacity(list.values.len());
            for item in &list.values {
                items.push(unmarshal_value(item, opts)?.unwrap_or_default());
            }
            PropertyValue::Array(items)
        },
        Some(Kind::StructValue(s)) => return unmarshal_struct(s, opts),
    };
    Ok(Some(v))
}

pub(crate) fn unknown_placeholder(s: &str) -> Option<PropertyValue> {
    let placeholder = match s {
        unknown::BOOL => PropertyValue::Bool(false),
        unknown::NUMBER => PropertyValue::Number(0.0),
        unknown::STRING => PropertyValue::String(String::new()),
        unknown::ARRAY => PropertyValue::Array(Vec::new()),
        unknown::OBJECT => PropertyValue::Object(PropertyMap::new()),
        unknown::ASSET => PropertyValue::Asset(Asset::default()),
        unknown::ARCHIVE => PropertyValue::Archive(Archive::default()),
        _ => return None,
    };
    Some(placeholder)
}

fn field_str<'a>(s: &'a Struct, key: &str) -> Result<Option<&'a str>, ProviderError> {
    match s.fields.get(key).and_then(|v| v.kind.as_ref()) {
        None => Ok(None),
        Some(Kind::StringValue(v)) => Ok(Some(v.as_str())),
        Some(_) => Err(ProviderError::Malformed(format!(
            "expected '{}' to be a string",
            key
        ))),
    }
}

fn field_bool(s: &Struct, key: &str) -> Result<Option<bool>, ProviderError> {
    match s.fields.get(key).and_then(|v| v.kind.as_ref()) {
        None => Ok(None),
        Some(Kind::BoolValue(b)) => Ok(Some(*b)),
        Some(_) => Err(ProviderError::Malformed(format!(
            "expected '{}' to be a bool",
            key
        ))),
    }
}

fn unmarshal_struct(
    s: &Struct,
    opts: &MarshalOptions,
) -> Result<Option<PropertyValue>, ProviderError> {
    let signature = match s.fields.get(sig::KEY) {
        None => return unmarshal_properties(s, opts).map(|m| Some(PropertyValue::Object(m))),
        Some(Value {
            kind: Some(Kind::StringValue(signature)),
        }) => signature.as_str(),
        Some(_) => {
            return Err(ProviderError::Malformed(
                "signature key must be a string".to_string(),
            ))
        },
    };

    match signature {
        sig::SECRET => {
            let Some(value) = s.fields.get(VALUE_KEY) else {
                return Err(ProviderError::Malformed(
                    "malformed secret value: missing value".to_string(),
                ));
            };
            let element = unmarshal_value(value, opts)?.unwrap_or_default();
            if opts.keep_secrets {
                Ok(Some(PropertyValue::secret(element)))
            } else {
                Ok(Some(element))
            }
        },
        sig::OUTPUT_VALUE => unmarshal_output(s, opts),
        sig::RESOURCE_REFERENCE => unmarshal_resource_reference(s, opts),
        sig::ASSET => {
            if opts.reject_assets {
                return Err(ProviderError::AssetRejected("asset".to_string()));
            }
            Ok(Some(PropertyValue::Asset(unmarshal_asset(s)?)))
        },
        sig::ARCHIVE => {
            if opts.reject_assets {
                return Err(ProviderError::AssetRejected("archive".to_string()));
            }
            Ok(Some(PropertyValue::Archive(unmarshal_archive(s)?)))
        },
        other => Err(ProviderError::InvalidSignature(other.to_string())),
    }
}

fn unmarshal_output(
    s: &Struct,
    opts: &MarshalOptions,
) -> Result<Option<PropertyValue>, ProviderError> {
    let value = s.fields.get(VALUE_KEY);
    let element = match value {
        Some(value) => unmarshal_value(value, opts)?.unwrap_or_default(),
        None => PropertyValue::Null,
    };
    let known = field_bool(s, KNOWN_KEY)?.unwrap_or(value.is_some());
    let secret = field_bool(s, SECRET_KEY)?.unwrap_or(false);

    let mut dependencies = Vec::new();
    if let Some(deps) = s.fields.get(DEPENDENCIES_KEY) {
        let Some(Kind::ListValue(list)) = &deps.kind else {
            return Err(ProviderError::Malformed(
                "expected output dependencies to be a list".to_string(),
            ));
        };
        for dep in &list.values {
            let Some(Kind::StringValue(urn)) = &dep.kind else {
                return Err(ProviderError::Malformed(
                    "expected output dependency to be a string".to_string(),
                ));
            };
            dependencies.push(Urn::new(urn.as_str()));
        }
    }

    if opts.keep_output_values {
        return Ok(Some(PropertyValue::Output(Output {
            element: Box::new(element),
            known,
            secret,
            dependencies,
        })));
    }
    if !known {
        return Ok(opts.keep_unknowns.then(|| PropertyValue::computed(element)));
    }
    if secret && opts.keep_secrets {
        return Ok(Some(PropertyValue::secret(element)));
    }
    Ok(Some(element))
}

fn unmarshal_resource_reference(
    s: &Struct,
    opts: &MarshalOptions,
) -> Result<Option<PropertyValue>, ProviderError> {
    let Some(urn) = field_str(s, URN_KEY)? else {
        return Err(ProviderError::Malformed(
            "malformed resource reference: missing urn".to_string(),
        ));
    };
    let id = field_str(s, ID_KEY)?;
    let package_version = field_str(s, PACKAGE_VERSION_KEY)?.unwrap_or_default();

    if opts.keep_resources {
        let mut reference =
            ResourceReference::new(Urn::new(urn)).with_package_version(package_version);
        reference.id = id.map(str::to_string);
        return Ok(Some(PropertyValue::ResourceReference(reference)));
    }
    match id {
        Some("") => Ok(opts
            .keep_unknowns
            .then(|| PropertyValue::computed(PropertyValue::String(String::new())))),
        Some(id) => Ok(Some(PropertyValue::String(id.to_string()))),
        None => Ok(Some(PropertyValue::String(urn.to_string()))),
    }
}

fn unmarshal_asset(s: &Struct) -> Result<Asset, ProviderError> {
    Ok(Asset {
        hash: field_str(s, HASH_KEY)?.unwrap_or_default().to_string(),
        text: field_str(s, TEXT_KEY)?.unwrap_or_default().to_string(),
        path: field_str(s, PATH_KEY)?.unwrap_or_default().to_string(),
        uri: field_str(s, URI_KEY)?.unwrap_or_default().to_string(),
    })
}

fn unmarshal_archive(s: &Struct) -> Result<Archive, ProviderError> {
    let mut assets = BTreeMap::new();
    if let Some(members) = s.fields.get(ASSETS_KEY) {
        let Some(Kind::StructValue(members)) = &members.kind else {
            return Err(ProviderError::Malformed(
                "expected archive assets to be an object".to_string(),
            ));
        };
        for (name, member) in &members.fields {
            let Some(Kind::StructValue(member)) = &member.kind else {
                return Err(ProviderError::Malformed(format!(
                    "archive member '{}' is not an asset or archive",
                    name
                )));
            };
            let decoded = match field_str(member, sig::KEY)? {
                Some(sig::ASSET) => ArchiveMember::Asset(unmarshal_asset(member)?),
                Some(sig::ARCHIVE) => ArchiveMember::Archive(unmarshal_archive(member)?),
                _ => {
                    return Err(ProviderError::Malformed(format!(
                        "archive member '{}' is not an asset or archive",
                        name
                    )))
                },
            };
            assets.insert(name.clone(), decoded);
        }
    }
    Ok(Archive {
        hash: field_str(s, HASH_KEY)?.unwrap_or_default().to_string(),
        path: field_str(s, PATH_KEY)?.unwrap_or_default().to_string(),
        uri: field_str(s, URI_KEY)?.unwrap_or_default().to_string(),
        assets,
    })
}
