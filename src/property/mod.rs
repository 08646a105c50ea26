//! The property value model.
//!
//! A [`PropertyValue`] is a recursive tagged union over plain data (null,
//! bools, numbers, strings, arrays, objects), blob references (assets and
//! archives), resource references, and three marker wrappers:
//!
//! - [`PropertyValue::Secret`] marks its element as sensitive.
//! - [`PropertyValue::Computed`] marks its element as not yet known. The
//!   element is a placeholder of the expected shape.
//! - [`PropertyValue::Output`] carries explicit `known`/`secret` flags plus
//!   the set of resources the value was computed from.
//!
//! Markers may nest in any order. [`deep_equals`] folds nested markers before
//! comparing, so `Secret(Computed(x))` and `Computed(Secret(x))` are equal.
//!
//! # Example
//!
//! ```
//! use resource_provider_sdk::property::{deep_equals, make_computed, make_secret, PropertyValue};
//!
//! let x = PropertyValue::from("hunter2");
//! let a = make_computed(make_secret(x.clone()));
//! let b = make_secret(make_computed(x));
//! assert!(deep_equals(&a, &b));
//! ```

mod asset;
mod deps;
mod fold;
mod path;
mod urn;

pub use asset::{Archive, ArchiveMember, Asset, ResourceReference};
pub use deps::{get_property_dependencies, merge_property_dependencies};
pub use fold::{
    deep_equals, deep_equals_with, fold_output_value, fold_with_dependencies, EqualityOptions,
};
pub use path::{traverse, walk, PathSegment, PropertyPath, WalkState};
pub use urn::{format_provider_reference, parse_provider_reference, Urn};

use std::collections::BTreeMap;

/// Reserved keys and signature values used to tag special objects in
/// encoded form.
pub mod sig {
    /// Key whose presence marks an object as a special value.
    pub const KEY: &str = "4dabf18193072939515e22adb298388d";
    /// Signature of a secret marker.
    pub const SECRET: &str = "1b47061264138c4ac30d75fd1eb44270";
    /// Signature of an output marker.
    pub const OUTPUT_VALUE: &str = "d0e6a833031e9bbcd3f4e8bde6ca49a4";
    /// Signature of a resource reference.
    pub const RESOURCE_REFERENCE: &str = "5cf8f73096256a8f31e491e813e4eb8e";
    /// Signature of an asset.
    pub const ASSET: &str = "c44067f5952c0a294b673a41bacd8c17";
    /// Signature of an archive.
    pub const ARCHIVE: &str = "0def7320c3a5731c473e5ecbe6d01bc7";
}

/// An object of property values keyed by property name.
///
/// Keys are kept sorted so iteration order is stable.
pub type PropertyMap = BTreeMap<String, PropertyValue>;

/// A property value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PropertyValue {
    /// The null value.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// A number. All numbers are 64-bit floats.
    Number(f64),
    /// A string.
    String(String),
    /// An ordered list of values.
    Array(Vec<PropertyValue>),
    /// A string-keyed object.
    Object(PropertyMap),
    /// A blob reference.
    Asset(Asset),
    /// A collection of blob references.
    Archive(Archive),
    /// A reference to another resource.
    ResourceReference(ResourceReference),
    /// A sensitive value.
    Secret(Box<PropertyValue>),
    /// A value that is not yet known. The element is a placeholder.
    Computed(Box<PropertyValue>),
    /// A value with explicit known/secret state and dependencies.
    Output(Output),
}

/// The payload of [`PropertyValue::Output`].
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    /// The wrapped value. Meaningless when `known` is false.
    pub element: Box<PropertyValue>,
    /// Whether the value is known.
    pub known: bool,
    /// Whether the value is sensitive.
    pub secret: bool,
    /// Resources this value was computed from.
    pub dependencies: Vec<Urn>,
}

impl Output {
    /// A known, non-secret output with no dependencies.
    pub fn new(element: PropertyValue) -> Self {
        Self {
            element: Box::new(element),
            known: true,
            secret: false,
            dependencies: Vec::new(),
        }
    }

    /// An unknown output with the given placeholder element.
    pub fn unknown(element: PropertyValue) -> Self {
        Self {
            known: false,
            ..Self::new(element)
        }
    }

    /// Set the known flag.
    pub fn with_known(mut self, known: bool) -> Self {
        self.known = known;
        self
    }

    /// Set the secret flag.
    pub fn with_secret(mut self, secret: bool) -> Self {
        self.secret = secret;
        self
    }

    /// Set the dependencies.
    pub fn with_dependencies(mut self, dependencies: Vec<Urn>) -> Self {
        self.dependencies = dependencies;
        self
    }
}

macro_rules! accessor {
    ($(#[$doc:meta])* $name:ident, $variant:ident, $ty:ty, $label:literal) => {
        $(#[$doc])*
        ///
        /// # Panics
        ///
        #[doc = concat!("Panics if the value is not ", $label, ".")]
        pub fn $name(&self) -> $ty {
            match self {
                PropertyValue::$variant(v) => v,
                other => panic!(
                    concat!("expected ", $label, " value, found {}"),
                    other.type_name()
                ),
            }
        }
    };
}

impl PropertyValue {
    /// Wrap a value in a secret marker, without normalizing.
    ///
    /// See [`make_secret`] for the normalizing form.
    pub fn secret(v: PropertyValue) -> Self {
        PropertyValue::Secret(Box::new(v))
    }

    /// Wrap a placeholder in a computed marker, without normalizing.
    ///
    /// See [`make_computed`] for the normalizing form.
    pub fn computed(v: PropertyValue) -> Self {
        PropertyValue::Computed(Box::new(v))
    }

    /// Build an object from key/value pairs.
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, PropertyValue)>,
    {
        PropertyValue::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Build an array from values.
    pub fn array<I>(items: I) -> Self
    where
        I: IntoIterator<Item = PropertyValue>,
    {
        PropertyValue::Array(items.into_iter().collect())
    }

    /// Whether this is [`PropertyValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }

    /// Whether this is [`PropertyValue::Bool`].
    pub fn is_bool(&self) -> bool {
        matches!(self, PropertyValue::Bool(_))
    }

    /// Whether this is [`PropertyValue::Number`].
    pub fn is_number(&self) -> bool {
        matches!(self, PropertyValue::Number(_))
    }

    /// Whether this is [`PropertyValue::String`].
    pub fn is_string(&self) -> bool {
        matches!(self, PropertyValue::String(_))
    }

    /// Whether this is [`PropertyValue::Array`].
    pub fn is_array(&self) -> bool {
        matches!(self, PropertyValue::Array(_))
    }

    /// Whether this is [`PropertyValue::Object`].
    pub fn is_object(&self) -> bool {
        matches!(self, PropertyValue::Object(_))
    }

    /// Whether this is [`PropertyValue::Asset`].
    pub fn is_asset(&self) -> bool {
        matches!(self, PropertyValue::Asset(_))
    }

    /// Whether this is [`PropertyValue::Archive`].
    pub fn is_archive(&self) -> bool {
        matches!(self, PropertyValue::Archive(_))
    }

    /// Whether this is [`PropertyValue::ResourceReference`].
    pub fn is_resource_reference(&self) -> bool {
        matches!(self, PropertyValue::ResourceReference(_))
    }

    /// Whether this is a [`PropertyValue::Secret`] marker.
    ///
    /// Secret outputs are not included; see the free function [`is_secret`].
    pub fn is_secret(&self) -> bool {
        matches!(self, PropertyValue::Secret(_))
    }

    /// Whether this is a [`PropertyValue::Computed`] marker.
    ///
    /// Unknown outputs are not included; see the free function [`is_computed`].
    pub fn is_computed(&self) -> bool {
        matches!(self, PropertyValue::Computed(_))
    }

    /// Whether this is a [`PropertyValue::Output`] marker.
    pub fn is_output(&self) -> bool {
        matches!(self, PropertyValue::Output(_))
    }

    /// The boolean payload.
    ///
    /// # Panics
    ///
    /// Panics if the value is not a bool.
    pub fn bool_value(&self) -> bool {
        match self {
            PropertyValue::Bool(b) => *b,
            other => panic!("expected a bool value, found {}", other.type_name()),
        }
    }

    /// The numeric payload.
    ///
    /// # Panics
    ///
    /// Panics if the value is not a number.
    pub fn number_value(&self) -> f64 {
        match self {
            PropertyValue::Number(n) => *n,
            other => panic!("expected a number value, found {}", other.type_name()),
        }
    }

    accessor!(
        /// The string payload.
        string_value, String, &str, "a string"
    );
    accessor!(
        /// The array elements.
        array_value, Array, &[PropertyValue], "an array"
    );
    accessor!(
        /// The object entries.
        object_value, Object, &PropertyMap, "an object"
    );
    accessor!(
        /// The asset payload.
        asset_value, Asset, &Asset, "an asset"
    );
    accessor!(
        /// The archive payload.
        archive_value, Archive, &Archive, "an archive"
    );
    accessor!(
        /// The resource reference payload.
        resource_reference_value, ResourceReference, &ResourceReference, "a resource reference"
    );
    accessor!(
        /// The element wrapped by a secret marker.
        secret_value, Secret, &PropertyValue, "a secret"
    );
    accessor!(
        /// The placeholder wrapped by a computed marker.
        computed_value, Computed, &PropertyValue, "a computed"
    );
    accessor!(
        /// The output payload.
        output_value, Output, &Output, "an output"
    );

    /// A short name for the value's variant, used in messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Null => "null",
            PropertyValue::Bool(_) => "bool",
            PropertyValue::Number(_) => "number",
            PropertyValue::String(_) => "string",
            PropertyValue::Array(_) => "array",
            PropertyValue::Object(_) => "object",
            PropertyValue::Asset(_) => "asset",
            PropertyValue::Archive(_) => "archive",
            PropertyValue::ResourceReference(_) => "resourceReference",
            PropertyValue::Secret(_) => "secret",
            PropertyValue::Computed(_) => "computed",
            PropertyValue::Output(_) => "output",
        }
    }

    /// Whether any value in the tree is unknown.
    pub fn contains_unknowns(&self) -> bool {
        match self {
            PropertyValue::Computed(_) => true,
            PropertyValue::Output(o) => !o.known || o.element.contains_unknowns(),
            PropertyValue::Secret(e) => e.contains_unknowns(),
            PropertyValue::Array(items) => items.iter().any(PropertyValue::contains_unknowns),
            PropertyValue::Object(map) => map.values().any(PropertyValue::contains_unknowns),
            _ => false,
        }
    }

    /// Whether any value in the tree is secret.
    pub fn contains_secrets(&self) -> bool {
        match self {
            PropertyValue::Secret(_) => true,
            PropertyValue::Output(o) => o.secret || o.element.contains_secrets(),
            PropertyValue::Computed(e) => e.contains_secrets(),
            PropertyValue::Array(items) => items.iter().any(PropertyValue::contains_secrets),
            PropertyValue::Object(map) => map.values().any(PropertyValue::contains_secrets),
            _ => false,
        }
    }

    /// The dependencies carried directly by this value.
    ///
    /// Only an [`Output`] at the top level carries dependencies; nested values
    /// are not inspected. See [`get_property_dependencies`] for the deep form.
    pub fn dependencies(&self) -> &[Urn] {
        match self {
            PropertyValue::Output(o) => &o.dependencies,
            _ => &[],
        }
    }

    /// Replace the value's own dependencies.
    ///
    /// The value becomes an [`Output`] node, absorbing a top-level secret or
    /// computed marker into its flags. A plain value given no dependencies is
    /// returned unchanged.
    pub fn with_dependencies(self, dependencies: Vec<Urn>) -> PropertyValue {
        let output = match self {
            PropertyValue::Output(o) => o,
            PropertyValue::Secret(e) => Output::new(*e).with_secret(true),
            PropertyValue::Computed(e) => Output::unknown(*e),
            plain if dependencies.is_empty() => return plain,
            plain => Output::new(plain),
        };
        PropertyValue::Output(output.with_dependencies(dependencies))
    }

    /// Build a plain value tree from JSON.
    pub fn from_json(value: &serde_json::Value) -> PropertyValue {
        match value {
            serde_json::Value::Null => PropertyValue::Null,
            serde_json::Value::Bool(b) => PropertyValue::Bool(*b),
            serde_json::Value::Number(n) => PropertyValue::Number(n.as_f64().unwrap_or_default()),
            serde_json::Value::String(s) => PropertyValue::String(s.clone()),
            serde_json::Value::Array(items) => {
                PropertyValue::Array(items.iter().map(PropertyValue::from_json).collect())
            },
            serde_json::Value::Object(map) => PropertyValue::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), PropertyValue::from_json(v)))
                    .collect(),
            ),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Bool(b)
    }
}

impl From<f64> for PropertyValue {
    fn from(n: f64) -> Self {
        PropertyValue::Number(n)
    }
}

impl From<i32> for PropertyValue {
    fn from(n: i32) -> Self {
        PropertyValue::Number(f64::from(n))
    }
}

impl From<i64> for PropertyValue {
    fn from(n: i64) -> Self {
        PropertyValue::Number(n as f64)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

impl From<Vec<PropertyValue>> for PropertyValue {
    fn from(items: Vec<PropertyValue>) -> Self {
        PropertyValue::Array(items)
    }
}

impl From<PropertyMap> for PropertyValue {
    fn from(map: PropertyMap) -> Self {
        PropertyValue::Object(map)
    }
}

impl From<Asset> for PropertyValue {
    fn from(asset: Asset) -> Self {
        PropertyValue::Asset(asset)
    }
}

impl From<Archive> for PropertyValue {
    fn from(archive: Archive) -> Self {
        PropertyValue::Archive(archive)
    }
}

impl From<ResourceReference> for PropertyValue {
    fn from(reference: ResourceReference) -> Self {
        PropertyValue::ResourceReference(reference)
    }
}

impl From<Output> for PropertyValue {
    fn from(output: Output) -> Self {
        PropertyValue::Output(output)
    }
}

/// Whether `v` is some form of unknown: a computed marker or an unknown output.
pub fn is_computed(v: &PropertyValue) -> bool {
    match v {
        PropertyValue::Computed(_) => true,
        PropertyValue::Output(o) => !o.known,
        _ => false,
    }
}

/// Whether `v` should be treated as secret: a secret marker or a secret output.
pub fn is_secret(v: &PropertyValue) -> bool {
    match v {
        PropertyValue::Secret(_) => true,
        PropertyValue::Output(o) => o.secret,
        _ => false,
    }
}

/// Mark `v` as secret.
///
/// An already-secret value is returned unchanged; an output has its secret
/// flag set; a computed value becomes an unknown secret output.
pub fn make_secret(v: PropertyValue) -> PropertyValue {
    match v {
        PropertyValue::Computed(e) => PropertyValue::Output(Output::unknown(*e).with_secret(true)),
        PropertyValue::Output(o) => PropertyValue::Output(o.with_secret(true)),
        secret @ PropertyValue::Secret(_) => secret,
        other => PropertyValue::secret(other),
    }
}

/// Mark `v` as unknown.
///
/// An already-computed value is returned unchanged; an output has its known
/// flag cleared; a secret value becomes an unknown secret output.
pub fn make_computed(v: PropertyValue) -> PropertyValue {
    match v {
        PropertyValue::Output(o) => PropertyValue::Output(o.with_known(false)),
        PropertyValue::Secret(e) => PropertyValue::Output(Output::unknown(*e).with_secret(true)),
        computed @ PropertyValue::Computed(_) => computed,
        other => PropertyValue::computed(other),
    }
}

/// Remove the secret marker from the top of `v`.
///
/// A known output without secrecy collapses to its element.
pub fn make_public(v: PropertyValue) -> PropertyValue {
    match v {
        PropertyValue::Output(o) => {
            let o = o.with_secret(false);
            if o.known {
                *o.element
            } else {
                PropertyValue::Output(o)
            }
        },
        PropertyValue::Secret(e) => *e,
        other => other,
    }
}

/// Remove the unknown marker from the top of `v`.
///
/// A non-secret output collapses to its element.
pub fn make_known(v: PropertyValue) -> PropertyValue {
    match v {
        PropertyValue::Output(o) => {
            let o = o.with_known(true);
            if o.secret {
                PropertyValue::Output(o)
            } else {
                *o.element
            }
        },
        PropertyValue::Computed(e) => *e,
        other => other,
    }
}
