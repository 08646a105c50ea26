//! Request and response types for provider implementations.
//!
//! These carry rich [`PropertyMap`] values instead of the raw protobuf
//! structs. See [`crate::protocol`] for the conversions to and from the wire.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::generated;
use crate::property::{PropertyMap, Urn};

/// Key of the detailed diff entry that marks a diff synthesized from a
/// summary rather than computed per property.
pub const FORCE_NO_DETAILED_DIFF_KEY: &str = "__x-force-no-detailed-diff";

// ============================================================================
// Capabilities
// ============================================================================

/// What the peer said it accepts during `Configure`.
///
/// Before configuration every flag is false.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// The peer accepts secret markers.
    pub accept_secrets: bool,
    /// The peer accepts resource references.
    pub accept_resources: bool,
    /// The peer accepts output markers.
    pub accept_outputs: bool,
    /// The peer wants create/update/construct/call during previews.
    pub supports_preview: bool,
}

impl From<&generated::ConfigureResponse> for Capabilities {
    fn from(resp: &generated::ConfigureResponse) -> Self {
        Self {
            accept_secrets: resp.accept_secrets,
            accept_resources: resp.accept_resources,
            accept_outputs: resp.accept_outputs,
            supports_preview: resp.supports_preview,
        }
    }
}

// ============================================================================
// Schema
// ============================================================================

/// Request for the provider schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetSchemaRequest {
    /// The schema version requested.
    pub version: i64,
}

/// The provider schema as a JSON document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetSchemaResponse {
    /// The schema document.
    pub schema: String,
}

// ============================================================================
// Check / Diff
// ============================================================================

/// A validation failure for one property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckFailure {
    /// The property that failed validation.
    pub property: String,
    /// Why it failed.
    pub reason: String,
}

impl CheckFailure {
    /// Create a new check failure.
    pub fn new(property: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            reason: reason.into(),
        }
    }
}

/// Request to validate inputs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckRequest {
    /// The resource URN.
    pub urn: Urn,
    /// The previous state.
    pub state: PropertyMap,
    /// The new inputs.
    pub inputs: PropertyMap,
    /// A seed for deterministic random values.
    pub random_seed: Vec<u8>,
}

/// Validated inputs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckResponse {
    /// The inputs to use, possibly with defaults applied.
    pub inputs: PropertyMap,
    /// Validation failures.
    pub failures: Vec<CheckFailure>,
}

/// Request to diff a resource.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiffRequest {
    /// The resource ID.
    pub id: String,
    /// The resource URN.
    pub urn: Urn,
    /// The current state.
    pub state: PropertyMap,
    /// The new inputs.
    pub inputs: PropertyMap,
    /// The inputs the state was produced from.
    pub old_inputs: PropertyMap,
    /// Property paths to treat as unchanged.
    pub ignore_changes: Vec<String>,
}

/// How a single property changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiffKind {
    /// The property was added.
    #[serde(rename = "add")]
    Add,
    /// The property was added and the resource must be replaced.
    #[serde(rename = "add&replace")]
    AddReplace,
    /// The property was removed.
    #[serde(rename = "delete")]
    Delete,
    /// The property was removed and the resource must be replaced.
    #[serde(rename = "delete&replace")]
    DeleteReplace,
    /// The property changed.
    #[serde(rename = "update")]
    Update,
    /// The property changed and the resource must be replaced.
    #[serde(rename = "update&replace")]
    UpdateReplace,
    /// The property does not change.
    #[serde(rename = "stable")]
    Stable,
}

impl DiffKind {
    /// Whether this change forces a replacement.
    pub fn is_replace(self) -> bool {
        matches!(
            self,
            DiffKind::AddReplace | DiffKind::DeleteReplace | DiffKind::UpdateReplace
        )
    }

    /// The wire kind. [`DiffKind::Stable`] has none.
    pub fn to_wire(self) -> Option<generated::property_diff::Kind> {
        use generated::property_diff::Kind;
        match self {
            DiffKind::Add => Some(Kind::Add),
            DiffKind::AddReplace => Some(Kind::AddReplace),
            DiffKind::Delete => Some(Kind::Delete),
            DiffKind::DeleteReplace => Some(Kind::DeleteReplace),
            DiffKind::Update => Some(Kind::Update),
            DiffKind::UpdateReplace => Some(Kind::UpdateReplace),
            DiffKind::Stable => None,
        }
    }
}

impl From<generated::property_diff::Kind> for DiffKind {
    fn from(kind: generated::property_diff::Kind) -> Self {
        use generated::property_diff::Kind;
        match kind {
            Kind::Add => DiffKind::Add,
            Kind::AddReplace => DiffKind::AddReplace,
            Kind::Delete => DiffKind::Delete,
            Kind::DeleteReplace => DiffKind::DeleteReplace,
            Kind::Update => DiffKind::Update,
            Kind::UpdateReplace => DiffKind::UpdateReplace,
        }
    }
}

/// The change to one property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDiff {
    /// The kind of change.
    pub kind: DiffKind,
    /// Whether the change is between old and new inputs rather than state.
    pub input_diff: bool,
}

impl PropertyDiff {
    /// A change of the given kind between state and inputs.
    pub fn new(kind: DiffKind) -> Self {
        Self {
            kind,
            input_diff: false,
        }
    }
}

/// The result of a diff.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiffResponse {
    /// The resource must be deleted before it is replaced.
    pub delete_before_replace: bool,
    /// The diff found changes.
    pub has_changes: bool,
    /// Per-property changes.
    pub detailed_diff: BTreeMap<String, PropertyDiff>,
}

// ============================================================================
// Configure / Invoke
// ============================================================================

/// Provider configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigureRequest {
    /// Configuration variables keyed by fully qualified name.
    pub variables: BTreeMap<String, String>,
    /// Configuration as properties.
    pub args: PropertyMap,
}

/// Request to call a provider function.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvokeRequest {
    /// The function token.
    pub token: String,
    /// The function arguments.
    pub args: PropertyMap,
}

/// The result of a provider function.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvokeResponse {
    /// The returned values.
    pub return_values: PropertyMap,
    /// Argument validation failures.
    pub failures: Vec<CheckFailure>,
}

// ============================================================================
// CRUD
// ============================================================================

/// Request to create a resource.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateRequest {
    /// The resource URN.
    pub urn: Urn,
    /// The checked inputs.
    pub properties: PropertyMap,
    /// Timeout in seconds.
    pub timeout: f64,
    /// Whether this is a preview.
    pub dry_run: bool,
}

/// The result of a create.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateResponse {
    /// The ID of the created resource.
    pub id: String,
    /// The resource state.
    pub properties: PropertyMap,
}

/// Request to read a resource.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadRequest {
    /// The resource ID.
    pub id: String,
    /// The resource URN.
    pub urn: Urn,
    /// The current state.
    pub properties: PropertyMap,
    /// The current inputs.
    pub inputs: PropertyMap,
}

/// The result of a read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadResponse {
    /// The resource ID, empty if the resource is gone.
    pub id: String,
    /// The live state.
    pub properties: PropertyMap,
    /// The inputs matching the live state.
    pub inputs: PropertyMap,
}

/// Request to update a resource.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateRequest {
    /// The resource ID.
    pub id: String,
    /// The resource URN.
    pub urn: Urn,
    /// The current state.
    pub state: PropertyMap,
    /// The new inputs.
    pub inputs: PropertyMap,
    /// The inputs the state was produced from.
    pub old_inputs: PropertyMap,
    /// Timeout in seconds.
    pub timeout: f64,
    /// Property paths to treat as unchanged.
    pub ignore_changes: Vec<String>,
    /// Whether this is a preview.
    pub dry_run: bool,
}

/// The result of an update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateResponse {
    /// The new resource state.
    pub properties: PropertyMap,
}

/// Request to delete a resource.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteRequest {
    /// The resource ID.
    pub id: String,
    /// The resource URN.
    pub urn: Urn,
    /// The current state.
    pub properties: PropertyMap,
    /// The inputs the state was produced from.
    pub old_inputs: PropertyMap,
    /// Timeout in seconds.
    pub timeout: f64,
}

// ============================================================================
// Construct / Call
// ============================================================================

/// Resource options passed to a component constructor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstructOptions {
    /// Provider references keyed by package.
    pub providers: BTreeMap<String, String>,
    /// Explicit dependencies.
    pub dependencies: Vec<Urn>,
    /// Whether the component is protected.
    pub protect: bool,
    /// Alias URNs.
    pub aliases: Vec<Urn>,
    /// Outputs to treat as secret.
    pub additional_secret_outputs: Vec<String>,
    /// Delete before replacing.
    pub delete_before_replace: bool,
    /// Property paths to treat as unchanged.
    pub ignore_changes: Vec<String>,
    /// Property paths whose change forces replacement.
    pub replace_on_changes: Vec<String>,
    /// Keep the resource when it is deleted from the program.
    pub retain_on_delete: bool,
    /// Delete along with this resource.
    pub deleted_with: Option<Urn>,
}

/// Request to construct a component.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstructRequest {
    /// The component URN.
    pub urn: Urn,
    /// The parent URN, if any.
    pub parent: Option<Urn>,
    /// The component inputs.
    pub inputs: PropertyMap,
    /// Stack configuration.
    pub config: BTreeMap<String, String>,
    /// Whether this is a preview.
    pub dry_run: bool,
    /// The degree of parallelism.
    pub parallel: i32,
    /// The resource monitor address.
    pub monitor_endpoint: String,
    /// Resource options.
    pub options: ConstructOptions,
}

/// The result of constructing a component.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstructResponse {
    /// The component URN.
    pub urn: Urn,
    /// The component outputs.
    pub state: PropertyMap,
}

/// Request to call a method.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallRequest {
    /// The method token.
    pub token: String,
    /// The method arguments.
    pub args: PropertyMap,
    /// The project name.
    pub project: String,
    /// The stack name.
    pub stack: String,
    /// Stack configuration.
    pub config: BTreeMap<String, String>,
    /// Whether this is a preview.
    pub dry_run: bool,
    /// The degree of parallelism.
    pub parallel: i32,
    /// The resource monitor address.
    pub monitor_endpoint: String,
}

/// The result of a method call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallResponse {
    /// The returned values.
    pub return_values: PropertyMap,
    /// Argument validation failures.
    pub failures: Vec<CheckFailure>,
}
