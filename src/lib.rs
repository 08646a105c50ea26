//! Resource Provider SDK
//!
//! This crate provides the property value model, the wire codec, and the
//! protocol adapter used to build resource providers and to talk to them
//! over gRPC.
//!
//! # Overview
//!
//! The SDK provides:
//!
//! - **Property values**: [`PropertyValue`] with secret, unknown and output
//!   markers, folding and deep equality, path traversal and walking
//! - **Typed extraction**: [`decode`](fn@decode) to plain JSON and [`unmarshal`](fn@unmarshal) onto
//!   serde types with unknown/secret/dependency tracking
//! - **Wire codec**: [`marshal_properties`] and [`unmarshal_properties`]
//!   between property maps and `Struct` messages, gated by [`MarshalOptions`]
//! - **Provider trait**: [`Provider`], the framework-level interface
//! - **Protocol adapter**: [`RpcProvider`], a [`Provider`] backed by a
//!   [`ResourceProvider`] gRPC service
//! - **Configuration**: [`ConfigEncoding`] for JSON-encoded config values
//! - **Error types**: [`ProviderError`] with gRPC status mapping
//! - **Logging**: Integration with `tracing` for structured logging
//!
//! # Quick Start
//!
//! ```ignore
//! use resource_provider_sdk::{
//!     unmarshal, CreateRequest, PropertyMap, Provider, RpcProvider, UnmarshalOptions,
//! };
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Default)]
//! #[serde(rename_all = "camelCase", default)]
//! struct BucketArgs {
//!     bucket_name: String,
//!     versioned: bool,
//! }
//!
//! async fn create(server: impl resource_provider_sdk::ResourceProvider, props: PropertyMap) {
//!     let (args, result) = unmarshal::<BucketArgs>(&props, UnmarshalOptions::default())?;
//!     if result.contains_secrets {
//!         tracing::debug!("bucket args contain secrets");
//!     }
//!
//!     let provider = RpcProvider::new(server);
//!     let resp = provider
//!         .create(CreateRequest { properties: props, ..Default::default() })
//!         .await?;
//! }
//! ```
//!
//! # Capabilities
//!
//! [`RpcProvider::configure`](Provider::configure) records what the remote
//! provider accepts. Until then, secrets and resource references are lowered
//! to plain values on the way out, and previews are forwarded as-is. After
//! configuration:
//!
//! - **accept_secrets**: secret markers are sent instead of being dropped
//! - **accept_resources**: resource references are sent instead of their id
//! - **accept_outputs**: output markers are sent to `Construct` and `Call`
//!   instead of dependency side channels
//! - **supports_preview**: otherwise previews of `Create`, `Update`,
//!   `Construct` and `Call` are answered locally

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bind;
pub mod codec;
pub mod config;
pub mod decode;
pub mod error;
pub mod logging;
pub mod property;
pub mod protocol;
pub mod provider;
pub mod rpc;
pub mod types;
pub mod unmarshal;

#[allow(missing_docs)]
#[allow(clippy::all)]
pub mod generated;

// Re-export main types at crate root
pub use codec::{
    marshal_properties, marshal_value, unmarshal_properties, unmarshal_value, MarshalOptions,
};
pub use config::{ConfigEncoding, ConfigType};
pub use decode::{decode, decode_value};
pub use error::{ContainsUnknownsError, ProviderError};
pub use logging::{init_logging, init_logging_with_default, try_init_logging};
pub use property::{
    deep_equals, deep_equals_with, is_computed, is_secret, make_computed, make_known,
    make_public, make_secret, traverse, walk, Archive, Asset, EqualityOptions, Output,
    PathSegment, PropertyMap, PropertyPath, PropertyValue, ResourceReference, Urn, WalkState,
};
pub use provider::Provider;
pub use rpc::{ResourceProvider, RpcOptions, RpcProvider};
pub use types::{
    CallRequest, CallResponse, Capabilities, CheckFailure, CheckRequest, CheckResponse,
    ConfigureRequest, ConstructOptions, ConstructRequest, ConstructResponse, CreateRequest,
    CreateResponse, DeleteRequest, DiffKind, DiffRequest, DiffResponse, GetSchemaRequest,
    GetSchemaResponse, InvokeRequest, InvokeResponse, PropertyDiff, ReadRequest, ReadResponse,
    UpdateRequest, UpdateResponse, FORCE_NO_DETAILED_DIFF_KEY,
};
pub use unmarshal::{
    extract, unmarshal, ExtractOptions, ExtractResult, UnmarshalOptions, UnmarshalResult,
};

// Re-export async_trait for convenience
pub use async_trait::async_trait;

// Re-export commonly used external types
pub use serde_json;
pub use tonic;
pub use tracing;
