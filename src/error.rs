//! Error types for the resource provider SDK.

use thiserror::Error;

use crate::property::Urn;

/// Errors that can occur while converting, extracting or exchanging property values.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// A marker object carried a signature this crate does not understand.
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// Wire data did not have the expected shape.
    #[error("Malformed value: {0}")]
    Malformed(String),

    /// An asset or archive was found where assets are rejected.
    #[error("Unexpected asset: {0}")]
    AssetRejected(String),

    /// A configuration error occurred.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Decoded values could not be bound to the target type.
    #[error("Bind error: {0}")]
    Bind(String),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A schema version did not fit in a signed 32-bit integer.
    #[error("schema version overflow: {0}")]
    SchemaVersionOverflow(i64),

    /// A schema version did not fit in a signed 32-bit integer.
    #[error("schema version underflow: {0}")]
    SchemaVersionUnderflow(i64),

    /// The wrapped provider returned an error status.
    #[error("RPC error: {}", .0.message())]
    Rpc(#[from] tonic::Status),

    /// Operation not implemented.
    #[error("Unimplemented: {0}")]
    Unimplemented(String),

    /// Extracted values contained unknowns and the caller asked to reject them.
    #[error(transparent)]
    ContainsUnknowns(#[from] ContainsUnknownsError),

    /// Several independent failures from one logical operation.
    #[error("{}", join_messages(.0))]
    Multiple(Vec<ProviderError>),
}

fn join_messages(errs: &[ProviderError]) -> String {
    errs.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

impl ProviderError {
    /// Combine errors from independent steps of one operation.
    ///
    /// Returns `None` when there are no errors, the error itself when there is
    /// exactly one, and [`ProviderError::Multiple`] otherwise. Nested
    /// `Multiple` errors are flattened.
    pub fn join<I>(errors: I) -> Option<ProviderError>
    where
        I: IntoIterator<Item = ProviderError>,
    {
        let mut flat = Vec::new();
        for err in errors {
            match err {
                ProviderError::Multiple(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        match flat.len() {
            0 => None,
            1 => flat.pop(),
            _ => Some(ProviderError::Multiple(flat)),
        }
    }

    /// The gRPC status code this error maps to.
    pub fn code(&self) -> tonic::Code {
        match self {
            Self::InvalidSignature(_)
            | Self::Malformed(_)
            | Self::AssetRejected(_)
            | Self::Bind(_)
            | Self::Serialization(_)
            | Self::SchemaVersionOverflow(_)
            | Self::SchemaVersionUnderflow(_) => tonic::Code::InvalidArgument,
            Self::Configuration(_) | Self::ContainsUnknowns(_) => tonic::Code::FailedPrecondition,
            Self::Rpc(status) => status.code(),
            Self::Unimplemented(_) => tonic::Code::Unimplemented,
            Self::Multiple(errs) => errs
                .first()
                .map(ProviderError::code)
                .unwrap_or(tonic::Code::Unknown),
        }
    }
}

impl From<ProviderError> for tonic::Status {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Rpc(status) => status,
            other => tonic::Status::new(other.code(), other.to_string()),
        }
    }
}

/// Returned by extraction when unknown values were found and the caller
/// requested that unknowns be rejected.
///
/// `dependencies` lists the resources the unknown data is waiting on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("value contains unknowns (dependencies: {})", format_urns(.dependencies))]
pub struct ContainsUnknownsError {
    /// The resources the extracted information depends on.
    pub dependencies: Vec<Urn>,
}

impl ContainsUnknownsError {
    /// Create a new error for the given dependencies.
    pub fn new(dependencies: Vec<Urn>) -> Self {
        Self { dependencies }
    }
}

fn format_urns(urns: &[Urn]) -> String {
    if urns.is_empty() {
        return "none".to_string();
    }
    urns.iter()
        .map(Urn::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProviderError::InvalidSignature("abc".to_string());
        assert_eq!(format!("{}", err), "Invalid signature: abc");

        let err = ProviderError::SchemaVersionOverflow(1 << 40);
        assert_eq!(format!("{}", err), "schema version overflow: 1099511627776");

        let err = ProviderError::Configuration("invalid config".to_string());
        assert_eq!(format!("{}", err), "Configuration error: invalid config");
    }

    #[test]
    fn test_error_to_status() {
        let status: tonic::Status = ProviderError::Malformed("test".to_string()).into();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);

        let status: tonic::Status = ProviderError::Configuration("test".to_string()).into();
        assert_eq!(status.code(), tonic::Code::FailedPrecondition);

        let status: tonic::Status = ProviderError::Unimplemented("test".to_string()).into();
        assert_eq!(status.code(), tonic::Code::Unimplemented);

        let status: tonic::Status =
            ProviderError::ContainsUnknowns(ContainsUnknownsError::new(vec![])).into();
        assert_eq!(status.code(), tonic::Code::FailedPrecondition);
    }

    #[test]
    fn test_rpc_status_passes_through() {
        let err = ProviderError::from(tonic::Status::not_found("missing"));
        let status: tonic::Status = err.into();
        assert_eq!(status.code(), tonic::Code::NotFound);
        assert_eq!(status.message(), "missing");
    }

    #[test]
    fn test_join() {
        assert!(ProviderError::join(Vec::new()).is_none());

        let one = ProviderError::join(vec![ProviderError::Malformed("a".to_string())]);
        assert!(matches!(one, Some(ProviderError::Malformed(_))));

        let joined = ProviderError::join(vec![
            ProviderError::Malformed("a".to_string()),
            ProviderError::join(vec![
                ProviderError::Malformed("b".to_string()),
                ProviderError::Malformed("c".to_string()),
            ])
            .unwrap(),
        ])
        .unwrap();
        match &joined {
            ProviderError::Multiple(errs) => assert_eq!(errs.len(), 3),
            other => panic!("expected Multiple, got {other:?}"),
        }
        assert_eq!(
            joined.to_string(),
            "Malformed value: a\nMalformed value: b\nMalformed value: c"
        );
    }

    #[test]
    fn test_contains_unknowns_display() {
        let err = ContainsUnknownsError::new(vec![Urn::from(
            "urn:pulumi:test::test::kubernetes:core/v1:Namespace::ns",
        )]);
        assert_eq!(
            err.to_string(),
            "value contains unknowns (dependencies: urn:pulumi:test::test::kubernetes:core/v1:Namespace::ns)"
        );
        assert_eq!(
            ContainsUnknownsError::new(vec![]).to_string(),
            "value contains unknowns (dependencies: none)"
        );
    }
}
