//! The framework-level provider trait.

use crate::error::ProviderError;
use crate::types::{
    CallRequest, CallResponse, CheckRequest, CheckResponse, ConfigureRequest, ConstructRequest,
    ConstructResponse, CreateRequest, CreateResponse, DeleteRequest, DiffRequest, DiffResponse,
    GetSchemaRequest, GetSchemaResponse, InvokeRequest, InvokeResponse, ReadRequest, ReadResponse,
    UpdateRequest, UpdateResponse,
};

fn not_implemented(method: &str) -> ProviderError {
    ProviderError::Unimplemented(format!("{} is not implemented", method))
}

/// A resource provider.
///
/// Every method has a default that fails with
/// [`ProviderError::Unimplemented`], so implementations only override what
/// they support.
///
/// # Example
///
/// ```ignore
/// use resource_provider_sdk::{Provider, ProviderError, GetSchemaRequest, GetSchemaResponse};
///
/// struct MyProvider;
///
/// #[async_trait::async_trait]
/// impl Provider for MyProvider {
///     async fn get_schema(
///         &self,
///         _req: GetSchemaRequest,
///     ) -> Result<GetSchemaResponse, ProviderError> {
///         Ok(GetSchemaResponse { schema: "{}".to_string() })
///     }
/// }
/// ```
#[async_trait::async_trait]
pub trait Provider: Send + Sync {
    // =========================================================================
    // Provider Lifecycle
    // =========================================================================

    /// Return the provider schema.
    async fn get_schema(&self, req: GetSchemaRequest) -> Result<GetSchemaResponse, ProviderError> {
        let _ = req;
        Err(not_implemented("GetSchema"))
    }

    /// Cancel outstanding operations.
    async fn cancel(&self) -> Result<(), ProviderError> {
        Err(not_implemented("Cancel"))
    }

    /// Validate provider configuration.
    async fn check_config(&self, req: CheckRequest) -> Result<CheckResponse, ProviderError> {
        let _ = req;
        Err(not_implemented("CheckConfig"))
    }

    /// Diff provider configuration.
    async fn diff_config(&self, req: DiffRequest) -> Result<DiffResponse, ProviderError> {
        let _ = req;
        Err(not_implemented("DiffConfig"))
    }

    /// Configure the provider.
    async fn configure(&self, req: ConfigureRequest) -> Result<(), ProviderError> {
        let _ = req;
        Err(not_implemented("Configure"))
    }

    // =========================================================================
    // Functions
    // =========================================================================

    /// Call a provider function.
    async fn invoke(&self, req: InvokeRequest) -> Result<InvokeResponse, ProviderError> {
        let _ = req;
        Err(not_implemented("Invoke"))
    }

    // =========================================================================
    // Resource Operations
    // =========================================================================

    /// Validate resource inputs.
    async fn check(&self, req: CheckRequest) -> Result<CheckResponse, ProviderError> {
        let _ = req;
        Err(not_implemented("Check"))
    }

    /// Diff a resource.
    async fn diff(&self, req: DiffRequest) -> Result<DiffResponse, ProviderError> {
        let _ = req;
        Err(not_implemented("Diff"))
    }

    /// Create a resource.
    async fn create(&self, req: CreateRequest) -> Result<CreateResponse, ProviderError> {
        let _ = req;
        Err(not_implemented("Create"))
    }

    /// Read a resource.
    async fn read(&self, req: ReadRequest) -> Result<ReadResponse, ProviderError> {
        let _ = req;
        Err(not_implemented("Read"))
    }

    /// Update a resource.
    async fn update(&self, req: UpdateRequest) -> Result<UpdateResponse, ProviderError> {
        let _ = req;
        Err(not_implemented("Update"))
    }

    /// Delete a resource.
    async fn delete(&self, req: DeleteRequest) -> Result<(), ProviderError> {
        let _ = req;
        Err(not_implemented("Delete"))
    }

    // =========================================================================
    // Components
    // =========================================================================

    /// Construct a component.
    async fn construct(&self, req: ConstructRequest) -> Result<ConstructResponse, ProviderError> {
        let _ = req;
        Err(not_implemented("Construct"))
    }

    /// Call a component method.
    async fn call(&self, req: CallRequest) -> Result<CallResponse, ProviderError> {
        let _ = req;
        Err(not_implemented("Call"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Empty;

    impl Provider for Empty {}

    #[tokio::test]
    async fn test_defaults_are_unimplemented() {
        let p = Empty;
        let err = p.get_schema(GetSchemaRequest::default()).await.unwrap_err();
        assert_eq!(err.to_string(), "Unimplemented: GetSchema is not implemented");
        assert_eq!(err.code(), tonic::Code::Unimplemented);

        let err = p.cancel().await.unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Unimplemented(ref m) if m == "Cancel is not implemented"
        ));

        let err = p.construct(ConstructRequest::default()).await.unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Unimplemented(ref m) if m == "Construct is not implemented"
        ));
    }
}
