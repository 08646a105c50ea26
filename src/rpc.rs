//! Adapter that exposes a raw [`ResourceProvider`] gRPC service as a
//! [`Provider`].
//!
//! The adapter keeps one piece of session state: the [`Capabilities`]
//! returned by the wrapped service's `Configure`. It is written once when
//! `Configure` succeeds and read by every other method to decide which
//! markers the service can receive. Until then all capabilities are assumed
//! to be false.
//!
//! Values coming back from the service are always unmarshaled losslessly.

use std::collections::BTreeMap;

use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::codec::{marshal_properties, unmarshal_properties, MarshalOptions};
use crate::error::ProviderError;
use crate::generated::{self, diff_response::DiffChanges, property_diff, Struct};
use crate::property::{merge_property_dependencies, PropertyMap};
use crate::protocol::{check_failures, dependencies_from_side_channel, dependency_side_channel};
use crate::provider::Provider;
use crate::types::{
    CallRequest, CallResponse, Capabilities, CheckRequest, CheckResponse, ConfigureRequest,
    ConstructRequest, ConstructResponse, CreateRequest, CreateResponse, DeleteRequest, DiffKind,
    DiffRequest, DiffResponse, GetSchemaRequest, GetSchemaResponse, InvokeRequest, InvokeResponse,
    PropertyDiff, ReadRequest, ReadResponse, UpdateRequest, UpdateResponse,
    FORCE_NO_DETAILED_DIFF_KEY,
};

pub use crate::generated::resource_provider_server::ResourceProvider;

/// Environment variable that turns on payload logging.
pub const DEBUG_GRPC_ENV: &str = "PROVIDER_DEBUG_GRPC";

/// Options for [`RpcProvider`].
#[derive(Debug, Clone, Default)]
pub struct RpcOptions {
    /// Log every wire request and response at debug level.
    pub log_payloads: bool,
}

impl RpcOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether payloads are logged.
    pub fn with_log_payloads(mut self, enabled: bool) -> Self {
        self.log_payloads = enabled;
        self
    }

    /// Read options from the environment.
    ///
    /// Payload logging is on when `PROVIDER_DEBUG_GRPC` is set to anything
    /// other than an empty string, `0` or `false`.
    pub fn from_env() -> Self {
        let log_payloads = std::env::var(DEBUG_GRPC_ENV)
            .map(|v| !matches!(v.trim(), "" | "0" | "false"))
            .unwrap_or(false);
        Self { log_payloads }
    }
}

/// A [`Provider`] backed by a raw [`ResourceProvider`] service.
pub struct RpcProvider<S> {
    server: S,
    options: RpcOptions,
    capabilities: RwLock<Option<Capabilities>>,
}

impl<S: ResourceProvider> RpcProvider<S> {
    /// Wrap `server` with options read from the environment.
    pub fn new(server: S) -> Self {
        Self::with_options(server, RpcOptions::from_env())
    }

    /// Wrap `server` with explicit options.
    pub fn with_options(server: S, options: RpcOptions) -> Self {
        Self {
            server,
            options,
            capabilities: RwLock::new(None),
        }
    }

    /// The wrapped service.
    pub fn inner(&self) -> &S {
        &self.server
    }

    /// The negotiated capabilities, or `None` before `Configure` succeeds.
    pub async fn capabilities(&self) -> Option<Capabilities> {
        *self.capabilities.read().await
    }

    async fn marshal_options(&self) -> MarshalOptions {
        MarshalOptions::for_capabilities(&self.capabilities().await.unwrap_or_default())
    }

    /// Whether a dry run should be answered locally.
    async fn skip_preview(&self, dry_run: bool) -> bool {
        dry_run && matches!(self.capabilities().await, Some(caps) if !caps.supports_preview)
    }

    fn log_payload<T: std::fmt::Debug>(&self, label: &str, payload: &T) {
        if self.options.log_payloads {
            debug!(payload = ?payload, "{}", label);
        }
    }
}

// ============================================================================
// Conversion helpers
// ============================================================================

fn marshal_all<const N: usize>(
    maps: [&PropertyMap; N],
    opts: &MarshalOptions,
) -> Result<[Struct; N], ProviderError> {
    let mut errors = Vec::new();
    let structs = maps.map(|m| {
        marshal_properties(m, opts).unwrap_or_else(|e| {
            errors.push(e);
            Struct::default()
        })
    });
    match ProviderError::join(errors) {
        Some(err) => Err(err),
        None => Ok(structs),
    }
}

fn rpc_to_property(s: &Struct) -> Result<PropertyMap, ProviderError> {
    unmarshal_properties(s, &MarshalOptions::lossless())
}

fn unmarshal_all<const N: usize>(
    structs: [Option<&Struct>; N],
) -> Result<[PropertyMap; N], ProviderError> {
    let mut errors = Vec::new();
    let maps = structs.map(|s| match s {
        Some(s) => rpc_to_property(s).unwrap_or_else(|e| {
            errors.push(e);
            PropertyMap::new()
        }),
        None => PropertyMap::new(),
    });
    match ProviderError::join(errors) {
        Some(err) => Err(err),
        None => Ok(maps),
    }
}

fn check_request(
    req: &CheckRequest,
    opts: &MarshalOptions,
) -> Result<generated::CheckRequest, ProviderError> {
    let [olds, news] = marshal_all([&req.state, &req.inputs], opts)?;
    Ok(generated::CheckRequest {
        urn: req.urn.to_string(),
        olds: Some(olds),
        news: Some(news),
        random_seed: req.random_seed.clone(),
        name: req.urn.name().to_string(),
        r#type: req.urn.type_token().to_string(),
    })
}

fn check_response(resp: generated::CheckResponse) -> Result<CheckResponse, ProviderError> {
    let [inputs] = unmarshal_all([resp.inputs.as_ref()])?;
    Ok(CheckResponse {
        inputs,
        failures: check_failures(resp.failures),
    })
}

fn diff_request(
    req: &DiffRequest,
    opts: &MarshalOptions,
) -> Result<generated::DiffRequest, ProviderError> {
    let [olds, news, old_inputs] = marshal_all([&req.state, &req.inputs, &req.old_inputs], opts)?;
    Ok(generated::DiffRequest {
        id: req.id.clone(),
        urn: req.urn.to_string(),
        olds: Some(olds),
        news: Some(news),
        ignore_changes: req.ignore_changes.clone(),
        old_inputs: Some(old_inputs),
        name: req.urn.name().to_string(),
        r#type: req.urn.type_token().to_string(),
    })
}

/// Convert a wire diff, synthesizing a detailed diff from the summary lists
/// when the service did not compute one.
///
/// A synthesized diff is never empty: with no changes listed it holds a
/// single [`FORCE_NO_DETAILED_DIFF_KEY`] entry.
fn diff_response(resp: generated::DiffResponse) -> DiffResponse {
    let mut detailed_diff = BTreeMap::new();
    if resp.has_detailed_diff {
        for (name, diff) in resp.detailed_diff {
            match property_diff::Kind::try_from(diff.kind) {
                Ok(kind) => {
                    detailed_diff.insert(
                        name,
                        PropertyDiff {
                            kind: DiffKind::from(kind),
                            input_diff: diff.input_diff,
                        },
                    );
                },
                Err(_) => warn!(property = %name, kind = diff.kind, "Ignoring unknown diff kind"),
            }
        }
    } else {
        for name in resp.diffs {
            detailed_diff.insert(name, PropertyDiff::new(DiffKind::Update));
        }
        for name in resp.replaces {
            detailed_diff.insert(name, PropertyDiff::new(DiffKind::UpdateReplace));
        }
        if detailed_diff.is_empty() {
            detailed_diff.insert(
                FORCE_NO_DETAILED_DIFF_KEY.to_string(),
                PropertyDiff::new(DiffKind::Stable),
            );
        }
    }

    DiffResponse {
        delete_before_replace: resp.delete_before_replace,
        has_changes: resp.changes == DiffChanges::DiffSome as i32,
        detailed_diff,
    }
}

// ============================================================================
// Provider implementation
// ============================================================================

#[async_trait::async_trait]
impl<S: ResourceProvider> Provider for RpcProvider<S> {
    #[instrument(skip(self, req), name = "rpc.get_schema", fields(version = req.version))]
    async fn get_schema(&self, req: GetSchemaRequest) -> Result<GetSchemaResponse, ProviderError> {
        if req.version > i64::from(i32::MAX) {
            return Err(ProviderError::SchemaVersionOverflow(req.version));
        }
        if req.version < i64::from(i32::MIN) {
            return Err(ProviderError::SchemaVersionUnderflow(req.version));
        }
        let rpc_req = generated::GetSchemaRequest {
            version: req.version as i32,
        };
        debug!("GetSchema called");
        let resp = self
            .server
            .get_schema(tonic::Request::new(rpc_req))
            .await?
            .into_inner();
        Ok(GetSchemaResponse {
            schema: resp.schema,
        })
    }

    #[instrument(skip(self), name = "rpc.cancel")]
    async fn cancel(&self) -> Result<(), ProviderError> {
        match self
            .server
            .cancel(tonic::Request::new(generated::Empty {}))
            .await
        {
            Ok(_) => Ok(()),
            Err(status) if status.code() == tonic::Code::Unimplemented => {
                warn!("Cancel is not implemented by the wrapped provider");
                Ok(())
            },
            Err(status) => Err(status.into()),
        }
    }

    #[instrument(skip(self, req), name = "rpc.check_config", fields(urn = %req.urn))]
    async fn check_config(&self, req: CheckRequest) -> Result<CheckResponse, ProviderError> {
        let rpc_req = check_request(&req, &self.marshal_options().await)?;
        self.log_payload("CheckConfig request", &rpc_req);
        let resp = self
            .server
            .check_config(tonic::Request::new(rpc_req))
            .await?
            .into_inner();
        self.log_payload("CheckConfig response", &resp);
        check_response(resp)
    }

    #[instrument(skip(self, req), name = "rpc.diff_config", fields(urn = %req.urn))]
    async fn diff_config(&self, req: DiffRequest) -> Result<DiffResponse, ProviderError> {
        let rpc_req = diff_request(&req, &self.marshal_options().await)?;
        self.log_payload("DiffConfig request", &rpc_req);
        let resp = self
            .server
            .diff_config(tonic::Request::new(rpc_req))
            .await?
            .into_inner();
        self.log_payload("DiffConfig response", &resp);
        Ok(diff_response(resp))
    }

    #[instrument(skip(self, req), name = "rpc.configure")]
    async fn configure(&self, req: ConfigureRequest) -> Result<(), ProviderError> {
        let args = marshal_properties(&req.args, &self.marshal_options().await)?;
        let rpc_req = generated::ConfigureRequest {
            variables: req.variables,
            args: Some(args),
            accept_secrets: true,
            accept_resources: true,
        };
        self.log_payload("Configure request", &rpc_req);
        let resp = self
            .server
            .configure(tonic::Request::new(rpc_req))
            .await?
            .into_inner();

        let caps = Capabilities::from(&resp);
        info!(
            accept_secrets = caps.accept_secrets,
            accept_resources = caps.accept_resources,
            accept_outputs = caps.accept_outputs,
            supports_preview = caps.supports_preview,
            "Configure completed"
        );
        *self.capabilities.write().await = Some(caps);
        Ok(())
    }

    #[instrument(skip(self, req), name = "rpc.invoke", fields(token = %req.token))]
    async fn invoke(&self, req: InvokeRequest) -> Result<InvokeResponse, ProviderError> {
        let args = marshal_properties(&req.args, &self.marshal_options().await)?;
        let rpc_req = generated::InvokeRequest {
            tok: req.token,
            args: Some(args),
        };
        self.log_payload("Invoke request", &rpc_req);
        let resp = self
            .server
            .invoke(tonic::Request::new(rpc_req))
            .await?
            .into_inner();
        self.log_payload("Invoke response", &resp);
        let [return_values] = unmarshal_all([resp.r#return.as_ref()])?;
        Ok(InvokeResponse {
            return_values,
            failures: check_failures(resp.failures),
        })
    }

    #[instrument(skip(self, req), name = "rpc.check", fields(urn = %req.urn))]
    async fn check(&self, req: CheckRequest) -> Result<CheckResponse, ProviderError> {
        let rpc_req = check_request(&req, &self.marshal_options().await)?;
        self.log_payload("Check request", &rpc_req);
        let resp = self
            .server
            .check(tonic::Request::new(rpc_req))
            .await?
            .into_inner();
        self.log_payload("Check response", &resp);
        check_response(resp)
    }

    #[instrument(skip(self, req), name = "rpc.diff", fields(urn = %req.urn))]
    async fn diff(&self, req: DiffRequest) -> Result<DiffResponse, ProviderError> {
        let rpc_req = diff_request(&req, &self.marshal_options().await)?;
        self.log_payload("Diff request", &rpc_req);
        let resp = self
            .server
            .diff(tonic::Request::new(rpc_req))
            .await?
            .into_inner();
        self.log_payload("Diff response", &resp);
        Ok(diff_response(resp))
    }

    #[instrument(
        skip(self, req),
        name = "rpc.create",
        fields(urn = %req.urn, dry_run = req.dry_run)
    )]
    async fn create(&self, req: CreateRequest) -> Result<CreateResponse, ProviderError> {
        if self.skip_preview(req.dry_run).await {
            info!("Skipping Create during preview");
            return Ok(CreateResponse::default());
        }
        let properties = marshal_properties(&req.properties, &self.marshal_options().await)?;
        let rpc_req = generated::CreateRequest {
            urn: req.urn.to_string(),
            properties: Some(properties),
            timeout: req.timeout,
            preview: req.dry_run,
            name: req.urn.name().to_string(),
            r#type: req.urn.type_token().to_string(),
        };
        self.log_payload("Create request", &rpc_req);
        let resp = self
            .server
            .create(tonic::Request::new(rpc_req))
            .await?
            .into_inner();
        self.log_payload("Create response", &resp);
        let [properties] = unmarshal_all([resp.properties.as_ref()])?;
        Ok(CreateResponse {
            id: resp.id,
            properties,
        })
    }

    #[instrument(skip(self, req), name = "rpc.read", fields(urn = %req.urn, id = %req.id))]
    async fn read(&self, req: ReadRequest) -> Result<ReadResponse, ProviderError> {
        let [properties, inputs] =
            marshal_all([&req.properties, &req.inputs], &self.marshal_options().await)?;
        let rpc_req = generated::ReadRequest {
            id: req.id.clone(),
            urn: req.urn.to_string(),
            properties: Some(properties),
            inputs: Some(inputs),
            name: req.urn.name().to_string(),
            r#type: req.urn.type_token().to_string(),
        };
        self.log_payload("Read request", &rpc_req);
        let resp = self
            .server
            .read(tonic::Request::new(rpc_req))
            .await?
            .into_inner();
        self.log_payload("Read response", &resp);
        let [properties, inputs] = unmarshal_all([resp.properties.as_ref(), resp.inputs.as_ref()])?;
        Ok(ReadResponse {
            id: resp.id,
            properties,
            inputs,
        })
    }

    #[instrument(
        skip(self, req),
        name = "rpc.update",
        fields(urn = %req.urn, dry_run = req.dry_run)
    )]
    async fn update(&self, req: UpdateRequest) -> Result<UpdateResponse, ProviderError> {
        if self.skip_preview(req.dry_run).await {
            info!("Skipping Update during preview");
            return Ok(UpdateResponse::default());
        }
        let [olds, news, old_inputs] = marshal_all(
            [&req.state, &req.inputs, &req.old_inputs],
            &self.marshal_options().await,
        )?;
        let rpc_req = generated::UpdateRequest {
            id: req.id.clone(),
            urn: req.urn.to_string(),
            olds: Some(olds),
            news: Some(news),
            timeout: req.timeout,
            ignore_changes: req.ignore_changes.clone(),
            preview: req.dry_run,
            old_inputs: Some(old_inputs),
            name: req.urn.name().to_string(),
            r#type: req.urn.type_token().to_string(),
        };
        self.log_payload("Update request", &rpc_req);
        let resp = self
            .server
            .update(tonic::Request::new(rpc_req))
            .await?
            .into_inner();
        self.log_payload("Update response", &resp);
        let [properties] = unmarshal_all([resp.properties.as_ref()])?;
        Ok(UpdateResponse { properties })
    }

    #[instrument(skip(self, req), name = "rpc.delete", fields(urn = %req.urn, id = %req.id))]
    async fn delete(&self, req: DeleteRequest) -> Result<(), ProviderError> {
        let [properties, old_inputs] =
            marshal_all([&req.properties, &req.old_inputs], &self.marshal_options().await)?;
        let rpc_req = generated::DeleteRequest {
            id: req.id.clone(),
            urn: req.urn.to_string(),
            properties: Some(properties),
            timeout: req.timeout,
            old_inputs: Some(old_inputs),
            name: req.urn.name().to_string(),
            r#type: req.urn.type_token().to_string(),
        };
        self.log_payload("Delete request", &rpc_req);
        self.server.delete(tonic::Request::new(rpc_req)).await?;
        Ok(())
    }

    #[instrument(
        skip(self, req),
        name = "rpc.construct",
        fields(urn = %req.urn, dry_run = req.dry_run)
    )]
    async fn construct(&self, req: ConstructRequest) -> Result<ConstructResponse, ProviderError> {
        if self.skip_preview(req.dry_run).await {
            info!("Skipping Construct during preview");
            return Ok(ConstructResponse::default());
        }
        let caps = self.capabilities().await.unwrap_or_default();
        let opts = MarshalOptions::for_capabilities(&caps);

        let mut rpc_req = req.to_rpc(|m| marshal_properties(m, &opts))?;
        rpc_req.accepts_output_values = true;
        if !caps.accept_outputs {
            rpc_req.input_dependencies = dependency_side_channel(&req.inputs);
            debug!(
                properties = rpc_req.input_dependencies.len(),
                "Sending input dependencies out of band"
            );
        }
        self.log_payload("Construct request", &rpc_req);

        let resp = self
            .server
            .construct(tonic::Request::new(rpc_req))
            .await?
            .into_inner();
        self.log_payload("Construct response", &resp);

        let mut out = ConstructResponse::from_rpc(&resp, rpc_to_property)?;
        let state_deps = dependencies_from_side_channel(&resp.state_dependencies);
        out.state = merge_property_dependencies(out.state, &state_deps);
        Ok(out)
    }

    #[instrument(
        skip(self, req),
        name = "rpc.call",
        fields(token = %req.token, dry_run = req.dry_run)
    )]
    async fn call(&self, req: CallRequest) -> Result<CallResponse, ProviderError> {
        if self.skip_preview(req.dry_run).await {
            info!("Skipping Call during preview");
            return Ok(CallResponse::default());
        }
        let caps = self.capabilities().await.unwrap_or_default();
        let opts = MarshalOptions::for_capabilities(&caps);

        let mut rpc_req = req.to_rpc(|m| marshal_properties(m, &opts))?;
        if !caps.accept_outputs {
            rpc_req.arg_dependencies = dependency_side_channel(&req.args);
            debug!(
                arguments = rpc_req.arg_dependencies.len(),
                "Sending argument dependencies out of band"
            );
        }
        self.log_payload("Call request", &rpc_req);

        let resp = self
            .server
            .call(tonic::Request::new(rpc_req))
            .await?
            .into_inner();
        self.log_payload("Call response", &resp);

        let mut out = CallResponse::from_rpc(&resp, rpc_to_property)?;
        let return_deps = dependencies_from_side_channel(&resp.return_dependencies);
        out.return_values = merge_property_dependencies(out.return_values, &return_deps);
        Ok(out)
    }
}
