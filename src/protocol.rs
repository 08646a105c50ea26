//! Conversions between the framework types and the wire messages.
//!
//! The conversions that carry property maps take the marshal or unmarshal
//! function to use, so the caller decides which markers survive.

use std::collections::BTreeMap;

use crate::error::ProviderError;
use crate::generated::{self, Struct};
use crate::property::{get_property_dependencies, PropertyMap, Urn};
use crate::types::{CallRequest, CallResponse, CheckFailure, ConstructRequest, ConstructResponse};

/// Wire dependency lists keyed by property name.
pub type DependencyMap = BTreeMap<String, generated::PropertyDependencies>;

impl From<generated::CheckFailure> for CheckFailure {
    fn from(proto: generated::CheckFailure) -> Self {
        Self {
            property: proto.property,
            reason: proto.reason,
        }
    }
}

impl From<CheckFailure> for generated::CheckFailure {
    fn from(failure: CheckFailure) -> Self {
        Self {
            property: failure.property,
            reason: failure.reason,
        }
    }
}

/// Convert wire check failures.
pub fn check_failures(failures: Vec<generated::CheckFailure>) -> Vec<CheckFailure> {
    failures.into_iter().map(CheckFailure::from).collect()
}

fn urn_strings(urns: &[Urn]) -> Vec<String> {
    urns.iter().map(|u| u.as_str().to_string()).collect()
}

/// The dependencies of every property that has any, in wire form.
///
/// Used to send dependencies alongside the values when the peer cannot
/// receive them inside output markers.
pub fn dependency_side_channel(props: &PropertyMap) -> DependencyMap {
    props
        .iter()
        .filter_map(|(name, v)| {
            let urns = get_property_dependencies(v);
            if urns.is_empty() {
                return None;
            }
            Some((
                name.clone(),
                generated::PropertyDependencies {
                    urns: urn_strings(&urns),
                },
            ))
        })
        .collect()
}

/// Parse wire dependency lists.
pub fn dependencies_from_side_channel(deps: &DependencyMap) -> BTreeMap<String, Vec<Urn>> {
    deps.iter()
        .map(|(name, deps)| {
            let urns = deps.urns.iter().map(|u| Urn::new(u.as_str())).collect();
            (name.clone(), urns)
        })
        .collect()
}

impl ConstructRequest {
    /// Build the wire request.
    ///
    /// The dependency side channel is left empty and output values are not
    /// advertised; the caller sets both.
    pub fn to_rpc<F>(&self, marshal: F) -> Result<generated::ConstructRequest, ProviderError>
    where
        F: Fn(&PropertyMap) -> Result<Struct, ProviderError>,
    {
        let opts = &self.options;
        Ok(generated::ConstructRequest {
            project: self.urn.project().to_string(),
            stack: self.urn.stack().to_string(),
            config: self.config.clone(),
            dry_run: self.dry_run,
            parallel: self.parallel,
            monitor_endpoint: self.monitor_endpoint.clone(),
            r#type: self.urn.type_token().to_string(),
            name: self.urn.name().to_string(),
            parent: self
                .parent
                .as_ref()
                .map(|p| p.as_str().to_string())
                .unwrap_or_default(),
            inputs: Some(marshal(&self.inputs)?),
            input_dependencies: BTreeMap::new(),
            providers: opts.providers.clone(),
            dependencies: urn_strings(&opts.dependencies),
            protect: opts.protect,
            aliases: urn_strings(&opts.aliases),
            accepts_output_values: false,
            additional_secret_outputs: opts.additional_secret_outputs.clone(),
            delete_before_replace: opts.delete_before_replace,
            ignore_changes: opts.ignore_changes.clone(),
            replace_on_changes: opts.replace_on_changes.clone(),
            retain_on_delete: opts.retain_on_delete,
            deleted_with: opts
                .deleted_with
                .as_ref()
                .map(|u| u.as_str().to_string())
                .unwrap_or_default(),
        })
    }
}

impl ConstructResponse {
    /// Read the wire response. Missing state becomes an empty map.
    pub fn from_rpc<F>(
        resp: &generated::ConstructResponse,
        unmarshal: F,
    ) -> Result<Self, ProviderError>
    where
        F: Fn(&Struct) -> Result<PropertyMap, ProviderError>,
    {
        let state = match &resp.state {
            Some(s) => unmarshal(s)?,
            None => PropertyMap::new(),
        };
        Ok(Self {
            urn: Urn::new(resp.urn.as_str()),
            state,
        })
    }
}

impl CallRequest {
    /// Build the wire request.
    ///
    /// The dependency side channel is left empty and output values are not
    /// advertised; the caller sets both.
    pub fn to_rpc<F>(&self, marshal: F) -> Result<generated::CallRequest, ProviderError>
    where
        F: Fn(&PropertyMap) -> Result<Struct, ProviderError>,
    {
        Ok(generated::CallRequest {
            tok: self.token.clone(),
            args: Some(marshal(&self.args)?),
            arg_dependencies: BTreeMap::new(),
            project: self.project.clone(),
            stack: self.stack.clone(),
            config: self.config.clone(),
            dry_run: self.dry_run,
            parallel: self.parallel,
            monitor_endpoint: self.monitor_endpoint.clone(),
            accepts_output_values: false,
        })
    }
}

impl CallResponse {
    /// Read the wire response. Missing return values become an empty map.
    pub fn from_rpc<F>(resp: &generated::CallResponse, unmarshal: F) -> Result<Self, ProviderError>
    where
        F: Fn(&Struct) -> Result<PropertyMap, ProviderError>,
    {
        let return_values = match &resp.r#return {
            Some(s) => unmarshal(s)?,
            None => PropertyMap::new(),
        };
        Ok(Self {
            return_values,
            failures: check_failures(resp.failures.clone()),
        })
    }
}
