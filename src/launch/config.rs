//! Launch configuration model and its defaulting rules
//!
//! A `LaunchRequest` mirrors one entry of a launch.json `configurations`
//! array. Properties the launcher does not interpret itself (`rpc`,
//! `forkUrl`, `constructorArgs`, ...) are kept in `extra` and reach the
//! adapter unchanged.

use crate::host::DebugConfigurationProvider;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;
use tracing::debug;

/// Debugger type stamped on every resolved configuration
pub const DEBUG_TYPE: &str = "soldb";

/// Port used when a configuration does not name one
pub const DEFAULT_PORT: u16 = 4711;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    Launch,
    Attach,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchRequest {
    #[serde(rename = "type", default)]
    pub debug_type: String,
    #[serde(
        default,
        deserialize_with = "deserialize_request_kind",
        skip_serializing_if = "Option::is_none"
    )]
    pub request: Option<RequestKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
    #[serde(default)]
    pub function_args: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LaunchRequest {
    /// Request for debugging a single contract function
    pub fn for_function(
        function: impl Into<String>,
        function_args: Vec<String>,
        contract_file: Option<PathBuf>,
    ) -> Self {
        let function = function.into();
        Self {
            name: Some(format!("Debug {}", function)),
            function: Some(function),
            function_args,
            contract_file,
            ..Default::default()
        }
    }
}

// launch.json files in the wild carry `"request": ""`; treat it as unset.
fn deserialize_request_kind<'de, D>(deserializer: D) -> Result<Option<RequestKind>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some("launch") => Ok(Some(RequestKind::Launch)),
        Some("attach") => Ok(Some(RequestKind::Attach)),
        Some(other) => Err(serde::de::Error::unknown_variant(
            other,
            &["launch", "attach"],
        )),
    }
}

/// Fills in the fields every soldb session needs
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionConfigResolver;

impl SessionConfigResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve(&self, mut partial: LaunchRequest) -> LaunchRequest {
        // Always overwritten: a foreign type would route the session to another adapter.
        partial.debug_type = DEBUG_TYPE.to_string();

        if partial.request.is_none() {
            partial.request = Some(RequestKind::Launch);
        }

        if partial.port.unwrap_or(0) == 0 {
            partial.port = Some(DEFAULT_PORT);
        }

        debug!(
            "Resolved debug configuration: type={} request={:?} port={:?} function={:?}",
            partial.debug_type, partial.request, partial.port, partial.function
        );

        partial
    }
}

impl DebugConfigurationProvider for SessionConfigResolver {
    fn resolve_debug_configuration(&self, partial: LaunchRequest) -> LaunchRequest {
        self.resolve(partial)
    }
}
