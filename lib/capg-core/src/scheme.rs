//! Scheme of the object kinds the provider can decode and encode
//!
//! A scheme is built explicitly and handed to whatever needs to convert
//! provider specs, so there is no process-wide registration step.

use crate::{CoreError, Result};
use capg_api::{
    GCEClusterProviderSpec, GCEClusterProviderSpecList, GCEClusterProviderStatus,
    GCEClusterProviderStatusList,
};
use k8s_openapi::Resource;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

/// API version (group/version) and kind identifying an object type
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupVersionKind {
    pub api_version: String,
    pub kind: String,
}

impl GroupVersionKind {
    pub fn new(api_version: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            api_version: api_version.into(),
            kind: kind.into(),
        }
    }

    /// Identity of a resource type
    pub fn of<K: Resource>() -> Self {
        Self::new(K::API_VERSION, K::KIND)
    }
}

impl fmt::Display for GroupVersionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, Kind={}", self.api_version, self.kind)
    }
}

/// Scheme maps object envelopes (`apiVersion` + `kind`) to registered types
#[derive(Clone, Debug, Default)]
pub struct Scheme {
    kinds: BTreeSet<GroupVersionKind>,
}

impl Scheme {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource type
    pub fn register<K: Resource>(&mut self) -> &mut Self {
        let gvk = GroupVersionKind::of::<K>();
        debug!("Registered kind: {}", gvk);
        self.kinds.insert(gvk);
        self
    }

    /// Whether the given API version and kind are registered
    pub fn recognizes(&self, api_version: &str, kind: &str) -> bool {
        self.kinds.contains(&GroupVersionKind::new(api_version, kind))
    }

    /// Whether a resource type is registered
    pub fn is_registered<K: Resource>(&self) -> bool {
        self.recognizes(K::API_VERSION, K::KIND)
    }

    /// Decode a raw object into `K`.
    ///
    /// An object carrying `apiVersion` and `kind` must name a registered
    /// kind and that kind must be `K`. An object without any type
    /// information is decoded as `K` directly.
    pub fn decode<K>(&self, raw: Option<&Value>) -> Result<K>
    where
        K: Resource + DeserializeOwned,
    {
        let gvk = self.registered::<K>()?;
        let raw = raw.ok_or_else(|| CoreError::Decode(format!("no value for {}", gvk)))?;
        let object = raw
            .as_object()
            .ok_or_else(|| CoreError::Decode(format!("{} must be a JSON object", gvk.kind)))?;

        let api_version = object.get("apiVersion").and_then(Value::as_str);
        let kind = object.get("kind").and_then(Value::as_str);
        match (api_version, kind) {
            (None, None) => debug!("Object has no type information, decoding as {}", gvk),
            (Some(api_version), Some(kind)) => {
                if !self.recognizes(api_version, kind) {
                    return Err(CoreError::Decode(format!(
                        "no kind \"{}\" is registered for version \"{}\"",
                        kind, api_version
                    )));
                }
                if api_version != gvk.api_version || kind != gvk.kind {
                    return Err(CoreError::Decode(format!(
                        "expected {}, got {}",
                        gvk,
                        GroupVersionKind::new(api_version, kind)
                    )));
                }
            }
            (None, Some(_)) => {
                return Err(CoreError::Decode("Object 'apiVersion' is missing".to_string()))
            }
            (Some(_), None) => {
                return Err(CoreError::Decode("Object 'Kind' is missing".to_string()))
            }
        }

        serde_json::from_value(raw.clone()).map_err(|e| CoreError::Decode(e.to_string()))
    }

    /// Encode `obj` into an object envelope stamped with its API version and kind
    pub fn encode<K>(&self, obj: &K) -> Result<Value>
    where
        K: Resource + Serialize,
    {
        let gvk = self.registered::<K>()?;
        let Value::Object(mut object) = serde_json::to_value(obj)? else {
            return Err(CoreError::Encode(gvk.to_string()));
        };
        object.insert("apiVersion".to_string(), Value::String(gvk.api_version));
        object.insert("kind".to_string(), Value::String(gvk.kind));
        Ok(Value::Object(object))
    }

    fn registered<K: Resource>(&self) -> Result<GroupVersionKind> {
        let gvk = GroupVersionKind::of::<K>();
        if self.is_registered::<K>() {
            Ok(gvk)
        } else {
            Err(CoreError::UnregisteredKind(gvk.to_string()))
        }
    }
}

/// Scheme holding the GCE provider config kinds
pub fn gce_provider_config_scheme() -> Scheme {
    let mut scheme = Scheme::new();
    scheme
        .register::<GCEClusterProviderSpec>()
        .register::<GCEClusterProviderSpecList>()
        .register::<GCEClusterProviderStatus>()
        .register::<GCEClusterProviderStatusList>();
    scheme
}
