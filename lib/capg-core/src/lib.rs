//! Core bootstrap functionality for the GCE provider
//!
//! This library provides:
//! - An explicit scheme for decoding provider specs out of cluster objects
//! - Public key pinning of the cluster CA
//! - Machine setup configs mapping machine parameters to images and metadata
//! - Rendering of startup-script metadata for masters and nodes

pub mod error;
pub mod machinesetup;
pub mod metadata;
pub mod pubkeypin;
pub mod scheme;

pub use error::{CoreError, Result};
pub use machinesetup::{MachineParams, MachineSetupConfig, MachineSetupConfigs, Metadata};
pub use metadata::{MetadataRenderer, STARTUP_SCRIPT_KEY};
pub use pubkeypin::PinSet;
pub use scheme::{gce_provider_config_scheme, GroupVersionKind, Scheme};
