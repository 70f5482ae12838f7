//! tazure - Azure resource inventory
//!
//! Walks the Azure Resource Manager hierarchy (subscription → resource group →
//! service → nested child objects) and produces a flat, ordered list of
//! resource records for Terraform import.
//!
//! - [`resource`] - the discovery engine (ids, paginated listing, enumerators, walker)
//! - [`azure`] - ARM credentials, HTTP client and the ARM-backed lister
//! - [`config`] - persistent CLI configuration
//! - [`error`] - discovery error taxonomy

pub mod azure;
pub mod config;
pub mod error;
pub mod resource;

pub use error::{DiscoveryError, Result};
