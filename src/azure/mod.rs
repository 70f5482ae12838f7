//! Azure Resource Manager interaction module
//!
//! This module provides everything needed to list resources from ARM:
//! authentication, the HTTP client, and the lister the discovery engine runs
//! against.
//!
//! # Module Structure
//!
//! - [`auth`] - Token sources (static, service principal, Azure CLI) and default subscription
//! - [`client`] - Main ARM client and URL helpers
//! - [`http`] - HTTP utilities for REST API calls
//! - [`lister`] - [`crate::resource::ResourceLister`] over ARM list endpoints
//!
//! # Example
//!
//! ```ignore
//! use tazure::azure::{client::AzureClient, lister::ArmLister};
//!
//! fn example() -> anyhow::Result<ArmLister> {
//!     let client = AzureClient::new("https://management.azure.com")?;
//!     Ok(ArmLister::new(client))
//! }
//! ```

pub mod auth;
pub mod client;
pub mod http;
pub mod lister;
