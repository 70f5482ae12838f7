//! Resource discovery engine
//!
//! Walks the ARM object hierarchy and flattens it into an ordered list of
//! [`ResourceRecord`]s.
//!
//! # Architecture
//!
//! - [`id`] - ARM resource id parsing
//! - [`fetcher`] - Paginated listing behind the [`ResourceLister`] boundary
//! - [`enumerator`] - Generic per-level enumerator
//! - [`walker`] - Entry point, runs enumerator trees into a record sink
//! - [`catalog`] - Enumerator trees for each supported service
//!
//! # Example
//!
//! ```ignore
//! use tazure::resource::{catalog, EnumerationScope, Walker};
//!
//! async fn inventory(lister: impl tazure::resource::ResourceLister) {
//!     let scope = EnumerationScope::new("00000000-0000-0000-0000-000000000000", Some("rg1"));
//!     let discovery = Walker::new(lister)
//!         .discover(&scope, &[catalog::api_management()])
//!         .await;
//!     for record in &discovery.records {
//!         println!("{} {}", record.terraform_type(), record.id);
//!     }
//! }
//! ```

pub mod catalog;
pub mod enumerator;
pub mod fetcher;
pub mod id;
mod kind;
mod record;
mod scope;
pub mod walker;

pub use enumerator::Enumerator;
pub use fetcher::{fetch_all, list_all, Page, RawItem, ResourceLister};
pub use id::{ResourceId, Segment};
pub use kind::{ArmEndpoint, ResourceKind};
pub use record::{RecordSink, ResourceRecord};
pub use scope::{EnumerationScope, ListRequest};
pub use walker::{Discovery, RunOptions, Walker};
