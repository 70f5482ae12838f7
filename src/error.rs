//! Discovery errors
//!
//! Every failure the discovery engine can surface. Transport-level failures
//! stay as [`anyhow::Error`] inside [`DiscoveryError::ListingFailed`], the way
//! the HTTP layer reports them.

use crate::resource::ResourceKind;
use std::time::Duration;

/// Errors raised while walking the resource hierarchy
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    /// A resource path returned by the provider does not match the ARM grammar
    #[error("malformed resource id '{id}': {reason}")]
    MalformedIdentifier { id: String, reason: String },

    /// A page fetch failed while listing a collection
    #[error("listing {kind} failed: {cause}")]
    ListingFailed {
        kind: ResourceKind,
        #[source]
        cause: anyhow::Error,
    },

    /// A child enumerator failed while traversing a specific parent
    #[error("enumeration aborted under {level} '{parent}'")]
    EnumerationAborted {
        level: ResourceKind,
        parent: String,
        #[source]
        cause: Box<DiscoveryError>,
    },

    /// A parent object lives outside the run's resource group filter
    #[error("resource group '{found}' is outside the filter '{filter}'")]
    ScopeViolation { filter: String, found: String },

    /// The caller's time limit expired before the walk finished
    #[error("discovery timed out after {}s", after.as_secs())]
    TimedOut { after: Duration },
}

impl DiscoveryError {
    pub(crate) fn malformed(id: &str, reason: impl Into<String>) -> Self {
        Self::MalformedIdentifier {
            id: id.to_string(),
            reason: reason.into(),
        }
    }

    /// The innermost error, skipping `EnumerationAborted` wrappers
    pub fn root_cause(&self) -> &DiscoveryError {
        match self {
            Self::EnumerationAborted { cause, .. } => cause.root_cause(),
            other => other,
        }
    }

    /// Parent chain from the outermost aborted level down to the failure
    pub fn abort_path(&self) -> Vec<(ResourceKind, &str)> {
        let mut path = Vec::new();
        let mut current = self;
        while let Self::EnumerationAborted {
            level,
            parent,
            cause,
        } = current
        {
            path.push((*level, parent.as_str()));
            current = cause;
        }
        path
    }
}

pub type Result<T, E = DiscoveryError> = std::result::Result<T, E>;
