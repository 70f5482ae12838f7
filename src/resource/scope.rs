//! Enumeration scope
//!
//! The read-only parameters every listing query is bound to. Scopes are only
//! ever narrowed by copy when the walk descends into a child collection.

use super::id::ResourceId;
use super::kind::ResourceKind;
use crate::error::{DiscoveryError, Result};

/// Ambient filters threaded through one discovery run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumerationScope {
    pub subscription_id: String,
    /// Resource group filter honored by every query of the run
    pub resource_group: Option<String>,
    /// Nearest enclosing parent object
    pub parent: Option<ResourceId>,
}

impl EnumerationScope {
    pub fn new(subscription_id: &str, resource_group: Option<&str>) -> Self {
        Self {
            subscription_id: subscription_id.to_string(),
            resource_group: resource_group
                .map(str::trim)
                .filter(|rg| !rg.is_empty())
                .map(str::to_string),
            parent: None,
        }
    }

    /// Copy of this scope with `parent` as the enclosing object.
    ///
    /// Fails if the parent sits outside the run's resource group filter, since
    /// child queries are addressed through the parent's group.
    pub fn narrow(&self, parent: ResourceId) -> Result<Self> {
        if let Some(filter) = &self.resource_group {
            let found = parent.resource_group.as_deref().unwrap_or_default();
            if !found.eq_ignore_ascii_case(filter) {
                return Err(DiscoveryError::ScopeViolation {
                    filter: filter.clone(),
                    found: found.to_string(),
                });
            }
        }

        Ok(Self {
            subscription_id: self.subscription_id.clone(),
            resource_group: self.resource_group.clone(),
            parent: Some(parent),
        })
    }

    pub fn parent_resource_group(&self) -> Option<&str> {
        self.parent.as_ref()?.resource_group.as_deref()
    }

    pub fn parent_name(&self) -> Option<&str> {
        self.parent.as_ref().map(ResourceId::name)
    }

    /// Listing request for `kind` bound to this scope
    pub fn request(&self, kind: ResourceKind) -> ListRequest {
        ListRequest {
            kind,
            scope: self.clone(),
        }
    }
}

/// What an enumerator asks the lister for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub kind: ResourceKind,
    pub scope: EnumerationScope,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(rg: &str) -> ResourceId {
        ResourceId::parse(&format!(
            "/subscriptions/sub/resourceGroups/{}/providers/Microsoft.ApiManagement/service/svc",
            rg
        ))
        .unwrap()
    }

    #[test]
    fn test_blank_resource_group_means_no_filter() {
        assert!(EnumerationScope::new("sub", Some("  ")).resource_group.is_none());
        assert_eq!(
            EnumerationScope::new("sub", Some("rg1")).resource_group.as_deref(),
            Some("rg1")
        );
    }

    #[test]
    fn test_narrow_keeps_filter_and_sets_parent() {
        let scope = EnumerationScope::new("sub", Some("rg1"));
        let child = scope.narrow(service("RG1")).unwrap();

        assert_eq!(child.resource_group.as_deref(), Some("rg1"));
        assert_eq!(child.parent_resource_group(), Some("RG1"));
        assert_eq!(child.parent_name(), Some("svc"));
        assert!(scope.parent.is_none());
    }

    #[test]
    fn test_narrow_rejects_parent_outside_filter() {
        let scope = EnumerationScope::new("sub", Some("rg1"));
        let err = scope.narrow(service("rg2")).unwrap_err();
        assert!(matches!(err, DiscoveryError::ScopeViolation { .. }));
    }

    #[test]
    fn test_narrow_without_filter_accepts_any_group() {
        let scope = EnumerationScope::new("sub", None);
        assert!(scope.narrow(service("rg2")).is_ok());
    }
}
