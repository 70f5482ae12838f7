//! ARM resource ids
//!
//! Parses management-plane paths of the form
//! `/subscriptions/{sub}/resourceGroups/{rg}/providers/{ns}/{type}/{name}/...`
//! into typed parts. Keywords match case-insensitively, as ARM does.

use crate::error::{DiscoveryError, Result};
use std::fmt;
use std::str::FromStr;

/// One `{type}/{name}` pair of a resource id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub resource_type: String,
    pub name: String,
}

/// Parsed ARM resource id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceId {
    pub subscription_id: String,
    pub resource_group: Option<String>,
    pub provider: Option<String>,
    pub segments: Vec<Segment>,
}

impl ResourceId {
    /// Parse a raw resource path
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim_matches('/');
        if trimmed.is_empty() {
            return Err(DiscoveryError::malformed(raw, "empty path"));
        }

        let tokens: Vec<&str> = trimmed.split('/').collect();
        if tokens.iter().any(|t| t.is_empty()) {
            return Err(DiscoveryError::malformed(raw, "empty path component"));
        }

        let mut rest = tokens.as_slice();

        let subscription_id = match rest {
            [keyword, sub, tail @ ..] if keyword.eq_ignore_ascii_case("subscriptions") => {
                rest = tail;
                sub.to_string()
            }
            _ => return Err(DiscoveryError::malformed(raw, "missing subscription segment")),
        };

        let mut resource_group = None;
        if let Some(keyword) = rest.first() {
            if keyword.eq_ignore_ascii_case("resourceGroups") {
                let [_, rg, tail @ ..] = rest else {
                    return Err(DiscoveryError::malformed(raw, "resource group has no name"));
                };
                resource_group = Some(rg.to_string());
                rest = tail;
            }
        }

        let mut provider = None;
        let mut segments = Vec::new();
        if let Some(keyword) = rest.first() {
            if !keyword.eq_ignore_ascii_case("providers") {
                return Err(DiscoveryError::malformed(
                    raw,
                    format!("unexpected segment '{}'", keyword),
                ));
            }
            let [_, namespace, pairs @ ..] = rest else {
                return Err(DiscoveryError::malformed(raw, "provider has no namespace"));
            };
            if pairs.is_empty() {
                return Err(DiscoveryError::malformed(raw, "provider has no resource type"));
            }
            if pairs.len() % 2 != 0 {
                return Err(DiscoveryError::malformed(
                    raw,
                    "odd number of type/name tokens",
                ));
            }
            provider = Some(namespace.to_string());
            segments = pairs
                .chunks_exact(2)
                .map(|pair| Segment {
                    resource_type: pair[0].to_string(),
                    name: pair[1].to_string(),
                })
                .collect();
        }

        Ok(Self {
            subscription_id,
            resource_group,
            provider,
            segments,
        })
    }

    /// Name of the addressed object (last segment, else the group or subscription)
    pub fn name(&self) -> &str {
        if let Some(last) = self.segments.last() {
            return &last.name;
        }
        self.resource_group
            .as_deref()
            .unwrap_or(&self.subscription_id)
    }

    /// Full resource type, e.g. `Microsoft.ApiManagement/service/apis`
    pub fn resource_type(&self) -> Option<String> {
        let provider = self.provider.as_ref()?;
        let mut parts = vec![provider.as_str()];
        parts.extend(self.segments.iter().map(|s| s.resource_type.as_str()));
        Some(parts.join("/"))
    }

    /// Id of the enclosing object, if this id addresses a nested child
    pub fn parent(&self) -> Option<ResourceId> {
        if self.segments.len() < 2 {
            return None;
        }
        let mut parent = self.clone();
        parent.segments.pop();
        Some(parent)
    }

    /// Id of a child object of this one
    pub fn child(&self, resource_type: &str, name: &str) -> ResourceId {
        let mut child = self.clone();
        child.segments.push(Segment {
            resource_type: resource_type.to_string(),
            name: name.to_string(),
        });
        child
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }
}

impl FromStr for ResourceId {
    type Err = DiscoveryError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/subscriptions/{}", self.subscription_id)?;
        if let Some(rg) = &self.resource_group {
            write!(f, "/resourceGroups/{}", rg)?;
        }
        if let Some(provider) = &self.provider {
            write!(f, "/providers/{}", provider)?;
            for segment in &self.segments {
                write!(f, "/{}/{}", segment.resource_type, segment.name)?;
            }
        }
        Ok(())
    }
}
