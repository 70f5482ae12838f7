//! ARM Lister
//!
//! [`ResourceLister`] backed by the Azure Resource Manager REST API.
//! Collections answer with `{ "value": [...], "nextLink": "..." }`; the
//! `nextLink` URL is used as the page token.

use super::client::AzureClient;
use crate::resource::{ArmEndpoint, ListRequest, Page, RawItem, ResourceLister};
use anyhow::{Context, Result};
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::Deserialize;
use serde_json::Value;

/// Lists ARM collections through an [`AzureClient`]
#[derive(Clone)]
pub struct ArmLister {
    client: AzureClient,
}

impl ArmLister {
    pub fn new(client: AzureClient) -> Self {
        Self { client }
    }

    /// URL of the first page for `request`
    pub fn list_url(&self, request: &ListRequest) -> Result<String> {
        let scope = &request.scope;
        let path = match request.kind.endpoint() {
            ArmEndpoint::Provider {
                namespace,
                resource_type,
            } => {
                let mut path = format!("/subscriptions/{}", scope.subscription_id);
                if let Some(rg) = &scope.resource_group {
                    path.push_str(&format!("/resourceGroups/{}", rg));
                }
                format!("{}/providers/{}/{}", path, namespace, resource_type)
            }
            ArmEndpoint::Child { segment } => {
                let parent = scope.parent.as_ref().with_context(|| {
                    format!("{} can only be listed under a parent object", request.kind)
                })?;
                format!("{}/{}", parent, segment)
            }
        };

        self.client.arm_url(&path, request.kind.api_version())
    }
}

impl ResourceLister for ArmLister {
    fn fetch_page<'a>(
        &'a self,
        request: &'a ListRequest,
        page_token: Option<&'a str>,
    ) -> BoxFuture<'a, Result<Page>> {
        async move {
            let url = match page_token {
                Some(next_link) => self.client.next_link_url(next_link)?,
                None => self.list_url(request)?,
            };
            let response = self.client.get(&url).await?;
            parse_page(&response)
        }
        .boxed()
    }
}

/// Extract items and the continuation link from a list response
fn parse_page(response: &Value) -> Result<Page> {
    let items = response
        .get("value")
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .map(|item| {
                    RawItem::deserialize(item).context("List item is missing 'id' or 'name'")
                })
                .collect::<Result<Vec<_>>>()
        })
        .transpose()?
        .unwrap_or_default();

    let next_token = response
        .get("nextLink")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string());

    Ok(Page { items, next_token })
}
