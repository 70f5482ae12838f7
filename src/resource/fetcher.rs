//! Resource Fetcher
//!
//! Page-by-page listing of a collection. [`ResourceLister`] is the provider
//! boundary (one page per call); [`list_all`] turns it into a lazy item stream
//! that keeps fetching until the continuation token runs out.

use super::scope::ListRequest;
use crate::error::{DiscoveryError, Result};
use futures::future::BoxFuture;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use serde::Deserialize;
use std::sync::Arc;

/// Raw item as returned by a list endpoint
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawItem {
    pub id: String,
    pub name: String,
}

impl RawItem {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
        }
    }
}

/// Result of one page fetch
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub items: Vec<RawItem>,
    pub next_token: Option<String>,
}

impl Page {
    pub fn new(items: Vec<RawItem>, next_token: Option<&str>) -> Self {
        Self {
            items,
            next_token: next_token.map(str::to_string),
        }
    }
}

/// List one page of a collection.
///
/// `page_token` is `None` for the first page and the previous page's
/// `next_token` afterwards.
pub trait ResourceLister: Send + Sync {
    fn fetch_page<'a>(
        &'a self,
        request: &'a ListRequest,
        page_token: Option<&'a str>,
    ) -> BoxFuture<'a, anyhow::Result<Page>>;
}

impl<T: ResourceLister + ?Sized> ResourceLister for Arc<T> {
    fn fetch_page<'a>(
        &'a self,
        request: &'a ListRequest,
        page_token: Option<&'a str>,
    ) -> BoxFuture<'a, anyhow::Result<Page>> {
        (**self).fetch_page(request, page_token)
    }
}

impl<T: ResourceLister + ?Sized> ResourceLister for &T {
    fn fetch_page<'a>(
        &'a self,
        request: &'a ListRequest,
        page_token: Option<&'a str>,
    ) -> BoxFuture<'a, anyhow::Result<Page>> {
        (**self).fetch_page(request, page_token)
    }
}

/// Lazily list every item of a collection (auto-paginate).
///
/// Items come in provider order. A failed page fetch yields a single
/// `ListingFailed` and ends the stream; items yielded before it are unaffected.
/// The stream cannot be restarted, call again to fetch from the first page.
pub fn list_all<'a, L>(lister: &'a L, request: ListRequest) -> BoxStream<'a, Result<RawItem>>
where
    L: ResourceLister + ?Sized,
{
    // `None` once the last page has been fetched
    let first: Option<Option<String>> = Some(None);

    stream::try_unfold(first, move |cursor| {
        let request = request.clone();
        async move {
            let Some(page_token) = cursor else {
                return Ok(None);
            };

            let page = lister
                .fetch_page(&request, page_token.as_deref())
                .await
                .map_err(|cause| {
                    tracing::warn!("Listing {} failed: {}", request.kind, cause);
                    DiscoveryError::ListingFailed {
                        kind: request.kind,
                        cause,
                    }
                })?;

            tracing::debug!(
                "Fetched {} {} item(s), more pages: {}",
                page.items.len(),
                request.kind,
                page.next_token.is_some()
            );

            let next = page
                .next_token
                .filter(|token| !token.is_empty())
                .map(Some);
            Ok::<_, DiscoveryError>(Some((page.items, next)))
        }
    })
    .map_ok(|items| stream::iter(items.into_iter().map(Ok::<RawItem, DiscoveryError>)))
    .try_flatten()
    .boxed()
}

/// Fetch all items of a collection, keeping what was listed before a failure
pub async fn fetch_all<L>(lister: &L, request: ListRequest) -> (Vec<RawItem>, Option<DiscoveryError>)
where
    L: ResourceLister + ?Sized,
{
    let mut items = Vec::new();
    let mut stream = list_all(lister, request);

    while let Some(next) = stream.next().await {
        match next {
            Ok(item) => items.push(item),
            Err(err) => return (items, Some(err)),
        }
    }

    (items, None)
}
