//! Shared test fixtures: a scripted in-memory lister and id builders

#![allow(dead_code)]

use futures::future::BoxFuture;
use futures::FutureExt;
use std::collections::HashMap;
use std::sync::Mutex;
use tazure::resource::{ListRequest, Page, RawItem, ResourceKind, ResourceLister};

pub const SUB: &str = "00000000-0000-0000-0000-000000000000";

/// Id of an API Management service in `rg`
pub fn service_id(rg: &str, name: &str) -> String {
    format!(
        "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.ApiManagement/service/{}",
        SUB, rg, name
    )
}

/// Id of a child object under `parent`
pub fn child_id(parent: &str, segment: &str, name: &str) -> String {
    format!("{}/{}/{}", parent, segment, name)
}

/// Raw item whose name is the last path component of `id`
pub fn item(id: &str) -> RawItem {
    let name = id.rsplit('/').next().unwrap_or(id);
    RawItem::new(id, name)
}

enum Scripted {
    Page(Vec<RawItem>),
    Fail(String),
}

/// One recorded `fetch_page` call
#[derive(Debug, Clone)]
pub struct Call {
    pub request: ListRequest,
    pub page_token: Option<String>,
}

/// Lister answering from scripted pages keyed by kind and parent name.
///
/// Collections without a script answer with one empty page. Page tokens are
/// `page-N`.
#[derive(Default)]
pub struct FakeLister {
    scripts: HashMap<(ResourceKind, Option<String>), Vec<Scripted>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeLister {
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&mut self, kind: ResourceKind, parent: Option<&str>) -> &mut Vec<Scripted> {
        self.scripts
            .entry((kind, parent.map(str::to_string)))
            .or_default()
    }

    /// Add one page of items for `kind` under `parent`
    pub fn page(mut self, kind: ResourceKind, parent: Option<&str>, ids: &[String]) -> Self {
        let items = ids.iter().map(|id| item(id)).collect();
        self.script(kind, parent).push(Scripted::Page(items));
        self
    }

    /// Make the next page fetch for `kind` under `parent` fail
    pub fn fail(mut self, kind: ResourceKind, parent: Option<&str>, message: &str) -> Self {
        self.script(kind, parent)
            .push(Scripted::Fail(message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

impl ResourceLister for FakeLister {
    fn fetch_page<'a>(
        &'a self,
        request: &'a ListRequest,
        page_token: Option<&'a str>,
    ) -> BoxFuture<'a, anyhow::Result<Page>> {
        self.calls.lock().unwrap().push(Call {
            request: request.clone(),
            page_token: page_token.map(str::to_string),
        });

        let index = page_token
            .and_then(|t| t.strip_prefix("page-"))
            .and_then(|n| n.parse::<usize>().ok())
            .unwrap_or(0);
        let parent = request.scope.parent_name().map(str::to_string);

        let result = match self.scripts.get(&(request.kind, parent)) {
            None => Ok(Page::default()),
            Some(script) => match script.get(index) {
                Some(Scripted::Page(items)) => {
                    let next = (index + 1 < script.len()).then(|| format!("page-{}", index + 1));
                    Ok(Page::new(items.clone(), next.as_deref()))
                }
                Some(Scripted::Fail(message)) => Err(anyhow::anyhow!("{}", message)),
                None => Err(anyhow::anyhow!("no page {} scripted", index)),
            },
        };

        async move { result }.boxed()
    }
}
