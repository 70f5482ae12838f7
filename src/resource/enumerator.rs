//! Enumerators
//!
//! One generic enumerator per object type: it lists its collection, emits a
//! record per item and descends into its declared child collections.

use super::fetcher::{list_all, ResourceLister};
use super::id::ResourceId;
use super::kind::ResourceKind;
use super::record::{RecordSink, ResourceRecord};
use super::scope::EnumerationScope;
use crate::error::{DiscoveryError, Result};
use futures::future::BoxFuture;
use futures::{FutureExt, TryStreamExt};

/// Lists one kind of object and, per item, its child collections
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enumerator {
    pub kind: ResourceKind,
    pub children: Vec<Enumerator>,
}

impl Enumerator {
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: Enumerator) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Enumerator>) -> Self {
        self.children.extend(children);
        self
    }

    /// Every kind this enumerator can emit, depth-first
    pub fn kinds(&self) -> Vec<ResourceKind> {
        let mut kinds = vec![self.kind];
        for child in &self.children {
            kinds.extend(child.kinds());
        }
        kinds
    }

    /// Enumerate this collection under `scope` into `sink`.
    ///
    /// Each item is appended before its children are listed. The first child
    /// failure stops the walk at this level and comes back wrapped in
    /// `EnumerationAborted` naming the item being processed.
    pub fn enumerate<'a, L>(
        &'a self,
        lister: &'a L,
        scope: &'a EnumerationScope,
        sink: &'a mut RecordSink,
    ) -> BoxFuture<'a, Result<()>>
    where
        L: ResourceLister + ?Sized,
    {
        async move {
            let mut items = list_all(lister, scope.request(self.kind));

            while let Some(item) = items.try_next().await? {
                sink.append(ResourceRecord::new(&item.id, &item.name, self.kind));

                if self.children.is_empty() {
                    continue;
                }

                let parent = ResourceId::parse(&item.id)?;
                let child_scope = scope.narrow(parent)?;
                tracing::debug!(
                    "Enumerating {} child collection(s) of {} '{}'",
                    self.children.len(),
                    self.kind,
                    item.name
                );

                for child in &self.children {
                    child
                        .enumerate(lister, &child_scope, sink)
                        .await
                        .map_err(|cause| DiscoveryError::EnumerationAborted {
                            level: self.kind,
                            parent: item.id.clone(),
                            cause: Box::new(cause),
                        })?;
                }
            }

            Ok(())
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_are_depth_first() {
        let tree = Enumerator::new(ResourceKind::ApiManagement).with_children([
            Enumerator::new(ResourceKind::ApiManagementApi)
                .with_child(Enumerator::new(ResourceKind::ApiManagementApiTag)),
            Enumerator::new(ResourceKind::ApiManagementBackend),
        ]);

        assert_eq!(
            tree.kinds(),
            vec![
                ResourceKind::ApiManagement,
                ResourceKind::ApiManagementApi,
                ResourceKind::ApiManagementApiTag,
                ResourceKind::ApiManagementBackend,
            ]
        );
    }
}
