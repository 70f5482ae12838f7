//! Hierarchy Walker
//!
//! Entry point of a discovery run. Runs the root enumerators against one
//! lister and returns every record found, plus the error that stopped the run
//! if there was one.

use super::enumerator::Enumerator;
use super::fetcher::ResourceLister;
use super::record::{RecordSink, ResourceRecord};
use super::scope::EnumerationScope;
use crate::error::DiscoveryError;
use futures::future::join_all;
use std::time::Duration;

/// Outcome of a discovery run
#[derive(Debug)]
pub struct Discovery {
    /// Records in walk order, including those found before a failure
    pub records: Vec<ResourceRecord>,
    /// First fatal error, if the run did not complete
    pub error: Option<DiscoveryError>,
}

impl Discovery {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// Drop partial output on failure
    pub fn into_result(self) -> Result<Vec<ResourceRecord>, DiscoveryError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.records),
        }
    }
}

/// Run options
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Walk root hierarchies concurrently instead of one after another
    pub concurrent: bool,
    /// Abort the whole run after this long
    pub timeout: Option<Duration>,
}

/// Walks enumerator trees against a lister
pub struct Walker<L> {
    lister: L,
}

impl<L: ResourceLister> Walker<L> {
    pub fn new(lister: L) -> Self {
        Self { lister }
    }

    pub fn lister(&self) -> &L {
        &self.lister
    }

    /// Walk `roots` in order, depth-first, stopping at the first failure
    pub async fn discover(&self, scope: &EnumerationScope, roots: &[Enumerator]) -> Discovery {
        self.run(scope, roots, RunOptions::default()).await
    }

    /// Walk each root hierarchy concurrently; output stays in root order
    pub async fn discover_concurrent(
        &self,
        scope: &EnumerationScope,
        roots: &[Enumerator],
    ) -> Discovery {
        let options = RunOptions {
            concurrent: true,
            ..RunOptions::default()
        };
        self.run(scope, roots, options).await
    }

    /// Walk `roots` in order, giving up after `limit`
    pub async fn discover_with_timeout(
        &self,
        scope: &EnumerationScope,
        roots: &[Enumerator],
        limit: Duration,
    ) -> Discovery {
        let options = RunOptions {
            timeout: Some(limit),
            ..RunOptions::default()
        };
        self.run(scope, roots, options).await
    }

    pub async fn run(
        &self,
        scope: &EnumerationScope,
        roots: &[Enumerator],
        options: RunOptions,
    ) -> Discovery {
        tracing::info!(
            "Discovering {} root collection(s) in subscription {} (resource group: {})",
            roots.len(),
            scope.subscription_id,
            scope.resource_group.as_deref().unwrap_or("*")
        );

        // Sinks live outside the walk so a timeout cannot drop their records
        let branches = if options.concurrent { roots.len() } else { 1 };
        let mut sinks: Vec<RecordSink> = (0..branches).map(|_| RecordSink::new()).collect();

        let walk = self.walk(scope, roots, &mut sinks, options.concurrent);
        let error = match options.timeout {
            Some(limit) => match tokio::time::timeout(limit, walk).await {
                Ok(error) => error,
                Err(_) => Some(DiscoveryError::TimedOut { after: limit }),
            },
            None => walk.await,
        };

        let records: Vec<ResourceRecord> = sinks
            .into_iter()
            .flat_map(RecordSink::into_records)
            .collect();

        match &error {
            None => tracing::info!("Discovered {} resource(s)", records.len()),
            Some(err) => tracing::error!(
                "Discovery stopped after {} resource(s): {}",
                records.len(),
                err
            ),
        }

        Discovery { records, error }
    }

    async fn walk(
        &self,
        scope: &EnumerationScope,
        roots: &[Enumerator],
        sinks: &mut [RecordSink],
        concurrent: bool,
    ) -> Option<DiscoveryError> {
        if concurrent {
            let branches = roots
                .iter()
                .zip(sinks.iter_mut())
                .map(|(root, sink)| root.enumerate(&self.lister, scope, sink));

            let mut first = None;
            for (root, result) in roots.iter().zip(join_all(branches).await) {
                if let Err(err) = result {
                    if first.is_none() {
                        first = Some(err);
                    } else {
                        tracing::warn!("{} branch also failed: {}", root.kind, err);
                    }
                }
            }
            return first;
        }

        let Some(sink) = sinks.first_mut() else {
            return None;
        };
        for root in roots {
            if let Err(err) = root.enumerate(&self.lister, scope, sink).await {
                return Some(err);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{ListRequest, Page, RawItem, ResourceKind};
    use futures::future::BoxFuture;
    use futures::FutureExt;

    /// Lists one storage account per call, after a delay
    struct SlowLister {
        delay: Duration,
    }

    impl ResourceLister for SlowLister {
        fn fetch_page<'a>(
            &'a self,
            request: &'a ListRequest,
            _page_token: Option<&'a str>,
        ) -> BoxFuture<'a, anyhow::Result<Page>> {
            async move {
                tokio::time::sleep(self.delay).await;
                let id = format!(
                    "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Storage/storageAccounts/{}",
                    request.kind
                );
                Ok(Page::new(vec![RawItem::new(&id, "acct")], None))
            }
            .boxed()
        }
    }

    #[tokio::test]
    async fn test_discovery_into_result() {
        let ok = Discovery {
            records: Vec::new(),
            error: None,
        };
        assert!(ok.is_complete());
        assert!(ok.into_result().unwrap().is_empty());

        let failed = Discovery {
            records: Vec::new(),
            error: Some(DiscoveryError::TimedOut {
                after: Duration::from_secs(1),
            }),
        };
        assert!(!failed.is_complete());
        assert!(failed.into_result().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_keeps_records_of_finished_roots() {
        let walker = Walker::new(SlowLister {
            delay: Duration::from_secs(10),
        });
        let roots = [
            Enumerator::new(ResourceKind::StorageAccount),
            Enumerator::new(ResourceKind::AppService),
        ];
        let scope = EnumerationScope::new("sub", None);

        let discovery = walker
            .discover_with_timeout(&scope, &roots, Duration::from_secs(15))
            .await;

        assert_eq!(discovery.records.len(), 1);
        assert_eq!(discovery.records[0].kind, ResourceKind::StorageAccount);
        assert!(matches!(
            discovery.error,
            Some(DiscoveryError::TimedOut { .. })
        ));
    }
}
