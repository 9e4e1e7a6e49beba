//! JSON-catalog backed [`VersionStore`]
//!
//! Serves versions from a catalog file the way the deployment console's
//! backend does: case-insensitive substring search on the version string,
//! fixed-size pages, and the requested `include_version` moved to the front
//! of the first page. Pages listed in `failPages` fail once each, which makes
//! failure paths reproducible from the headless driver.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use verpager_core::prelude::*;
use verpager_core::{
    InstanceContext, PageResult, UpgradeOutcome, UpgradeRequest, VersionId, VersionQuery,
    VersionRecord, VersionValue, FIRST_PAGE,
};

use super::store::VersionStore;

/// Catalog file contents
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    #[serde(default)]
    pub versions: Vec<VersionRecord>,

    /// Values documents keyed by version id
    #[serde(default)]
    pub values: HashMap<VersionId, VersionValue>,

    /// Page numbers whose next request fails with a transport error
    #[serde(default)]
    pub fail_pages: Vec<u32>,

    /// Answer every upgrade with a rejection carrying this message
    #[serde(default)]
    pub reject_upgrades: Option<String>,

    /// Artificial latency applied to every call
    #[serde(default)]
    pub latency_ms: u64,
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| Error::catalog(path, e.to_string()))?;
        let catalog: Catalog =
            serde_json::from_str(&content).map_err(|e| Error::catalog(path, e.to_string()))?;
        debug!(
            "Loaded catalog {:?} with {} version(s)",
            path,
            catalog.versions.len()
        );
        Ok(catalog)
    }

    pub fn with_versions(versions: Vec<VersionRecord>) -> Self {
        Self {
            versions,
            ..Default::default()
        }
    }
}

/// In-memory store over a [`Catalog`]
#[derive(Debug, Default)]
pub struct FixtureStore {
    catalog: Catalog,
    fail_pages: Mutex<Vec<u32>>,
    queries: Mutex<Vec<VersionQuery>>,
    upgrades: Mutex<Vec<UpgradeRequest>>,
}

impl FixtureStore {
    pub fn new(catalog: Catalog) -> Self {
        let fail_pages = Mutex::new(catalog.fail_pages.clone());
        Self {
            catalog,
            fail_pages,
            queries: Mutex::new(Vec::new()),
            upgrades: Mutex::new(Vec::new()),
        }
    }

    /// Every page query received so far, in arrival order
    pub fn queries(&self) -> Vec<VersionQuery> {
        self.queries.lock().map(|q| q.clone()).unwrap_or_default()
    }

    /// Every upgrade request received so far
    pub fn upgrades(&self) -> Vec<UpgradeRequest> {
        self.upgrades.lock().map(|u| u.clone()).unwrap_or_default()
    }

    fn take_failure(&self, page: u32) -> bool {
        let Ok(mut pages) = self.fail_pages.lock() else {
            return false;
        };
        match pages.iter().position(|p| *p == page) {
            Some(idx) => {
                pages.remove(idx);
                true
            }
            None => false,
        }
    }

    async fn simulate_latency(&self) {
        if self.catalog.latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.catalog.latency_ms)).await;
        }
    }

    fn find(&self, id: &VersionId) -> Option<&VersionRecord> {
        self.catalog.versions.iter().find(|r| &r.id == id)
    }

    /// Compute a page without side effects
    pub fn page_for(&self, query: &VersionQuery) -> PageResult {
        let needle = query.search_term.to_lowercase();
        let mut matching: Vec<&VersionRecord> = self
            .catalog
            .versions
            .iter()
            .filter(|r| needle.is_empty() || r.version.to_lowercase().contains(&needle))
            .collect();

        if query.is_first_page() {
            if let Some(include) = query.include_version.as_ref().and_then(|id| self.find(id)) {
                matching.retain(|r| r.id != include.id);
                matching.insert(0, include);
            }
        }

        let size = query.page_size.max(1) as usize;
        let start = (query.page.max(FIRST_PAGE) - FIRST_PAGE) as usize * size;
        let items: Vec<VersionRecord> = matching
            .iter()
            .skip(start)
            .take(size)
            .map(|r| (*r).clone())
            .collect();
        let has_next_page = start + size < matching.len();

        PageResult::new(items, has_next_page)
    }
}

impl VersionStore for FixtureStore {
    async fn fetch_version_page(&self, query: VersionQuery) -> Result<PageResult> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.clone());
        }
        self.simulate_latency().await;

        if self.take_failure(query.page) {
            warn!("Fixture store failing page {} on request", query.page);
            return Err(Error::transport(format!(
                "page {} unavailable",
                query.page
            )));
        }

        let page = self.page_for(&query);
        trace!(
            "Serving page {} for {:?}: {} item(s), has_next_page={}",
            query.page,
            query.search_term,
            page.items.len(),
            page.has_next_page
        );
        Ok(page)
    }

    async fn fetch_value_for_version(
        &self,
        context: &InstanceContext,
        version_id: &VersionId,
    ) -> Result<VersionValue> {
        self.simulate_latency().await;

        if self.find(version_id).is_none() {
            return Err(Error::version_not_found(version_id.as_str()));
        }
        debug!(
            "Serving values of {} for instance {}",
            version_id, context.app_instance_id
        );
        Ok(self
            .catalog
            .values
            .get(version_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn upgrade(&self, request: UpgradeRequest) -> Result<UpgradeOutcome> {
        self.simulate_latency().await;

        if let Ok(mut upgrades) = self.upgrades.lock() {
            upgrades.push(request.clone());
        }

        if let Some(message) = &self.catalog.reject_upgrades {
            return Ok(UpgradeOutcome::Rejected {
                message: message.clone(),
            });
        }
        if self.find(&request.app_version_id).is_none() {
            return Ok(UpgradeOutcome::Rejected {
                message: format!("unknown version {}", request.app_version_id),
            });
        }
        Ok(UpgradeOutcome::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store(count: usize) -> FixtureStore {
        let versions = (1..=count)
            .map(|i| VersionRecord::new(format!("v{i}"), format!("1.{i}.0")))
            .collect();
        FixtureStore::new(Catalog::with_versions(versions))
    }

    fn query(page: u32, term: &str, include: Option<&str>) -> VersionQuery {
        VersionQuery {
            project_id: 1,
            app_id: 2,
            page,
            search_term: term.to_string(),
            include_version: include.map(VersionId::from),
            page_size: 2,
        }
    }

    fn page_ids(page: &PageResult) -> Vec<&str> {
        page.items.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_paging() {
        let store = store(5);
        let first = store.page_for(&query(1, "", None));
        let last = store.page_for(&query(3, "", None));

        assert_eq!(page_ids(&first), vec!["v1", "v2"]);
        assert!(first.has_next_page);
        assert_eq!(page_ids(&last), vec!["v5"]);
        assert!(!last.has_next_page);
    }

    #[test]
    fn test_include_version_leads_first_page() {
        let store = store(5);
        let first = store.page_for(&query(1, "", Some("v4")));
        assert_eq!(page_ids(&first), vec!["v4", "v1"]);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let mut catalog = Catalog::default();
        catalog.versions = vec![
            VersionRecord::new("a", "2.0.0-BETA"),
            VersionRecord::new("b", "2.0.0"),
            VersionRecord::new("c", "2.1.0-beta2"),
        ];
        let store = FixtureStore::new(catalog);

        let page = store.page_for(&query(1, "beta", None));
        assert_eq!(page_ids(&page), vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_fail_pages_fail_once() {
        let mut catalog = Catalog::with_versions(vec![
            VersionRecord::new("a", "1.0.0"),
            VersionRecord::new("b", "2.0.0"),
            VersionRecord::new("c", "3.0.0"),
        ]);
        catalog.fail_pages = vec![2];
        let store = FixtureStore::new(catalog);

        assert!(store.fetch_version_page(query(2, "", None)).await.is_err());
        assert!(store.fetch_version_page(query(2, "", None)).await.is_ok());
        assert_eq!(store.queries().len(), 2);
    }

    #[tokio::test]
    async fn test_upgrade_rejects_unknown_version() {
        let store = store(1);
        let request = UpgradeRequest {
            app_instance_id: 1,
            environment_id: 2,
            app_id: 3,
            app_version_id: VersionId::from("v9"),
            values: String::new(),
            value_id: None,
            kind: Default::default(),
        };

        let outcome = store.upgrade(request).await.unwrap();
        assert!(matches!(outcome, UpgradeOutcome::Rejected { .. }));
        assert_eq!(store.upgrades().len(), 1);
    }

    #[tokio::test]
    async fn test_value_for_unknown_version_fails() {
        let store = store(1);
        let ctx = InstanceContext {
            project_id: 1,
            app_id: 2,
            app_instance_id: 3,
            environment_id: 4,
        };

        assert!(store
            .fetch_value_for_version(&ctx, &VersionId::from("v1"))
            .await
            .is_ok());
        assert!(store
            .fetch_value_for_version(&ctx, &VersionId::from("nope"))
            .await
            .is_err());
    }

    #[test]
    fn test_catalog_load() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("versions.json");
        std::fs::write(
            &path,
            r#"{
                "versions": [{"id": "v1", "version": "1.0.0"}],
                "values": {"v1": {"id": "val-1", "yaml": "replicas: 1", "name": "default"}},
                "failPages": [2]
            }"#,
        )
        .unwrap();

        let catalog = Catalog::load(&path).unwrap();
        assert_eq!(catalog.versions.len(), 1);
        assert_eq!(catalog.fail_pages, vec![2]);
        assert_eq!(
            catalog.values[&VersionId::from("v1")].yaml,
            "replicas: 1".to_string()
        );
    }

    #[test]
    fn test_catalog_load_missing_file() {
        let temp = tempdir().unwrap();
        let err = Catalog::load(&temp.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, Error::Catalog { .. }));
    }
}
