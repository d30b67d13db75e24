//! Ownership of the published index snapshot.
//!
//! Queries clone the current `Arc<IndexSnapshot>` under a short read lock and
//! search it without holding the lock. A refresh builds a complete snapshot
//! first and only then swaps the `Arc` under the write lock, so readers see
//! either the old snapshot or the new one, never a partial build. Refreshes
//! are serialized, so snapshots are published in the order they were read.

use crate::catalog::CatalogStore;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::index::{build_with, Field, IndexSnapshot};
use crate::item::{CatalogItem, Category};
use crate::search::{rank, search_with, SearchHits};
use crate::sort::{sort_listing, SortKey};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::Instant;

/// One page of ranked search results.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    /// Matching items before the `max_results` cap.
    pub total_hits: usize,
    pub items: Vec<CatalogItem>,
}

pub struct IndexManager {
    store: Arc<dyn CatalogStore>,
    config: EngineConfig,
    published: RwLock<Arc<IndexSnapshot>>,
    refresh_lock: Mutex<()>,
}

impl IndexManager {
    /// Manager publishing an empty snapshot until the first [`refresh`](Self::refresh).
    pub fn new(store: Arc<dyn CatalogStore>, config: EngineConfig) -> Self {
        Self {
            store,
            config,
            published: RwLock::new(Arc::new(IndexSnapshot::empty())),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Snapshot current at call time; later refreshes do not affect it.
    pub fn snapshot(&self) -> Arc<IndexSnapshot> {
        self.published.read().clone()
    }

    /// Rebuild from the catalog store and publish the result.
    ///
    /// On a store error nothing is published and the previous snapshot keeps
    /// serving queries.
    pub fn refresh(&self) -> Result<Arc<IndexSnapshot>> {
        let _serial = self.refresh_lock.lock();
        let start = Instant::now();
        let items = match self.store.all_searchable_items() {
            Ok(items) => items,
            Err(e) => {
                tracing::error!(error = %e, "catalog unavailable, keeping previous index");
                return Err(e);
            }
        };
        let fresh = Arc::new(build_with(&items, self.config.fan_out));
        *self.published.write() = fresh.clone();
        tracing::info!(
            items = fresh.item_count(),
            name_terms = fresh.term_count(Field::Name),
            description_terms = fresh.term_count(Field::Description),
            keyword_terms = fresh.term_count(Field::Keyword),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "index refreshed"
        );
        Ok(fresh)
    }

    /// Score `query` against the current snapshot without hydrating items.
    pub fn search(&self, query: &str) -> SearchHits {
        let snapshot = self.snapshot();
        search_with(query, &snapshot, self.config.fan_out)
    }

    /// Resolve `query`, hydrate the matches from the store and rank them.
    ///
    /// Returns at most `max_results` items, highest score first. An empty or
    /// unmatched query yields an empty vector.
    pub fn perform_search(&self, query: &str) -> Result<Vec<CatalogItem>> {
        Ok(self.perform_search_page(query)?.items)
    }

    /// Like [`perform_search`](Self::perform_search), also reporting how many
    /// items matched before the cap.
    pub fn perform_search_page(&self, query: &str) -> Result<SearchPage> {
        let start = Instant::now();
        let hits = self.search(query);
        if hits.is_empty() {
            tracing::debug!(query, "no matches");
            return Ok(SearchPage::default());
        }
        let items = self.store.items_by_ids(&hits.ids())?;
        let mut ranked = rank(items, &hits.scores);
        let total_hits = ranked.len();
        ranked.truncate(self.config.max_results);
        tracing::debug!(
            query,
            candidates = hits.len(),
            returned = ranked.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "search complete"
        );
        Ok(SearchPage { total_hits, items: ranked })
    }

    /// Order `items` in place for a browse listing.
    pub fn sort_listing(&self, items: &mut [CatalogItem], key: SortKey) {
        sort_listing(items, key);
    }

    /// Full catalog listing, optionally restricted to one category, sorted by `key`.
    pub fn browse(&self, category: Option<Category>, key: SortKey) -> Result<Vec<CatalogItem>> {
        let mut items = self.store.all_items()?;
        if let Some(category) = category {
            items.retain(|item| item.category == Some(category));
        }
        self.sort_listing(&mut items, key);
        Ok(items)
    }
}
