use marketsearch_core::{
    build, rank, search, CatalogItem, CatalogStore, EngineConfig, Error, FanOut, IndexManager, ItemId,
    MemoryCatalog, Result,
};
use parking_lot::Mutex;
use std::sync::Arc;

fn apple_catalog() -> Vec<CatalogItem> {
    vec![
        CatalogItem { keyword: "Apple".into(), price: 1.0, ..CatalogItem::new(1, "Gala") },
        CatalogItem { price: 6.5, ..CatalogItem::new(2, "Apple Pie") },
    ]
}

#[test]
fn keyword_match_outranks_name_match() {
    let snapshot = build(&apple_catalog());
    let hits = search("apple", &snapshot);
    assert_eq!(hits.scores[&1], 4);
    assert_eq!(hits.scores[&2], 2);

    let ranked = rank(apple_catalog(), &hits.scores);
    assert_eq!(ranked.iter().map(|i| i.id).collect::<Vec<_>>(), vec![1, 2]);
}

#[test]
fn perform_search_hydrates_and_ranks() {
    let manager = IndexManager::new(Arc::new(MemoryCatalog::new(apple_catalog())), EngineConfig::default());
    manager.refresh().unwrap();

    let results = manager.perform_search("Apples").unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id, 1);
    assert_eq!(results[0].relevance_score, 4);
    // hydrated from the store, not the searchable projection
    assert_eq!(results[1].price, 6.5);
}

#[test]
fn empty_catalog_yields_empty_results() {
    let manager = IndexManager::new(Arc::new(MemoryCatalog::default()), EngineConfig::default());
    manager.refresh().unwrap();
    assert!(manager.search("anything").candidates.is_empty());
    assert!(manager.perform_search("anything").unwrap().is_empty());
    assert!(manager.perform_search("").unwrap().is_empty());
}

/// Store that can be switched into a failing state.
struct FlakyCatalog {
    inner: MemoryCatalog,
    failing: Mutex<bool>,
}

impl CatalogStore for FlakyCatalog {
    fn all_searchable_items(&self) -> Result<Vec<CatalogItem>> {
        if *self.failing.lock() {
            return Err(Error::Catalog("connection refused".into()));
        }
        self.inner.all_searchable_items()
    }

    fn items_by_ids(&self, ids: &[ItemId]) -> Result<Vec<CatalogItem>> {
        self.inner.items_by_ids(ids)
    }

    fn all_items(&self) -> Result<Vec<CatalogItem>> {
        self.inner.all_items()
    }
}

#[test]
fn failed_refresh_keeps_previous_snapshot() {
    let store = Arc::new(FlakyCatalog { inner: MemoryCatalog::new(apple_catalog()), failing: Mutex::new(false) });
    let manager = IndexManager::new(store.clone(), EngineConfig::default());
    manager.refresh().unwrap();
    let published = manager.snapshot();

    *store.failing.lock() = true;
    store.inner.replace(Vec::new());
    assert!(matches!(manager.refresh(), Err(Error::Catalog(_))));

    assert!(Arc::ptr_eq(&published, &manager.snapshot()));
    assert_eq!(manager.search("apple").len(), 2);

    *store.failing.lock() = false;
    manager.refresh().unwrap();
    assert!(manager.search("apple").is_empty());
}

#[test]
fn concurrent_readers_never_see_a_partial_snapshot() {
    let items: Vec<CatalogItem> = (0..200).map(|i| CatalogItem::new(i, "oak table")).collect();
    let catalog = Arc::new(MemoryCatalog::new(items.clone()));
    let config = EngineConfig { fan_out: FanOut::PerField, ..EngineConfig::default() };
    let manager = Arc::new(IndexManager::new(catalog.clone(), config));
    manager.refresh().unwrap();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let manager = manager.clone();
            std::thread::spawn(move || {
                for _ in 0..200 {
                    let n = manager.search("oak").len();
                    assert!(n == 200 || n == 100, "observed {n} candidates");
                }
            })
        })
        .collect();

    for round in 0..20 {
        let size = if round % 2 == 0 { 100 } else { 200 };
        catalog.replace(items[..size].to_vec());
        manager.refresh().unwrap();
    }
    for r in readers {
        r.join().unwrap();
    }
}

#[test]
fn browse_filters_by_category_and_sorts() {
    use marketsearch_core::{Category, SortKey};
    let items = vec![
        CatalogItem { price: 3.0, category: Some(Category::Beverages), ..CatalogItem::new(1, "Cola") },
        CatalogItem { price: 1.0, category: Some(Category::Staples), ..CatalogItem::new(2, "Rice") },
        CatalogItem { price: 2.0, category: Some(Category::Beverages), ..CatalogItem::new(3, "Tea") },
    ];
    let manager = IndexManager::new(Arc::new(MemoryCatalog::new(items)), EngineConfig::default());

    let drinks = manager.browse(Some(Category::Beverages), SortKey::PriceAsc).unwrap();
    assert_eq!(drinks.iter().map(|i| i.id).collect::<Vec<_>>(), vec![3, 1]);

    let everything = manager.browse(None, SortKey::PriceDesc).unwrap();
    assert_eq!(everything.iter().map(|i| i.id).collect::<Vec<_>>(), vec![1, 3, 2]);
}
