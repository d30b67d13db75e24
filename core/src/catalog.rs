//! Catalog store boundary: where item snapshots and hydrated results come from.

use crate::error::Result;
use crate::item::{CatalogItem, ItemId};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Source of catalog items, shared between the refresh task and request handlers.
pub trait CatalogStore: Send + Sync {
    /// Items with at least their id and searchable text fields populated.
    fn all_searchable_items(&self) -> Result<Vec<CatalogItem>>;

    /// Fully populated items for `ids`, in any order. Unknown ids are skipped.
    fn items_by_ids(&self, ids: &[ItemId]) -> Result<Vec<CatalogItem>>;

    /// Every fully populated item, for browse listings.
    fn all_items(&self) -> Result<Vec<CatalogItem>>;
}

fn select(items: &[CatalogItem], ids: &[ItemId]) -> Vec<CatalogItem> {
    let wanted: HashSet<ItemId> = ids.iter().copied().collect();
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|item| wanted.contains(&item.id) && seen.insert(item.id))
        .cloned()
        .collect()
}

/// In-process catalog held in memory.
#[derive(Default)]
pub struct MemoryCatalog {
    items: RwLock<Vec<CatalogItem>>,
}

impl MemoryCatalog {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self { items: RwLock::new(items) }
    }

    /// Swap the whole catalog; seen by the next index refresh.
    pub fn replace(&self, items: Vec<CatalogItem>) {
        *self.items.write() = items;
    }

    /// Insert `item`, or overwrite the existing item with the same id.
    pub fn upsert(&self, item: CatalogItem) {
        let mut items = self.items.write();
        match items.iter_mut().find(|i| i.id == item.id) {
            Some(slot) => *slot = item,
            None => items.push(item),
        }
    }

    pub fn len(&self) -> usize { self.items.read().len() }

    pub fn is_empty(&self) -> bool { self.items.read().is_empty() }
}

impl CatalogStore for MemoryCatalog {
    fn all_searchable_items(&self) -> Result<Vec<CatalogItem>> {
        Ok(self.items.read().iter().map(CatalogItem::searchable).collect())
    }

    fn items_by_ids(&self, ids: &[ItemId]) -> Result<Vec<CatalogItem>> {
        Ok(select(&self.items.read(), ids))
    }

    fn all_items(&self) -> Result<Vec<CatalogItem>> {
        Ok(self.items.read().clone())
    }
}

/// Catalog read from JSON files on every call.
///
/// `path` is either a single file or a directory walked recursively for
/// `.json` (an array of items or a single item) and `.jsonl` (one item per
/// line) files. Re-reading on each call lets edits reach the next refresh.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path { &self.path }

    fn files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        if self.path.is_dir() {
            for entry in WalkDir::new(&self.path).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
                let p = entry.path();
                if p.is_file() {
                    if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
                        if matches!(ext, "json" | "jsonl") {
                            files.push(p.to_path_buf());
                        }
                    }
                }
            }
        } else {
            files.push(self.path.clone());
        }
        files
    }

    pub fn load(&self) -> Result<Vec<CatalogItem>> {
        let mut items = Vec::new();
        for file in self.files() {
            if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
                load_jsonl(&file, &mut items)?;
            } else {
                load_json(&file, &mut items)?;
            }
        }
        tracing::debug!(path = %self.path.display(), items = items.len(), "loaded catalog");
        Ok(items)
    }
}

fn load_jsonl(file: &Path, items: &mut Vec<CatalogItem>) -> Result<()> {
    let reader = BufReader::new(File::open(file)?);
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        items.push(serde_json::from_str(&line)?);
    }
    Ok(())
}

fn load_json(file: &Path, items: &mut Vec<CatalogItem>) -> Result<()> {
    let reader = BufReader::new(File::open(file)?);
    let json: serde_json::Value = serde_json::from_reader(reader)?;
    match json {
        serde_json::Value::Array(arr) => {
            for v in arr {
                items.push(serde_json::from_value(v)?);
            }
        }
        serde_json::Value::Object(_) => items.push(serde_json::from_value(json)?),
        _ => {}
    }
    Ok(())
}

impl CatalogStore for FileCatalog {
    fn all_searchable_items(&self) -> Result<Vec<CatalogItem>> {
        Ok(self.load()?.iter().map(CatalogItem::searchable).collect())
    }

    fn items_by_ids(&self, ids: &[ItemId]) -> Result<Vec<CatalogItem>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(select(&self.all_items()?, ids))
    }

    fn all_items(&self) -> Result<Vec<CatalogItem>> {
        let items = self.load()?;
        // last record wins when a file set repeats an id
        let mut latest: HashMap<ItemId, usize> = HashMap::new();
        for (pos, item) in items.iter().enumerate() {
            latest.insert(item.id, pos);
        }
        Ok(items
            .into_iter()
            .enumerate()
            .filter(|(pos, item)| latest.get(&item.id) == Some(pos))
            .map(|(_, item)| item)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn memory_catalog_upsert_and_lookup() {
        let catalog = MemoryCatalog::new(vec![CatalogItem::new(1, "tea"), CatalogItem::new(2, "coffee")]);
        catalog.upsert(CatalogItem { price: 3.5, ..CatalogItem::new(2, "espresso") });
        catalog.upsert(CatalogItem::new(3, "cocoa"));
        assert_eq!(catalog.len(), 3);

        let found = catalog.items_by_ids(&[2, 9]).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "espresso");
        assert_eq!(found[0].price, 3.5);
    }

    #[test]
    fn searchable_items_drop_ranking_attributes() {
        let catalog = MemoryCatalog::new(vec![CatalogItem { price: 9.0, keyword: "k".into(), ..CatalogItem::new(1, "n") }]);
        let items = catalog.all_searchable_items().unwrap();
        assert_eq!(items[0].keyword, "k");
        assert_eq!(items[0].price, 0.0);
    }

    #[test]
    fn file_catalog_reads_json_and_jsonl_directories() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("a.json"),
            r#"[{"id":1,"name":"Apple Pie","price":4.0},{"id":2,"name":"Pear"}]"#,
        )
        .unwrap();
        fs::create_dir(dir.path().join("more")).unwrap();
        fs::write(
            dir.path().join("more/b.jsonl"),
            "{\"id\":3,\"name\":\"Plum\",\"category\":\"fruit_and_vegetables\"}\n\n{\"id\":4,\"name\":\"Fig\"}\n",
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let catalog = FileCatalog::new(dir.path());
        let all = catalog.all_items().unwrap();
        assert_eq!(all.len(), 4);
        let plum = catalog.items_by_ids(&[3]).unwrap();
        assert_eq!(plum[0].category, Some(crate::item::Category::FruitAndVegetables));
    }

    #[test]
    fn file_catalog_repeated_id_resolves_to_last_record() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.json"), r#"[{"id":1,"name":"Old Kettle","price":10.0}]"#).unwrap();
        fs::write(dir.path().join("b.jsonl"), "{\"id\":1,\"name\":\"New Kettle\",\"price\":12.0}\n").unwrap();

        let catalog = FileCatalog::new(dir.path());
        let listed = catalog.all_items().unwrap();
        let hydrated = catalog.items_by_ids(&[1]).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(hydrated.len(), 1);
        assert_eq!(hydrated[0].name, "New Kettle");
        assert_eq!(hydrated[0], listed[0]);
    }

    #[test]
    fn file_catalog_reports_missing_and_malformed_files() {
        let dir = tempdir().unwrap();
        assert!(FileCatalog::new(dir.path().join("missing.json")).load().is_err());

        let bad = dir.path().join("bad.jsonl");
        fs::write(&bad, "{not json}\n").unwrap();
        assert!(matches!(FileCatalog::new(&bad).load(), Err(crate::Error::Json(_))));
    }
}
