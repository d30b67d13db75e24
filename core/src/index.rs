use crate::config::FanOut;
use crate::item::{CatalogItem, ItemId};
use crate::tokenizer::analyze;
use serde::Serialize;
use std::collections::HashMap;
use std::time::{Instant, SystemTime};

/// Item ids containing a term within one field, in catalog order.
///
/// Only an id equal to the list's last entry is suppressed, so an id can
/// appear more than once when the catalog repeats it non-adjacently.
pub type PostingList = Vec<ItemId>;

pub type TermIndex = HashMap<String, PostingList>;

/// Searchable text field of a catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Description,
    Keyword,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Name, Field::Description, Field::Keyword];

    /// Score added per posting occurrence when a query term hits this field.
    pub fn weight(self) -> u32 {
        match self {
            Field::Keyword => 4,
            Field::Name => 2,
            Field::Description => 1,
        }
    }

    pub fn text(self, item: &CatalogItem) -> &str {
        match self {
            Field::Name => &item.name,
            Field::Description => &item.description,
            Field::Keyword => &item.keyword,
        }
    }
}

/// Three per-field inverted indexes built from one catalog snapshot.
///
/// Never mutated once built; shared between queries behind an `Arc`.
#[derive(Debug)]
pub struct IndexSnapshot {
    name: TermIndex,
    description: TermIndex,
    keyword: TermIndex,
    item_count: usize,
    built_at: SystemTime,
}

impl Default for IndexSnapshot {
    fn default() -> Self {
        Self {
            name: TermIndex::new(),
            description: TermIndex::new(),
            keyword: TermIndex::new(),
            item_count: 0,
            built_at: SystemTime::UNIX_EPOCH,
        }
    }
}

impl IndexSnapshot {
    pub fn empty() -> Self { Self::default() }

    pub fn field(&self, field: Field) -> &TermIndex {
        match field {
            Field::Name => &self.name,
            Field::Description => &self.description,
            Field::Keyword => &self.keyword,
        }
    }

    pub fn postings(&self, field: Field, term: &str) -> Option<&[ItemId]> {
        self.field(field).get(term).map(Vec::as_slice)
    }

    /// Number of catalog items the snapshot was built from.
    pub fn item_count(&self) -> usize { self.item_count }

    pub fn term_count(&self, field: Field) -> usize { self.field(field).len() }

    pub fn built_at(&self) -> SystemTime { self.built_at }

    pub fn is_empty(&self) -> bool {
        Field::ALL.iter().all(|f| self.field(*f).is_empty())
    }
}

fn append_terms(index: &mut TermIndex, id: ItemId, text: &str) {
    for term in analyze(text) {
        let postings = index.entry(term).or_default();
        if postings.last() == Some(&id) {
            continue;
        }
        postings.push(id);
    }
}

/// Build a snapshot, processing fields sequentially.
pub fn build(items: &[CatalogItem]) -> IndexSnapshot {
    build_with(items, FanOut::Sequential)
}

/// Build a snapshot from `items`.
///
/// With [`FanOut::PerField`] each item's three fields are analyzed as joined
/// tasks, each writing only its own field map; the join completes before the
/// next item starts so posting order matches the sequential build exactly.
pub fn build_with(items: &[CatalogItem], fan_out: FanOut) -> IndexSnapshot {
    let start = Instant::now();
    let mut name = TermIndex::new();
    let mut description = TermIndex::new();
    let mut keyword = TermIndex::new();

    for item in items {
        match fan_out {
            FanOut::Sequential => {
                append_terms(&mut name, item.id, &item.name);
                append_terms(&mut description, item.id, &item.description);
                append_terms(&mut keyword, item.id, &item.keyword);
            }
            FanOut::PerField => {
                rayon::join(
                    || append_terms(&mut name, item.id, &item.name),
                    || {
                        rayon::join(
                            || append_terms(&mut description, item.id, &item.description),
                            || append_terms(&mut keyword, item.id, &item.keyword),
                        )
                    },
                );
            }
        }
    }

    tracing::debug!(
        items = items.len(),
        name_terms = name.len(),
        description_terms = description.len(),
        keyword_terms = keyword.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "built index snapshot"
    );

    IndexSnapshot { name, description, keyword, item_count: items.len(), built_at: SystemTime::now() }
}
