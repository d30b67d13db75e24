use crate::config::FanOut;
use crate::index::{Field, IndexSnapshot};
use crate::item::{CatalogItem, ItemId};
use crate::tokenizer::analyze;
use std::collections::{HashMap, HashSet};

/// Items matched by a query and their accumulated relevance scores.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SearchHits {
    pub candidates: HashSet<ItemId>,
    pub scores: HashMap<ItemId, u32>,
}

impl SearchHits {
    pub fn is_empty(&self) -> bool { self.candidates.is_empty() }

    pub fn len(&self) -> usize { self.candidates.len() }

    /// Candidate ids in no particular order.
    pub fn ids(&self) -> Vec<ItemId> { self.candidates.iter().copied().collect() }
}

fn tally(snapshot: &IndexSnapshot, field: Field, term: &str) -> HashMap<ItemId, u32> {
    let mut partial = HashMap::new();
    if let Some(ids) = snapshot.postings(field, term) {
        for id in ids {
            *partial.entry(*id).or_insert(0) += field.weight();
        }
    }
    partial
}

pub fn search(query: &str, snapshot: &IndexSnapshot) -> SearchHits {
    search_with(query, snapshot, FanOut::Sequential)
}

/// Score every item whose name, description or keyword shares a term with
/// `query`.
///
/// Each posting occurrence adds the field weight, so an id posted twice for
/// the same term is counted twice.
pub fn search_with(query: &str, snapshot: &IndexSnapshot, fan_out: FanOut) -> SearchHits {
    let mut scores: HashMap<ItemId, u32> = HashMap::new();

    for term in analyze(query) {
        match fan_out {
            FanOut::Sequential => {
                for field in Field::ALL {
                    if let Some(ids) = snapshot.postings(field, &term) {
                        for id in ids {
                            *scores.entry(*id).or_insert(0) += field.weight();
                        }
                    }
                }
            }
            FanOut::PerField => {
                let (name, (description, keyword)) = rayon::join(
                    || tally(snapshot, Field::Name, &term),
                    || {
                        rayon::join(
                            || tally(snapshot, Field::Description, &term),
                            || tally(snapshot, Field::Keyword, &term),
                        )
                    },
                );
                for partial in [name, description, keyword] {
                    for (id, s) in partial {
                        *scores.entry(id).or_insert(0) += s;
                    }
                }
            }
        }
    }

    let candidates = scores.keys().copied().collect();
    SearchHits { candidates, scores }
}

/// Assign each item its score (0 when unscored) and order by score, highest
/// first. Equal scores keep their incoming relative order.
pub fn rank(mut items: Vec<CatalogItem>, scores: &HashMap<ItemId, u32>) -> Vec<CatalogItem> {
    for item in items.iter_mut() {
        item.relevance_score = scores.get(&item.id).copied().unwrap_or(0);
    }
    items.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));
    items
}
