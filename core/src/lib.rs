//! Search and ranking core for a marketplace catalog.
//!
//! Builds a per-field inverted index over catalog items, resolves free-text
//! queries into weighted relevance scores, and sorts browse listings with an
//! introspective sort.

pub mod catalog;
pub mod config;
pub mod error;
pub mod index;
pub mod item;
pub mod lifecycle;
pub mod search;
pub mod sort;
pub mod tokenizer;

pub use catalog::{CatalogStore, FileCatalog, MemoryCatalog};
pub use config::{EngineConfig, FanOut};
pub use error::{Error, Result};
pub use index::{build, build_with, Field, IndexSnapshot, PostingList, TermIndex};
pub use item::{CatalogItem, Category, ItemId};
pub use lifecycle::{IndexManager, SearchPage};
pub use search::{rank, search, search_with, SearchHits};
pub use sort::{sort_by, sort_listing, sort_with, Algorithm, SortKey};
