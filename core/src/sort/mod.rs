//! Browse-listing sort: the comparator set and the algorithms that apply it.

pub mod compare;
pub mod intro;
pub mod merge;

use crate::error::Error;
use crate::item::CatalogItem;
use compare::{LessFn, OrderFn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use intro::{introsort, introsort_with_stats, IntroStats};
pub use merge::{merge_sort, tim_sort};

/// Ordering applied to a browse listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Popularity,
    Rating,
    PriceAsc,
    PriceDesc,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [SortKey::Popularity, SortKey::Rating, SortKey::PriceAsc, SortKey::PriceDesc];

    /// Storefront label shown in the sort drop-down.
    pub fn label(self) -> &'static str {
        match self {
            SortKey::Popularity => "Popular",
            SortKey::Rating => "Highly Rated",
            SortKey::PriceAsc => "Price (Asc.)",
            SortKey::PriceDesc => "Price (Desc.)",
        }
    }

    pub fn less(self) -> LessFn {
        match self {
            SortKey::Popularity => compare::by_popularity,
            SortKey::Rating => compare::by_rating,
            SortKey::PriceAsc => compare::by_price_asc,
            SortKey::PriceDesc => compare::by_price_desc,
        }
    }

    pub fn ordering(self) -> OrderFn {
        match self {
            SortKey::Popularity => compare::popularity_order,
            SortKey::Rating => compare::rating_order,
            SortKey::PriceAsc => compare::price_asc_order,
            SortKey::PriceDesc => compare::price_desc_order,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "popularity" | "popular" | "Popular" => Ok(SortKey::Popularity),
            "rating" | "Highly Rated" => Ok(SortKey::Rating),
            "price_asc" | "priceAsc" | "Price (Asc.)" => Ok(SortKey::PriceAsc),
            "price_desc" | "priceDesc" | "Price (Desc.)" => Ok(SortKey::PriceDesc),
            other => Err(Error::UnknownSortKey(other.to_string())),
        }
    }
}

/// Sorting algorithm used by [`sort_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Algorithm {
    #[default]
    Intro,
    Insertion,
    /// Stable.
    Merge,
    /// Stable.
    Tim,
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "intro" => Ok(Algorithm::Intro),
            "insertion" => Ok(Algorithm::Insertion),
            "merge" => Ok(Algorithm::Merge),
            "tim" => Ok(Algorithm::Tim),
            other => Err(format!("unknown sort algorithm: {other}")),
        }
    }
}

/// Introsort `items` in place, ascending under `lt`.
pub fn sort_by<T, F>(items: &mut [T], lt: F)
where
    F: FnMut(&T, &T) -> bool,
{
    introsort(items, lt);
}

/// Order a browse listing in place by `key`.
pub fn sort_listing(items: &mut [CatalogItem], key: SortKey) {
    sort_by(items, key.less());
}

pub fn sort_with(items: &mut [CatalogItem], key: SortKey, algorithm: Algorithm) {
    let mut lt = key.less();
    match algorithm {
        Algorithm::Intro => introsort(items, lt),
        Algorithm::Insertion => intro::insertion_sort(items, &mut lt),
        Algorithm::Merge => merge_sort(items, lt),
        Algorithm::Tim => tim_sort(items, lt),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemId;

    fn listing() -> Vec<CatalogItem> {
        let rows: [(ItemId, f64, u32, f64, u32, u32); 6] = [
            (1, 4.50, 120, 4.1, 30, 10),
            (2, 1.20, 800, 3.9, 210, 55),
            (3, 9.99, 15, 4.9, 12, 3),
            (4, 4.50, 120, 4.1, 30, 80),
            (5, 0.99, 800, 4.4, 95, 7),
            (6, 12.00, 0, 0.0, 0, 0),
        ];
        rows.iter()
            .map(|&(id, price, units_sold, rating, rating_count, inventory)| CatalogItem {
                price,
                units_sold,
                rating,
                rating_count,
                inventory,
                ..CatalogItem::new(id, format!("item {id}"))
            })
            .collect()
    }

    fn ids(items: &[CatalogItem]) -> Vec<ItemId> {
        items.iter().map(|i| i.id).collect()
    }

    #[test]
    fn sort_keys_produce_expected_orders() {
        let cases = [
            (SortKey::Popularity, vec![5, 2, 4, 1, 3, 6]),
            (SortKey::Rating, vec![3, 5, 4, 1, 2, 6]),
            (SortKey::PriceAsc, vec![5, 2, 4, 1, 3, 6]),
            (SortKey::PriceDesc, vec![6, 3, 4, 1, 2, 5]),
        ];
        for (key, expected) in cases {
            let mut items = listing();
            sort_listing(&mut items, key);
            assert_eq!(ids(&items), expected, "{key:?}");
        }
    }

    #[test]
    fn every_algorithm_agrees_on_total_orders() {
        for key in SortKey::ALL {
            let mut reference = listing();
            sort_listing(&mut reference, key);
            for algorithm in [Algorithm::Insertion, Algorithm::Merge, Algorithm::Tim] {
                let mut items = listing();
                sort_with(&mut items, key, algorithm);
                assert_eq!(ids(&items), ids(&reference), "{key:?} {algorithm:?}");
            }
        }
    }

    #[test]
    fn parses_keys_and_labels() {
        for key in SortKey::ALL {
            assert_eq!(key.label().parse::<SortKey>().unwrap(), key);
        }
        assert_eq!("priceDesc".parse::<SortKey>().unwrap(), SortKey::PriceDesc);
        assert_eq!("popularity".parse::<SortKey>().unwrap(), SortKey::Popularity);
    }

    #[test]
    fn unknown_key_is_a_validation_error() {
        let err = "cheapest".parse::<SortKey>().unwrap_err();
        assert!(matches!(err, Error::UnknownSortKey(ref k) if k == "cheapest"));
        assert!(err.is_invalid_input());
    }
}
