//! Total orders over catalog items used by browse listings.
//!
//! Each order ends its tie-break chain on inventory, so two items compare
//! equal only when every ranking attribute matches. Floats are compared with
//! `total_cmp`, which keeps the orders total even for NaN prices.

use crate::item::CatalogItem;
use std::cmp::Ordering;

/// Strict less-than predicate: `true` when the first item sorts before the second.
pub type LessFn = fn(&CatalogItem, &CatalogItem) -> bool;

pub type OrderFn = fn(&CatalogItem, &CatalogItem) -> Ordering;

/// Units sold desc, then price asc, rating desc, rating count desc, inventory desc.
pub fn popularity_order(a: &CatalogItem, b: &CatalogItem) -> Ordering {
    b.units_sold
        .cmp(&a.units_sold)
        .then_with(|| a.price.total_cmp(&b.price))
        .then_with(|| b.rating.total_cmp(&a.rating))
        .then_with(|| b.rating_count.cmp(&a.rating_count))
        .then_with(|| b.inventory.cmp(&a.inventory))
}

/// Rating desc, then rating count desc, price asc, units sold desc, inventory desc.
pub fn rating_order(a: &CatalogItem, b: &CatalogItem) -> Ordering {
    b.rating
        .total_cmp(&a.rating)
        .then_with(|| b.rating_count.cmp(&a.rating_count))
        .then_with(|| a.price.total_cmp(&b.price))
        .then_with(|| b.units_sold.cmp(&a.units_sold))
        .then_with(|| b.inventory.cmp(&a.inventory))
}

fn after_price(a: &CatalogItem, b: &CatalogItem) -> Ordering {
    b.units_sold
        .cmp(&a.units_sold)
        .then_with(|| b.rating.total_cmp(&a.rating))
        .then_with(|| b.rating_count.cmp(&a.rating_count))
        .then_with(|| b.inventory.cmp(&a.inventory))
}

/// Price asc, then units sold desc, rating desc, rating count desc, inventory desc.
pub fn price_asc_order(a: &CatalogItem, b: &CatalogItem) -> Ordering {
    a.price.total_cmp(&b.price).then_with(|| after_price(a, b))
}

/// Price desc with the same tie-breaks as [`price_asc_order`].
pub fn price_desc_order(a: &CatalogItem, b: &CatalogItem) -> Ordering {
    b.price.total_cmp(&a.price).then_with(|| after_price(a, b))
}

pub fn by_popularity(a: &CatalogItem, b: &CatalogItem) -> bool {
    popularity_order(a, b) == Ordering::Less
}

pub fn by_rating(a: &CatalogItem, b: &CatalogItem) -> bool {
    rating_order(a, b) == Ordering::Less
}

pub fn by_price_asc(a: &CatalogItem, b: &CatalogItem) -> bool {
    price_asc_order(a, b) == Ordering::Less
}

pub fn by_price_desc(a: &CatalogItem, b: &CatalogItem) -> bool {
    price_desc_order(a, b) == Ordering::Less
}
