use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type ItemId = u32;

/// Storefront category a listing is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    FrozenFood,
    Staples,
    MeatAndSeafood,
    Beverages,
    FruitAndVegetables,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::FrozenFood,
        Category::Staples,
        Category::MeatAndSeafood,
        Category::Beverages,
        Category::FruitAndVegetables,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::FrozenFood => "Frozen Food",
            Category::Staples => "Staples",
            Category::MeatAndSeafood => "Meat and Seafood",
            Category::Beverages => "Beverages",
            Category::FruitAndVegetables => "Fruit and Vegetables",
        }
    }

    fn slug(self) -> &'static str {
        match self {
            Category::FrozenFood => "frozen_food",
            Category::Staples => "staples",
            Category::MeatAndSeafood => "meat_and_seafood",
            Category::Beverages => "beverages",
            Category::FruitAndVegetables => "fruit_and_vegetables",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = Error;

    /// Accepts either the storefront label or the snake_case slug.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.label() == s || c.slug() == s)
            .ok_or_else(|| Error::UnknownCategory(s.to_string()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub rating_count: u32,
    #[serde(default)]
    pub units_sold: u32,
    #[serde(default)]
    pub inventory: u32,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub seller_id: Option<String>,
    /// Assigned per query by the ranker; never read from or written to the catalog.
    #[serde(skip)]
    pub relevance_score: u32,
}

impl CatalogItem {
    pub fn new(id: ItemId, name: impl Into<String>) -> Self {
        Self { id, name: name.into(), ..Default::default() }
    }

    /// Copy holding only the fields the index builder reads.
    pub fn searchable(&self) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            keyword: self.keyword.clone(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_label_and_slug() {
        assert_eq!("Meat and Seafood".parse::<Category>().unwrap(), Category::MeatAndSeafood);
        assert_eq!("beverages".parse::<Category>().unwrap(), Category::Beverages);
        assert!(matches!("Toys".parse::<Category>(), Err(Error::UnknownCategory(_))));
    }

    #[test]
    fn relevance_score_is_not_serialized() {
        let mut item = CatalogItem::new(7, "Apple Pie");
        item.relevance_score = 9;
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("relevance_score").is_none());

        let back: CatalogItem = serde_json::from_str(r#"{"id":7,"name":"Apple Pie"}"#).unwrap();
        assert_eq!(back.relevance_score, 0);
        assert_eq!(back.description, "");
    }
}
