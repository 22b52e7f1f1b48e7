use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{common::CategoryId, db::Category};

/// A category, as submitted for creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySpec {
    pub category: String,
}

/// Categories keyed by ID, serialised as `{"<id>": "<type>"}`.
pub type CategoryMap = BTreeMap<CategoryId, String>;

pub fn category_map(categories: Vec<Category>) -> CategoryMap {
    categories
        .into_iter()
        .map(|category| (category.id, category.name))
        .collect()
}

/// Response listing every category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryListing {
    pub categories: CategoryMap,
}

/// A category, as returned to the caller: `{id, type}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDescription {
    pub id: CategoryId,
    #[serde(rename = "type")]
    pub name: String,
}

impl From<Category> for CategoryDescription {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
        }
    }
}

/// Response to creating a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCreated {
    pub created: CategoryId,
    pub categories: Vec<CategoryDescription>,
}

#[cfg(test)]
mod tests {
    use rocket::serde::json::serde_json::{self, json};

    use super::*;

    #[test]
    fn map_keys_are_strings() {
        let categories = vec![
            Category {
                id: 2,
                name: "Art".to_string(),
            },
            Category {
                id: 1,
                name: "Science".to_string(),
            },
        ];
        let listing = CategoryListing {
            categories: category_map(categories),
        };
        assert_eq!(
            serde_json::to_value(&listing).unwrap(),
            json!({ "categories": { "1": "Science", "2": "Art" } })
        );
    }
}
