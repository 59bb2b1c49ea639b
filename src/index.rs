// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use crate::models::Category;

const UNCATEGORIZED: &str = "(uncategorized)";

/// Name lookups for categories and their account items.
///
/// References are not enforced anywhere, so every lookup falls back to the
/// raw id instead of failing.
#[derive(Debug, Clone, Default)]
pub struct CategoryIndex {
    categories: HashMap<String, Category>,
    items: HashMap<String, HashMap<String, String>>,
    all_items: HashMap<String, String>,
}

impl CategoryIndex {
    pub fn build(categories: &[Category]) -> Self {
        let mut idx = Self::default();
        for c in categories {
            let names: HashMap<String, String> = c
                .items
                .iter()
                .map(|i| (i.id.clone(), i.name.clone()))
                .collect();
            for (id, name) in &names {
                idx.all_items
                    .entry(id.clone())
                    .or_insert_with(|| name.clone());
            }
            idx.items.insert(c.id.clone(), names);
            idx.categories.insert(c.id.clone(), c.clone());
        }
        idx
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.get(id)
    }

    pub fn category_name<'a>(&'a self, id: &'a str) -> &'a str {
        if id.is_empty() {
            return UNCATEGORIZED;
        }
        self.categories
            .get(id)
            .map(|c| c.name.as_str())
            .unwrap_or(id)
    }

    pub fn item_name<'a>(&'a self, category_id: &str, item_id: &'a str) -> &'a str {
        if item_id.is_empty() {
            return UNCATEGORIZED;
        }
        self.items
            .get(category_id)
            .and_then(|m| m.get(item_id))
            .or_else(|| self.all_items.get(item_id))
            .map(|s| s.as_str())
            .unwrap_or(item_id)
    }

    /// Resolve a user-typed category reference by id, then by case-insensitive name.
    pub fn find(&self, id_or_name: &str) -> Option<&Category> {
        let key = id_or_name.trim();
        self.categories.get(key).or_else(|| {
            self.categories
                .values()
                .find(|c| c.name.eq_ignore_ascii_case(key))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
