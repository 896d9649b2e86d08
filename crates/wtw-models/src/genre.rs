use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::coerce::coerce_number;

/// Genre id → display name lookup built from the catalog's genre list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreMap {
    names: HashMap<i64, String>,
}

impl GenreMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (i64, S)>,
        S: Into<String>,
    {
        Self {
            names: pairs.into_iter().map(|(id, name)| (id, name.into())).collect(),
        }
    }

    /// Build from a `{"genres": [{"id": .., "name": ..}]}` response.
    ///
    /// Entries without a numeric id or a string name are skipped.
    pub fn from_response(raw: &Value) -> Self {
        let names = raw
            .get("genres")
            .and_then(Value::as_array)
            .map(|list| {
                list.iter()
                    .filter_map(|item| {
                        let id = item.get("id").and_then(coerce_number)?;
                        let name = item.get("name").and_then(Value::as_str)?;
                        Some((id as i64, name.to_string()))
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self { names }
    }

    pub fn name(&self, id: i64) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    pub fn insert(&mut self, id: i64, name: impl Into<String>) {
        self.names.insert(id, name.into());
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Entries ordered alphabetically by name, ties broken by id
    pub fn sorted_by_name(&self) -> Vec<(i64, &str)> {
        let mut entries: Vec<(i64, &str)> = self
            .names
            .iter()
            .map(|(id, name)| (*id, name.as_str()))
            .collect();
        entries.sort_by(|a, b| a.1.cmp(b.1).then(a.0.cmp(&b.0)));
        entries
    }
}
