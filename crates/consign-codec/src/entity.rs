use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A named, field-structured record.
///
/// Fields are kept sorted by name so that encoding is deterministic. The
/// entity itself does not know which field is its identifier; that is the
/// schema's concern.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity {
    fields: BTreeMap<String, String>,
}

impl Entity {
    /// Create an entity with no fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an entity from `(name, value)` pairs. Later pairs win.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Builder-style field setter.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Get a field value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Set a field, returning the previous value if any.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.fields.insert(name.into(), value.into())
    }

    /// Returns `true` if the field is present (even if empty).
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Iterate fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Field names in name order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the entity has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Entity {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_and_accessors() {
        let entity = Entity::new()
            .with_field("userName", "alice")
            .with_field("firstName", "Alice");
        assert_eq!(entity.get("userName"), Some("alice"));
        assert_eq!(entity.get("lastName"), None);
        assert!(entity.contains("firstName"));
        assert_eq!(entity.len(), 2);
    }

    #[test]
    fn set_returns_previous_value() {
        let mut entity = Entity::from_pairs([("to", "B")]);
        assert_eq!(entity.set("to", "C"), Some("B".to_string()));
        assert_eq!(entity.set("from", "A"), None);
        assert_eq!(entity.get("to"), Some("C"));
    }

    #[test]
    fn iteration_is_name_ordered() {
        let entity: Entity = [("to", "B"), ("from", "A"), ("packageID", "P1")]
            .into_iter()
            .collect();
        let names: Vec<&str> = entity.field_names().collect();
        assert_eq!(names, vec!["from", "packageID", "to"]);
    }

    #[test]
    fn from_pairs_later_pair_wins() {
        let entity = Entity::from_pairs([("k", "1"), ("k", "2")]);
        assert_eq!(entity.get("k"), Some("2"));
        assert_eq!(entity.len(), 1);
    }
}
