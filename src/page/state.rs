//! Explicit view-state objects for modeled elements.
//!
//! Behaviors never mutate ambient host state; they update these objects,
//! and the host renders from them.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Inline style properties for a modeled element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StyleState {
    properties: BTreeMap<String, String>,
}

impl StyleState {
    /// Create an empty style state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a style property, replacing any existing value.
    pub fn set(&mut self, property: &str, value: &str) {
        self.properties
            .insert(property.to_string(), value.to_string());
    }

    /// Remove a style property.
    pub fn clear(&mut self, property: &str) {
        self.properties.remove(property);
    }

    /// Get the current value of a style property.
    pub fn get(&self, property: &str) -> Option<&str> {
        self.properties.get(property).map(String::as_str)
    }

    /// Number of set properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether no properties are set.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// Class membership for a modeled element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassList {
    classes: BTreeSet<String>,
}

impl ClassList {
    /// Create an empty class list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a class. Adding an existing class is a no-op.
    pub fn add(&mut self, class: &str) {
        self.classes.insert(class.to_string());
    }

    /// Remove a class if present.
    pub fn remove(&mut self, class: &str) {
        self.classes.remove(class);
    }

    /// Whether the class is present.
    pub fn contains(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    /// Classes in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_set_and_clear() {
        let mut style = StyleState::new();
        style.set("box-shadow", "none");
        style.set("box-shadow", "0 2px 8px rgba(0, 0, 0, 0.08)");
        assert_eq!(style.get("box-shadow"), Some("0 2px 8px rgba(0, 0, 0, 0.08)"));
        assert_eq!(style.len(), 1);

        style.clear("box-shadow");
        assert!(style.is_empty());
    }

    #[test]
    fn test_class_list_membership() {
        let mut classes = ClassList::new();
        classes.add("fade-in");
        classes.add("fade-in");
        assert!(classes.contains("fade-in"));
        assert_eq!(classes.iter().count(), 1);

        classes.remove("fade-in");
        assert!(!classes.contains("fade-in"));
    }
}
