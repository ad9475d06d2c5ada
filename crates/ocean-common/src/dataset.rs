//! Named collections of fields sharing a grid.

use crate::field::GriddedField;

/// An insertion-ordered set of named fields.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    variables: Vec<(String, GriddedField)>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, replacing any existing field with the same name in place.
    pub fn insert(&mut self, name: impl Into<String>, field: GriddedField) {
        let name = name.into();
        match self.variables.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = field,
            None => self.variables.push((name, field)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&GriddedField> {
        self.variables
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, field)| field)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variables.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &GriddedField)> {
        self.variables.iter().map(|(n, f)| (n.as_str(), f))
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}
