//! Custom message headers

use crate::domain::communication::errors::ValidationError;

/// Header name to value mapping.
///
/// Names are unique and the last write wins. Iteration follows the order in
/// which each name was first inserted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: Vec<(String, String)>,
}

impl HeaderMap {
    /// Create an empty header map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a header, overwriting any value stored under the same name.
    ///
    /// # Returns
    /// - [`Ok`] with the previous value, if any.
    /// - [`Err`] with [`ValidationError::BlankArgument`] when `name` or `value` is blank.
    pub fn insert(&mut self, name: &str, value: &str) -> Result<Option<String>, ValidationError> {
        if name.trim().is_empty() || value.trim().is_empty() {
            return Err(ValidationError::BlankArgument);
        }

        match self.entries.iter_mut().find(|(existing, _)| existing == name) {
            Some((_, existing)) => Ok(Some(std::mem::replace(existing, value.to_string()))),
            None => {
                self.entries.push((name.to_string(), value.to_string()));
                Ok(None)
            }
        }
    }

    /// Value stored under `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    /// Iterate over `(name, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Number of headers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no headers are set
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
