//! Flat parameter mapping shared by every component.
//!
//! Configuration reaches the core as a single string-keyed float mapping.
//! It is loaded once per experiment and never mutated during a run.
//! Components that need a fixed set of keys build a typed view from it
//! with [`ParamMap::require`], which fails on the first missing key rather
//! than silently defaulting. Controllers that document their own defaults
//! use [`ParamMap::get_or`] instead.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Errors raised when reading configuration values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamError {
    /// A required parameter is absent from the mapping.
    #[error("missing required parameter `{key}`")]
    Missing {
        /// Name of the missing parameter.
        key: String,
    },

    /// A parameter is present but cannot be used as requested.
    #[error("invalid value for parameter `{key}`: {value} ({reason})")]
    Invalid {
        /// Name of the offending parameter.
        key: String,
        /// The value found in the mapping.
        value: f64,
        /// Why the value was rejected.
        reason: &'static str,
    },
}

/// Flat `name -> value` configuration mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamMap(BTreeMap<String, f64>);

impl ParamMap {
    /// Create an empty mapping.
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Look up a parameter.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.0.get(key).copied()
    }

    /// Look up a required parameter.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::Missing`] if the key is absent.
    pub fn require(&self, key: &str) -> Result<f64, ParamError> {
        self.get(key).ok_or_else(|| ParamError::Missing {
            key: key.to_owned(),
        })
    }

    /// Look up a required non-negative count (horizon, window length).
    ///
    /// The value is rounded to the nearest integer.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::Missing`] if the key is absent, or
    /// [`ParamError::Invalid`] if the value is negative or not finite.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn require_count(&self, key: &str) -> Result<usize, ParamError> {
        let value = self.require(key)?;
        if !value.is_finite() || value < 0.0 {
            return Err(ParamError::Invalid {
                key: key.to_owned(),
                value,
                reason: "expected a non-negative count",
            });
        }
        Ok(value.round() as usize)
    }

    /// Look up a parameter, falling back to a documented default.
    pub fn get_or(&self, key: &str, default: f64) -> f64 {
        self.get(key).unwrap_or(default)
    }

    /// Insert or replace a parameter, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: f64) -> Option<f64> {
        self.0.insert(key.into(), value)
    }

    /// Builder-style [`ParamMap::set`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: f64) -> Self {
        self.set(key, value);
        self
    }

    /// Overlay `other` onto this mapping; values in `other` win.
    pub fn merge(&mut self, other: &Self) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), *value);
        }
    }

    /// Remove a parameter, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<f64> {
        self.0.remove(key)
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the mapping is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FromIterator<(String, f64)> for ParamMap {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<(&'a str, f64)> for ParamMap {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.to_owned(), v)).collect())
    }
}

impl From<BTreeMap<String, f64>> for ParamMap {
    fn from(map: BTreeMap<String, f64>) -> Self {
        Self(map)
    }
}
