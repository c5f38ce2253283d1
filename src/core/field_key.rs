//! Keys under which serializers are registered

use std::fmt;

/// Reserved key that selects the wildcard serializer in string-keyed configuration
pub const WILDCARD_KEY: &str = "*";

/// Key of a serializer entry
///
/// The wildcard is a distinct variant, so no user field name can collide with
/// it. Only string-keyed configuration maps the reserved [`WILDCARD_KEY`] onto it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldKey {
    /// Whole-record transform
    Wildcard,
    /// Transform for one record field
    Named(String),
}

impl FieldKey {
    /// Key for an ordinary field
    pub fn named(name: impl Into<String>) -> Self {
        FieldKey::Named(name.into())
    }

    /// Interpret a configuration key, mapping `"*"` to the wildcard
    pub fn parse(key: &str) -> Self {
        if key == WILDCARD_KEY {
            FieldKey::Wildcard
        } else {
            FieldKey::Named(key.to_string())
        }
    }

    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        matches!(self, FieldKey::Wildcard)
    }

    /// Field name, or `None` for the wildcard
    pub fn as_name(&self) -> Option<&str> {
        match self {
            FieldKey::Wildcard => None,
            FieldKey::Named(name) => Some(name),
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKey::Wildcard => f.write_str(WILDCARD_KEY),
            FieldKey::Named(name) => f.write_str(name),
        }
    }
}

impl From<&str> for FieldKey {
    fn from(key: &str) -> Self {
        FieldKey::parse(key)
    }
}

impl From<String> for FieldKey {
    fn from(key: String) -> Self {
        if key == WILDCARD_KEY {
            FieldKey::Wildcard
        } else {
            FieldKey::Named(key)
        }
    }
}
