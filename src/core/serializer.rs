//! Field serializers and the immutable registry that resolves them
//!
//! A [`SerializerRegistry`] maps field names to [`Serializer`]s and optionally
//! holds one wildcard serializer that transforms the whole record. Registries
//! are never mutated after construction: [`SerializerRegistry::derive_with`]
//! layers overrides over a copy and returns a new registry, sharing the
//! unchanged serializer functions with its parent.

use super::error::{BoxError, LoggerError, Result, SerializerFault};
use super::field_key::FieldKey;
use super::std_serializers;
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};

type SerializeFn = dyn Fn(&Value) -> std::result::Result<Value, BoxError> + Send + Sync;

/// A transform applied to one field value, or to the whole record for the wildcard
///
/// Cloning is cheap: the function is shared behind an `Arc`.
///
/// # Example
///
/// ```
/// use rust_structured_logger::core::Serializer;
/// use serde_json::json;
///
/// let redact = Serializer::new(|_| json!("[redacted]"));
/// assert_eq!(redact.apply(&json!("hunter2")).unwrap(), json!("[redacted]"));
/// ```
#[derive(Clone)]
pub struct Serializer {
    func: Arc<SerializeFn>,
}

impl Serializer {
    /// Wrap an infallible transform
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(move |value| Ok(func(value))),
        }
    }

    /// Wrap a transform that may fail
    pub fn fallible<F, E>(func: F) -> Self
    where
        F: Fn(&Value) -> std::result::Result<Value, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        Self {
            func: Arc::new(move |value| func(value).map_err(Into::into)),
        }
    }

    /// Serializer that returns its input unchanged
    pub fn identity() -> Self {
        Self::new(Value::clone)
    }

    /// Run the transform, turning errors and panics into a [`SerializerFault`]
    pub fn apply(&self, value: &Value) -> std::result::Result<Value, SerializerFault> {
        match catch_unwind(AssertUnwindSafe(|| (self.func)(value))) {
            Ok(Ok(serialized)) => Ok(serialized),
            Ok(Err(e)) => Err(SerializerFault::Failed(e)),
            Err(panic_info) => {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                Err(SerializerFault::Panicked(panic_msg))
            }
        }
    }

    /// Whether both handles share the same function
    pub fn ptr_eq(&self, other: &Serializer) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for Serializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Serializer").finish_non_exhaustive()
    }
}

fn identity_serializer() -> &'static Serializer {
    static IDENTITY: OnceLock<Serializer> = OnceLock::new();
    IDENTITY.get_or_init(Serializer::identity)
}

/// One configured serializer, before validation
#[derive(Debug, Clone)]
pub enum SerializerEntry {
    /// A user supplied function
    Function(Serializer),
    /// A standard serializer looked up by name (`err`, `req`, `res`)
    Standard(String),
}

impl SerializerEntry {
    fn resolve(&self, key: &FieldKey) -> Result<Serializer> {
        match self {
            SerializerEntry::Function(serializer) => Ok(serializer.clone()),
            SerializerEntry::Standard(name) => std_serializers::by_name(name).ok_or_else(|| {
                LoggerError::invalid_serializer(
                    key.to_string(),
                    format!("unknown standard serializer '{}'", name),
                )
            }),
        }
    }
}

impl From<Serializer> for SerializerEntry {
    fn from(serializer: Serializer) -> Self {
        SerializerEntry::Function(serializer)
    }
}

/// Serializer configuration supplied to a root logger or a child
///
/// Keys are unique; inserting an existing key replaces its entry in place.
///
/// # Example
///
/// ```
/// use rust_structured_logger::core::{Serializer, SerializerMap};
/// use serde_json::json;
///
/// let map = SerializerMap::new()
///     .with("password", Serializer::new(|_| json!("***")))
///     .with_standard("err");
/// assert_eq!(map.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SerializerMap {
    entries: Vec<(FieldKey, SerializerEntry)>,
}

impl SerializerMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from string keys; `"*"` selects the wildcard
    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Serializer)>,
        K: Into<FieldKey>,
    {
        let mut map = Self::new();
        for (key, serializer) in entries {
            map.insert(key, serializer);
        }
        map
    }

    /// Add or replace an entry
    pub fn insert(&mut self, key: impl Into<FieldKey>, entry: impl Into<SerializerEntry>) {
        let key = key.into();
        let entry = entry.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => slot.1 = entry,
            None => self.entries.push((key, entry)),
        }
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<FieldKey>, serializer: Serializer) -> Self {
        self.insert(key, serializer);
        self
    }

    #[must_use]
    pub fn with_wildcard(mut self, serializer: Serializer) -> Self {
        self.insert(FieldKey::Wildcard, serializer);
        self
    }

    /// Register a standard serializer under its own name
    #[must_use]
    pub fn with_standard(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.insert(FieldKey::Named(name.clone()), SerializerEntry::Standard(name));
        self
    }

    /// Register a standard serializer under a different field name
    #[must_use]
    pub fn with_standard_as(mut self, key: impl Into<String>, name: impl Into<String>) -> Self {
        self.insert(FieldKey::Named(key.into()), SerializerEntry::Standard(name.into()));
        self
    }

    /// Merge `other` over `self`, later entries winning
    pub fn extend(&mut self, other: SerializerMap) {
        for (key, entry) in other.entries {
            self.insert(key, entry);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldKey, &SerializerEntry)> {
        self.entries.iter().map(|(key, entry)| (key, entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn validate_field_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(LoggerError::invalid_serializer(name, "field name is empty"));
    }
    if name.chars().any(char::is_control) {
        return Err(LoggerError::invalid_serializer(
            name.escape_default().to_string(),
            "field name contains control characters",
        ));
    }
    Ok(())
}

/// Immutable field → serializer mapping plus an optional wildcard
#[derive(Clone, Default)]
pub struct SerializerRegistry {
    entries: IndexMap<String, Serializer>,
    wildcard: Option<Serializer>,
}

impl SerializerRegistry {
    /// Empty registry: every field passes through, no wildcard
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a registry from an initial configuration
    pub fn new(initial: &SerializerMap) -> Result<Self> {
        Self::empty().derive_with(initial)
    }

    /// Return a new registry with `overrides` layered over this one
    ///
    /// Overridden fields keep their position, new fields are appended, and a
    /// wildcard in `overrides` replaces the inherited one. `self` is untouched.
    pub fn derive_with(&self, overrides: &SerializerMap) -> Result<Self> {
        let mut entries = self.entries.clone();
        let mut wildcard = self.wildcard.clone();

        for (key, entry) in overrides.iter() {
            let serializer = entry.resolve(key)?;
            match key {
                FieldKey::Wildcard => wildcard = Some(serializer),
                FieldKey::Named(name) => {
                    validate_field_name(name)?;
                    // Replacing an existing key keeps its position
                    entries.insert(name.clone(), serializer);
                }
            }
        }

        Ok(Self { entries, wildcard })
    }

    /// Serializer registered for `field`, if any
    pub fn get(&self, field: &str) -> Option<&Serializer> {
        self.entries.get(field)
    }

    /// Serializer for `field`, falling back to identity
    pub fn resolve(&self, field: &str) -> &Serializer {
        self.get(field).unwrap_or_else(|| identity_serializer())
    }

    pub fn wildcard(&self) -> Option<&Serializer> {
        self.wildcard.as_ref()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.entries.contains_key(field)
    }

    /// Registered field names in insertion order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of field entries, not counting the wildcard
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.wildcard.is_none()
    }
}

impl fmt::Debug for SerializerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializerRegistry")
            .field("fields", &self.fields().collect::<Vec<_>>())
            .field("wildcard", &self.wildcard.is_some())
            .finish()
    }
}
