//! Turns one log call into the record handed to appenders
//!
//! Composition order without a wildcard serializer:
//!
//! 1. base fields (`level`, `time`, `pid`, `hostname`)
//! 2. logger bindings
//! 3. caller fields, each passed through its field serializer
//! 4. `msg`, when the call carried a message
//!
//! With a wildcard serializer the record above is passed to the wildcard and
//! replaced by its output. Base fields the wildcard leaves out are not added back.

use super::base_fields::BaseFields;
use super::error::{LoggerError, SerializerExecutionError, SerializerFault};
use super::field_key::FieldKey;
use super::log_level::LogLevel;
use super::record::{LogPayload, Record, MESSAGE_KEY};
use super::serializer::SerializerRegistry;
use serde_json::Value;

/// Serializers failed while composing a record
///
/// `record` holds everything that could be computed: every field whose
/// serializer succeeded, without the failed keys (or with the fallback value
/// in their place, see [`RecordCompositor::with_fallback`]). When the
/// wildcard failed it is the record the wildcard was given.
#[derive(Debug, thiserror::Error)]
#[error("{} serializer(s) failed while composing record", .errors.len())]
pub struct CompositionFailure {
    pub record: Record,
    pub errors: Vec<SerializerExecutionError>,
}

impl CompositionFailure {
    /// Whether the wildcard serializer is among the failures
    pub fn wildcard_failed(&self) -> bool {
        self.errors.iter().any(|e| e.key.is_wildcard())
    }

    /// The wildcard failure if there is one, else the first failure, as a [`LoggerError`]
    pub fn into_error(self) -> LoggerError {
        let wildcard = self.errors.iter().position(|e| e.key.is_wildcard());
        let mut errors = self.errors;
        let chosen = match wildcard {
            Some(idx) => Some(errors.swap_remove(idx)),
            None => errors.into_iter().next(),
        };
        match chosen {
            Some(error) => LoggerError::SerializerExecution(error),
            None => LoggerError::other("record composition failed"),
        }
    }
}

impl From<CompositionFailure> for LoggerError {
    fn from(failure: CompositionFailure) -> Self {
        failure.into_error()
    }
}

/// Borrowed view over one logger's serializers, bindings and base fields
pub struct RecordCompositor<'a> {
    registry: &'a SerializerRegistry,
    base_fields: &'a dyn BaseFields,
    bindings: Option<&'a Record>,
    fallback: Option<&'a Value>,
}

impl<'a> RecordCompositor<'a> {
    pub fn new(registry: &'a SerializerRegistry, base_fields: &'a dyn BaseFields) -> Self {
        Self {
            registry,
            base_fields,
            bindings: None,
            fallback: None,
        }
    }

    #[must_use]
    pub fn with_bindings(mut self, bindings: &'a Record) -> Self {
        self.bindings = Some(bindings);
        self
    }

    /// Value written in place of a field whose serializer failed
    ///
    /// The failure is still reported; the field keeps its position.
    #[must_use]
    pub fn with_fallback(mut self, fallback: &'a Value) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Pass each field through its serializer, appending results to `out`
    ///
    /// Fields without a serializer are moved through unchanged. A failing
    /// serializer leaves its field out and records the error; the remaining
    /// fields are still processed. With a fallback the field is kept, holding
    /// the fallback value.
    pub fn serialize_into(
        &self,
        fields: Record,
        out: &mut Record,
        errors: &mut Vec<SerializerExecutionError>,
    ) {
        for (key, value) in fields {
            match self.registry.get(&key) {
                None => {
                    out.insert(key, value);
                }
                Some(serializer) => match serializer.apply(&value) {
                    Ok(serialized) => {
                        out.insert(key, serialized);
                    }
                    Err(cause) => {
                        if let Some(fallback) = self.fallback {
                            out.insert(key.clone(), fallback.clone());
                        }
                        errors.push(SerializerExecutionError::new(FieldKey::Named(key), cause));
                    }
                },
            }
        }
    }

    /// Serialize a standalone set of fields, such as child bindings
    pub fn serialize_fields(&self, fields: Record) -> Result<Record, CompositionFailure> {
        let mut out = Record::with_capacity(fields.len());
        let mut errors = Vec::new();
        self.serialize_into(fields, &mut out, &mut errors);
        if errors.is_empty() {
            Ok(out)
        } else {
            Err(CompositionFailure {
                record: out,
                errors,
            })
        }
    }

    /// Compose the final record for one call
    pub fn compose(
        &self,
        level: LogLevel,
        payload: LogPayload,
    ) -> Result<Record, CompositionFailure> {
        let LogPayload { fields, message } = payload;

        let capacity = 4
            + self.bindings.map_or(0, |b| b.len())
            + fields.as_ref().map_or(0, |f| f.len())
            + usize::from(message.is_some());
        let mut record = Record::with_capacity(capacity);
        let mut errors = Vec::new();

        self.base_fields.write_base_fields(level, &mut record);
        if let Some(bindings) = self.bindings {
            for (key, value) in bindings {
                record.insert(key.clone(), value.clone());
            }
        }
        if let Some(fields) = fields {
            self.serialize_into(fields, &mut record, &mut errors);
        }
        if let Some(message) = message {
            record.insert(MESSAGE_KEY.to_string(), Value::String(message));
        }

        let Some(wildcard) = self.registry.wildcard() else {
            return if errors.is_empty() {
                Ok(record)
            } else {
                Err(CompositionFailure { record, errors })
            };
        };

        let merged = Value::Object(record);
        let fault = match wildcard.apply(&merged) {
            Ok(Value::Object(replaced)) if errors.is_empty() => return Ok(replaced),
            Ok(Value::Object(replaced)) => {
                return Err(CompositionFailure {
                    record: replaced,
                    errors,
                })
            }
            Ok(other) => SerializerFault::NotAnObject {
                found: value_kind(&other),
            },
            Err(fault) => fault,
        };

        errors.push(SerializerExecutionError::new(FieldKey::Wildcard, fault));
        let record = match merged {
            Value::Object(record) => record,
            _ => Record::new(),
        };
        Err(CompositionFailure { record, errors })
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
