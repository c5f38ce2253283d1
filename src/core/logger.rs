//! Logger nodes: root loggers, child derivation and the log call path

use super::{
    appender::Appender,
    base_fields::{BaseFields, ProcessBaseFields},
    compositor::{CompositionFailure, RecordCompositor},
    error::Result,
    field_key::FieldKey,
    log_level::LogLevel,
    metrics::LoggerMetrics,
    record::{LogPayload, Record},
    serializer::{Serializer, SerializerMap, SerializerRegistry},
    timestamp::TimestampFormat,
};
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, Weak};

/// What a logger does when a field serializer fails
///
/// A failing wildcard serializer always propagates: there is no single field
/// to leave out, and the wildcard owns the record shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SerializerFailurePolicy {
    /// Emit nothing and return the first failure to the caller
    #[default]
    Propagate,

    /// Emit the record without the failing fields
    OmitField,

    /// Emit the record with each failing field set to this value
    Substitute(Value),
}

/// State shared by a root logger and all of its descendants
struct Shared {
    appenders: Mutex<Vec<Box<dyn Appender>>>,
    metrics: LoggerMetrics,
    base_fields: Arc<dyn BaseFields>,
    failure_policy: SerializerFailurePolicy,
}

impl Shared {
    fn new(
        appenders: Vec<Box<dyn Appender>>,
        base_fields: Arc<dyn BaseFields>,
        failure_policy: SerializerFailurePolicy,
    ) -> Arc<Self> {
        Arc::new(Self {
            appenders: Mutex::new(appenders),
            metrics: LoggerMetrics::new(),
            base_fields,
            failure_policy,
        })
    }

    /// Deliver a record to every appender with per-appender panic isolation
    ///
    /// One failing appender does not prevent the others from receiving the record.
    fn dispatch(&self, record: &Record) {
        let mut appenders = self.appenders.lock();
        let mut has_error = false;

        for (idx, appender) in appenders.iter_mut().enumerate() {
            let append_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                appender.append(record)
            }));

            match append_result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!(
                        "[LOGGER ERROR] Appender #{} ({}) failed: {}",
                        idx,
                        appender.name(),
                        e
                    );
                    has_error = true;
                }
                Err(panic_info) => {
                    let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                        s.to_string()
                    } else if let Some(s) = panic_info.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "Unknown panic".to_string()
                    };
                    eprintln!(
                        "[LOGGER CRITICAL] Appender #{} panicked: {}. \
                         Other appenders continue to function.",
                        idx, panic_msg
                    );
                    has_error = true;
                }
            }
        }

        if has_error {
            self.metrics.record_dropped();
        } else {
            self.metrics.record_logged();
        }
    }

    fn flush(&self) -> Result<()> {
        let mut appenders = self.appenders.lock();
        for appender in appenders.iter_mut() {
            appender.flush()?;
        }
        Ok(())
    }

    /// Fallback value handed to the compositor for the substitute policy
    fn fallback(&self) -> Option<&Value> {
        match &self.failure_policy {
            SerializerFailurePolicy::Substitute(value) => Some(value),
            _ => None,
        }
    }

    /// Apply the failure policy to a failed composition
    fn recover(&self, failure: CompositionFailure) -> Result<Record> {
        for _ in &failure.errors {
            self.metrics.record_serializer_failure();
        }

        if failure.wildcard_failed()
            || self.failure_policy == SerializerFailurePolicy::Propagate
        {
            return Err(failure.into_error());
        }

        let outcome = match self.failure_policy {
            SerializerFailurePolicy::Substitute(_) => "fallback value substituted",
            _ => "field left out of record",
        };
        for error in &failure.errors {
            eprintln!("[LOGGER WARNING] {}; {}", error, outcome);
        }
        Ok(failure.record)
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }

        let dropped = self.metrics.dropped_count();
        if dropped > 0 {
            eprintln!(
                "[LOGGER WARNING] Logger shutting down with {} dropped logs (drop rate: {:.2}%)",
                dropped,
                self.metrics.drop_rate()
            );
        }
    }
}

struct LoggerNode {
    registry: Arc<SerializerRegistry>,
    bindings: Record,
    min_level: RwLock<LogLevel>,
    parent: Option<Weak<LoggerNode>>,
    depth: usize,
    shared: Arc<Shared>,
}

/// A logger instance, either a root or a child derived from another logger
///
/// Each logger owns an immutable [`SerializerRegistry`]. Deriving a child with
/// [`Logger::child`] layers the child's serializers over the parent's and never
/// changes the parent. Appenders and metrics are shared along the hierarchy.
///
/// Cloning a `Logger` yields another handle to the same node.
///
/// # Example
///
/// ```
/// use rust_structured_logger::prelude::*;
/// use serde_json::json;
///
/// let capture = MemoryAppender::new();
/// let parent = Logger::builder()
///     .serializer("test", Serializer::new(|_| json!("parent")))
///     .appender(capture.clone())
///     .build()
///     .unwrap();
/// let child = parent
///     .child(ChildOptions::new().serializer("test", Serializer::new(|_| json!("child"))))
///     .unwrap();
///
/// parent.fatal(json!({"test": "x"})).unwrap();
/// child.fatal(json!({"test": "x"})).unwrap();
///
/// let records = capture.records();
/// assert_eq!(records[0]["test"], "parent");
/// assert_eq!(records[1]["test"], "child");
/// ```
#[derive(Clone)]
pub struct Logger {
    node: Arc<LoggerNode>,
}

impl Logger {
    /// Root logger with no serializers, no appenders and default base fields
    #[must_use]
    pub fn new() -> Self {
        let shared = Shared::new(
            Vec::new(),
            Arc::new(ProcessBaseFields::new()),
            SerializerFailurePolicy::default(),
        );
        Self::root(
            Arc::new(SerializerRegistry::empty()),
            Record::new(),
            LogLevel::Info,
            shared,
        )
    }

    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    fn root(
        registry: Arc<SerializerRegistry>,
        bindings: Record,
        min_level: LogLevel,
        shared: Arc<Shared>,
    ) -> Self {
        Self {
            node: Arc::new(LoggerNode {
                registry,
                bindings,
                min_level: RwLock::new(min_level),
                parent: None,
                depth: 0,
                shared,
            }),
        }
    }

    /// Derive a child logger
    ///
    /// The child's registry is this logger's registry with `options`'
    /// serializers layered on top: overridden keys use the child's serializer,
    /// all other entries (the wildcard included) are inherited. Child bindings
    /// are serialized once, here, with the child's serializers.
    pub fn child(&self, options: ChildOptions) -> Result<Logger> {
        let ChildOptions {
            serializers,
            bindings,
            level,
        } = options;

        let registry = if serializers.is_empty() {
            Arc::clone(&self.node.registry)
        } else {
            Arc::new(self.node.registry.derive_with(&serializers)?)
        };

        let shared = &self.node.shared;
        let mut merged = self.node.bindings.clone();
        if !bindings.is_empty() {
            let serialized = serialize_bindings(&registry, shared, bindings)?;
            for (key, value) in serialized {
                merged.insert(key, value);
            }
        }

        let min_level = level.unwrap_or_else(|| self.min_level());

        Ok(Logger {
            node: Arc::new(LoggerNode {
                registry,
                bindings: merged,
                min_level: RwLock::new(min_level),
                parent: Some(Arc::downgrade(&self.node)),
                depth: self.node.depth + 1,
                shared: Arc::clone(shared),
            }),
        })
    }

    /// The logger this one was derived from, if it is still alive
    pub fn parent(&self) -> Option<Logger> {
        self.node
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|node| Logger { node })
    }

    /// Number of derivations between this logger and its root
    pub fn depth(&self) -> usize {
        self.node.depth
    }

    pub fn registry(&self) -> &SerializerRegistry {
        &self.node.registry
    }

    /// Bindings attached to every record of this logger, already serialized
    pub fn bindings(&self) -> &Record {
        &self.node.bindings
    }

    /// Compositor over this logger's registry, bindings and base fields
    pub fn compositor(&self) -> RecordCompositor<'_> {
        let shared = &self.node.shared;
        let compositor = RecordCompositor::new(&self.node.registry, shared.base_fields.as_ref())
            .with_bindings(&self.node.bindings);
        match shared.fallback() {
            Some(fallback) => compositor.with_fallback(fallback),
            None => compositor,
        }
    }

    pub fn min_level(&self) -> LogLevel {
        *self.node.min_level.read()
    }

    /// Change this logger's minimum level; parent and children are unaffected
    pub fn set_min_level(&self, level: LogLevel) {
        *self.node.min_level.write() = level;
    }

    #[inline]
    pub fn is_level_enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level()
    }

    /// Add an appender shared by this logger's whole hierarchy
    pub fn add_appender(&self, appender: Box<dyn Appender>) {
        self.node.shared.appenders.lock().push(appender);
    }

    /// Metrics shared by this logger's whole hierarchy
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.node.shared.metrics
    }

    pub fn dropped_count(&self) -> u64 {
        self.metrics().dropped_count()
    }

    /// Compose and emit one record
    ///
    /// Calls below the minimum level return `Ok(())` without running any
    /// serializer. Serializer failures are handled per the
    /// [`SerializerFailurePolicy`]; appender failures are reported on stderr
    /// and counted as dropped.
    pub fn log(&self, level: LogLevel, payload: impl Into<LogPayload>) -> Result<()> {
        let shared = &self.node.shared;
        if !self.is_level_enabled(level) {
            shared.metrics.record_filtered();
            return Ok(());
        }

        let record = match self.compositor().compose(level, payload.into()) {
            Ok(record) => record,
            Err(failure) => match shared.recover(failure) {
                Ok(record) => record,
                Err(e) => {
                    shared.metrics.record_dropped();
                    return Err(e);
                }
            },
        };

        shared.dispatch(&record);
        Ok(())
    }

    pub fn flush(&self) -> Result<()> {
        self.node.shared.flush()
    }

    #[inline]
    pub fn trace(&self, payload: impl Into<LogPayload>) -> Result<()> {
        self.log(LogLevel::Trace, payload)
    }

    #[inline]
    pub fn debug(&self, payload: impl Into<LogPayload>) -> Result<()> {
        self.log(LogLevel::Debug, payload)
    }

    #[inline]
    pub fn info(&self, payload: impl Into<LogPayload>) -> Result<()> {
        self.log(LogLevel::Info, payload)
    }

    #[inline]
    pub fn warn(&self, payload: impl Into<LogPayload>) -> Result<()> {
        self.log(LogLevel::Warn, payload)
    }

    #[inline]
    pub fn error(&self, payload: impl Into<LogPayload>) -> Result<()> {
        self.log(LogLevel::Error, payload)
    }

    #[inline]
    pub fn fatal(&self, payload: impl Into<LogPayload>) -> Result<()> {
        self.log(LogLevel::Fatal, payload)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("depth", &self.node.depth)
            .field("min_level", &self.min_level())
            .field("registry", &self.node.registry)
            .field("bindings", &self.node.bindings)
            .finish()
    }
}

fn serialize_bindings(
    registry: &SerializerRegistry,
    shared: &Shared,
    bindings: Record,
) -> Result<Record> {
    let mut compositor = RecordCompositor::new(registry, shared.base_fields.as_ref());
    if let Some(fallback) = shared.fallback() {
        compositor = compositor.with_fallback(fallback);
    }
    match compositor.serialize_fields(bindings) {
        Ok(serialized) => Ok(serialized),
        Err(failure) => shared.recover(failure),
    }
}

fn into_record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        Value::Null => Record::new(),
        other => {
            let mut record = Record::new();
            record.insert("bindings".to_string(), other);
            record
        }
    }
}

/// Options for [`Logger::child`]
///
/// # Example
///
/// ```
/// use rust_structured_logger::prelude::*;
/// use serde_json::json;
///
/// let options = ChildOptions::new()
///     .binding("module", "billing")
///     .std_serializer("err")
///     .level(LogLevel::Debug);
/// let child = Logger::new().child(options).unwrap();
/// assert_eq!(child.bindings()["module"], "billing");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ChildOptions {
    serializers: SerializerMap,
    bindings: Record,
    level: Option<LogLevel>,
}

impl ChildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn serializer(mut self, key: impl Into<FieldKey>, serializer: Serializer) -> Self {
        self.serializers.insert(key, serializer);
        self
    }

    #[must_use]
    pub fn serializers(mut self, serializers: SerializerMap) -> Self {
        self.serializers.extend(serializers);
        self
    }

    #[must_use]
    pub fn wildcard_serializer(mut self, serializer: Serializer) -> Self {
        self.serializers.insert(FieldKey::Wildcard, serializer);
        self
    }

    /// Use a standard serializer (`err`, `req`, `res`) for the field of the same name
    #[must_use]
    pub fn std_serializer(mut self, name: impl Into<String>) -> Self {
        self.serializers = std::mem::take(&mut self.serializers).with_standard(name);
        self
    }

    #[must_use]
    pub fn binding(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.bindings.insert(key.into(), value.into());
        self
    }

    /// Add every field of an object as a binding
    #[must_use]
    pub fn bindings(mut self, bindings: Value) -> Self {
        for (key, value) in into_record(bindings) {
            self.bindings.insert(key, value);
        }
        self
    }

    #[must_use]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = Some(level);
        self
    }
}

/// Builder for root loggers
///
/// # Example
/// ```
/// use rust_structured_logger::prelude::*;
/// use serde_json::json;
///
/// let logger = Logger::builder()
///     .min_level(LogLevel::Debug)
///     .appender(MemoryAppender::new())
///     .std_serializer("err")
///     .serializer("password", Serializer::new(|_| json!("***")))
///     .failure_policy(SerializerFailurePolicy::OmitField)
///     .build()
///     .unwrap();
/// assert!(logger.registry().contains("password"));
/// ```
pub struct LoggerBuilder {
    min_level: LogLevel,
    appenders: Vec<Box<dyn Appender>>,
    serializers: SerializerMap,
    bindings: Record,
    base_fields: Option<Arc<dyn BaseFields>>,
    timestamp_format: TimestampFormat,
    failure_policy: SerializerFailurePolicy,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            min_level: LogLevel::Info,
            appenders: Vec::new(),
            serializers: SerializerMap::new(),
            bindings: Record::new(),
            base_fields: None,
            timestamp_format: TimestampFormat::default(),
            failure_policy: SerializerFailurePolicy::default(),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appenders.push(Box::new(appender));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn serializer(mut self, key: impl Into<FieldKey>, serializer: Serializer) -> Self {
        self.serializers.insert(key, serializer);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn serializers(mut self, serializers: SerializerMap) -> Self {
        self.serializers.extend(serializers);
        self
    }

    /// Transform applied to the whole record; its output replaces the record
    #[must_use = "builder methods return a new value"]
    pub fn wildcard_serializer(mut self, serializer: Serializer) -> Self {
        self.serializers.insert(FieldKey::Wildcard, serializer);
        self
    }

    /// Use a standard serializer (`err`, `req`, `res`) for the field of the same name
    #[must_use = "builder methods return a new value"]
    pub fn std_serializer(mut self, name: impl Into<String>) -> Self {
        self.serializers = self.serializers.with_standard(name);
        self
    }

    /// Field attached to every record of the root and its children
    #[must_use = "builder methods return a new value"]
    pub fn binding(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.bindings.insert(key.into(), value.into());
        self
    }

    /// Replace the default [`ProcessBaseFields`]
    #[must_use = "builder methods return a new value"]
    pub fn base_fields<B: BaseFields + 'static>(mut self, base_fields: B) -> Self {
        self.base_fields = Some(Arc::new(base_fields));
        self
    }

    /// Format of the `time` field when the default base fields are used
    #[must_use = "builder methods return a new value"]
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn failure_policy(mut self, policy: SerializerFailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Build the root logger
    ///
    /// Fails with [`LoggerError::InvalidSerializer`](crate::LoggerError::InvalidSerializer) when a serializer entry is
    /// rejected, or with [`LoggerError::SerializerExecution`](crate::LoggerError::SerializerExecution) when a binding
    /// cannot be serialized under the propagate policy.
    pub fn build(self) -> Result<Logger> {
        let registry = Arc::new(SerializerRegistry::new(&self.serializers)?);
        let base_fields = self.base_fields.unwrap_or_else(|| {
            Arc::new(ProcessBaseFields::new().with_timestamp_format(self.timestamp_format))
        });
        let shared = Shared::new(self.appenders, base_fields, self.failure_policy);

        let bindings = if self.bindings.is_empty() {
            Record::new()
        } else {
            serialize_bindings(&registry, &shared, self.bindings)?
        };

        Ok(Logger::root(registry, bindings, self.min_level, shared))
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
