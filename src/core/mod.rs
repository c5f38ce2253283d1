//! Core logger types and traits

pub mod appender;
pub mod base_fields;
pub mod compositor;
pub mod error;
pub mod field_key;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod output_format;
pub mod record;
pub mod serializer;
pub mod std_serializers;
pub mod timestamp;

pub use appender::Appender;
pub use base_fields::{BaseFields, ProcessBaseFields};
pub use compositor::{CompositionFailure, RecordCompositor};
pub use error::{BoxError, LoggerError, Result, SerializerExecutionError, SerializerFault};
pub use field_key::{FieldKey, WILDCARD_KEY};
pub use log_level::LogLevel;
pub use logger::{ChildOptions, Logger, LoggerBuilder, SerializerFailurePolicy};
pub use metrics::LoggerMetrics;
pub use output_format::OutputFormat;
pub use record::{LogPayload, Record, MESSAGE_KEY};
pub use serializer::{Serializer, SerializerEntry, SerializerMap, SerializerRegistry};
pub use timestamp::TimestampFormat;
