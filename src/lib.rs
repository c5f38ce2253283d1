//! # Rust Structured Logger
//!
//! A structured logger built around per-field serializers and hierarchical
//! child loggers.
//!
//! ## Features
//!
//! - **Field Serializers**: transform individual fields before they are emitted
//! - **Wildcard Serializer**: one transform that owns the shape of the whole record
//! - **Child Loggers**: inherit, extend or override serializers per field without
//!   touching the parent
//! - **Thread Safe**: registries are immutable snapshots shared without locking

pub mod appenders;
pub mod core;
pub mod macros;

pub mod prelude {
    #[cfg(feature = "console")]
    pub use crate::appenders::ConsoleAppender;
    pub use crate::appenders::{JsonAppender, MemoryAppender};
    pub use crate::core::{
        std_serializers, Appender, BaseFields, ChildOptions, FieldKey, LogLevel, LogPayload,
        Logger, LoggerBuilder, LoggerError, LoggerMetrics, OutputFormat, ProcessBaseFields,
        Record, Result, Serializer, SerializerFailurePolicy, SerializerMap, SerializerRegistry,
        TimestampFormat,
    };
}

#[cfg(feature = "console")]
pub use appenders::ConsoleAppender;
pub use appenders::{JsonAppender, MemoryAppender};
pub use core::{
    Appender, BaseFields, ChildOptions, CompositionFailure, FieldKey, LogLevel, LogPayload,
    Logger, LoggerBuilder, LoggerError, LoggerMetrics, OutputFormat, ProcessBaseFields,
    Record, RecordCompositor, Result, Serializer, SerializerExecutionError,
    SerializerFailurePolicy, SerializerFault, SerializerMap, SerializerRegistry,
    TimestampFormat,
};
