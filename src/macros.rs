//! Logging macros for ergonomic log message formatting.
//!
//! Each macro formats its message like `format!` and returns the
//! [`Result`](crate::Result) of the log call. Structured fields go before the
//! message, separated by a semicolon; a payload without a format string is
//! logged as is.
//!
//! # Examples
//!
//! ```
//! use rust_structured_logger::prelude::*;
//! use rust_structured_logger::info;
//! use serde_json::json;
//!
//! let logger = Logger::new();
//!
//! // Basic logging
//! info!(logger, "Server started").unwrap();
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port).unwrap();
//!
//! // With structured fields, passed through the logger's serializers
//! info!(logger, json!({"port": port}); "listening").unwrap();
//!
//! // Fields only, or any other payload
//! info!(logger, json!({"port": port})).unwrap();
//! ```

/// Log a message at an explicit level.
///
/// # Examples
///
/// ```
/// # use rust_structured_logger::prelude::*;
/// # let logger = Logger::new();
/// use rust_structured_logger::log;
/// use serde_json::json;
/// log!(logger, LogLevel::Info, "Simple message").unwrap();
/// log!(logger, LogLevel::Error, json!({"code": 500}); "Error code: {}", 500).unwrap();
/// log!(logger, LogLevel::Warn, json!({"queue_depth": 85})).unwrap();
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $fields:expr; $($arg:tt)+) => {
        $logger.log(
            $level,
            $crate::LogPayload::from($fields).with_message(format!($($arg)+)),
        )
    };
    ($logger:expr, $level:expr, $msg:literal $($arg:tt)*) => {
        $logger.log($level, format!($msg $($arg)*))
    };
    ($logger:expr, $level:expr, $payload:expr $(,)?) => {
        $logger.log($level, $payload)
    };
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use rust_structured_logger::prelude::*;
/// # let logger = Logger::new();
/// use rust_structured_logger::info;
/// info!(logger, "Application started").unwrap();
/// info!(logger, "Processing {} items", 100).unwrap();
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use rust_structured_logger::prelude::*;
/// # let logger = Logger::new();
/// use rust_structured_logger::error;
/// use serde_json::json;
/// error!(logger, json!({"err": "connection refused"}); "Failed to connect to {}", "db").unwrap();
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}
