//! gRPC Access Log
//!
//! Server-side access logging for unary tonic calls. Every intercepted call produces exactly one
//! structured record (peer address, parameters, metadata, method path, status code and elapsed
//! time) that is handed to a pluggable sink, while the handler's result reaches the caller
//! unchanged.

pub mod clock;
pub mod config;
pub mod error;
pub mod extension;
pub mod interceptor;
pub mod record;
pub mod sink;
pub mod telemetry;
pub mod types;
pub mod utils;

// Re-exports
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{AccessLogConfig, FilterConfig, LoggingConfig, SinkConfig, SinkKind};
pub use error::{AccessLogError, Result, StatusCarrier};
pub use extension::{CustomDataProvider, KeyRedactionFilter, ParamsFilter};
pub use interceptor::AccessLogInterceptor;
pub use record::{AccessLogRecord, fields};
pub use sink::{JsonLineSink, MemorySink, Sink, TracingSink};
pub use telemetry::init_tracing;
pub use types::{MethodDescriptor, ServerCall};
