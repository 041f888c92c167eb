//! dgraphql Core Library
//!
//! Shared building blocks for the dgraphql client:
//! - Wire protocol descriptors
//! - Request and error-envelope models
//! - Client configuration
//! - Span hooks and subscriber setup

pub mod config;
pub mod models;
pub mod protocol;
pub mod telemetry;
pub mod trace;

// Re-export commonly used types
pub use config::ClientConfig;
pub use models::*;
pub use protocol::{Protocol, AUTH_HEADER};
pub use trace::{LogTracer, NoopTracer, OtelTracer, SpanGuard, SpanHandle, Tracer};
