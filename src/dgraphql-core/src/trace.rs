//! Span hooks around client calls.
//!
//! The client never reaches for a global tracer; callers hand one in at
//! construction. [`NoopTracer`] is the default.

use opentelemetry::trace::{Span as _, Tracer as _};

/// Opens one span per client call
pub trait Tracer: Send + Sync {
    fn start_span(&self, name: &'static str) -> Box<dyn SpanHandle>;
}

/// A span that has been started and must be ended exactly once
pub trait SpanHandle: Send {
    fn end(self: Box<Self>);
}

/// Ends the wrapped span when dropped, whichever way the call returns
pub struct SpanGuard {
    span: Option<Box<dyn SpanHandle>>,
}

impl SpanGuard {
    pub fn start(tracer: &dyn Tracer, name: &'static str) -> Self {
        Self {
            span: Some(tracer.start_span(name)),
        }
    }
}

impl Drop for SpanGuard {
    fn drop(&mut self) {
        if let Some(span) = self.span.take() {
            span.end();
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTracer;

struct NoopSpan;

impl SpanHandle for NoopSpan {
    fn end(self: Box<Self>) {}
}

impl Tracer for NoopTracer {
    fn start_span(&self, _name: &'static str) -> Box<dyn SpanHandle> {
        Box::new(NoopSpan)
    }
}

/// Emits a `tracing` span per call, picked up by whatever subscriber is installed
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTracer;

struct LogSpan(tracing::Span);

impl SpanHandle for LogSpan {
    fn end(self: Box<Self>) {
        drop(self.0);
    }
}

impl Tracer for LogTracer {
    fn start_span(&self, name: &'static str) -> Box<dyn SpanHandle> {
        Box::new(LogSpan(tracing::info_span!("dgraph", op = name)))
    }
}

pub const INSTRUMENTATION_NAME: &str = "dgraph";

/// Starts spans on the process-wide OpenTelemetry tracer provider
pub struct OtelTracer {
    tracer: opentelemetry::global::BoxedTracer,
}

impl OtelTracer {
    /// Tracer registered under the `dgraph` instrumentation scope, shared by
    /// every request kind
    pub fn new() -> Self {
        Self::named(INSTRUMENTATION_NAME)
    }

    /// Tracer under a caller-chosen scope, e.g. `"dgraphql"` for services
    /// that only send raw GraphQL and keep their spans apart
    pub fn named(instrumentation: &'static str) -> Self {
        Self {
            tracer: opentelemetry::global::tracer(instrumentation),
        }
    }
}

impl Default for OtelTracer {
    fn default() -> Self {
        Self::new()
    }
}

struct OtelSpan(opentelemetry::global::BoxedSpan);

impl SpanHandle for OtelSpan {
    fn end(mut self: Box<Self>) {
        self.0.end();
    }
}

impl Tracer for OtelTracer {
    fn start_span(&self, name: &'static str) -> Box<dyn SpanHandle> {
        Box::new(OtelSpan(self.tracer.start(name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct Counter {
        started: AtomicUsize,
        ended: Arc<AtomicUsize>,
    }

    struct CountedSpan(Arc<AtomicUsize>);

    impl SpanHandle for CountedSpan {
        fn end(self: Box<Self>) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl Tracer for Counter {
        fn start_span(&self, _name: &'static str) -> Box<dyn SpanHandle> {
            self.started.fetch_add(1, Ordering::SeqCst);
            Box::new(CountedSpan(self.ended.clone()))
        }
    }

    fn failing_call(tracer: &dyn Tracer) -> Result<(), &'static str> {
        let _span = SpanGuard::start(tracer, "query");
        Err("boom")
    }

    #[test]
    fn test_guard_ends_span_on_error() {
        let tracer = Counter::default();
        assert!(failing_call(&tracer).is_err());
        assert_eq!(tracer.started.load(Ordering::SeqCst), 1);
        assert_eq!(tracer.ended.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_guard_ends_span_once() {
        let tracer = Counter::default();
        {
            let _span = SpanGuard::start(&tracer, "rdf");
            assert_eq!(tracer.ended.load(Ordering::SeqCst), 0);
        }
        assert_eq!(tracer.ended.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_builtin_tracers_do_not_panic() {
        drop(SpanGuard::start(&NoopTracer, "query"));
        drop(SpanGuard::start(&LogTracer, "query"));
        // No provider installed: falls back to the global no-op provider
        drop(SpanGuard::start(&OtelTracer::new(), "query"));
        drop(SpanGuard::start(&OtelTracer::named("dgraphql"), "query"));
    }
}
