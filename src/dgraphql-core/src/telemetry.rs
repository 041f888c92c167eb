//! Subscriber setup for applications built on the client
//!
//! Installs a layered `tracing-subscriber` registry with:
//! - an `EnvFilter` honouring `RUST_LOG`
//! - human-readable console output
//! - optional JSON output on stderr

use anyhow::Result;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

const DEFAULT_FILTER: &str = "dgraphql=debug,dgraphql_core=debug";

/// Initialize console logging, plus JSON logs on stderr when `json` is set
pub fn init_telemetry(json: bool) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let console_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
        .with_target(false);

    let json_layer = json.then(|| {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::CLOSE)
            .with_current_span(true)
            .with_target(true)
            .with_thread_ids(true)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()?;

    tracing::info!("Telemetry initialized (json={})", json);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_telemetry_installs_once() {
        init_telemetry(true).unwrap();
        // The global subscriber can only be set once per process
        assert!(init_telemetry(false).is_err());
    }
}
