//! dgraphql Client Library
//!
//! HTTP client for issuing GraphQL, DQL and RDF requests against a Dgraph
//! server. Dgraph answers 200 even for failed queries; the client turns the
//! `errors` array of such responses into a [`ClientError::Server`].

mod client;
mod context;

pub use client::{QueryClient, DEFAULT_TIMEOUT};
pub use context::Context;
pub use dgraphql_core::{
    ClientConfig, LogTracer, NoopTracer, OtelTracer, Protocol, SpanHandle, Tracer,
};
pub use tokio_util::sync::CancellationToken;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Failed to encode request body: {0}")]
    Encoding(#[source] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Request cancelled")]
    Cancelled,

    #[error("db returned non 200 code: {status}")]
    Status { status: u16 },

    #[error("Failed to read response body: {0}")]
    BodyRead(#[source] reqwest::Error),

    #[error("{message}")]
    Server { message: String },

    #[error("Failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ClientError {
    /// Network, timeout or cancellation failure
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_) | ClientError::Cancelled)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Transport(e) | ClientError::BodyRead(e) if e.is_timeout())
    }

    /// HTTP status of a [`ClientError::Status`]
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
