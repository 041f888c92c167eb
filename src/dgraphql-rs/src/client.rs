use crate::{ClientError, Context, Result};
use dgraphql_core::{
    ClientConfig, GraphQLRequest, NoopTracer, Protocol, ServerErrorEnvelope, SpanGuard, Tracer,
    AUTH_HEADER,
};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client as HttpClient, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Ceiling applied to every call unless overridden with [`QueryClient::with_timeout`]
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

type Variables = serde_json::Map<String, serde_json::Value>;

/// Dgraph HTTP client
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct QueryClient {
    endpoint: String,
    auth_token: String,
    timeout: Duration,
    tracer: Arc<dyn Tracer>,
    client: HttpClient,
}

impl QueryClient {
    /// Create a client for the given endpoint. Nothing is validated until the first call.
    pub fn new(endpoint: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            auth_token: auth_token.into(),
            timeout: DEFAULT_TIMEOUT,
            tracer: Arc::new(NoopTracer),
            client: HttpClient::new(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.endpoint.clone(), config.auth_token.clone()).with_timeout(config.timeout())
    }

    pub fn with_tracer(mut self, tracer: Arc<dyn Tracer>) -> Self {
        self.tracer = tracer;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run a GraphQL query against `/graphql`
    pub async fn execute_graph<T: DeserializeOwned>(&self, ctx: &Context, query: &str) -> Result<T> {
        self.call(ctx, Protocol::Graph, query, None, decode).await
    }

    /// Run a GraphQL query with variables against `/graphql`
    pub async fn execute_graph_with_variables<T: DeserializeOwned>(
        &self,
        ctx: &Context,
        query: &str,
        variables: Variables,
    ) -> Result<T> {
        self.call(ctx, Protocol::Graph, query, Some(variables), decode)
            .await
    }

    pub async fn execute_graph_discard(&self, ctx: &Context, query: &str) -> Result<()> {
        self.call(ctx, Protocol::Graph, query, None, discard).await
    }

    /// Run a GraphQL query against the endpoint URL itself, for endpoints
    /// that already point at the GraphQL path
    pub async fn execute_raw_graph<T: DeserializeOwned>(
        &self,
        ctx: &Context,
        query: &str,
    ) -> Result<T> {
        self.call(ctx, Protocol::RawGraph, query, None, decode).await
    }

    pub async fn execute_raw_graph_discard(&self, ctx: &Context, query: &str) -> Result<()> {
        self.call(ctx, Protocol::RawGraph, query, None, discard).await
    }

    /// Run a DQL query against `/query`
    pub async fn execute_typed<T: DeserializeOwned>(&self, ctx: &Context, query: &str) -> Result<T> {
        self.call(ctx, Protocol::Typed, query, None, decode).await
    }

    pub async fn execute_typed_discard(&self, ctx: &Context, query: &str) -> Result<()> {
        self.call(ctx, Protocol::Typed, query, None, discard).await
    }

    /// Insert RDF triples and commit them in the same request.
    ///
    /// The response is a mutation summary and is decoded without looking for
    /// an `errors` array.
    pub async fn execute_rdf<T: DeserializeOwned>(&self, ctx: &Context, rdf: &str) -> Result<T> {
        self.call(ctx, Protocol::Rdf, rdf, None, decode).await
    }

    pub async fn execute_rdf_discard(&self, ctx: &Context, rdf: &str) -> Result<()> {
        self.call(ctx, Protocol::Rdf, rdf, None, discard).await
    }

    /// Send `query` using `protocol` and decode the response into `T`
    pub async fn execute<T: DeserializeOwned>(
        &self,
        ctx: &Context,
        protocol: Protocol,
        query: &str,
    ) -> Result<T> {
        self.call(ctx, protocol, query, None, decode).await
    }

    async fn call<T>(
        &self,
        ctx: &Context,
        protocol: Protocol,
        query: &str,
        variables: Option<Variables>,
        finish: fn(&[u8]) -> Result<T>,
    ) -> Result<T> {
        let _span = SpanGuard::start(self.tracer.as_ref(), protocol.span_name());

        let body = encode(protocol, query, variables)?;
        let url = protocol.url(&self.endpoint);
        let timeout = ctx.effective_timeout(self.timeout);

        debug!(
            protocol = %protocol,
            url = %url,
            timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            "dispatching request"
        );

        let request = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, protocol.content_type())
            .header(AUTH_HEADER, self.auth_token.as_str())
            .timeout(timeout)
            .body(body);

        let response = tokio::select! {
            biased;
            _ = ctx.cancellation().cancelled() => return Err(ClientError::Cancelled),
            response = round_trip(request, protocol) => response?,
        };

        finish(&response)
    }
}

fn encode(protocol: Protocol, query: &str, variables: Option<Variables>) -> Result<Vec<u8>> {
    if !protocol.wraps_json() {
        return Ok(query.as_bytes().to_vec());
    }

    let mut request = GraphQLRequest::new(query);
    if let Some(variables) = variables {
        request = request.with_variables(variables);
    }
    serde_json::to_vec(&request).map_err(ClientError::Encoding)
}

async fn round_trip(request: RequestBuilder, protocol: Protocol) -> Result<Vec<u8>> {
    let response = request.send().await.map_err(ClientError::Transport)?;

    // Dgraph answers 200 even for failed queries; anything else is a hard failure
    let status = response.status();
    debug!(protocol = %protocol, status = status.as_u16(), "response received");
    if status != StatusCode::OK {
        return Err(ClientError::Status {
            status: status.as_u16(),
        });
    }

    let body = response.bytes().await.map_err(ClientError::BodyRead)?;

    if protocol.checks_error_envelope() {
        let envelope: ServerErrorEnvelope =
            serde_json::from_slice(&body).map_err(ClientError::Decode)?;
        if let Some(message) = envelope.first_message() {
            return Err(ClientError::Server {
                message: message.to_string(),
            });
        }
    }

    Ok(body.to_vec())
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(ClientError::Decode)
}

fn discard(_body: &[u8]) -> Result<()> {
    Ok(())
}
