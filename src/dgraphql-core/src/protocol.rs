//! Wire-level description of the request kinds Dgraph accepts over HTTP.

/// Header carrying the auth token on every request
pub const AUTH_HEADER: &str = "Dg-Auth";

/// Request kinds understood by the client.
///
/// Each variant only differs in where the request goes, how the body is
/// labelled and whether the response is checked for an `errors` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    /// GraphQL query wrapped in a JSON envelope, sent to `/graphql`
    Graph,
    /// GraphQL query posted to the endpoint URL as configured
    RawGraph,
    /// DQL query sent as-is to `/query`
    Typed,
    /// RDF triples sent as-is to `/mutate`, committed immediately
    Rdf,
}

impl Protocol {
    /// Path (and query string) appended to the endpoint
    pub fn path(&self) -> &'static str {
        match self {
            Protocol::Graph => "/graphql",
            Protocol::RawGraph => "",
            Protocol::Typed => "/query",
            Protocol::Rdf => "/mutate?commitNow=true",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Protocol::Graph | Protocol::RawGraph => "application/json",
            Protocol::Typed => "application/dql",
            Protocol::Rdf => "application/rdf",
        }
    }

    /// Whether the query text is wrapped in a `GraphQLRequest`
    pub fn wraps_json(&self) -> bool {
        matches!(self, Protocol::Graph | Protocol::RawGraph)
    }

    /// Mutation responses carry a summary, not an error envelope
    pub fn checks_error_envelope(&self) -> bool {
        !matches!(self, Protocol::Rdf)
    }

    pub fn span_name(&self) -> &'static str {
        match self {
            Protocol::Rdf => "rdf",
            _ => "query",
        }
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", endpoint, self.path())
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Protocol::Graph => "graphql",
            Protocol::RawGraph => "graphql-raw",
            Protocol::Typed => "dql",
            Protocol::Rdf => "rdf",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let endpoint = "http://localhost:8080";
        assert_eq!(Protocol::Graph.url(endpoint), "http://localhost:8080/graphql");
        assert_eq!(Protocol::RawGraph.url(endpoint), endpoint);
        assert_eq!(Protocol::Typed.url(endpoint), "http://localhost:8080/query");
        assert_eq!(
            Protocol::Rdf.url(endpoint),
            "http://localhost:8080/mutate?commitNow=true"
        );
    }

    #[test]
    fn test_content_types() {
        assert_eq!(Protocol::Graph.content_type(), "application/json");
        assert_eq!(Protocol::Typed.content_type(), "application/dql");
        assert_eq!(Protocol::Rdf.content_type(), "application/rdf");
    }

    #[test]
    fn test_only_rdf_skips_envelope() {
        assert!(Protocol::Graph.checks_error_envelope());
        assert!(Protocol::RawGraph.checks_error_envelope());
        assert!(Protocol::Typed.checks_error_envelope());
        assert!(!Protocol::Rdf.checks_error_envelope());
    }

    #[test]
    fn test_span_names() {
        assert_eq!(Protocol::Graph.span_name(), "query");
        assert_eq!(Protocol::Typed.span_name(), "query");
        assert_eq!(Protocol::Rdf.span_name(), "rdf");
    }
}
