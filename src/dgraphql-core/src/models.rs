use serde::{de, Deserialize, Deserializer, Serialize};

/// Body sent to the GraphQL endpoint
#[derive(Debug, Clone, Serialize)]
pub struct GraphQLRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<serde_json::Map<String, serde_json::Value>>,
}

impl GraphQLRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: None,
        }
    }

    pub fn with_variables(mut self, variables: serde_json::Map<String, serde_json::Value>) -> Self {
        self.variables = Some(variables);
        self
    }
}

/// A single entry of the server's `errors` array
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerError {
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
}

/// Partial view of a response body used to spot logical failures.
///
/// Dgraph answers 200 even when the query failed, reporting the failure in a
/// top-level `errors` array. Any other object decodes to an empty envelope,
/// as does an `errors` field that is null. Bodies that aren't JSON objects
/// are rejected.
#[derive(Debug, Clone, Default)]
pub struct ServerErrorEnvelope {
    pub errors: Vec<ServerError>,
}

impl<'de> Deserialize<'de> for ServerErrorEnvelope {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut body = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;
        let errors = match body.remove("errors") {
            None | Some(serde_json::Value::Null) => Vec::new(),
            Some(errors) => serde_json::from_value(errors).map_err(de::Error::custom)?,
        };
        Ok(Self { errors })
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl ServerErrorEnvelope {
    /// Message of the first reported error; later entries are ignored
    pub fn first_message(&self) -> Option<&str> {
        self.errors.first().map(|e| e.message.as_str())
    }
}
