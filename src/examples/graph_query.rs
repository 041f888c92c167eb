//! Graph Query Example
//!
//! Loads `dgraphql.json` (or falls back to a local server), inserts a few
//! triples and reads them back over GraphQL and DQL.
//!
//! Run with: cargo run --example graph_query

use dgraphql::{ClientConfig, Context, LogTracer, QueryClient};
use dgraphql_core::telemetry;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct PeopleReply {
    data: People,
}

#[derive(Debug, Deserialize)]
struct People {
    people: Vec<Person>,
}

#[derive(Debug, Deserialize)]
struct Person {
    name: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_telemetry(false)?;

    let config = ClientConfig::load("dgraphql.json").unwrap_or_else(|_| {
        tracing::warn!("Failed to load dgraphql.json, using defaults");
        ClientConfig::default()
    });
    tracing::info!("Endpoint: {}", config.endpoint);

    let client = QueryClient::from_config(&config).with_tracer(Arc::new(LogTracer));
    let ctx = Context::background();

    let summary: serde_json::Value = client
        .execute_rdf(
            &ctx,
            r#"{ set { _:alice <name> "Alice" . _:bob <name> "Bob" . } }"#,
        )
        .await?;
    println!("Mutation: {}", summary["data"]["code"]);

    let reply: PeopleReply = client
        .execute_typed(&ctx, "{ people(func: has(name)) { name } }")
        .await?;
    for person in &reply.data.people {
        println!("  - {}", person.name);
    }

    match client
        .execute_graph::<serde_json::Value>(&ctx, "{ queryPerson { name } }")
        .await
    {
        Ok(value) => println!("GraphQL: {}", value["data"]),
        Err(e) => println!("GraphQL query failed: {}", e),
    }

    Ok(())
}
