use std::sync::Arc;

use anyhow::Result;
use serde_json::Value;
use tracing::info;

use dynamo_seeder::handler;
use dynamo_seeder::store::{BatchWriteStore, DynamoStore, InMemoryStore};
use dynamo_seeder::SeedConfig;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = SeedConfig::from_env()?;

    let store: Arc<dyn BatchWriteStore> = if config.dry_run {
        info!("dry run, records are kept in memory");
        Arc::new(InMemoryStore::new())
    } else {
        Arc::new(DynamoStore::from_env().await)
    };

    // Optional invocation event as the first argument
    let event = match std::env::args().nth(1) {
        Some(raw) => serde_json::from_str(&raw)?,
        None => Value::Null,
    };

    let response = handler::handle(event, Value::Null, config, store).await;
    println!("{}", serde_json::to_string(&response)?);

    if !response.is_success() {
        std::process::exit(1);
    }

    Ok(())
}
