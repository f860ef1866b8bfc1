//! Test harness for the query dispatcher.
//!
//! Loads the catalog, connects to the model services named in the config
//! (first argument, optional JSON file) and prints one result per intent.

use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use retrieval::{ChatTurn, Query, QueryContext};
use server::{build_dispatcher, ServiceConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server=debug,retrieval=debug".into()),
        )
        .init();

    info!("Starting query dispatcher test harness");

    let config = match std::env::args().nth(1) {
        Some(path) => ServiceConfig::from_json_file(&PathBuf::from(path))?,
        None => ServiceConfig::default(),
    };
    info!("Catalog: {}", config.catalog_path.display());

    let dispatcher = build_dispatcher(&config).await?;

    let context = QueryContext {
        history: vec![ChatTurn::user("mind-bending sci-fi")],
        recent_movie_ids: Vec::new(),
    };
    let samples = [
        "keanu reeves",
        "recommend something like The Matrix",
        "hello, how are you?",
    ];

    for text in samples {
        let result = dispatcher
            .handle_with_context(&Query::new(text), &context)
            .await;
        info!("{:?} -> {}", text, result.intent());
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    Ok(())
}
