//! Build a `QueryDispatcher` from `ServiceConfig`.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use data_loader::MovieCatalog;
use ml_client::{ConversationClient, RecommenderClient};
use retrieval::CatalogStore;

use crate::collaborators::{GrpcConversationalist, GrpcRecommender};
use crate::config::ServiceConfig;
use crate::dispatcher::QueryDispatcher;

/// Load the catalog and attach the configured model services.
///
/// The catalog must load; a bad service address only disables that branch
/// (it then falls back like an unavailable service). Async because the gRPC
/// channels need a running Tokio runtime.
pub async fn build_dispatcher(config: &ServiceConfig) -> Result<QueryDispatcher> {
    let catalog = MovieCatalog::load_from_file(&config.catalog_path).with_context(|| {
        format!(
            "Failed to load movie catalog from {}",
            config.catalog_path.display()
        )
    })?;
    info!("Catalog ready with {} movies", catalog.len());

    Ok(attach_services(Arc::new(catalog), config))
}

/// Wire an already loaded catalog and the configured services.
pub fn attach_services(catalog: Arc<MovieCatalog>, config: &ServiceConfig) -> QueryDispatcher {
    let mut dispatcher = QueryDispatcher::new(config.dispatch.clone())
        .with_store(Arc::new(CatalogStore::new(catalog)));

    if let Some(addr) = &config.recommender_addr {
        match RecommenderClient::connect_lazy(addr.clone(), config.timeout()) {
            Ok(client) => {
                info!("Recommendation branch wired to {}", client.service_address());
                dispatcher = dispatcher.with_recommender(Arc::new(GrpcRecommender::new(client)))
            }
            Err(e) => warn!("Recommendation branch disabled: {}", e),
        }
    }

    if let Some(addr) = &config.conversation_addr {
        match ConversationClient::connect_lazy(addr.clone(), config.timeout()) {
            Ok(client) => {
                info!("Conversational branch wired to {}", client.service_address());
                dispatcher =
                    dispatcher.with_conversation(Arc::new(GrpcConversationalist::new(client)))
            }
            Err(e) => warn!("Conversational branch disabled: {}", e),
        }
    }

    dispatcher
}
