//! gRPC clients for the external model services.
//!
//! This crate provides Rust clients for the two backends the assistant
//! delegates to:
//! - `RecommenderClient`: recommendation model (`assistant.Recommender`)
//! - `ConversationClient`: conversational engine (`assistant.Conversation`)
//!
//! Channels connect lazily, so a service that is down surfaces as an error
//! on the first call rather than at construction. Every call carries the
//! configured timeout. There are no retries.

use std::time::Duration;

use thiserror::Error;
use tonic::transport::{Channel, Endpoint};
use tonic::{Code, Status};
use tracing::{debug, error, info};

// Include the generated protobuf code
pub mod assistant {
    tonic::include_proto!("assistant");
}

use assistant::{
    conversation_client::ConversationClient as GrpcConversationClient,
    recommender_client::RecommenderClient as GrpcRecommenderClient, MovieRecord, RecommendRequest,
    ReplyRequest,
};

/// Default per-call timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors that can occur when calling a model service
#[derive(Error, Debug)]
pub enum MLClientError {
    #[error("Invalid service address {addr}: {reason}")]
    InvalidAddress { addr: String, reason: String },

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response from service: {0}")]
    InvalidResponse(String),
}

/// Message tonic puts on the `Cancelled` status when the channel timeout fires
const TIMEOUT_EXPIRED: &str = "Timeout expired";

impl From<Status> for MLClientError {
    fn from(status: Status) -> Self {
        match status.code() {
            Code::Unavailable => MLClientError::Unavailable(status.message().to_string()),
            Code::DeadlineExceeded => MLClientError::Timeout(status.message().to_string()),
            Code::Cancelled if status.message() == TIMEOUT_EXPIRED => {
                MLClientError::Timeout(status.message().to_string())
            }
            _ if is_transport_failure(&status) => {
                MLClientError::Unavailable(status.to_string())
            }
            _ => MLClientError::RequestFailed(status.to_string()),
        }
    }
}

/// Connection-level failures reach us as `Unknown` statuses wrapping a
/// transport error rather than as `Unavailable`.
fn is_transport_failure(status: &Status) -> bool {
    let mut source = std::error::Error::source(status);
    while let Some(err) = source {
        if err.is::<tonic::transport::Error>() || err.is::<std::io::Error>() {
            return true;
        }
        source = err.source();
    }
    status.code() == Code::Unknown && status.message().starts_with("transport error")
}

/// Build a lazily-connecting channel with a per-call timeout
fn lazy_channel(addr: &str, timeout: Duration) -> Result<Channel, MLClientError> {
    let endpoint = Endpoint::from_shared(addr.to_string()).map_err(|e| {
        MLClientError::InvalidAddress {
            addr: addr.to_string(),
            reason: e.to_string(),
        }
    })?;
    Ok(endpoint.timeout(timeout).connect_lazy())
}

/// Client for the recommendation service.
///
/// Cheap to clone; clones share the underlying channel.
#[derive(Debug, Clone)]
pub struct RecommenderClient {
    client: GrpcRecommenderClient<Channel>,
    service_addr: String,
}

impl RecommenderClient {
    /// Create a client for the service at `addr` (e.g. "http://localhost:50051").
    ///
    /// No connection is made until the first call.
    pub fn connect_lazy(addr: impl Into<String>, timeout: Duration) -> Result<Self, MLClientError> {
        let addr = addr.into();
        info!("Recommender client targeting {} (timeout {:?})", addr, timeout);

        let channel = lazy_channel(&addr, timeout)?;
        Ok(Self {
            client: GrpcRecommenderClient::new(channel),
            service_addr: addr,
        })
    }

    /// Ask for up to `limit` recommendations.
    ///
    /// A response with more than `limit` movies is truncated.
    pub async fn recommend(
        &self,
        seed_ids: Vec<String>,
        query_text: impl Into<String>,
        limit: usize,
    ) -> Result<Vec<MovieRecord>, MLClientError> {
        debug!("Requesting {} recommendations from {} seeds", limit, seed_ids.len());

        let request = tonic::Request::new(RecommendRequest {
            seed_ids,
            query_text: query_text.into(),
            limit: u32::try_from(limit).unwrap_or(u32::MAX),
        });

        // tonic clients need &mut self; clones share the channel
        let mut client = self.client.clone();
        let response = client.recommend(request).await.map_err(|status| {
            error!("gRPC error while requesting recommendations: {}", status);
            MLClientError::from(status)
        })?;

        let mut movies = response.into_inner().movies;
        if movies.len() > limit {
            debug!("Truncating {} recommendations to {}", movies.len(), limit);
            movies.truncate(limit);
        }
        Ok(movies)
    }

    /// Get the address of the service this client targets.
    pub fn service_address(&self) -> &str {
        &self.service_addr
    }
}

/// Client for the conversational service.
#[derive(Debug, Clone)]
pub struct ConversationClient {
    client: GrpcConversationClient<Channel>,
    service_addr: String,
}

impl ConversationClient {
    pub fn connect_lazy(addr: impl Into<String>, timeout: Duration) -> Result<Self, MLClientError> {
        let addr = addr.into();
        info!("Conversation client targeting {} (timeout {:?})", addr, timeout);

        let channel = lazy_channel(&addr, timeout)?;
        Ok(Self {
            client: GrpcConversationClient::new(channel),
            service_addr: addr,
        })
    }

    /// Get a reply for `text`. An empty reply is an invalid response.
    pub async fn reply(&self, text: impl Into<String>) -> Result<String, MLClientError> {
        let request = tonic::Request::new(ReplyRequest { text: text.into() });

        let mut client = self.client.clone();
        let response = client.reply(request).await.map_err(|status| {
            error!("gRPC error while requesting reply: {}", status);
            MLClientError::from(status)
        })?;

        let reply = response.into_inner().text;
        if reply.trim().is_empty() {
            return Err(MLClientError::InvalidResponse("empty reply".into()));
        }
        Ok(reply)
    }

    pub fn service_address(&self) -> &str {
        &self.service_addr
    }
}
