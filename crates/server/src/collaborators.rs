//! Adapters from the gRPC model clients to the retrieval collaborator traits.

use async_trait::async_trait;
use data_loader::Movie;
use ml_client::assistant::MovieRecord;
use ml_client::{ConversationClient, MLClientError, RecommenderClient};
use retrieval::{CollaboratorError, Conversationalist, RecommendationRequest, Recommender};

/// Convert a wire record into the catalog's `Movie`
pub fn movie_from_record(record: MovieRecord) -> Movie {
    Movie {
        id: record.id,
        title: record.title,
        genres: record.genres,
        cast: record.cast,
        plot: record.plot,
        year: record.year.and_then(|y| u16::try_from(y).ok()),
        imdb_rating: record.imdb_rating,
    }
}

fn collaborator_error(err: MLClientError) -> CollaboratorError {
    match err {
        MLClientError::InvalidAddress { .. } | MLClientError::Unavailable(_) => {
            CollaboratorError::Unavailable(err.to_string())
        }
        MLClientError::InvalidResponse(reason) => CollaboratorError::InvalidResponse(reason),
        MLClientError::Timeout(reason) => CollaboratorError::TimedOut(reason),
        MLClientError::RequestFailed(_) => CollaboratorError::Failed(err.to_string()),
    }
}

/// `Recommender` backed by the gRPC recommendation service
#[derive(Debug, Clone)]
pub struct GrpcRecommender {
    client: RecommenderClient,
}

impl GrpcRecommender {
    pub fn new(client: RecommenderClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Recommender for GrpcRecommender {
    fn name(&self) -> &str {
        "GrpcRecommender"
    }

    async fn recommend(
        &self,
        request: &RecommendationRequest,
    ) -> Result<Vec<Movie>, CollaboratorError> {
        let records = self
            .client
            .recommend(
                request.seed_ids.clone(),
                request.query_text.clone(),
                request.limit,
            )
            .await
            .map_err(collaborator_error)?;

        Ok(records.into_iter().map(movie_from_record).collect())
    }
}

/// `Conversationalist` backed by the gRPC conversational service
#[derive(Debug, Clone)]
pub struct GrpcConversationalist {
    client: ConversationClient,
}

impl GrpcConversationalist {
    pub fn new(client: ConversationClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Conversationalist for GrpcConversationalist {
    fn name(&self) -> &str {
        "GrpcConversationalist"
    }

    async fn reply(&self, text: &str) -> Result<String, CollaboratorError> {
        self.client.reply(text).await.map_err(collaborator_error)
    }
}
