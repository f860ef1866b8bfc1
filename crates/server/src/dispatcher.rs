//! # Retrieval Dispatcher
//!
//! Routes each query to exactly one strategy:
//! 1. Classify the raw query text
//! 2. `qa` → keyword search against the movie store
//! 3. `recommend` → recommendation backend, seeded from prior context
//! 4. `conversational` → conversational backend, or a static fallback reply
//!
//! Every collaborator fault is logged and replaced by that branch's default
//! (empty results or the fallback reply). The caller always gets a
//! well-formed `RetrievalResult`. Dispatch is single-step: no retries.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use data_loader::Movie;
use retrieval::{
    classify, keyword_search, rewrite_query, Collaborator, Conversationalist, Intent,
    MovieStore, Query, QueryContext, RecommendationRequest, Recommender, RetrievalError,
    RetrievalResult,
};

use crate::config::DispatchConfig;

/// Coordinates classification and the three retrieval strategies.
///
/// Holds no per-request state; clones share the collaborators.
#[derive(Clone)]
pub struct QueryDispatcher {
    store: Option<Arc<dyn MovieStore>>,
    recommender: Option<Arc<dyn Recommender>>,
    conversation: Option<Arc<dyn Conversationalist>>,
    config: DispatchConfig,
}

impl QueryDispatcher {
    /// Create a dispatcher with no collaborators (every branch falls back)
    pub fn new(config: DispatchConfig) -> Self {
        Self {
            store: None,
            recommender: None,
            conversation: None,
            config,
        }
    }

    pub fn with_store(mut self, store: Arc<dyn MovieStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_recommender(mut self, recommender: Arc<dyn Recommender>) -> Self {
        self.recommender = Some(recommender);
        self
    }

    pub fn with_conversation(mut self, conversation: Arc<dyn Conversationalist>) -> Self {
        self.conversation = Some(conversation);
        self
    }

    /// Main entry point: handle a query with no prior context
    pub async fn handle(&self, query: &Query) -> RetrievalResult {
        self.handle_with_context(query, &QueryContext::default()).await
    }

    /// Handle a query with chat history and recently shown movies.
    ///
    /// Intent and keyword search always use the raw text; the backends get
    /// the text rewritten with history.
    #[instrument(skip_all, fields(history = context.history.len()))]
    pub async fn handle_with_context(
        &self,
        query: &Query,
        context: &QueryContext,
    ) -> RetrievalResult {
        let start_time = Instant::now();

        let intent = classify(query.text());
        info!("Classified query as {}", intent);

        let raw_text = query.text().unwrap_or_default();
        let result = match intent {
            Intent::Qa => {
                let results = self.search(raw_text, self.config.default_limit).await;
                RetrievalResult::movies(Intent::Qa, results)
            }
            Intent::Recommend => {
                let rewritten = rewrite_query(&context.history, raw_text);
                let results = self.recommend(&rewritten, context).await;
                RetrievalResult::movies(Intent::Recommend, results)
            }
            Intent::Conversational => {
                let rewritten = rewrite_query(&context.history, raw_text);
                RetrievalResult::reply(self.converse(&rewritten).await)
            }
        };

        info!(
            "Handled {} query with {} results in {:.2?}",
            intent,
            result.results().len(),
            start_time.elapsed()
        );
        result
    }

    /// Keyword branch (fail-soft inside the strategy)
    pub async fn search(&self, text: &str, limit: usize) -> Vec<Movie> {
        keyword_search(self.store.as_deref(), text, limit).await
    }

    /// Recommendation branch, typed
    async fn try_recommend(
        &self,
        text: &str,
        context: &QueryContext,
    ) -> Result<Vec<Movie>, RetrievalError> {
        let recommender = self
            .recommender
            .as_ref()
            .ok_or(RetrievalError::NotConfigured(Collaborator::Recommender))?;

        let request = RecommendationRequest {
            seed_ids: context.recent_movie_ids.clone(),
            query_text: text.to_string(),
            limit: self.config.recommendation_limit.max(1),
        };
        debug!(
            "Requesting recommendations from {} with {} seeds",
            recommender.name(),
            request.seed_ids.len()
        );

        let mut movies = recommender
            .recommend(&request)
            .await
            .map_err(RetrievalError::Recommender)?;
        movies.truncate(request.limit);
        Ok(movies)
    }

    async fn recommend(&self, text: &str, context: &QueryContext) -> Vec<Movie> {
        self.try_recommend(text, context).await.unwrap_or_else(|e| {
            warn!("Recommendation branch degraded to no results: {}", e);
            Vec::new()
        })
    }

    /// Conversational branch, typed
    async fn try_converse(&self, text: &str) -> Result<String, RetrievalError> {
        let conversation = self
            .conversation
            .as_ref()
            .ok_or(RetrievalError::NotConfigured(Collaborator::Conversation))?;

        debug!("Requesting reply from {}", conversation.name());
        conversation
            .reply(text)
            .await
            .map_err(RetrievalError::Conversation)
    }

    async fn converse(&self, text: &str) -> String {
        self.try_converse(text).await.unwrap_or_else(|e| {
            warn!("Conversational branch fell back to static reply: {}", e);
            self.config.fallback_reply.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use data_loader::MovieCatalog;
    use retrieval::{CatalogStore, ChatTurn, CollaboratorError, MatchCriteria, StoreError};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // ============================================================================
    // Test Fixtures
    // ============================================================================

    fn build_test_catalog() -> Arc<MovieCatalog> {
        Arc::new(MovieCatalog::from_movies(vec![
            Movie::new("1", "The Matrix")
                .with_genres(["Action", "Sci-Fi"])
                .with_cast(["Keanu Reeves"]),
            Movie::new("2", "Inception")
                .with_genres(["Action", "Thriller"])
                .with_cast(["Leonardo DiCaprio"]),
            Movie::new("3", "Toy Story")
                .with_genres(["Animation", "Comedy"])
                .with_cast(["Tom Hanks"]),
        ]))
    }

    /// Wraps the catalog store and counts lookups
    struct CountingStore {
        inner: CatalogStore,
        calls: AtomicUsize,
    }

    impl CountingStore {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                inner: CatalogStore::new(build_test_catalog()),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MovieStore for CountingStore {
        fn name(&self) -> &str {
            "CountingStore"
        }

        async fn find(&self, criteria: &MatchCriteria) -> Result<Vec<Movie>, StoreError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.find(criteria).await
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl MovieStore for BrokenStore {
        fn name(&self) -> &str {
            "BrokenStore"
        }

        async fn find(&self, _criteria: &MatchCriteria) -> Result<Vec<Movie>, StoreError> {
            Err(StoreError::Unavailable("store offline".to_string()))
        }
    }

    /// Records the last request and returns fixed movies (or fails)
    #[derive(Default)]
    struct MockRecommender {
        fail: bool,
        last_request: Mutex<Option<RecommendationRequest>>,
    }

    #[async_trait]
    impl Recommender for MockRecommender {
        fn name(&self) -> &str {
            "MockRecommender"
        }

        async fn recommend(
            &self,
            request: &RecommendationRequest,
        ) -> Result<Vec<Movie>, CollaboratorError> {
            *self.last_request.lock().unwrap() = Some(request.clone());
            if self.fail {
                return Err(CollaboratorError::Unavailable("model offline".to_string()));
            }
            Ok((0..25)
                .map(|i| Movie::new(format!("rec-{i}"), format!("Recommended {i}")))
                .collect())
        }
    }

    #[derive(Default)]
    struct MockConversation {
        fail: bool,
        last_text: Mutex<Option<String>>,
    }

    #[async_trait]
    impl Conversationalist for MockConversation {
        fn name(&self) -> &str {
            "MockConversation"
        }

        async fn reply(&self, text: &str) -> Result<String, CollaboratorError> {
            *self.last_text.lock().unwrap() = Some(text.to_string());
            if self.fail {
                return Err(CollaboratorError::Failed("engine error".to_string()));
            }
            Ok("Once upon a time...".to_string())
        }
    }

    fn full_dispatcher(
        store: Arc<CountingStore>,
        recommender: Arc<MockRecommender>,
        conversation: Arc<MockConversation>,
    ) -> QueryDispatcher {
        QueryDispatcher::new(DispatchConfig::default())
            .with_store(store)
            .with_recommender(recommender)
            .with_conversation(conversation)
    }

    // ============================================================================
    // Routing
    // ============================================================================

    #[tokio::test]
    async fn test_recommend_never_invokes_keyword_strategy() {
        let store = CountingStore::new();
        let recommender = Arc::new(MockRecommender::default());
        let dispatcher = full_dispatcher(
            store.clone(),
            recommender.clone(),
            Arc::new(MockConversation::default()),
        );

        let result = dispatcher
            .handle(&Query::new("suggest movies like Inception"))
            .await;

        assert_eq!(result.intent(), Intent::Recommend);
        assert_eq!(store.calls(), 0, "keyword strategy must not run");

        let request = recommender.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.query_text, "suggest movies like Inception");
        assert!(request.seed_ids.is_empty());
    }

    #[tokio::test]
    async fn test_recommendations_capped_at_limit() {
        let recommender = Arc::new(MockRecommender::default());
        let dispatcher = QueryDispatcher::new(DispatchConfig {
            recommendation_limit: 4,
            ..DispatchConfig::default()
        })
        .with_recommender(recommender);

        let result = dispatcher.handle(&Query::new("recommend a comedy")).await;
        assert_eq!(result.results().len(), 4);
    }

    #[tokio::test]
    async fn test_qa_routes_to_keyword_search() {
        let store = CountingStore::new();
        let recommender = Arc::new(MockRecommender::default());
        let dispatcher = full_dispatcher(
            store.clone(),
            recommender.clone(),
            Arc::new(MockConversation::default()),
        );

        let result = dispatcher.handle(&Query::new("matrix reloaded")).await;

        assert_eq!(result.intent(), Intent::Qa);
        assert_eq!(store.calls(), 1);
        assert_eq!(result.results().len(), 1);
        assert_eq!(result.results()[0].title, "The Matrix");
        assert!(recommender.last_request.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_conversational_routes_to_engine() {
        let conversation = Arc::new(MockConversation::default());
        let dispatcher = full_dispatcher(
            CountingStore::new(),
            Arc::new(MockRecommender::default()),
            conversation.clone(),
        );

        let result = dispatcher.handle(&Query::new("Hello, tell me a story")).await;

        assert_eq!(result, RetrievalResult::reply("Once upon a time..."));
        assert_eq!(
            conversation.last_text.lock().unwrap().as_deref(),
            Some("Hello, tell me a story")
        );
    }

    // ============================================================================
    // Fail-soft
    // ============================================================================

    #[tokio::test]
    async fn test_absent_text_is_qa_with_no_results() {
        let store = CountingStore::new();
        let dispatcher = QueryDispatcher::new(DispatchConfig::default()).with_store(store.clone());

        let result = dispatcher.handle(&Query::empty()).await;

        assert_eq!(result, RetrievalResult::movies(Intent::Qa, vec![]));
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn test_store_fault_degrades_to_empty() {
        let dispatcher =
            QueryDispatcher::new(DispatchConfig::default()).with_store(Arc::new(BrokenStore));

        let result = dispatcher.handle(&Query::new("inception")).await;
        assert_eq!(result, RetrievalResult::movies(Intent::Qa, vec![]));
    }

    #[tokio::test]
    async fn test_missing_collaborators_fall_back() {
        let dispatcher = QueryDispatcher::new(DispatchConfig::default());

        let qa = dispatcher.handle(&Query::new("inception")).await;
        assert_eq!(qa, RetrievalResult::movies(Intent::Qa, vec![]));

        let rec = dispatcher.handle(&Query::new("recommend a thriller")).await;
        assert_eq!(rec, RetrievalResult::movies(Intent::Recommend, vec![]));

        let chat = dispatcher.handle(&Query::new("hello there")).await;
        assert_eq!(chat.intent(), Intent::Conversational);
        assert_eq!(chat.response(), Some(DispatchConfig::default().fallback_reply.as_str()));
    }

    #[tokio::test]
    async fn test_recommender_fault_degrades_to_empty() {
        let recommender = Arc::new(MockRecommender {
            fail: true,
            ..Default::default()
        });
        let dispatcher = QueryDispatcher::new(DispatchConfig::default()).with_recommender(recommender);

        let result = dispatcher.handle(&Query::new("something similar to Heat")).await;
        assert_eq!(result, RetrievalResult::movies(Intent::Recommend, vec![]));
    }

    #[tokio::test]
    async fn test_conversation_fault_uses_fallback_reply() {
        let conversation = Arc::new(MockConversation {
            fail: true,
            ..Default::default()
        });
        let config = DispatchConfig {
            fallback_reply: "Sorry, I'm offline.".to_string(),
            ..DispatchConfig::default()
        };
        let dispatcher = QueryDispatcher::new(config).with_conversation(conversation);

        let result = dispatcher.handle(&Query::new("how are you")).await;
        assert_eq!(result, RetrievalResult::reply("Sorry, I'm offline."));
    }

    // ============================================================================
    // Context
    // ============================================================================

    #[tokio::test]
    async fn test_context_seeds_and_rewrites_recommendation() {
        let recommender = Arc::new(MockRecommender::default());
        let dispatcher =
            QueryDispatcher::new(DispatchConfig::default()).with_recommender(recommender.clone());

        let context = QueryContext {
            history: vec![
                ChatTurn::user("mind-bending heist films"),
                ChatTurn::assistant("Inception is a classic."),
            ],
            recent_movie_ids: vec!["2".to_string()],
        };
        dispatcher
            .handle_with_context(&Query::new("more like that"), &context)
            .await;

        let request = recommender.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.seed_ids, vec!["2".to_string()]);
        assert_eq!(
            request.query_text,
            "In context of: \"mind-bending heist films\". Question: more like that"
        );
    }

    #[tokio::test]
    async fn test_keyword_search_ignores_history() {
        let store = CountingStore::new();
        let dispatcher = QueryDispatcher::new(DispatchConfig::default()).with_store(store.clone());

        let context = QueryContext {
            history: vec![ChatTurn::user("tom hanks")],
            recent_movie_ids: vec![],
        };
        let result = dispatcher
            .handle_with_context(&Query::new("inception"), &context)
            .await;

        let ids: Vec<_> = result.results().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["2"]);
    }

    #[tokio::test]
    async fn test_concurrent_queries_are_independent() {
        let store = CountingStore::new();
        let dispatcher = full_dispatcher(
            store.clone(),
            Arc::new(MockRecommender::default()),
            Arc::new(MockConversation::default()),
        );

        let queries = ["matrix", "toy", "recommend a comedy", "hello", "inception"];
        let handles: Vec<_> = queries
            .iter()
            .map(|text| {
                let dispatcher = dispatcher.clone();
                let query = Query::new(*text);
                tokio::spawn(async move { dispatcher.handle(&query).await })
            })
            .collect();

        let mut intents = Vec::new();
        for handle in handles {
            intents.push(handle.await.unwrap().intent());
        }

        assert_eq!(
            intents,
            vec![
                Intent::Qa,
                Intent::Qa,
                Intent::Recommend,
                Intent::Conversational,
                Intent::Qa
            ]
        );
        assert_eq!(store.calls(), 3);
    }
}
