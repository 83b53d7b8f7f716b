use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use trendline_core::connector::{InterestOverTimeProvider, RelatedQueriesProvider, TrendConnector};
use trendline_core::{InterestRequest, KeywordBatch, RawFrame, RelatedQueriesResponse, TrendError};

/// Instruction for how a method should behave for a given input.
#[derive(Clone)]
pub enum MockBehavior<T> {
    /// Return the provided value immediately.
    Return(T),
    /// Fail immediately with the provided error.
    Fail(TrendError),
    /// Hang indefinitely (simulate a timeout).
    Hang,
}

/// Scripted behaviors for one capability.
///
/// Queued behaviors are keyed by the first keyword of a batch and consumed one
/// per call; once a queue runs dry the fallback applies.
struct Script<T> {
    queued: HashMap<String, VecDeque<MockBehavior<T>>>,
    fallback: Option<MockBehavior<T>>,
    calls: Vec<Vec<String>>,
}

impl<T> Default for Script<T> {
    fn default() -> Self {
        Self {
            queued: HashMap::new(),
            fallback: None,
            calls: Vec::new(),
        }
    }
}

impl<T: Clone> Script<T> {
    fn next(&mut self, batch: &KeywordBatch) -> Option<MockBehavior<T>> {
        self.calls.push(batch.labels());
        let key = batch.keywords.first().map(|k| k.as_str().to_string());
        key.and_then(|k| self.queued.get_mut(&k))
            .and_then(VecDeque::pop_front)
            .or_else(|| self.fallback.clone())
    }
}

#[derive(Default)]
struct InternalState {
    interest: Script<RawFrame>,
    related: Script<RelatedQueriesResponse>,
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockController {
    /// Queue a behavior for the next `interest_over_time` call whose batch
    /// starts with `first_keyword`.
    pub async fn push_interest_behavior(
        &self,
        first_keyword: &str,
        behavior: MockBehavior<RawFrame>,
    ) {
        let mut guard = self.state.lock().await;
        guard
            .interest
            .queued
            .entry(first_keyword.to_string())
            .or_default()
            .push_back(behavior);
    }

    /// Behavior for `interest_over_time` calls with nothing queued.
    pub async fn set_interest_fallback(&self, behavior: MockBehavior<RawFrame>) {
        let mut guard = self.state.lock().await;
        guard.interest.fallback = Some(behavior);
    }

    /// Queue a behavior for the next `related_queries` call whose batch starts
    /// with `first_keyword`.
    pub async fn push_related_behavior(
        &self,
        first_keyword: &str,
        behavior: MockBehavior<RelatedQueriesResponse>,
    ) {
        let mut guard = self.state.lock().await;
        guard
            .related
            .queued
            .entry(first_keyword.to_string())
            .or_default()
            .push_back(behavior);
    }

    /// Behavior for `related_queries` calls with nothing queued.
    pub async fn set_related_fallback(&self, behavior: MockBehavior<RelatedQueriesResponse>) {
        let mut guard = self.state.lock().await;
        guard.related.fallback = Some(behavior);
    }

    /// Keyword lists of every `interest_over_time` call, in call order.
    pub async fn interest_calls(&self) -> Vec<Vec<String>> {
        self.state.lock().await.interest.calls.clone()
    }

    /// Keyword lists of every `related_queries` call, in call order.
    pub async fn related_calls(&self) -> Vec<Vec<String>> {
        self.state.lock().await.related.calls.clone()
    }

    /// Clear all queued behaviors, fallbacks and call logs.
    pub async fn clear_all(&self) {
        let mut guard = self.state.lock().await;
        *guard = InternalState::default();
    }
}

/// Connector whose responses are scripted through a [`DynamicMockController`].
pub struct DynamicMockConnector {
    name: &'static str,
    max_keywords: usize,
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockConnector {
    /// Create a connector and the controller that scripts it.
    #[must_use]
    pub fn new_with_controller(
        name: &'static str,
    ) -> (Arc<dyn TrendConnector>, DynamicMockController) {
        Self::with_max_keywords(name, trendline_core::DEFAULT_BATCH_SIZE)
    }

    /// Like [`Self::new_with_controller`] but advertising a different per-call keyword limit.
    #[must_use]
    pub fn with_max_keywords(
        name: &'static str,
        max_keywords: usize,
    ) -> (Arc<dyn TrendConnector>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let connector = Arc::new(Self {
            name,
            max_keywords,
            state: state.clone(),
        });
        (connector, DynamicMockController { state })
    }
}

async fn play<T>(behavior: Option<MockBehavior<T>>, capability: &str) -> Result<T, TrendError> {
    match behavior {
        Some(MockBehavior::Return(v)) => Ok(v),
        Some(MockBehavior::Fail(e)) => Err(e),
        Some(MockBehavior::Hang) => {
            std::future::pending::<()>().await;
            unreachable!()
        }
        None => Err(TrendError::unsupported(capability)),
    }
}

impl TrendConnector for DynamicMockConnector {
    fn name(&self) -> &'static str {
        self.name
    }
    fn vendor(&self) -> &'static str {
        "Mock"
    }
    fn max_keywords_per_query(&self) -> usize {
        self.max_keywords
    }

    fn as_interest_over_time_provider(&self) -> Option<&dyn InterestOverTimeProvider> {
        Some(self as &dyn InterestOverTimeProvider)
    }
    fn as_related_queries_provider(&self) -> Option<&dyn RelatedQueriesProvider> {
        Some(self as &dyn RelatedQueriesProvider)
    }
}

#[async_trait]
impl InterestOverTimeProvider for DynamicMockConnector {
    async fn interest_over_time(
        &self,
        batch: &KeywordBatch,
        _req: &InterestRequest,
    ) -> Result<RawFrame, TrendError> {
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.interest.next(batch)
        };
        play(behavior, "interest-over-time").await
    }
}

#[async_trait]
impl RelatedQueriesProvider for DynamicMockConnector {
    async fn related_queries(
        &self,
        batch: &KeywordBatch,
        _req: &InterestRequest,
    ) -> Result<RelatedQueriesResponse, TrendError> {
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.related.next(batch)
        };
        play(behavior, "related-queries").await
    }
}
