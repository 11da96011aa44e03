//! Testing utilities for story generation.
//!
//! `MockService` stands in for the remote generator so the AI path and its
//! fallback can be exercised without network access.

use crate::ai::{GenerationError, GenerationRequest, StoryService};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What a [`MockService`] answers with.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return this text.
    Story(String),
    /// Answer, but without any text.
    NoStory,
    /// Fail with this client error.
    Fail(claude::Error),
}

/// A scripted [`StoryService`] that records every request it receives.
///
/// Clones share the request log, so a test can hand one clone to the
/// composer and inspect the other.
#[derive(Debug, Clone)]
pub struct MockService {
    reply: MockReply,
    delay: Option<Duration>,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl MockService {
    pub fn new(reply: MockReply) -> Self {
        Self {
            reply,
            delay: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Always answer with `text`.
    pub fn story(text: impl Into<String>) -> Self {
        Self::new(MockReply::Story(text.into()))
    }

    /// Always answer without text.
    pub fn no_story() -> Self {
        Self::new(MockReply::NoStory)
    }

    /// Always fail with `error`.
    pub fn failing(error: claude::Error) -> Self {
        Self::new(MockReply::Fail(error))
    }

    /// Sleep before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of generate calls so far.
    pub fn call_count(&self) -> usize {
        self.log().len()
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<GenerationRequest> {
        self.log().last().cloned()
    }

    fn log(&self) -> std::sync::MutexGuard<'_, Vec<GenerationRequest>> {
        self.requests.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl StoryService for MockService {
    async fn generate(&self, request: &GenerationRequest) -> Result<Option<String>, GenerationError> {
        self.log().push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.reply {
            MockReply::Story(text) => Ok(Some(text.clone())),
            MockReply::NoStory => Ok(None),
            MockReply::Fail(error) => Err(GenerationError::Service(error.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerationRequest {
        GenerationRequest {
            prompt: "prompt".to_string(),
            model: "model".to_string(),
            max_output_tokens: 10,
        }
    }

    #[tokio::test]
    async fn test_clones_share_request_log() {
        let service = MockService::story("tale");
        let handle = service.clone();

        let reply = service.generate(&request()).await.unwrap();
        assert_eq!(reply.as_deref(), Some("tale"));
        assert_eq!(handle.call_count(), 1);
        assert_eq!(handle.last_request(), Some(request()));
    }

    #[tokio::test]
    async fn test_scripted_failures() {
        let reply = MockService::no_story().generate(&request()).await.unwrap();
        assert_eq!(reply, None);

        let err = MockService::failing(claude::Error::Parse("bad".to_string()))
            .generate(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, GenerationError::Service(claude::Error::Parse(_))));
    }
}
