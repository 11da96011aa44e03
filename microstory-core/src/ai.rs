//! Story generation through a remote language model.
//!
//! The composer only ever sees [`AiGenerator::generate_story`]: one call,
//! one trimmed story or one [`GenerationError`]. Every error is a reason to
//! fall back to templates.

use crate::config::StoryConfig;
use crate::genre::Genre;
use crate::input::KEYWORD_COUNT;
use async_trait::async_trait;
use claude::{Claude, Message, Request};
use std::time::Duration;
use thiserror::Error;

/// Why the remote path produced no story.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("no API key configured")]
    Unconfigured,

    #[error("at least three keywords are required")]
    TooFewKeywords,

    #[error("service returned no story text")]
    EmptyResponse,

    #[error("no response within {0:?}")]
    Timeout(Duration),

    #[error("service error: {0}")]
    Service(#[from] claude::Error),
}

impl GenerationError {
    /// Expected, self-healing failures (connectivity, rate limits, overload).
    pub fn is_transient(&self) -> bool {
        match self {
            GenerationError::Timeout(_) => true,
            GenerationError::Service(e) => e.is_transient(),
            GenerationError::Unconfigured
            | GenerationError::TooFewKeywords
            | GenerationError::EmptyResponse => false,
        }
    }
}

/// What is sent to the generation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub model: String,
    pub max_output_tokens: usize,
}

/// A remote text generator.
///
/// `Ok(None)` means the service answered without usable text.
#[async_trait]
pub trait StoryService: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<Option<String>, GenerationError>;
}

/// [`StoryService`] backed by the Claude Messages API.
#[derive(Clone)]
pub struct ClaudeService {
    client: Claude,
}

impl ClaudeService {
    pub fn new(client: Claude) -> Self {
        Self { client }
    }

    /// Build a client from configuration. Fails when no key is configured.
    pub fn from_config(config: &StoryConfig) -> Result<Self, GenerationError> {
        let api_key = config
            .api_key
            .as_deref()
            .ok_or(GenerationError::Unconfigured)?;
        let client = Claude::new(api_key)?
            .with_model(&config.model)
            .with_timeout(config.timeout)?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl StoryService for ClaudeService {
    async fn generate(&self, request: &GenerationRequest) -> Result<Option<String>, GenerationError> {
        let api_request = Request::new(vec![Message::user(&request.prompt)])
            .with_model(&request.model)
            .with_max_tokens(request.max_output_tokens);

        let response = self.client.complete(api_request).await?;
        tracing::debug!(
            id = %response.id,
            output_tokens = response.usage.output_tokens,
            "generation response received"
        );
        if response.is_truncated() {
            tracing::warn!(
                max_tokens = request.max_output_tokens,
                "story cut off at the output token limit"
            );
        }
        Ok(response.first_text().map(str::to_string))
    }
}

/// Build the instruction prompt. `None` when fewer than three keywords are given.
pub fn build_prompt<S: AsRef<str>>(keywords: &[S], genre: Option<Genre>) -> Option<String> {
    let [character, place, object] = match keywords {
        [c, p, o, ..] => [c.as_ref(), p.as_ref(), o.as_ref()],
        _ => return None,
    };
    let genre = genre.map_or("any", |g| g.name());

    Some(format!(
        r#"Write a short, creative micro story (1-3 paragraphs) using these elements:
- Character: {character}
- Setting: {place}
- Object: {object}
Genre: {genre}

The story should be engaging, vivid, and self-contained.
Only output the story text, nothing else."#
    ))
}

/// Drives one delegation attempt against an optional service.
pub struct AiGenerator<S> {
    service: Option<S>,
    model: String,
    max_tokens: usize,
    timeout: Duration,
}

impl<S: StoryService> AiGenerator<S> {
    /// Create a generator. `service: None` means AI mode is unconfigured.
    pub fn new(service: Option<S>, config: &StoryConfig) -> Self {
        Self {
            service,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            timeout: config.timeout,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.service.is_some()
    }

    /// Ask the service for a story, exactly once.
    pub async fn generate_story<K: AsRef<str>>(
        &self,
        keywords: &[K],
        genre: Option<Genre>,
    ) -> Result<String, GenerationError> {
        if keywords.len() < KEYWORD_COUNT {
            return Err(GenerationError::TooFewKeywords);
        }
        let service = self.service.as_ref().ok_or(GenerationError::Unconfigured)?;
        let prompt = build_prompt(keywords, genre).ok_or(GenerationError::TooFewKeywords)?;

        let request = GenerationRequest {
            prompt,
            model: self.model.clone(),
            max_output_tokens: self.max_tokens,
        };

        tracing::info!(model = %request.model, "requesting story from generation service");
        let text = tokio::time::timeout(self.timeout, service.generate(&request))
            .await
            .map_err(|_| GenerationError::Timeout(self.timeout))??;

        match text.as_deref().map(str::trim) {
            Some(story) if !story.is_empty() => Ok(story.to_string()),
            _ => Err(GenerationError::EmptyResponse),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockService;

    const KEYWORDS: [&str; 3] = ["knight", "forest", "sword"];

    #[test]
    fn test_prompt_contains_all_keywords() {
        let prompt = build_prompt(&KEYWORDS, None).unwrap();
        assert!(prompt.contains("Character: knight"));
        assert!(prompt.contains("Setting: forest"));
        assert!(prompt.contains("Object: sword"));
        assert!(prompt.contains("Only output the story text"));
    }

    #[test]
    fn test_prompt_genre() {
        let prompt = build_prompt(&KEYWORDS, Some(Genre::Mystery)).unwrap();
        assert!(prompt.contains("Genre: mystery"));

        let prompt = build_prompt(&KEYWORDS, None).unwrap();
        assert!(prompt.contains("Genre: any"));
    }

    #[test]
    fn test_prompt_needs_three_keywords() {
        assert_eq!(build_prompt::<&str>(&[], None), None);
        assert_eq!(build_prompt(&["knight", "forest"], None), None);
    }

    #[tokio::test]
    async fn test_returns_trimmed_story() {
        let service = MockService::story("A knight ventured into the forest.\n");
        let generator = AiGenerator::new(Some(service.clone()), &StoryConfig::default());

        let story = generator.generate_story(&KEYWORDS, None).await.unwrap();
        assert_eq!(story, "A knight ventured into the forest.");
        assert_eq!(service.call_count(), 1);

        let request = service.last_request().unwrap();
        assert_eq!(request.model, crate::config::DEFAULT_MODEL);
        assert_eq!(request.max_output_tokens, 500);
        assert!(request.prompt.contains("knight"));
    }

    #[tokio::test]
    async fn test_service_error() {
        let service = MockService::failing(claude::Error::Network("Connection failed".to_string()));
        let generator = AiGenerator::new(Some(service), &StoryConfig::default());

        let err = generator.generate_story(&KEYWORDS, None).await.unwrap_err();
        assert!(matches!(err, GenerationError::Service(claude::Error::Network(_))));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_rate_limit_is_transient() {
        let service = MockService::failing(claude::Error::Api {
            status: 429,
            message: "Rate limited".to_string(),
        });
        let generator = AiGenerator::new(Some(service), &StoryConfig::default());

        let err = generator.generate_story(&KEYWORDS, None).await.unwrap_err();
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_blank_response_is_empty() {
        let generator = AiGenerator::new(Some(MockService::story("  \n ")), &StoryConfig::default());
        let err = generator.generate_story(&KEYWORDS, None).await.unwrap_err();
        assert!(matches!(err, GenerationError::EmptyResponse));

        let generator = AiGenerator::new(Some(MockService::no_story()), &StoryConfig::default());
        let err = generator.generate_story(&KEYWORDS, None).await.unwrap_err();
        assert!(matches!(err, GenerationError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_too_few_keywords_skips_service() {
        let service = MockService::story("unused");
        let generator = AiGenerator::new(Some(service.clone()), &StoryConfig::default());

        let err = generator.generate_story(&["knight", "forest"], None).await.unwrap_err();
        assert!(matches!(err, GenerationError::TooFewKeywords));
        assert_eq!(service.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unconfigured() {
        let generator: AiGenerator<MockService> = AiGenerator::new(None, &StoryConfig::default());
        assert!(!generator.is_configured());
        let err = generator.generate_story(&KEYWORDS, None).await.unwrap_err();
        assert!(matches!(err, GenerationError::Unconfigured));
    }

    #[tokio::test]
    async fn test_slow_service_times_out() {
        let service = MockService::story("too late").with_delay(Duration::from_millis(500));
        let config = StoryConfig::default().with_timeout(Duration::from_millis(20));
        let generator = AiGenerator::new(Some(service), &config);

        let err = generator.generate_story(&KEYWORDS, None).await.unwrap_err();
        assert!(matches!(err, GenerationError::Timeout(_)));
    }

    #[test]
    fn test_claude_service_requires_key() {
        let result = ClaudeService::from_config(&StoryConfig::default());
        assert!(matches!(result, Err(GenerationError::Unconfigured)));
        assert!(ClaudeService::from_config(&StoryConfig::default().with_api_key("sk-test")).is_ok());
    }
}
