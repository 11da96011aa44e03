//! Story composition: genre resolution, template sampling, decoration and
//! the AI path with template fallback.

use crate::ai::{AiGenerator, ClaudeService, GenerationError, StoryService};
use crate::config::StoryConfig;
use crate::genre::{Genre, Mode, Slot};
use crate::templates::{self, OBJECT_ADJECTIVES};
use rand::Rng;
use serde::{Serialize, Serializer};
use std::fmt;

/// Returned in place of a story when fewer than three keywords reach the composer.
pub const TOO_FEW_KEYWORDS_MESSAGE: &str = "Please enter at least three keywords.";

/// Separator between paragraphs.
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Where a story's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "origin", rename_all = "lowercase")]
pub enum StoryOrigin {
    /// Filled from the template catalog.
    Template { genre: Genre },
    /// Returned by the generation service.
    Ai,
    /// The fixed too-few-keywords message.
    Notice,
}

/// A generated story.
#[derive(Debug, Serialize)]
pub struct Story {
    /// The story text, paragraphs separated by a blank line.
    #[serde(rename = "story")]
    pub text: String,

    #[serde(flatten)]
    pub origin: StoryOrigin,

    /// Set when AI mode was requested but templates were used instead.
    #[serde(serialize_with = "serialize_fallback")]
    pub fallback: Option<GenerationError>,
}

impl Story {
    fn notice() -> Self {
        Self {
            text: TOO_FEW_KEYWORDS_MESSAGE.to_string(),
            origin: StoryOrigin::Notice,
            fallback: None,
        }
    }

    /// Paragraphs of the story, split on the blank-line separator.
    pub fn paragraphs(&self) -> Vec<&str> {
        self.text
            .split(PARAGRAPH_SEPARATOR)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    }

    /// The genre used, for template stories.
    pub fn genre(&self) -> Option<Genre> {
        match self.origin {
            StoryOrigin::Template { genre } => Some(genre),
            StoryOrigin::Ai | StoryOrigin::Notice => None,
        }
    }

    pub fn fell_back(&self) -> bool {
        self.fallback.is_some()
    }
}

impl fmt::Display for Story {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

fn serialize_fallback<S: Serializer>(
    fallback: &Option<GenerationError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match fallback {
        Some(reason) => serializer.serialize_some(&reason.to_string()),
        None => serializer.serialize_none(),
    }
}

/// Build a story from the template catalog.
///
/// The genre is `genre` if given, otherwise drawn uniformly. One template
/// is drawn per slot, and each paragraph independently decides whether to
/// put an adjective in front of the object.
pub fn compose_template<K, R>(keywords: &[K], genre: Option<Genre>, rng: &mut R) -> Story
where
    K: AsRef<str>,
    R: Rng + ?Sized,
{
    let (character, place, object) = match keywords {
        [c, p, o, ..] => (c.as_ref(), p.as_ref(), o.as_ref()),
        _ => return Story::notice(),
    };

    let genre = Genre::resolve(genre, rng);
    let catalog = templates::lookup(genre);
    tracing::debug!(%genre, "composing template story");

    let paragraphs: Vec<String> = Slot::ALL
        .iter()
        .map(|&slot| {
            let candidates = catalog.slot(slot);
            let template = candidates[rng.gen_range(0..candidates.len())];
            let object = decorate_object(object, rng);
            templates::fill(template, character, place, &object)
        })
        .collect();

    Story {
        text: paragraphs.join(PARAGRAPH_SEPARATOR),
        origin: StoryOrigin::Template { genre },
        fallback: None,
    }
}

/// Half the time, prefix the object with a random adjective.
pub fn decorate_object<R: Rng + ?Sized>(object: &str, rng: &mut R) -> String {
    if rng.gen_bool(0.5) {
        let adjective = OBJECT_ADJECTIVES[rng.gen_range(0..OBJECT_ADJECTIVES.len())];
        format!("{adjective} {object}")
    } else {
        object.to_string()
    }
}

/// Produces stories in either mode.
pub struct StoryComposer<S = ClaudeService> {
    ai: AiGenerator<S>,
}

impl StoryComposer<ClaudeService> {
    /// Composer backed by Claude when an API key is configured.
    pub fn new(config: &StoryConfig) -> Self {
        let service = match ClaudeService::from_config(config) {
            Ok(service) => Some(service),
            Err(e) => {
                tracing::debug!("AI mode unavailable: {e}");
                None
            }
        };
        Self {
            ai: AiGenerator::new(service, config),
        }
    }
}

impl<S: StoryService> StoryComposer<S> {
    /// Composer that delegates AI mode to `service`.
    pub fn with_service(service: S, config: &StoryConfig) -> Self {
        Self {
            ai: AiGenerator::new(Some(service), config),
        }
    }

    /// Composer with no generation service; AI mode always falls back.
    pub fn unconfigured(config: &StoryConfig) -> Self {
        Self {
            ai: AiGenerator::new(None, config),
        }
    }

    pub fn ai_available(&self) -> bool {
        self.ai.is_configured()
    }

    /// Compose a story.
    ///
    /// In AI mode the service is called once; a non-empty answer is returned
    /// as-is, anything else falls back to the template path and records
    /// the reason in [`Story::fallback`].
    pub async fn compose<K, R>(
        &self,
        keywords: &[K],
        genre: Option<Genre>,
        mode: Mode,
        rng: &mut R,
    ) -> Story
    where
        K: AsRef<str>,
        R: Rng + ?Sized,
    {
        if mode == Mode::Template {
            return compose_template(keywords, genre, rng);
        }

        let reason = match self.ai.generate_story(keywords, genre).await {
            Ok(text) => {
                return Story {
                    text,
                    origin: StoryOrigin::Ai,
                    fallback: None,
                }
            }
            Err(reason) => reason,
        };

        match &reason {
            GenerationError::Unconfigured | GenerationError::TooFewKeywords => {
                tracing::info!("AI mode skipped ({reason}); using templates")
            }
            _ => tracing::warn!(
                transient = reason.is_transient(),
                "AI generation failed ({reason}); using templates"
            ),
        }

        let mut story = compose_template(keywords, genre, rng);
        story.fallback = Some(reason);
        story
    }
}
