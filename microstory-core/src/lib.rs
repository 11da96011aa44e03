//! Micro story generation from three keywords.
//!
//! This crate provides:
//! - A fixed catalog of genre templates (opening, middle, ending)
//! - Keyword parsing and validation
//! - A composer that fills templates, or asks Claude for a story and falls
//!   back to templates when that fails
//!
//! # Quick Start
//!
//! ```ignore
//! use microstory_core::{read_keywords, Genre, Mode, StoryComposer, StoryConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StoryConfig::from_env()?;
//!     let composer = StoryComposer::new(&config);
//!     let keywords = read_keywords("knight, forest, sword")?;
//!
//!     let mut rng = rand::thread_rng();
//!     let story = composer
//!         .compose(keywords.as_slice(), Some(Genre::Mystery), Mode::Ai, &mut rng)
//!         .await;
//!     println!("{story}");
//!     Ok(())
//! }
//! ```

pub mod ai;
pub mod composer;
pub mod config;
pub mod genre;
pub mod input;
pub mod templates;
pub mod testing;

// Primary public API
pub use ai::{build_prompt, AiGenerator, ClaudeService, GenerationError, GenerationRequest, StoryService};
pub use composer::{compose_template, Story, StoryComposer, StoryOrigin, TOO_FEW_KEYWORDS_MESSAGE};
pub use config::{ConfigError, StoryConfig};
pub use genre::{Genre, Mode, ParseError, Slot};
pub use input::{parse_keywords, read_keywords, validate_keywords, InputError, Keywords};
pub use testing::{MockReply, MockService};
