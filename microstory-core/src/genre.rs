//! Genres, generation modes and paragraph slots.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for parsing genre and mode names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unknown genre: {0}")]
    UnknownGenre(String),
    #[error("Unknown mode: {0} (expected 't', 'template', 'a' or 'ai')")]
    UnknownMode(String),
}

/// A narrative style bucket governing which template set is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Genre {
    Adventure,
    Mystery,
    Fantasy,
    SciFi,
    Comedy,
}

impl Genre {
    /// Every genre, in catalog order.
    pub const ALL: [Genre; 5] = [
        Genre::Adventure,
        Genre::Mystery,
        Genre::Fantasy,
        Genre::SciFi,
        Genre::Comedy,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Genre::Adventure => "adventure",
            Genre::Mystery => "mystery",
            Genre::Fantasy => "fantasy",
            Genre::SciFi => "sci-fi",
            Genre::Comedy => "comedy",
        }
    }

    /// Draw a genre uniformly at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Genre {
        Genre::ALL[rng.gen_range(0..Genre::ALL.len())]
    }

    /// Use the explicit genre if there is one, otherwise draw one.
    pub fn resolve<R: Rng + ?Sized>(choice: Option<Genre>, rng: &mut R) -> Genre {
        match choice {
            Some(genre) => genre,
            None => Genre::random(rng),
        }
    }

    /// Interpret free-form user input as a genre choice.
    ///
    /// Empty input and `random` mean "pick one for me". Unknown names also
    /// fall back to random rather than failing.
    pub fn parse_choice(input: &str) -> Option<Genre> {
        let input = input.trim();
        if input.is_empty() || input.eq_ignore_ascii_case("random") {
            return None;
        }
        match input.parse() {
            Ok(genre) => Some(genre),
            Err(e) => {
                tracing::warn!("{e}; choosing a random genre");
                None
            }
        }
    }

    /// Comma-separated list of genre names for prompts and help text.
    pub fn list() -> String {
        Genre::ALL
            .iter()
            .map(Genre::name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Genre {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "adventure" => Ok(Genre::Adventure),
            "mystery" => Ok(Genre::Mystery),
            "fantasy" => Ok(Genre::Fantasy),
            "sci-fi" | "scifi" | "sci_fi" => Ok(Genre::SciFi),
            "comedy" => Ok(Genre::Comedy),
            _ => Err(ParseError::UnknownGenre(s.trim().to_string())),
        }
    }
}

/// How a story is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Fill genre templates locally.
    #[default]
    Template,
    /// Ask the generation service first, fall back to templates.
    Ai,
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Template => "template",
            Mode::Ai => "ai",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "t" | "template" => Ok(Mode::Template),
            "a" | "ai" => Ok(Mode::Ai),
            _ => Err(ParseError::UnknownMode(s.trim().to_string())),
        }
    }
}

/// One of the three paragraph positions within a story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Opening,
    Middle,
    Ending,
}

impl Slot {
    /// Slots in story order.
    pub const ALL: [Slot; 3] = [Slot::Opening, Slot::Middle, Slot::Ending];

    pub fn name(&self) -> &'static str {
        match self {
            Slot::Opening => "opening",
            Slot::Middle => "middle",
            Slot::Ending => "ending",
        }
    }
}
