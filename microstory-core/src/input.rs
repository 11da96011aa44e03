//! Keyword parsing and validation.

use std::collections::HashSet;
use thiserror::Error;

/// Maximum length of a single keyword, in characters.
pub const MAX_KEYWORD_LENGTH: usize = 50;

/// Number of keywords a story needs: character, place, object.
pub const KEYWORD_COUNT: usize = 3;

/// Reasons keyword input is rejected. `Display` is the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Input cannot be empty.")]
    Empty,
    #[error("Please enter at least three keywords.")]
    TooFew,
    #[error("Duplicate keywords are not allowed.")]
    Duplicate,
    #[error("Keywords must be 50 characters or fewer.")]
    TooLong,
    #[error("Keywords contain unsupported characters. Only letters, spaces, and hyphens are allowed.")]
    UnsupportedCharacters,
}

/// A validated (character, place, object) triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keywords {
    words: [String; KEYWORD_COUNT],
}

impl Keywords {
    pub fn character(&self) -> &str {
        &self.words[0]
    }

    pub fn place(&self) -> &str {
        &self.words[1]
    }

    pub fn object(&self) -> &str {
        &self.words[2]
    }

    pub fn as_slice(&self) -> &[String] {
        &self.words
    }
}

/// Split comma-separated input into trimmed keywords, keeping the first three.
pub fn parse_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|word| !word.is_empty())
        .take(KEYWORD_COUNT)
        .map(str::to_string)
        .collect()
}

/// Check a keyword list and build the validated triple from its first three entries.
///
/// Entries are trimmed before any check; a blank entry does not count as a keyword.
pub fn validate_keywords(keywords: &[String]) -> Result<Keywords, InputError> {
    let trimmed: Vec<&str> = keywords.iter().map(|word| word.trim()).collect();

    if trimmed.iter().all(|word| word.is_empty()) {
        return Err(InputError::Empty);
    }
    let [character, place, object] = match trimmed.as_slice() {
        [c, p, o, ..] if !c.is_empty() && !p.is_empty() && !o.is_empty() => [*c, *p, *o],
        _ => return Err(InputError::TooFew),
    };

    let present: Vec<&str> = trimmed.into_iter().filter(|word| !word.is_empty()).collect();
    let unique: HashSet<&str> = present.iter().copied().collect();
    if unique.len() != present.len() {
        return Err(InputError::Duplicate);
    }

    let words = [character, place, object];
    for keyword in words {
        if keyword.chars().count() > MAX_KEYWORD_LENGTH {
            return Err(InputError::TooLong);
        }
        if !is_allowed_keyword(keyword) {
            return Err(InputError::UnsupportedCharacters);
        }
    }

    Ok(Keywords {
        words: words.map(str::to_string),
    })
}

/// Parse and validate in one step.
pub fn read_keywords(raw: &str) -> Result<Keywords, InputError> {
    validate_keywords(&parse_keywords(raw))
}

// Letters, whitespace and hyphens; at least one character.
fn is_allowed_keyword(keyword: &str) -> bool {
    !keyword.is_empty()
        && keyword
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c.is_whitespace() || c == '-')
}
