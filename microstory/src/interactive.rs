//! Prompt-driven front end.
//!
//! Reads answers line by line from any `BufRead` and writes prompts and
//! stories to any `Write`, so the whole conversation can be scripted.

use microstory_core::{read_keywords, Genre, Mode, Story, StoryComposer, StoryService};
use rand::Rng;
use std::io::{self, BufRead, Write};

const KEYWORDS_PROMPT: &str = "Enter 3 keywords (character, place, object): ";
const AGAIN_PROMPT: &str = "Generate another story? (y/n): ";
const FALLBACK_NOTE: &str = "(AI unavailable, falling back to template mode)";
const GOODBYE: &str = "Thanks for using the Automated Micro Story Generator. Goodbye!";

/// Choices fixed on the command line.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Generation mode; prompted for when absent.
    pub mode: Option<Mode>,
    /// Mode suggested at the mode prompt.
    pub default_mode: Mode,
    /// Raw genre answer (`random`, a genre name); prompted for when absent.
    pub genre: Option<String>,
    /// Print stories as JSON objects.
    pub json: bool,
}

/// How a single-shot run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    InvalidInput,
}

/// Ask a question and read one trimmed line. `None` at end of input.
fn prompt<I: BufRead, O: Write>(input: &mut I, out: &mut O, question: &str) -> io::Result<Option<String>> {
    write!(out, "{question}")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn choose_mode<I: BufRead, O: Write>(
    input: &mut I,
    out: &mut O,
    options: &Options,
) -> io::Result<Option<Mode>> {
    if let Some(mode) = options.mode {
        return Ok(Some(mode));
    }

    let question = format!(
        "Choose mode: (t)emplate or (a)i [{}]: ",
        options.default_mode
    );
    loop {
        let Some(answer) = prompt(input, out, &question)? else {
            return Ok(None);
        };
        if answer.is_empty() {
            return Ok(Some(options.default_mode));
        }
        match answer.parse::<Mode>() {
            Ok(mode) => return Ok(Some(mode)),
            Err(e) => writeln!(out, "Error: {e}")?,
        }
    }
}

fn choose_genre<I: BufRead, O: Write>(
    input: &mut I,
    out: &mut O,
    options: &Options,
) -> io::Result<Option<Option<Genre>>> {
    if let Some(genre) = &options.genre {
        return Ok(Some(Genre::parse_choice(genre)));
    }

    let question = format!("Choose a genre ({}, or 'random'): ", Genre::list());
    Ok(prompt(input, out, &question)?.map(|answer| Genre::parse_choice(&answer)))
}

fn print_story<O: Write>(out: &mut O, story: &Story, json: bool) -> io::Result<()> {
    if json {
        let rendered = serde_json::to_string_pretty(story).map_err(io::Error::other)?;
        return writeln!(out, "{rendered}");
    }

    if story.fell_back() {
        writeln!(out, "{FALLBACK_NOTE}")?;
    }
    writeln!(out, "\nGenerated Story:\n")?;
    writeln!(out, "{story}")?;
    writeln!(out)
}

/// Run the prompt loop until the user declines another story or input ends.
pub async fn run_interactive<S, R, I, O>(
    composer: &StoryComposer<S>,
    options: &Options,
    rng: &mut R,
    input: &mut I,
    out: &mut O,
) -> io::Result<()>
where
    S: StoryService,
    R: Rng + ?Sized,
    I: BufRead,
    O: Write,
{
    writeln!(out, "Welcome to the Automated Micro Story Generator!\n")?;

    let Some(mode) = choose_mode(input, out, options)? else {
        return Ok(());
    };
    if mode == Mode::Ai && !composer.ai_available() {
        writeln!(out, "Note: no API key configured; stories will use templates.")?;
    }

    loop {
        let Some(raw) = prompt(input, out, KEYWORDS_PROMPT)? else {
            return Ok(());
        };

        let keywords = match read_keywords(&raw) {
            Ok(keywords) => keywords,
            Err(e) => {
                writeln!(out, "Error: {e}\n")?;
                continue;
            }
        };

        let Some(genre) = choose_genre(input, out, options)? else {
            return Ok(());
        };

        let story = composer.compose(keywords.as_slice(), genre, mode, rng).await;
        print_story(out, &story, options.json)?;

        let again = prompt(input, out, AGAIN_PROMPT)?.unwrap_or_default().to_lowercase();
        if again != "y" && again != "yes" {
            writeln!(out, "{GOODBYE}")?;
            return Ok(());
        }
        writeln!(out)?;
    }
}

/// Generate one story from `keywords` (or one prompted line) and stop.
pub async fn run_once<S, R, I, O>(
    composer: &StoryComposer<S>,
    options: &Options,
    keywords: Option<String>,
    rng: &mut R,
    input: &mut I,
    out: &mut O,
) -> io::Result<Outcome>
where
    S: StoryService,
    R: Rng + ?Sized,
    I: BufRead,
    O: Write,
{
    let raw = match keywords {
        Some(raw) => raw,
        None => prompt(input, out, KEYWORDS_PROMPT)?.unwrap_or_default(),
    };

    if raw.trim().is_empty() {
        writeln!(out, "Error: Input cannot be empty.")?;
        return Ok(Outcome::Done);
    }

    let keywords = match read_keywords(&raw) {
        Ok(keywords) => keywords,
        Err(e) => {
            writeln!(out, "Error: {e}")?;
            return Ok(Outcome::InvalidInput);
        }
    };

    let mode = options.mode.unwrap_or(options.default_mode);
    let genre = options.genre.as_deref().and_then(Genre::parse_choice);

    let story = composer.compose(keywords.as_slice(), genre, mode, rng).await;
    print_story(out, &story, options.json)?;
    Ok(Outcome::Done)
}

#[cfg(test)]
mod tests {
    use super::*;
    use microstory_core::{MockService, StoryConfig};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Cursor;

    fn template_options() -> Options {
        Options {
            mode: Some(Mode::Template),
            ..Options::default()
        }
    }

    async fn converse(composer: &StoryComposer<MockService>, options: &Options, script: &str) -> String {
        let mut rng = StdRng::seed_from_u64(3);
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut out = Vec::new();
        run_interactive(composer, options, &mut rng, &mut input, &mut out)
            .await
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_single_story_then_quit() {
        let composer = StoryComposer::<MockService>::unconfigured(&StoryConfig::default());
        let output = converse(&composer, &template_options(), "knight, forest, sword\nmystery\nn\n").await;

        assert!(output.starts_with("Welcome to the Automated Micro Story Generator!"));
        assert!(output.contains("Generated Story:"));
        assert!(output.contains("knight") && output.contains("forest"));
        assert!(output.trim_end().ends_with(GOODBYE));
        assert!(!output.contains(FALLBACK_NOTE));
    }

    #[tokio::test]
    async fn test_invalid_keywords_reprompt() {
        let composer = StoryComposer::<MockService>::unconfigured(&StoryConfig::default());
        let output = converse(
            &composer,
            &template_options(),
            "knight, knight, sword\nknight!, forest, sword\nknight, forest, sword\nrandom\nno\n",
        )
        .await;

        assert!(output.contains("Error: Duplicate keywords are not allowed."));
        assert!(output.contains("Error: Keywords contain unsupported characters."));
        assert_eq!(output.matches("Generated Story:").count(), 1);
    }

    #[tokio::test]
    async fn test_multiple_stories() {
        let composer = StoryComposer::<MockService>::unconfigured(&StoryConfig::default());
        let output = converse(
            &composer,
            &template_options(),
            "knight, forest, sword\nfantasy\ny\nwizard, tower, crystal\ncomedy\nYES\npirate, island, map\n\nn\n",
        )
        .await;

        assert_eq!(output.matches("Generated Story:").count(), 3);
        assert!(output.contains("wizard") && output.contains("pirate"));
    }

    #[tokio::test]
    async fn test_mode_prompt_loops_on_invalid_input() {
        let composer = StoryComposer::<MockService>::unconfigured(&StoryConfig::default());
        let output = converse(&composer, &Options::default(), "poem\nt\nknight, forest, sword\n\nn\n").await;

        assert!(output.contains("Error: Unknown mode: poem"));
        assert!(output.contains("Generated Story:"));
    }

    #[tokio::test]
    async fn test_ai_mode_prints_story_verbatim() {
        let service = MockService::story("An AI-generated tale of a knight.");
        let composer = StoryComposer::with_service(service, &StoryConfig::default());
        let options = Options {
            mode: Some(Mode::Ai),
            ..Options::default()
        };
        let output = converse(&composer, &options, "knight, forest, sword\n\nn\n").await;

        assert!(output.contains("Generated Story:\n\nAn AI-generated tale of a knight.\n"));
        assert!(!output.contains(FALLBACK_NOTE));
    }

    #[tokio::test]
    async fn test_ai_fallback_is_announced() {
        let composer = StoryComposer::with_service(MockService::no_story(), &StoryConfig::default());
        let output = converse(&composer, &Options::default(), "ai\nknight, forest, sword\nadventure\nn\n").await;

        assert!(output.contains(FALLBACK_NOTE));
        assert!(output.contains("knight"));
    }

    #[tokio::test]
    async fn test_end_of_input_stops_quietly() {
        let composer = StoryComposer::<MockService>::unconfigured(&StoryConfig::default());
        let output = converse(&composer, &template_options(), "").await;
        assert!(output.contains(KEYWORDS_PROMPT));
        assert!(!output.contains(GOODBYE));
    }

    #[tokio::test]
    async fn test_genre_flag_skips_genre_prompt() {
        let composer = StoryComposer::<MockService>::unconfigured(&StoryConfig::default());
        let options = Options {
            mode: Some(Mode::Template),
            genre: Some("sci-fi".to_string()),
            ..Options::default()
        };
        let output = converse(&composer, &options, "knight, forest, sword\nn\n").await;
        assert!(!output.contains("Choose a genre"));
        assert!(output.contains("Generated Story:"));
    }

    #[tokio::test]
    async fn test_run_once_outcomes() {
        let composer = StoryComposer::<MockService>::unconfigured(&StoryConfig::default());
        let options = template_options();
        let mut rng = StdRng::seed_from_u64(9);

        let mut out = Vec::new();
        let outcome = run_once(&composer, &options, None, &mut rng, &mut Cursor::new(b"  \n".to_vec()), &mut out)
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Done);
        assert!(String::from_utf8(out).unwrap().contains("Error: Input cannot be empty."));

        let mut out = Vec::new();
        let outcome = run_once(
            &composer,
            &options,
            Some("knight, forest".to_string()),
            &mut rng,
            &mut io::empty(),
            &mut out,
        )
        .await
        .unwrap();
        assert_eq!(outcome, Outcome::InvalidInput);
        assert!(String::from_utf8(out).unwrap().contains("at least three"));

        let mut out = Vec::new();
        let outcome = run_once(
            &composer,
            &options,
            Some("knight, forest, sword".to_string()),
            &mut rng,
            &mut io::empty(),
            &mut out,
        )
        .await
        .unwrap();
        assert_eq!(outcome, Outcome::Done);
        assert!(String::from_utf8(out).unwrap().contains("Generated Story:"));
    }

    #[tokio::test]
    async fn test_json_output() {
        let composer = StoryComposer::<MockService>::unconfigured(&StoryConfig::default());
        let options = Options {
            mode: Some(Mode::Ai),
            genre: Some("mystery".to_string()),
            json: true,
            ..Options::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        let mut out = Vec::new();
        run_once(
            &composer,
            &options,
            Some("knight, forest, sword".to_string()),
            &mut rng,
            &mut io::empty(),
            &mut out,
        )
        .await
        .unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["origin"], "template");
        assert_eq!(value["genre"], "mystery");
        assert_eq!(value["fallback"], "no API key configured");
        assert!(value["story"].as_str().unwrap().contains("knight"));
    }
}
