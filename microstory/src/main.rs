//! Micro story generator CLI.
//!
//! Turns three keywords (character, place, object) into a short story,
//! either from genre templates or through Claude with template fallback.
//!
//! ```bash
//! cargo run -p microstory                                  # interactive
//! cargo run -p microstory -- --mode ai --genre mystery     # skip mode/genre prompts
//! cargo run -p microstory -- --keywords "knight, forest, sword" --seed 7
//! ```

mod interactive;

use anyhow::Context;
use clap::Parser;
use microstory_core::{Mode, StoryComposer, StoryConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use interactive::{Options, Outcome};

#[derive(Parser)]
#[command(name = "microstory")]
#[command(about = "Generate a micro story from a character, a place and an object")]
#[command(version)]
struct Cli {
    /// Generation mode: t/template or a/ai (prompted for when omitted;
    /// MICROSTORY_MODE only sets the prompt's default)
    #[arg(short, long)]
    mode: Option<Mode>,

    /// Genre name or 'random' (prompted for when omitted)
    #[arg(short, long)]
    genre: Option<String>,

    /// Comma-separated keywords; generates a single story and exits
    #[arg(short, long)]
    keywords: Option<String>,

    /// Ask for keywords once instead of looping
    #[arg(long)]
    once: bool,

    /// Seed for reproducible template stories
    #[arg(long)]
    seed: Option<u64>,

    /// Anthropic API key
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model used in AI mode
    #[arg(long, env = "MICROSTORY_MODEL")]
    model: Option<String>,

    /// Maximum output tokens in AI mode
    #[arg(long, env = "MICROSTORY_MAX_TOKENS", value_parser = clap::value_parser!(u64).range(1..))]
    max_tokens: Option<u64>,

    /// Seconds to wait for the AI service before falling back
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Print stories as JSON
    #[arg(long)]
    json: bool,

    /// Verbose logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Apply command-line overrides on top of the environment configuration.
    fn apply(&self, mut config: StoryConfig) -> StoryConfig {
        if let Some(key) = self.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
            config = config.with_api_key(key.trim());
        }
        if let Some(model) = &self.model {
            config = config.with_model(model);
        }
        if let Some(max_tokens) = self.max_tokens {
            config = config.with_max_tokens(max_tokens as usize);
        }
        if let Some(secs) = self.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        config
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.apply(StoryConfig::from_env().context("invalid configuration")?);
    tracing::debug!(
        model = %config.model,
        max_tokens = config.max_tokens,
        ai_configured = config.is_ai_configured(),
        "configuration loaded"
    );

    let composer = StoryComposer::new(&config);
    let options = Options {
        mode: cli.mode,
        default_mode: config.default_mode,
        genre: cli.genre.clone(),
        json: cli.json,
    };
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout().lock();

    if cli.once || cli.keywords.is_some() {
        let outcome = interactive::run_once(
            &composer,
            &options,
            cli.keywords.clone(),
            &mut rng,
            &mut input,
            &mut out,
        )
        .await?;
        return Ok(match outcome {
            Outcome::Done => ExitCode::SUCCESS,
            Outcome::InvalidInput => ExitCode::FAILURE,
        });
    }

    interactive::run_interactive(&composer, &options, &mut rng, &mut input, &mut out).await?;
    Ok(ExitCode::SUCCESS)
}
