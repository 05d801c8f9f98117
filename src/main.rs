// Sanad - Crisis detection for Arabic mental-health conversations
// Command-line harness over the detection engine

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use sanad::config::load_config;
use sanad::crisis::{Assessment, CrisisDetector};

#[derive(Parser, Debug)]
#[command(name = "sanad")]
#[command(about = "Crisis detection for Arabic mental-health conversations", version)]
struct Args {
    /// Path to config.toml (default: ~/.sanad/config.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser, Debug)]
enum Command {
    /// Assess a single utterance
    Assess {
        /// Utterance text
        text: String,
        /// Session identifier for escalation tracking
        #[arg(long)]
        session: Option<String>,
    },
    /// Assess one utterance per stdin line as a single session.
    /// Blank lines are recorded as quiet turns.
    Chat {
        /// Session identifier (default: random)
        #[arg(long)]
        session: Option<String>,
    },
}

#[derive(Serialize)]
struct TurnOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    session_id: Option<&'a str>,
    assessment: &'a Assessment,
    response: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    prompt_advisory: Option<String>,
}

fn print_turn(out: &mut impl Write, session_id: Option<&str>, assessment: &Assessment) -> Result<()> {
    let turn = TurnOutput {
        session_id,
        assessment,
        response: assessment.response(),
        prompt_advisory: assessment.prompt_advisory(),
    };
    serde_json::to_writer(&mut *out, &turn).context("Failed to serialize assessment")?;
    writeln!(out)?;
    Ok(())
}

/// One turn per input line, blank lines included, so the session trend
/// matches what the library sees
fn run_chat(
    detector: &CrisisDetector,
    session_id: &str,
    input: impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    for line in input.lines() {
        let line = line.context("Failed to read stdin")?;
        let assessment = detector.assess(&line, Some(session_id));
        print_turn(out, Some(session_id), &assessment)?;
        out.flush()?;
    }
    Ok(())
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sanad=info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    let detector = CrisisDetector::new(config).context("Failed to initialize crisis detector")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::Assess { text, session } => {
            let assessment = detector.assess(&text, session.as_deref());
            print_turn(&mut out, session.as_deref(), &assessment)?;
        }
        Command::Chat { session } => {
            let session_id = session.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
            tracing::info!(session_id = %session_id, "Starting chat session");

            run_chat(&detector, &session_id, io::stdin().lock(), &mut out)?;
        }
    }

    Ok(())
}
