use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use plait_skills::{discover_skills, generate_skills_prompt, SkillAction, SkillSet};
use plait_stream::{drive, MarkdownRenderer, SseRenderer, TerminalRenderer};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser, Debug)]
#[clap(
    name = "plait",
    version = "0.1.0",
    about = "Replay agent event streams and inspect skills"
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    #[clap(long, short, default_value = "info", help = "Log level filter")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a JSONL capture of raw runtime events through a renderer
    Replay {
        /// Capture file with one raw event object per line
        file: PathBuf,

        #[clap(long, short, value_enum, default_value_t = RendererKind::Terminal)]
        renderer: RendererKind,

        #[clap(long, help = "Disable ANSI colors in terminal output")]
        no_color: bool,
    },
    /// Inspect or activate skills in a directory
    Skills {
        /// Root directory containing skill subdirectories
        dir: PathBuf,

        #[clap(subcommand)]
        action: SkillsCommand,
    },
    /// Print the system-prompt section for a skills directory
    Prompt {
        /// Root directory containing skill subdirectories
        dir: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum SkillsCommand {
    /// List discovered skills
    List,
    /// Show one skill's metadata
    Info { name: String },
    /// Load one skill's full instructions
    Activate { name: String },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum RendererKind {
    /// ANSI-colored terminal output
    Terminal,
    /// Markdown fragments as JSON lines
    Markdown,
    /// Server-sent-event frames
    Sse,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = cli
        .log_level
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::Info);
    env_logger::Builder::new().filter_level(level).init();

    match cli.command {
        Commands::Replay {
            file,
            renderer,
            no_color,
        } => replay(file, renderer, no_color).await,
        Commands::Skills { dir, action } => skills(dir, action),
        Commands::Prompt { dir } => {
            let skills = discover_skills(&dir)
                .with_context(|| format!("failed to discover skills in {}", dir.display()))?;
            print!("{}", generate_skills_prompt(&skills));
            Ok(())
        }
    }
}

async fn replay(file: PathBuf, kind: RendererKind, no_color: bool) -> Result<()> {
    let handle = tokio::fs::File::open(&file)
        .await
        .with_context(|| format!("failed to open capture {}", file.display()))?;
    let mut lines = BufReader::new(handle).lines();

    let raw_events = async_stream::stream! {
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    match serde_json::from_str::<Value>(line) {
                        Ok(event) => yield event,
                        Err(e) => log::warn!("skipping malformed event line: {e}"),
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    log::warn!("stopping replay on read error: {e}");
                    break;
                }
            }
        }
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match kind {
        RendererKind::Terminal => {
            let mut renderer = TerminalRenderer::new().with_colors(!no_color);
            for chunk in drive(&mut renderer, raw_events).await {
                write!(out, "{chunk}")?;
            }
            writeln!(out)?;
        }
        RendererKind::Markdown => {
            let mut renderer = MarkdownRenderer::new();
            for fragment in drive(&mut renderer, raw_events).await {
                writeln!(out, "{}", serde_json::to_string(&fragment)?)?;
            }
        }
        RendererKind::Sse => {
            let mut renderer = SseRenderer::new();
            for frame in drive(&mut renderer, raw_events).await {
                write!(out, "{frame}")?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

fn skills(dir: PathBuf, command: SkillsCommand) -> Result<()> {
    let set = SkillSet::new(
        discover_skills(&dir)
            .with_context(|| format!("failed to discover skills in {}", dir.display()))?,
    );

    let output = match command {
        SkillsCommand::List => set.dispatch("", SkillAction::List)?,
        SkillsCommand::Info { name } => set.dispatch(&name, SkillAction::Info)?,
        SkillsCommand::Activate { name } => set.dispatch(&name, SkillAction::Activate)?,
    };
    println!("{output}");
    Ok(())
}
