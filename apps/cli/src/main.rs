mod commands;
mod env;
mod runtime;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{Context, captions, schedule, sessions};

#[derive(Parser)]
#[command(name = "reel", about = "Caption and timeline tools for narrated short-form video")]
struct Cli {
    /// Directory holding saved sessions and uploaded assets.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[arg(long, global = true)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Repair word timings of a transcription file.
    Repair(captions::RepairArgs),
    /// Group transcription words into captions, as JSON or SRT.
    Captions(captions::CaptionsArgs),
    /// Credit and narration length estimate for a script file.
    Estimate(captions::EstimateArgs),
    /// Resolve a session into a frame-indexed render schedule.
    Schedule(schedule::ScheduleArgs),
    #[command(subcommand)]
    Sessions(sessions::SessionsCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let env = env::env();
    let ctx = Context {
        data_dir: cli.data_dir.or_else(|| env.data_dir.clone()),
        profile: cli.profile.unwrap_or_else(|| env.profile.clone()),
    };

    match cli.command {
        Command::Repair(args) => captions::repair(args).await,
        Command::Captions(args) => captions::captions(args).await,
        Command::Estimate(args) => captions::estimate(args).await,
        Command::Schedule(args) => schedule::run(args, &ctx).await,
        Command::Sessions(command) => sessions::run(command, &ctx).await,
    }
}
