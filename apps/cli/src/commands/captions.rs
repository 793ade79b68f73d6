use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Args;
use reel_timeline::repair::{GAP_BETWEEN_WORDS, MIN_WORD_DURATION};
use reel_timeline::{
    GroupSizePolicy, RepairConfig, ScriptEstimate, TranscriptInput, TranscriptionResponse, group,
    to_srt,
};

use super::{emit, emit_json};

#[derive(Args)]
pub struct RepairArgs {
    /// Transcription JSON with word timestamps.
    pub transcript: PathBuf,

    #[arg(long, default_value_t = MIN_WORD_DURATION)]
    pub min_word_duration: f64,

    #[arg(long, default_value_t = GAP_BETWEEN_WORDS)]
    pub gap: f64,

    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Args)]
pub struct CaptionsArgs {
    pub transcript: PathBuf,

    /// Words per caption, one value per group; the last one repeats.
    #[arg(long = "group-size", value_delimiter = ',')]
    pub group_sizes: Vec<usize>,

    #[arg(long)]
    pub srt: bool,

    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Args)]
pub struct EstimateArgs {
    pub script: PathBuf,
}

async fn read_transcript(path: &Path, config: &RepairConfig) -> anyhow::Result<TranscriptInput> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let response: TranscriptionResponse = serde_json::from_slice(&bytes)?;
    TranscriptInput::from_response_with(&response, config).context("transcript has no usable words")
}

pub async fn repair(args: RepairArgs) -> anyhow::Result<()> {
    let config = RepairConfig::new()
        .with_min_word_duration(args.min_word_duration)
        .with_gap_between_words(args.gap);
    let input = read_transcript(&args.transcript, &config).await?;
    emit_json(&input.words, args.out.as_deref())
}

pub async fn captions(args: CaptionsArgs) -> anyhow::Result<()> {
    let input = read_transcript(&args.transcript, &RepairConfig::default()).await?;
    let policy = if args.group_sizes.is_empty() {
        GroupSizePolicy::default()
    } else {
        GroupSizePolicy::new(args.group_sizes)?
    };

    let groups = group(&input.words, &policy);
    tracing::info!(words = input.words.len(), groups = groups.len(), "captions_grouped");

    if args.srt {
        emit(&to_srt(&groups), args.out.as_deref())
    } else {
        emit_json(&groups, args.out.as_deref())
    }
}

pub async fn estimate(args: EstimateArgs) -> anyhow::Result<()> {
    let script = tokio::fs::read_to_string(&args.script)
        .await
        .with_context(|| format!("reading {}", args.script.display()))?;
    emit_json(&ScriptEstimate::from_script(script.trim()), None)
}
