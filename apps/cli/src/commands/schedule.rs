use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;
use reel_timeline::schedule::{
    DEFAULT_FADE_OUT_SECS, DEFAULT_FPS, DEFAULT_HEIGHT, DEFAULT_PLACEHOLDER_COLOR, DEFAULT_WIDTH,
};
use reel_timeline::{RenderConfig, Session};

use super::{Context, emit_json};
use crate::runtime::open_editor;

#[derive(Args)]
pub struct ScheduleArgs {
    /// Session JSON file.
    #[arg(long, conflicts_with = "id", required_unless_present = "id")]
    pub file: Option<PathBuf>,

    /// Id of a saved session.
    #[arg(long)]
    pub id: Option<String>,

    #[arg(long, default_value_t = DEFAULT_FPS)]
    pub fps: u32,

    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: u32,

    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    pub height: u32,

    /// Seconds of music fade before the narration ends.
    #[arg(long, default_value_t = DEFAULT_FADE_OUT_SECS)]
    pub fade_out: f64,

    #[arg(long, default_value = DEFAULT_PLACEHOLDER_COLOR)]
    pub placeholder: String,

    #[arg(long)]
    pub out: Option<PathBuf>,
}

impl ScheduleArgs {
    fn config(&self) -> RenderConfig {
        RenderConfig::new()
            .with_fps(self.fps)
            .with_size(self.width, self.height)
            .with_fade_out_secs(self.fade_out)
            .with_placeholder_color(self.placeholder.clone())
    }
}

pub async fn run(args: ScheduleArgs, ctx: &Context) -> anyhow::Result<()> {
    let session = match (&args.file, &args.id) {
        (Some(path), _) => {
            let bytes = tokio::fs::read(path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            Session::from_value(serde_json::from_slice(&bytes)?)?
        }
        (None, Some(id)) => {
            let mut editor = open_editor(ctx.data_dir.clone(), &ctx.profile)?;
            editor.load(id).await?;
            editor.session().clone()
        }
        (None, None) => anyhow::bail!("either --file or --id is required"),
    };

    let schedule = session.resolve(&args.config());
    tracing::info!(
        items = schedule.items.len(),
        duration_in_frames = schedule.duration_in_frames,
        "schedule_resolved"
    );
    emit_json(&schedule, args.out.as_deref())
}
