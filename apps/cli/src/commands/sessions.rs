use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Subcommand;
use reel_timeline::{AssetKind, Session, Upload};

use super::{Context, emit, emit_json};
use crate::runtime::open_editor;

#[derive(Subcommand)]
pub enum SessionsCommand {
    /// Save an empty session.
    New {
        #[arg(long)]
        name: String,
    },
    /// Save a session JSON file as a new record.
    Import {
        file: PathBuf,
        #[arg(long)]
        name: Option<String>,
    },
    List,
    Show {
        id: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    Delete {
        id: String,
    },
    /// Replace the caption words with a transcription file.
    Narrate {
        id: String,
        transcript: PathBuf,
        #[arg(long)]
        audio_url: Option<String>,
    },
    /// Store a media file and append it to the session.
    Upload {
        id: String,
        kind: AssetKind,
        file: PathBuf,
        /// Media length in seconds; required for music and transitions.
        #[arg(long)]
        duration: Option<f64>,
        #[arg(long)]
        mime: Option<String>,
    },
    /// Export the session's captions as SRT.
    Srt {
        id: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

pub async fn run(command: SessionsCommand, ctx: &Context) -> anyhow::Result<()> {
    let mut editor = open_editor(ctx.data_dir.clone(), &ctx.profile)?;

    match command {
        SessionsCommand::New { name } => emit_json(&editor.save(name).await?, None),
        SessionsCommand::Import { file, name } => {
            let bytes = tokio::fs::read(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            let session = Session::from_value(serde_json::from_slice(&bytes)?)?;
            let name = name.unwrap_or_else(|| session.name.clone());
            let mut editor = editor.with_session(session);
            emit_json(&editor.save(name).await?, None)
        }
        SessionsCommand::List => emit_json(&editor.list_saved().await?, None),
        SessionsCommand::Show { id, out } => {
            editor.load(&id).await?;
            emit_json(&editor.session().to_value()?, out.as_deref())
        }
        SessionsCommand::Delete { id } => {
            editor.delete_saved(&id).await?;
            tracing::info!(id = %id, "session_deleted");
            Ok(())
        }
        SessionsCommand::Narrate {
            id,
            transcript,
            audio_url,
        } => {
            editor.load(&id).await?;
            let bytes = tokio::fs::read(&transcript)
                .await
                .with_context(|| format!("reading {}", transcript.display()))?;
            let words = editor.transcribe(&bytes, audio_url).await?;
            let name = editor.session().name.clone();
            editor.save(name).await?;
            emit_json(&serde_json::json!({ "words": words }), None)
        }
        SessionsCommand::Upload {
            id,
            kind,
            file,
            duration,
            mime,
        } => {
            editor.load(&id).await?;
            let upload = read_upload(&file, mime, duration).await?;
            let added = match kind {
                AssetKind::Frame => serde_json::json!({ "frame": editor.upload_frame(upload).await? }),
                AssetKind::Background => {
                    serde_json::json!({ "background": editor.upload_background(upload).await? })
                }
                AssetKind::Music => serde_json::json!({ "track": editor.upload_music(upload).await? }),
                AssetKind::Transition => {
                    serde_json::json!({ "transition": editor.upload_transition(upload).await? })
                }
            };
            let name = editor.session().name.clone();
            editor.save(name).await?;
            emit_json(&added, None)
        }
        SessionsCommand::Srt { id, out } => {
            editor.load(&id).await?;
            emit(&editor.session().srt(), out.as_deref())
        }
    }
}

async fn read_upload(path: &Path, mime: Option<String>, duration: Option<f64>) -> anyhow::Result<Upload> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("{} has no file name", path.display()))?
        .to_string();
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;

    Ok(Upload {
        mime: mime.unwrap_or_else(|| guess_mime(path).to_string()),
        file_name,
        bytes,
        duration,
    })
}

fn guess_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "m4a" => "audio/mp4",
        _ => "application/octet-stream",
    }
}
