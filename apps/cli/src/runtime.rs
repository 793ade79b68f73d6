use std::path::PathBuf;
use std::sync::Arc;

use reel_storage::{DiskAssetStore, FsSessionStore, LocalRuntime};
use reel_timeline::{BoxFuture, CollaboratorError, Editor, TranscriptionResponse, Transcriber};

/// Reads a transcription that was produced offline and saved as JSON.
pub struct JsonTranscriber;

impl Transcriber for JsonTranscriber {
    fn transcribe<'a>(
        &'a self,
        audio: &'a [u8],
    ) -> BoxFuture<'a, Result<TranscriptionResponse, CollaboratorError>> {
        Box::pin(async move { Ok(serde_json::from_slice(audio)?) })
    }
}

pub fn open_editor(data_dir: Option<PathBuf>, profile: &str) -> anyhow::Result<Editor> {
    let runtime = LocalRuntime::new(data_dir);
    let assets = DiskAssetStore::from_runtime(&runtime)?;
    let sessions = FsSessionStore::from_runtime(&runtime)?;
    tracing::debug!(assets = %assets.root().display(), sessions = %sessions.dir().display(), "storage_opened");

    Ok(Editor::new(
        profile,
        Arc::new(assets),
        Arc::new(sessions),
        Arc::new(JsonTranscriber),
    ))
}
