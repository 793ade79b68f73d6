pub mod captions;
pub mod schedule;
pub mod sessions;

use std::path::{Path, PathBuf};

pub struct Context {
    pub data_dir: Option<PathBuf>,
    pub profile: String,
}

/// Write `content` to `out` atomically, or to stdout.
pub fn emit(content: &str, out: Option<&Path>) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            reel_storage::fs::atomic_write(path, content)?;
            tracing::info!(path = %path.display(), "output_written");
        }
        None => println!("{content}"),
    }
    Ok(())
}

pub fn emit_json<T: serde::Serialize>(value: &T, out: Option<&Path>) -> anyhow::Result<()> {
    emit(&serde_json::to_string_pretty(value)?, out)
}
