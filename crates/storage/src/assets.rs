//! Uploaded media on local disk, one directory per asset kind.
//!
//! URLs are root-relative: `/{kind}/{file}`. Frames and backgrounds are named
//! `index{N}{ext}` with `N` one past the highest index on disk. Music and
//! transitions keep their upload name behind a millisecond timestamp.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use reel_timeline::{
    AssetKind, AssetStorage, BoxFuture, CollaboratorError, MediaKind, Upload,
};

use crate::fs::{atomic_write_async, list_files};
use crate::{Error, Result, StorageRuntime};

const INDEX_PREFIX: &str = "index";

#[derive(Debug, Clone)]
pub struct DiskAssetStore {
    root: PathBuf,
}

impl DiskAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_runtime(runtime: &dyn StorageRuntime) -> Result<Self> {
        Ok(Self::new(runtime.assets_base()?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Local path backing `url`.
    pub fn path_of(&self, url: &str) -> Result<PathBuf> {
        let (kind, name) = parse_url(url)?;
        Ok(self.dir(kind).join(name))
    }

    fn dir(&self, kind: AssetKind) -> PathBuf {
        self.root.join(kind.to_string())
    }

    /// Remove every stored file of `kind`, e.g. before a fresh batch upload.
    pub async fn clear(&self, kind: AssetKind) -> Result<usize> {
        let dir = self.dir(kind);
        let names = list_files(&dir).await?;
        for name in &names {
            tokio::fs::remove_file(dir.join(name)).await?;
        }
        tracing::info!(kind = %kind, removed = names.len(), "assets_cleared");
        Ok(names.len())
    }

    pub async fn store(&self, kind: AssetKind, upload: &Upload) -> Result<String> {
        let dir = self.dir(kind);
        let name = match kind {
            AssetKind::Frame | AssetKind::Background => {
                let index = next_index(&list_files(&dir).await?);
                format!("{INDEX_PREFIX}{index}{}", extension(upload)?)
            }
            AssetKind::Music | AssetKind::Transition => timestamp_name(&upload.file_name)?,
        };

        atomic_write_async(&dir.join(&name), &upload.bytes).await?;
        tracing::debug!(kind = %kind, name = %name, bytes = upload.bytes.len(), "asset_stored");
        Ok(url_for(kind, &name))
    }

    /// Overwrite the asset at `url`. Indexed assets keep their index and may
    /// change extension; timestamped ones get a fresh name.
    pub async fn overwrite(&self, kind: AssetKind, url: &str, upload: &Upload) -> Result<String> {
        let (_, old_name) = parse_url(url)?;
        let dir = self.dir(kind);
        let stem = file_stem(old_name);

        let name = if index_of(stem).is_some() {
            for existing in list_files(&dir).await? {
                if file_stem(&existing) == stem {
                    tokio::fs::remove_file(dir.join(&existing)).await?;
                }
            }
            format!("{stem}{}", extension(upload)?)
        } else {
            remove_if_present(&dir.join(old_name)).await?;
            timestamp_name(&upload.file_name)?
        };

        atomic_write_async(&dir.join(&name), &upload.bytes).await?;
        tracing::debug!(kind = %kind, name = %name, "asset_overwritten");
        Ok(url_for(kind, &name))
    }

    pub async fn remove(&self, url: &str) -> Result<()> {
        let path = self.path_of(url)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::NotFound(url.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl AssetStorage for DiskAssetStore {
    fn upload<'a>(
        &'a self,
        kind: AssetKind,
        upload: &'a Upload,
    ) -> BoxFuture<'a, std::result::Result<String, CollaboratorError>> {
        Box::pin(async move { Ok(self.store(kind, upload).await?) })
    }

    fn replace<'a>(
        &'a self,
        kind: AssetKind,
        url: &'a str,
        upload: &'a Upload,
    ) -> BoxFuture<'a, std::result::Result<String, CollaboratorError>> {
        Box::pin(async move { Ok(self.overwrite(kind, url, upload).await?) })
    }

    fn delete<'a>(&'a self, url: &'a str) -> BoxFuture<'a, std::result::Result<(), CollaboratorError>> {
        Box::pin(async move { Ok(self.remove(url).await?) })
    }
}

async fn remove_if_present(path: &Path) -> Result<()> {
    match tokio::fs::remove_file(path).await {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}

fn url_for(kind: AssetKind, name: &str) -> String {
    format!("/{kind}/{name}")
}

/// Split `/{kind}/{file}` into its parts. Query strings and fragments are
/// ignored.
fn parse_url(url: &str) -> Result<(AssetKind, &str)> {
    let invalid = || Error::InvalidFileName(url.to_string());

    let path = url.split(['?', '#']).next().unwrap_or_default();
    let mut segments = path.rsplit('/');
    let name = segments.next().ok_or_else(invalid)?;
    let kind = segments
        .next()
        .and_then(|dir| AssetKind::from_str(dir).ok())
        .ok_or_else(invalid)?;

    check_file_name(name)?;
    Ok((kind, name))
}

fn check_file_name(name: &str) -> Result<()> {
    let bad = name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']);
    if bad {
        return Err(Error::InvalidFileName(name.to_string()));
    }
    Ok(())
}

fn file_stem(name: &str) -> &str {
    Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(name)
}

fn index_of(name: &str) -> Option<u64> {
    let digits: String = name
        .strip_prefix(INDEX_PREFIX)?
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

fn next_index(existing: &[String]) -> u64 {
    existing
        .iter()
        .filter_map(|name| index_of(name))
        .max()
        .map_or(0, |max| max + 1)
}

fn extension(upload: &Upload) -> Result<String> {
    check_file_name(&upload.file_name)?;
    Ok(Path::new(&upload.file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_else(|| MediaKind::from_mime(&upload.mime).default_extension().to_string()))
}

fn timestamp_name(file_name: &str) -> Result<String> {
    check_file_name(file_name)?;
    Ok(format!(
        "{}_{}",
        chrono::Utc::now().timestamp_millis(),
        file_name.replace(' ', "_")
    ))
}
