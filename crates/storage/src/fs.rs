use std::path::Path;

use tempfile::NamedTempFile;

fn parent_of(target: &Path) -> std::io::Result<&Path> {
    target.parent().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "target has no parent")
    })
}

pub fn atomic_write(target: &Path, content: impl AsRef<[u8]>) -> std::io::Result<()> {
    let parent = parent_of(target)?;
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    std::fs::write(temp.path(), content)?;
    temp.persist(target)?;
    Ok(())
}

/// Readers never observe a half-written file: the content lands in a temp
/// file next to `target` and is renamed over it.
pub async fn atomic_write_async(target: &Path, content: impl AsRef<[u8]>) -> std::io::Result<()> {
    let parent = parent_of(target)?;
    tokio::fs::create_dir_all(parent).await?;

    let temp = NamedTempFile::new_in(parent)?;
    tokio::fs::write(temp.path(), content).await?;
    temp.persist(target)?;
    Ok(())
}

/// Plain file names in `dir`, skipping subdirectories. A missing `dir`
/// reads as empty.
pub async fn list_files(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}
