use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Writes the feed document to `path` atomically.
///
/// The content goes to a temporary file next to the destination, is synced to
/// disk, then renamed over the destination. A failed run leaves any previous
/// feed untouched and removes its temporary file.
pub fn write_feed(content: &str, path: &Path) -> Result<()> {
    let temp_path = temp_path_for(path);

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)
        .with_context(|| {
            format!(
                "Failed to create temporary file '{}': check directory permissions",
                temp_path.display()
            )
        })?;

    let written = fill(&mut file, content);
    drop(file);
    let result = written.and_then(|()| {
        fs::rename(&temp_path, path).with_context(|| {
            format!(
                "Failed to move '{}' into place at '{}'",
                temp_path.display(),
                path.display()
            )
        })
    });
    if let Err(e) = result {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    tracing::debug!(path = %path.display(), bytes = content.len(), "Feed written");
    Ok(())
}

/// Sibling of `path` with a per-run suffix, so a stale temp file never blocks a build.
fn temp_path_for(path: &Path) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    path.with_extension(format!("tmp.{:016x}", suffix))
}

fn fill(file: &mut File, content: &str) -> Result<()> {
    file.write_all(content.as_bytes())
        .context("Failed to write feed to temporary file")?;
    file.sync_all()
        .context("Failed to sync temporary file to disk")
}
