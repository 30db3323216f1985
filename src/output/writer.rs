//! Atomic artifact writes.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

/// Sibling temporary path used while writing `path`.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or_default());
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write `contents` to `path`, replacing any previous file in one step.
///
/// Parent directories are created as needed. The data goes to a sibling
/// temporary file first and is renamed over the target, so readers see
/// either the old file or the complete new one.
pub async fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    if path.file_name().is_none() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "output path has no file name",
        ));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let staging = staging_path(path);
    if let Err(e) = tokio::fs::write(&staging, contents).await {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(e);
    }
    if let Err(e) = tokio::fs::rename(&staging, path).await {
        let _ = tokio::fs::remove_file(&staging).await;
        return Err(e);
    }

    tracing::debug!(path = %path.display(), bytes = contents.len(), "Artifact written");
    Ok(())
}
