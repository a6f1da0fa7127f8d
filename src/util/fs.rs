use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Writes `content` to `path` atomically.
///
/// The content goes to a hidden sibling file, is synced to disk, then renamed
/// over the destination, so readers never observe a partially written feed.
/// The sibling is removed again if any step fails.
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let temp_path = temp_path_for(path);
    let result =
        write_synced(&temp_path, content).and_then(|()| replace(&temp_path, path));
    if result.is_err() {
        let _ = std::fs::remove_file(&temp_path);
    }
    result
}

/// `.<name>.<pid>.<nanos>.tmp` next to `path`.
fn temp_path_for(path: &Path) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "feed".to_string());
    path.with_file_name(format!(".{}.{}.{}.tmp", name, std::process::id(), nanos))
}

fn write_synced(temp_path: &Path, content: &[u8]) -> Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(temp_path)
        .with_context(|| format!("Failed to create temporary file '{}'", temp_path.display()))?;
    file.write_all(content)
        .with_context(|| format!("Failed to write feed to '{}'", temp_path.display()))?;
    file.sync_all()
        .with_context(|| format!("Failed to sync '{}' to disk", temp_path.display()))
}

fn replace(temp_path: &Path, path: &Path) -> Result<()> {
    // rename does not overwrite on Windows
    #[cfg(windows)]
    if path.exists() {
        std::fs::remove_file(path)
            .with_context(|| format!("Failed to remove existing '{}'", path.display()))?;
    }

    std::fs::rename(temp_path, path).with_context(|| {
        format!(
            "Failed to rename '{}' to '{}'",
            temp_path.display(),
            path.display()
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_atomic_creates_file() {
        let dir = std::env::temp_dir().join("rssforge_fs_test_create");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("feed.xml");

        write_atomic(&path, b"<rss></rss>").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<rss></rss>");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_write_atomic_replaces_existing() {
        let dir = std::env::temp_dir().join("rssforge_fs_test_replace");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("feed.xml");
        std::fs::write(&path, "old").unwrap();

        write_atomic(&path, b"new").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");

        // No temp files left behind
        let leftovers = std::fs::read_dir(&dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .count();
        assert_eq!(leftovers, 0);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_temp_path_is_hidden_sibling() {
        let path = Path::new("/srv/feeds/feed.xml");
        let temp = temp_path_for(path);
        assert_eq!(temp.parent(), path.parent());
        let name = temp.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(".feed.xml."));
        assert!(name.ends_with(".tmp"));
    }

    #[test]
    fn test_write_atomic_missing_directory_fails() {
        let path = std::env::temp_dir()
            .join("rssforge_fs_test_missing_dir")
            .join("nested")
            .join("feed.xml");
        assert!(write_atomic(&path, b"x").is_err());
    }
}
