//! Output sinks that receive one complete page of markup per render.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::MountError;

/// The attachment target of a view. Each call replaces the previous content.
pub trait OutputSink: Send + Sync {
    fn mount(&self, markup: &str) -> Result<(), MountError>;
}

const DOCUMENT_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <title>Hacker News</title>
    <script src="https://cdn.tailwindcss.com"></script>
    <link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.4.0/css/all.min.css" />
  </head>
  <body>
    <div id="root">"#;

const DOCUMENT_TAIL: &str = r#"</div>
  </body>
</html>
"#;

/// Writes each render as a standalone HTML document.
#[derive(Debug, Clone)]
pub struct FileMount {
    path: PathBuf,
}

impl FileMount {
    /// Fails when the directory that should hold `path` does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, MountError> {
        let path = path.into();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if !dir.is_dir() || path.is_dir() {
            return Err(MountError::MissingMountPoint { path });
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputSink for FileMount {
    fn mount(&self, markup: &str) -> Result<(), MountError> {
        let document = format!("{DOCUMENT_HEAD}{markup}{DOCUMENT_TAIL}");
        std::fs::write(&self.path, &document).map_err(|source| MountError::Write {
            path: self.path.clone(),
            source,
        })?;
        tracing::info!(path = %self.path.display(), bytes = document.len(), "mounted");
        Ok(())
    }
}

/// Keeps every mounted page in memory. Clones share the same history.
#[derive(Debug, Clone, Default)]
pub struct MemoryMount {
    writes: Arc<Mutex<Vec<String>>>,
}

impl MemoryMount {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes
            .lock()
            .map(|writes| writes.clone())
            .unwrap_or_default()
    }

    /// The content currently on display.
    pub fn current(&self) -> Option<String> {
        self.writes().pop()
    }
}

impl OutputSink for MemoryMount {
    fn mount(&self, markup: &str) -> Result<(), MountError> {
        self.writes
            .lock()
            .map_err(|_| MountError::LockPoisoned)?
            .push(markup.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_mount_requires_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent").join("root.html");

        let err = FileMount::open(&missing).unwrap_err();
        assert!(matches!(err, MountError::MissingMountPoint { ref path } if *path == missing));
    }

    #[test]
    fn file_mount_rejects_a_directory_as_target() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FileMount::open(dir.path()).is_err());
    }

    #[test]
    fn file_mount_replaces_content_each_write() {
        let dir = tempfile::tempdir().unwrap();
        let mount = FileMount::open(dir.path().join("root.html")).unwrap();

        mount.mount("<p>first</p>").unwrap();
        mount.mount("<p>second</p>").unwrap();

        let written = std::fs::read_to_string(mount.path()).unwrap();
        assert!(written.contains(r#"<div id="root"><p>second</p></div>"#));
        assert!(!written.contains("first"));
    }

    #[test]
    fn memory_mount_clones_share_history() {
        let mount = MemoryMount::new();
        let handle = mount.clone();

        mount.mount("a").unwrap();
        handle.mount("b").unwrap();

        assert_eq!(mount.writes(), vec!["a", "b"]);
        assert_eq!(handle.current().as_deref(), Some("b"));
    }
}
