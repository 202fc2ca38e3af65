//! Idempotent creation of marker files

use crate::core::types::MarkerKind;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File Déjà Dup looks for to skip a directory
pub const DEFAULT_IGNORE_MARKER_FILE: &str = ".deja-dup-ignore";

/// Cache directory tag file name
pub const CACHEDIR_TAG_FILE: &str = "CACHEDIR.TAG";

/// Required first line of a cache directory tag
pub const CACHEDIR_TAG_SIGNATURE: &str = "Signature: 8a477f597d28d172789f06886806bc55";

const CACHEDIR_TAG_CONTENT: &str = "Signature: 8a477f597d28d172789f06886806bc55\n\
# This file is a cache directory tag created by dirmarker.\n\
# For information about cache directory tags, see:\n\
#\thttps://bford.info/cachedir/\n";

/// What a write did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Created(PathBuf),
    /// The marker was already there and was left untouched
    AlreadyPresent(PathBuf),
}

impl WriteOutcome {
    pub fn path(&self) -> &Path {
        match self {
            WriteOutcome::Created(path) | WriteOutcome::AlreadyPresent(path) => path,
        }
    }

    pub fn created(&self) -> bool {
        matches!(self, WriteOutcome::Created(_))
    }
}

/// Creates marker files, never modifying existing ones
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerWriter {
    ignore_marker_file: String,
}

impl Default for MarkerWriter {
    fn default() -> Self {
        Self::new(DEFAULT_IGNORE_MARKER_FILE)
    }
}

impl MarkerWriter {
    pub fn new(ignore_marker_file: impl Into<String>) -> Self {
        Self {
            ignore_marker_file: ignore_marker_file.into(),
        }
    }

    /// File name used for `kind`
    pub fn file_name(&self, kind: MarkerKind) -> &str {
        match kind {
            MarkerKind::IgnoreMarker => &self.ignore_marker_file,
            MarkerKind::CacheTag => CACHEDIR_TAG_FILE,
        }
    }

    pub fn marker_path(&self, dir: &Path, kind: MarkerKind) -> PathBuf {
        dir.join(self.file_name(kind))
    }

    /// First marker of any kind present in `dir`
    pub fn existing_marker(&self, dir: &Path) -> Option<MarkerKind> {
        MarkerKind::ALL
            .into_iter()
            .find(|&kind| fs::symlink_metadata(self.marker_path(dir, kind)).is_ok())
    }

    /// Create the marker of `kind` in `dir` unless it already exists
    pub fn write(&self, dir: &Path, kind: MarkerKind) -> io::Result<WriteOutcome> {
        let path = self.marker_path(dir, kind);

        let file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Ok(WriteOutcome::AlreadyPresent(path));
            },
            Err(e) => return Err(e),
        };

        write_contents(&path, file, kind)?;
        Ok(WriteOutcome::Created(path))
    }
}

/// Fill a freshly created marker; a failed write leaves no file behind
fn write_contents<W: Write>(path: &Path, mut file: W, kind: MarkerKind) -> io::Result<()> {
    if kind != MarkerKind::CacheTag {
        return Ok(());
    }

    let result = file
        .write_all(CACHEDIR_TAG_CONTENT.as_bytes())
        .and_then(|()| file.flush());
    if let Err(e) = result {
        drop(file);
        if let Err(remove_err) = fs::remove_file(path) {
            debug!("Failed to remove partial marker {}: {}", path.display(), remove_err);
        }
        return Err(e);
    }
    Ok(())
}
