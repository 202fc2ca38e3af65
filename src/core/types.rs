//! Core data types for dirmarker

use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

/// Kind of marker file a directory receives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    /// Backup-tool specific "do not back up" file
    IgnoreMarker,
    /// `CACHEDIR.TAG` per the cache directory tagging convention
    CacheTag,
}

impl MarkerKind {
    /// Every marker kind, in classification priority order
    pub const ALL: [MarkerKind; 2] = [MarkerKind::IgnoreMarker, MarkerKind::CacheTag];
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerKind::IgnoreMarker => write!(f, "ignore marker"),
            MarkerKind::CacheTag => write!(f, "cache tag"),
        }
    }
}

/// A directory as seen by the walker at the moment it is visited
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryNode {
    pub path: PathBuf,
    pub basename: OsString,
    /// Excluded by the ignore rules in effect for this directory
    pub ignored: bool,
    pub marker_kind: Option<MarkerKind>,
}

impl DirectoryNode {
    /// Marker the directory should receive: only ignored directories with a
    /// recognized name get one
    pub fn marker_to_write(&self) -> Option<MarkerKind> {
        self.marker_kind.filter(|_| self.ignored)
    }
}

/// A malformed ignore-file line that was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    /// Ignore file the line came from
    pub source: PathBuf,
    /// 1-based line number
    pub line: usize,
    pub content: String,
    pub reason: String,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: skipped pattern {:?} ({})",
            self.source.display(),
            self.line,
            self.content,
            self.reason
        )
    }
}

/// Non-fatal problem encountered during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Malformed ignore-file line
    Parse(ParseWarning),
    /// Directory or ignore file could not be read; its subtree was skipped
    Traversal { path: PathBuf, message: String },
    /// Marker file could not be created
    Write {
        path: PathBuf,
        kind: MarkerKind,
        message: String,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::Parse(warning) => write!(f, "{}", warning),
            Warning::Traversal { path, message } => {
                write!(f, "cannot read {}: {}", path.display(), message)
            },
            Warning::Write {
                path,
                kind,
                message,
            } => write!(f, "cannot create {} in {}: {}", kind, path.display(), message),
        }
    }
}

impl From<ParseWarning> for Warning {
    fn from(warning: ParseWarning) -> Self {
        Warning::Parse(warning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_to_write() {
        let mut node = DirectoryNode {
            path: PathBuf::from("/p/build"),
            basename: OsString::from("build"),
            ignored: false,
            marker_kind: Some(MarkerKind::IgnoreMarker),
        };
        assert_eq!(node.marker_to_write(), None);

        node.ignored = true;
        assert_eq!(node.marker_to_write(), Some(MarkerKind::IgnoreMarker));

        node.marker_kind = None;
        assert_eq!(node.marker_to_write(), None);
    }

    #[test]
    fn test_warning_display() {
        let warning = Warning::from(ParseWarning {
            source: PathBuf::from("/p/.gitignore"),
            line: 3,
            content: "[oops".to_string(),
            reason: "unclosed character class".to_string(),
        });
        assert_eq!(
            warning.to_string(),
            "/p/.gitignore:3: skipped pattern \"[oops\" (unclosed character class)"
        );
    }
}
