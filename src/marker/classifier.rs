//! Directory name classification

use crate::core::types::MarkerKind;
use std::collections::BTreeSet;
use std::ffi::OsStr;

/// Build output and dependency directories that get the ignore marker
pub const DEFAULT_IGNORE_MARKER_NAMES: &[&str] = &[
    "node_modules",
    "venv",
    ".venv",
    ".gradle",
    "target",
    "build",
    "out",
    "dist",
];

/// Substring that makes a directory a cache directory
pub const DEFAULT_CACHE_SUBSTRING: &str = "cache";

/// Maps a directory basename to the marker it should carry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classifier {
    ignore_marker_names: BTreeSet<String>,
    /// Stored lowercased
    cache_substring: String,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(DEFAULT_IGNORE_MARKER_NAMES.iter().copied(), DEFAULT_CACHE_SUBSTRING)
    }
}

impl Classifier {
    pub fn new<I, S>(ignore_marker_names: I, cache_substring: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ignore_marker_names: ignore_marker_names.into_iter().map(Into::into).collect(),
            cache_substring: cache_substring.to_lowercase(),
        }
    }

    /// Exact, case-sensitive name match wins over the case-insensitive cache
    /// substring check. Names that are not valid UTF-8 are never classified.
    pub fn classify(&self, basename: &OsStr) -> Option<MarkerKind> {
        basename.to_str().and_then(|name| self.classify_str(name))
    }

    pub fn classify_str(&self, basename: &str) -> Option<MarkerKind> {
        if self.ignore_marker_names.contains(basename) {
            Some(MarkerKind::IgnoreMarker)
        } else if basename.to_lowercase().contains(&self.cache_substring) {
            Some(MarkerKind::CacheTag)
        } else {
            None
        }
    }

    pub fn ignore_marker_names(&self) -> impl Iterator<Item = &str> {
        self.ignore_marker_names.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("node_modules", Some(MarkerKind::IgnoreMarker))]
    #[case("venv", Some(MarkerKind::IgnoreMarker))]
    #[case(".venv", Some(MarkerKind::IgnoreMarker))]
    #[case(".gradle", Some(MarkerKind::IgnoreMarker))]
    #[case("target", Some(MarkerKind::IgnoreMarker))]
    #[case("build", Some(MarkerKind::IgnoreMarker))]
    #[case("out", Some(MarkerKind::IgnoreMarker))]
    #[case("dist", Some(MarkerKind::IgnoreMarker))]
    #[case("Build", None)]
    #[case("builds", None)]
    #[case("mycache", Some(MarkerKind::CacheTag))]
    #[case(".cache", Some(MarkerKind::CacheTag))]
    #[case("__PyCache__", Some(MarkerKind::CacheTag))]
    #[case("CACHE", Some(MarkerKind::CacheTag))]
    #[case("cach", None)]
    #[case("src", None)]
    #[case("docs", None)]
    fn test_classify(#[case] name: &str, #[case] expected: Option<MarkerKind>) {
        assert_eq!(Classifier::default().classify_str(name), expected);
    }

    #[test]
    fn test_ignore_marker_takes_precedence() {
        let classifier = Classifier::new(["build-cache"], "cache");
        assert_eq!(
            classifier.classify_str("build-cache"),
            Some(MarkerKind::IgnoreMarker)
        );
        assert_eq!(
            classifier.classify_str("other-cache"),
            Some(MarkerKind::CacheTag)
        );
    }

    #[test]
    fn test_custom_substring_is_case_folded() {
        let classifier = Classifier::new(Vec::<String>::new(), "TMP");
        assert_eq!(classifier.classify_str("mytmpdir"), Some(MarkerKind::CacheTag));
        assert_eq!(classifier.classify_str("cache"), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_name_is_not_classified() {
        use std::os::unix::ffi::OsStrExt;

        let name = OsStr::from_bytes(b"cache\xff");
        assert_eq!(Classifier::default().classify(name), None);
    }
}
