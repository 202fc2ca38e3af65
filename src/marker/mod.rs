//! Marker files that tell backup tools to skip a directory

pub mod classifier;
pub mod writer;

pub use classifier::{Classifier, DEFAULT_IGNORE_MARKER_NAMES};
pub use writer::{
    MarkerWriter, WriteOutcome, CACHEDIR_TAG_FILE, CACHEDIR_TAG_SIGNATURE,
    DEFAULT_IGNORE_MARKER_FILE,
};
