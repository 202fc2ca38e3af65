//! Version-control ignore rules
//!
//! This module parses `.gitignore`-style files into rule scopes and decides,
//! for a path and the chain of scopes above it, whether the path is ignored.
//! Nested ignore files override their parents, the last matching rule wins,
//! and nothing inside an ignored directory can be re-included.

pub mod checker;
pub mod parser;

// Re-export commonly used items
pub use checker::{evaluate, is_ignored, IgnoreChecker, IgnoreResult, MatchedRule, ScopeChain};
pub use parser::{IgnoreSources, Rule, RuleScope};
