//! Ignore evaluation over a chain of nested rule scopes

use crate::core::error::{DirmarkerError, Result};
use crate::core::types::Warning;
use crate::ignore::parser::{IgnoreSources, Rule, RuleScope};
use std::fmt;
use std::path::{Path, PathBuf};

/// Rule that decided a verdict
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedRule {
    pub source: PathBuf,
    pub line: usize,
    pub text: String,
}

impl From<&Rule> for MatchedRule {
    fn from(rule: &Rule) -> Self {
        Self {
            source: rule.source.clone(),
            line: rule.line,
            text: rule.original.clone(),
        }
    }
}

impl fmt::Display for MatchedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.source.display(), self.line, self.text)
    }
}

/// Result of ignore checking
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreResult {
    /// No rule matched
    NotIgnored,
    /// Last matching rule excludes the path
    Ignored(MatchedRule),
    /// Last matching rule is a negation
    Whitelisted(MatchedRule),
    /// An ancestor directory is excluded, so the path is too
    Inherited { ancestor: PathBuf },
}

impl IgnoreResult {
    pub fn is_ignored(&self) -> bool {
        matches!(self, IgnoreResult::Ignored(_) | IgnoreResult::Inherited { .. })
    }
}

#[derive(Debug)]
struct Frame {
    depth: usize,
    scope: RuleScope,
}

#[derive(Debug)]
struct Lock {
    depth: usize,
    dir: PathBuf,
}

/// Rule scopes in effect on the current traversal path, root-most first
///
/// Depth is the number of path components below the traversal root. A scope
/// pushed at depth `d` belongs to the directory at that depth and is dropped
/// as soon as the traversal moves to a sibling or back up.
#[derive(Debug, Default)]
pub struct ScopeChain {
    frames: Vec<Frame>,
    lock: Option<Lock>,
}

impl ScopeChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything contributed at `depth` or deeper
    pub fn unwind_to(&mut self, depth: usize) {
        while self.frames.last().is_some_and(|f| f.depth >= depth) {
            self.frames.pop();
        }
        if self.lock.as_ref().is_some_and(|l| l.depth >= depth) {
            self.lock = None;
        }
    }

    /// Add the scope of the directory at `depth`
    pub fn push(&mut self, depth: usize, scope: RuleScope) {
        debug_assert!(self.frames.last().map_or(true, |f| f.depth < depth));
        self.frames.push(Frame { depth, scope });
    }

    /// Evaluate the directory or file at `depth`, locking its subtree when it
    /// is an excluded directory
    ///
    /// Scopes and locks from previously visited siblings are unwound first,
    /// so entries must be visited in depth-first pre-order.
    pub fn visit(&mut self, depth: usize, path: &Path, is_dir: bool) -> IgnoreResult {
        self.unwind_to(depth);
        let result = evaluate(path, self, is_dir);
        if is_dir && self.lock.is_none() && result.is_ignored() {
            self.lock = Some(Lock {
                depth,
                dir: path.to_path_buf(),
            });
        }
        result
    }

    /// Whether `path` sits inside an excluded directory, which no negation
    /// can reopen
    pub fn is_locked(&self, path: &Path) -> bool {
        self.locked_by(path).is_some()
    }

    /// The excluded ancestor directory of `path`, if any
    pub fn locked_by(&self, path: &Path) -> Option<&Path> {
        self.lock
            .as_ref()
            .filter(|l| path != l.dir && path.starts_with(&l.dir))
            .map(|l| l.dir.as_path())
    }

    /// Scopes from the root-most to the deepest
    pub fn scopes(&self) -> impl DoubleEndedIterator<Item = &RuleScope> {
        self.frames.iter().map(|f| &f.scope)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Decide whether `path` is excluded by the rules in `chain`
///
/// The last matching rule across all scopes, taken root-most scope first and
/// in file order within a scope, wins.
pub fn evaluate(path: &Path, chain: &ScopeChain, is_dir: bool) -> IgnoreResult {
    if let Some(ancestor) = chain.locked_by(path) {
        return IgnoreResult::Inherited {
            ancestor: ancestor.to_path_buf(),
        };
    }

    // Scanning backwards, the first hit is the last match
    for scope in chain.scopes().rev() {
        if !scope.governs(path) {
            continue;
        }
        let Some(relative) = scope.relative_path(path) else {
            continue;
        };

        if let Some(rule) = scope
            .rules()
            .iter()
            .rev()
            .find(|rule| rule.matches(&relative, is_dir))
        {
            return if rule.negated {
                IgnoreResult::Whitelisted(rule.into())
            } else {
                IgnoreResult::Ignored(rule.into())
            };
        }
    }

    IgnoreResult::NotIgnored
}

/// Shorthand for `evaluate(..).is_ignored()`
pub fn is_ignored(path: &Path, chain: &ScopeChain, is_dir: bool) -> bool {
    evaluate(path, chain, is_dir).is_ignored()
}

/// Outcome of a single-path query
#[derive(Debug)]
pub struct CheckReport {
    pub path: PathBuf,
    pub is_dir: bool,
    pub result: IgnoreResult,
    /// Problems met while loading the rule files on the way down
    pub warnings: Vec<Warning>,
}

/// Answers "is this path ignored?" for individual paths under a root
#[derive(Debug)]
pub struct IgnoreChecker {
    root: PathBuf,
    sources: IgnoreSources,
}

impl IgnoreChecker {
    /// Create a checker for the tree at `root`
    pub fn new(root: &Path, sources: IgnoreSources) -> Result<Self> {
        let root = root
            .canonicalize()
            .map_err(|_| DirmarkerError::root_not_found(root.to_path_buf()))?;
        if !root.is_dir() {
            return Err(DirmarkerError::root_not_directory(root));
        }
        Ok(Self { root, sources })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Evaluate `path`, loading every rule file between the root and it
    pub fn check(&self, path: &Path) -> Result<CheckReport> {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };
        let relative = absolute
            .strip_prefix(&self.root)
            .map_err(|_| DirmarkerError::PathOutsideRoot {
                path: absolute.clone(),
                root: self.root.clone(),
            })?
            .to_path_buf();

        let mut chain = ScopeChain::new();
        let mut warnings = Vec::new();
        self.enter(&mut chain, 0, &self.root, &mut warnings);

        let components: Vec<_> = relative.components().collect();
        let mut current = self.root.clone();
        let mut result = IgnoreResult::NotIgnored;
        let mut is_dir = true;

        for (index, component) in components.iter().enumerate() {
            current.push(component);
            let depth = index + 1;
            let last = depth == components.len();
            is_dir = !last || current.is_dir();

            result = chain.visit(depth, &current, is_dir);
            if !last {
                self.enter(&mut chain, depth, &current, &mut warnings);
            }
        }

        Ok(CheckReport {
            path: absolute,
            is_dir,
            result,
            warnings,
        })
    }

    fn enter(&self, chain: &mut ScopeChain, depth: usize, dir: &Path, warnings: &mut Vec<Warning>) {
        let load = RuleScope::load(dir, &self.sources);
        warnings.extend(load.warnings);
        if let Some(scope) = load.scope {
            chain.push(depth, scope);
        }
    }
}
