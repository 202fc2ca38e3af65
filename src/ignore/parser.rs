//! Ignore file parser with .gitignore syntax
//!
//! Each line of an ignore file becomes one [`Rule`]. The rules of every
//! ignore file found in one directory are collected, in order, into that
//! directory's [`RuleScope`].

use crate::core::types::{ParseWarning, Warning};
use glob::{MatchOptions, Pattern};
use std::fs;
use std::io;
use std::iter::Peekable;
use std::path::{Path, PathBuf};
use tracing::debug;

/// `*` and `?` never cross a `/`, dotfiles are not special
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// One compiled line of an ignore file
#[derive(Debug, Clone)]
pub struct Rule {
    /// Glob pattern after escape translation, without `!` and the
    /// leading/trailing `/`
    pub pattern: String,
    /// Line started with `!`
    pub negated: bool,
    /// Line ended with `/`
    pub directory_only: bool,
    /// Pattern is matched against the path relative to `scope_root`
    /// instead of the basename
    pub anchored: bool,
    /// Directory whose ignore file declared the rule
    pub scope_root: PathBuf,
    /// Ignore file the rule was read from
    pub source: PathBuf,
    /// 1-based line number in `source`
    pub line: usize,
    /// The line as written, trailing whitespace removed
    pub original: String,
    compiled: Pattern,
}

impl Rule {
    /// Test the rule against a `/`-separated path relative to `scope_root`
    pub fn matches(&self, relative: &str, is_dir: bool) -> bool {
        if self.directory_only && !is_dir {
            return false;
        }

        if self.anchored {
            self.compiled.matches_with(relative, MATCH_OPTIONS)
        } else {
            let basename = relative.rsplit('/').next().unwrap_or(relative);
            self.compiled.matches_with(basename, MATCH_OPTIONS)
        }
    }
}

/// Pattern fields of a line, before they are tied to a scope
#[derive(Debug)]
struct ParsedLine {
    glob: String,
    negated: bool,
    directory_only: bool,
    anchored: bool,
    compiled: Pattern,
}

/// Where a directory's rules come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreSources {
    /// Ignore file names looked up in every directory, in precedence order
    pub file_names: Vec<String>,
    /// Also read `.git/info/exclude` in directories that have one
    pub git_info_exclude: bool,
}

impl Default for IgnoreSources {
    fn default() -> Self {
        Self {
            file_names: vec![".gitignore".to_string()],
            git_info_exclude: true,
        }
    }
}

impl IgnoreSources {
    /// Candidate rule files for `dir`, lowest precedence first
    pub fn candidate_files(&self, dir: &Path) -> Vec<PathBuf> {
        let mut files = Vec::with_capacity(self.file_names.len() + 1);
        if self.git_info_exclude {
            files.push(dir.join(".git").join("info").join("exclude"));
        }
        files.extend(self.file_names.iter().map(|name| dir.join(name)));
        files
    }
}

/// Outcome of loading one directory's rule files
#[derive(Debug, Default)]
pub struct ScopeLoad {
    /// `None` when the directory contributes no rules
    pub scope: Option<RuleScope>,
    pub warnings: Vec<Warning>,
}

/// Ordered rules contributed by one directory
#[derive(Debug, Clone)]
pub struct RuleScope {
    scope_root: PathBuf,
    rules: Vec<Rule>,
}

impl RuleScope {
    /// Create an empty scope rooted at `scope_root`
    pub fn new(scope_root: impl Into<PathBuf>) -> Self {
        Self {
            scope_root: scope_root.into(),
            rules: Vec::new(),
        }
    }

    /// Parse ignore file content into a new scope
    pub fn from_content(content: &str, scope_root: &Path, source: &Path) -> (Self, Vec<ParseWarning>) {
        let mut scope = Self::new(scope_root);
        let warnings = scope.add_content(content, source);
        (scope, warnings)
    }

    /// Parse a single ignore file; the scope is rooted at its parent directory
    pub fn from_file(path: &Path) -> io::Result<(Self, Vec<ParseWarning>)> {
        let scope_root = path.parent().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "ignore file has no parent directory")
        })?;
        let content = read_lossy(path)?;
        Ok(Self::from_content(&content, scope_root, path))
    }

    /// Load every configured rule file present in `dir`
    ///
    /// Missing files are not an error. Unreadable ones produce a traversal
    /// warning and contribute nothing.
    pub fn load(dir: &Path, sources: &IgnoreSources) -> ScopeLoad {
        let mut scope = Self::new(dir);
        let mut warnings = Vec::new();

        for file in sources.candidate_files(dir) {
            match read_lossy(&file) {
                Ok(content) => {
                    let parse_warnings = scope.add_content(&content, &file);
                    warnings.extend(parse_warnings.into_iter().map(Warning::Parse));
                },
                Err(e) if e.kind() == io::ErrorKind::NotFound => {},
                Err(e) => warnings.push(Warning::Traversal {
                    path: file,
                    message: e.to_string(),
                }),
            }
        }

        ScopeLoad {
            scope: (!scope.is_empty()).then_some(scope),
            warnings,
        }
    }

    /// Append the rules of `content` after the existing ones
    pub fn add_content(&mut self, content: &str, source: &Path) -> Vec<ParseWarning> {
        let mut warnings = Vec::new();
        let before = self.rules.len();

        for (index, line) in content.lines().enumerate() {
            match parse_line(line) {
                Ok(Some(parsed)) => self.rules.push(Rule {
                    pattern: parsed.glob,
                    negated: parsed.negated,
                    directory_only: parsed.directory_only,
                    anchored: parsed.anchored,
                    scope_root: self.scope_root.clone(),
                    source: source.to_path_buf(),
                    line: index + 1,
                    original: trim_trailing_whitespace(line).to_string(),
                    compiled: parsed.compiled,
                }),
                Ok(None) => {},
                Err(reason) => warnings.push(ParseWarning {
                    source: source.to_path_buf(),
                    line: index + 1,
                    content: line.to_string(),
                    reason,
                }),
            }
        }

        debug!(
            "Parsed {} rules from {}",
            self.rules.len() - before,
            source.display()
        );
        warnings
    }

    /// Directory the scope applies to
    pub fn scope_root(&self) -> &Path {
        &self.scope_root
    }

    /// Rules in file order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether `path` lies strictly below the scope root
    pub fn governs(&self, path: &Path) -> bool {
        path != self.scope_root && path.starts_with(&self.scope_root)
    }

    /// `/`-separated form of `path` relative to the scope root
    pub fn relative_path(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.scope_root).ok()?;
        let parts: Vec<_> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect();
        (!parts.is_empty()).then(|| parts.join("/"))
    }
}

fn read_lossy(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Parse a single line; `Ok(None)` for blank lines and comments
fn parse_line(line: &str) -> Result<Option<ParsedLine>, String> {
    if line.starts_with('#') {
        return Ok(None);
    }

    let line = trim_trailing_whitespace(line);
    if line.is_empty() {
        return Ok(None);
    }

    let (negated, rest) = match line.strip_prefix('!') {
        Some(rest) => (true, rest),
        None => (false, line),
    };

    let (directory_only, rest) = match rest.strip_suffix('/') {
        Some(rest) => (true, rest),
        None => (false, rest),
    };

    // A slash at the start or in the middle ties the pattern to the scope root
    let (anchored, body) = match rest.strip_prefix('/') {
        Some(body) => (true, body),
        None => (rest.contains('/'), rest),
    };

    if body.is_empty() {
        return Err("empty pattern".to_string());
    }

    let glob = translate(body)?;
    let compiled = Pattern::new(&glob).map_err(|e| e.to_string())?;

    Ok(Some(ParsedLine {
        glob,
        negated,
        directory_only,
        anchored,
        compiled,
    }))
}

/// Drop trailing spaces and tabs unless escaped with a backslash
fn trim_trailing_whitespace(line: &str) -> &str {
    let bytes = line.as_bytes();
    let mut end = bytes.len();

    while end > 0 && matches!(bytes[end - 1], b' ' | b'\t') {
        let backslashes = bytes[..end - 1]
            .iter()
            .rev()
            .take_while(|&&b| b == b'\\')
            .count();
        if backslashes % 2 == 1 {
            break;
        }
        end -= 1;
    }

    &line[..end]
}

/// Rewrite gitignore escapes, `**` runs and bracket classes into `glob` syntax
fn translate(body: &str) -> Result<String, String> {
    let mut out = String::with_capacity(body.len() + 4);
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let escaped = chars
                    .next()
                    .ok_or_else(|| "trailing backslash".to_string())?;
                out.push_str(&Pattern::escape(&escaped.to_string()));
            },
            '*' => {
                let mut run = 1;
                while chars.peek() == Some(&'*') {
                    chars.next();
                    run += 1;
                }
                // Only a whole path component of asterisks crosses directories
                let starts_component = out.is_empty() || out.ends_with('/');
                let ends_component = matches!(chars.peek(), None | Some('/'));
                if run > 1 && starts_component && ends_component {
                    out.push_str("**");
                } else {
                    out.push('*');
                }
            },
            '[' => out.push_str(&translate_class(&mut chars)?),
            _ => out.push(c),
        }
    }

    Ok(out)
}

/// One member of a bracket class: a character or an inclusive range
type ClassMember = (char, Option<char>);

/// Translate a bracket class whose opening `[` was already consumed
///
/// A `]` right after `[`, `[!` or `[^` is a member, as is any escaped
/// character.
fn translate_class<I>(chars: &mut Peekable<I>) -> Result<String, String>
where
    I: Iterator<Item = char> + Clone,
{
    let negated = matches!(chars.peek(), Some('!') | Some('^'));
    if negated {
        chars.next();
    }

    let mut members: Vec<ClassMember> = Vec::new();
    loop {
        let start = match chars.next() {
            None => return Err("unclosed character class".to_string()),
            Some(']') if !members.is_empty() => break,
            Some('\\') => class_escape(chars)?,
            Some(c) => c,
        };

        // `-` before the closing `]` is a literal member
        let mut lookahead = chars.clone();
        let is_range =
            lookahead.next() == Some('-') && !matches!(lookahead.peek(), None | Some(']'));
        if !is_range {
            members.push((start, None));
            continue;
        }

        chars.next();
        let end = match chars.next() {
            Some('\\') => class_escape(chars)?,
            Some(c) => c,
            None => return Err("unclosed character class".to_string()),
        };
        members.push((start, Some(end)));
    }

    Ok(render_class(negated, &members))
}

fn class_escape<I: Iterator<Item = char>>(chars: &mut Peekable<I>) -> Result<char, String> {
    chars.next().ok_or_else(|| "trailing backslash".to_string())
}

/// Lay out class members so `glob` reads `]`, `!` and `-` literally
///
/// `glob` closes a class at the first `]` after its first member, reads a
/// leading `!` as negation and `x-y` as a range. So a literal `]` goes first,
/// `!` never goes first and a literal `-` goes last.
fn render_class(negated: bool, members: &[ClassMember]) -> String {
    let mut leading = String::new();
    let mut middle = String::new();
    let mut bang = false;
    let mut dash = false;

    for &(start, end) in members {
        match (start, end) {
            (start, Some(end)) if start == ']' && leading.is_empty() => {
                leading.extend([start, '-', end]);
            },
            (start, Some(end)) => middle.extend([start, '-', end]),
            (']', None) if leading.is_empty() => leading.push(']'),
            (']', None) => {},
            ('!', None) => bang = true,
            ('-', None) => dash = true,
            (c, None) => middle.push(c),
        }
    }

    let only_specials = leading.is_empty() && middle.is_empty();
    if !negated && only_specials && bang && !dash {
        return "!".to_string();
    }

    let mut out = String::from(if negated { "[!" } else { "[" });
    out.push_str(&leading);
    out.push_str(&middle);
    if !negated && only_specials {
        // Only `!` and `-`: the dash must lead so `!` is not read as negation
        out.push_str(if bang { "-!" } else { "-" });
    } else {
        if bang {
            out.push('!');
        }
        if dash {
            out.push('-');
        }
    }
    out.push(']');
    out
}
