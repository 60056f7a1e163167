//! Recursive discovery of demo programs.

use std::fmt;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};
use walkdir::WalkDir;

use crate::error::RunError;
use crate::invocation::Invocation;

/// A discovered demo program.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DemoItem {
    /// Path relative to the discovery root.
    pub path: PathBuf,
}

impl DemoItem {
    /// Wrap a root-relative path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<interpreter> <path>`, the single-job command line.
    #[must_use]
    pub fn invocation(&self, interpreter: &str) -> Invocation {
        Invocation::new(interpreter).arg(&self.path)
    }
}

impl fmt::Display for DemoItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

/// Matcher for demo file names with a given extension.
#[derive(Debug, Clone)]
pub struct DemoPattern {
    matcher: GlobMatcher,
}

impl DemoPattern {
    /// Pattern `*.<extension>`; a leading dot on `extension` is ignored.
    pub fn for_extension(extension: &str) -> Result<Self, RunError> {
        let extension = extension.trim_start_matches('.');
        if extension.is_empty() {
            return Err(RunError::Config("extension must not be empty".into()));
        }
        let glob = Glob::new(&format!("*.{extension}"))
            .map_err(|e| RunError::Config(format!("invalid extension '{extension}': {e}")))?;
        Ok(Self {
            matcher: glob.compile_matcher(),
        })
    }

    /// Whether a bare file name matches.
    #[must_use]
    pub fn matches(&self, file_name: &Path) -> bool {
        self.matcher.is_match(file_name)
    }
}

/// Every regular file under `root` whose name matches `pattern`, at any depth.
///
/// Paths are relative to `root` and sorted. Entries that cannot be read are
/// skipped with a warning; an unreadable `root` is an error.
pub fn discover(root: &Path, pattern: &DemoPattern) -> Result<Vec<DemoItem>, RunError> {
    if !root.is_dir() {
        return Err(RunError::Discovery(format!(
            "{} is not a directory",
            root.display()
        )));
    }

    let mut items = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => {
                return Err(RunError::Discovery(err.to_string()));
            }
            Err(err) => {
                tracing::warn!("skipping unreadable entry: {err}");
                continue;
            }
        };

        if !is_demo_file(&entry) || !pattern.matches(Path::new(entry.file_name())) {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(root)
            .unwrap_or(entry.path())
            .to_path_buf();
        tracing::debug!(demo = %relative.display(), "discovered");
        items.push(DemoItem::new(relative));
    }

    items.sort();
    tracing::debug!(count = items.len(), root = %root.display(), "discovery complete");
    Ok(items)
}

/// Regular files, and symlinks that resolve to one. Linked directories are
/// not descended into.
fn is_demo_file(entry: &walkdir::DirEntry) -> bool {
    if entry.file_type().is_file() {
        return true;
    }
    entry.path_is_symlink()
        && std::fs::metadata(entry.path()).is_ok_and(|m| m.is_file())
}

/// Discover demos by extension.
pub fn discover_by_extension(root: &Path, extension: &str) -> Result<Vec<DemoItem>, RunError> {
    discover(root, &DemoPattern::for_extension(extension)?)
}
