//! Environment injected into children, and `PATH` lookup.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::NOPLOT_VAR;

/// Variables set on every child process.
///
/// The default holds the library's no-plot flag so demos never open windows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunEnvironment {
    vars: BTreeMap<String, String>,
}

impl Default for RunEnvironment {
    fn default() -> Self {
        let mut vars = BTreeMap::new();
        vars.insert(NOPLOT_VAR.to_string(), "1".to_string());
        Self { vars }
    }
}

impl RunEnvironment {
    /// Environment with no variables at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            vars: BTreeMap::new(),
        }
    }

    /// Set (or replace) a variable.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    /// Value of `key`, if set.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Iterate variables in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether no variable is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

/// Find `program` on the given search path (`PATH` syntax).
///
/// A `program` containing a path separator is checked as-is.
#[must_use]
pub fn find_in_path(program: &str, search_path: Option<&OsStr>) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }
    let search_path = search_path?;
    std::env::split_paths(search_path)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(program))
        .find(|path| is_executable(path))
}

/// Find `program` on the current process's `PATH`.
#[must_use]
pub fn which(program: &str) -> Option<PathBuf> {
    let path = std::env::var_os("PATH");
    find_in_path(program, path.as_deref())
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sets_noplot() {
        let env = RunEnvironment::default();
        assert_eq!(env.get("DOLFIN_NOPLOT"), Some("1"));
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn set_replaces_value() {
        let mut env = RunEnvironment::empty();
        assert!(env.is_empty());
        env.set("A", "1");
        env.set("A", "2");
        assert_eq!(env.get("A"), Some("2"));
        assert_eq!(env.iter().count(), 1);
    }

    #[test]
    fn deserializes_from_map() {
        let env: RunEnvironment =
            serde_json::from_str(r#"{"DOLFIN_NOPLOT": "1", "OMP_NUM_THREADS": "1"}"#).unwrap();
        assert_eq!(env.get("OMP_NUM_THREADS"), Some("1"));
        assert_eq!(env.len(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn finds_executable_on_search_path() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::TempDir::new().unwrap();
        let tool = dir.path().join("parallel");
        std::fs::write(&tool, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();

        let search = std::env::join_paths([Path::new("/nonexistent"), dir.path()]).unwrap();
        assert_eq!(find_in_path("parallel", Some(&search)), Some(tool.clone()));
        assert_eq!(find_in_path("mpirun", Some(&search)), None);
        assert_eq!(find_in_path(tool.to_str().unwrap(), None), Some(tool));
    }

    #[cfg(unix)]
    #[test]
    fn skips_non_executable_files() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("parallel"), "not a program").unwrap();
        assert_eq!(find_in_path("parallel", Some(dir.path().as_os_str())), None);
    }

    #[test]
    fn no_search_path_finds_nothing() {
        assert_eq!(find_in_path("parallel", None), None);
    }
}
