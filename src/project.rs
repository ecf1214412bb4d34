//! Project root resolution and compose project naming

use std::env;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Project name used when normalization leaves nothing behind
pub const FALLBACK_PROJECT_NAME: &str = "localdb";

const MARKER_FILES: &[&str] = &["Cargo.toml"];
const MARKER_EXTENSIONS: &[&str] = &["csproj", "sln"];
const MARKER_DIRS: &[&str] = &[".git"];

/// Where a resolved project root came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootSource {
    Override,
    Marker,
    WorkingDirectory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRoot {
    pub path: PathBuf,
    pub source: RootSource,
}

/// Resolves the directory the compose descriptor is written under
///
/// An explicit override wins; a relative one is taken from `working_dir`.
/// Otherwise the ancestors of `search_start` are searched for a project
/// marker, and failing that `working_dir` is used.
pub fn resolve_root(
    override_root: Option<&Path>,
    search_start: Option<&Path>,
    working_dir: &Path,
) -> ProjectRoot {
    if let Some(path) = override_root {
        let path = absolutize(path, working_dir);
        debug!(root = %path.display(), "Using project root override");
        return ProjectRoot {
            path,
            source: RootSource::Override,
        };
    }

    if let Some(path) = search_start.and_then(find_marked_ancestor) {
        debug!(root = %path.display(), "Found project root marker");
        return ProjectRoot {
            path,
            source: RootSource::Marker,
        };
    }

    warn!(
        root = %working_dir.display(),
        "No project marker found above the binary, using the working directory"
    );
    ProjectRoot {
        path: working_dir.to_path_buf(),
        source: RootSource::WorkingDirectory,
    }
}

/// First directory at or above `start` that contains a project marker
pub fn find_marked_ancestor(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| has_marker(dir))
        .map(Path::to_path_buf)
}

fn has_marker(dir: &Path) -> bool {
    if MARKER_DIRS.iter().any(|name| dir.join(name).is_dir())
        || MARKER_FILES.iter().any(|name| dir.join(name).is_file())
    {
        return true;
    }

    let Ok(entries) = fs::read_dir(dir) else {
        return false;
    };

    entries.flatten().any(|entry| {
        let path = entry.path();
        path.is_file()
            && path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| {
                    MARKER_EXTENSIONS
                        .iter()
                        .any(|marker| ext.eq_ignore_ascii_case(marker))
                })
    })
}

/// `path` joined onto `base`, with `.` and `..` folded away lexically
pub fn absolutize(path: &Path, base: &Path) -> PathBuf {
    let mut resolved = PathBuf::new();
    for component in base.join(path).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other.as_os_str()),
        }
    }
    resolved
}

/// Compose project name: the override if given, else the root's directory name
///
/// A relative root is resolved against the current directory first, so `.`
/// names the directory it points at.
pub fn project_name(override_name: Option<&str>, root: &Path) -> String {
    let raw = match override_name {
        Some(name) => name.to_string(),
        None => {
            let root = match env::current_dir() {
                Ok(cwd) => absolutize(root, &cwd),
                Err(_) => root.to_path_buf(),
            };
            root.file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default()
        }
    };
    normalize_project_name(&raw)
}

/// Normalizes a compose project name
///
/// Lower-cases, replaces everything outside `[a-z0-9_-]` with `_`, then
/// drops leading characters that are not letters or digits. An empty result
/// becomes [`FALLBACK_PROJECT_NAME`]. Normalizing twice is a no-op.
pub fn normalize_project_name(name: &str) -> String {
    let replaced: String = name
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '_' | '-' => c,
            _ => '_',
        })
        .collect();

    let trimmed = replaced.trim_start_matches(|c: char| !c.is_ascii_alphanumeric());

    if trimmed.is_empty() {
        FALLBACK_PROJECT_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}
