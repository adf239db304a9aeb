//! Path helpers

use std::path::{Component, Path, PathBuf};

/// Resolve `path` to an absolute form against `base` (unchanged if already
/// absolute).
///
/// The join is lexical: `..` and `.` components are normalized without
/// touching the filesystem, so paths that don't exist yet resolve the same
/// way as existing ones.
pub fn absolutize(path: &Path, base: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };
    normalize_lexically(&joined)
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Keep leading `..` when there is nothing to pop.
                match normalized.components().next_back() {
                    Some(Component::Normal(_)) => {
                        normalized.pop();
                    }
                    Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                    _ => normalized.push(".."),
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Resolve symlinks when the path exists, falling back to the input.
///
/// Goes through `dunce` so Windows results stay in legacy form; git rejects
/// verbatim `\\?\` paths.
pub fn canonicalize(path: &Path) -> PathBuf {
    dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Render a path for display, abbreviating the home directory to `~`.
pub fn format_path_for_display(path: &Path) -> String {
    if let Some(home) = home::home_dir() {
        if let Ok(rest) = path.strip_prefix(&home) {
            if rest.as_os_str().is_empty() {
                return "~".to_string();
            }
            return format!("~{}{}", std::path::MAIN_SEPARATOR, rest.display());
        }
    }
    path.display().to_string()
}
