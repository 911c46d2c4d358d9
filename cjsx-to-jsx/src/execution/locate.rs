//! Locating transformer programs.

use std::path::{Path, PathBuf};
use tracing::debug;

/// Finds `name` in a `node_modules/.bin` directory at or above `start_dir`,
/// then on `PATH`.
///
/// Names containing a path separator are returned as-is if they exist.
#[must_use]
pub fn find_program(name: &str, start_dir: &Path) -> Option<PathBuf> {
    let as_path = Path::new(name);
    if as_path.components().count() > 1 {
        return as_path.exists().then(|| as_path.to_path_buf());
    }

    for dir in start_dir.ancestors() {
        let candidate = dir.join("node_modules").join(".bin").join(name);
        if candidate.is_file() {
            debug!(program = name, path = %candidate.display(), "Found local program");
            return Some(candidate);
        }
    }

    match which::which(name) {
        Ok(path) => {
            debug!(program = name, path = %path.display(), "Found program on PATH");
            Some(path)
        }
        Err(_) => {
            debug!(program = name, "Program not found");
            None
        }
    }
}

/// Like [`find_program`], but falls back to the bare name so the spawn
/// error names the missing program.
#[must_use]
pub fn locate_program(name: &str, start_dir: &Path) -> String {
    find_program(name, start_dir)
        .map_or_else(|| name.to_string(), |path| path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefers_local_node_modules() {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("node_modules").join(".bin");
        std::fs::create_dir_all(&bin).unwrap();
        std::fs::write(bin.join("decaffeinate"), "").unwrap();

        let nested = dir.path().join("src").join("components");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(
            find_program("decaffeinate", &nested),
            Some(bin.join("decaffeinate"))
        );
    }

    #[test]
    fn test_missing_program_falls_back_to_name() {
        let dir = tempfile::tempdir().unwrap();
        let name = "definitely-not-a-real-program-xyz";

        assert_eq!(find_program(name, dir.path()), None);
        assert_eq!(locate_program(name, dir.path()), name);
    }

    #[test]
    fn test_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("tool.sh");
        std::fs::write(&tool, "").unwrap();

        let name = tool.to_string_lossy().into_owned();
        assert_eq!(find_program(&name, Path::new("/")), Some(tool));
        assert_eq!(
            find_program(&dir.path().join("nope").to_string_lossy(), Path::new("/")),
            None
        );
    }
}
