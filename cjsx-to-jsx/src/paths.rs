//! Output path derivation.

use std::path::{Path, PathBuf};

/// Where the converted file goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLocation {
    /// The destination path.
    pub path: PathBuf,
    /// False when the caller supplied the path explicitly.
    pub derived: bool,
}

/// Trailing suffixes that are renamed, checked in order.
const RENAMES: &[(&str, &str)] = &[(".cjsx", ".jsx"), (".coffee", ".js")];

/// Computes the output path for `input`.
///
/// An explicit override is used verbatim. Otherwise only the trailing
/// extension is considered: `.cjsx` becomes `.jsx`, `.coffee` becomes
/// `.js`, and anything else is left unchanged. A file named just `.cjsx`
/// counts too and becomes `.jsx`. Names that are not valid UTF-8 are never
/// renamed.
#[must_use]
pub fn resolve_output(input: &Path, explicit_override: Option<&Path>) -> OutputLocation {
    if let Some(path) = explicit_override {
        return OutputLocation {
            path: path.to_path_buf(),
            derived: false,
        };
    }

    let renamed = input
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| {
            RENAMES
                .iter()
                .find_map(|(from, to)| name.strip_suffix(from).map(|stem| format!("{stem}{to}")))
        });
    let path = renamed.map_or_else(|| input.to_path_buf(), |name| input.with_file_name(name));

    OutputLocation { path, derived: true }
}
