//! Source units and the artifacts handed between stages.

use crate::errors::ConvertError;
use std::fmt;
use std::path::{Path, PathBuf};

/// The extension a source file was detected with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceExtension {
    /// `.cjsx`
    Cjsx,
    /// `.coffee`
    Coffee,
    /// Anything else, including no extension.
    Other(String),
}

impl SourceExtension {
    /// Detects the extension of a path.
    ///
    /// A file named just `.cjsx` or `.coffee` counts as that extension.
    #[must_use]
    pub fn detect(path: &Path) -> Self {
        let name = path.file_name().and_then(|name| name.to_str()).unwrap_or("");
        if name.ends_with(".cjsx") {
            Self::Cjsx
        } else if name.ends_with(".coffee") {
            Self::Coffee
        } else {
            let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");
            Self::Other(extension.to_string())
        }
    }

    /// Returns true for the extensions the converter knows how to rename.
    #[must_use]
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for SourceExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cjsx => write!(f, ".cjsx"),
            Self::Coffee => write!(f, ".coffee"),
            Self::Other(ext) if ext.is_empty() => write!(f, "(none)"),
            Self::Other(ext) => write!(f, ".{ext}"),
        }
    }
}

/// The file being converted.
///
/// Read exactly once and consumed by the first stage.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    path: PathBuf,
    text: String,
    extension: SourceExtension,
}

impl SourceUnit {
    /// Creates a source unit from already-loaded text.
    ///
    /// Relative paths are made absolute against `base`.
    #[must_use]
    pub fn new(path: impl AsRef<Path>, base: &Path, text: impl Into<String>) -> Self {
        let path = absolutize(path.as_ref(), base);
        let extension = SourceExtension::detect(&path);
        Self {
            path,
            text: text.into(),
            extension,
        }
    }

    /// Reads a source unit from disk.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read as UTF-8 text.
    pub async fn read(path: impl AsRef<Path>, base: &Path) -> Result<Self, ConvertError> {
        let path = absolutize(path.as_ref(), base);
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| ConvertError::io("read", &path, e))?;
        Ok(Self::new(path, base, text))
    }

    /// Returns the absolute input path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the raw source text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the detected extension.
    #[must_use]
    pub fn extension(&self) -> &SourceExtension {
        &self.extension
    }

    /// Consumes the unit into the first pipeline artifact.
    #[must_use]
    pub fn into_artifact(self) -> PipelineArtifact {
        PipelineArtifact::new(self.text)
    }
}

/// Joins a relative path onto `base`; absolute paths are returned as-is.
#[must_use]
pub fn absolutize(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// The text payload flowing between two adjacent stages.
///
/// Ownership moves from stage to stage; the artifact carries no metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineArtifact {
    text: String,
}

impl PipelineArtifact {
    /// Creates a new artifact.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Returns the artifact text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the size of the payload in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns true if the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Consumes the artifact into its text.
    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }
}

impl From<String> for PipelineArtifact {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_extension() {
        assert_eq!(SourceExtension::detect(Path::new("a/b.cjsx")), SourceExtension::Cjsx);
        assert_eq!(SourceExtension::detect(Path::new("a/b.coffee")), SourceExtension::Coffee);
        assert_eq!(
            SourceExtension::detect(Path::new("a/b.js")),
            SourceExtension::Other("js".to_string())
        );
        assert!(!SourceExtension::detect(Path::new("Makefile")).is_known());
        assert_eq!(SourceExtension::detect(Path::new("a/.cjsx")), SourceExtension::Cjsx);
    }

    #[test]
    fn test_source_unit_is_absolute() {
        let unit = SourceUnit::new("src/app.cjsx", Path::new("/work"), "x = 1");

        assert_eq!(unit.path(), Path::new("/work/src/app.cjsx"));
        assert_eq!(unit.extension(), &SourceExtension::Cjsx);
        assert_eq!(unit.text(), "x = 1");
    }

    #[test]
    fn test_source_unit_into_artifact() {
        let unit = SourceUnit::new("/abs/app.coffee", Path::new("/ignored"), "y = 2");
        assert_eq!(unit.path(), Path::new("/abs/app.coffee"));

        let artifact = unit.into_artifact();
        assert_eq!(artifact.text(), "y = 2");
        assert_eq!(artifact.len(), 5);
    }

    #[tokio::test]
    async fn test_read_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SourceUnit::read("nope.cjsx", dir.path()).await.unwrap_err();

        assert!(matches!(err, ConvertError::Io { action: "read", .. }));
    }

    #[tokio::test]
    async fn test_read_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("view.cjsx"), "<div />").unwrap();

        let unit = SourceUnit::read("view.cjsx", dir.path()).await.unwrap();
        assert_eq!(unit.text(), "<div />");
        assert_eq!(unit.path(), dir.path().join("view.cjsx"));
    }
}
