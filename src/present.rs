//! Result presentation: artifacts held in memory, ready to display or download.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use base64::Engine as _;

use crate::foundation::error::{ArtError, ArtResult};

/// An image file lifted out of the workspace.
///
/// Loading reads the whole file, so the artifact outlives the directories it
/// came from.
#[derive(Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for Artifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Artifact")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl Artifact {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        Self {
            mime: mime_for(Path::new(&file_name)),
            file_name,
            bytes,
        }
    }

    pub fn load(path: &Path) -> ArtResult<Self> {
        if !path.is_file() {
            return Err(ArtError::artifact(format!(
                "expected output '{}' was not produced",
                path.display()
            )));
        }
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read artifact '{}'", path.display()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(file_name, bytes))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }

    /// `data:<mime>;base64,<payload>`, usable as an `img src` or download `href`.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.to_base64())
    }

    /// Writes the artifact into `dir` under its own file name.
    pub fn save_into(&self, dir: &Path) -> ArtResult<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory '{}'", dir.display()))?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)
            .with_context(|| format!("failed to write '{}'", path.display()))?;
        Ok(path)
    }
}

pub fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "svg" => "image/svg+xml",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
#[path = "../tests/unit/present.rs"]
mod tests;
