use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{ArtError, ArtResult};

const ROOT_PREFIX: &str = "primitive-art-";

/// Per-request working directories.
///
/// Layout under a uniquely named root:
///
/// ```text
/// <base>/primitive-art-XXXXXX/
///     inputs/   staged upload
///     frames/   per-frame output when a GIF was requested
///     outputs/  final artifact
/// ```
///
/// Everything is removed when the workspace is dropped, whether the request
/// succeeded or not. [`Workspace::close`] does the same but reports failures.
#[derive(Debug)]
pub struct Workspace {
    root: tempfile::TempDir,
    input_dir: PathBuf,
    frame_dir: PathBuf,
    output_dir: PathBuf,
}

impl Workspace {
    pub fn create(base: &Path) -> ArtResult<Self> {
        std::fs::create_dir_all(base)
            .with_context(|| format!("failed to create workspace base '{}'", base.display()))?;
        let root = tempfile::Builder::new()
            .prefix(ROOT_PREFIX)
            .tempdir_in(base)
            .with_context(|| format!("failed to create workspace in '{}'", base.display()))?;

        let input_dir = root.path().join("inputs");
        let frame_dir = root.path().join("frames");
        let output_dir = root.path().join("outputs");
        for dir in [&input_dir, &frame_dir, &output_dir] {
            std::fs::create_dir(dir)
                .with_context(|| format!("failed to create '{}'", dir.display()))?;
        }

        tracing::debug!(root = %root.path().display(), "workspace created");
        Ok(Self {
            root,
            input_dir,
            frame_dir,
            output_dir,
        })
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    pub fn frame_dir(&self) -> &Path {
        &self.frame_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Writes the uploaded bytes into `inputs/`. Only the final component of
    /// `file_name` is used.
    pub fn stage_input(&self, file_name: &str, bytes: &[u8]) -> ArtResult<PathBuf> {
        let name = Path::new(file_name)
            .file_name()
            .ok_or_else(|| ArtError::validation(format!("invalid upload name '{file_name}'")))?;
        let path = self.input_dir.join(name);
        std::fs::write(&path, bytes)
            .with_context(|| format!("failed to stage upload '{}'", path.display()))?;
        Ok(path)
    }

    /// Removes every working directory now.
    pub fn close(self) -> ArtResult<()> {
        let root = self.root.path().to_path_buf();
        self.root
            .close()
            .with_context(|| format!("failed to remove workspace '{}'", root.display()))?;
        tracing::debug!(root = %root.display(), "workspace removed");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/request/workspace.rs"]
mod tests;
