use std::{
    io::Cursor,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use anyhow::Context as _;

use crate::{
    foundation::error::{ArtError, ArtResult},
    present::Artifact,
    request::{params::GenerationParams, workspace::Workspace},
    tools::{
        discover::Toolchain,
        magick::assemble_gif,
        primitive::{primitive_destination, run_primitive},
        process::CommandLine,
    },
};

/// Upload extensions the form accepts.
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// A user-supplied source image, still in memory.
#[derive(Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for Upload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Upload")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub fn from_path(path: &Path) -> ArtResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("failed to read '{}'", path.display()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| ArtError::validation(format!("'{}' is not a file", path.display())))?;
        Ok(Self::new(file_name, bytes))
    }

    /// File stem used to name the artifact (`cat.png` -> `cat`).
    pub fn stem(&self) -> String {
        Path::new(&self.file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "upload".to_string())
    }

    /// Checks extension and content are PNG or JPEG; returns the pixel size.
    pub fn validate(&self) -> ArtResult<(u32, u32)> {
        if self.bytes.is_empty() {
            return Err(ArtError::validation("uploaded file is empty"));
        }

        let ext = Path::new(&self.file_name)
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        if !ACCEPTED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(ArtError::validation(format!(
                "'{}' is not a PNG or JPEG file",
                self.file_name
            )));
        }

        match image::guess_format(&self.bytes) {
            Ok(image::ImageFormat::Png | image::ImageFormat::Jpeg) => {}
            _ => {
                return Err(ArtError::validation(format!(
                    "'{}' does not contain PNG or JPEG data",
                    self.file_name
                )));
            }
        }

        image::ImageReader::new(Cursor::new(&self.bytes))
            .with_guessed_format()
            .context("failed to sniff upload format")?
            .into_dimensions()
            .map_err(|e| {
                ArtError::validation(format!("'{}' could not be decoded: {e}", self.file_name))
            })
    }
}

#[derive(Clone, Debug)]
pub struct GeneratorSettings {
    /// Directory request workspaces are created in.
    pub workspace_base: PathBuf,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            workspace_base: std::env::temp_dir(),
        }
    }
}

/// Everything a finished request hands back.
#[derive(Clone, Debug)]
pub struct Generation {
    /// Staged copy of the upload, for the input preview.
    pub input: Artifact,
    pub output: Artifact,
    /// External commands in the order they ran.
    pub commands: Vec<CommandLine>,
    pub source_size: (u32, u32),
    pub frames_removed: usize,
    pub elapsed: Duration,
}

impl Generation {
    /// The primitive invocation, as shown under "Generated Command".
    pub fn primitive_command(&self) -> Option<&CommandLine> {
        self.commands.first()
    }
}

/// Runs generation requests against a resolved toolchain.
#[derive(Clone, Debug)]
pub struct Generator {
    toolchain: Toolchain,
    settings: GeneratorSettings,
}

impl Generator {
    pub fn new(toolchain: Toolchain, settings: GeneratorSettings) -> Self {
        Self {
            toolchain,
            settings,
        }
    }

    /// Resolves both tools on `PATH` before any work is done.
    pub fn from_environment(settings: GeneratorSettings) -> ArtResult<Self> {
        Ok(Self::new(Toolchain::discover()?, settings))
    }

    pub fn toolchain(&self) -> &Toolchain {
        &self.toolchain
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Runs one request start to finish.
    ///
    /// The workspace is created before the first subprocess and removed on
    /// every exit path, including failures.
    #[tracing::instrument(skip(self, upload, params), fields(upload = %upload.file_name, format = %params.format))]
    pub fn generate(&self, upload: &Upload, params: &GenerationParams) -> ArtResult<Generation> {
        params.validate()?;
        let source_size = upload.validate()?;
        let started = Instant::now();

        let workspace = Workspace::create(&self.settings.workspace_base)?;
        let result = self.run_in(&workspace, upload, params);
        let cleanup = workspace.close();

        let (input, output, commands, frames_removed) = match (result, cleanup) {
            (Ok(parts), Ok(())) => parts,
            (Ok(_), Err(e)) => return Err(e),
            (Err(e), cleanup) => {
                if let Err(cleanup_err) = cleanup {
                    tracing::warn!(error = %cleanup_err, "workspace cleanup failed");
                }
                tracing::warn!(error = %e, "generation failed");
                return Err(e);
            }
        };

        let elapsed = started.elapsed();
        tracing::info!(
            artifact = %output.file_name,
            bytes = output.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "generation finished"
        );
        Ok(Generation {
            input,
            output,
            commands,
            source_size,
            frames_removed,
            elapsed,
        })
    }

    fn run_in(
        &self,
        workspace: &Workspace,
        upload: &Upload,
        params: &GenerationParams,
    ) -> ArtResult<(Artifact, Artifact, Vec<CommandLine>, usize)> {
        let input_path = workspace.stage_input(&upload.file_name, &upload.bytes)?;
        let input = Artifact::load(&input_path)?;

        let artifact_path = workspace
            .output_dir()
            .join(params.format.artifact_name(&upload.stem()));
        let destination = primitive_destination(params, workspace.frame_dir(), &artifact_path);

        let mut commands = Vec::with_capacity(2);
        let (line, _) = run_primitive(&self.toolchain.primitive, &input_path, &destination, params)?;
        commands.push(line);

        let mut frames_removed = 0;
        if params.format.is_animated() {
            let assembled =
                assemble_gif(&self.toolchain.converter, workspace.frame_dir(), &artifact_path)?;
            frames_removed = assembled.frames_removed;
            commands.push(assembled.command);
        }

        let output = Artifact::load(&artifact_path)?;
        Ok((input, output, commands, frames_removed))
    }
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
