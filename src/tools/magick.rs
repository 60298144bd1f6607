use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    foundation::error::{ArtError, ArtResult},
    tools::{
        discover::Converter,
        process::{CommandLine, run_tool},
    },
};

/// Per-frame delay in hundredths of a second.
pub const FRAME_DELAY: u32 = 10;
/// 0 loops forever.
pub const LOOP_COUNT: u32 = 0;

/// `<converter> -delay 10 -loop 0 <frames>/*.png <output>`.
///
/// The wildcard is passed through unexpanded; ImageMagick globs it itself and
/// reads the frames in name order.
pub fn gif_command(converter: &Converter, frame_dir: &Path, output: &Path) -> CommandLine {
    let mut line = CommandLine::new(&converter.path);
    line.opt("-delay", FRAME_DELAY.to_string())
        .opt("-loop", LOOP_COUNT.to_string())
        .arg(frame_dir.join("*.png"))
        .arg(output);
    line
}

/// Frame images currently in `frame_dir`, sorted by name.
pub fn list_frames(frame_dir: &Path) -> ArtResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(frame_dir)
        .with_context(|| format!("failed to read frame directory '{}'", frame_dir.display()))?;

    let mut frames = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("failed to list '{}'", frame_dir.display()))?
            .path();
        let is_png = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
        if is_png && path.is_file() {
            frames.push(path);
        }
    }
    frames.sort();
    Ok(frames)
}

/// Deletes every frame image; returns how many were removed.
pub fn remove_frames(frame_dir: &Path) -> ArtResult<usize> {
    let frames = list_frames(frame_dir)?;
    for frame in &frames {
        std::fs::remove_file(frame)
            .with_context(|| format!("failed to remove frame '{}'", frame.display()))?;
    }
    Ok(frames.len())
}

/// Result of a GIF assembly.
#[derive(Clone, Debug)]
pub struct Assembled {
    pub command: CommandLine,
    pub frames_used: usize,
    pub frames_removed: usize,
}

/// Turns the frame sequence into one looping GIF, then discards the frames.
#[tracing::instrument(skip(converter), fields(converter = ?converter.kind))]
pub fn assemble_gif(converter: &Converter, frame_dir: &Path, output: &Path) -> ArtResult<Assembled> {
    let frames_used = list_frames(frame_dir)?.len();
    if frames_used == 0 {
        return Err(ArtError::artifact(format!(
            "primitive produced no frames in '{}'",
            frame_dir.display()
        )));
    }

    let command = gif_command(converter, frame_dir, output);
    run_tool(&command)?;

    let frames_removed = remove_frames(frame_dir)?;
    tracing::debug!(frames_used, frames_removed, "animation assembled");
    Ok(Assembled {
        command,
        frames_used,
        frames_removed,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/tools/magick.rs"]
mod tests;
