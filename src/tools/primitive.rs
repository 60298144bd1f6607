use std::path::{Path, PathBuf};

use crate::{
    foundation::error::ArtResult,
    request::params::GenerationParams,
    tools::process::{CommandLine, ToolOutput, run_tool},
};

/// File-name pattern that makes primitive save one numbered frame per step.
pub const FRAME_PATTERN: &str = "%04d.png";

/// Where primitive should write for the requested format.
///
/// Animated output goes to a numbered frame sequence inside `frame_dir`;
/// everything else is a single file `artifact` whose extension picks the
/// encoder primitive uses.
pub fn primitive_destination(
    params: &GenerationParams,
    frame_dir: &Path,
    artifact: &Path,
) -> PathBuf {
    if params.format.is_animated() {
        frame_dir.join(FRAME_PATTERN)
    } else {
        artifact.to_path_buf()
    }
}

/// Builds the primitive invocation. Every field of `params` maps to a flag.
pub fn primitive_command(
    program: &Path,
    input: &Path,
    output: &Path,
    params: &GenerationParams,
) -> CommandLine {
    let mut line = CommandLine::new(program);
    line.opt("-i", input)
        .opt("-o", output)
        .opt("-n", params.num_shapes.to_string())
        .opt("-m", params.mode.code().to_string())
        .opt("-rep", params.repeat.to_string())
        .opt("-nth", params.nth.to_string())
        .opt("-r", params.resize.to_string())
        .opt("-s", params.output_size.to_string())
        .opt("-a", params.alpha.to_string())
        .opt("-bg", params.background.as_hex())
        .opt("-j", params.workers.to_string());

    if params.verbose {
        line.arg("-v");
    }
    if params.very_verbose {
        line.arg("-vv");
    }
    line
}

#[tracing::instrument(skip(params), fields(shapes = params.num_shapes, mode = %params.mode))]
pub fn run_primitive(
    program: &Path,
    input: &Path,
    output: &Path,
    params: &GenerationParams,
) -> ArtResult<(CommandLine, ToolOutput)> {
    let line = primitive_command(program, input, output, params);
    let out = run_tool(&line)?;
    Ok((line, out))
}

#[cfg(test)]
#[path = "../../tests/unit/tools/primitive.rs"]
mod tests;
