//! Front-end for the `primitive` geometric-art tool.
//!
//! A request flows through a fixed sequence:
//!
//! 1. **Validate environment**: `primitive` and ImageMagick (`magick` or `convert`) must be
//!    on the search path ([`Toolchain::discover`]).
//! 2. **Stage**: the upload is written into a fresh per-request [`Workspace`].
//! 3. **Render**: `primitive` runs once with flags built from [`GenerationParams`].
//! 4. **Animate** (GIF only): ImageMagick assembles the frame sequence into a looping GIF
//!    and the frames are deleted.
//! 5. **Present**: the result is read into an [`Artifact`] (base64 data URI for download)
//!    and the workspace is removed, on success and failure alike.
//!
//! [`Generator::generate`] runs the whole sequence. The `primitive-art` binary exposes it as a
//! CLI (`generate`, `check`) and as a local upload page (`serve`, see [`web`]).
#![forbid(unsafe_code)]

mod foundation;
pub mod pipeline;
pub mod present;
pub mod request;
pub mod tools;
pub mod web;

pub use foundation::error::{ArtError, ArtResult};
pub use pipeline::{ACCEPTED_EXTENSIONS, Generation, Generator, GeneratorSettings, Upload};
pub use present::{Artifact, mime_for};
pub use request::params::{BackgroundColor, GenerationParams, OutputFormat, ShapeMode};
pub use request::workspace::Workspace;
pub use tools::discover::{
    Converter, ConverterKind, Toolchain, find_on_path, join_search_path, validate_environment,
    validate_environment_in,
};
pub use tools::magick::{assemble_gif, gif_command, remove_frames};
pub use tools::primitive::{FRAME_PATTERN, primitive_command, primitive_destination, run_primitive};
pub use tools::process::{CommandLine, ToolOutput, run_tool};
pub use web::{ServerConfig, serve};
