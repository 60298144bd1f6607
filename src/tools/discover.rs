use std::{
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
};

use crate::foundation::error::{ArtError, ArtResult};

/// Names primitive may be installed under.
pub const PRIMITIVE_NAMES: [&str; 2] = ["primitive", "primitive.exe"];

/// Which ImageMagick entry point was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConverterKind {
    /// ImageMagick 7 `magick`.
    Magick,
    /// ImageMagick 6 `convert`.
    Convert,
}

impl ConverterKind {
    /// Lookup order: `magick` wins when both are installed.
    pub const SEARCH_ORDER: [ConverterKind; 2] = [Self::Magick, Self::Convert];

    pub fn program_name(self) -> &'static str {
        match self {
            Self::Magick => "magick",
            Self::Convert => "convert",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Converter {
    pub kind: ConverterKind,
    pub path: PathBuf,
}

/// Resolved locations of both external tools.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Toolchain {
    pub primitive: PathBuf,
    pub converter: Converter,
}

impl Toolchain {
    pub fn new(primitive: impl Into<PathBuf>, converter: Converter) -> Self {
        Self {
            primitive: primitive.into(),
            converter,
        }
    }

    /// Looks both tools up on `PATH`.
    pub fn discover() -> ArtResult<Self> {
        let search_path = std::env::var_os("PATH").unwrap_or_default();
        Self::discover_in(&search_path)
    }

    /// Looks both tools up on an explicit search path (OS path-list syntax).
    pub fn discover_in(search_path: &OsStr) -> ArtResult<Self> {
        let primitive = find_primitive(search_path);
        let converter = find_converter(search_path);

        match (primitive, converter) {
            (Some(primitive), Some(converter)) => {
                tracing::debug!(
                    primitive = %primitive.display(),
                    converter = %converter.path.display(),
                    "toolchain resolved"
                );
                Ok(Self::new(primitive, converter))
            }
            (primitive, converter) => {
                let mut missing = Vec::new();
                if primitive.is_none() {
                    missing.push("primitive");
                }
                if converter.is_none() {
                    missing.push("magick/convert");
                }
                Err(ArtError::missing_dependency(format!(
                    "{} not found on the search path",
                    missing.join(" and ")
                )))
            }
        }
    }
}

fn find_primitive(search_path: &OsStr) -> Option<PathBuf> {
    PRIMITIVE_NAMES
        .iter()
        .find_map(|name| find_on_path(name, search_path))
}

fn find_converter(search_path: &OsStr) -> Option<Converter> {
    ConverterKind::SEARCH_ORDER.iter().find_map(|kind| {
        find_on_path(kind.program_name(), search_path).map(|path| Converter { kind: *kind, path })
    })
}

/// True when both primitive and an ImageMagick converter are on `PATH`.
pub fn validate_environment() -> bool {
    Toolchain::discover().is_ok()
}

pub fn validate_environment_in(search_path: &OsStr) -> bool {
    Toolchain::discover_in(search_path).is_ok()
}

/// First executable file called `name` in the directories of `search_path`.
pub fn find_on_path(name: &str, search_path: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(search_path)
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt as _;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Joins directories into a search-path value, mostly for tests and the CLI.
pub fn join_search_path<I, P>(dirs: I) -> ArtResult<OsString>
where
    I: IntoIterator<Item = P>,
    P: AsRef<OsStr>,
{
    std::env::join_paths(dirs)
        .map_err(|e| ArtError::validation(format!("invalid search path entry: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/tools/discover.rs"]
mod tests;
