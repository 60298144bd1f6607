/// Crate-wide result type.
pub type ArtResult<T> = Result<T, ArtError>;

/// Failures a generation request can end with.
#[derive(thiserror::Error, Debug)]
pub enum ArtError {
    /// A required external executable is not on the search path.
    #[error("missing dependency: {0}")]
    MissingDependency(String),

    /// An external tool ran but exited unsuccessfully.
    #[error("{tool} exited with {status}: {detail}")]
    ToolFailed {
        tool: String,
        status: String,
        /// Last non-empty line of the tool's diagnostic output.
        detail: String,
    },

    /// Parameters or upload rejected before any work started.
    #[error("validation error: {0}")]
    Validation(String),

    /// An expected output file is missing or unreadable.
    #[error("artifact error: {0}")]
    Artifact(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ArtError {
    pub fn missing_dependency(msg: impl Into<String>) -> Self {
        Self::MissingDependency(msg.into())
    }

    pub fn tool_failed(
        tool: impl Into<String>,
        status: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self::ToolFailed {
            tool: tool.into(),
            status: status.into(),
            detail: detail.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn artifact(msg: impl Into<String>) -> Self {
        Self::Artifact(msg.into())
    }

    /// Banner text shown to the person who submitted the request.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingDependency(what) => format!(
                "Missing required dependencies: Install Primitive and ImageMagick ({what})"
            ),
            Self::ToolFailed { detail, .. } => format!("Processing error: {detail}"),
            other => format!("Unexpected error: {other}"),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
