use std::{
    ffi::{OsStr, OsString},
    fmt,
    path::PathBuf,
    process::{Command, Output, Stdio},
    time::Instant,
};

use crate::foundation::error::{ArtError, ArtResult};

/// A fully built external command: program plus arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandLine {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl CommandLine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(&mut self, arg: impl AsRef<OsStr>) -> &mut Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Pushes `flag value`.
    pub fn opt(&mut self, flag: &str, value: impl AsRef<OsStr>) -> &mut Self {
        self.arg(flag).arg(value)
    }

    /// Arguments as display strings, for tests and logs.
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    /// Value that follows `flag`, if present.
    pub fn value_of(&self, flag: &str) -> Option<String> {
        let args = self.args_lossy();
        let pos = args.iter().position(|a| a == flag)?;
        args.get(pos + 1).cloned()
    }

    /// Short tool name used in logs and errors (`primitive`, `magick`, ...).
    pub fn tool_name(&self) -> String {
        self.program
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.display().to_string())
    }

    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// What a successful run printed.
#[derive(Clone, Debug, Default)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Runs the command to completion, blocking the caller.
///
/// A non-zero exit becomes [`ArtError::ToolFailed`] carrying the last non-empty
/// line of stderr (or stdout when stderr is silent).
pub fn run_tool(line: &CommandLine) -> ArtResult<ToolOutput> {
    let tool = line.tool_name();
    tracing::info!(%tool, command = %line, "running external tool");
    let started = Instant::now();

    let output = line.to_command().output().map_err(|e| {
        ArtError::tool_failed(&tool, "spawn failure", format!("failed to run {tool}: {e}"))
    })?;

    tracing::debug!(
        %tool,
        status = %output.status,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "external tool finished"
    );
    check_output(&tool, output)
}

fn check_output(tool: &str, output: Output) -> ArtResult<ToolOutput> {
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        let detail = last_diagnostic_line(&stderr)
            .or_else(|| last_diagnostic_line(&stdout))
            .unwrap_or_else(|| format!("{tool} produced no diagnostic output"));
        return Err(ArtError::tool_failed(
            tool,
            output.status.to_string(),
            detail,
        ));
    }

    for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
        tracing::debug!(%tool, stream = "stdout", "{line}");
    }
    for line in stderr.lines().filter(|l| !l.trim().is_empty()) {
        tracing::debug!(%tool, stream = "stderr", "{line}");
    }
    Ok(ToolOutput { stdout, stderr })
}

pub fn last_diagnostic_line(text: &str) -> Option<String> {
    text.lines()
        .rev()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
#[path = "../../tests/unit/tools/process.rs"]
mod tests;
