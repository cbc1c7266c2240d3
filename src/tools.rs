//! The local functions the assistant can call.
//!
//! Every tool returns a `String` for the assistant to read, or a [`ToolError`]
//! whose message is reported back in its place.

use std::{
    fs, io,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use schemars::JsonSchema;
use serde::Deserialize;
use walkdir::WalkDir;

use crate::config::Config;

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("function not found: {0}")]
    FunctionNotFound(String),

    #[error("invalid arguments for {function}: {reason}")]
    InvalidArguments { function: String, reason: String },

    #[error("could not {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("could not run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("`{command}` failed with {status}: {output}")]
    CommandFailed {
        command: String,
        status: String,
        output: String,
    },
}

impl ToolError {
    fn io(action: &'static str, path: &Path, source: io::Error) -> Self {
        ToolError::Io {
            action,
            path: path.display().to_string(),
            source,
        }
    }
}

/// What the tools need to know about the session they run in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolContext {
    /// Directory commands and tests run in.
    pub working_dir: PathBuf,
    pub test_command: String,
}

impl From<&Config> for ToolContext {
    fn from(config: &Config) -> Self {
        Self {
            working_dir: config.working_dir.clone(),
            test_command: config.test_command.clone(),
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateFileArgs {
    /// Path of the file to create, including the file name.
    pub filepath: String,
    /// Full content to write to the file.
    pub content: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ReadFileArgs {
    /// The path including the filename of the file to be read.
    pub filepath: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListFilesArgs {
    /// The directory to list files under, recursively.
    pub path: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct RunCommandArgs {
    /// The command to run in the user's shell.
    pub command: String,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct RunTestsArgs {}

/// Writes `content` to `filepath`, creating missing parent directories and
/// replacing any existing file.
pub fn create_file(filepath: &Path, content: &str) -> Result<String, ToolError> {
    log::info!("Creating {}...", filepath.display());

    if let Some(directory) = filepath.parent() {
        if !directory.as_os_str().is_empty() {
            fs::create_dir_all(directory)
                .map_err(|e| ToolError::io("create directory", directory, e))?;
        }
    }

    fs::write(filepath, content).map_err(|e| ToolError::io("write", filepath, e))?;

    Ok(format!("Successfully created file {}", filepath.display()))
}

pub fn read_file(filepath: &Path) -> Result<String, ToolError> {
    log::info!("Reading {}...", filepath.display());

    fs::read_to_string(filepath).map_err(|e| ToolError::io("read", filepath, e))
}

/// Every file below `path`, one per line, in traversal order.
///
/// Anything that is not a directory counts as a file, symlinks included.
/// Symlinked directories are not descended into. Subdirectories that cannot
/// be read are skipped; only a bad root is an error. A root that is itself a
/// file has nothing below it.
pub fn list_files(path: &Path) -> Result<String, ToolError> {
    log::info!("Listing {}...", path.display());

    let root = fs::metadata(path).map_err(|e| ToolError::io("list", path, e))?;
    if !root.is_dir() {
        return Ok(String::new());
    }

    let mut file_paths = Vec::new();
    for entry in WalkDir::new(path).min_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() > 0 => {
                log::warn!("Skipping while listing {}: {e}", path.display());
                continue;
            }
            Err(e) => {
                let at = e.path().unwrap_or(path).to_path_buf();
                return Err(ToolError::io("list", &at, io::Error::from(e)));
            }
        };

        let is_dir = if entry.path_is_symlink() {
            entry.path().is_dir()
        } else {
            entry.file_type().is_dir()
        };
        if !is_dir {
            file_paths.push(entry.path().display().to_string());
        }
    }

    Ok(file_paths.join("\n"))
}

/// Runs the test suite and returns everything it printed, pass or fail.
pub fn run_tests(context: &ToolContext) -> Result<String, ToolError> {
    log::info!("Running tests with `{}`", context.test_command);

    let output = shell(&context.test_command, &context.working_dir)?;
    if !output.status.success() {
        log::warn!("Test command exited with {}", output.status);
    }

    let mut captured = String::from_utf8_lossy(&output.stdout).into_owned();
    captured.push_str(&String::from_utf8_lossy(&output.stderr));
    Ok(captured)
}

/// Runs `command` through the shell.
///
/// A non-zero exit is an error. Otherwise returns stderr if the command wrote
/// any, else stdout.
pub fn run_command(command: &str, working_dir: &Path) -> Result<String, ToolError> {
    log::info!("Running command {command}");

    let output = shell(command, working_dir)?;
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        return Err(ToolError::CommandFailed {
            command: command.to_string(),
            status: output.status.to_string(),
            output: if stderr.is_empty() { stdout } else { stderr },
        });
    }

    Ok(if stderr.is_empty() { stdout } else { stderr })
}

fn shell(command: &str, working_dir: &Path) -> Result<Output, ToolError> {
    #[cfg(windows)]
    let mut process = {
        let mut process = Command::new("cmd");
        process.arg("/C");
        process
    };
    #[cfg(not(windows))]
    let mut process = {
        let mut process = Command::new("sh");
        process.arg("-c");
        process
    };

    process
        .arg(command)
        .current_dir(working_dir)
        .output()
        .map_err(|source| ToolError::Spawn {
            command: command.to_string(),
            source,
        })
}
