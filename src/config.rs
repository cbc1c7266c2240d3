//! Runtime settings, read once at startup from the environment.

use std::{env, path::PathBuf, str::FromStr, time::Duration};

/// The assistant this client was built around. Override with `ASSISTANT_ID`.
pub const DEFAULT_ASSISTANT_ID: &str = "asst_RwXjODGNixFm1R4pfATK1546";
pub const DEFAULT_ASSISTANT_NAME: &str = "Lambda Architect";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);
pub const DEFAULT_MESSAGE_LOOKBACK: u32 = 5;
pub const DEFAULT_TEST_COMMAND: &str = "cargo test";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable `{0}` should be defined")]
    Missing(&'static str),

    #[error("environment variable `{name}` has invalid value `{value}`: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("could not determine the working directory: {0}")]
    WorkingDirectory(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub assistant_id: String,
    /// Printed in front of each reply.
    pub assistant_name: String,
    pub poll_interval: Duration,
    /// How many of the newest messages to fetch after a completed run.
    pub message_lookback: u32,
    /// Shell command `run_tests` executes.
    pub test_command: String,
    /// Push the local tool definitions to the assistant before chatting.
    pub sync_assistant_tools: bool,
    pub working_dir: PathBuf,
}

impl Config {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            assistant_id: DEFAULT_ASSISTANT_ID.to_string(),
            assistant_name: DEFAULT_ASSISTANT_NAME.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            message_lookback: DEFAULT_MESSAGE_LOOKBACK,
            test_command: DEFAULT_TEST_COMMAND.to_string(),
            sync_assistant_tools: false,
            working_dir: working_dir.into(),
        }
    }

    /// Reads every setting from the process environment, falling back to the
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let working_dir =
            env::current_dir().map_err(|e| ConfigError::WorkingDirectory(e.to_string()))?;
        Self::from_lookup(working_dir, |name| env::var(name).ok())
    }

    /// Like [`Config::from_env`] but with an arbitrary variable source.
    pub fn from_lookup<F>(working_dir: impl Into<PathBuf>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new(working_dir);
        let lookup = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(id) = lookup("ASSISTANT_ID") {
            config.assistant_id = id;
        }
        if let Some(name) = lookup("ASSISTANT_NAME") {
            config.assistant_name = name;
        }
        if let Some(value) = lookup("POLL_INTERVAL_SECS") {
            config.poll_interval = Duration::from_secs(parse("POLL_INTERVAL_SECS", &value)?);
        }
        if let Some(value) = lookup("MESSAGE_LOOKBACK") {
            let lookback: u32 = parse("MESSAGE_LOOKBACK", &value)?;
            if lookback == 0 {
                return Err(ConfigError::Invalid {
                    name: "MESSAGE_LOOKBACK",
                    value,
                    reason: "must be at least 1".to_string(),
                });
            }
            config.message_lookback = lookback;
        }
        if let Some(command) = lookup("TEST_COMMAND") {
            config.test_command = command;
        }
        if let Some(value) = lookup("SYNC_ASSISTANT_TOOLS") {
            config.sync_assistant_tools = parse_bool("SYNC_ASSISTANT_TOOLS", &value)?;
        }

        Ok(config)
    }
}

fn parse<T>(name: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        name,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}
