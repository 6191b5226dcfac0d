//! Run configuration from the command line and environment.

use crate::error::{EngineError, Result};
use crate::parser::ParseMode;
use std::path::PathBuf;

/// Environment variable naming the input file when no path argument is given.
pub const INPUT_FILE_ENV: &str = "ATM_INPUT_FILE";

/// Where the session description is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    File(PathBuf),
    Stdin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub input: InputSource,
    pub mode: ParseMode,
}

impl Config {
    /// Builds the configuration from arguments (without the program name)
    /// and the value of [`INPUT_FILE_ENV`].
    ///
    /// An explicit path wins over the environment; with neither, input comes
    /// from stdin. `-` also selects stdin.
    pub fn from_args<I, S>(args: I, env_input: Option<String>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut mode = ParseMode::Lenient;
        let mut path: Option<String> = None;

        for arg in args {
            let arg = arg.into();
            if arg == "--strict" {
                mode = ParseMode::Strict;
                continue;
            }
            let is_flag = arg.starts_with('-') && arg != "-";
            if is_flag || path.is_some() {
                return Err(EngineError::InvalidArgument(arg));
            }
            path = Some(arg);
        }

        let input = match path.or(env_input.filter(|p| !p.is_empty())) {
            Some(p) if p == "-" => InputSource::Stdin,
            Some(p) => InputSource::File(PathBuf::from(p)),
            None => InputSource::Stdin,
        };

        Ok(Config { input, mode })
    }

    /// Reads the process arguments and environment.
    pub fn from_env() -> Result<Self> {
        Self::from_args(std::env::args().skip(1), std::env::var(INPUT_FILE_ENV).ok())
    }
}
