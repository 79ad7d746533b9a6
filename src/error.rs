//! Error types
//!
//! A single crate-level [`Error`] wraps the per-area error enums so callers can
//! use `?` across module boundaries.

use std::fmt;
use std::io;

pub use crate::registry::RegistryError;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type
#[derive(Debug)]
pub enum Error {
    /// Socket or console I/O failure
    Io(io::Error),
    /// Device registration rejected
    Registry(RegistryError),
    /// Console input could not be understood
    Command(CommandError),
    /// Data frame could not be decoded
    Frame(FrameError),
}

/// Errors produced while parsing console commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The first word is not a known command
    Unknown(String),
    /// A required argument is missing
    MissingArgument(&'static str),
    /// More arguments than the command accepts
    UnexpectedArgument(String),
    /// Not an IP address literal
    InvalidAddress(String),
    /// Not an integer in 1..=65535
    InvalidPort(String),
}

/// Errors produced while decoding a data frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// Buffer shorter than a full data frame
    Truncated { expected: usize, actual: usize },
    /// Leading sync word is not the data frame sync
    InvalidSync(u16),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Registry(e) => write!(f, "{}", e),
            Error::Command(e) => write!(f, "{}", e),
            Error::Frame(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Registry(e) => Some(e),
            Error::Command(e) => Some(e),
            Error::Frame(e) => Some(e),
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Unknown(cmd) => write!(f, "Unknown command: {}", cmd),
            CommandError::MissingArgument(arg) => write!(f, "Missing argument: <{}>", arg),
            CommandError::UnexpectedArgument(arg) => write!(f, "Unexpected argument: {}", arg),
            CommandError::InvalidAddress(addr) => write!(f, "Invalid IP address: {}", addr),
            CommandError::InvalidPort(port) => write!(f, "Invalid port: {}", port),
        }
    }
}

impl std::error::Error for CommandError {}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::Truncated { expected, actual } => {
                write!(f, "Truncated frame: expected {} bytes, got {}", expected, actual)
            }
            FrameError::InvalidSync(sync) => write!(f, "Invalid sync word: {:#06X}", sync),
        }
    }
}

impl std::error::Error for FrameError {}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<RegistryError> for Error {
    fn from(e: RegistryError) -> Self {
        Error::Registry(e)
    }
}

impl From<CommandError> for Error {
    fn from(e: CommandError) -> Self {
        Error::Command(e)
    }
}

impl From<FrameError> for Error {
    fn from(e: FrameError) -> Self {
        Error::Frame(e)
    }
}
