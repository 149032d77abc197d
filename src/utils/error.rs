use std::error::Error;
use std::fmt;
use std::io;

use crate::engine::codec::{ConfigError, DecodeError};

/// Main error type for the Base-N codec library.
#[derive(Debug)]
pub enum CodecError {
    /// An I/O error occurred (stream adapters only)
    Io(io::Error),
    /// Malformed encoded input was rejected while decoding
    Decode(DecodeError),
    /// A codec was constructed with an invalid configuration
    Config(ConfigError),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::Io(err) => write!(f, "I/O error: {}", err),
            CodecError::Decode(err) => write!(f, "Decode error: {}", err),
            CodecError::Config(err) => write!(f, "Configuration error: {}", err),
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CodecError::Io(err) => Some(err),
            CodecError::Decode(err) => Some(err),
            CodecError::Config(err) => Some(err),
        }
    }
}

impl From<io::Error> for CodecError {
    fn from(err: io::Error) -> Self {
        CodecError::Io(err)
    }
}

impl From<DecodeError> for CodecError {
    fn from(err: DecodeError) -> Self {
        CodecError::Decode(err)
    }
}

impl From<ConfigError> for CodecError {
    fn from(err: ConfigError) -> Self {
        CodecError::Config(err)
    }
}

/// A specialized `Result` type for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
