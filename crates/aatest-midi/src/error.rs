//! Error types for MIDI decoding.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("MIDI parse error: {0}")]
    Parse(String),

    #[error("Empty MIDI message")]
    Empty,
}

impl From<midi_msg::ParseError> for Error {
    fn from(e: midi_msg::ParseError) -> Self {
        Error::Parse(format!("{:?}", e))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
