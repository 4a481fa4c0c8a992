use thiserror::Error;

/// Recoverable failures of the clock core. Neither variant stops a frame.
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ClockError {
    #[error("unknown timezone identifier '{0}'")]
    InvalidTimezone(String),
    #[error("audio output unavailable: {0}")]
    AudioUnavailable(&'static str),
}
