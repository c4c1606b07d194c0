use thiserror::Error;

/// Result type alias for melody operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned when building or looking up melodies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("melody: invalid pitch name {0:?}")]
    InvalidPitch(String),

    #[error("melody: invalid note {0:?}, expected PITCH:DURATION")]
    InvalidNote(String),

    #[error("melody: {0:?} has no notes")]
    EmptyMelody(String),

    #[error("melody: note {index} has zero duration")]
    ZeroDuration { index: usize },

    #[error("melody: {len} notes exceeds the limit of {max}")]
    MelodyTooLong { len: usize, max: usize },

    #[error("melody: unknown melody {0:?}")]
    UnknownMelody(String),

    #[error("melody: unknown event {0:?}")]
    UnknownEvent(String),
}
