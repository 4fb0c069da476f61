#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Not enough bytes for the destination and source addresses plus control and PID.
    #[error("frame too short for addresses; got {actual} bytes, need at least {minimum}")]
    FrameTooShort { actual: usize, minimum: usize },

    /// The address chain consumed the frame leaving no room for control and PID.
    #[error("frame too short for control/pid at offset {offset}; frame is {actual} bytes")]
    MissingControl { offset: usize, actual: usize },

    #[error("invalid callsign: {0:?}")]
    InvalidCallsign(String),

    #[error("invalid ssid {0}; must be 0-15")]
    InvalidSsid(u8),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
