// Stream errors. Copy, no allocation; context is a static string
// in the same spirit as the storage layer's "open file failed".

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamError {
    /// open/seek/read failure from the file-access layer
    Io(&'static str),
    /// rejected before any state was touched
    InvalidArgument(&'static str),
    /// operation needs an open session
    NotOpen,
}

impl StreamError {
    pub const fn is_io(&self) -> bool {
        matches!(self, StreamError::Io(_))
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::Io(msg) => write!(f, "io: {}", msg),
            StreamError::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            StreamError::NotOpen => f.write_str("stream not open"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_context() {
        assert_eq!(StreamError::Io("seek failed").to_string(), "io: seek failed");
        assert_eq!(
            StreamError::InvalidArgument("slot index").to_string(),
            "invalid argument: slot index"
        );
        assert_eq!(StreamError::NotOpen.to_string(), "stream not open");
    }

    #[test]
    fn only_io_is_io() {
        assert!(StreamError::Io("read failed").is_io());
        assert!(!StreamError::NotOpen.is_io());
    }
}
