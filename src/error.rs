//! Unified error type.

use std::fmt;

/// The error type returned by tally's fallible operations.
///
/// Body writes keep returning plain [`std::io::Error`]s so that a failing
/// transport reaches the handler exactly as the real sink reported it. This
/// type covers the rest: capability requests a sink cannot honour, and
/// infrastructure failures while binding or accepting connections.
#[derive(Debug)]
pub enum Error {
    /// Socket or transport failure.
    Io(std::io::Error),
    /// The underlying sink does not offer the requested capability
    /// (for example connection takeover).
    Unsupported(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Unsupported(op) => write!(f, "{op} not supported"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Unsupported(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_names_the_operation() {
        let err = Error::Unsupported("hijack");
        assert_eq!(err.to_string(), "hijack not supported");
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn io_errors_keep_their_source() {
        let err = Error::from(std::io::Error::new(std::io::ErrorKind::AddrInUse, "taken"));
        assert_eq!(err.to_string(), "io: taken");
        assert!(std::error::Error::source(&err).is_some());
    }
}
