use std::{error, fmt};

/// An error.
pub struct Error {
    kind: ErrorKind,
    message: String,
}

/// The type of an error.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Malformed, missing, or out-of-range parameters.
    Config,
    /// A failure reported by the file system or a foreign parser.
    Input,
    /// A violation of the internal consistency of the simulation.
    Invariant,
}

/// A result.
pub type Result<T> = ::std::result::Result<T, Error>;

impl Error {
    /// Create an error.
    #[inline]
    pub fn new<T: ToString>(kind: ErrorKind, message: T) -> Error {
        Error { kind, message: message.to_string() }
    }

    /// Return the type.
    #[inline(always)]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{:?}: {}", self.kind, self.message)
    }
}

impl fmt::Display for Error {
    #[inline]
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        self.message.fmt(formatter)
    }
}

impl error::Error for Error {
}
