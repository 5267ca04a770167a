use alloc::borrow::Cow;
use alloc::string::String;
use core::fmt;

use thiserror::Error;

// -----------------------------------------------------------------------------
// StreamError

/// An error that aborts a stream.
///
/// Coercion problems never show up here: they are recovered per value.
/// Only malformed event sequences, unconfigured cyclic references and sink
/// failures reach the caller.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum StreamError {
    #[error(transparent)]
    Structural(#[from] StructuralError),

    /// The serializer met a value already on its descent path.
    #[error("cyclic reference to `{type_name}`{}", AtPath(.path))]
    CyclicReference {
        type_name: &'static str,
        /// Keys and indices leading to the repeated value, when recorded.
        path: Option<String>,
    },

    /// The consumer could not accept an event.
    #[error("consumer failed: {0}")]
    Sink(Cow<'static, str>),
}

impl StreamError {
    #[inline]
    pub fn sink(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Sink(message.into())
    }

    #[inline]
    pub const fn is_structural(&self) -> bool {
        matches!(self, StreamError::Structural(_))
    }
}

struct AtPath<'a>(&'a Option<String>);

impl fmt::Display for AtPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(path) => write!(f, " at `{path}`"),
            None => Ok(()),
        }
    }
}

// -----------------------------------------------------------------------------
// StructuralError

/// A malformed event sequence.
///
/// Event names are the protocol method names (`close_array`, `key`, ...).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StructuralError {
    #[error("`{0}` without a matching open")]
    UnmatchedClose(&'static str),

    #[error("`{found}` cannot close an open {open}")]
    MismatchedClose {
        found: &'static str,
        open: &'static str,
    },

    #[error("key `{0}` outside of an object")]
    KeyOutsideObject(String),

    #[error("key `{0}` follows another key without a value")]
    DanglingKey(String),

    #[error("`{0}` inside an object without a preceding key")]
    MissingKey(&'static str),

    #[error("`{0}` after the top-level value was complete")]
    TrailingValue(&'static str),

    #[error("`{0}` directly after a key")]
    KeyWithoutValue(&'static str),

    #[error("stream ended with {0} unclosed container(s)")]
    Unclosed(usize),

    #[error("stream ended without a value")]
    Empty,
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::{StreamError, StructuralError};

    #[test]
    fn messages() {
        let err = StreamError::CyclicReference {
            type_name: "Node",
            path: Some("$.next.next".into()),
        };
        assert_eq!(err.to_string(), "cyclic reference to `Node` at `$.next.next`");

        let err = StreamError::CyclicReference {
            type_name: "Node",
            path: None,
        };
        assert_eq!(err.to_string(), "cyclic reference to `Node`");

        let err: StreamError = StructuralError::UnmatchedClose("close_array").into();
        assert!(err.is_structural());
        assert_eq!(err.to_string(), "`close_array` without a matching open");
    }
}
