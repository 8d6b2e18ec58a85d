//! A minimal error type with a source location, used as the base building
//! block for the richer diagnostic taxonomy in `netta-ir`.
//!
//! # Example
//!
//! ```
//! use netta_base::{SpannedError, Span, Result};
//!
//! fn parse_number(s: &str) -> Result<i64> {
//!     s.parse().map_err(|_| SpannedError::new(
//!         format!("invalid number: '{}'", s),
//!         Span::new(0, s.len() as u32),
//!     ))
//! }
//!
//! let err = parse_number("abc").unwrap_err();
//! assert!(err.to_string().contains("invalid number"));
//! ```

use crate::positions::Span;
use std::fmt;

/// An error annotated with its source location.
///
/// Display format is `{message} at {start}..{end}`.
#[derive(Debug, Clone)]
pub struct SpannedError {
    pub message: String,
    pub span: Span,
}

impl SpannedError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self { message: message.into(), span }
    }
}

impl fmt::Display for SpannedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}..{}", self.message, self.span.start, self.span.end)
    }
}

impl std::error::Error for SpannedError {}

/// Alias for `std::result::Result<T, SpannedError>`.
pub type Result<T> = std::result::Result<T, SpannedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spanned_error_display() {
        let err = SpannedError::new("bad token", Span::new(5, 10));
        let display = format!("{}", err);
        assert!(display.contains("bad token"));
        assert!(display.contains("5..10"));
    }
}
