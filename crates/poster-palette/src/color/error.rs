//! Error types for color parsing
//!
//! Hex strings reaching the color utilities are expected to be well formed;
//! malformed input is reported instead of producing garbage channels.

use std::fmt;

/// Error type for parsing color strings.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorError {
    /// The string is not a 6-digit hex color (after an optional leading `#`)
    InvalidColorFormat {
        /// The rejected input
        input: String,
        /// What was wrong with it
        reason: FormatProblem,
    },
}

/// Reason a color string was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum FormatProblem {
    /// Wrong number of hex digits
    InvalidLength(usize),
    /// Non-hexadecimal character
    InvalidHex(char),
    /// Not an `rgba(r, g, b, a)` expression
    InvalidFunction,
}

impl ColorError {
    pub(crate) fn new(input: &str, reason: FormatProblem) -> Self {
        ColorError::InvalidColorFormat {
            input: input.to_string(),
            reason,
        }
    }
}

impl fmt::Display for FormatProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatProblem::InvalidLength(len) => {
                write!(f, "expected 6 hex digits, found {}", len)
            }
            FormatProblem::InvalidHex(c) => write!(f, "invalid hex character {:?}", c),
            FormatProblem::InvalidFunction => write!(f, "expected rgba(r, g, b, a)"),
        }
    }
}

impl fmt::Display for ColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorError::InvalidColorFormat { input, reason } => {
                write!(f, "invalid color format {:?}: {}", input, reason)
            }
        }
    }
}

impl std::error::Error for ColorError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_invalid_length() {
        let err = ColorError::new("#abc", FormatProblem::InvalidLength(3));
        assert_eq!(
            err.to_string(),
            "invalid color format \"#abc\": expected 6 hex digits, found 3"
        );
    }

    #[test]
    fn test_display_invalid_hex() {
        let err = ColorError::new("#12345g", FormatProblem::InvalidHex('g'));
        assert_eq!(
            err.to_string(),
            "invalid color format \"#12345g\": invalid hex character 'g'"
        );
    }
}
