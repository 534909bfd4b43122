//! Error types for the text formats.

use thiserror::Error;

/// Errors that can occur while reading transactions or rules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Parse error at a specific position of a line.
    #[error("parse error on line {line} at position {position}: {message}")]
    ParseError {
        /// 1-based line number.
        line: usize,
        /// Byte offset within the line.
        position: usize,
        /// Description of the error.
        message: String,
    },

    /// Empty input provided where content is required.
    #[error("empty input")]
    EmptyInput,

    /// Item `0` appeared in the input.
    #[error("item 0 is reserved (line {line})")]
    ReservedItem {
        /// 1-based line number.
        line: usize,
    },

    /// An item identifier exceeded [`crate::MAX_ITEM`].
    #[error("item {item} exceeds the largest accepted item {max} (line {line})", max = crate::MAX_ITEM)]
    ItemOutOfRange {
        /// 1-based line number.
        line: usize,
        /// The offending item.
        item: u32,
    },
}

/// Result type for text-format operations.
pub type FormatResult<T> = std::result::Result<T, FormatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_parse_error() {
        let err = FormatError::ParseError {
            line: 3,
            position: 4,
            message: "unexpected input at: 'x'".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "parse error on line 3 at position 4: unexpected input at: 'x'"
        );
    }

    #[test]
    fn test_error_display_reserved_item() {
        let err = FormatError::ReservedItem { line: 7 };
        assert_eq!(err.to_string(), "item 0 is reserved (line 7)");
    }

    #[test]
    fn test_error_display_item_out_of_range() {
        let err = FormatError::ItemOutOfRange {
            line: 2,
            item: 9_000_000,
        };
        assert_eq!(
            err.to_string(),
            "item 9000000 exceeds the largest accepted item 8388607 (line 2)"
        );
    }
}
