use miette::Diagnostic;
use thiserror::Error;

/// An annotation range that doesn't fit the text it was added to.
///
/// The variant says which bound was violated; the message text is stable and
/// matches across implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Diagnostic)]
pub enum InvalidRange {
    #[error("start ({start}) must be <= end ({end})")]
    #[diagnostic(
        code(weaver_annotate::range::start_after_end),
        help("pass the smaller position as start")
    )]
    StartAfterEnd { start: i64, end: i64 },

    #[error("start ({start}) must be >= 0")]
    #[diagnostic(code(weaver_annotate::range::negative_start))]
    NegativeStart { start: i64 },

    #[error("end ({end}) must be <= length of text ({len})")]
    #[diagnostic(
        code(weaver_annotate::range::end_out_of_bounds),
        help("positions count characters, not bytes")
    )]
    EndOutOfBounds { end: i64, len: usize },
}

impl InvalidRange {
    /// Check `start..end` against a text of `len` characters.
    ///
    /// Bounds are checked in a fixed order: ordering first, then the lower
    /// bound, then the upper bound.
    pub fn check(start: i64, end: i64, len: usize) -> Result<(), Self> {
        if start > end {
            return Err(Self::StartAfterEnd { start, end });
        }
        if start < 0 {
            return Err(Self::NegativeStart { start });
        }
        if end > i64::try_from(len).unwrap_or(i64::MAX) {
            return Err(Self::EndOutOfBounds { end, len });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            InvalidRange::check(7, 4, 10).unwrap_err().to_string(),
            "start (7) must be <= end (4)"
        );
        assert_eq!(
            InvalidRange::check(-3, 4, 10).unwrap_err().to_string(),
            "start (-3) must be >= 0"
        );
        assert_eq!(
            InvalidRange::check(5, 100, 10).unwrap_err().to_string(),
            "end (100) must be <= length of text (10)"
        );
    }

    #[test]
    fn test_ordering_checked_before_sign() {
        // Both inverted and negative: ordering wins.
        assert_eq!(
            InvalidRange::check(-1, -5, 10),
            Err(InvalidRange::StartAfterEnd { start: -1, end: -5 })
        );
    }

    #[test]
    fn test_valid_ranges() {
        assert!(InvalidRange::check(0, 0, 0).is_ok());
        assert!(InvalidRange::check(0, 10, 10).is_ok());
        assert!(InvalidRange::check(10, 10, 10).is_ok());
    }

    #[test]
    fn test_diagnostic_code() {
        let err = InvalidRange::check(5, 100, 10).unwrap_err();
        let code = err.code().map(|c| c.to_string());
        assert_eq!(
            code.as_deref(),
            Some("weaver_annotate::range::end_out_of_bounds")
        );
    }
}
