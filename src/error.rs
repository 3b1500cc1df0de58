//! Error types for series construction and transforms.

/// Errors raised by series operations.
///
/// Every variant describes a violated precondition. Checks run before any
/// result buffer is allocated, so a failed call never leaves partial state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeriesError {
    /// `lag`, `lead` or `diff` asked to shift by at least the row count
    InvalidShift {
        op: &'static str,
        n: usize,
        nrow: usize,
    },
    /// Label list length differs from the column count
    LabelCountMismatch { expected: usize, actual: usize },
    /// Binary operation between series whose column counts cannot broadcast
    ColumnCountMismatch { lhs: usize, rhs: usize },
    /// Window size is zero or larger than the row count
    InvalidWindow { window: usize, nrow: usize },
    /// Data buffer length does not equal `nrow * ncol`
    ShapeMismatch { expected: usize, actual: usize },
    /// Row position outside `0..nrow`
    RowOutOfBounds { row: usize, nrow: usize },
}

impl std::fmt::Display for SeriesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeriesError::InvalidShift { op, n, nrow } => {
                write!(f, "{}: n ({}) must be less than nrow ({})", op, n, nrow)
            }
            SeriesError::LabelCountMismatch { expected, actual } => write!(
                f,
                "Label count mismatch: expected {} labels, got {}",
                expected, actual
            ),
            SeriesError::ColumnCountMismatch { lhs, rhs } => write!(
                f,
                "Column count mismatch: {} vs {} (counts must match or one side must have a single column)",
                lhs, rhs
            ),
            SeriesError::InvalidWindow { window, nrow } => write!(
                f,
                "Invalid window: size {} must be between 1 and nrow ({})",
                window, nrow
            ),
            SeriesError::ShapeMismatch { expected, actual } => write!(
                f,
                "Shape mismatch: expected {} cells, got {}",
                expected, actual
            ),
            SeriesError::RowOutOfBounds { row, nrow } => {
                write!(f, "Row {} out of bounds for {} rows", row, nrow)
            }
        }
    }
}

impl std::error::Error for SeriesError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_failed_operation() {
        let err = SeriesError::InvalidShift {
            op: "lag",
            n: 5,
            nrow: 3,
        };
        assert_eq!(err.to_string(), "lag: n (5) must be less than nrow (3)");
    }

    #[test]
    fn errors_compare_by_value() {
        let a = SeriesError::InvalidWindow { window: 0, nrow: 4 };
        let b = SeriesError::InvalidWindow { window: 0, nrow: 4 };
        assert_eq!(a, b);
        assert_ne!(a, SeriesError::InvalidWindow { window: 5, nrow: 4 });
    }
}
