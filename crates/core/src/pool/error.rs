//! Error types for the pool module.

use thiserror::Error;

/// Errors returned by pool operations.
///
/// `Full` and `Empty` are contract violations: callers stop instead of retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    /// Add attempted while the pool already holds `capacity` tickets.
    #[error("Ticket pool has reached maximum capacity ({capacity})")]
    Full { capacity: usize },

    /// Blocking remove attempted while the pool was empty at entry.
    #[error("No tickets available in the pool")]
    Empty,

    /// Wait aborted by cancellation.
    #[error("Pool operation cancelled")]
    Cancelled,
}

impl PoolError {
    /// Short label used for metrics and events.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Full { .. } => "full",
            Self::Empty => "empty",
            Self::Cancelled => "cancelled",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PoolError::Full { capacity: 3 };
        assert_eq!(
            err.to_string(),
            "Ticket pool has reached maximum capacity (3)"
        );
        assert_eq!(PoolError::Empty.to_string(), "No tickets available in the pool");
    }

    #[test]
    fn test_reason_labels() {
        assert_eq!(PoolError::Full { capacity: 1 }.reason(), "full");
        assert_eq!(PoolError::Empty.reason(), "empty");
        assert_eq!(PoolError::Cancelled.reason(), "cancelled");
    }
}
