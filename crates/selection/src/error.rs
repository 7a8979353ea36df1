//! Selection errors.

use encounter_core::CandidateId;

/// Result type for selection operations.
pub type Result<T> = std::result::Result<T, SelectionError>;

/// Errors reported by the selection engine.
///
/// Every error is detected before any table is built; a failed call
/// produces no partial selection and fails identically on retry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    /// Budget is negative
    #[error("invalid budget {budget}: must be zero or greater")]
    InvalidBudget {
        /// Offending budget
        budget: i64,
    },

    /// Capacity is zero or negative
    #[error("invalid capacity {capacity}: must be at least 1")]
    InvalidCapacity {
        /// Offending capacity
        capacity: i64,
    },

    /// A candidate has a negative weight
    #[error("candidate {id} has invalid weight {weight}: must be zero or greater")]
    InvalidCandidateWeight {
        /// Candidate identifier
        id: CandidateId,
        /// Offending weight
        weight: i64,
    },

    /// A candidate has a negative value
    #[error("candidate {id} has invalid value {value}: must be zero or greater")]
    InvalidCandidateValue {
        /// Candidate identifier
        id: CandidateId,
        /// Offending value
        value: i64,
    },

    /// Two candidates share an identifier
    #[error("candidate {id} appears more than once")]
    DuplicateCandidate {
        /// Repeated identifier
        id: CandidateId,
    },

    /// Budget is above the configured cap
    #[error("budget {budget} exceeds the configured maximum of {max}")]
    BudgetTooLarge {
        /// Requested budget
        budget: i64,
        /// Configured cap
        max: i64,
    },

    /// The call's working memory would exceed the configured cap
    #[error("selection table of {bytes} bytes exceeds the configured maximum of {max}")]
    TableTooLarge {
        /// Bytes the call would allocate
        bytes: u64,
        /// Configured cap
        max: u64,
    },

    /// Candidate values sum past the integer range
    #[error("total candidate value overflows a 64-bit integer")]
    ValueOverflow,
}

/// Broad class of a [`SelectionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed or out-of-range arguments
    InvalidInput,
    /// A valid call that would exceed a configured resource cap
    ResourceLimit,
}

impl SelectionError {
    /// Which class this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidBudget { .. }
            | Self::InvalidCapacity { .. }
            | Self::InvalidCandidateWeight { .. }
            | Self::InvalidCandidateValue { .. }
            | Self::DuplicateCandidate { .. } => ErrorCategory::InvalidInput,
            Self::BudgetTooLarge { .. } | Self::TableTooLarge { .. } | Self::ValueOverflow => {
                ErrorCategory::ResourceLimit
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(
            SelectionError::InvalidCapacity { capacity: 0 }.category(),
            ErrorCategory::InvalidInput
        );
        assert_eq!(
            SelectionError::DuplicateCandidate { id: CandidateId::new("x") }.category(),
            ErrorCategory::InvalidInput
        );
        assert_eq!(
            SelectionError::BudgetTooLarge { budget: 10, max: 5 }.category(),
            ErrorCategory::ResourceLimit
        );
        assert_eq!(SelectionError::ValueOverflow.category(), ErrorCategory::ResourceLimit);
    }

    #[test]
    fn test_error_messages_name_the_input() {
        let err = SelectionError::InvalidCandidateWeight {
            id: CandidateId::new("ogre"),
            weight: -3,
        };
        assert_eq!(
            err.to_string(),
            "candidate ogre has invalid weight -3: must be zero or greater"
        );
    }
}
