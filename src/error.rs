use rust_decimal::Decimal;
use thiserror::Error;

use crate::workflow::{BillId, Event, Role, Stage};

#[derive(Debug, Error)]
pub enum BillflowError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Not a bill id: {0:?} (expected TXN<number>)")]
    UnknownBillId(String),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Malformed input at bill creation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("amount {0:?} is not a number")]
    InvalidAmount(String),

    #[error("amount {0} is negative")]
    NegativeAmount(Decimal),

    #[error("amount {0} exceeds the per-bill limit")]
    AmountTooLarge(Decimal),

    #[error("due date {0:?} is not a calendar date (expected YYYY-MM-DD)")]
    InvalidDueDate(String),
}

/// Every way a workflow operation can be refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("Invalid bill: {0}")]
    Validation(#[from] ValidationError),

    #[error("Bill {0} does not exist")]
    NotFound(BillId),

    #[error("Bill {bill} is at the {stage} stage and cannot take '{event}'")]
    InvalidTransition {
        bill: BillId,
        stage: Stage,
        event: Event,
    },

    #[error("{role} may not '{event}' bill {bill} at the {stage} stage; only {required} may")]
    Unauthorized {
        bill: BillId,
        stage: Stage,
        event: Event,
        role: Role,
        required: Role,
    },

    #[error("Bill {bill} is already {stage}; no further actions are possible")]
    AlreadyTerminal { bill: BillId, stage: Stage },
}

impl WorkflowError {
    /// Short stable name for the error kind, used by the terminal UI.
    pub fn kind(&self) -> ErrorKind {
        match self {
            WorkflowError::Validation(_) => ErrorKind::Validation,
            WorkflowError::NotFound(_) => ErrorKind::NotFound,
            WorkflowError::InvalidTransition { .. } => ErrorKind::InvalidTransition,
            WorkflowError::Unauthorized { .. } => ErrorKind::Unauthorized,
            WorkflowError::AlreadyTerminal { .. } => ErrorKind::AlreadyTerminal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    Validation,
    NotFound,
    InvalidTransition,
    Unauthorized,
    AlreadyTerminal,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Validation => write!(f, "ValidationError"),
            ErrorKind::NotFound => write!(f, "NotFound"),
            ErrorKind::InvalidTransition => write!(f, "InvalidTransition"),
            ErrorKind::Unauthorized => write!(f, "Unauthorized"),
            ErrorKind::AlreadyTerminal => write!(f, "AlreadyTerminal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_distinct_per_kind() {
        let bill = BillId::new(1001);
        let errors = [
            WorkflowError::Validation(ValidationError::MissingField("branch")),
            WorkflowError::NotFound(bill),
            WorkflowError::InvalidTransition {
                bill,
                stage: Stage::Checker,
                event: Event::Submit,
            },
            WorkflowError::Unauthorized {
                bill,
                stage: Stage::Checker,
                event: Event::Approve,
                role: Role::Maker,
                required: Role::Checker,
            },
            WorkflowError::AlreadyTerminal {
                bill,
                stage: Stage::Rejected,
            },
        ];
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        assert_eq!(messages[0], "Invalid bill: branch is required");
        assert_eq!(messages[1], "Bill TXN1001 does not exist");
        assert_eq!(
            messages[3],
            "Maker may not 'approve' bill TXN1001 at the Checker stage; only Checker may"
        );
        for (i, a) in messages.iter().enumerate() {
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn kind_display() {
        assert_eq!(
            WorkflowError::NotFound(BillId::new(1)).kind().to_string(),
            "NotFound"
        );
        assert_eq!(ErrorKind::Validation.to_string(), "ValidationError");
    }

    #[test]
    fn workflow_error_converts_into_app_error() {
        let err: BillflowError = WorkflowError::NotFound(BillId::new(9)).into();
        assert_eq!(err.to_string(), "Bill TXN9 does not exist");
    }
}
