//! Error types for the ATM engine.

use crate::action::ActionError;
use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that abort a whole run.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Failed to open or read the input source
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input source contained no lines at all
    #[error("Error parsing input file: input is empty")]
    EmptyInput,

    /// A malformed record that the run cannot recover from
    #[error("Error parsing input file: {0}")]
    Parse(#[from] ParseError),

    /// Unrecognized command line argument
    #[error("Invalid argument '{0}'. Usage: atm-engine [--strict] [INPUT]")]
    InvalidArgument(String),
}

/// A malformed record in the input, reported with its 1-based line number.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Input held only comments, so there is no cash float line
    #[error("missing ATM cash float line")]
    MissingCashFloat,

    #[error("line {line}: invalid ATM cash float '{value}'")]
    InvalidCashFloat { line: usize, value: String },

    /// Account line must be `<account> <expected pin> <entered pin>`
    #[error("line {line}: expected 3 tokens on account line, found {found}")]
    AccountLine { line: usize, found: usize },

    /// Funds line must be `<balance> <overdraft>`
    #[error("line {line}: expected 2 tokens on funds line, found {found}")]
    FundsLine { line: usize, found: usize },

    #[error("line {line}: invalid {field} '{value}'")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },

    /// A session ended (blank line or end of input) before its funds line
    #[error("line {line}: session for account {account} has no funds line")]
    MissingFundsLine { line: usize, account: String },

    #[error("line {line}: {source}")]
    Action {
        line: usize,
        #[source]
        source: ActionError,
    },
}

impl ParseError {
    /// Line the error was found on, if it is tied to one.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::MissingCashFloat => None,
            ParseError::InvalidCashFloat { line, .. }
            | ParseError::AccountLine { line, .. }
            | ParseError::FundsLine { line, .. }
            | ParseError::InvalidNumber { line, .. }
            | ParseError::MissingFundsLine { line, .. }
            | ParseError::Action { line, .. } => Some(*line),
        }
    }
}

/// Per-session failure codes, written to the output as literal tokens.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Entered PIN does not match the expected PIN
    #[error("ACCOUNT_ERR")]
    AccountErr,

    /// Withdrawal exceeds the customer's balance plus overdraft
    #[error("FUNDS_ERR")]
    FundsErr,

    /// Withdrawal exceeds the cash held by the ATM
    #[error("ATM_ERR")]
    AtmErr,
}
