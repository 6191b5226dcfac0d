//! Customer actions requested within a session.

use crate::amount::Amount;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Reasons an action line cannot be turned into an [`Action`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("unrecognized action code '{0}', expected W or B")]
    UnknownCode(String),

    #[error("withdrawal is missing an amount")]
    MissingAmount,

    #[error("invalid withdrawal amount '{0}'")]
    InvalidAmount(String),

    #[error("negative withdrawal amount {0}")]
    NegativeAmount(Amount),

    /// A balance inquiry carried an amount, or a withdrawal carried more than one
    #[error("unexpected token '{0}' after {1}")]
    UnexpectedToken(String, &'static str),

    #[error("empty action line")]
    Empty,
}

/// Action type variants with associated data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Dispense cash, debiting the balance and then the overdraft.
    Withdrawal(Amount),

    /// Report the current balance.
    BalanceInquiry,
}

/// A single validated operation.
///
/// The kind is private so every `Action` goes through a constructor: an
/// unknown code or a negative withdrawal never reaches the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Action {
    kind: ActionKind,
}

impl Action {
    pub const WITHDRAWAL_CODE: &'static str = "W";
    pub const BALANCE_INQUIRY_CODE: &'static str = "B";

    pub fn balance_inquiry() -> Self {
        Action {
            kind: ActionKind::BalanceInquiry,
        }
    }

    /// Creates a withdrawal, rejecting negative amounts.
    pub fn withdrawal(amount: Amount) -> Result<Self, ActionError> {
        if amount.is_negative() {
            return Err(ActionError::NegativeAmount(amount));
        }
        Ok(Action {
            kind: ActionKind::Withdrawal(amount),
        })
    }

    /// Builds an action from its one-letter code and optional amount token.
    ///
    /// `W` requires an amount; `B` must not have one.
    pub fn from_code(code: &str, amount: Option<&str>) -> Result<Self, ActionError> {
        match code {
            Self::WITHDRAWAL_CODE => {
                let raw = amount.ok_or(ActionError::MissingAmount)?;
                let amount = Amount::from_str(raw)
                    .map_err(|_| ActionError::InvalidAmount(raw.to_string()))?;
                Self::withdrawal(amount)
            }
            Self::BALANCE_INQUIRY_CODE => match amount {
                Some(extra) => Err(ActionError::UnexpectedToken(
                    extra.to_string(),
                    "balance inquiry",
                )),
                None => Ok(Self::balance_inquiry()),
            },
            other => Err(ActionError::UnknownCode(other.to_string())),
        }
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub fn is_withdrawal(&self) -> bool {
        matches!(self.kind, ActionKind::Withdrawal(_))
    }

    pub fn is_balance_inquiry(&self) -> bool {
        matches!(self.kind, ActionKind::BalanceInquiry)
    }
}

/// Parses a whole action line: `B` or `W <amount>`.
impl FromStr for Action {
    type Err = ActionError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut tokens = line.split_whitespace();
        let code = tokens.next().ok_or(ActionError::Empty)?;
        let action = Action::from_code(code, tokens.next())?;
        // only a withdrawal can get here with a second token consumed
        if let Some(extra) = tokens.next() {
            return Err(ActionError::UnexpectedToken(extra.to_string(), "withdrawal"));
        }
        Ok(action)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ActionKind::Withdrawal(amount) => write!(f, "{} {}", Self::WITHDRAWAL_CODE, amount),
            ActionKind::BalanceInquiry => f.write_str(Self::BALANCE_INQUIRY_CODE),
        }
    }
}
