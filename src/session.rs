//! Customer session model and its guarded account operations.
//!
//! Available funds are `balance + overdraft`. A withdrawal that leaves the
//! balance below zero also adds that negative balance to the overdraft, so
//! the two fields are settled as a pair rather than independently.

use crate::action::Action;
use crate::amount::Amount;
use crate::error::ErrorCode;
use std::fmt;

/// One customer's visit to the ATM.
///
/// # Invariants
///
/// - A successful withdrawal of `a` lowers `balance` by exactly `a`, and lowers
///   `balance + overdraft` by exactly `a` while the balance stays non-negative
/// - Once the balance is negative, every further withdrawal adds the whole new
///   negative balance to `overdraft` again
/// - `overdraft` is never used as a floor; the available-funds check before
///   each withdrawal is what keeps it from being breached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Informational only, never used for authentication.
    pub account_number: String,

    expected_pin: String,

    entered_pin: String,

    /// Customer's own funds. Negative once the overdraft is in use.
    pub balance: Amount,

    /// Overdraft facility remaining.
    pub overdraft: Amount,

    /// Requested operations, in the order the customer entered them.
    pub actions: Vec<Action>,
}

impl Session {
    pub fn new(
        account_number: impl Into<String>,
        expected_pin: impl Into<String>,
        entered_pin: impl Into<String>,
        balance: Amount,
        overdraft: Amount,
    ) -> Self {
        Session {
            account_number: account_number.into(),
            expected_pin: expected_pin.into(),
            entered_pin: entered_pin.into(),
            balance,
            overdraft,
            actions: Vec::new(),
        }
    }

    /// Builder-style helper to attach the action list.
    pub fn with_actions(mut self, actions: Vec<Action>) -> Self {
        self.actions = actions;
        self
    }

    pub fn push_action(&mut self, action: Action) {
        self.actions.push(action);
    }

    /// Compares the entered PIN to the expected one, exact and case-sensitive.
    pub fn verify_pin(&self) -> Result<(), ErrorCode> {
        if self.expected_pin == self.entered_pin {
            Ok(())
        } else {
            Err(ErrorCode::AccountErr)
        }
    }

    /// Balance plus overdraft: the most this customer may withdraw.
    pub fn available_funds(&self) -> Amount {
        self.balance.saturating_add(self.overdraft)
    }

    /// Debits the account after the caller has checked available funds.
    ///
    /// Returns the new balance.
    pub fn debit(&mut self, amount: Amount) -> Amount {
        let new_balance = self.balance - amount;
        if new_balance.is_negative() {
            self.overdraft += new_balance;
        }
        self.balance = new_balance;
        new_balance
    }

    /// Withdraws `amount` if balance plus overdraft covers it.
    ///
    /// Returns `FUNDS_ERR` and leaves the account untouched otherwise. The
    /// ATM's own cash check happens in the engine, before this is called.
    pub fn withdraw(&mut self, amount: Amount) -> Result<Amount, ErrorCode> {
        if self.available_funds() < amount {
            return Err(ErrorCode::FundsErr);
        }
        Ok(self.debit(amount))
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let actions: Vec<String> = self.actions.iter().map(Action::to_string).collect();
        write!(
            f,
            "account {} balance {} overdraft {} actions [{}]",
            self.account_number,
            self.balance,
            self.overdraft,
            actions.join(", ")
        )
    }
}
