//! Core ATM processing engine.
//!
//! Owns the machine's cash float for the length of one run and replays each
//! session against it: PIN check once, then every action in order. The float
//! is the only state shared between sessions.

use crate::action::{Action, ActionKind};
use crate::amount::Amount;
use crate::error::{ErrorCode, Result};
use crate::session::Session;
use log::debug;
use std::convert::Infallible;
use std::fmt;
use std::io::Write;

/// Result of one processed action, or of a session that failed its PIN check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Balance after a balance inquiry or a successful withdrawal.
    Balance(Amount),

    /// The action or session was refused.
    Rejected(ErrorCode),
}

impl From<std::result::Result<Amount, ErrorCode>> for Outcome {
    fn from(result: std::result::Result<Amount, ErrorCode>) -> Self {
        match result {
            Ok(balance) => Outcome::Balance(balance),
            Err(code) => Outcome::Rejected(code),
        }
    }
}

/// Renders exactly one output line: the balance, or the error token.
impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Balance(balance) => write!(f, "{}", balance),
            Outcome::Rejected(code) => write!(f, "{}", code),
        }
    }
}

/// Totals for a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub sessions: usize,
    pub outcomes: usize,
    pub rejected_sessions: usize,
    pub cash_float: Amount,
}

/// The ATM processing engine.
///
/// One instance per run. Sessions must be fed in arrival order: withdrawals
/// from different sessions drain the same float, so order is observable.
#[derive(Debug)]
pub struct AtmEngine {
    /// Physical cash left in the machine.
    cash_float: Amount,
}

impl AtmEngine {
    /// Creates an engine loaded with `cash_float`.
    pub fn new(cash_float: Amount) -> Self {
        AtmEngine { cash_float }
    }

    pub fn cash_float(&self) -> Amount {
        self.cash_float
    }

    /// Processes one session and returns its outcomes in order.
    pub fn process_session(&mut self, session: &mut Session) -> Vec<Outcome> {
        let mut outcomes = Vec::with_capacity(session.actions.len());
        let result = self.process_session_with(session, |outcome| {
            outcomes.push(outcome);
            Ok::<(), Infallible>(())
        });
        match result {
            Ok(()) => outcomes,
            Err(never) => match never {},
        }
    }

    /// Processes one session, handing each outcome to `emit` as soon as it
    /// is produced.
    ///
    /// A PIN mismatch emits a single `ACCOUNT_ERR` and touches nothing. A
    /// refused withdrawal does not stop later actions. Errors from `emit`
    /// stop processing and are returned.
    pub fn process_session_with<F, E>(
        &mut self,
        session: &mut Session,
        mut emit: F,
    ) -> std::result::Result<(), E>
    where
        F: FnMut(Outcome) -> std::result::Result<(), E>,
    {
        if let Err(code) = session.verify_pin() {
            debug!(
                "Account {}: PIN mismatch, skipping {} action(s)",
                session.account_number,
                session.actions.len()
            );
            return emit(Outcome::Rejected(code));
        }

        // detached while the session's balances are mutated, restored after
        let actions = std::mem::take(&mut session.actions);
        let result = actions.iter().try_for_each(|&action| {
            let outcome = self.apply_action(session, action);
            emit(outcome)
        });
        session.actions = actions;
        result
    }

    /// Processes every session in order, writing one line per outcome.
    pub fn run<I, W>(&mut self, sessions: I, mut writer: W) -> Result<RunSummary>
    where
        I: IntoIterator<Item = Session>,
        W: Write,
    {
        let mut summary = RunSummary::default();

        for mut session in sessions {
            let mut emitted = 0;
            let mut rejected = false;
            self.process_session_with(&mut session, |outcome| -> Result<()> {
                if outcome == Outcome::Rejected(ErrorCode::AccountErr) {
                    rejected = true;
                }
                emitted += 1;
                writeln!(writer, "{}", outcome)?;
                Ok(())
            })?;

            summary.sessions += 1;
            summary.outcomes += emitted;
            if rejected {
                summary.rejected_sessions += 1;
            }
        }

        writer.flush()?;
        summary.cash_float = self.cash_float;
        Ok(summary)
    }

    fn apply_action(&mut self, session: &mut Session, action: Action) -> Outcome {
        match action.kind() {
            ActionKind::BalanceInquiry => Outcome::Balance(session.balance),
            ActionKind::Withdrawal(amount) => self.withdraw(session, amount).into(),
        }
    }

    /// Dispenses `amount` if both the machine and the customer can cover it.
    ///
    /// The machine's cash is checked before the customer's funds, so a
    /// request failing both reports `ATM_ERR`.
    fn withdraw(
        &mut self,
        session: &mut Session,
        amount: Amount,
    ) -> std::result::Result<Amount, ErrorCode> {
        if amount > self.cash_float {
            debug!(
                "Account {}: withdrawal of {} exceeds ATM cash {}",
                session.account_number, amount, self.cash_float
            );
            return Err(ErrorCode::AtmErr);
        }

        let balance = session.withdraw(amount).map_err(|code| {
            debug!(
                "Account {}: withdrawal of {} exceeds available funds {}",
                session.account_number,
                amount,
                session.available_funds()
            );
            code
        })?;

        self.cash_float -= amount;
        debug!(
            "Account {}: withdrew {}, balance {}, ATM cash {}",
            session.account_number, amount, balance, self.cash_float
        );
        Ok(balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(expected_pin: &str, entered_pin: &str, balance: i64, overdraft: i64) -> Session {
        Session::new(
            "123456",
            expected_pin,
            entered_pin,
            Amount::new(balance),
            Amount::new(overdraft),
        )
    }

    fn withdraw(amount: i64) -> Action {
        Action::withdrawal(Amount::new(amount)).unwrap()
    }

    #[test]
    fn test_insufficient_atm_balance() {
        let mut engine = AtmEngine::new(Amount::new(1000));
        let mut s = session("1234", "1234", 1500, 100).with_actions(vec![withdraw(1500)]);

        let outcomes = engine.process_session(&mut s);
        assert_eq!(outcomes, vec![Outcome::Rejected(ErrorCode::AtmErr)]);
        assert_eq!(engine.cash_float(), Amount::new(1000));
        assert_eq!(s.balance, Amount::new(1500));
        assert_eq!(s.overdraft, Amount::new(100));
    }

    #[test]
    fn test_insufficient_funds_balance() {
        let mut engine = AtmEngine::new(Amount::new(1000));
        let mut s = session("1234", "1234", 500, 100).with_actions(vec![withdraw(700)]);

        let outcomes = engine.process_session(&mut s);
        assert_eq!(outcomes, vec![Outcome::Rejected(ErrorCode::FundsErr)]);
        assert_eq!(engine.cash_float(), Amount::new(1000));
        assert_eq!(s.balance, Amount::new(500));
    }

    #[test]
    fn test_non_matching_pin() {
        let mut engine = AtmEngine::new(Amount::new(1000));
        let mut s = session("1234", "1235", 500, 100)
            .with_actions(vec![withdraw(700), Action::balance_inquiry(), withdraw(10)]);

        let outcomes = engine.process_session(&mut s);
        assert_eq!(outcomes, vec![Outcome::Rejected(ErrorCode::AccountErr)]);
        assert_eq!(engine.cash_float(), Amount::new(1000));
        assert_eq!(s.balance, Amount::new(500));
        assert_eq!(s.overdraft, Amount::new(100));
    }

    #[test]
    fn test_non_matching_pin_without_actions() {
        let mut engine = AtmEngine::new(Amount::new(1000));
        let mut s = session("1234", "4321", 500, 100);
        assert_eq!(
            engine.process_session(&mut s),
            vec![Outcome::Rejected(ErrorCode::AccountErr)]
        );
    }

    #[test]
    fn test_withdrawal_into_overdraft_then_inquiry() {
        let mut engine = AtmEngine::new(Amount::new(1000));
        let mut s = session("1234", "1234", 500, 100)
            .with_actions(vec![withdraw(550), Action::balance_inquiry()]);

        let outcomes = engine.process_session(&mut s);
        assert_eq!(
            outcomes,
            vec![
                Outcome::Balance(Amount::new(-50)),
                Outcome::Balance(Amount::new(-50))
            ]
        );
        assert_eq!(s.overdraft, Amount::new(50));
        assert_eq!(engine.cash_float(), Amount::new(450));
    }

    #[test]
    fn test_atm_check_runs_before_funds_check() {
        let mut engine = AtmEngine::new(Amount::new(100));
        let mut s = session("1", "1", 10, 0).with_actions(vec![withdraw(500)]);
        assert_eq!(
            engine.process_session(&mut s),
            vec![Outcome::Rejected(ErrorCode::AtmErr)]
        );
    }

    #[test]
    fn test_failed_action_does_not_stop_session() {
        let mut engine = AtmEngine::new(Amount::new(1000));
        let mut s = session("1", "1", 100, 0).with_actions(vec![
            withdraw(5000),
            withdraw(200),
            withdraw(40),
            Action::balance_inquiry(),
        ]);

        let outcomes = engine.process_session(&mut s);
        assert_eq!(
            outcomes,
            vec![
                Outcome::Rejected(ErrorCode::AtmErr),
                Outcome::Rejected(ErrorCode::FundsErr),
                Outcome::Balance(Amount::new(60)),
                Outcome::Balance(Amount::new(60)),
            ]
        );
        assert_eq!(engine.cash_float(), Amount::new(960));
    }

    #[test]
    fn test_cash_float_shared_across_sessions() {
        let mut engine = AtmEngine::new(Amount::new(100));
        let mut first = session("1", "1", 500, 0).with_actions(vec![withdraw(80)]);
        let mut second = session("2", "2", 500, 0).with_actions(vec![withdraw(30), withdraw(20)]);

        assert_eq!(
            engine.process_session(&mut first),
            vec![Outcome::Balance(Amount::new(420))]
        );
        assert_eq!(
            engine.process_session(&mut second),
            vec![
                Outcome::Rejected(ErrorCode::AtmErr),
                Outcome::Balance(Amount::new(480))
            ]
        );
        assert_eq!(engine.cash_float(), Amount::ZERO);
    }

    #[test]
    fn test_withdraw_exact_cash_float() {
        let mut engine = AtmEngine::new(Amount::new(100));
        let mut s = session("1", "1", 100, 0).with_actions(vec![withdraw(100)]);
        assert_eq!(
            engine.process_session(&mut s),
            vec![Outcome::Balance(Amount::ZERO)]
        );
        assert_eq!(engine.cash_float(), Amount::ZERO);
    }

    #[test]
    fn test_balance_inquiry_never_mutates() {
        let mut engine = AtmEngine::new(Amount::new(100));
        let mut s = session("1", "1", 42, 7)
            .with_actions(vec![Action::balance_inquiry(), Action::balance_inquiry()]);
        assert_eq!(
            engine.process_session(&mut s),
            vec![
                Outcome::Balance(Amount::new(42)),
                Outcome::Balance(Amount::new(42))
            ]
        );
        assert_eq!(s.overdraft, Amount::new(7));
        assert_eq!(engine.cash_float(), Amount::new(100));
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(Outcome::Balance(Amount::new(-50)).to_string(), "-50");
        assert_eq!(Outcome::Rejected(ErrorCode::FundsErr).to_string(), "FUNDS_ERR");
    }

    #[test]
    fn test_run_writes_lines_and_summary() {
        let mut engine = AtmEngine::new(Amount::new(1000));
        let sessions = vec![
            session("1", "1", 500, 100).with_actions(vec![withdraw(550), Action::balance_inquiry()]),
            session("1", "2", 500, 100).with_actions(vec![withdraw(10)]),
        ];

        let mut output = Vec::new();
        let summary = engine.run(sessions, &mut output).unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), "-50\n-50\nACCOUNT_ERR\n");
        assert_eq!(
            summary,
            RunSummary {
                sessions: 2,
                outcomes: 3,
                rejected_sessions: 1,
                cash_float: Amount::new(450),
            }
        );
    }

    #[test]
    fn test_emit_error_stops_processing() {
        let mut engine = AtmEngine::new(Amount::new(1000));
        let mut s = session("1", "1", 500, 0).with_actions(vec![withdraw(10), withdraw(20)]);

        let mut seen = 0;
        let result = engine.process_session_with(&mut s, |_| {
            seen += 1;
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        });

        assert!(result.is_err());
        assert_eq!(seen, 1);
        assert_eq!(engine.cash_float(), Amount::new(990));
        assert_eq!(s.actions, vec![withdraw(10), withdraw(20)]);
    }

    #[test]
    fn test_actions_kept_after_processing() {
        let mut engine = AtmEngine::new(Amount::new(1000));
        let actions = vec![withdraw(100), Action::balance_inquiry()];
        let mut s = session("1", "1", 500, 0).with_actions(actions.clone());

        assert_eq!(
            engine.process_session(&mut s),
            vec![
                Outcome::Balance(Amount::new(400)),
                Outcome::Balance(Amount::new(400))
            ]
        );
        assert_eq!(s.actions, actions);
        assert_eq!(s.to_string(), "account 123456 balance 400 overdraft 0 actions [W 100, B]");
    }
}
