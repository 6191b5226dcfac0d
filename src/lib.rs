//! # ATM Engine
//!
//! A batch processor that replays customer sessions against a single ATM:
//! each session's PIN is checked once, then its balance inquiries and
//! withdrawals are applied in order against the customer's balance,
//! overdraft, and the machine's cash float.
//!
//! ## Design Principles
//!
//! - **Closed action set**: an [`Action`] is a balance inquiry or a
//!   non-negative withdrawal, nothing else can be constructed
//! - **Run-scoped cash float**: owned by one [`AtmEngine`], never global
//! - **Deterministic output**: one line per outcome, in session and action order
//!
//! ## Example
//!
//! ```
//! use atm_engine::{parse_str, AtmEngine, ParseMode};
//!
//! let input = "1000\n\n123456 1234 1234\n500 100\nW 550\nB\n";
//! let parsed = parse_str(input, ParseMode::Lenient).unwrap();
//!
//! let mut engine = AtmEngine::new(parsed.cash_float);
//! let mut output = Vec::new();
//! engine.run(parsed.sessions, &mut output).unwrap();
//! assert_eq!(String::from_utf8(output).unwrap(), "-50\n-50\n");
//! ```

pub mod action;
pub mod amount;
pub mod config;
pub mod engine;
pub mod error;
pub mod parser;
pub mod session;

pub use action::{Action, ActionError, ActionKind};
pub use amount::Amount;
pub use config::{Config, InputSource};
pub use engine::{AtmEngine, Outcome, RunSummary};
pub use error::{EngineError, ErrorCode, ParseError, Result};
pub use parser::{parse_reader, parse_str, ParseMode, ParsedInput};
pub use session::Session;
