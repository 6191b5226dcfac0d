//! Line-oriented input parser.
//!
//! Turns the text description of a run into the ATM's starting cash float
//! and the ordered list of customer sessions:
//!
//! ```text
//! 8000
//!
//! 12345678 1234 1234
//! 500 100
//! B
//! W 100
//!
//! 87654321 4321 4321
//! 100 0
//! W 10
//! ```
//!
//! Every line is trimmed first. Lines starting with `#` are comments and may
//! appear anywhere a structural line is expected.

use crate::action::Action;
use crate::amount::Amount;
use crate::error::{EngineError, ParseError, Result};
use crate::session::Session;
use log::{debug, warn};
use std::io::Read;
use std::str::FromStr;

/// How malformed sessions are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Log the malformed session at warn level, skip it and keep going.
    #[default]
    Lenient,

    /// Abort the whole run at the first malformed session.
    Strict,
}

/// The cash float and sessions read from one input source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInput {
    pub cash_float: Amount,

    /// Well-formed sessions, in input order.
    pub sessions: Vec<Session>,

    /// Malformed sessions that were skipped in lenient mode.
    pub skipped: Vec<ParseError>,
}

/// Walks the trimmed input lines, hiding comments from every caller.
struct LineCursor<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> LineCursor<'a> {
    fn new(input: &'a str) -> Self {
        LineCursor {
            lines: input.lines().map(str::trim).collect(),
            pos: 0,
        }
    }

    fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Current line, or `None` at end of input. Never a comment once the
    /// cursor has been moved with [`advance`](Self::advance).
    fn current(&self) -> Option<&'a str> {
        self.lines.get(self.pos).copied()
    }

    /// 1-based number of the current line.
    fn line_number(&self) -> usize {
        self.pos + 1
    }

    fn skip_comments(&mut self) {
        while self.current().is_some_and(|line| line.starts_with('#')) {
            self.pos += 1;
        }
    }

    /// Moves to the next structural line.
    fn advance(&mut self) {
        self.pos += 1;
        self.skip_comments();
    }

    fn skip_blank_lines(&mut self) {
        while self.current() == Some("") {
            self.advance();
        }
    }

    /// Skips the rest of a record up to its terminating blank line.
    fn skip_record(&mut self) {
        while self.current().is_some_and(|line| !line.is_empty()) {
            self.advance();
        }
    }
}

/// Parses a complete input text.
///
/// Empty input and a missing or invalid cash float abort the run. Malformed
/// sessions are skipped or fatal depending on `mode`.
pub fn parse_str(input: &str, mode: ParseMode) -> Result<ParsedInput> {
    let mut cursor = LineCursor::new(input);
    if cursor.is_empty() {
        return Err(EngineError::EmptyInput);
    }

    cursor.skip_comments();
    let cash_float = parse_cash_float(&cursor)?;
    debug!(
        "Line {}: ATM cash float is {}",
        cursor.line_number(),
        cash_float
    );
    cursor.advance();

    let mut parsed = ParsedInput {
        cash_float,
        sessions: Vec::new(),
        skipped: Vec::new(),
    };

    loop {
        cursor.skip_blank_lines();
        let Some(header) = cursor.current() else {
            break;
        };
        let start = cursor.line_number();

        match parse_session(header, &mut cursor) {
            Ok(session) => {
                debug!("Line {}: parsed session {}", start, session);
                parsed.sessions.push(session);
            }
            Err(e) if mode == ParseMode::Strict => return Err(e.into()),
            Err(e) => {
                warn!("Skipping malformed session starting at line {}: {}", start, e);
                cursor.skip_record();
                parsed.skipped.push(e);
            }
        }
    }

    Ok(parsed)
}

/// Reads the whole input source and parses it.
pub fn parse_reader<R: Read>(mut reader: R, mode: ParseMode) -> Result<ParsedInput> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    parse_str(&input, mode)
}

fn parse_cash_float(cursor: &LineCursor<'_>) -> std::result::Result<Amount, ParseError> {
    let line = cursor.current().ok_or(ParseError::MissingCashFloat)?;
    Amount::from_str(line).map_err(|_| ParseError::InvalidCashFloat {
        line: cursor.line_number(),
        value: line.to_string(),
    })
}

/// Parses one session starting at its account line.
///
/// On success the cursor is left on the blank line ending the session, or at
/// end of input.
fn parse_session(
    header: &str,
    cursor: &mut LineCursor<'_>,
) -> std::result::Result<Session, ParseError> {
    let tokens: Vec<&str> = header.split_whitespace().collect();
    let [account_number, expected_pin, entered_pin] = tokens[..] else {
        return Err(ParseError::AccountLine {
            line: cursor.line_number(),
            found: tokens.len(),
        });
    };
    cursor.advance();

    let funds = match cursor.current() {
        Some(line) if !line.is_empty() => line,
        _ => {
            return Err(ParseError::MissingFundsLine {
                line: cursor.line_number(),
                account: account_number.to_string(),
            })
        }
    };
    let tokens: Vec<&str> = funds.split_whitespace().collect();
    let [balance, overdraft] = tokens[..] else {
        return Err(ParseError::FundsLine {
            line: cursor.line_number(),
            found: tokens.len(),
        });
    };
    let balance = parse_number(balance, "balance", cursor.line_number())?;
    let overdraft = parse_number(overdraft, "overdraft", cursor.line_number())?;
    cursor.advance();

    let mut session = Session::new(
        account_number,
        expected_pin,
        entered_pin,
        balance,
        overdraft,
    );

    while let Some(line) = cursor.current() {
        if line.is_empty() {
            break;
        }
        let action = Action::from_str(line).map_err(|source| ParseError::Action {
            line: cursor.line_number(),
            source,
        })?;
        session.push_action(action);
        cursor.advance();
    }

    if session.actions.is_empty() {
        debug!("Session for account {} has no actions", account_number);
    }

    Ok(session)
}

fn parse_number(
    value: &str,
    field: &'static str,
    line: usize,
) -> std::result::Result<Amount, ParseError> {
    Amount::from_str(value).map_err(|_| ParseError::InvalidNumber {
        line,
        field,
        value: value.to_string(),
    })
}
