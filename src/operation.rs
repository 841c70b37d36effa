//! The operation vocabulary shared by workload generation and replay.
//!
//! Operations serialize to a one-per-line text format of whitespace
//! separated tokens: `read <i>`, `write <i> <v>`, `snapshot`.
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use thiserror::Error;

/// One operation against a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    /// Read a single field.
    Read { field: usize },
    /// Store a value into a single field.
    Write { field: usize, value: i64 },
    /// Take a consistent view of every field.
    Snapshot,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Read { field } => write!(f, "read {field}"),
            Operation::Write { field, value } => write!(f, "write {field} {value}"),
            Operation::Snapshot => write!(f, "snapshot"),
        }
    }
}

/// Error produced when a serialized operation line cannot be parsed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty operation line")]
    Empty,
    #[error("unknown command {0:?}")]
    UnknownCommand(String),
    #[error("missing {0} argument")]
    MissingArgument(&'static str),
    #[error("invalid {what} {token:?}")]
    InvalidInteger {
        what: &'static str,
        token: String,
        source: ParseIntError,
    },
}

fn integer<T>(token: Option<&str>, what: &'static str) -> Result<T, ParseError>
where
    T: FromStr<Err = ParseIntError>,
{
    let token = token.ok_or(ParseError::MissingArgument(what))?;
    token.parse().map_err(|source| ParseError::InvalidInteger {
        what,
        token: token.to_string(),
        source,
    })
}

impl FromStr for Operation {
    type Err = ParseError;

    /// Parses the line format emitted by [`Display`](fmt::Display).
    ///
    /// Tokens past a complete operation are ignored.
    fn from_str(line: &str) -> Result<Self, ParseError> {
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            None => Err(ParseError::Empty),
            Some("read") => Ok(Operation::Read {
                field: integer(tokens.next(), "field index")?,
            }),
            Some("write") => Ok(Operation::Write {
                field: integer(tokens.next(), "field index")?,
                value: integer(tokens.next(), "value")?,
            }),
            Some("snapshot") => Ok(Operation::Snapshot),
            Some(other) => Err(ParseError::UnknownCommand(other.to_string())),
        }
    }
}
