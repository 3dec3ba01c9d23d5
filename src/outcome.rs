use strum_macros::Display;

use crate::error::Error;
use crate::stats::Stats;

/// 1-based location of a syntax error in the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Derives the line and column of a byte offset into `text`
    ///
    /// # Examples
    ///
    /// ```
    /// use devutils::outcome::Position;
    ///
    /// let pos = Position::from_offset("ab\ncd", 4);
    /// assert_eq!((pos.line, pos.column), (2, 2));
    /// ```
    pub fn from_offset(text: &str, offset: usize) -> Self {
        let mut end = offset.min(text.len());
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        let before = &text[..end];
        let line = before.matches('\n').count() + 1;
        let column = before.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
        Position { line, column }
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    #[strum(serialize = "Invalid encoding")]
    InvalidEncoding,
    #[strum(serialize = "Syntax error")]
    SyntaxError,
    #[strum(serialize = "Invalid options")]
    InvalidOptions,
    #[strum(serialize = "Invalid input")]
    InvalidInput,
    #[strum(serialize = "Unknown operation")]
    UnknownOperation,
    #[strum(serialize = "Unknown error")]
    Unknown,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub kind: ErrorKind,
    pub message: String,
    pub position: Option<Position>,
}

impl Failure {
    pub fn new<M: Into<String>>(kind: ErrorKind, message: M) -> Self {
        Failure {
            kind,
            message: message.into(),
            position: None,
        }
    }
}

impl From<Error> for Failure {
    fn from(error: Error) -> Self {
        let message = error.to_string();
        match error {
            Error::InvalidEncoding(_) => Failure::new(ErrorKind::InvalidEncoding, message),
            Error::Syntax { position, .. } => Failure {
                kind: ErrorKind::SyntaxError,
                message,
                position,
            },
            Error::InvalidOption { .. } | Error::ConfigError(_) => {
                Failure::new(ErrorKind::InvalidOptions, message)
            }
            Error::InvalidInput(_) => Failure::new(ErrorKind::InvalidInput, message),
            Error::UnknownOperation(_) => Failure::new(ErrorKind::UnknownOperation, message),
            _ => Failure::new(ErrorKind::Unknown, message),
        }
    }
}

/// Outcome of a single engine invocation
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success { output: String, stats: Stats },
    Failure(Failure),
}

impl Outcome {
    pub fn empty() -> Self {
        Outcome::Success {
            output: String::new(),
            stats: Stats::default(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    pub fn output(&self) -> Option<&str> {
        match self {
            Outcome::Success { output, .. } => Some(output),
            Outcome::Failure(_) => None,
        }
    }

    pub fn stats(&self) -> Option<&Stats> {
        match self {
            Outcome::Success { stats, .. } => Some(stats),
            Outcome::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Outcome::Failure(failure) => Some(failure),
            Outcome::Success { .. } => None,
        }
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        self.failure().map(|f| f.kind)
    }
}
