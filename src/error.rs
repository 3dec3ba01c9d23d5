use std::io::Write;
use thiserror::Error;

use crate::outcome::Position;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("{0}")]
    InvalidEncoding(String),
    #[error("{message}")]
    Syntax {
        message: String,
        position: Option<Position>,
    },
    #[error("invalid option \"{key}\". Cause : {cause}")]
    InvalidOption { key: String, cause: String },
    #[error("{0}")]
    InvalidInput(String),
    #[error("unknown operation \"{0}\"")]
    UnknownOperation(String),
    #[error("unable to parse configuration. Cause : {0}")]
    ConfigError(String),
    #[error(transparent)]
    Io(#[from] ::std::io::Error),
    #[error("{0}")]
    Msg(String),
}

impl Error {
    /// Shortcut for an option failure
    pub fn option<K: Into<String>, C: Into<String>>(key: K, cause: C) -> Self {
        Error::InvalidOption {
            key: key.into(),
            cause: cause.into(),
        }
    }
}

impl From<&'static str> for Error {
    fn from(s: &'static str) -> Self {
        Error::Msg(s.to_owned())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Msg(s)
    }
}

impl Error {
    /// Syntax error of a JSON document, with the column counted in characters
    /// of `source` rather than in bytes
    pub fn json(error: serde_json::Error, source: &str) -> Self {
        let position = (error.line() > 0).then(|| {
            let line_text = source.split('\n').nth(error.line() - 1).unwrap_or("");
            Position {
                line: error.line(),
                column: Position::from_offset(line_text, error.column().saturating_sub(1)).column,
            }
        });
        Error::Syntax {
            message: error.to_string(),
            position,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        // serde_json reports 1-based lines and columns, 0 meaning "unknown"
        let position = (error.line() > 0).then(|| Position {
            line: error.line(),
            column: error.column().max(1),
        });
        Error::Syntax {
            message: error.to_string(),
            position,
        }
    }
}

impl From<base64::DecodeError> for Error {
    fn from(error: base64::DecodeError) -> Self {
        Error::InvalidEncoding(format!("Invalid Base64 string: {}", error))
    }
}

impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Error::ConfigError(error.message().to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

pub fn default_error_handler(error: &Error, output: &mut dyn Write) {
    use nu_ansi_term::Color::Red;

    match error {
        Error::InvalidOption { key: _, cause: _ } | Error::ConfigError(_) => {
            writeln!(output, "{}: {}", Red.paint("[options error]"), error).ok();
        }
        Error::Syntax {
            message: _,
            position: Some(pos),
        } => {
            writeln!(
                output,
                "{}: {} (line {}, column {})",
                Red.paint("[syntax error]"),
                error,
                pos.line,
                pos.column
            )
            .ok();
        }
        _ => {
            writeln!(output, "{}: {}", Red.paint("[devutils error]"), error).ok();
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_carries_position() {
        let err: Error = serde_json::from_str::<serde_json::Value>("{\n  \"a\": }")
            .unwrap_err()
            .into();
        match err {
            Error::Syntax {
                position: Some(pos),
                ..
            } => {
                assert_eq!(pos.line, 2);
                assert!(pos.column > 1);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_json_error_column_counts_characters() {
        let column_of = |source: &str| {
            let error = serde_json::from_str::<serde_json::Value>(source).unwrap_err();
            match Error::json(error, source) {
                Error::Syntax {
                    position: Some(pos),
                    ..
                } => (pos.line, pos.column),
                other => panic!("unexpected error: {:?}", other),
            }
        };
        assert_eq!(column_of(r#"{"e":1,}"#), (1, 8));
        assert_eq!(column_of(r#"{"é":1,}"#), (1, 8));
        assert_eq!(column_of("{\n\"日本\": 1,}"), (2, 8));
    }

    #[test]
    fn test_io_errors_convert() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "xclip").into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.to_string(), "xclip");
    }

    #[test]
    fn test_default_error_handler_tags_options_errors() {
        let mut out = Vec::new();
        default_error_handler(&Error::option("length", "must be a number"), &mut out);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("[options error]"));
        assert!(text.contains("length"));
    }
}
