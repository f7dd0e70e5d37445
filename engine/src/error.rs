//! Error types for line processing and command registration.
//!
//! The `Display` strings of the line-level errors are the messages shown to
//! the shell user, so they are kept stable.

use shellkit_core::{ValidationError, ValueType};
use thiserror::Error;

/// Error returned by a command handler.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Fatal tokenizer failure; the whole line is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    /// Double quotes do not pair up. `position` is the character index of the
    /// last quote counted.
    #[error("Invalid command. Couldn't identify sequence at position {position}")]
    UnbalancedQuoting { position: usize },
}

/// Problem with a single token. These accumulate; scanning continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// `--name` without `=value`.
    #[error("Option must contain a value followed by =, value entered: {0}")]
    MalformedOption(String),
    /// A lone `-`.
    #[error("Invalid token {0}")]
    InvalidFlagToken(String),
    /// Value opens with `"` but does not close with one.
    #[error("Argument values should end with double quote: {0}")]
    UnterminatedQuotedValue(String),
    /// Value opens with `"` and ends with `\"`.
    #[error("Argument values should not end with escaped quote: {0}")]
    EscapedQuoteAtEnd(String),
}

/// Validation and coercion failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// Fewer positional values than mandatory arguments.
    #[error("All mandatory arguments must be provided : {}", list(.0))]
    MissingArguments(Vec<String>),
    /// A mandatory option was not supplied.
    #[error("All mandatory options must be provided : {}", list(.0))]
    MissingOptions(Vec<String>),
    /// Supplied options the command does not declare.
    #[error("Options not recognized : {}", list(.0))]
    UnknownOptions(Vec<String>),
    /// Option value outside its allowed set.
    #[error("Option value should be one of : {}. Found : {found}", list(.allowed))]
    DisallowedValue {
        option: String,
        allowed: Vec<String>,
        found: String,
    },
    /// Requested flags the command does not declare.
    #[error("Option Flags not recognized: {}", list(.0))]
    UnknownFlags(Vec<char>),
    /// More positional values than declared arguments.
    #[error("Extra arguments entered. Found : {found}, Expecting : {expected}")]
    ExtraArguments { found: usize, expected: usize },
    /// A value that does not parse as the declared type.
    #[error(
        "Not a valid value entered for {name} : {value}. The value should be compatible with {expected}"
    )]
    TypeCoercion {
        name: String,
        value: String,
        expected: ValueType,
    },
}

/// Any error that rejects a line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellError {
    /// The first word of the line names no registered command.
    #[error("No command found : {0}")]
    UnknownCommand(String),
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    Bind(#[from] BindError),
}

/// Errors raised while registering commands.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// The schema failed validation.
    #[error("invalid schema for command {command}: {source}")]
    InvalidSchema {
        command: String,
        source: ValidationError,
    },
    /// A command with the same name (ignoring case) is already registered.
    #[error("command already exists, please specify a different name: {0}")]
    DuplicateCommand(String),
    /// Handler attached to a command that was never registered.
    #[error("no command registered with name: {0}")]
    UnknownCommand(String),
}

fn list<T: ToString>(items: &[T]) -> String {
    let items: Vec<String> = items.iter().map(ToString::to_string).collect();
    format!("[{}]", items.join(", "))
}
