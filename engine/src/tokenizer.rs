//! Quote-aware line tokenizer.
//!
//! Splits the argument part of a command line on spaces, treating a
//! double-quoted region as part of a single token. Quoted content is copied
//! verbatim, quotes included, so every token is a contiguous slice of the
//! input; quote stripping happens later, during classification.
//!
//! | Input | Tokens |
//! |-------|--------|
//! | `a b` | `a`, `b` |
//! | `a  b` | `a`, ``, `b` |
//! | `--opt="x y" z` | `--opt="x y"`, `z` |
//! | `"a \" b"` | `"a \" b"` |
//!
//! A `"` preceded by a backslash is not a quote. Lines whose quotes do not
//! pair up are rejected before any token is produced.

use crate::error::TokenizeError;

/// One token: a slice of the input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// Token text, quotes included.
    pub text: &'a str,
    /// Byte offset of the token in the input.
    pub offset: usize,
}

/// Syntactic kind of a token, decided by its prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `--name=value`.
    Option,
    /// `-abc`.
    FlagGroup,
    /// Anything else.
    Positional,
}

impl Token<'_> {
    /// Classifies the token by its leading dashes.
    pub fn kind(&self) -> TokenKind {
        if self.text.starts_with("--") {
            TokenKind::Option
        } else if self.text.starts_with('-') {
            TokenKind::FlagGroup
        } else {
            TokenKind::Positional
        }
    }

    /// Returns `true` for the empty tokens produced by repeated spaces.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Lazy iterator over the tokens of a line.
///
/// Construction checks quote balance; iteration cannot fail.
///
/// ```
/// use shellkit_engine::tokenizer::Tokenizer;
///
/// let tokens: Vec<&str> = Tokenizer::new(r#"-t --name="a b" c"#)
///     .unwrap()
///     .map(|t| t.text)
///     .collect();
/// assert_eq!(tokens, vec!["-t", r#"--name="a b""#, "c"]);
///
/// assert!(Tokenizer::new(r#"say "hello"#).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    /// Creates a tokenizer, rejecting lines with unbalanced quotes.
    pub fn new(input: &'a str) -> Result<Self, TokenizeError> {
        check_balanced(input)?;
        Ok(Self {
            input,
            pos: 0,
            finished: false,
        })
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let bytes = self.input.as_bytes();
        let start = self.pos;
        let mut i = start;

        while i < bytes.len() {
            if bytes[i] == b' ' {
                self.pos = i + 1;
                return Some(Token {
                    text: &self.input[start..i],
                    offset: start,
                });
            }
            if is_unescaped_quote(bytes, i) {
                i += 1;
                while i < bytes.len() && !is_unescaped_quote(bytes, i) {
                    i += 1;
                }
            }
            i = (i + 1).min(bytes.len());
        }

        self.finished = true;
        Some(Token {
            text: &self.input[start..],
            offset: start,
        })
    }
}

/// Collects the non-empty tokens of a line.
pub fn tokenize(input: &str) -> Result<Vec<Token<'_>>, TokenizeError> {
    Ok(Tokenizer::new(input)?.filter(|t| !t.is_empty()).collect())
}

fn is_unescaped_quote(bytes: &[u8], i: usize) -> bool {
    bytes[i] == b'"' && (i == 0 || bytes[i - 1] != b'\\')
}

fn check_balanced(input: &str) -> Result<(), TokenizeError> {
    let bytes = input.as_bytes();
    let mut open = false;
    let mut last_quote = 0;

    for i in 0..bytes.len() {
        if is_unescaped_quote(bytes, i) {
            open = !open;
            last_quote = i;
        }
    }

    if open {
        return Err(TokenizeError::UnbalancedQuoting {
            position: input[..last_quote].chars().count(),
        });
    }
    Ok(())
}
