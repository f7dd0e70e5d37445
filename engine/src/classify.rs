//! Token classification.
//!
//! Sorts the tokens of a line into options, flags and positional values for a
//! resolved command. Problems with individual tokens are recorded and
//! scanning carries on, so a user sees every malformed token at once.

use shellkit_core::CommandSchema;

use crate::error::{TokenError, TokenizeError};
use crate::tokenizer::{Token, TokenKind, Tokenizer};

/// Supplied option values in first-appearance order.
///
/// Supplying the same option twice keeps the later value at the position of
/// the first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionValues {
    entries: Vec<(String, String)>,
}

impl OptionValues {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`, replacing any earlier value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(name, value)` pairs in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Option names in first-appearance order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }
}

/// One classified line for a resolved command.
#[derive(Debug, Clone)]
pub struct ParsedInvocation<'s> {
    /// The command the line resolved to.
    pub schema: &'s CommandSchema,
    /// `--name=value` options, quote-stripped.
    pub options: OptionValues,
    /// Requested flag letters in order of appearance, duplicates included.
    pub flags: Vec<char>,
    /// Positional values, quote-stripped.
    pub positionals: Vec<String>,
    /// Token-level problems.
    pub errors: Vec<TokenError>,
}

impl<'s> ParsedInvocation<'s> {
    /// Creates an empty invocation for `schema`.
    pub fn new(schema: &'s CommandSchema) -> Self {
        Self {
            schema,
            options: OptionValues::new(),
            flags: Vec::new(),
            positionals: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Tokenizes and classifies the argument part of a line.
    ///
    /// Only unbalanced quoting fails outright; every other problem ends up in
    /// [`errors`](Self::errors).
    pub fn parse(schema: &'s CommandSchema, args: &str) -> Result<Self, TokenizeError> {
        let mut parsed = Self::new(schema);
        for token in Tokenizer::new(args)? {
            parsed.push(token);
        }
        Ok(parsed)
    }

    /// Classifies one token. Empty tokens are ignored.
    pub fn push(&mut self, token: Token<'_>) {
        if token.is_empty() {
            return;
        }
        let text = token.text;

        match token.kind() {
            TokenKind::Option => match text.find('=') {
                Some(eq) => {
                    let value = self.clean_value(&text[eq + 1..]);
                    self.options.insert(&text[2..eq], value);
                }
                None => self
                    .errors
                    .push(TokenError::MalformedOption(text.to_string())),
            },
            TokenKind::FlagGroup if text.len() == 1 => self
                .errors
                .push(TokenError::InvalidFlagToken(text.to_string())),
            TokenKind::FlagGroup => self.flags.extend(text.chars().skip(1)),
            TokenKind::Positional => {
                let value = self.clean_value(text);
                self.positionals.push(value);
            }
        }
    }

    /// Returns `true` when no token-level problem was found.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn clean_value(&mut self, raw: &str) -> String {
        match strip_quotes(raw) {
            Ok(value) => value.to_string(),
            Err(err) => {
                self.errors.push(err);
                raw.to_string()
            }
        }
    }
}

/// Removes the quotes around a quoted value.
///
/// Unquoted values pass through. A value that opens with `"` must close with
/// an unescaped `"`; the interior is returned untouched, so `\"` inside stays
/// a backslash followed by a quote.
///
/// ```
/// use shellkit_engine::classify::strip_quotes;
///
/// assert_eq!(strip_quotes("plain").unwrap(), "plain");
/// assert_eq!(strip_quotes(r#""a b""#).unwrap(), "a b");
/// assert_eq!(strip_quotes(r#""a\"b""#).unwrap(), r#"a\"b"#);
/// assert!(strip_quotes(r#""open"#).is_err());
/// assert!(strip_quotes(r#""ends\""#).is_err());
/// ```
pub fn strip_quotes(value: &str) -> Result<&str, TokenError> {
    if !value.starts_with('"') {
        return Ok(value);
    }
    if value.ends_with("\\\"") {
        return Err(TokenError::EscapedQuoteAtEnd(value.to_string()));
    }
    if value.len() < 2 || !value.ends_with('"') {
        return Err(TokenError::UnterminatedQuotedValue(value.to_string()));
    }
    Ok(&value[1..value.len() - 1])
}

/// Splits a line into the command name and the trimmed remainder.
///
/// ```
/// use shellkit_engine::classify::split_command;
///
/// assert_eq!(split_command("  list  -l  dir "), ("list", "-l  dir"));
/// assert_eq!(split_command("list"), ("list", ""));
/// ```
pub fn split_command(line: &str) -> (&str, &str) {
    let line = line.trim();
    match line.split_once(' ') {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    }
}

#[cfg(test)]
mod tests {
    use shellkit_core::CommandSchema;

    use super::*;

    fn parse(args: &str) -> ParsedInvocation<'static> {
        static SCHEMA: std::sync::LazyLock<CommandSchema> =
            std::sync::LazyLock::new(|| CommandSchema::new("cmd"));
        ParsedInvocation::parse(&SCHEMA, args).unwrap()
    }

    #[test]
    fn test_options_flags_and_positionals() {
        let parsed = parse(r#"-t --optA=opt1 --optB="two words" arg1 "arg 2""#);

        assert!(parsed.is_valid());
        assert_eq!(parsed.flags, vec!['t']);
        assert_eq!(parsed.options.get("optA"), Some("opt1"));
        assert_eq!(parsed.options.get("optB"), Some("two words"));
        assert_eq!(parsed.positionals, vec!["arg1", "arg 2"]);
    }

    #[test]
    fn test_later_option_wins_but_keeps_position() {
        let parsed = parse("--a=1 --b=2 --a=3");

        assert_eq!(parsed.options.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(parsed.options.get("a"), Some("3"));
    }

    #[test]
    fn test_option_value_may_contain_equals() {
        let parsed = parse("--expr=a=b");

        assert_eq!(parsed.options.get("expr"), Some("a=b"));
    }

    #[test]
    fn test_option_without_equals_is_recorded_and_scanning_continues() {
        let parsed = parse("--verbose pos -x");

        assert_eq!(
            parsed.errors,
            vec![TokenError::MalformedOption("--verbose".into())]
        );
        assert!(parsed.options.is_empty());
        assert_eq!(parsed.positionals, vec!["pos"]);
        assert_eq!(parsed.flags, vec!['x']);
    }

    #[test]
    fn test_lone_dash_is_invalid() {
        let parsed = parse("- -a");

        assert_eq!(parsed.errors, vec![TokenError::InvalidFlagToken("-".into())]);
        assert_eq!(parsed.flags, vec!['a']);
    }

    #[test]
    fn test_flag_groups_keep_order_and_duplicates() {
        let parsed = parse("-cz -tvba -t");

        assert_eq!(parsed.flags, vec!['c', 'z', 't', 'v', 'b', 'a', 't']);
    }

    #[test]
    fn test_quoted_positional_is_not_an_option() {
        let parsed = parse(r#""quoted =opt -value""#);

        assert!(parsed.options.is_empty());
        assert!(parsed.flags.is_empty());
        assert_eq!(parsed.positionals, vec!["quoted =opt -value"]);
    }

    #[test]
    fn test_escaped_quote_is_preserved_inside_value() {
        let parsed = parse(r#"--opa="abc-\"xyz""#);

        assert_eq!(parsed.options.get("opa"), Some(r#"abc-\"xyz"#));
    }

    #[test]
    fn test_single_quotes_are_not_special() {
        let parsed = parse("--opb='ab'cd'");

        assert_eq!(parsed.options.get("opb"), Some("'ab'cd'"));
    }

    #[test]
    fn test_bad_quoted_values_accumulate() {
        let parsed = parse(r#""a b"c "x"\" ok"#);

        assert_eq!(
            parsed.errors,
            vec![
                TokenError::UnterminatedQuotedValue(r#""a b"c"#.into()),
                TokenError::EscapedQuoteAtEnd(r#""x"\""#.into()),
            ]
        );
        assert_eq!(parsed.positionals.len(), 3);
    }

    #[test]
    fn test_unbalanced_line_fails() {
        let schema = CommandSchema::new("cmd");
        assert!(ParsedInvocation::parse(&schema, r#"--a="x"#).is_err());
    }

    #[test]
    fn test_split_command_trims() {
        assert_eq!(split_command("   "), ("", ""));
        assert_eq!(split_command("cmd   a b"), ("cmd", "a b"));
    }
}
