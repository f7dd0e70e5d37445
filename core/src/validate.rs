//! Registration-time schema and package validation.
//!
//! Every schema is checked once, when it is registered or loaded, so the
//! parsing engine can rely on well-formed names and unambiguous parameter
//! lists at call time.
//!
//! # Examples
//!
//! ```
//! use shellkit_core::*;
//!
//! let schema = CommandSchema::new("list").with_flag(FlagSpec::new('l'));
//! assert!(validate_schema(&schema).is_empty());
//!
//! // Invalid: command names are limited to ten characters
//! let bad = CommandSchema::new("averylongname");
//! assert!(!validate_schema(&bad).is_empty());
//! ```

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::{CommandSchema, MAX_COMMAND_NAME_LEN, ParamKey, SchemaPackage, ValueType};

static COMMAND_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("static regex must compile"));
static OPTION_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]+$").expect("static regex must compile"));
static ARGUMENT_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("static regex must compile"));

/// Schema/package validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Package version string is empty.
    #[error("package version cannot be empty")]
    EmptyPackageVersion,
    /// Command name is empty or whitespace-only.
    #[error("command name cannot be empty")]
    EmptyCommandName,
    /// Command name exceeds [`MAX_COMMAND_NAME_LEN`].
    #[error("command name cannot be more than 10 characters: {0}")]
    CommandNameTooLong(String),
    /// Command name contains whitespace or punctuation.
    #[error("invalid command name: {0}")]
    InvalidCommandName(String),
    /// Two commands share a name (compared case-insensitively).
    #[error("command already exists, please specify a different name: {0}")]
    DuplicateCommand(String),
    /// Option name is not a sequence of ASCII letters.
    #[error("the name of an option should only be a sequence of letters: {0}")]
    InvalidOptionName(String),
    /// Argument name is not an identifier.
    #[error("invalid argument name: {0}")]
    InvalidArgumentName(String),
    /// Flag character is not a letter.
    #[error("flag name has to be a letter: {0}")]
    InvalidFlagName(char),
    /// Option declared twice in the same command.
    #[error("option defined more than once: {0}")]
    DuplicateOption(String),
    /// Flag declared twice in the same command.
    #[error("flag defined more than once: {0}")]
    DuplicateFlag(char),
    /// Argument declared twice in the same command.
    #[error("argument defined more than once: {0}")]
    DuplicateArgument(String),
    /// An allowed value of the named option is empty.
    #[error("option {0} lists an empty allowed value")]
    EmptyAllowedValue(String),
    /// An allowed value does not spell a value of the option's type.
    #[error("option {option} lists allowed value {value}, which is not a valid {value_type}")]
    AllowedValueType {
        option: String,
        value: String,
        value_type: ValueType,
    },
    /// `parameters` names something the schema does not declare.
    #[error("parameter is not declared by the command: {0}")]
    UnknownParameter(ParamKey),
    /// `parameters` lists the same key twice.
    #[error("parameter listed more than once: {0}")]
    DuplicateParameter(ParamKey),
    /// `parameters` omits a declared option, flag or argument.
    #[error("parameter missing from the parameter order: {0}")]
    MissingParameter(ParamKey),
}

/// Validates a full schema package.
///
/// Checks for an empty version string, duplicate command names, and
/// validates each schema individually. Stops at the first problem.
///
/// # Examples
///
/// ```
/// use shellkit_core::*;
///
/// let mut package = SchemaPackage::new("1.0.0");
/// package.schemas.push(CommandSchema::new("git"));
/// assert!(validate_package(&package).is_empty());
///
/// // Names are case-insensitive, so this is a duplicate
/// package.schemas.push(CommandSchema::new("GIT"));
/// let errors = validate_package(&package);
/// assert!(errors.iter().any(|e| matches!(e, ValidationError::DuplicateCommand(_))));
/// ```
pub fn validate_package(package: &SchemaPackage) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if package.version.trim().is_empty() {
        errors.push(ValidationError::EmptyPackageVersion);
        return errors;
    }

    let mut seen_commands: HashSet<String> = HashSet::new();
    for schema in &package.schemas {
        if !seen_commands.insert(schema.name.to_lowercase()) {
            errors.push(ValidationError::DuplicateCommand(schema.name.clone()));
            return errors;
        }
        errors.extend(validate_schema(schema));
        if !errors.is_empty() {
            return errors;
        }
    }

    errors
}

/// Validates a command schema.
///
/// Checks the command name, option/flag/argument names and uniqueness,
/// allowed value sets and the declared parameter order.
///
/// # Examples
///
/// ```
/// use shellkit_core::*;
///
/// let schema = CommandSchema::new("show")
///     .with_option(OptionSpec::new("format", ValueType::Text))
///     .with_argument(ArgumentSpec::required("arg1", ValueType::I32));
/// assert!(validate_schema(&schema).is_empty());
///
/// let schema = CommandSchema::new("show").with_flag(FlagSpec::new('1'));
/// assert_eq!(validate_schema(&schema), vec![ValidationError::InvalidFlagName('1')]);
/// ```
pub fn validate_schema(schema: &CommandSchema) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Err(err) = validate_command_name(&schema.name) {
        errors.push(err);
        return errors;
    }

    let mut declared: HashSet<ParamKey> = HashSet::new();

    for option in &schema.options {
        if !OPTION_NAME_RE.is_match(&option.name) {
            errors.push(ValidationError::InvalidOptionName(option.name.clone()));
            return errors;
        }
        if !declared.insert(ParamKey::Option(option.name.clone())) {
            errors.push(ValidationError::DuplicateOption(option.name.clone()));
            return errors;
        }
        if option.allowed_values.iter().any(|v| v.is_empty()) {
            errors.push(ValidationError::EmptyAllowedValue(option.name.clone()));
            return errors;
        }
        // The first allowed value is bound as the default, so each must coerce.
        if let Some(value) = option.allowed_values.iter().find(|v| !option.value_type.accepts(v)) {
            errors.push(ValidationError::AllowedValueType {
                option: option.name.clone(),
                value: value.clone(),
                value_type: option.value_type,
            });
            return errors;
        }
    }

    for flag in &schema.flags {
        if !flag.name.is_alphabetic() {
            errors.push(ValidationError::InvalidFlagName(flag.name));
            return errors;
        }
        if !declared.insert(ParamKey::Flag(flag.name)) {
            errors.push(ValidationError::DuplicateFlag(flag.name));
            return errors;
        }
    }

    for argument in &schema.arguments {
        if !ARGUMENT_NAME_RE.is_match(&argument.name) {
            errors.push(ValidationError::InvalidArgumentName(argument.name.clone()));
            return errors;
        }
        if !declared.insert(ParamKey::Argument(argument.name.clone())) {
            errors.push(ValidationError::DuplicateArgument(argument.name.clone()));
            return errors;
        }
    }

    errors.extend(validate_parameters(&schema.parameters, &declared));
    errors
}

/// Checks a command name on its own, as used for registry lookups.
pub fn validate_command_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyCommandName);
    }
    if name.chars().count() > MAX_COMMAND_NAME_LEN {
        return Err(ValidationError::CommandNameTooLong(name.to_string()));
    }
    if !COMMAND_NAME_RE.is_match(name) {
        return Err(ValidationError::InvalidCommandName(name.to_string()));
    }
    Ok(())
}

fn validate_parameters(
    parameters: &[ParamKey],
    declared: &HashSet<ParamKey>,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if parameters.is_empty() {
        return errors;
    }

    let mut seen: HashSet<&ParamKey> = HashSet::new();
    for key in parameters {
        if !declared.contains(key) {
            errors.push(ValidationError::UnknownParameter(key.clone()));
            return errors;
        }
        if !seen.insert(key) {
            errors.push(ValidationError::DuplicateParameter(key.clone()));
            return errors;
        }
    }

    // Report missing keys in a stable order.
    let mut missing: Vec<&ParamKey> = declared.iter().filter(|k| !seen.contains(k)).collect();
    missing.sort();
    if let Some(key) = missing.first() {
        errors.push(ValidationError::MissingParameter((*key).clone()));
    }

    errors
}
