//! Schema type definitions for shell command registration.
//!
//! This module defines the data model a shell uses to describe the commands
//! it accepts. The types are plain data: they serialize with [`serde`] so a
//! command set can be declared in JSON or YAML, and they carry builder
//! methods so the same schema can be assembled in code.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Maximum length of a command name, in characters.
pub const MAX_COMMAND_NAME_LEN: usize = 10;

static INTEGER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?[0-9]+$").expect("static regex must compile"));
static DECIMAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?$")
        .expect("static regex must compile")
});
static FLOAT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(NaN|[+-]?Infinity|[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?)$")
        .expect("static regex must compile")
});

/// Target type a supplied value is coerced into before dispatch.
///
/// # Examples
///
/// ```
/// use shellkit_core::ValueType;
///
/// assert_eq!(ValueType::default(), ValueType::Text);
/// assert_eq!(ValueType::I32.type_name(), "i32");
/// assert_eq!(ValueType::BigDecimal.type_name(), "big_decimal");
/// assert!(ValueType::BigDecimal.is_numeric());
/// assert!(!ValueType::Bool.is_numeric());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// Free text, passed through unchanged (the default).
    #[default]
    Text,
    /// 8-bit signed integer.
    I8,
    /// 16-bit signed integer.
    I16,
    /// 32-bit signed integer.
    I32,
    /// 64-bit signed integer.
    I64,
    /// Arbitrary-precision integer.
    BigInteger,
    /// Single precision float.
    F32,
    /// Double precision float.
    F64,
    /// Arbitrary-precision decimal.
    BigDecimal,
    /// `true` / `false`.
    Bool,
}

impl ValueType {
    /// Name used in schema files and when reporting a value that failed to
    /// coerce.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::BigInteger => "big_integer",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::BigDecimal => "big_decimal",
            Self::Bool => "bool",
        }
    }

    /// Checks whether `raw` spells a value of this type.
    ///
    /// Integers are an optional sign and ASCII digits, and fixed-width
    /// integers must also fit their range. Decimals add an optional fraction
    /// and exponent. Floats additionally accept `NaN` and `Infinity` with that
    /// exact spelling. Digit separators are never accepted.
    ///
    /// ```
    /// use shellkit_core::ValueType;
    ///
    /// assert!(ValueType::I8.accepts("-128"));
    /// assert!(!ValueType::I8.accepts("128"));
    /// assert!(!ValueType::BigInteger.accepts("1_000"));
    /// assert!(ValueType::BigDecimal.accepts(".5e-3"));
    /// assert!(ValueType::F64.accepts("-Infinity"));
    /// assert!(!ValueType::F64.accepts("inf"));
    /// assert!(ValueType::Text.accepts(""));
    /// ```
    pub fn accepts(&self, raw: &str) -> bool {
        match self {
            Self::Text => true,
            Self::I8 => INTEGER_RE.is_match(raw) && raw.parse::<i8>().is_ok(),
            Self::I16 => INTEGER_RE.is_match(raw) && raw.parse::<i16>().is_ok(),
            Self::I32 => INTEGER_RE.is_match(raw) && raw.parse::<i32>().is_ok(),
            Self::I64 => INTEGER_RE.is_match(raw) && raw.parse::<i64>().is_ok(),
            Self::BigInteger => INTEGER_RE.is_match(raw),
            Self::F32 | Self::F64 => FLOAT_RE.is_match(raw),
            Self::BigDecimal => DECIMAL_RE.is_match(raw),
            Self::Bool => raw.eq_ignore_ascii_case("true") || raw.eq_ignore_ascii_case("false"),
        }
    }

    /// Returns `true` for integer and decimal types.
    pub fn is_numeric(&self) -> bool {
        !matches!(self, Self::Text | Self::Bool)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Identifies one handler parameter.
///
/// Options and positional arguments are keyed by name, flags by their
/// character, so a flag `-t` can never collide with an option or argument
/// called `t`.
///
/// # Examples
///
/// ```
/// use shellkit_core::ParamKey;
///
/// assert_eq!(ParamKey::option("format").to_string(), "--format");
/// assert_eq!(ParamKey::Flag('v').to_string(), "-v");
/// assert_eq!(ParamKey::argument("path").to_string(), "path");
/// assert_eq!(ParamKey::Flag('v').name(), "v");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKey {
    /// A positional argument.
    Argument(String),
    /// A `--name=value` option.
    Option(String),
    /// A single-letter flag.
    Flag(char),
}

impl ParamKey {
    /// Creates an argument key.
    pub fn argument(name: impl Into<String>) -> Self {
        Self::Argument(name.into())
    }

    /// Creates an option key.
    pub fn option(name: impl Into<String>) -> Self {
        Self::Option(name.into())
    }

    /// Bare parameter name, without any `-`/`--` prefix.
    pub fn name(&self) -> String {
        match self {
            Self::Argument(name) | Self::Option(name) => name.clone(),
            Self::Flag(c) => c.to_string(),
        }
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Argument(name) => f.write_str(name),
            Self::Option(name) => write!(f, "--{name}"),
            Self::Flag(c) => write!(f, "-{c}"),
        }
    }
}

/// Schema for a `--name=value` option.
///
/// When `allowed_values` is non-empty, a supplied value must be one of them
/// and an option that was not supplied at all binds to the first entry.
///
/// # Examples
///
/// ```
/// use shellkit_core::{OptionSpec, ValueType};
///
/// let format = OptionSpec::new("format", ValueType::Text)
///     .with_allowed_values(["json", "yaml"])
///     .with_description("Output format");
/// assert_eq!(format.default_value(), Some("json"));
/// assert!(format.allows("yaml"));
/// assert!(!format.allows("toml"));
///
/// let name = OptionSpec::required("name", ValueType::Text);
/// assert!(name.mandatory);
/// assert_eq!(name.default_value(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSpec {
    /// Option name, without the leading `--`.
    pub name: String,
    /// Short description for help output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Must the option be supplied?
    #[serde(default)]
    pub mandatory: bool,
    /// Type the value is coerced into.
    #[serde(default)]
    pub value_type: ValueType,
    /// Accepted values; the first one doubles as the default.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_values: Vec<String>,
}

impl OptionSpec {
    /// Creates an optional option.
    pub fn new(name: &str, value_type: ValueType) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            mandatory: false,
            value_type,
            allowed_values: Vec::new(),
        }
    }

    /// Creates a mandatory option.
    pub fn required(name: &str, value_type: ValueType) -> Self {
        Self {
            mandatory: true,
            ..Self::new(name, value_type)
        }
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Restricts the option to a fixed set of values.
    pub fn with_allowed_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Value bound when the option is not supplied.
    pub fn default_value(&self) -> Option<&str> {
        self.allowed_values.first().map(String::as_str)
    }

    /// Checks `value` against the allowed set. An empty set allows anything.
    pub fn allows(&self, value: &str) -> bool {
        self.allowed_values.is_empty() || self.allowed_values.iter().any(|v| v == value)
    }
}

/// Schema for a single-letter boolean flag (`-v`).
///
/// # Examples
///
/// ```
/// use shellkit_core::FlagSpec;
///
/// let verbose = FlagSpec::new('v').with_description("Verbose output");
/// assert_eq!(verbose.name, 'v');
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagSpec {
    /// Flag letter.
    pub name: char,
    /// Short description for help output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FlagSpec {
    /// Creates a flag.
    pub fn new(name: char) -> Self {
        Self {
            name,
            description: None,
        }
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }
}

/// Schema for a positional argument.
///
/// # Examples
///
/// ```
/// use shellkit_core::{ArgumentSpec, ValueType};
///
/// let src = ArgumentSpec::required("source", ValueType::Text);
/// assert!(src.mandatory);
///
/// let count = ArgumentSpec::optional("count", ValueType::I32);
/// assert!(!count.mandatory);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentSpec {
    /// Argument name, used to address the bound value.
    pub name: String,
    /// Short description for help output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Must a value be supplied?
    #[serde(default)]
    pub mandatory: bool,
    /// Type the value is coerced into.
    #[serde(default)]
    pub value_type: ValueType,
}

impl ArgumentSpec {
    /// Creates a mandatory positional argument.
    pub fn required(name: &str, value_type: ValueType) -> Self {
        Self {
            name: name.to_string(),
            description: None,
            mandatory: true,
            value_type,
        }
    }

    /// Creates an optional positional argument.
    pub fn optional(name: &str, value_type: ValueType) -> Self {
        Self {
            mandatory: false,
            ..Self::required(name, value_type)
        }
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }
}

/// Complete schema for one shell command.
///
/// Besides the option, flag and argument lists, a schema records the order
/// in which its handler expects parameters. The builder methods append to
/// that order as they go, so the order in which a schema is assembled is the
/// order the handler receives values in. A schema deserialized without an
/// explicit `parameters` list uses options, then flags, then arguments.
///
/// # Examples
///
/// ```
/// use shellkit_core::*;
///
/// let copy = CommandSchema::new("copy")
///     .with_description("Copies a file")
///     .with_flag(FlagSpec::new('f'))
///     .with_argument(ArgumentSpec::required("from", ValueType::Text))
///     .with_argument(ArgumentSpec::optional("to", ValueType::Text))
///     .with_option(OptionSpec::new("mode", ValueType::Text).with_allowed_values(["fast", "safe"]));
///
/// assert!(copy.matches_name("COPY"));
/// assert_eq!(copy.binding_order(), vec!["from", "to"]);
/// assert_eq!(
///     copy.parameter_order(),
///     vec![
///         ParamKey::Flag('f'),
///         ParamKey::argument("from"),
///         ParamKey::argument("to"),
///         ParamKey::option("mode"),
///     ]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSchema {
    /// Command name, matched case-insensitively.
    pub name: String,
    /// Short description for help output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `--name=value` options.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionSpec>,
    /// Single-letter flags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<FlagSpec>,
    /// Positional arguments, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<ArgumentSpec>,
    /// Handler parameter order. Empty means the default order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParamKey>,
}

impl CommandSchema {
    /// Creates an empty schema with the given name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Adds an option and appends it to the parameter order.
    pub fn with_option(mut self, option: OptionSpec) -> Self {
        self.parameters.push(ParamKey::Option(option.name.clone()));
        self.options.push(option);
        self
    }

    /// Adds a flag and appends it to the parameter order.
    pub fn with_flag(mut self, flag: FlagSpec) -> Self {
        self.parameters.push(ParamKey::Flag(flag.name));
        self.flags.push(flag);
        self
    }

    /// Adds a positional argument and appends it to the parameter order.
    pub fn with_argument(mut self, argument: ArgumentSpec) -> Self {
        self.parameters.push(ParamKey::Argument(argument.name.clone()));
        self.arguments.push(argument);
        self
    }

    /// Case-insensitive name comparison.
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }

    /// Finds an option by exact name.
    pub fn find_option(&self, name: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|o| o.name == name)
    }

    /// Finds a flag by letter.
    pub fn find_flag(&self, name: char) -> Option<&FlagSpec> {
        self.flags.iter().find(|f| f.name == name)
    }

    /// Finds a positional argument by exact name.
    pub fn find_argument(&self, name: &str) -> Option<&ArgumentSpec> {
        self.arguments.iter().find(|a| a.name == name)
    }

    /// Options that must be supplied.
    pub fn mandatory_options(&self) -> impl Iterator<Item = &OptionSpec> {
        self.options.iter().filter(|o| o.mandatory)
    }

    /// Arguments that must be supplied, in declaration order.
    pub fn mandatory_arguments(&self) -> impl Iterator<Item = &ArgumentSpec> {
        self.arguments.iter().filter(|a| a.mandatory)
    }

    /// Names positional values are bound to, by index: mandatory arguments
    /// first, then optional ones, each group in declaration order.
    pub fn binding_order(&self) -> Vec<&str> {
        self.mandatory_arguments()
            .chain(self.arguments.iter().filter(|a| !a.mandatory))
            .map(|a| a.name.as_str())
            .collect()
    }

    /// Order in which the handler receives its parameters.
    pub fn parameter_order(&self) -> Vec<ParamKey> {
        if !self.parameters.is_empty() {
            return self.parameters.clone();
        }
        self.options
            .iter()
            .map(|o| ParamKey::Option(o.name.clone()))
            .chain(self.flags.iter().map(|f| ParamKey::Flag(f.name)))
            .chain(self.arguments.iter().map(|a| ParamKey::Argument(a.name.clone())))
            .collect()
    }

    /// Declared type of a parameter. Flags are always [`ValueType::Bool`].
    pub fn value_type_of(&self, key: &ParamKey) -> Option<ValueType> {
        match key {
            ParamKey::Option(name) => self.find_option(name).map(|o| o.value_type),
            ParamKey::Argument(name) => self.find_argument(name).map(|a| a.value_type),
            ParamKey::Flag(c) => self.find_flag(*c).map(|_| ValueType::Bool),
        }
    }
}
