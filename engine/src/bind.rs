//! Validation and binding.
//!
//! Turns a classified line into handler parameters. [`validate`] runs the
//! structural checks and stops at the first failure, producing the raw
//! name-keyed bindings. [`coerce`] then converts every declared parameter to
//! its type, collecting all failures.

use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};
use shellkit_core::{CommandSchema, ParamKey, ValueType};
use tracing::debug;

use crate::classify::{OptionValues, ParsedInvocation};
use crate::error::BindError;
use crate::value::Value;

/// Uncoerced parameter values keyed by parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawBindings {
    values: HashMap<ParamKey, String>,
}

impl RawBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: ParamKey, value: impl Into<String>) {
        self.values.insert(key, value.into());
    }

    pub fn get(&self, key: &ParamKey) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn option(&self, name: &str) -> Option<&str> {
        self.get(&ParamKey::option(name))
    }

    pub fn argument(&self, name: &str) -> Option<&str> {
        self.get(&ParamKey::argument(name))
    }

    /// Whether the flag was requested.
    pub fn flag(&self, name: char) -> bool {
        self.values.contains_key(&ParamKey::Flag(name))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Entries sorted by key.
    pub fn sorted(&self) -> Vec<(&ParamKey, &str)> {
        let mut entries: Vec<_> = self.values.iter().map(|(k, v)| (k, v.as_str())).collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl Serialize for RawBindings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries = self.sorted();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (key, value) in entries {
            map.serialize_entry(&key.to_string(), value)?;
        }
        map.end()
    }
}

/// Coerced handler parameters in declared parameter order.
///
/// Parameters that were not supplied are `None`, except booleans and flags
/// which are `false`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    keys: Vec<ParamKey>,
    values: Vec<Option<Value>>,
}

impl Arguments {
    pub fn get(&self, key: &ParamKey) -> Option<&Value> {
        let index = self.keys.iter().position(|k| k == key)?;
        self.values[index].as_ref()
    }

    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.get(&ParamKey::argument(name))
    }

    pub fn option(&self, name: &str) -> Option<&Value> {
        self.get(&ParamKey::option(name))
    }

    /// Flag state; undeclared flags read as `false`.
    pub fn flag(&self, name: char) -> bool {
        self.get(&ParamKey::Flag(name))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Value at a position in the parameter order.
    pub fn at(&self, index: usize) -> Option<&Value> {
        self.values.get(index).and_then(Option::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ParamKey, Option<&Value>)> {
        self.keys.iter().zip(self.values.iter().map(Option::as_ref))
    }

    pub fn values(&self) -> &[Option<Value>] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Serialize for Arguments {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.keys.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(&key.to_string(), &value)?;
        }
        map.end()
    }
}

/// A line bound to a command, ready for its handler.
#[derive(Debug, Clone)]
pub struct BoundCall<'s> {
    pub schema: &'s CommandSchema,
    pub arguments: Arguments,
}

/// Runs the structural checks and assembles raw bindings.
///
/// Fails on the first problem found. Options carrying an allowed-values list
/// that were not supplied take the first allowed value.
pub fn validate(parsed: &ParsedInvocation<'_>) -> Result<RawBindings, BindError> {
    let schema = parsed.schema;

    let mandatory_args: Vec<String> = schema
        .mandatory_arguments()
        .map(|a| a.name.clone())
        .collect();
    if mandatory_args.len() > parsed.positionals.len() {
        debug!(command = %schema.name, stage = "mandatory_arguments", "Validation failed");
        return Err(BindError::MissingArguments(mandatory_args));
    }

    let mandatory_opts: Vec<String> = schema.mandatory_options().map(|o| o.name.clone()).collect();
    if mandatory_opts.iter().any(|name| !parsed.options.contains(name)) {
        debug!(command = %schema.name, stage = "mandatory_options", "Validation failed");
        return Err(BindError::MissingOptions(mandatory_opts));
    }

    // Only checked when more options were given than are mandatory.
    if parsed.options.len() > mandatory_opts.len() {
        let unknown: Vec<String> = parsed
            .options
            .names()
            .filter(|name| schema.find_option(name).is_none())
            .map(str::to_string)
            .collect();
        if !unknown.is_empty() {
            debug!(command = %schema.name, stage = "unknown_options", "Validation failed");
            return Err(BindError::UnknownOptions(unknown));
        }
    }

    let options = apply_allowed_values(schema, &parsed.options)?;

    let unknown_flags: Vec<char> = parsed
        .flags
        .iter()
        .copied()
        .filter(|c| schema.find_flag(*c).is_none())
        .collect();
    if !unknown_flags.is_empty() {
        debug!(command = %schema.name, stage = "unknown_flags", "Validation failed");
        return Err(BindError::UnknownFlags(unknown_flags));
    }

    let names = schema.binding_order();
    if parsed.positionals.len() > names.len() {
        debug!(command = %schema.name, stage = "positional_count", "Validation failed");
        return Err(BindError::ExtraArguments {
            found: parsed.positionals.len(),
            expected: names.len(),
        });
    }

    let mut bindings = RawBindings::new();
    for (name, value) in options.iter() {
        bindings.insert(ParamKey::option(name), value);
    }
    for (name, value) in names.iter().zip(&parsed.positionals) {
        bindings.insert(ParamKey::argument(*name), value.as_str());
    }
    // An option also fills an argument slot of the same name.
    for (name, value) in options.iter() {
        if schema.find_argument(name).is_some() {
            bindings.insert(ParamKey::argument(name), value);
        }
    }
    for flag in &parsed.flags {
        bindings.insert(ParamKey::Flag(*flag), "true");
    }

    debug!(command = %schema.name, bound = bindings.len(), "Validated line");
    Ok(bindings)
}

/// Converts raw bindings to typed values in the declared parameter order.
///
/// Every parameter is attempted; all failures are returned together.
pub fn coerce(schema: &CommandSchema, bindings: &RawBindings) -> Result<Arguments, Vec<BindError>> {
    let keys = schema.parameter_order();
    let mut values = Vec::with_capacity(keys.len());
    let mut errors = Vec::new();

    for key in &keys {
        let value_type = schema.value_type_of(key).unwrap_or_default();
        match bindings.get(key) {
            None if value_type == ValueType::Bool => values.push(Some(Value::Bool(false))),
            None => values.push(None),
            Some(raw) => match Value::parse(raw, value_type) {
                Some(value) => values.push(Some(value)),
                None => {
                    errors.push(BindError::TypeCoercion {
                        name: key.name(),
                        value: raw.to_string(),
                        expected: value_type,
                    });
                    values.push(None);
                }
            },
        }
    }

    if !errors.is_empty() {
        debug!(command = %schema.name, errors = errors.len(), "Coercion failed");
        return Err(errors);
    }
    Ok(Arguments { keys, values })
}

fn apply_allowed_values(
    schema: &CommandSchema,
    supplied: &OptionValues,
) -> Result<OptionValues, BindError> {
    let mut options = supplied.clone();
    for spec in &schema.options {
        if spec.allowed_values.is_empty() {
            continue;
        }
        match supplied.get(&spec.name) {
            Some(found) if !spec.allows(found) => {
                debug!(command = %schema.name, stage = "allowed_values", option = %spec.name, "Validation failed");
                return Err(BindError::DisallowedValue {
                    option: spec.name.clone(),
                    allowed: spec.allowed_values.clone(),
                    found: found.to_string(),
                });
            }
            Some(_) => {}
            None => {
                if let Some(default) = spec.default_value() {
                    options.insert(spec.name.as_str(), default);
                }
            }
        }
    }
    Ok(options)
}

#[cfg(test)]
mod tests {
    use shellkit_core::{ArgumentSpec, FlagSpec, OptionSpec};

    use super::*;

    fn run(schema: &CommandSchema, args: &str) -> Result<RawBindings, BindError> {
        let parsed = ParsedInvocation::parse(schema, args).unwrap();
        assert!(parsed.is_valid(), "token errors: {:?}", parsed.errors);
        validate(&parsed)
    }

    fn bind(schema: &CommandSchema, args: &str) -> Arguments {
        coerce(schema, &run(schema, args).unwrap()).unwrap()
    }

    #[test]
    fn test_missing_mandatory_arguments_lists_all() {
        let schema = CommandSchema::new("copy")
            .with_argument(ArgumentSpec::required("from", ValueType::Text))
            .with_argument(ArgumentSpec::required("to", ValueType::Text));

        assert_eq!(
            run(&schema, "a"),
            Err(BindError::MissingArguments(vec!["from".into(), "to".into()]))
        );
    }

    #[test]
    fn test_missing_mandatory_option() {
        let schema = CommandSchema::new("login")
            .with_option(OptionSpec::required("user", ValueType::Text))
            .with_option(OptionSpec::required("host", ValueType::Text));

        assert_eq!(
            run(&schema, "--user=me"),
            Err(BindError::MissingOptions(vec!["user".into(), "host".into()]))
        );
    }

    #[test]
    fn test_unknown_options_are_reported() {
        let schema = CommandSchema::new("cmd").with_option(OptionSpec::new("a", ValueType::Text));

        assert_eq!(
            run(&schema, "--a=1 --b=2 --c=3"),
            Err(BindError::UnknownOptions(vec!["b".into(), "c".into()]))
        );
    }

    #[test]
    fn test_mandatory_check_runs_before_unknown_check() {
        let schema = CommandSchema::new("cmd").with_option(OptionSpec::required("a", ValueType::Text));

        assert_eq!(
            run(&schema, "--b=2"),
            Err(BindError::MissingOptions(vec!["a".into()]))
        );
    }

    #[test]
    fn test_allowed_values_default_and_rejection() {
        let schema = CommandSchema::new("cmd")
            .with_option(OptionSpec::new("mode", ValueType::Text).with_allowed_values(["opt1", "opt2"]));

        let args = bind(&schema, "");
        assert_eq!(args.option("mode"), Some(&Value::Text("opt1".into())));

        let args = bind(&schema, "--mode=opt2");
        assert_eq!(args.option("mode"), Some(&Value::Text("opt2".into())));

        assert_eq!(
            run(&schema, "--mode=opt3"),
            Err(BindError::DisallowedValue {
                option: "mode".into(),
                allowed: vec!["opt1".into(), "opt2".into()],
                found: "opt3".into(),
            })
        );
    }

    #[test]
    fn test_unknown_flags_keep_request_order() {
        let schema = CommandSchema::new("cmd").with_flag(FlagSpec::new('t'));

        assert_eq!(
            run(&schema, "-cz -tba"),
            Err(BindError::UnknownFlags(vec!['c', 'z', 'b', 'a']))
        );
    }

    #[test]
    fn test_extra_positionals() {
        let schema = CommandSchema::new("cmd").with_argument(ArgumentSpec::optional("a", ValueType::Text));

        assert_eq!(
            run(&schema, "x y z"),
            Err(BindError::ExtraArguments { found: 3, expected: 1 })
        );
    }

    #[test]
    fn test_positionals_bind_mandatory_first() {
        let schema = CommandSchema::new("cmd")
            .with_argument(ArgumentSpec::optional("extra", ValueType::Text))
            .with_argument(ArgumentSpec::required("target", ValueType::Text));

        let bindings = run(&schema, "first second").unwrap();
        assert_eq!(bindings.argument("target"), Some("first"));
        assert_eq!(bindings.argument("extra"), Some("second"));
    }

    #[test]
    fn test_option_overrides_same_named_argument() {
        let schema = CommandSchema::new("cmd")
            .with_option(OptionSpec::new("name", ValueType::Text))
            .with_argument(ArgumentSpec::optional("name", ValueType::Text));

        let bindings = run(&schema, "--name=fromopt positional").unwrap();
        assert_eq!(bindings.argument("name"), Some("fromopt"));
        assert_eq!(bindings.option("name"), Some("fromopt"));
    }

    #[test]
    fn test_flags_default_to_false() {
        let schema = CommandSchema::new("cmd")
            .with_flag(FlagSpec::new('t'))
            .with_flag(FlagSpec::new('u'));

        let args = bind(&schema, "-t");
        assert!(args.flag('t'));
        assert!(!args.flag('u'));
        assert_eq!(args.get(&ParamKey::Flag('u')), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_absent_values_are_none_in_parameter_order() {
        let schema = CommandSchema::new("cmd")
            .with_argument(ArgumentSpec::optional("count", ValueType::I32))
            .with_option(OptionSpec::new("verbose", ValueType::Bool));

        let args = bind(&schema, "");
        assert_eq!(args.len(), 2);
        assert_eq!(args.at(0), None);
        assert_eq!(args.at(1), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_coercion_errors_accumulate() {
        let schema = CommandSchema::new("cmd")
            .with_option(OptionSpec::new("size", ValueType::I8))
            .with_argument(ArgumentSpec::required("n", ValueType::I32));

        let bindings = run(&schema, "--size=900 1.1").unwrap();
        let errors = coerce(&schema, &bindings).unwrap_err();
        assert_eq!(
            errors,
            vec![
                BindError::TypeCoercion {
                    name: "size".into(),
                    value: "900".into(),
                    expected: ValueType::I8,
                },
                BindError::TypeCoercion {
                    name: "n".into(),
                    value: "1.1".into(),
                    expected: ValueType::I32,
                },
            ]
        );
    }

    #[test]
    fn test_arguments_serialize_in_parameter_order() {
        let schema = CommandSchema::new("cmd")
            .with_option(OptionSpec::new("n", ValueType::I32))
            .with_flag(FlagSpec::new('v'))
            .with_argument(ArgumentSpec::optional("path", ValueType::Text));

        let args = bind(&schema, "--n=3 -v dir");
        assert_eq!(
            serde_json::to_string(&args).unwrap(),
            r#"{"--n":3,"-v":true,"path":"dir"}"#
        );
    }
}
