//! Command registry.

use std::fmt;
use std::sync::Arc;

use shellkit_core::{CommandSchema, SchemaPackage, validate_schema};
use tracing::{debug, info};

use crate::bind::{Arguments, RawBindings};
use crate::classify::split_command;
use crate::error::{HandlerError, RegistrationError, ShellError};

/// What a handler returns: optional text output, or an error.
pub type HandlerResult = Result<Option<String>, HandlerError>;

type TypedFn = dyn Fn(&Arguments) -> HandlerResult + Send + Sync;
type RawFn = dyn Fn(&RawBindings) -> HandlerResult + Send + Sync;

/// Code run when a command line binds successfully.
#[derive(Clone)]
pub enum Handler {
    /// Receives coerced values in declared parameter order.
    Typed(Arc<TypedFn>),
    /// Receives the uncoerced name-keyed bindings. Type coercion is skipped.
    Raw(Arc<RawFn>),
}

impl Handler {
    pub fn typed<F>(f: F) -> Self
    where
        F: Fn(&Arguments) -> HandlerResult + Send + Sync + 'static,
    {
        Self::Typed(Arc::new(f))
    }

    pub fn raw<F>(f: F) -> Self
    where
        F: Fn(&RawBindings) -> HandlerResult + Send + Sync + 'static,
    {
        Self::Raw(Arc::new(f))
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Typed(_) => f.write_str("Handler::Typed"),
            Self::Raw(_) => f.write_str("Handler::Raw"),
        }
    }
}

/// A schema and the handler attached to it, if any.
#[derive(Debug, Clone)]
pub struct RegisteredCommand {
    pub schema: CommandSchema,
    pub handler: Option<Handler>,
}

/// Registered commands, in registration order.
///
/// Built once at startup; lookups take `&self`.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: Vec<RegisteredCommand>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a command with its handler.
    pub fn register(
        &mut self,
        schema: CommandSchema,
        handler: Handler,
    ) -> Result<(), RegistrationError> {
        self.insert(schema, Some(handler))
    }

    /// Registers a command without a handler. Lines for it bind but are not
    /// dispatched.
    pub fn register_schema(&mut self, schema: CommandSchema) -> Result<(), RegistrationError> {
        self.insert(schema, None)
    }

    /// Builds a registry holding every schema of a package.
    pub fn from_package(package: SchemaPackage) -> Result<Self, RegistrationError> {
        let mut registry = Self::new();
        for schema in package.schemas {
            registry.register_schema(schema)?;
        }
        info!(
            package = package.name.as_deref().unwrap_or("<unnamed>"),
            commands = registry.len(),
            "Registered schema package"
        );
        Ok(registry)
    }

    /// Attaches or replaces the handler of a registered command.
    pub fn set_handler(&mut self, name: &str, handler: Handler) -> Result<(), RegistrationError> {
        let command = self
            .commands
            .iter_mut()
            .find(|c| c.schema.matches_name(name))
            .ok_or_else(|| RegistrationError::UnknownCommand(name.to_string()))?;
        command.handler = Some(handler);
        Ok(())
    }

    /// Case-insensitive lookup.
    pub fn find(&self, name: &str) -> Option<&RegisteredCommand> {
        self.commands.iter().find(|c| c.schema.matches_name(name))
    }

    /// Splits a line at its first space and finds the named command.
    ///
    /// Returns the command and the trimmed remainder of the line.
    pub fn resolve<'a>(&self, line: &'a str) -> Result<(&RegisteredCommand, &'a str), ShellError> {
        let (name, rest) = split_command(line);
        match self.find(name) {
            Some(command) => {
                debug!(command = %command.schema.name, "Resolved command");
                Ok((command, rest))
            }
            None => Err(ShellError::UnknownCommand(name.to_string())),
        }
    }

    pub fn commands(&self) -> impl Iterator<Item = &RegisteredCommand> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn insert(
        &mut self,
        schema: CommandSchema,
        handler: Option<Handler>,
    ) -> Result<(), RegistrationError> {
        if let Some(source) = validate_schema(&schema).into_iter().next() {
            return Err(RegistrationError::InvalidSchema {
                command: schema.name,
                source,
            });
        }
        if self.find(&schema.name).is_some() {
            return Err(RegistrationError::DuplicateCommand(schema.name));
        }
        debug!(command = %schema.name, handler = handler.is_some(), "Registered command");
        self.commands.push(RegisteredCommand { schema, handler });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use shellkit_core::{ArgumentSpec, OptionSpec, ValidationError, ValueType};

    use super::*;

    fn noop() -> Handler {
        Handler::typed(|_| Ok(None))
    }

    #[test]
    fn test_register_and_find_ignores_case() {
        let mut registry = CommandRegistry::new();
        registry.register(CommandSchema::new("Greet"), noop()).unwrap();

        assert!(registry.find("greet").is_some());
        assert!(registry.find("GREET").is_some());
        assert!(registry.find("greeting").is_none());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut registry = CommandRegistry::new();
        registry.register_schema(CommandSchema::new("list")).unwrap();

        let err = registry.register_schema(CommandSchema::new("LIST")).unwrap_err();
        assert_eq!(err, RegistrationError::DuplicateCommand("LIST".into()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_invalid_schema_rejected() {
        let mut registry = CommandRegistry::new();

        let err = registry
            .register(CommandSchema::new("abcdefghijk"), noop())
            .unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::InvalidSchema {
                source: ValidationError::CommandNameTooLong(_),
                ..
            }
        ));

        let schema = CommandSchema::new("cmd").with_option(OptionSpec::new("bad-name", ValueType::Text));
        assert!(registry.register(schema, noop()).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_allowed_values_must_coerce_to_option_type() {
        let mut registry = CommandRegistry::new();
        let schema = CommandSchema::new("cmd").with_option(
            OptionSpec::new("n", ValueType::I32).with_allowed_values(["one", "two"]),
        );

        let err = registry.register(schema, noop()).unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::InvalidSchema {
                source: ValidationError::AllowedValueType { .. },
                ..
            }
        ));
        assert!(registry.find("cmd").is_none());
    }

    #[test]
    fn test_set_handler_on_schema_only_command() {
        let mut registry = CommandRegistry::new();
        registry
            .register_schema(CommandSchema::new("echo").with_argument(ArgumentSpec::optional("text", ValueType::Text)))
            .unwrap();
        assert!(registry.find("echo").unwrap().handler.is_none());

        registry.set_handler("ECHO", noop()).unwrap();
        assert!(registry.find("echo").unwrap().handler.is_some());

        let err = registry.set_handler("missing", noop()).unwrap_err();
        assert_eq!(err, RegistrationError::UnknownCommand("missing".into()));
    }

    #[test]
    fn test_from_package() {
        let package = SchemaPackage::new("1.0")
            .with_schema(CommandSchema::new("a"))
            .with_schema(CommandSchema::new("b"));

        let registry = CommandRegistry::from_package(package).unwrap();
        let names: Vec<&str> = registry.commands().map(|c| c.schema.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_resolve_splits_line() {
        let mut registry = CommandRegistry::new();
        registry.register_schema(CommandSchema::new("copy")).unwrap();

        let (command, rest) = registry.resolve("  COPY  a b ").unwrap();
        assert_eq!(command.schema.name, "copy");
        assert_eq!(rest, "a b");

        let err = registry.resolve("cmd x").unwrap_err();
        assert_eq!(err.to_string(), "No command found : cmd");
    }
}
