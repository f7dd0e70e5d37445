//! Line processing and dispatch.

use shellkit_core::CommandSchema;
use tracing::{debug, warn};

use crate::bind::{self, BoundCall, RawBindings};
use crate::classify::ParsedInvocation;
use crate::error::{HandlerError, ShellError};
use crate::registry::{CommandRegistry, Handler, RegisteredCommand};

/// A line that failed before reaching a handler.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection<'s> {
    /// The command the line resolved to, if it got that far.
    pub command: Option<&'s CommandSchema>,
    /// Every problem found, in the order found.
    pub errors: Vec<ShellError>,
}

impl<'s> Rejection<'s> {
    fn new(command: Option<&'s CommandSchema>, errors: Vec<ShellError>) -> Self {
        Self { command, errors }
    }

    /// User-facing error messages.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

/// Result of executing one line.
#[derive(Debug)]
pub enum Outcome<'s> {
    /// The line was empty.
    Blank,
    /// The handler ran and returned this output.
    Completed(Option<String>),
    /// The line was rejected.
    Rejected(Rejection<'s>),
    /// The line bound to a command that has no handler.
    Unhandled(BoundCall<'s>),
    /// The handler returned an error.
    Failed { command: String, error: HandlerError },
}

/// Parses lines against a registry and dispatches them.
///
/// # Examples
///
/// ```
/// use shellkit_core::{ArgumentSpec, CommandSchema, ValueType};
/// use shellkit_engine::{CommandRegistry, Handler, Outcome, Shell};
///
/// let mut registry = CommandRegistry::new();
/// registry
///     .register(
///         CommandSchema::new("double").with_argument(ArgumentSpec::required("n", ValueType::I64)),
///         Handler::typed(|args| {
///             let n = args.argument("n").and_then(|v| v.as_i64()).unwrap_or_default();
///             Ok(Some((n * 2).to_string()))
///         }),
///     )
///     .unwrap();
///
/// let shell = Shell::new(registry);
/// assert!(matches!(shell.execute("double 21"), Outcome::Completed(Some(s)) if s == "42"));
/// assert!(matches!(shell.execute("double x"), Outcome::Rejected(_)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Shell {
    registry: CommandRegistry,
}

impl Shell {
    pub fn new(registry: CommandRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Processes one line through every stage and runs its handler.
    pub fn execute(&self, line: &str) -> Outcome<'_> {
        if line.trim().is_empty() {
            return Outcome::Blank;
        }

        let (command, bindings) = match self.validate(line) {
            Ok(found) => found,
            Err(rejection) => return Outcome::Rejected(rejection),
        };
        let schema = &command.schema;

        let result = match &command.handler {
            Some(Handler::Raw(handler)) => handler(&bindings),
            Some(Handler::Typed(handler)) => match bind::coerce(schema, &bindings) {
                Ok(arguments) => handler(&arguments),
                Err(errors) => return Outcome::Rejected(coercion_rejection(schema, errors)),
            },
            None => {
                return match bind::coerce(schema, &bindings) {
                    Ok(arguments) => {
                        debug!(command = %schema.name, "No handler registered");
                        Outcome::Unhandled(BoundCall { schema, arguments })
                    }
                    Err(errors) => Outcome::Rejected(coercion_rejection(schema, errors)),
                };
            }
        };

        match result {
            Ok(output) => {
                debug!(command = %schema.name, has_output = output.is_some(), "Dispatched");
                Outcome::Completed(output)
            }
            Err(error) => {
                warn!(command = %schema.name, error = %error, "Handler failed");
                Outcome::Failed {
                    command: schema.name.clone(),
                    error,
                }
            }
        }
    }

    /// Binds a line without dispatching it.
    ///
    /// A blank line is rejected as an unknown command.
    pub fn bind(&self, line: &str) -> Result<BoundCall<'_>, Rejection<'_>> {
        let (command, bindings) = self.validate(line)?;
        let schema = &command.schema;
        bind::coerce(schema, &bindings)
            .map(|arguments| BoundCall { schema, arguments })
            .map_err(|errors| coercion_rejection(schema, errors))
    }

    /// Resolution, tokenizing, classification and structural validation.
    fn validate(&self, line: &str) -> Result<(&RegisteredCommand, RawBindings), Rejection<'_>> {
        let (command, args) = self
            .registry
            .resolve(line)
            .map_err(|err| Rejection::new(None, vec![err]))?;
        let schema = &command.schema;
        let reject = |errors: Vec<ShellError>| Rejection::new(Some(schema), errors);

        let parsed =
            ParsedInvocation::parse(schema, args).map_err(|err| reject(vec![err.into()]))?;
        if !parsed.is_valid() {
            debug!(command = %schema.name, errors = parsed.errors.len(), "Malformed tokens");
            return Err(reject(parsed.errors.into_iter().map(Into::into).collect()));
        }

        let bindings = bind::validate(&parsed).map_err(|err| reject(vec![err.into()]))?;
        Ok((command, bindings))
    }
}

fn coercion_rejection(schema: &CommandSchema, errors: Vec<crate::error::BindError>) -> Rejection<'_> {
    Rejection::new(Some(schema), errors.into_iter().map(Into::into).collect())
}
