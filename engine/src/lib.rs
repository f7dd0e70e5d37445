//! Parsing and dispatch engine for line-oriented shells.
//!
//! A line goes through a fixed pipeline:
//!
//! 1. **Resolution**: the first word names a command in the
//!    [`CommandRegistry`] (case-insensitive).
//! 2. **Tokenizing**: the rest of the line is split on spaces, keeping
//!    double-quoted regions whole ([`tokenizer`]).
//! 3. **Classification**: tokens become options, flags and positional values
//!    ([`classify`]).
//! 4. **Validation**: mandatory parameters, unknown names, allowed values and
//!    positional count are checked ([`bind::validate`]).
//! 5. **Coercion**: values are converted to their declared types
//!    ([`bind::coerce`]).
//! 6. **Dispatch**: the command's [`Handler`] runs.
//!
//! [`Shell::execute`] runs all of it and reports an [`Outcome`]. Failures never
//! panic; they come back as a [`Rejection`] carrying the user-facing messages.
//!
//! # Example
//!
//! ```
//! use shellkit_core::{CommandSchema, FlagSpec, OptionSpec, ValueType};
//! use shellkit_engine::{CommandRegistry, Handler, Outcome, Shell};
//!
//! let mut registry = CommandRegistry::new();
//! registry
//!     .register(
//!         CommandSchema::new("greet")
//!             .with_option(OptionSpec::new("name", ValueType::Text))
//!             .with_flag(FlagSpec::new('l')),
//!         Handler::typed(|args| {
//!             let name = args.option("name").map(ToString::to_string).unwrap_or_default();
//!             let text = format!("hello {name}");
//!             Ok(Some(if args.flag('l') { text.to_uppercase() } else { text }))
//!         }),
//!     )
//!     .unwrap();
//!
//! let shell = Shell::new(registry);
//! match shell.execute(r#"greet -l --name="big world""#) {
//!     Outcome::Completed(Some(text)) => assert_eq!(text, "HELLO BIG WORLD"),
//!     other => panic!("unexpected outcome: {other:?}"),
//! }
//!
//! let Outcome::Rejected(rejection) = shell.execute("greet -x") else { unreachable!() };
//! assert_eq!(rejection.messages(), vec!["Option Flags not recognized: [x]"]);
//! ```

pub mod bind;
pub mod classify;
mod error;
mod registry;
mod shell;
pub mod tokenizer;
mod value;

pub use bind::{Arguments, BoundCall, RawBindings};
pub use error::{BindError, HandlerError, RegistrationError, ShellError, TokenError, TokenizeError};
pub use registry::{CommandRegistry, Handler, HandlerResult, RegisteredCommand};
pub use shell::{Outcome, Rejection, Shell};
pub use value::Value;
