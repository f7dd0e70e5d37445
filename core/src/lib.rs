//! Core schema types for line-oriented shells.
//!
//! This crate defines the data a shell registers for each command it
//! accepts:
//!
//! - [`CommandSchema`]: a command with its options, flags, positional
//!   arguments and handler parameter order.
//! - [`OptionSpec`]: a `--name=value` option, optionally restricted to a set
//!   of allowed values whose first entry is the default.
//! - [`FlagSpec`]: a single-letter boolean flag, combinable as `-abc`.
//! - [`ArgumentSpec`]: a positional argument bound by declaration order.
//! - [`ParamKey`]: identifies one handler parameter.
//! - [`SchemaPackage`]: a versioned bundle of schemas for declarative
//!   configuration.
//!
//! Validation ([`validate_schema`], [`validate_package`]) runs at
//! registration time and rejects malformed names, duplicates and
//! inconsistent parameter orders.
//!
//! # Example
//!
//! ```
//! use shellkit_core::*;
//!
//! let schema = CommandSchema::new("greet")
//!     .with_description("Prints a greeting")
//!     .with_option(
//!         OptionSpec::new("style", ValueType::Text).with_allowed_values(["plain", "loud"]),
//!     )
//!     .with_flag(FlagSpec::new('n'))
//!     .with_argument(ArgumentSpec::required("who", ValueType::Text));
//!
//! assert_eq!(schema.find_option("style").unwrap().default_value(), Some("plain"));
//! assert!(validate_schema(&schema).is_empty());
//! ```

mod package;
mod types;
mod validate;

pub use package::SchemaPackage;
pub use types::*;
pub use validate::{ValidationError, validate_command_name, validate_package, validate_schema};
