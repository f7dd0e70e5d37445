//! A small command set built on shellkit.
//!
//! [`demo_shell`] registers a handful of typed handlers; the `run_lines`
//! example feeds lines to it and prints the results.

use bigdecimal::BigDecimal;
use shellkit_core::{ArgumentSpec, CommandSchema, FlagSpec, OptionSpec, ValueType};
use shellkit_engine::{
    Arguments, CommandRegistry, Handler, HandlerError, Outcome, RegistrationError, Shell, Value,
};

/// Builds a shell with the demo commands.
pub fn demo_shell() -> Result<Shell, RegistrationError> {
    let mut registry = CommandRegistry::new();

    registry.register(
        CommandSchema::new("add")
            .with_description("Adds two decimal numbers")
            .with_argument(ArgumentSpec::required("a", ValueType::BigDecimal))
            .with_argument(ArgumentSpec::required("b", ValueType::BigDecimal)),
        Handler::typed(|args| {
            let sum = decimal(args, "a")? + decimal(args, "b")?;
            Ok(Some(sum.to_string()))
        }),
    )?;

    registry.register(
        CommandSchema::new("echo")
            .with_description("Prints its argument")
            .with_flag(FlagSpec::new('u').with_description("Upper case"))
            .with_argument(ArgumentSpec::optional("text", ValueType::Text)),
        Handler::typed(|args| {
            let text = args.argument("text").map(ToString::to_string).unwrap_or_default();
            Ok(Some(if args.flag('u') { text.to_uppercase() } else { text }))
        }),
    )?;

    registry.register(
        CommandSchema::new("repeat")
            .with_description("Prints a word several times")
            .with_option(OptionSpec::required("times", ValueType::I8))
            .with_option(OptionSpec::new("sep", ValueType::Text))
            .with_argument(ArgumentSpec::required("word", ValueType::Text)),
        Handler::typed(|args| {
            let times = args.option("times").and_then(Value::as_i64).unwrap_or(0).max(0);
            let sep = args.option("sep").and_then(Value::as_str).unwrap_or(" ");
            let word = args.argument("word").and_then(Value::as_str).unwrap_or_default();
            let words: Vec<&str> = (0..times).map(|_| word).collect();
            Ok(Some(words.join(sep)))
        }),
    )?;

    registry.register(
        CommandSchema::new("greet")
            .with_description("Greets someone")
            .with_option(
                OptionSpec::new("style", ValueType::Text).with_allowed_values(["plain", "loud"]),
            )
            .with_argument(ArgumentSpec::required("who", ValueType::Text)),
        Handler::raw(|bindings| {
            let who = bindings.argument("who").unwrap_or_default();
            let greeting = format!("hello, {who}");
            match bindings.option("style") {
                Some("loud") => Ok(Some(format!("{}!", greeting.to_uppercase()))),
                _ => Ok(Some(greeting)),
            }
        }),
    )?;

    registry.register(
        CommandSchema::new("noop").with_description("Does nothing"),
        Handler::typed(|_| Ok(None)),
    )?;

    let listing = listing(&registry);
    registry.register(
        CommandSchema::new("help").with_description("Lists commands"),
        Handler::typed(move |_| Ok(Some(listing.clone()))),
    )?;

    Ok(Shell::new(registry))
}

/// Renders an outcome the way an interactive shell prints it.
///
/// Returns `None` when there is nothing to print.
pub fn render(outcome: &Outcome<'_>) -> Option<String> {
    match outcome {
        Outcome::Blank | Outcome::Completed(None) => None,
        Outcome::Completed(Some(text)) => Some(text.clone()),
        Outcome::Rejected(rejection) => {
            let mut lines: Vec<String> = rejection
                .messages()
                .into_iter()
                .map(|m| format!("Error: {m}"))
                .collect();
            if let Some(schema) = rejection.command {
                lines.push(usage(schema));
            }
            Some(lines.join("\n"))
        }
        Outcome::Unhandled(call) => Some(format!("{}: no handler", call.schema.name)),
        Outcome::Failed { command, error } => Some(format!("Error: {command} failed: {error}")),
    }
}

/// One-line usage summary for a command.
pub fn usage(schema: &CommandSchema) -> String {
    let mut parts = vec![schema.name.clone()];
    for option in &schema.options {
        let part = format!("--{}=<{}>", option.name, option.value_type);
        parts.push(if option.mandatory { part } else { format!("[{part}]") });
    }
    if !schema.flags.is_empty() {
        let letters: String = schema.flags.iter().map(|f| f.name).collect();
        parts.push(format!("[-{letters}]"));
    }
    for argument in &schema.arguments {
        parts.push(if argument.mandatory {
            format!("<{}>", argument.name)
        } else {
            format!("[{}]", argument.name)
        });
    }
    format!("Usage: {}", parts.join(" "))
}

fn listing(registry: &CommandRegistry) -> String {
    registry
        .commands()
        .map(|c| {
            format!(
                "{:<10} {}",
                c.schema.name,
                c.schema.description.as_deref().unwrap_or_default()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn decimal(args: &Arguments, name: &str) -> Result<BigDecimal, HandlerError> {
    match args.argument(name) {
        Some(Value::BigDecimal(value)) => Ok(value.clone()),
        _ => Err(format!("missing decimal argument {name}").into()),
    }
}
