use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use shellkit_catalog::{Catalog, CatalogBuilder, ShellConfig};
use shellkit_engine::{CommandRegistry, Shell, tokenizer};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const PACKAGE_VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Parser)]
#[command(name = "shellkit")]
#[command(about = "Validate shell command schemas and bind command lines against them")]
#[command(version)]
struct Cli {
    /// Log filter used when RUST_LOG is unset (e.g. info, shellkit_engine=debug).
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate schema package files and directories.
    Validate(ValidateArgs),
    /// Merge schema sources into a single package file.
    Bundle(BundleArgs),
    /// Split a command line into tokens.
    Tokenize(TokenizeArgs),
    /// Bind a command line against a catalog and print the typed values.
    Bind(BindArgs),
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Package files (.json, .yaml, .yml) and/or schema directories.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct BundleArgs {
    /// Package files and/or schema directories.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Output package path; the extension selects JSON or YAML.
    #[arg(long)]
    output: PathBuf,
    /// Optional package name.
    #[arg(long)]
    name: Option<String>,
    /// Optional package description.
    #[arg(long)]
    description: Option<String>,
}

#[derive(Debug, Args)]
struct TokenizeArgs {
    /// The line to split.
    #[arg(allow_hyphen_values = true)]
    line: String,
}

#[derive(Debug, Args)]
struct CatalogArgs {
    /// Schema package files or directories, merged in order.
    #[arg(long = "schemas")]
    schemas: Vec<PathBuf>,
    /// Shell configuration file naming the schema sources.
    #[arg(long, conflicts_with = "schemas")]
    config: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct BindArgs {
    #[command(flatten)]
    catalog: CatalogArgs,
    /// The full command line, command name first.
    #[arg(allow_hyphen_values = true)]
    line: String,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&log_filter(&cli));

    let result = match cli.command {
        Command::Validate(args) => run_validate(args),
        Command::Bundle(args) => run_bundle(args),
        Command::Tokenize(args) => run_tokenize(args),
        Command::Bind(args) => run_bind(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// `--log-level`, else the configuration's `log_filter`, else the default.
fn log_filter(cli: &Cli) -> String {
    if let Some(level) = &cli.log_level {
        return level.clone();
    }
    if let Command::Bind(BindArgs {
        catalog: CatalogArgs {
            config: Some(path), ..
        },
        ..
    }) = &cli.command
    {
        if let Some(filter) = ShellConfig::load(path).ok().and_then(|c| c.log_filter) {
            return filter;
        }
    }
    DEFAULT_LOG_FILTER.to_string()
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let catalog = merge_sources(&args.inputs)?;
    println!(
        "Validated {} source(s) with {} command(s).",
        args.inputs.len(),
        catalog.len()
    );
    Ok(())
}

fn run_bundle(args: BundleArgs) -> Result<(), String> {
    let mut package = merge_sources(&args.inputs)?.into_package();
    package.version = PACKAGE_VERSION.to_string();
    package.name = args.name;
    package.description = args.description;
    let catalog = Catalog::from_package(package).map_err(|e| e.to_string())?;

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|err| {
                format!(
                    "Failed to create output directory '{}': {err}",
                    parent.display()
                )
            })?;
        }
    }
    catalog
        .save(&args.output)
        .map_err(|err| format!("Failed to write '{}': {err}", args.output.display()))?;

    println!(
        "Bundled {} schema(s) into '{}'.",
        catalog.len(),
        args.output.display()
    );
    Ok(())
}

fn run_tokenize(args: TokenizeArgs) -> Result<(), String> {
    let tokens = tokenizer::tokenize(&args.line).map_err(|e| e.to_string())?;
    let texts: Vec<&str> = tokens.iter().map(|t| t.text).collect();
    let raw = serde_json::to_string_pretty(&texts)
        .map_err(|err| format!("Failed to serialize tokens: {err}"))?;
    println!("{raw}");
    Ok(())
}

fn run_bind(args: BindArgs) -> Result<(), String> {
    let catalog = load_catalog(&args.catalog)?;
    let registry = CommandRegistry::from_package(catalog.into_package()).map_err(|e| e.to_string())?;
    debug!(commands = registry.len(), "Loaded command registry");
    let shell = Shell::new(registry);

    let call = match shell.bind(&args.line) {
        Ok(call) => call,
        Err(rejection) => {
            for message in rejection.messages() {
                eprintln!("Error: {message}");
            }
            return Err(format!("rejected with {} error(s)", rejection.errors.len()));
        }
    };

    let output = serde_json::json!({
        "command": call.schema.name,
        "arguments": call.arguments,
    });
    let raw = serde_json::to_string_pretty(&output)
        .map_err(|err| format!("Failed to serialize bound call: {err}"))?;
    println!("{raw}");
    Ok(())
}

fn load_catalog(args: &CatalogArgs) -> Result<Catalog, String> {
    match &args.config {
        Some(path) => ShellConfig::load(path)
            .and_then(|config| config.catalog())
            .map_err(|e| format!("{}: {e}", path.display())),
        None if args.schemas.is_empty() => {
            Err("either --schemas or --config is required".to_string())
        }
        None => merge_sources(&args.schemas),
    }
}

fn merge_sources(inputs: &[PathBuf]) -> Result<Catalog, String> {
    inputs
        .iter()
        .map(PathBuf::as_path)
        .fold(CatalogBuilder::new(), |builder, path: &Path| builder.source(path))
        .build()
        .map_err(|e| e.to_string())
}
