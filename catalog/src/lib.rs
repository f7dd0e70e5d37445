//! Declarative schema catalogs for shellkit.
//!
//! Loads [`SchemaPackage`](shellkit_core::SchemaPackage)s from JSON or YAML
//! files and directories, validates them, and reads the YAML shell
//! configuration that names those sources.
//!
//! # Quick start
//!
//! ```no_run
//! use shellkit_catalog::{Catalog, ShellConfig};
//!
//! // A single package file
//! let catalog = Catalog::from_path("commands.yaml").unwrap();
//! if let Some(schema) = catalog.get("list") {
//!     println!("list takes {} arguments", schema.arguments.len());
//! }
//!
//! // Everything a configuration file points at
//! let config = ShellConfig::load("shell.yaml").unwrap();
//! let catalog = config.catalog().unwrap();
//! println!("{} commands", catalog.len());
//! ```

mod config;
mod error;
mod loader;

pub use config::ShellConfig;
pub use error::{CatalogError, Result};
pub use loader::{BuildMode, Catalog, CatalogBuilder, CatalogSource, SchemaFormat};
