//! Shell configuration.
//!
//! A YAML file naming the shell and the schema sources it loads.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! name: demo
//! description: Demo shell
//! sources:
//!   - schemas/
//!   - extra.yaml
//! log_filter: info
//! ```

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::loader::{Catalog, CatalogBuilder};

/// Top-level shell configuration.
///
/// Relative `sources` are resolved against the directory of the file the
/// configuration was loaded from.
///
/// # Examples
///
/// ```
/// use shellkit_catalog::ShellConfig;
///
/// let config: ShellConfig = serde_yaml::from_str("version: '1.0'\nsources: [cmds.yaml]\n").unwrap();
/// assert_eq!(config.sources.len(), 1);
/// assert_eq!(config.log_filter, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Configuration format version (e.g., `"1.0"`).
    pub version: String,
    /// Shell name, shown in prompts and help.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Shell description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Schema files or directories, merged in order.
    #[serde(default)]
    pub sources: Vec<PathBuf>,
    /// `tracing` filter directive, e.g. `info` or `shellkit_engine=debug`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl ShellConfig {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..Default::default()
        }
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::CatalogError::IoError) if the file cannot
    /// be read, or [`YamlError`](crate::CatalogError::YamlError) if parsing
    /// fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let mut config: Self = serde_yaml::from_reader(reader)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Adds a schema source.
    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(path.into());
        self
    }

    /// Source paths with relative entries resolved.
    pub fn resolved_sources(&self) -> Vec<PathBuf> {
        self.sources
            .iter()
            .map(|source| match &self.base_dir {
                Some(base) if source.is_relative() => base.join(source),
                _ => source.clone(),
            })
            .collect()
    }

    /// Loads and merges every source.
    ///
    /// # Errors
    ///
    /// Returns [`NoSourcesAvailable`](crate::CatalogError::NoSourcesAvailable)
    /// when `sources` is empty, or the first loading error.
    pub fn catalog(&self) -> Result<Catalog> {
        self.resolved_sources()
            .into_iter()
            .fold(CatalogBuilder::new(), |builder, path| builder.source(path))
            .build()
    }
}
