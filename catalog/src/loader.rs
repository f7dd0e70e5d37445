//! Schema catalog loading.
//!
//! A [`Catalog`] is a validated [`SchemaPackage`] read from disk. Sources are
//! either a package file (`.json`, `.yaml` or `.yml`) or a directory of
//! single-schema files in the same formats.
//!
//! ```no_run
//! use shellkit_catalog::Catalog;
//!
//! let catalog = Catalog::from_path("commands.yaml").unwrap();
//! println!("{} commands", catalog.len());
//!
//! // Merge several sources; duplicate command names are rejected
//! let catalog = Catalog::builder()
//!     .source("schemas/")
//!     .source("extra.json")
//!     .build()
//!     .unwrap();
//!
//! // Or take the first source that loads
//! let catalog = Catalog::builder()
//!     .first_available()
//!     .source("/etc/shell/commands.yaml")
//!     .source("commands.yaml")
//!     .build()
//!     .unwrap();
//! ```

use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use shellkit_core::{CommandSchema, SchemaPackage, validate_package};
use tracing::{debug, info, warn};

use crate::error::{CatalogError, Result};

/// Version given to packages assembled from a directory or a merge.
const ASSEMBLED_VERSION: &str = "1.0";

/// Describes where a [`Catalog`] was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// A single package file.
    File(PathBuf),
    /// A directory of single-schema files.
    Directory(PathBuf),
    /// Built in memory.
    Inline,
    /// Assembled by a [`CatalogBuilder`].
    Multiple(Vec<CatalogSource>),
}

/// Serialization format of a schema file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    Json,
    Yaml,
}

impl SchemaFormat {
    /// Detects the format from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Some(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Some(Self::Yaml)
            }
            _ => None,
        }
    }
}

/// A validated set of command schemas.
#[derive(Debug, Clone)]
pub struct Catalog {
    package: SchemaPackage,
    source: CatalogSource,
}

impl Catalog {
    /// Returns a new [`CatalogBuilder`].
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
    }

    /// Validates an in-memory package.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidSchema`] listing every validation
    /// problem.
    pub fn from_package(package: SchemaPackage) -> Result<Self> {
        Self::validated(package, CatalogSource::Inline)
    }

    /// Loads a file or a directory, whichever `path` is.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.is_dir() {
            Self::from_dir(path)
        } else {
            Self::from_file(path)
        }
    }

    /// Loads a [`SchemaPackage`] from a JSON or YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnsupportedFormat`] for unknown extensions,
    /// [`CatalogError::IoError`], [`CatalogError::JsonError`] or
    /// [`CatalogError::YamlError`] when reading fails, and
    /// [`CatalogError::InvalidSchema`] when validation fails.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let package: SchemaPackage = read_file(path)?;
        info!(path = %path.display(), schemas = package.schema_count(), "Loaded schema package");
        Self::validated(package, CatalogSource::File(path.to_path_buf()))
    }

    /// Loads every `*.json`, `*.yaml` and `*.yml` file in a directory as one
    /// [`CommandSchema`]. Other files are skipped.
    ///
    /// Files are read in name order, which fixes the command order.
    pub fn from_dir(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let mut files = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let file_path = entry?.path();
            if file_path.is_file() && SchemaFormat::from_path(&file_path).is_some() {
                files.push(file_path);
            } else {
                debug!(path = %file_path.display(), "Skipping non-schema entry");
            }
        }
        files.sort();

        let mut package = SchemaPackage::new(ASSEMBLED_VERSION);
        package.name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string);
        for file in &files {
            let schema: CommandSchema = read_file(file)?;
            package.schemas.push(schema);
        }

        info!(path = %path.display(), schemas = package.schema_count(), "Loaded schema directory");
        Self::validated(package, CatalogSource::Directory(path.to_path_buf()))
    }

    /// Finds a schema by case-insensitive name.
    pub fn get(&self, name: &str) -> Option<&CommandSchema> {
        self.package.find(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.package.schema_count()
    }

    pub fn is_empty(&self) -> bool {
        self.package.schemas.is_empty()
    }

    /// Command names in load order.
    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.package.schemas.iter().map(|s| s.name.as_str())
    }

    pub fn schemas(&self) -> &[CommandSchema] {
        &self.package.schemas
    }

    pub fn package(&self) -> &SchemaPackage {
        &self.package
    }

    pub fn into_package(self) -> SchemaPackage {
        self.package
    }

    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    /// Writes the catalog as a package file; the format follows the
    /// extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = SchemaFormat::from_path(path)
            .ok_or_else(|| CatalogError::UnsupportedFormat(path.display().to_string()))?;
        let writer = std::io::BufWriter::new(std::fs::File::create(path)?);
        match format {
            SchemaFormat::Json => serde_json::to_writer_pretty(writer, &self.package)?,
            SchemaFormat::Yaml => serde_yaml::to_writer(writer, &self.package)?,
        }
        Ok(())
    }

    fn validated(package: SchemaPackage, source: CatalogSource) -> Result<Self> {
        let errors = validate_package(&package);
        if !errors.is_empty() {
            let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
            return Err(CatalogError::InvalidSchema(messages.join("; ")));
        }
        Ok(Self { package, source })
    }
}

/// How a [`CatalogBuilder`] combines its sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildMode {
    /// Load every source and combine them.
    #[default]
    Merge,
    /// Use the first source that loads.
    FirstAvailable,
}

/// Builds a [`Catalog`] from several sources.
///
/// In [`BuildMode::Merge`] every source must load and command names must be
/// unique across all of them. In [`BuildMode::FirstAvailable`] sources are
/// tried in order and failures are skipped; if none loads,
/// [`CatalogError::NoSourcesAvailable`] is returned.
#[derive(Debug, Clone, Default)]
pub struct CatalogBuilder {
    sources: Vec<PathBuf>,
    mode: BuildMode,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file or directory source.
    pub fn source(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(path.into());
        self
    }

    /// Switches to first-available fallback.
    pub fn first_available(mut self) -> Self {
        self.mode = BuildMode::FirstAvailable;
        self
    }

    pub fn mode(&self) -> BuildMode {
        self.mode
    }

    pub fn build(self) -> Result<Catalog> {
        if self.sources.is_empty() {
            return Err(CatalogError::NoSourcesAvailable);
        }
        match self.mode {
            BuildMode::Merge => self.merge(),
            BuildMode::FirstAvailable => self.first(),
        }
    }

    fn merge(self) -> Result<Catalog> {
        let mut package = SchemaPackage::new(ASSEMBLED_VERSION);
        let mut loaded = Vec::new();

        for path in &self.sources {
            let catalog = Catalog::from_path(path)?;
            if package.name.is_none() {
                package.name = catalog.package.name.clone();
            }
            if package.description.is_none() {
                package.description = catalog.package.description.clone();
            }
            loaded.push(catalog.source.clone());
            package.schemas.extend(catalog.into_package().schemas);
        }

        Catalog::validated(package, CatalogSource::Multiple(loaded))
    }

    fn first(self) -> Result<Catalog> {
        for path in &self.sources {
            match Catalog::from_path(path) {
                Ok(catalog) => return Ok(catalog),
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping schema source"),
            }
        }
        Err(CatalogError::NoSourcesAvailable)
    }
}

fn read_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let format = SchemaFormat::from_path(path)
        .ok_or_else(|| CatalogError::UnsupportedFormat(path.display().to_string()))?;
    let reader = BufReader::new(std::fs::File::open(path)?);
    let value = match format {
        SchemaFormat::Json => serde_json::from_reader(reader)?,
        SchemaFormat::Yaml => serde_yaml::from_reader(reader)?,
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use shellkit_core::{ArgumentSpec, ValueType};

    use super::*;

    fn write_json(dir: &Path, file: &str, value: &impl serde::Serialize) -> PathBuf {
        let path = dir.join(file);
        std::fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
        path
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(SchemaFormat::from_path(Path::new("a.json")), Some(SchemaFormat::Json));
        assert_eq!(SchemaFormat::from_path(Path::new("a.YML")), Some(SchemaFormat::Yaml));
        assert_eq!(SchemaFormat::from_path(Path::new("a.yaml")), Some(SchemaFormat::Yaml));
        assert_eq!(SchemaFormat::from_path(Path::new("a.toml")), None);
        assert_eq!(SchemaFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_from_file_json() {
        let dir = tempfile::tempdir().unwrap();
        let package = SchemaPackage::new("1.0")
            .with_schema(CommandSchema::new("list"))
            .with_schema(CommandSchema::new("show"));
        let path = write_json(dir.path(), "pkg.json", &package);

        let catalog = Catalog::from_file(&path).unwrap();
        assert_eq!(catalog.commands().collect::<Vec<_>>(), vec!["list", "show"]);
        assert_eq!(catalog.source(), &CatalogSource::File(path));
    }

    #[test]
    fn test_from_file_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pkg.toml");
        std::fs::write(&path, "version = 1").unwrap();

        assert!(matches!(
            Catalog::from_file(&path),
            Err(CatalogError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_from_package_validates() {
        let package = SchemaPackage::new("1.0")
            .with_schema(CommandSchema::new("dup"))
            .with_schema(CommandSchema::new("DUP"));

        let err = Catalog::from_package(package).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidSchema(ref msg) if msg.contains("DUP")));
    }

    #[test]
    fn test_from_dir_skips_other_files() {
        let dir = tempfile::tempdir().unwrap();
        write_json(
            dir.path(),
            "b.json",
            &CommandSchema::new("bravo").with_argument(ArgumentSpec::optional("x", ValueType::I32)),
        );
        std::fs::write(dir.path().join("a.yaml"), "name: alpha\n").unwrap();
        std::fs::write(dir.path().join("README.md"), "# notes").unwrap();

        let catalog = Catalog::from_dir(dir.path()).unwrap();
        assert_eq!(catalog.commands().collect::<Vec<_>>(), vec!["alpha", "bravo"]);
        assert!(catalog.contains("BRAVO"));
    }

    #[test]
    fn test_builder_without_sources() {
        assert!(matches!(
            Catalog::builder().build(),
            Err(CatalogError::NoSourcesAvailable)
        ));
    }

    #[test]
    fn test_builder_merge_rejects_duplicates_across_sources() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_json(dir.path(), "a.json", &SchemaPackage::new("1").with_schema(CommandSchema::new("same")));
        let b = write_json(dir.path(), "b.json", &SchemaPackage::new("1").with_schema(CommandSchema::new("same")));

        let result = Catalog::builder().source(&a).source(&b).build();
        assert!(matches!(result, Err(CatalogError::InvalidSchema(_))));
    }

    #[test]
    fn test_builder_first_available_skips_failures() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_json(dir.path(), "good.json", &SchemaPackage::new("1").with_schema(CommandSchema::new("ok")));

        let catalog = Catalog::builder()
            .first_available()
            .source(dir.path().join("missing.json"))
            .source(&good)
            .build()
            .unwrap();
        assert!(catalog.contains("ok"));

        let result = Catalog::builder()
            .first_available()
            .source(dir.path().join("missing.json"))
            .build();
        assert!(matches!(result, Err(CatalogError::NoSourcesAvailable)));
    }
}
