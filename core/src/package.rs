use serde::{Deserialize, Serialize};

use crate::CommandSchema;

/// Serializable bundle of command schemas.
///
/// A package is the declarative form of a shell's command set: it can be
/// written as JSON or YAML, loaded at startup and registered in one go.
///
/// # Examples
///
/// ```
/// use shellkit_core::*;
///
/// let package = SchemaPackage::new("1.0.0")
///     .with_schema(CommandSchema::new("list"))
///     .with_schema(CommandSchema::new("show"));
///
/// assert_eq!(package.schema_count(), 2);
/// assert!(package.find("SHOW").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaPackage {
    /// Package format version.
    pub version: String,
    /// Optional package name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Optional package description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Command schemas included in this package.
    #[serde(default)]
    pub schemas: Vec<CommandSchema>,
}

impl SchemaPackage {
    /// Creates an empty package.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..Default::default()
        }
    }

    /// Adds a schema.
    pub fn with_schema(mut self, schema: CommandSchema) -> Self {
        self.schemas.push(schema);
        self
    }

    /// Returns the number of schemas in this package.
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }

    /// Finds a schema by case-insensitive name.
    pub fn find(&self, name: &str) -> Option<&CommandSchema> {
        self.schemas.iter().find(|s| s.matches_name(name))
    }
}
