//! Document parsers
//!
//! Turn document text into [`Artifact`]s:
//! - JSON via `serde_json`
//! - YAML via `serde_yaml`
//!
//! Both reject documents whose root is not a mapping. Reading files and
//! walking directories is left to the caller.

use crate::error::ParseError;
use prov_artifact::{Artifact, IdentityFields, Location};
use std::path::Path;

mod json;
mod yaml;

pub use json::JsonParser;
pub use yaml::YamlParser;

/// Parser converting document text into an artifact
///
/// Implement this trait to add support for new document formats.
pub trait DocumentParser: Send + Sync {
    /// Parse document text, reading identity from the given fields
    ///
    /// # Errors
    /// Returns `ParseError` on invalid syntax or a non-mapping root
    fn parse(
        &self,
        location: Location,
        content: &str,
        identity: &IdentityFields,
    ) -> Result<Artifact, ParseError>;

    /// Supported file extensions (without dot)
    fn extensions(&self) -> &[&str];

    /// Check if this parser can handle the given path
    fn can_parse(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.extensions()
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
    }

    /// Parser priority (higher = tried first when multiple parsers match)
    fn priority(&self) -> i32 {
        0
    }
}

/// Parser registration, dispatching on file extension
pub struct ParserRegistry {
    parsers: Vec<Box<dyn DocumentParser>>,
}

impl Default for ParserRegistry {
    fn default() -> Self {
        default_parsers()
    }
}

impl std::fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParserRegistry")
            .field("parser_count", &self.parsers.len())
            .field("extensions", &self.all_extensions())
            .finish()
    }
}

impl ParserRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    /// Register a parser
    pub fn register<P: DocumentParser + 'static>(&mut self, parser: P) {
        self.parsers.push(Box::new(parser));
        self.parsers.sort_by_key(|p| std::cmp::Reverse(p.priority()));
    }

    /// Find parser for path
    #[must_use]
    pub fn find_for_path(&self, path: &Path) -> Option<&dyn DocumentParser> {
        self.parsers.iter().find(|p| p.can_parse(path)).map(|p| &**p)
    }

    /// Parse text read from `path`, using the path as the artifact location
    ///
    /// # Errors
    /// - `ParseError::NoParserForExtension` if no parser accepts the path
    /// - any error of the selected parser
    pub fn parse(
        &self,
        path: &Path,
        content: &str,
        identity: &IdentityFields,
    ) -> Result<Artifact, ParseError> {
        let parser = self.find_for_path(path).ok_or_else(|| {
            ParseError::NoParserForExtension(
                path.extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or_default()
                    .to_string(),
            )
        })?;
        parser.parse(Location::new(path.display().to_string()), content, identity)
    }

    /// Get all registered extensions
    #[must_use]
    pub fn all_extensions(&self) -> Vec<&str> {
        self.parsers
            .iter()
            .flat_map(|p| p.extensions())
            .copied()
            .collect()
    }
}

/// Create default parser registry with built-in parsers
#[inline]
#[must_use]
pub fn default_parsers() -> ParserRegistry {
    let mut registry = ParserRegistry::new();
    registry.register(JsonParser);
    registry.register(YamlParser);
    registry
}
