//! YAML document parser

use crate::error::ParseError;
use crate::parsers::DocumentParser;
use prov_artifact::{Artifact, DocValue, IdentityFields, Location};

/// YAML parser
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlParser;

impl DocumentParser for YamlParser {
    fn parse(
        &self,
        location: Location,
        content: &str,
        identity: &IdentityFields,
    ) -> Result<Artifact, ParseError> {
        let value: serde_yaml::Value = serde_yaml::from_str(content)
            .map_err(|e| ParseError::syntax_error(location.as_str(), e.to_string()))?;

        let value = DocValue::from(value);
        if value.as_mapping().is_none() {
            return Err(ParseError::NotAMapping {
                location: location.to_string(),
            });
        }

        Ok(Artifact::with_identity(location, value, identity))
    }

    fn extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }
}
