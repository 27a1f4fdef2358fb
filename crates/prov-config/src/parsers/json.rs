//! JSON document parser

use crate::error::ParseError;
use crate::parsers::DocumentParser;
use prov_artifact::{Artifact, DocValue, IdentityFields, Location};

/// JSON parser
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser;

impl DocumentParser for JsonParser {
    fn parse(
        &self,
        location: Location,
        content: &str,
        identity: &IdentityFields,
    ) -> Result<Artifact, ParseError> {
        let value: serde_json::Value = serde_json::from_str(content)
            .map_err(|e| ParseError::syntax_error(location.as_str(), e.to_string()))?;

        if !value.is_object() {
            return Err(ParseError::NotAMapping {
                location: location.to_string(),
            });
        }

        Ok(Artifact::with_identity(location, DocValue::from(value), identity))
    }

    fn extensions(&self) -> &[&str] {
        &["json", "jsonld"]
    }
}
