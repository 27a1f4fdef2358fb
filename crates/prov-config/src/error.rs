//! Error types for the configuration layer
//!
//! Provides error handling for:
//! - Policy loading (file → `PolicyConfig`)
//! - Policy validation (semantic consistency of the tables)
//! - Document parsing (text → `Artifact`)

use std::path::PathBuf;

/// Errors while loading or validating a policy
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error during file read
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Policy file extension is not one we can load
    #[error("unsupported policy format: {0}")]
    UnsupportedFormat(PathBuf),

    /// Malformed JSON policy
    #[error("invalid JSON policy: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed YAML policy
    #[error("invalid YAML policy: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Malformed TOML policy
    #[error("invalid TOML policy: {0}")]
    Toml(#[from] toml::de::Error),

    /// A required field name is empty
    #[error("policy field '{0}' must not be empty")]
    EmptyField(&'static str),

    /// The provenance field is not part of the relationship vocabulary
    #[error("provenance field '{0}' is not in the relationship vocabulary")]
    ProvenanceFieldNotInVocabulary(String),

    /// One alias maps to two canonical types
    #[error("alias '{alias}' is claimed by both '{first}' and '{second}'")]
    DuplicateAlias {
        alias: String,
        first: String,
        second: String,
    },
}

impl ConfigError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors during document parsing (ingress)
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// No parser registered for file extension
    #[error("no parser registered for extension: '{0}'")]
    NoParserForExtension(String),

    /// Syntax error in source document
    #[error("syntax error in {location}: {message}")]
    SyntaxError { location: String, message: String },

    /// Document root is not a mapping
    #[error("document root in {location} is not a mapping")]
    NotAMapping { location: String },
}

impl ParseError {
    /// Create syntax error for location
    pub fn syntax_error(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SyntaxError {
            location: location.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display() {
        let err = ParseError::NoParserForExtension("txt".to_string());
        assert_eq!(err.to_string(), "no parser registered for extension: 'txt'");
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::ProvenanceFieldNotInVocabulary("derivedFrom".to_string());
        assert!(err.to_string().contains("not in the relationship vocabulary"));

        let err = ConfigError::DuplicateAlias {
            alias: "ADR".to_string(),
            first: "a".to_string(),
            second: "b".to_string(),
        };
        assert_eq!(err.to_string(), "alias 'ADR' is claimed by both 'a' and 'b'");
    }

    #[test]
    fn error_conversions() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ConfigError = json_err.into();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
