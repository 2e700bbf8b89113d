//! Error types shared across the session layer.

use std::path::PathBuf;

/// Failures while turning a `DeploymentContext` into an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("Invalid backend host '{host}': {reason}")]
    InvalidHost { host: String, reason: String },
    #[error("Invalid conversation service name '{0}'")]
    InvalidServiceName(String),
    #[error("No persona is configured for path '{0}'")]
    UnknownPersona(String),
    #[error("Invalid endpoint URL '{url}': {reason}")]
    InvalidEndpointUrl { url: String, reason: String },
}

/// Failures while loading a persona catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read persona catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse persona catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Persona path '{0}' is defined more than once")]
    DuplicatePersona(String),
    #[error("Persona path '{0}' is empty or contains whitespace")]
    InvalidPersonaPath(String),
    #[error("Persona '{path}' has an invalid URL: {reason}")]
    InvalidPersonaUrl { path: String, reason: String },
}

/// An opaque failure reported by the conversation engine itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Conversation engine error: {0}")]
pub struct EngineError(pub String);

/// Errors surfaced by the session bootstrap.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BootstrapError {
    /// The engine was requested outside a browser execution context.
    #[error("Precondition violated: {0}")]
    PreconditionViolation(String),
    #[error("Conversation unavailable: {0}")]
    Unavailable(#[from] ResolveError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ResolveError::InvalidHost {
            host: "bad host".to_string(),
            reason: "invalid domain character".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid backend host 'bad host': invalid domain character"
        );

        let err = BootstrapError::from(ResolveError::UnknownPersona("x/en".to_string()));
        assert_eq!(
            err.to_string(),
            "Conversation unavailable: No persona is configured for path 'x/en'"
        );

        let err = BootstrapError::from(EngineError("microphone denied".to_string()));
        assert_eq!(
            err.to_string(),
            "Conversation engine error: microphone denied"
        );
    }
}
