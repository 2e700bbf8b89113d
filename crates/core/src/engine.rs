//! Conversation engine contract.
//!
//! The engine owns audio capture, playback and the live transport connection.
//! This layer only constructs it with a `SessionConfig` and tears it down.

use crate::endpoint::ResolvedEndpoint;
use crate::error::EngineError;
use serde::Serialize;

/// Everything the engine is handed at mount time. Never mutated; a changed
/// endpoint means a new `SessionConfig` and a full remount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionConfig {
    pub endpoint: ResolvedEndpoint,
    pub input_editable: bool,
}

impl SessionConfig {
    pub fn new(endpoint: ResolvedEndpoint, input_editable: bool) -> Self {
        Self {
            endpoint,
            input_editable,
        }
    }

    /// The constructor arguments passed to the engine.
    pub fn props(&self) -> EngineProps {
        EngineProps {
            default_endpoint_url: self.endpoint.url.clone(),
            is_input_editable: self.input_editable,
        }
    }
}

/// The engine's constructor contract, serialised with its camelCase keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineProps {
    pub default_endpoint_url: String,
    pub is_input_editable: bool,
}

/// A live engine instance.
#[cfg_attr(test, mockall::automock)]
pub trait ConversationEngine {
    /// Releases the transport connection and audio devices.
    fn teardown(&mut self) -> Result<(), EngineError>;
}

/// Constructs engine instances. Only ever called from a browser context.
#[cfg_attr(test, mockall::automock)]
pub trait EngineFactory {
    fn construct(&mut self, props: EngineProps) -> Result<Box<dyn ConversationEngine>, EngineError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::Scheme;

    #[test]
    fn test_props_serialize_with_engine_keys() {
        let config = SessionConfig::new(
            ResolvedEndpoint {
                url: "ws://api.example.com:8000/api/python/conversation/".to_string(),
                scheme: Scheme::Insecure,
            },
            false,
        );
        let json = serde_json::to_value(config.props()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "defaultEndpointUrl": "ws://api.example.com:8000/api/python/conversation/",
                "isInputEditable": false,
            })
        );
    }
}
