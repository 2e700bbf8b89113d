//! Voicegate Core
//!
//! Session endpoint resolution and client-only bootstrap for the voice
//! conversation engine. The engine itself is an external collaborator reached
//! through the traits in [`engine`].

pub mod bootstrap;
pub mod context;
pub mod endpoint;
pub mod engine;
pub mod error;
pub mod persona;

pub use bootstrap::{Presentation, SessionBootstrap, SessionPhase};
pub use context::{DeploymentContext, ExecutionContext, HostEnvironment, PageTransport};
pub use endpoint::{EndpointResolver, ResolvedEndpoint, Scheme};
pub use engine::{ConversationEngine, EngineFactory, EngineProps, SessionConfig};
pub use error::{BootstrapError, CatalogError, EngineError, ResolveError};
pub use persona::{Persona, PersonaCatalog};
