//! Session Bootstrap
//!
//! Gates construction of the conversation engine to browser execution contexts
//! and owns its mount/unmount lifecycle:
//!
//! ```text
//! Uninitialized -> Resolving -> Ready -> Mounted -> Unmounted
//!                      |                    |
//!                      +--> Unavailable     +--> Resolving (persona/host changed)
//! ```
//!
//! At most one engine exists per bootstrap. Teardown of the current engine
//! always completes before a new one is constructed, and a mounted engine is
//! torn down when the bootstrap is dropped.

use crate::context::{DeploymentContext, ExecutionContext};
use crate::endpoint::EndpointResolver;
use crate::engine::{ConversationEngine, EngineFactory, SessionConfig};
use crate::error::BootstrapError;
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

/// The externally observable lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Uninitialized,
    Resolving,
    Ready,
    Mounted,
    Unmounted,
    Unavailable,
}

/// What the page should show in place of the conversation widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Presentation {
    /// Nothing mounted yet (server render pass, or resolution in progress).
    Pending,
    /// The engine is mounted and dialing `endpoint_url`.
    Live { endpoint_url: String },
    /// The session cannot start; the rest of the page keeps working.
    Unavailable { reason: String },
    /// The session was torn down.
    Closed,
}

enum State {
    Uninitialized,
    Resolving,
    Ready {
        context: DeploymentContext,
        config: SessionConfig,
    },
    Mounted {
        context: DeploymentContext,
        config: SessionConfig,
        engine: Box<dyn ConversationEngine>,
    },
    Unmounted,
    Unavailable {
        context: DeploymentContext,
        reason: String,
    },
}

impl State {
    fn phase(&self) -> SessionPhase {
        match self {
            State::Uninitialized => SessionPhase::Uninitialized,
            State::Resolving => SessionPhase::Resolving,
            State::Ready { .. } => SessionPhase::Ready,
            State::Mounted { .. } => SessionPhase::Mounted,
            State::Unmounted => SessionPhase::Unmounted,
            State::Unavailable { .. } => SessionPhase::Unavailable,
        }
    }

    fn context(&self) -> Option<&DeploymentContext> {
        match self {
            State::Ready { context, .. }
            | State::Mounted { context, .. }
            | State::Unavailable { context, .. } => Some(context),
            _ => None,
        }
    }
}

fn precondition_violation(message: &str) -> BootstrapError {
    error!(reason = message, "Conversation engine requested outside a browser context");
    if cfg!(debug_assertions) {
        panic!("Precondition violated: {}", message);
    }
    BootstrapError::PreconditionViolation(message.to_string())
}

/// Drives the conversation engine for a single page instance.
pub struct SessionBootstrap<F: EngineFactory> {
    resolver: EndpointResolver,
    factory: F,
    input_editable: bool,
    state: State,
}

impl<F: EngineFactory> SessionBootstrap<F> {
    pub fn new(resolver: EndpointResolver, factory: F, input_editable: bool) -> Self {
        Self {
            resolver,
            factory,
            input_editable,
            state: State::Uninitialized,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase()
    }

    /// The config handed to the engine, once one exists.
    pub fn session_config(&self) -> Option<&SessionConfig> {
        match &self.state {
            State::Ready { config, .. } | State::Mounted { config, .. } => Some(config),
            _ => None,
        }
    }

    pub fn presentation(&self) -> Presentation {
        match &self.state {
            State::Uninitialized | State::Resolving | State::Ready { .. } => Presentation::Pending,
            State::Mounted { config, .. } => Presentation::Live {
                endpoint_url: config.endpoint.url.clone(),
            },
            State::Unavailable { reason, .. } => Presentation::Unavailable {
                reason: reason.clone(),
            },
            State::Unmounted => Presentation::Closed,
        }
    }

    /// Handles a render pass.
    ///
    /// Server passes never leave `Uninitialized`. Browser passes resolve the
    /// endpoint and mount the engine, remounting when the persona or configured
    /// host differs from the current session. Failures are reported through the
    /// returned `Presentation`, never by panicking the page.
    #[instrument(
        name = "session_bootstrap",
        skip_all,
        fields(execution = ?execution, persona = ?context.persona_path)
    )]
    pub fn activate(
        &mut self,
        execution: ExecutionContext,
        context: DeploymentContext,
    ) -> Presentation {
        if execution == ExecutionContext::Server {
            debug!(phase = ?self.phase(), "Server render pass; conversation engine not constructed");
            return self.presentation();
        }

        let same_target = self
            .state
            .context()
            .is_some_and(|current| current.same_target(&context));
        match self.state.phase() {
            SessionPhase::Mounted | SessionPhase::Unavailable if same_target => {
                return self.presentation();
            }
            SessionPhase::Mounted => {
                info!("Session target changed; remounting conversation engine");
                self.unmount();
            }
            _ => {}
        }

        let ready = matches!(self.state, State::Ready { .. }) && same_target;
        if !ready && self.prepare(context).is_err() {
            return self.presentation();
        }
        if let Err(e) = self.mount() {
            warn!(error = %e, "Conversation engine was not mounted");
        }
        self.presentation()
    }

    /// Browser navigation to a page whose context may differ from the current one.
    pub fn route_changed(&mut self, context: DeploymentContext) -> Presentation {
        self.activate(ExecutionContext::Browser, context)
    }

    /// `Resolving -> Ready`, or `Unavailable` if no valid endpoint can be produced.
    fn prepare(&mut self, context: DeploymentContext) -> Result<(), BootstrapError> {
        self.state = State::Resolving;
        let resolved = self
            .resolver
            .resolve(&context)
            .and_then(|endpoint| endpoint.validate().map(|_| endpoint));
        match resolved {
            Ok(endpoint) => {
                debug!(url = %endpoint.url, scheme = ?endpoint.scheme, "Session endpoint resolved");
                let config = SessionConfig::new(endpoint, self.input_editable);
                self.state = State::Ready { context, config };
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Conversation session unavailable");
                self.state = State::Unavailable {
                    context,
                    reason: e.to_string(),
                };
                Err(e.into())
            }
        }
    }

    /// `Ready -> Mounted`: constructs the engine with the current `SessionConfig`.
    ///
    /// Mounting before a browser pass has resolved a session is a programming
    /// error; it panics in debug builds and is reported as
    /// `BootstrapError::PreconditionViolation` otherwise.
    pub fn mount(&mut self) -> Result<(), BootstrapError> {
        let (context, config) = match std::mem::replace(&mut self.state, State::Uninitialized) {
            State::Ready { context, config } => (context, config),
            State::Uninitialized => {
                return Err(precondition_violation(
                    "mount attempted before a browser render pass",
                ));
            }
            other => {
                let phase = other.phase();
                self.state = other;
                if phase == SessionPhase::Mounted {
                    return Ok(());
                }
                return Err(BootstrapError::PreconditionViolation(format!(
                    "cannot mount from the {:?} phase",
                    phase
                )));
            }
        };

        match self.factory.construct(config.props()) {
            Ok(engine) => {
                info!(url = %config.endpoint.url, input_editable = config.input_editable, "Conversation engine mounted");
                self.state = State::Mounted {
                    context,
                    config,
                    engine,
                };
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Conversation engine failed to start");
                self.state = State::Unavailable {
                    context,
                    reason: e.to_string(),
                };
                Err(e.into())
            }
        }
    }

    /// Tears down the engine, if any. Always ends in `Unmounted`, even when the
    /// engine reports an error while releasing its resources.
    pub fn unmount(&mut self) {
        match std::mem::replace(&mut self.state, State::Unmounted) {
            State::Mounted {
                config, mut engine, ..
            } => {
                if let Err(e) = engine.teardown() {
                    error!(error = %e, url = %config.endpoint.url, "Conversation engine teardown failed");
                }
                info!(url = %config.endpoint.url, "Conversation engine unmounted");
            }
            previous => debug!(from = ?previous.phase(), "Session closed without a mounted engine"),
        }
    }
}

impl<F: EngineFactory> Drop for SessionBootstrap<F> {
    fn drop(&mut self) {
        if matches!(self.state, State::Mounted { .. }) {
            self.unmount();
        }
    }
}
