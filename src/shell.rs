//! The page shell: maps a navigation to a page and drives the session
//! bootstrap with the matching `DeploymentContext`.

use crate::config::ShellConfig;
use crate::page::{Page, RouteTable};
use crate::telemetry;
use anyhow::Context;
use voicegate_core::{
    DeploymentContext, EndpointResolver, EngineFactory, ExecutionContext, HostEnvironment,
    PersonaCatalog, Presentation, SessionBootstrap, SessionPhase,
};
use tracing::{info, instrument, warn};

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("No page found at '{0}'")]
    NotFound(String),
}

/// The result of rendering one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub page: Page,
    pub presentation: Presentation,
}

/// One page instance of the shell. Owns the single conversation session.
pub struct Shell<F: EngineFactory> {
    config: ShellConfig,
    routes: RouteTable,
    bootstrap: SessionBootstrap<F>,
}

impl<F: EngineFactory> Shell<F> {
    /// Startup entry point: reads `ShellConfig` from the environment, installs
    /// the tracing subscriber at the configured level, then builds the shell.
    pub fn from_env(factory: F) -> anyhow::Result<Self> {
        let config = ShellConfig::from_env().context("Failed to load shell configuration")?;
        if let Err(e) = telemetry::init_tracing(config.log_level) {
            // Another global subscriber may already be installed.
            warn!(error = %e, "Keeping existing tracing subscriber");
        }
        Self::new(config, factory)
    }

    /// Loads the persona catalog and builds the resolver and bootstrap.
    pub fn new(config: ShellConfig, factory: F) -> anyhow::Result<Self> {
        let personas = match &config.personas_path {
            Some(path) => PersonaCatalog::load(path).with_context(|| {
                format!("Failed to load persona catalog from {}", path.display())
            })?,
            None => PersonaCatalog::builtin(),
        };
        let resolver = EndpointResolver::new(
            &config.default_backend_host,
            &config.conversation_service,
            personas.clone(),
        )
        .context("Invalid endpoint configuration")?;

        if personas.is_empty() {
            warn!("Persona catalog is empty; only the home page is routable");
        }
        let persona_paths: Vec<&str> = personas.iter().map(|p| p.path.as_str()).collect();
        info!(
            personas = ?persona_paths,
            default_host = %config.default_backend_host,
            backend_host = ?config.backend_host,
            "Page shell configured"
        );

        let bootstrap = SessionBootstrap::new(resolver, factory, config.input_editable);
        Ok(Self {
            config,
            routes: RouteTable::new(personas),
            bootstrap,
        })
    }

    /// Renders the page at `path` in the given host environment.
    ///
    /// Server passes only route. Browser passes mount the conversation engine,
    /// remounting it when the new page targets a different persona or host.
    /// Navigating to an unknown path closes the current session.
    #[instrument(name = "render_page", skip(self, host))]
    pub fn render(
        &mut self,
        path: &str,
        host: &dyn HostEnvironment,
    ) -> Result<PageView, ShellError> {
        let execution = host.execution_context();
        let Some(page) = self.routes.route(path) else {
            warn!("No page for path");
            if execution == ExecutionContext::Browser {
                self.bootstrap.unmount();
            }
            return Err(ShellError::NotFound(path.to_string()));
        };

        let context = DeploymentContext::observe(
            host,
            self.config.backend_host.clone(),
            page.persona_path().map(str::to_string),
        );
        let presentation = self.bootstrap.activate(execution, context);
        Ok(PageView { page, presentation })
    }

    /// Page teardown.
    pub fn close(&mut self) {
        self.bootstrap.unmount();
    }

    pub fn phase(&self) -> SessionPhase {
        self.bootstrap.phase()
    }

    pub fn presentation(&self) -> Presentation {
        self.bootstrap.presentation()
    }
}
