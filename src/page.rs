//! Route table for the page shell.
//!
//! `/` is the general-purpose conversation page that dials the configurable
//! default endpoint. Every persona in the catalog gets its own page at its
//! route path.

use voicegate_core::{Persona, PersonaCatalog};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Home,
    Persona(Persona),
}

impl Page {
    /// The persona path carried into the `DeploymentContext`.
    pub fn persona_path(&self) -> Option<&str> {
        match self {
            Page::Home => None,
            Page::Persona(persona) => Some(&persona.path),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Home => "Voice Conversation",
            Page::Persona(persona) => &persona.title,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    personas: PersonaCatalog,
}

impl RouteTable {
    pub fn new(personas: PersonaCatalog) -> Self {
        Self { personas }
    }

    /// Maps a request path to a page. The query string and fragment are ignored.
    pub fn route(&self, path: &str) -> Option<Page> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim().trim_matches('/');
        if trimmed.is_empty() {
            return Some(Page::Home);
        }
        self.personas
            .get(trimmed)
            .map(|persona| Page::Persona(persona.clone()))
    }
}
