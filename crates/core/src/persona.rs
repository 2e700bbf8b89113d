//! Persona Catalog
//!
//! A persona is a fixed, operator-curated assistant identity bound to one
//! backend conversation endpoint and exposed through its own page. Personas
//! are data entries in a single catalog rather than separate hard-coded pages;
//! their URLs are taken verbatim and never derived from the page or host.

use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;
use url::Url;

/// One persona entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    /// Route path identifying the persona, e.g. `op-qa-exec-assist/en`.
    pub path: String,
    /// Human-readable page title.
    pub title: String,
    /// Fully-qualified secure WebSocket URL, e.g. `wss://<host>/<persona-id>/<locale>`.
    pub url: String,
}

impl Persona {
    fn validate(&self) -> Result<(), CatalogError> {
        if self.path.is_empty() || self.path.chars().any(char::is_whitespace) {
            return Err(CatalogError::InvalidPersonaPath(self.path.clone()));
        }
        let invalid = |reason: &str| CatalogError::InvalidPersonaUrl {
            path: self.path.clone(),
            reason: reason.to_string(),
        };
        let url = Url::parse(&self.url).map_err(|e| invalid(&e.to_string()))?;
        // Persona URLs are served to secure pages as-is, so only wss is allowed.
        if url.scheme() != "wss" {
            return Err(invalid("scheme must be wss"));
        }
        if url.host_str().is_none() {
            return Err(invalid("URL has no host"));
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct CatalogFile {
    personas: Vec<Persona>,
}

/// The set of personas known to this deployment, keyed by route path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonaCatalog {
    personas: BTreeMap<String, Persona>,
}

impl PersonaCatalog {
    /// Builds a catalog, validating every entry.
    pub fn new(personas: impl IntoIterator<Item = Persona>) -> Result<Self, CatalogError> {
        let mut map = BTreeMap::new();
        for mut persona in personas {
            persona.path = normalize_path(&persona.path).to_string();
            persona.validate()?;
            if map.contains_key(&persona.path) {
                return Err(CatalogError::DuplicatePersona(persona.path));
            }
            map.insert(persona.path.clone(), persona);
        }
        Ok(Self { personas: map })
    }

    /// The personas shipped with the shell.
    pub fn builtin() -> Self {
        let mut personas = BTreeMap::new();
        personas.insert(
            "op-qa-exec-assist/en".to_string(),
            Persona {
                path: "op-qa-exec-assist/en".to_string(),
                title: "Operation Q/A Executive Assistant".to_string(),
                url: "wss://artisan-backend.artisanai.co/op-qa-exec-assist/en".to_string(),
            },
        );
        Self { personas }
    }

    /// Parses a catalog from its JSON form: `{"personas": [{"path", "title", "url"}]}`.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::new(file.personas)
    }

    /// Loads a catalog file from disk.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&json)?;
        info!(path = %path.display(), count = catalog.len(), "Loaded persona catalog");
        Ok(catalog)
    }

    /// Looks up a persona by route path; leading and trailing slashes are ignored.
    pub fn get(&self, path: &str) -> Option<&Persona> {
        self.personas.get(normalize_path(path))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Persona> {
        self.personas.values()
    }

    pub fn len(&self) -> usize {
        self.personas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }
}

pub(crate) fn normalize_path(path: &str) -> &str {
    path.trim().trim_matches('/')
}
