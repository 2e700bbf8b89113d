//! Endpoint Resolver
//!
//! Produces exactly one WebSocket endpoint for a `DeploymentContext`:
//!
//! - persona pages dial their catalog URL verbatim (always `wss:`);
//! - every other page dials `{scheme}//{host}/api/{service}/conversation/`,
//!   where the scheme mirrors the page's own transport security (`https:` pages
//!   use `wss:`, `http:` pages use `ws:`) so the browser never rejects the
//!   socket as mixed content.
//!
//! Resolution performs no I/O and has no side effects beyond logging.

use crate::context::DeploymentContext;
use crate::error::ResolveError;
use crate::persona::PersonaCatalog;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

/// Host used when no backend host is configured.
pub const DEFAULT_BACKEND_HOST: &str = "localhost:8000";

/// The `<service-name>` segment of the conversation path.
pub const DEFAULT_CONVERSATION_SERVICE: &str = "python";

/// Secure or insecure variant of the session transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scheme {
    Secure,
    Insecure,
}

impl Scheme {
    /// The scheme that matches the page's own transport security.
    pub fn for_page(page_is_secure: bool) -> Self {
        if page_is_secure {
            Scheme::Secure
        } else {
            Scheme::Insecure
        }
    }

    /// The URL scheme including its trailing colon.
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Secure => "wss:",
            Scheme::Insecure => "ws:",
        }
    }
}

/// A derived, never persisted session endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedEndpoint {
    pub url: String,
    pub scheme: Scheme,
}

impl ResolvedEndpoint {
    /// Checks that the endpoint is a syntactically valid WebSocket URL whose
    /// scheme agrees with `self.scheme`.
    pub fn validate(&self) -> Result<(), ResolveError> {
        let invalid = |reason: &str| ResolveError::InvalidEndpointUrl {
            url: self.url.clone(),
            reason: reason.to_string(),
        };
        let url = Url::parse(&self.url).map_err(|e| invalid(&e.to_string()))?;
        if url.host_str().is_none() {
            return Err(invalid("URL has no host"));
        }
        let expected = self.scheme.as_str().trim_end_matches(':');
        if url.scheme() != expected {
            return Err(invalid(&format!("expected a {} URL", expected)));
        }
        Ok(())
    }
}

/// Validates a backend host of the form `host[:port]`.
///
/// Returns the trimmed host exactly as written; the URL parser is only used to
/// check it, never to rewrite it.
pub fn validate_host(host: &str) -> Result<&str, ResolveError> {
    let trimmed = host.trim();
    let invalid = |reason: &str| ResolveError::InvalidHost {
        host: host.to_string(),
        reason: reason.to_string(),
    };
    if trimmed.is_empty() {
        return Err(invalid("host is empty"));
    }
    if trimmed.contains(|c: char| c.is_whitespace() || matches!(c, '/' | '?' | '#' | '@' | '\\'))
    {
        return Err(invalid("expected host[:port] without scheme, path or credentials"));
    }
    let url = Url::parse(&format!("http://{}/", trimmed)).map_err(|e| invalid(&e.to_string()))?;
    if url.host_str().is_none() {
        return Err(invalid("no host component"));
    }
    Ok(trimmed)
}

/// Validates the `<service-name>` path segment.
pub fn validate_service_name(service: &str) -> Result<(), ResolveError> {
    let well_formed = !service.is_empty()
        && service
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if well_formed {
        Ok(())
    } else {
        Err(ResolveError::InvalidServiceName(service.to_string()))
    }
}

/// Resolves deployment contexts to session endpoints.
#[derive(Debug, Clone)]
pub struct EndpointResolver {
    default_host: String,
    service: String,
    personas: PersonaCatalog,
}

impl Default for EndpointResolver {
    fn default() -> Self {
        Self {
            default_host: DEFAULT_BACKEND_HOST.to_string(),
            service: DEFAULT_CONVERSATION_SERVICE.to_string(),
            personas: PersonaCatalog::builtin(),
        }
    }
}

impl EndpointResolver {
    /// Creates a resolver, rejecting a malformed default host or service name.
    pub fn new(
        default_host: &str,
        service: &str,
        personas: PersonaCatalog,
    ) -> Result<Self, ResolveError> {
        let default_host = validate_host(default_host)?.to_string();
        validate_service_name(service)?;
        Ok(Self {
            default_host,
            service: service.to_string(),
            personas,
        })
    }

    /// Resolves the endpoint for `ctx`.
    ///
    /// Host-derived resolution never fails: a malformed configured host is
    /// logged and replaced by the default host. The only error is a persona path
    /// missing from the catalog, since persona URLs are never derived.
    pub fn resolve(&self, ctx: &DeploymentContext) -> Result<ResolvedEndpoint, ResolveError> {
        if let Some(path) = &ctx.persona_path {
            let persona = self
                .personas
                .get(path)
                .ok_or_else(|| ResolveError::UnknownPersona(path.clone()))?;
            debug!(persona = %persona.path, url = %persona.url, "Resolved persona endpoint");
            return Ok(ResolvedEndpoint {
                url: persona.url.clone(),
                // The catalog only admits wss URLs.
                scheme: Scheme::Secure,
            });
        }

        let scheme = Scheme::for_page(ctx.page_is_secure);
        let host = self.select_host(ctx.configured_host.as_deref());
        let url = format!(
            "{}//{}/api/{}/conversation/",
            scheme.as_str(),
            host,
            self.service
        );
        debug!(%url, "Resolved conversation endpoint");
        Ok(ResolvedEndpoint { url, scheme })
    }

    fn select_host<'a>(&'a self, configured: Option<&'a str>) -> &'a str {
        match configured {
            Some(host) if !host.trim().is_empty() => match validate_host(host) {
                Ok(host) => host,
                Err(e) => {
                    warn!(error = %e, fallback = %self.default_host, "Ignoring malformed backend host");
                    &self.default_host
                }
            },
            _ => &self.default_host,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::Persona;

    fn resolve(ctx: &DeploymentContext) -> ResolvedEndpoint {
        EndpointResolver::default()
            .resolve(ctx)
            .expect("host-derived resolution never fails")
    }

    #[test]
    fn test_secure_page_without_host_uses_default() {
        let ep = resolve(&DeploymentContext::new(true));
        assert_eq!(ep.url, "wss://localhost:8000/api/python/conversation/");
        assert_eq!(ep.scheme, Scheme::Secure);
    }

    #[test]
    fn test_insecure_page_with_configured_host() {
        let ep = resolve(&DeploymentContext::new(false).with_configured_host("api.example.com:8000"));
        assert_eq!(ep.url, "ws://api.example.com:8000/api/python/conversation/");
        assert_eq!(ep.scheme, Scheme::Insecure);
    }

    #[test]
    fn test_scheme_always_mirrors_page_security() {
        let hosts = [
            None,
            Some("api.example.com"),
            Some("10.0.0.4:9000"),
            Some("[::1]:8000"),
            Some("https://not-a-host"),
            Some(""),
        ];
        for host in hosts {
            for secure in [true, false] {
                let mut ctx = DeploymentContext::new(secure);
                ctx.configured_host = host.map(str::to_string);
                let ep = resolve(&ctx);
                if secure {
                    assert!(ep.url.starts_with("wss://"), "{}", ep.url);
                    assert_eq!(ep.scheme, Scheme::Secure);
                } else {
                    assert!(ep.url.starts_with("ws://"), "{}", ep.url);
                    assert_eq!(ep.scheme, Scheme::Insecure);
                }
                assert!(ep.validate().is_ok(), "{}", ep.url);
            }
        }
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let resolver = EndpointResolver::default();
        let ctx = DeploymentContext::new(true).with_configured_host("api.example.com");
        let first = resolver.resolve(&ctx).unwrap();
        for _ in 0..10 {
            assert_eq!(resolver.resolve(&ctx).unwrap(), first);
        }
    }

    #[test]
    fn test_persona_url_is_returned_verbatim() {
        let expected = "wss://artisan-backend.artisanai.co/op-qa-exec-assist/en";
        for secure in [true, false] {
            for host in [None, Some("api.example.com:8000")] {
                let mut ctx = DeploymentContext::new(secure).with_persona("op-qa-exec-assist/en");
                ctx.configured_host = host.map(str::to_string);
                let ep = resolve(&ctx);
                assert_eq!(ep.url, expected);
                assert_eq!(ep.scheme, Scheme::Secure);
            }
        }
    }

    #[test]
    fn test_unknown_persona_is_an_error() {
        let err = EndpointResolver::default()
            .resolve(&DeploymentContext::new(true).with_persona("ghost/en"))
            .unwrap_err();
        assert_eq!(err, ResolveError::UnknownPersona("ghost/en".to_string()));
    }

    #[test]
    fn test_malformed_host_falls_back_to_default() {
        for bad in ["https://api.example.com", "api.example.com/path", "user@host", "a b"] {
            let ep = resolve(&DeploymentContext::new(false).with_configured_host(bad));
            assert_eq!(ep.url, "ws://localhost:8000/api/python/conversation/", "{}", bad);
        }
    }

    #[test]
    fn test_configured_host_is_trimmed_but_not_rewritten() {
        let ep = resolve(&DeploymentContext::new(true).with_configured_host("  API.Example.com:443 "));
        assert_eq!(ep.url, "wss://API.Example.com:443/api/python/conversation/");
    }

    #[test]
    fn test_custom_service_and_default_host() {
        let resolver =
            EndpointResolver::new("backend.internal:8080", "voice", PersonaCatalog::default())
                .expect("valid resolver");
        let ep = resolver.resolve(&DeploymentContext::new(false)).unwrap();
        assert_eq!(ep.url, "ws://backend.internal:8080/api/voice/conversation/");
    }

    #[test]
    fn test_resolver_rejects_bad_defaults() {
        assert!(matches!(
            EndpointResolver::new("", "python", PersonaCatalog::default()),
            Err(ResolveError::InvalidHost { .. })
        ));
        assert!(matches!(
            EndpointResolver::new("localhost:8000", "py/thon", PersonaCatalog::default()),
            Err(ResolveError::InvalidServiceName(_))
        ));
    }

    #[test]
    fn test_custom_persona_catalog() {
        let catalog = PersonaCatalog::new(vec![Persona {
            path: "dev/en".to_string(),
            title: "Dev".to_string(),
            url: "wss://localhost:9443/dev/en".to_string(),
        }])
        .unwrap();
        let resolver = EndpointResolver::new(DEFAULT_BACKEND_HOST, "python", catalog).unwrap();
        for secure in [true, false] {
            let ep = resolver
                .resolve(&DeploymentContext::new(secure).with_persona("dev/en"))
                .unwrap();
            assert_eq!(ep.url, "wss://localhost:9443/dev/en");
            assert_eq!(ep.scheme, Scheme::Secure);
            assert!(ep.validate().is_ok());
        }
    }

    #[test]
    fn test_validate_endpoint() {
        let bad = ResolvedEndpoint {
            url: "wss://host.example.com/x".to_string(),
            scheme: Scheme::Insecure,
        };
        assert!(bad.validate().is_err());
        let bad = ResolvedEndpoint {
            url: "not a url".to_string(),
            scheme: Scheme::Secure,
        };
        assert!(bad.validate().is_err());
    }
}
