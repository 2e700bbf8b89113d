//! Deployment Context
//!
//! Everything the resolver needs to know about the page it runs in is captured
//! once per page load in a `DeploymentContext`. The hosting environment is
//! reached only through the `HostEnvironment` trait, so resolution itself stays
//! a pure function of its input.

/// Where the current render pass is executing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionContext {
    /// Server-side prerendering. Audio and microphone APIs do not exist here.
    Server,
    /// A live browser page.
    Browser,
}

/// The HTTP transport the page itself was served over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTransport {
    Http,
    Https,
}

impl PageTransport {
    /// Parses a page protocol such as `"https:"` (the trailing colon is optional).
    ///
    /// Anything other than `https` is treated as insecure, matching how a page
    /// served from a non-TLS origin behaves.
    pub fn from_protocol(protocol: &str) -> Self {
        let protocol = protocol.trim().trim_end_matches(':');
        if protocol.eq_ignore_ascii_case("https") {
            PageTransport::Https
        } else {
            PageTransport::Http
        }
    }

    pub fn is_secure(self) -> bool {
        matches!(self, PageTransport::Https)
    }
}

/// The runtime seam to the hosting environment.
pub trait HostEnvironment {
    /// Distinguishes server-side prerendering from browser execution.
    fn execution_context(&self) -> ExecutionContext;

    /// The page protocol (e.g. `"https:"`), when one is observable.
    fn page_protocol(&self) -> Option<String>;
}

/// Immutable per-page-load inputs to endpoint resolution.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeploymentContext {
    /// Backend host from deployment configuration, e.g. `api.example.com:8000`.
    pub configured_host: Option<String>,
    /// Whether the page was served over a secure transport.
    pub page_is_secure: bool,
    /// Fixed persona path such as `op-qa-exec-assist/en`.
    pub persona_path: Option<String>,
}

impl DeploymentContext {
    pub fn new(page_is_secure: bool) -> Self {
        Self {
            page_is_secure,
            ..Default::default()
        }
    }

    pub fn with_configured_host(mut self, host: impl Into<String>) -> Self {
        self.configured_host = Some(host.into());
        self
    }

    pub fn with_persona(mut self, persona_path: impl Into<String>) -> Self {
        self.persona_path = Some(persona_path.into());
        self
    }

    /// Reads the page transport from the host environment.
    pub fn observe(
        host: &dyn HostEnvironment,
        configured_host: Option<String>,
        persona_path: Option<String>,
    ) -> Self {
        let page_is_secure = host
            .page_protocol()
            .map(|p| PageTransport::from_protocol(&p).is_secure())
            .unwrap_or(false);
        Self {
            configured_host,
            page_is_secure,
            persona_path,
        }
    }

    /// True when both contexts dial the same session target.
    ///
    /// Only the persona and the configured host select a target; page security
    /// is fixed for the lifetime of a page.
    pub fn same_target(&self, other: &DeploymentContext) -> bool {
        self.persona_path == other.persona_path && self.configured_host == other.configured_host
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedHost(ExecutionContext, Option<&'static str>);

    impl HostEnvironment for FixedHost {
        fn execution_context(&self) -> ExecutionContext {
            self.0
        }

        fn page_protocol(&self) -> Option<String> {
            self.1.map(str::to_string)
        }
    }

    #[test]
    fn test_page_transport_from_protocol() {
        assert_eq!(PageTransport::from_protocol("https:"), PageTransport::Https);
        assert_eq!(PageTransport::from_protocol("HTTPS"), PageTransport::Https);
        assert_eq!(PageTransport::from_protocol("http:"), PageTransport::Http);
        assert_eq!(PageTransport::from_protocol("file:"), PageTransport::Http);
        assert_eq!(PageTransport::from_protocol(""), PageTransport::Http);
    }

    #[test]
    fn test_observe_reads_page_security() {
        let ctx = DeploymentContext::observe(
            &FixedHost(ExecutionContext::Browser, Some("https:")),
            Some("api.example.com".to_string()),
            None,
        );
        assert!(ctx.page_is_secure);
        assert_eq!(ctx.configured_host.as_deref(), Some("api.example.com"));

        // Without an observable protocol the page is treated as insecure.
        let ctx = DeploymentContext::observe(&FixedHost(ExecutionContext::Server, None), None, None);
        assert!(!ctx.page_is_secure);
    }

    #[test]
    fn test_same_target_ignores_page_security() {
        let a = DeploymentContext::new(true).with_persona("op-qa-exec-assist/en");
        let b = DeploymentContext::new(false).with_persona("op-qa-exec-assist/en");
        let c = DeploymentContext::new(true).with_persona("op-qa-exec-assist/fr");
        assert!(a.same_target(&b));
        assert!(!a.same_target(&c));

        let d = DeploymentContext::new(true).with_configured_host("a.example.com");
        let e = DeploymentContext::new(true).with_configured_host("b.example.com");
        assert!(!d.same_target(&e));
    }
}
