//! Voicegate Page Shell
//!
//! Routes page navigations and bootstraps the voice conversation session for
//! each page. Endpoint resolution and the session lifecycle live in
//! `voicegate-core`; this crate wires them to environment configuration and
//! the route table.

pub mod config;
pub mod page;
pub mod shell;
pub mod telemetry;

pub use config::{ConfigError, ShellConfig};
pub use page::{Page, RouteTable};
pub use shell::{PageView, Shell, ShellError};
