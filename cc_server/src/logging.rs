//! Structured logging configuration.
//!
//! Log levels are controlled through `RUST_LOG`; security-relevant auth
//! events get a dedicated helper so they are easy to filter.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured logging.
///
/// # Example
///
/// ```no_run
/// use cc_server::logging;
///
/// #[tokio::main]
/// async fn main() {
///     logging::init();
///     tracing::info!("Server starting");
/// }
/// ```
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,hyper=warn"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log a security event with structured data.
///
/// # Example
///
/// ```
/// use cc_server::logging::log_security_event;
///
/// log_security_event("failed_login", Some("editor@example.com"), "Invalid password attempt");
/// ```
pub fn log_security_event(event_type: &str, identifier: Option<&str>, message: &str) {
    tracing::warn!(
        event_type = event_type,
        identifier = identifier,
        "SECURITY: {}",
        message
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_security_event() {
        // Just ensure it doesn't panic
        log_security_event("test_event", Some("a@b.com"), "Test message");
        log_security_event("test_event", None, "No identifier");
    }
}
