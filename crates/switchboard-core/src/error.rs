// ── Core error types ──
//
// Errors surfaced by switchboard-core. Consumers never see raw HTTP
// status codes or JSON parse failures; the `From<switchboard_api::Error>`
// impl translates transport-layer errors into domain variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach switch API at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Switch not found: {identifier}")]
    SwitchNotFound { identifier: String },

    #[error("Failed to encode {what}: {reason}")]
    Serialization { what: String, reason: String },

    // ── Collaborator errors ──────────────────────────────────────────
    #[error("Clipboard unavailable: {message}")]
    Clipboard { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<switchboard_api::Error> for CoreError {
    fn from(err: switchboard_api::Error) -> Self {
        match err {
            switchboard_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            switchboard_api::Error::Transport(ref e) if e.is_connect() || e.is_timeout() => {
                CoreError::ConnectionFailed {
                    url: e
                        .url()
                        .map_or_else(|| "<unknown>".into(), ToString::to_string),
                    reason: e.to_string(),
                }
            }
            switchboard_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid URL: {e}"),
            },
            switchboard_api::Error::Tls(message) => CoreError::Config {
                message: format!("TLS: {message}"),
            },
            other => CoreError::Api {
                status: other.status(),
                message: other.to_string(),
            },
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serialization {
            what: "switch details".into(),
            reason: err.to_string(),
        }
    }
}
