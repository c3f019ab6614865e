// ── Client configuration ──
//
// Everything needed to build a `SwitchService`, independent of where it
// came from (config file, CLI flags, environment).

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// Credentials for the northbound API.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

/// How to verify the API's TLS certificate.
#[derive(Debug, Clone, Default)]
pub enum TlsVerification {
    /// Use the system certificate store.
    #[default]
    SystemDefaults,
    /// Trust an additional CA from a PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate.
    DangerAcceptInvalid,
}

/// Resolved connection settings for the switch API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub url: Url,
    pub credentials: Option<Credentials>,
    pub tls: TlsVerification,
    pub timeout: Duration,
}
