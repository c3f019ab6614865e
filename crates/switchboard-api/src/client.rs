// Async HTTP client for the northbound switch API.
//
// Base path: /api/
// Auth: optional HTTP basic auth on every request

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::transport::TransportConfig;
use crate::types;

/// Basic-auth credentials attached to every request.
#[derive(Debug, Clone)]
pub struct BasicAuth {
    pub username: String,
    pub password: SecretString,
}

/// Async client for switch inventory and per-switch flow listings.
pub struct SwitchClient {
    http: reqwest::Client,
    base_url: Url,
    auth: Option<BasicAuth>,
}

impl SwitchClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client from a base URL, optional credentials and transport config.
    pub fn new(
        base_url: &str,
        auth: Option<BasicAuth>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            auth,
        })
    }

    /// Wrap an existing `reqwest::Client` (used by tests and embedders).
    pub fn with_client(http: reqwest::Client, base_url: &Url, auth: Option<BasicAuth>) -> Self {
        let mut base_url = base_url.clone();
        let path = base_url.path().trim_end_matches('/').to_owned();
        base_url.set_path(&format!("{path}/"));
        Self {
            http,
            base_url,
            auth,
        }
    }

    /// Ensure the base URL ends with a slash so relative joins append.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    /// The normalized base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>, Error> {
        let url = self.base_url.join(path)?;
        debug!("GET {url} params={params:?}");

        let mut request = self.http.get(url).query(params);
        if let Some(auth) = &self.auth {
            request = request.basic_auth(&auth.username, Some(auth.password.expose_secret()));
        }

        let resp = request.send().await?;
        Self::handle_list(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    /// Decode a JSON array body. An empty body or `null` decodes as no items.
    async fn handle_list<T: DeserializeOwned>(resp: reqwest::Response) -> Result<Vec<T>, Error> {
        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(Error::Authentication {
                message: status.to_string(),
            });
        }

        let body = resp.text().await?;
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: if body.is_empty() {
                    status.to_string()
                } else {
                    body
                },
            });
        }

        if body.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str::<Option<Vec<T>>>(&body)
            .map(Option::unwrap_or_default)
            .map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// List every switch known to the controller.
    pub async fn list_switches(&self) -> Result<Vec<types::SwitchInfo>, Error> {
        self.get_list("api/switch/list", &[]).await
    }

    /// List the flows terminating on or traversing a switch.
    ///
    /// `inventory` selects inventory-side flows; `port` narrows to one port.
    pub async fn switch_flows(
        &self,
        switch_id: &str,
        inventory: bool,
        port: Option<u32>,
    ) -> Result<Vec<types::FlowInfo>, Error> {
        let mut params = vec![("inventory", inventory.to_string())];
        if let Some(port) = port {
            params.push(("port", port.to_string()));
        }
        self.get_list(&format!("api/switch/{switch_id}/flows"), &params)
            .await
    }
}
