// ── Switch service ──
//
// Thin facade over `SwitchClient` that speaks domain types and serves as
// the production `FlowSource`.

use std::sync::Arc;

use switchboard_api::{BasicAuth, SwitchClient, TlsMode, TransportConfig};
use tracing::debug;

use crate::aggregate::FlowSource;
use crate::config::{ClientConfig, TlsVerification};
use crate::error::CoreError;
use crate::model::{FlowRecord, SwitchRow};

#[derive(Clone)]
pub struct SwitchService {
    client: Arc<SwitchClient>,
}

impl SwitchService {
    pub fn new(config: &ClientConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            tls: match &config.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: config.timeout,
        };
        let auth = config.credentials.as_ref().map(|c| BasicAuth {
            username: c.username.clone(),
            password: c.password.clone(),
        });
        let client = SwitchClient::new(config.url.as_str(), auth, &transport)?;
        Ok(Self::from_client(client))
    }

    pub fn from_client(client: SwitchClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Current switch inventory.
    pub async fn switches(&self) -> Result<Vec<SwitchRow>, CoreError> {
        let switches = self.client.list_switches().await?;
        debug!(count = switches.len(), "fetched switches");
        Ok(switches.into_iter().map(SwitchRow::from).collect())
    }

    /// Look up one switch by id.
    pub async fn switch(&self, switch_id: &str) -> Result<SwitchRow, CoreError> {
        self.switches()
            .await?
            .into_iter()
            .find(|row| row.switch_id == switch_id)
            .ok_or_else(|| CoreError::SwitchNotFound {
                identifier: switch_id.to_owned(),
            })
    }
}

impl FlowSource for SwitchService {
    async fn switch_flows(&self, switch_id: &str) -> Result<Vec<FlowRecord>, CoreError> {
        let flows = self.client.switch_flows(switch_id, false, None).await?;
        Ok(flows.into_iter().map(FlowRecord::from).collect())
    }
}
