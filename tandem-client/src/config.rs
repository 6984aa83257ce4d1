use serde::{Deserialize, Serialize};
use tandem_core::utils::DEFAULT_SIGNALING_URL;
use tandem_core::{IceServerConfig, MediaConstraints};

/// Orchestrator settings. Missing fields fall back to the defaults, so a
/// partial JSON object overrides only what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub signaling_url: String,
    pub ice_servers: Vec<IceServerConfig>,
    pub media_constraints: MediaConstraints,
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            signaling_url: DEFAULT_SIGNALING_URL.to_string(),
            ice_servers: vec![IceServerConfig::default()],
            media_constraints: MediaConstraints::default(),
        }
    }
}
