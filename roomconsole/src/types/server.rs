use serde::{Deserialize, Serialize};

use super::enums::{ServerHealth, ServerStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    /// Only returned to users allowed to view credentials.
    #[serde(default)]
    pub secret: Option<String>,
    pub strength: u8,
    pub status: ServerStatus,
    #[serde(default)]
    pub health: Option<ServerHealth>,
    #[serde(default)]
    pub participant_count: Option<u32>,
    #[serde(default)]
    pub listener_count: Option<u32>,
    #[serde(default)]
    pub voice_participant_count: Option<u32>,
    #[serde(default)]
    pub video_count: Option<u32>,
    #[serde(default)]
    pub meeting_count: Option<u32>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerRef {
    pub id: u64,
    pub name: String,
}

/// Write payload for a server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerDraft {
    pub name: String,
    pub description: Option<String>,
    pub base_url: Option<String>,
    pub secret: Option<String>,
    pub strength: u8,
    pub status: ServerStatus,
    pub updated_at: Option<String>,
}
