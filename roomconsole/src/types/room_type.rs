use serde::{Deserialize, Serialize};

use super::server_pool::ServerPoolRef;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomType {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub color: String,
    #[serde(default)]
    pub server_pool: Option<ServerPoolRef>,
    #[serde(default)]
    pub max_participants: Option<u32>,
    /// Minutes.
    #[serde(default)]
    pub max_duration: Option<u32>,
    #[serde(default)]
    pub updated_at: Option<String>,
}
