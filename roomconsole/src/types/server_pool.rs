use serde::{Deserialize, Serialize};

use super::server::ServerRef;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerPool {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub servers_count: u32,
    /// Member servers; only present on the detail view.
    #[serde(default)]
    pub servers: Vec<ServerRef>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerPoolRef {
    pub id: u64,
    pub name: String,
}

/// Write payload for a server pool. Servers are sent as IDs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerPoolDraft {
    pub name: String,
    pub description: Option<String>,
    pub servers: Vec<u64>,
    pub updated_at: Option<String>,
}
