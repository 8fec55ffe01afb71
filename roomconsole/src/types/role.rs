use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub superuser: bool,
    #[serde(default)]
    pub room_limit: Option<i32>,
    /// Permission IDs; only present on the detail view.
    #[serde(default)]
    pub permissions: Vec<u64>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Reduced role reference embedded in other entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRef {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub automatic: bool,
}

/// Write payload for a role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleDraft {
    pub name: String,
    pub room_limit: Option<i32>,
    pub permissions: Vec<u64>,
    pub updated_at: Option<String>,
}
