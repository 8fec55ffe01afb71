use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{RecordingAccess, RoomUserRole};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingFormat {
    pub id: u64,
    pub format: String,
    #[serde(default)]
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    pub access: RecordingAccess,
    #[serde(default)]
    pub formats: Vec<RecordingFormat>,
}

/// One past or running meeting in a room's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomMeeting {
    pub id: String,
    pub start: DateTime<Utc>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub detached: Option<DateTime<Utc>>,
    #[serde(default)]
    pub server_connection_issues: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomMember {
    pub id: u64,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub role: RoomUserRole,
    #[serde(default)]
    pub image: Option<String>,
}
