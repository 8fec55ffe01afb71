use serde::{Deserialize, Serialize};

/// System-wide streaming settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamingSettings {
    pub enabled: bool,
    #[serde(default)]
    pub default_pause_image: Option<String>,
    #[serde(default)]
    pub css_file: Option<String>,
    #[serde(default)]
    pub join_parameters: Option<String>,
}

/// Streaming settings of one room type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomTypeStreamingSettings {
    pub enabled: bool,
    #[serde(default)]
    pub default_pause_image: Option<String>,
}

/// Streaming configuration of one room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomStreamingConfig {
    pub enabled: bool,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub pause_image: Option<String>,
}

/// Live streaming state of one room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamingState {
    Idle,
    Starting,
    Running,
    Pausing,
    Paused,
    Resuming,
    Stopping,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomStreamingStatus {
    pub enabled_for_current_meeting: bool,
    #[serde(default)]
    pub status: Option<StreamingState>,
    #[serde(default)]
    pub fps: Option<u32>,
}

/// Feature flags from `/settings` that gate parts of the UI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    #[serde(default)]
    pub streaming: FeatureToggle,
    #[serde(default)]
    pub recording: FeatureToggle,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureToggle {
    #[serde(default)]
    pub enabled: bool,
}
