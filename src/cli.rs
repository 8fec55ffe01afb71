use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// roomctl: command-line client for the room management console.
#[derive(Parser, Debug)]
#[command(name = "roomctl", version)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Base URL of the console (e.g. https://rooms.example.org)
    #[arg(long, env = "ROOMCTL_URL", global = true)]
    pub url: Option<String>,

    /// API token of the session
    #[arg(long, env = "ROOMCTL_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Preferred language for server messages
    #[arg(long, env = "ROOMCTL_LOCALE", global = true)]
    pub locale: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List one page of a collection
    List(ListArgs),

    /// Show a single entity
    Show(ShowArgs),

    /// Edit an entity, resolving concurrent modifications
    Edit(EditArgs),

    /// Update the system-wide streaming settings
    StreamingSettings(StreamingArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collection {
    Roles,
    Servers,
    ServerPools,
    Users,
    RoomTypes,
    /// Recordings of a room (requires --room)
    Recordings,
    /// Meeting history of a room (requires --room)
    Meetings,
    /// Members of a room (requires --room)
    Members,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Role,
    Server,
    ServerPool,
    User,
    RoomType,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditableKind {
    Role,
    Server,
    ServerPool,
    User,
}

/// What to do when the entity changed on the server since it was loaded.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OnConflict {
    /// Stop and report the conflict
    #[default]
    Abort,
    /// Discard local edits and show the server's version
    Reload,
    /// Send the local edits again
    Overwrite,
}

/// Arguments for the `list` subcommand.
#[derive(Parser, Debug)]
pub struct ListArgs {
    pub collection: Collection,

    /// Room ID for room collections
    #[arg(long)]
    pub room: Option<String>,

    /// Page to show
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Column to sort by
    #[arg(long)]
    pub sort_by: Option<String>,

    /// Sort descending
    #[arg(long)]
    pub desc: bool,

    /// Free-text search
    #[arg(long)]
    pub filter: Option<String>,

    /// Output as JSON lines instead of TSV
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `show` subcommand.
#[derive(Parser, Debug)]
pub struct ShowArgs {
    pub kind: EntityKind,

    pub id: u64,

    /// Output as JSON instead of TSV
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `edit` subcommand.
#[derive(Parser, Debug)]
pub struct EditArgs {
    pub kind: EditableKind,

    pub id: u64,

    /// Field assignment, e.g. --set name=Pool --set servers=[1,2]
    #[arg(long = "set", value_parser = parse_assignment, required = true)]
    pub assignments: Vec<(String, String)>,

    /// Conflict resolution
    #[arg(long, value_enum, default_value_t)]
    pub on_conflict: OnConflict,
}

/// Arguments for the `streaming-settings` subcommand.
#[derive(Parser, Debug)]
pub struct StreamingArgs {
    /// Enable or disable streaming
    #[arg(long)]
    pub enabled: Option<bool>,

    /// Extra join parameters; pass an empty string to clear
    #[arg(long)]
    pub join_parameters: Option<String>,

    /// New default pause image
    #[arg(long, conflicts_with = "delete_pause_image")]
    pub pause_image: Option<PathBuf>,

    /// Remove the default pause image
    #[arg(long)]
    pub delete_pause_image: bool,

    /// New player stylesheet
    #[arg(long, conflicts_with = "delete_css")]
    pub css: Option<PathBuf>,

    /// Remove the player stylesheet
    #[arg(long)]
    pub delete_css: bool,
}

fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{s}`"))?;
    if key.is_empty() {
        return Err(format!("empty field name in `{s}`"));
    }
    Ok((key.to_string(), value.to_string()))
}
