//! Integration tests for JSON deserialization of the console API types.
//!
//! Each test parses a realistic fixture and checks the fields the client
//! relies on.

use roomconsole::types::*;

// ---------------------------------------------------------------------------
// Page / PageMeta
// ---------------------------------------------------------------------------

#[test]
fn test_page_meta_with_unfiltered_total() {
    let json = r#"{
        "data": [
            {
                "id": 1, "name": "Admin", "superuser": true,
                "updated_at": "2024-01-01T12:00:00.000000Z"
            },
            { "id": 2, "name": "User", "superuser": false, "room_limit": -1, "updated_at": null }
        ],
        "meta": {
            "current_page": 1,
            "from": 1,
            "last_page": 3,
            "per_page": 2,
            "to": 2,
            "total": 6,
            "total_no_filter": 8
        }
    }"#;

    let page: Page<Role> = serde_json::from_str(json).unwrap();
    assert_eq!(page.data.len(), 2);
    assert!(page.data[0].superuser);
    assert_eq!(page.data[1].room_limit, Some(-1));
    assert_eq!(page.data[1].updated_at, None);
    assert_eq!(page.meta.last_page, 3);
    assert_eq!(page.meta.total, 6);
    assert_eq!(page.meta.total_unfiltered, Some(8));
}

#[test]
fn test_page_meta_without_rows() {
    let json = r#"{
        "current_page": 2,
        "from": null,
        "last_page": 1,
        "per_page": 10,
        "to": null,
        "total": 2
    }"#;

    let meta: PageMeta = serde_json::from_str(json).unwrap();
    assert_eq!(meta.from, None);
    assert_eq!(meta.to, None);
    assert_eq!(meta.total_unfiltered, None);

    // Omitted on the way out as well.
    let out = serde_json::to_value(&meta).unwrap();
    assert!(out.get("total_no_filter").is_none());
}

// ---------------------------------------------------------------------------
// Servers and server pools
// ---------------------------------------------------------------------------

#[test]
fn test_server() {
    let json = r#"{
        "id": 1,
        "name": "Server 01",
        "description": "Testserver 01",
        "base_url": "https://server1.example.org/bigbluebutton",
        "secret": "123456789",
        "strength": 1,
        "status": "enabled",
        "health": "online",
        "participant_count": 14,
        "listener_count": 7,
        "voice_participant_count": 7,
        "video_count": 7,
        "meeting_count": 3,
        "version": "2.4.5",
        "updated_at": "2024-02-12T12:00:00.000000Z"
    }"#;

    let server: Server = serde_json::from_str(json).unwrap();
    assert_eq!(server.status, ServerStatus::Enabled);
    assert_eq!(server.health, Some(ServerHealth::Online));
    assert_eq!(server.meeting_count, Some(3));
    assert_eq!(server.version.as_deref(), Some("2.4.5"));
}

#[test]
fn test_server_without_usage() {
    let json = r#"{
        "id": 2,
        "name": "Server 02",
        "strength": 10,
        "status": "draining",
        "health": null
    }"#;

    let server: Server = serde_json::from_str(json).unwrap();
    assert_eq!(server.status, ServerStatus::Draining);
    assert_eq!(server.health, None);
    assert_eq!(server.participant_count, None);
}

#[test]
fn test_server_pool_with_servers() {
    let json = r#"{
        "data": {
            "id": 1,
            "name": "Pool 1",
            "description": "Pool for testing",
            "servers_count": 2,
            "servers": [
                { "id": 1, "name": "Server 01" },
                { "id": 2, "name": "Server 02" }
            ],
            "updated_at": "2024-01-01T08:00:00.000000Z"
        }
    }"#;

    let pool: Data<ServerPool> = serde_json::from_str(json).unwrap();
    assert_eq!(pool.data.servers_count, 2);
    assert_eq!(pool.data.servers[1].name, "Server 02");
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[test]
fn test_user_with_roles() {
    let json = r#"{
        "id": 2,
        "firstname": "Max",
        "lastname": "Doe",
        "email": "max@example.org",
        "authenticator": "ldap",
        "roles": [
            { "id": 1, "name": "Admin", "automatic": true },
            { "id": 3, "name": "Staff" }
        ],
        "user_locale": "de",
        "timezone": "Europe/Berlin",
        "updated_at": "2024-01-01T08:00:00.000000Z"
    }"#;

    let user: User = serde_json::from_str(json).unwrap();
    assert_eq!(user.full_name(), "Max Doe");
    assert!(user.roles[0].automatic);
    assert!(!user.roles[1].automatic);
    assert_eq!(user.image, None);
}

#[test]
fn test_current_user_permissions() {
    let json = r#"{
        "id": 1,
        "firstname": "John",
        "lastname": "Doe",
        "permissions": ["roles.viewAny", "roles.delete", "roles.viewAny"]
    }"#;

    let user: CurrentUser = serde_json::from_str(json).unwrap();
    assert_eq!(user.permissions.len(), 2);
    assert!(user.permissions.contains("roles.delete"));
}

// ---------------------------------------------------------------------------
// Rooms
// ---------------------------------------------------------------------------

#[test]
fn test_room_type() {
    let json = r##"{
        "id": 1,
        "name": "Lecture",
        "color": "#80BA27",
        "server_pool": { "id": 1, "name": "Pool 1" },
        "max_participants": 50,
        "max_duration": 90
    }"##;

    let room_type: RoomType = serde_json::from_str(json).unwrap();
    assert_eq!(room_type.server_pool.unwrap().name, "Pool 1");
    assert_eq!(room_type.max_duration, Some(90));
}

#[test]
fn test_room_meeting_running() {
    let json = r#"{
        "id": "9d2b1c1e-4b7b-4c9f-9a8f-9b4b6b6b6b6b",
        "start": "2024-03-01T08:00:00Z",
        "end": null,
        "detached": null,
        "server_connection_issues": false
    }"#;

    let meeting: RoomMeeting = serde_json::from_str(json).unwrap();
    assert_eq!(meeting.end, None);
    assert_eq!(meeting.start.timestamp(), 1_709_280_000);
}

#[test]
fn test_room_member_roles() {
    let json = r#"[
        {
            "id": 5, "firstname": "Laura", "lastname": "Rivera",
            "email": "laura@example.org", "role": "co_owner"
        },
        {
            "id": 6, "firstname": "Juan", "lastname": "Walter",
            "email": "juan@example.org", "role": "guest", "image": null
        }
    ]"#;

    let members: Vec<RoomMember> = serde_json::from_str(json).unwrap();
    assert_eq!(members[0].role, RoomUserRole::CoOwner);
    assert_eq!(members[1].role, RoomUserRole::Guest);
}

// ---------------------------------------------------------------------------
// Streaming
// ---------------------------------------------------------------------------

#[test]
fn test_streaming_status() {
    let json = r#"{
        "enabled_for_current_meeting": true,
        "status": "running",
        "fps": 30
    }"#;

    let status: RoomStreamingStatus = serde_json::from_str(json).unwrap();
    assert_eq!(status.status, Some(StreamingState::Running));
    assert_eq!(status.fps, Some(30));
}

#[test]
fn test_console_settings_defaults() {
    let settings: ConsoleSettings = serde_json::from_str("{}").unwrap();
    assert!(!settings.streaming.enabled);
    assert!(!settings.recording.enabled);
}
