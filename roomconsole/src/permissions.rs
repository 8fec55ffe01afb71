//! Read-only application context and the permission predicates that gate
//! actions in the console.

use tracing::debug;

use crate::error::{ConsoleError, Result};
use crate::rest::ConsoleHttpClient;
use crate::types::*;

/// Who is logged in and which features are on. Built once and passed to
/// every view; never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct AppContext {
    pub user: Option<CurrentUser>,
    pub settings: ConsoleSettings,
}

impl AppContext {
    pub fn new(user: Option<CurrentUser>, settings: ConsoleSettings) -> Self {
        Self { user, settings }
    }

    /// Fetch the current user and settings. A 401 yields a guest context.
    pub async fn load(client: &ConsoleHttpClient) -> Result<Self> {
        let user = match client.current_user().await {
            Ok(user) => Some(user),
            Err(ConsoleError::Unauthorized) => {
                debug!("no session, continuing as guest");
                None
            }
            Err(e) => return Err(e),
        };
        let settings = client.settings().await?;
        Ok(Self { user, settings })
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn can(&self, permission: &str) -> bool {
        self.user
            .as_ref()
            .is_some_and(|u| u.permissions.contains(permission))
    }

    fn is_self(&self, user_id: u64) -> bool {
        self.user.as_ref().is_some_and(|u| u.id == user_id)
    }
}

/// The acting user's relation to one room.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoomAccess {
    pub is_owner: bool,
    pub is_co_owner: bool,
    pub is_moderator: bool,
}

// --- Roles ---

pub fn can_view_roles(ctx: &AppContext) -> bool {
    ctx.can("roles.viewAny")
}

pub fn can_create_role(ctx: &AppContext) -> bool {
    ctx.can("roles.create")
}

/// Superuser roles are fixed.
pub fn can_update_role(ctx: &AppContext, role: &Role) -> bool {
    ctx.can("roles.update") && !role.superuser
}

pub fn can_delete_role(ctx: &AppContext, role: &Role) -> bool {
    ctx.can("roles.delete") && !role.superuser
}

// --- Servers ---

pub fn can_view_servers(ctx: &AppContext) -> bool {
    ctx.can("servers.viewAny")
}

pub fn can_create_server(ctx: &AppContext) -> bool {
    ctx.can("servers.create")
}

pub fn can_update_server(ctx: &AppContext, _server: &Server) -> bool {
    ctx.can("servers.update")
}

/// Only disabled servers can be removed.
pub fn can_delete_server(ctx: &AppContext, server: &Server) -> bool {
    ctx.can("servers.delete") && server.status == ServerStatus::Disabled
}

// --- Server pools ---

pub fn can_view_server_pools(ctx: &AppContext) -> bool {
    ctx.can("serverPools.viewAny")
}

pub fn can_create_server_pool(ctx: &AppContext) -> bool {
    ctx.can("serverPools.create")
}

pub fn can_update_server_pool(ctx: &AppContext, _pool: &ServerPool) -> bool {
    ctx.can("serverPools.update")
}

pub fn can_delete_server_pool(ctx: &AppContext, pool: &ServerPool) -> bool {
    ctx.can("serverPools.delete") && pool.servers_count == 0
}

// --- Users ---

pub fn can_view_users(ctx: &AppContext) -> bool {
    ctx.can("users.viewAny")
}

pub fn can_create_user(ctx: &AppContext) -> bool {
    ctx.can("users.create")
}

/// Everyone may edit their own profile.
pub fn can_update_user(ctx: &AppContext, user: &User) -> bool {
    ctx.can("users.update") || ctx.is_self(user.id)
}

pub fn can_delete_user(ctx: &AppContext, user: &User) -> bool {
    ctx.can("users.delete") && !ctx.is_self(user.id)
}

// --- Room types ---

pub fn can_view_room_types(ctx: &AppContext) -> bool {
    ctx.can("roomTypes.viewAny")
}

pub fn can_update_room_type(ctx: &AppContext, _room_type: &RoomType) -> bool {
    ctx.can("roomTypes.update")
}

pub fn can_delete_room_type(ctx: &AppContext, _room_type: &RoomType) -> bool {
    ctx.can("roomTypes.delete")
}

// --- Rooms ---

fn can_manage_room(ctx: &AppContext, room: &RoomAccess) -> bool {
    room.is_owner || room.is_co_owner || ctx.can("rooms.manage")
}

pub fn can_manage_recordings(ctx: &AppContext, room: &RoomAccess) -> bool {
    ctx.settings.recording.enabled && can_manage_room(ctx, room)
}

pub fn can_manage_members(ctx: &AppContext, room: &RoomAccess) -> bool {
    can_manage_room(ctx, room)
}

pub fn can_view_room_history(ctx: &AppContext, room: &RoomAccess) -> bool {
    can_manage_room(ctx, room) || ctx.can("rooms.viewAll")
}

pub fn can_manage_streaming_settings(ctx: &AppContext) -> bool {
    ctx.settings.streaming.enabled && ctx.can("settings.manage")
}

/// Moderators may start, stop and pause the stream of a running meeting.
pub fn can_control_streaming(ctx: &AppContext, room: &RoomAccess) -> bool {
    ctx.settings.streaming.enabled && (room.is_moderator || can_manage_room(ctx, room))
}
