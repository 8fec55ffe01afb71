//! Addressable top-level resources of the console API.

use std::fmt::Display;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::types::*;

/// A resource with its own collection endpoint and entity endpoints.
pub trait Resource: DeserializeOwned + Serialize + Clone + Send + Sync + 'static {
    type Id: Display + Clone + PartialEq + Send + Sync;

    /// Collection path relative to the API prefix, e.g. `/roles`.
    const COLLECTION_PATH: &'static str;
    /// Query key the free-text filter is sent under.
    const FILTER_KEY: &'static str = "name";
    /// Column the index view sorts by when first opened.
    const DEFAULT_SORT: Option<&'static str> = Some("name");
    /// Human-readable singular, used in notifications.
    const LABEL: &'static str;

    fn id(&self) -> Self::Id;

    /// Name shown in breadcrumbs and dialogs.
    fn display_name(&self) -> String;

    /// Concurrency token echoed back on writes.
    fn updated_at(&self) -> Option<&str> {
        None
    }

    fn entity_path(id: &Self::Id) -> String {
        format!("{}/{}", Self::COLLECTION_PATH, id)
    }
}

impl Resource for Role {
    type Id = u64;
    const COLLECTION_PATH: &'static str = "/roles";
    const LABEL: &'static str = "role";

    fn id(&self) -> u64 {
        self.id
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn updated_at(&self) -> Option<&str> {
        self.updated_at.as_deref()
    }
}

impl Resource for Server {
    type Id = u64;
    const COLLECTION_PATH: &'static str = "/servers";
    const LABEL: &'static str = "server";

    fn id(&self) -> u64 {
        self.id
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn updated_at(&self) -> Option<&str> {
        self.updated_at.as_deref()
    }
}

impl Resource for ServerPool {
    type Id = u64;
    const COLLECTION_PATH: &'static str = "/serverPools";
    const LABEL: &'static str = "server pool";

    fn id(&self) -> u64 {
        self.id
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn updated_at(&self) -> Option<&str> {
        self.updated_at.as_deref()
    }
}

impl Resource for User {
    type Id = u64;
    const COLLECTION_PATH: &'static str = "/users";
    const DEFAULT_SORT: Option<&'static str> = Some("firstname");
    const LABEL: &'static str = "user";

    fn id(&self) -> u64 {
        self.id
    }

    fn display_name(&self) -> String {
        self.full_name()
    }

    fn updated_at(&self) -> Option<&str> {
        self.updated_at.as_deref()
    }
}

impl Resource for RoomType {
    type Id = u64;
    const COLLECTION_PATH: &'static str = "/roomTypes";
    const LABEL: &'static str = "room type";

    fn id(&self) -> u64 {
        self.id
    }

    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn updated_at(&self) -> Option<&str> {
        self.updated_at.as_deref()
    }
}
