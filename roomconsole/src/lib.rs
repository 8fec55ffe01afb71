pub mod config;
pub mod controller;
pub mod edit;
pub mod error;
pub mod fetch;
pub mod permissions;
pub mod policy;
pub mod query;
pub mod reconcile;
pub mod resource;
pub mod rest;
pub mod settings;
pub mod types;

// ---- Top-level re-exports for ergonomic usage ----

// Client + config
pub use config::ConsoleConfig;
pub use error::{ConsoleError, FailureKind, Result};
pub use rest::endpoints::StreamingAction;
pub use rest::ConsoleHttpClient;

// Collections
pub use controller::{CollectionController, Completion, LoadError, Pagination, RequestTicket};
pub use fetch::{CollectionFetcher, FetchOutcome, HttpCollection};
pub use query::QueryState;
pub use reconcile::{reconcile, EmptyState, Reconciliation};
pub use resource::Resource;

// Editing
pub use edit::{EditSession, EditState, Editable, EntityWriter};

// Failure handling
pub use policy::{Directive, Failure, FailureSite, Navigation, Toast};

// Permissions
pub use permissions::{AppContext, RoomAccess};

// File settings
pub use settings::{
    FileField, FormValue, MultipartSettings, RoomStreamingConfigForm, RoomTypeStreamingForm,
    StreamingSettingsForm,
};

// Entities
pub use types::{
    CurrentUser, Page, PageMeta, Recording, RecordingAccess, Role, RoomMeeting, RoomMember,
    RoomType, RoomUserRole, Server, ServerHealth, ServerPool, ServerStatus, SortDirection,
    StreamingSettings, User,
};
