//! What the UI does about a failed request.
//!
//! Every resource reacts to failures the same way: redirect with a toast,
//! inline field errors, the conflict dialog, or a retryable toast. The
//! choice depends only on the failure kind and where it happened.

use std::fmt;

use thiserror::Error;
use url::form_urlencoded;

use crate::error::{ConsoleError, FailureKind};

/// Where a failed request was issued from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureSite {
    /// First load of an index view.
    ViewEntry,
    /// Later loads of an index view (paging, sorting, searching, retry).
    ListRefresh,
    /// An action on an item inside a list (delete a recording, ...).
    SubAction,
    /// Loading a single entity for display or editing.
    EntityLoad,
    /// Writing a single entity.
    EntitySave,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Log in again, then come back to `redirect`.
    Login { redirect: String },
    /// A safe default view.
    Home,
    /// The index view of the resource that failed.
    Index,
}

impl Navigation {
    /// Route for the navigation; `index` is the resource's index route.
    pub fn route(&self, index: &str) -> String {
        match self {
            Navigation::Login { redirect } => {
                let query: String = form_urlencoded::Serializer::new(String::new())
                    .append_pair("redirect", redirect)
                    .finish();
                format!("/login?{query}")
            }
            Navigation::Home => "/".to_string(),
            Navigation::Index => index.to_string(),
        }
    }
}

/// A transient global notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub status: Option<u16>,
}

impl fmt::Display for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} ({status})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Reaction to a failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directive {
    pub navigate: Option<Navigation>,
    pub toast: Option<Toast>,
    /// Reload the surrounding list.
    pub reload_list: bool,
    /// Offer an explicit retry control.
    pub retry: bool,
    /// Show the per-field errors inline.
    pub inline_errors: bool,
    /// Open the stale-entity dialog.
    pub conflict: bool,
}

impl Directive {
    pub fn none() -> Self {
        Self::default()
    }

    fn toast(error: &ConsoleError) -> Option<Toast> {
        Some(Toast {
            message: server_message(error),
            status: error.status(),
        })
    }
}

/// A failure together with the reaction chosen for it.
#[derive(Error, Debug)]
#[error("{error}")]
pub struct Failure {
    #[source]
    pub error: ConsoleError,
    pub directive: Directive,
}

impl Failure {
    pub fn new(error: ConsoleError, site: FailureSite, return_path: &str) -> Self {
        let directive = resolve(&error, site, return_path);
        Self { error, directive }
    }
}

fn server_message(error: &ConsoleError) -> String {
    match error {
        ConsoleError::Forbidden { message }
        | ConsoleError::NotFound { message }
        | ConsoleError::Conflict { message, .. }
        | ConsoleError::Validation { message, .. }
        | ConsoleError::Server { message, .. }
            if !message.is_empty() =>
        {
            message.clone()
        }
        other => other.to_string(),
    }
}

/// Choose the reaction to `error` raised at `site`.
///
/// `return_path` is where a login redirect should come back to.
pub fn resolve(error: &ConsoleError, site: FailureSite, return_path: &str) -> Directive {
    use FailureSite::*;

    match (error.kind(), site) {
        (FailureKind::Unauthorized, _) => Directive {
            navigate: Some(Navigation::Login {
                redirect: return_path.to_string(),
            }),
            toast: Directive::toast(error),
            ..Directive::none()
        },
        (FailureKind::Forbidden, SubAction | EntitySave) => Directive {
            toast: Directive::toast(error),
            reload_list: true,
            ..Directive::none()
        },
        (FailureKind::Forbidden, _) => Directive {
            navigate: Some(Navigation::Home),
            toast: Directive::toast(error),
            ..Directive::none()
        },
        (FailureKind::NotFound, EntityLoad | EntitySave) => Directive {
            navigate: Some(Navigation::Index),
            toast: Directive::toast(error),
            ..Directive::none()
        },
        (FailureKind::NotFound, SubAction) => Directive {
            toast: Directive::toast(error),
            reload_list: true,
            ..Directive::none()
        },
        (FailureKind::Conflict, EntitySave) => Directive {
            conflict: true,
            ..Directive::none()
        },
        (FailureKind::ValidationFailed, EntitySave) => Directive {
            inline_errors: true,
            ..Directive::none()
        },
        _ => Directive {
            toast: Directive::toast(error),
            retry: true,
            ..Directive::none()
        },
    }
}
