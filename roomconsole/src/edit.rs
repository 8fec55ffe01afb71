//! Edit-and-save flow for a single entity, including the stale-entity
//! dialog raised when the server rejects a write with 428.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::future::Future;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{ConsoleError, Result};
use crate::policy::{Directive, FailureSite};
use crate::resource::Resource;
use crate::rest::ConsoleHttpClient;
use crate::types::*;

/// An entity that can be edited through a form.
pub trait Editable: Resource {
    /// Form model, sent as the write payload.
    type Draft: Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync;

    fn to_draft(&self) -> Self::Draft;

    /// Replace the concurrency token carried by `draft`.
    fn set_token(draft: &mut Self::Draft, token: Option<String>);
}

impl Editable for Role {
    type Draft = RoleDraft;

    fn to_draft(&self) -> RoleDraft {
        RoleDraft {
            name: self.name.clone(),
            room_limit: self.room_limit,
            permissions: self.permissions.clone(),
            updated_at: self.updated_at.clone(),
        }
    }

    fn set_token(draft: &mut RoleDraft, token: Option<String>) {
        draft.updated_at = token;
    }
}

impl Editable for Server {
    type Draft = ServerDraft;

    fn to_draft(&self) -> ServerDraft {
        ServerDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            base_url: self.base_url.clone(),
            secret: self.secret.clone(),
            strength: self.strength,
            status: self.status,
            updated_at: self.updated_at.clone(),
        }
    }

    fn set_token(draft: &mut ServerDraft, token: Option<String>) {
        draft.updated_at = token;
    }
}

impl Editable for ServerPool {
    type Draft = ServerPoolDraft;

    fn to_draft(&self) -> ServerPoolDraft {
        ServerPoolDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            servers: self.servers.iter().map(|s| s.id).collect(),
            updated_at: self.updated_at.clone(),
        }
    }

    fn set_token(draft: &mut ServerPoolDraft, token: Option<String>) {
        draft.updated_at = token;
    }
}

impl Editable for User {
    type Draft = UserDraft;

    fn to_draft(&self) -> UserDraft {
        UserDraft {
            firstname: self.firstname.clone(),
            lastname: self.lastname.clone(),
            email: self.email.clone(),
            user_locale: self.user_locale.clone(),
            timezone: self.timezone.clone(),
            roles: self.roles.iter().map(|r| r.id).collect(),
            updated_at: self.updated_at.clone(),
        }
    }

    fn set_token(draft: &mut UserDraft, token: Option<String>) {
        draft.updated_at = token;
    }
}

/// Persists a draft and returns the stored entity.
pub trait EntityWriter<T: Editable> {
    fn write(&self, id: &T::Id, draft: &T::Draft) -> impl Future<Output = Result<T>> + Send;
}

impl<T: Editable> EntityWriter<T> for ConsoleHttpClient {
    async fn write(&self, id: &T::Id, draft: &T::Draft) -> Result<T> {
        self.update::<T, _>(id, draft).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState {
    Editing,
    Saving,
    Saved,
    ValidationFailed,
    /// The server holds a newer version; waiting for reload or overwrite.
    Conflict,
    ServerError,
    /// The entity was deleted elsewhere.
    Gone,
    /// The session expired; local edits were dropped.
    Unauthenticated,
}

impl EditState {
    fn accepts_edits(self) -> bool {
        matches!(
            self,
            EditState::Editing
                | EditState::Saved
                | EditState::ValidationFailed
                | EditState::ServerError
        )
    }
}

pub struct EditSession<T: Editable> {
    entity: T,
    draft: T::Draft,
    /// Payload of the write in flight, kept through a conflict for overwrite.
    pending: Option<T::Draft>,
    fresh: Option<T>,
    state: EditState,
    field_errors: BTreeMap<String, Vec<String>>,
    return_path: String,
}

impl<T: Editable> EditSession<T> {
    pub fn new(entity: T) -> Self {
        Self {
            draft: entity.to_draft(),
            entity,
            pending: None,
            fresh: None,
            state: EditState::Editing,
            field_errors: BTreeMap::new(),
            return_path: "/".to_string(),
        }
    }

    pub fn with_return_path(mut self, path: &str) -> Self {
        self.return_path = path.to_string();
        self
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    /// Last version of the entity known to be stored on the server.
    pub fn entity(&self) -> &T {
        &self.entity
    }

    /// Name for breadcrumbs and titles.
    pub fn display_name(&self) -> String {
        self.entity.display_name()
    }

    pub fn draft(&self) -> &T::Draft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> Result<&mut T::Draft> {
        if !self.state.accepts_edits() {
            return Err(self.invalid("edit"));
        }
        Ok(&mut self.draft)
    }

    /// Writes waiting to be sent or resolved.
    pub fn pending(&self) -> Option<&T::Draft> {
        self.pending.as_ref()
    }

    /// The server's copy while a conflict is open.
    pub fn conflicting_entity(&self) -> Option<&T> {
        self.fresh.as_ref()
    }

    pub fn field_errors(&self) -> &BTreeMap<String, Vec<String>> {
        &self.field_errors
    }

    fn invalid(&self, action: &str) -> ConsoleError {
        ConsoleError::InvalidState(format!("cannot {action} while {:?}", self.state))
    }

    /// Move to `Saving` and return the payload to send.
    pub fn begin_save(&mut self) -> Result<T::Draft> {
        if !self.state.accepts_edits() {
            return Err(self.invalid("save"));
        }
        let payload = self.draft.clone();
        self.pending = Some(payload.clone());
        self.state = EditState::Saving;
        Ok(payload)
    }

    /// Record the outcome of the write started by [`Self::begin_save`] or
    /// [`Self::overwrite`].
    pub fn finish_save(&mut self, result: Result<T>) -> Result<Directive> {
        if self.state != EditState::Saving {
            return Err(self.invalid("finish a save"));
        }

        let error = match result {
            Ok(saved) => {
                self.draft = saved.to_draft();
                self.entity = saved;
                self.pending = None;
                self.field_errors.clear();
                self.state = EditState::Saved;
                return Ok(Directive::none());
            }
            Err(error) => error,
        };

        // Field errors only ever describe the latest attempt.
        self.field_errors.clear();

        let error = match error {
            ConsoleError::Conflict { message, new_model } => {
                match serde_json::from_value::<T>(new_model) {
                    Ok(fresh) => {
                        warn!(
                            entity = T::LABEL,
                            id = %self.entity.id(),
                            "write rejected, entity changed on server"
                        );
                        self.fresh = Some(fresh);
                        self.state = EditState::Conflict;
                        return Ok(Directive {
                            conflict: true,
                            ..Directive::none()
                        });
                    }
                    Err(e) => ConsoleError::Server {
                        status: 428,
                        message: format!("{message} (unreadable model: {e})"),
                    },
                }
            }
            other => other,
        };

        self.pending = None;
        match &error {
            ConsoleError::Validation { errors, .. } => {
                self.field_errors = errors.clone();
                self.state = EditState::ValidationFailed;
            }
            ConsoleError::NotFound { .. } => self.state = EditState::Gone,
            ConsoleError::Unauthorized => {
                self.draft = self.entity.to_draft();
                self.state = EditState::Unauthenticated;
            }
            _ => self.state = EditState::ServerError,
        }
        Ok(crate::policy::resolve(
            &error,
            FailureSite::EntitySave,
            &self.return_path,
        ))
    }

    /// Resolve a conflict by taking the server's copy. Local edits are lost.
    pub fn reload(&mut self) -> Result<()> {
        if self.state != EditState::Conflict {
            return Err(self.invalid("reload"));
        }
        let fresh = self.fresh.take().ok_or_else(|| self.invalid("reload"))?;
        info!(entity = T::LABEL, id = %fresh.id(), "conflict resolved by reload");
        self.draft = fresh.to_draft();
        self.entity = fresh;
        self.pending = None;
        self.state = EditState::Editing;
        Ok(())
    }

    /// Resolve a conflict by sending the local payload again. Every field
    /// is kept as submitted except the concurrency token, which is taken
    /// from the server's copy.
    pub fn overwrite(&mut self) -> Result<T::Draft> {
        if self.state != EditState::Conflict {
            return Err(self.invalid("overwrite"));
        }
        let mut payload = self.pending.clone().ok_or_else(|| self.invalid("overwrite"))?;
        let fresh = self.fresh.take().ok_or_else(|| self.invalid("overwrite"))?;
        T::set_token(&mut payload, fresh.updated_at().map(str::to_string));
        info!(entity = T::LABEL, id = %self.entity.id(), "conflict resolved by overwrite");
        self.pending = Some(payload.clone());
        self.state = EditState::Saving;
        Ok(payload)
    }

    /// Save the draft through `writer`.
    pub async fn save<W: EntityWriter<T>>(&mut self, writer: &W) -> Result<Directive> {
        let payload = self.begin_save()?;
        let result = writer.write(&self.entity.id(), &payload).await;
        self.finish_save(result)
    }

    /// Answer an open conflict with "overwrite" and send the write.
    pub async fn resolve_overwrite<W: EntityWriter<T>>(
        &mut self,
        writer: &W,
    ) -> Result<Directive> {
        let payload = self.overwrite()?;
        let result = writer.write(&self.entity.id(), &payload).await;
        self.finish_save(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Navigation;

    fn pool(name: &str, updated_at: &str) -> ServerPool {
        ServerPool {
            id: 1,
            name: name.into(),
            description: Some("Pool for testing".into()),
            servers_count: 1,
            servers: vec![ServerRef {
                id: 1,
                name: "Server 01".into(),
            }],
            updated_at: Some(updated_at.into()),
        }
    }

    fn conflict_with(fresh: &ServerPool) -> ConsoleError {
        ConsoleError::Conflict {
            message: "The server pool entity was updated in the meanwhile!".into(),
            new_model: serde_json::to_value(fresh).unwrap(),
        }
    }

    fn invalid_name() -> ConsoleError {
        ConsoleError::Validation {
            message: "The name field is required.".into(),
            errors: BTreeMap::from([(
                "name".into(),
                vec!["The name field is required.".into()],
            )]),
        }
    }

    #[test]
    fn successful_save_adopts_stored_entity() {
        let mut session = EditSession::new(pool("Pool 1", "2024-01-01T00:00:00.000000Z"));
        session.draft_mut().unwrap().name = "Pool 1 renamed".into();
        session.begin_save().unwrap();

        let stored = pool("Pool 1 renamed", "2024-01-02T00:00:00.000000Z");
        let directive = session.finish_save(Ok(stored.clone())).unwrap();

        assert_eq!(directive, Directive::none());
        assert_eq!(session.state(), EditState::Saved);
        assert_eq!(session.draft(), &stored.to_draft());
        assert_eq!(session.display_name(), "Pool 1 renamed");
        assert!(session.pending().is_none());
    }

    #[test]
    fn reload_takes_fresh_entity_and_drops_pending() {
        let mut session = EditSession::new(pool("Pool 1", "2024-01-01T00:00:00.000000Z"));
        session.draft_mut().unwrap().name = "Local name".into();
        session.begin_save().unwrap();

        let fresh = pool("Remote name", "2024-01-03T00:00:00.000000Z");
        let directive = session.finish_save(Err(conflict_with(&fresh))).unwrap();
        assert!(directive.conflict);
        assert_eq!(session.state(), EditState::Conflict);
        assert_eq!(session.conflicting_entity(), Some(&fresh));
        assert!(session.draft_mut().is_err());

        session.reload().unwrap();
        assert_eq!(session.state(), EditState::Editing);
        assert_eq!(session.draft(), &fresh.to_draft());
        assert_eq!(session.display_name(), "Remote name");
        assert!(session.pending().is_none());
        assert!(session.conflicting_entity().is_none());
    }

    #[test]
    fn overwrite_resends_local_payload_with_fresh_token() {
        let mut session = EditSession::new(pool("Pool 1", "2024-01-01T00:00:00.000000Z"));
        session.draft_mut().unwrap().name = "Local name".into();
        let sent = session.begin_save().unwrap();

        let fresh = pool("Remote name", "2024-01-03T00:00:00.000000Z");
        session.finish_save(Err(conflict_with(&fresh))).unwrap();

        let resent = session.overwrite().unwrap();
        assert_eq!(resent.name, "Local name");
        assert_eq!(resent.servers, sent.servers);
        assert_eq!(resent.description, sent.description);
        assert_eq!(resent.updated_at.as_deref(), Some("2024-01-03T00:00:00.000000Z"));
        assert_eq!(session.pending(), Some(&resent));
        assert!(session.conflicting_entity().is_none());
        assert_eq!(session.state(), EditState::Saving);

        // A second conflict picks up the newer token again.
        let newer = pool("Remote again", "2024-01-04T00:00:00.000000Z");
        session.finish_save(Err(conflict_with(&newer))).unwrap();
        assert_eq!(session.state(), EditState::Conflict);
        let resent = session.overwrite().unwrap();
        assert_eq!(resent.name, "Local name");
        assert_eq!(resent.updated_at.as_deref(), Some("2024-01-04T00:00:00.000000Z"));
    }

    #[test]
    fn field_errors_do_not_survive_next_attempt() {
        let mut session = EditSession::new(pool("Pool 1", "2024-01-01T00:00:00.000000Z"));
        session.begin_save().unwrap();
        let directive = session.finish_save(Err(invalid_name())).unwrap();
        assert!(directive.inline_errors);
        assert_eq!(session.state(), EditState::ValidationFailed);
        assert_eq!(session.field_errors()["name"], ["The name field is required."]);

        session.begin_save().unwrap();
        let directive = session
            .finish_save(Err(ConsoleError::Server {
                status: 500,
                message: "Test".into(),
            }))
            .unwrap();
        assert!(directive.retry);
        assert_eq!(session.state(), EditState::ServerError);
        assert!(session.field_errors().is_empty());

        session.begin_save().unwrap();
        session.finish_save(Err(invalid_name())).unwrap();
        session.begin_save().unwrap();
        let fresh = pool("Remote", "2024-01-09T00:00:00.000000Z");
        session.finish_save(Err(conflict_with(&fresh))).unwrap();
        assert!(session.field_errors().is_empty());
    }

    #[test]
    fn deleted_entity_sends_user_to_index() {
        let mut session = EditSession::new(pool("Pool 1", "2024-01-01T00:00:00.000000Z"));
        session.begin_save().unwrap();
        let directive = session
            .finish_save(Err(ConsoleError::NotFound {
                message: "No query results for model".into(),
            }))
            .unwrap();
        assert_eq!(directive.navigate, Some(Navigation::Index));
        assert_eq!(session.state(), EditState::Gone);
        assert!(session.begin_save().is_err());
    }

    #[test]
    fn expired_session_discards_edits() {
        let original = pool("Pool 1", "2024-01-01T00:00:00.000000Z");
        let mut session =
            EditSession::new(original.clone()).with_return_path("/admin/server_pools/1/edit");
        session.draft_mut().unwrap().name = "Unsaved".into();
        session.begin_save().unwrap();

        let directive = session.finish_save(Err(ConsoleError::Unauthorized)).unwrap();
        assert_eq!(
            directive.navigate,
            Some(Navigation::Login {
                redirect: "/admin/server_pools/1/edit".into()
            })
        );
        assert_eq!(session.state(), EditState::Unauthenticated);
        assert_eq!(session.draft(), &original.to_draft());
    }

    #[test]
    fn unreadable_conflict_model_is_a_server_error() {
        let mut session = EditSession::new(pool("Pool 1", "2024-01-01T00:00:00.000000Z"));
        session.begin_save().unwrap();
        let directive = session
            .finish_save(Err(ConsoleError::Conflict {
                message: "stale".into(),
                new_model: serde_json::json!({ "unexpected": true }),
            }))
            .unwrap();
        assert_eq!(session.state(), EditState::ServerError);
        assert_eq!(directive.toast.unwrap().status, Some(428));
    }

    #[test]
    fn resolution_requires_open_conflict() {
        let mut session = EditSession::new(pool("Pool 1", "2024-01-01T00:00:00.000000Z"));
        assert!(session.reload().is_err());
        assert!(session.overwrite().is_err());
        assert!(session.finish_save(Ok(pool("x", "y"))).is_err());
    }
}
