use reqwest::multipart::Form;
use serde::Serialize;

use crate::error::Result;
use crate::query::QueryState;
use crate::resource::Resource;
use crate::rest::ConsoleHttpClient;
use crate::types::*;

impl ConsoleHttpClient {
    // --- Generic resources ---

    /// GET {collection}?page=&sort_by=&sort_direction=&{filter}= - One page.
    pub async fn list<R: Resource>(&self, query: &QueryState) -> Result<Page<R>> {
        self.get(R::COLLECTION_PATH, &query.to_query(R::FILTER_KEY)).await
    }

    /// GET {collection}/{id} - Single entity.
    pub async fn fetch_one<R: Resource>(&self, id: &R::Id) -> Result<R> {
        let wrapped: Data<R> = self.get(&R::entity_path(id), &[]).await?;
        Ok(wrapped.data)
    }

    /// POST {collection} - Create an entity.
    pub async fn create<R: Resource, B: Serialize + ?Sized>(&self, body: &B) -> Result<R> {
        let wrapped: Data<R> = self.post_json(R::COLLECTION_PATH, body).await?;
        Ok(wrapped.data)
    }

    /// PUT {collection}/{id} - Update an entity. Answers 428 when the
    /// `updated_at` in `body` is older than the stored one.
    pub async fn update<R: Resource, B: Serialize + ?Sized>(
        &self,
        id: &R::Id,
        body: &B,
    ) -> Result<R> {
        let wrapped: Data<R> = self.put_json(&R::entity_path(id), body).await?;
        Ok(wrapped.data)
    }

    /// DELETE {collection}/{id}
    pub async fn delete_entity<R: Resource>(&self, id: &R::Id) -> Result<()> {
        self.delete(&R::entity_path(id), None).await
    }

    // --- Session / application ---

    /// GET /currentUser - The authenticated user with permissions.
    pub async fn current_user(&self) -> Result<CurrentUser> {
        let wrapped: Data<CurrentUser> = self.get("/currentUser", &[]).await?;
        Ok(wrapped.data)
    }

    /// GET /settings - Feature flags.
    pub async fn settings(&self) -> Result<ConsoleSettings> {
        let wrapped: Data<ConsoleSettings> = self.get("/settings", &[]).await?;
        Ok(wrapped.data)
    }

    // --- Rooms ---

    /// GET /rooms/{room_id}/recordings - One page of recordings.
    pub async fn room_recordings(
        &self,
        room_id: &str,
        query: &QueryState,
    ) -> Result<Page<Recording>> {
        self.get(&format!("/rooms/{room_id}/recordings"), &query.to_query("search")).await
    }

    /// DELETE /rooms/{room_id}/recordings/{recording_id}
    pub async fn delete_recording(&self, room_id: &str, recording_id: &str) -> Result<()> {
        self.delete(&format!("/rooms/{room_id}/recordings/{recording_id}"), None).await
    }

    /// GET /rooms/{room_id}/meetings - One page of the meeting history.
    pub async fn room_meetings(
        &self,
        room_id: &str,
        query: &QueryState,
    ) -> Result<Page<RoomMeeting>> {
        self.get(&format!("/rooms/{room_id}/meetings"), &query.to_query("search")).await
    }

    /// GET /rooms/{room_id}/member - One page of room members.
    pub async fn room_members(
        &self,
        room_id: &str,
        query: &QueryState,
    ) -> Result<Page<RoomMember>> {
        self.get(&format!("/rooms/{room_id}/member"), &query.to_query("search")).await
    }

    /// PUT /rooms/{room_id}/member/{user_id} - Change a member's role.
    pub async fn update_member_role(
        &self,
        room_id: &str,
        user_id: u64,
        role: RoomUserRole,
    ) -> Result<()> {
        let _: serde_json::Value = self
            .put_json(
                &format!("/rooms/{room_id}/member/{user_id}"),
                &serde_json::json!({ "role": role }),
            )
            .await
            .or_else(empty_body)?;
        Ok(())
    }

    /// DELETE /rooms/{room_id}/member/{user_id}
    pub async fn remove_member(&self, room_id: &str, user_id: u64) -> Result<()> {
        self.delete(&format!("/rooms/{room_id}/member/{user_id}"), None).await
    }

    // --- Streaming ---

    /// GET /streaming - System-wide streaming settings.
    pub async fn streaming_settings(&self) -> Result<StreamingSettings> {
        let wrapped: Data<StreamingSettings> = self.get("/streaming", &[]).await?;
        Ok(wrapped.data)
    }

    /// POST /streaming (multipart, spoofed PUT).
    pub async fn update_streaming_settings(&self, form: Form) -> Result<StreamingSettings> {
        let wrapped: Data<StreamingSettings> = self.post_multipart("/streaming", form).await?;
        Ok(wrapped.data)
    }

    /// GET /roomTypes/{id}/streaming
    pub async fn room_type_streaming_settings(
        &self,
        room_type_id: u64,
    ) -> Result<RoomTypeStreamingSettings> {
        let wrapped: Data<RoomTypeStreamingSettings> = self
            .get(&format!("/roomTypes/{room_type_id}/streaming"), &[])
            .await?;
        Ok(wrapped.data)
    }

    /// POST /roomTypes/{id}/streaming (multipart, spoofed PUT).
    pub async fn update_room_type_streaming_settings(
        &self,
        room_type_id: u64,
        form: Form,
    ) -> Result<RoomTypeStreamingSettings> {
        let wrapped: Data<RoomTypeStreamingSettings> = self
            .post_multipart(&format!("/roomTypes/{room_type_id}/streaming"), form)
            .await?;
        Ok(wrapped.data)
    }

    /// GET /rooms/{room_id}/streaming/config
    pub async fn room_streaming_config(&self, room_id: &str) -> Result<RoomStreamingConfig> {
        let wrapped: Data<RoomStreamingConfig> = self
            .get(&format!("/rooms/{room_id}/streaming/config"), &[])
            .await?;
        Ok(wrapped.data)
    }

    /// POST /rooms/{room_id}/streaming/config (multipart, spoofed PUT).
    pub async fn update_room_streaming_config(
        &self,
        room_id: &str,
        form: Form,
    ) -> Result<RoomStreamingConfig> {
        let wrapped: Data<RoomStreamingConfig> = self
            .post_multipart(&format!("/rooms/{room_id}/streaming/config"), form)
            .await?;
        Ok(wrapped.data)
    }

    /// GET /rooms/{room_id}/streaming/status
    pub async fn room_streaming_status(&self, room_id: &str) -> Result<RoomStreamingStatus> {
        let wrapped: Data<RoomStreamingStatus> = self
            .get(&format!("/rooms/{room_id}/streaming/status"), &[])
            .await?;
        Ok(wrapped.data)
    }

    /// POST /rooms/{room_id}/streaming/{start|stop|pause|resume}
    pub async fn control_room_streaming(
        &self,
        room_id: &str,
        action: StreamingAction,
    ) -> Result<()> {
        self.post_empty(&format!("/rooms/{room_id}/streaming/{}", action.as_str())).await
    }
}

/// Control actions for a room's live stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamingAction {
    Start,
    Stop,
    Pause,
    Resume,
}

impl StreamingAction {
    pub fn as_str(self) -> &'static str {
        match self {
            StreamingAction::Start => "start",
            StreamingAction::Stop => "stop",
            StreamingAction::Pause => "pause",
            StreamingAction::Resume => "resume",
        }
    }
}

/// Accept an empty success body where a JSON document was expected.
fn empty_body(err: crate::error::ConsoleError) -> Result<serde_json::Value> {
    match err {
        crate::error::ConsoleError::Json(e) if e.is_eof() => Ok(serde_json::Value::Null),
        other => Err(other),
    }
}
