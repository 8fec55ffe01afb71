//! Remote collection fetching.

use std::future::Future;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::query::QueryState;
use crate::resource::Resource;
use crate::rest::ConsoleHttpClient;
use crate::types::{Page, Recording, RoomMeeting, RoomMember};

/// Result of fetching one page. Failures carry a [`crate::FailureKind`]
/// through [`crate::ConsoleError::kind`].
pub type FetchOutcome<T> = Result<Page<T>>;

/// Source of collection pages. One call is one network round trip.
pub trait CollectionFetcher<T> {
    fn fetch(&self, query: &QueryState) -> impl Future<Output = FetchOutcome<T>> + Send;
}

/// Collection endpoint backed by the REST API.
#[derive(Debug, Clone)]
pub struct HttpCollection<T> {
    client: ConsoleHttpClient,
    path: String,
    filter_key: String,
    _item: PhantomData<fn() -> T>,
}

impl<T> HttpCollection<T> {
    pub fn new(client: ConsoleHttpClient, path: impl Into<String>, filter_key: &str) -> Self {
        Self {
            client,
            path: path.into(),
            filter_key: filter_key.to_string(),
            _item: PhantomData,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl<R: Resource> HttpCollection<R> {
    pub fn for_resource(client: ConsoleHttpClient) -> Self {
        Self::new(client, R::COLLECTION_PATH, R::FILTER_KEY)
    }
}

impl HttpCollection<Recording> {
    pub fn room_recordings(client: ConsoleHttpClient, room_id: &str) -> Self {
        Self::new(client, format!("/rooms/{room_id}/recordings"), "search")
    }
}

impl HttpCollection<RoomMeeting> {
    pub fn room_meetings(client: ConsoleHttpClient, room_id: &str) -> Self {
        Self::new(client, format!("/rooms/{room_id}/meetings"), "search")
    }
}

impl HttpCollection<RoomMember> {
    pub fn room_members(client: ConsoleHttpClient, room_id: &str) -> Self {
        Self::new(client, format!("/rooms/{room_id}/member"), "search")
    }
}

impl<T: DeserializeOwned + Send> CollectionFetcher<T> for HttpCollection<T> {
    async fn fetch(&self, query: &QueryState) -> FetchOutcome<T> {
        self.client
            .get(&self.path, &query.to_query(&self.filter_key))
            .await
    }
}
