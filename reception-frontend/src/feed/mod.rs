//! Reception feed: fetching the posts behind the credential and putting them
//! in display order.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Deserializer};
use std::sync::Arc;
use thiserror::Error;

/// Firestore-style timestamp; only `seconds` takes part in ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PublishDate {
    #[serde(rename = "_seconds")]
    pub seconds: i64,
    #[serde(rename = "_nanoseconds", default)]
    pub nanoseconds: u32,
}

/// One published announcement. Missing and `null` fields read as empty.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub publish_date: PublishDate,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subtitle: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub author: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Raw feed response: `{ posts?, error? }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedPayload {
    #[serde(default)]
    pub posts: Option<Vec<FeedItem>>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed unavailable: collaborator responded with {0}")]
    Unavailable(StatusCode),

    #[error("feed request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("feed response could not be decoded: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Where feed payloads come from.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_feed(&self, credential: &str) -> Result<FeedPayload, FeedError>;
}

/// Most recent first, by whole seconds. The sort is stable, so items sharing a
/// second keep the collaborator's order.
pub fn order_feed(items: &mut [FeedItem]) {
    items.sort_by(|a, b| b.publish_date.seconds.cmp(&a.publish_date.seconds));
}

/// Single-shot feed fetch; call again to refresh.
#[derive(Clone)]
pub struct FeedLoader {
    source: Arc<dyn FeedSource>,
}

impl FeedLoader {
    pub fn new(source: Arc<dyn FeedSource>) -> Self {
        Self { source }
    }

    pub async fn load(&self, credential: &str) -> Result<Vec<FeedItem>, FeedError> {
        let payload = self.source.fetch_feed(credential).await?;

        if let Some(error) = payload.error.as_deref().filter(|e| !e.is_empty()) {
            // Partial response: keep whatever posts came with it.
            tracing::error!(error = %error, "Feed collaborator reported an error");
        }

        let mut posts = payload.posts.unwrap_or_default();
        order_feed(&mut posts);
        Ok(posts)
    }

    /// [`load`](Self::load), with any failure logged and replaced by an empty feed.
    pub async fn load_or_empty(&self, credential: &str) -> Vec<FeedItem> {
        match self.load(credential).await {
            Ok(posts) => posts,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load reception feed");
                Vec::new()
            }
        }
    }
}
