use mongodb::bson::{Bson, DateTime};
use serde::{Deserialize, Serialize};

/// Visibility tag carried by posts published to the reception feed.
pub const RECEPTION_VISIBILITY: &str = "mottagning";

/// A post as stored in the `posts` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Slug chosen at publish time; older documents may carry an ObjectId.
    #[serde(rename = "_id")]
    pub id: Bson,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub author: String,
    pub publish_date: DateTime,
    #[serde(default)]
    pub visibility: String,
}

impl Post {
    pub fn id_string(&self) -> String {
        match &self.id {
            Bson::String(s) => s.clone(),
            Bson::ObjectId(oid) => oid.to_hex(),
            other => other.to_string(),
        }
    }

    pub fn is_reception_post(&self) -> bool {
        self.visibility == RECEPTION_VISIBILITY
    }
}

/// Seconds-based timestamp in the `{ _seconds, _nanoseconds }` shape the
/// reception page sorts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishDate {
    #[serde(rename = "_seconds")]
    pub seconds: i64,
    #[serde(rename = "_nanoseconds")]
    pub nanoseconds: u32,
}

impl From<DateTime> for PublishDate {
    fn from(value: DateTime) -> Self {
        let millis = value.timestamp_millis();
        Self {
            seconds: millis.div_euclid(1000),
            nanoseconds: (millis.rem_euclid(1000) * 1_000_000) as u32,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub body: String,
    pub image: String,
    pub author: String,
    pub publish_date: PublishDate,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id_string(),
            publish_date: post.publish_date.into(),
            title: post.title,
            subtitle: post.subtitle,
            body: post.body,
            image: post.image,
            author: post.author,
        }
    }
}

/// Body of `GET /api/mottagning-password`.
#[derive(Debug, Clone, Serialize)]
pub struct FeedResponse {
    pub posts: Vec<PostResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
