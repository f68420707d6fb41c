use crate::models::Post;
use async_trait::async_trait;
use service_core::error::AppError;

/// Posts read for the reception feed.
///
/// `skipped` counts stored documents that could not be decoded; the feed is
/// still served from the rest.
#[derive(Debug, Default)]
pub struct PostBatch {
    pub posts: Vec<Post>,
    pub skipped: usize,
}

#[async_trait]
pub trait PostStore: Send + Sync {
    /// Every post published with reception visibility, in storage order.
    async fn reception_posts(&self) -> Result<PostBatch, AppError>;

    async fn health_check(&self) -> Result<(), AppError>;
}

/// Fixed in-memory post set.
#[derive(Debug, Default, Clone)]
pub struct MemoryPostStore {
    posts: Vec<Post>,
}

impl MemoryPostStore {
    pub fn new(posts: Vec<Post>) -> Self {
        Self { posts }
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn reception_posts(&self) -> Result<PostBatch, AppError> {
        Ok(PostBatch {
            posts: self
                .posts
                .iter()
                .filter(|post| post.is_reception_post())
                .cloned()
                .collect(),
            skipped: 0,
        })
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}
