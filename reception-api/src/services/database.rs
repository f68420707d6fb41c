use crate::models::{Post, RECEPTION_VISIBILITY};
use crate::services::post_store::{PostBatch, PostStore};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{self, doc, Document},
    options::IndexOptions,
    Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(database = %database, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        let visibility_index = IndexModel::builder()
            .keys(doc! { "visibility": 1, "publishDate": -1 })
            .options(
                IndexOptions::builder()
                    .name("visibility_publish_date".to_string())
                    .build(),
            )
            .build();

        self.raw_posts()
            .create_index(visibility_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create visibility index on posts collection: {}", e);
                AppError::from(e)
            })?;
        tracing::info!("Created index on posts.(visibility, publishDate)");

        Ok(())
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    /// Posts as raw documents so one malformed entry does not fail the feed.
    pub fn raw_posts(&self) -> Collection<Document> {
        self.db.collection("posts")
    }
}

/// Reads reception posts from the `posts` collection.
#[derive(Clone)]
pub struct MongoPostStore {
    db: MongoDb,
}

impl MongoPostStore {
    pub fn new(db: MongoDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PostStore for MongoPostStore {
    async fn reception_posts(&self) -> Result<PostBatch, AppError> {
        let mut cursor = self
            .db
            .raw_posts()
            .find(doc! { "visibility": RECEPTION_VISIBILITY }, None)
            .await?;

        let mut batch = PostBatch::default();
        while let Some(document) = cursor.try_next().await? {
            match bson::from_document::<Post>(document) {
                Ok(post) => batch.posts.push(post),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping malformed reception post");
                    batch.skipped += 1;
                }
            }
        }

        tracing::debug!(
            posts = batch.posts.len(),
            skipped = batch.skipped,
            "Loaded reception posts"
        );
        Ok(batch)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.db.ping().await
    }
}
