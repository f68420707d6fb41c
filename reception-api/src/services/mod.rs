pub mod database;
pub mod post_store;

pub use database::{MongoDb, MongoPostStore};
pub use post_store::{MemoryPostStore, PostBatch, PostStore};
