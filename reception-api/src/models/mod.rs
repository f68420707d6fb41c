pub mod post;

pub use post::{FeedResponse, Post, PostResponse, PublishDate, RECEPTION_VISIBILITY};
