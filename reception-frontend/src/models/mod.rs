pub mod credential;
pub mod feed_card;

pub use credential::PresentedCredential;
pub use feed_card::FeedCard;
