use crate::feed::FeedItem;
use chrono::{DateTime, Utc};

/// A feed item prepared for the reception page template.
#[derive(Debug, Clone)]
pub struct FeedCard {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub body: String,
    pub image: Option<String>,
    pub author: String,
    /// Publish time in UTC, `YYYY-MM-DD HH:MM`; empty when out of range.
    pub published: String,
}

impl From<&FeedItem> for FeedCard {
    fn from(item: &FeedItem) -> Self {
        let published = DateTime::<Utc>::from_timestamp(
            item.publish_date.seconds,
            item.publish_date.nanoseconds,
        )
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();

        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            subtitle: item.subtitle.clone(),
            body: item.body.clone(),
            image: Some(item.image.clone()).filter(|url| !url.is_empty()),
            author: item.author.clone(),
            published,
        }
    }
}

impl FeedCard {
    pub fn from_feed(items: &[FeedItem]) -> Vec<FeedCard> {
        items.iter().map(FeedCard::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::PublishDate;

    #[test]
    fn formats_publish_time_in_utc() {
        let item = FeedItem {
            id: "a".to_string(),
            publish_date: PublishDate {
                seconds: 1_693_540_800,
                nanoseconds: 0,
            },
            title: "Välkommen".to_string(),
            subtitle: String::new(),
            body: String::new(),
            image: String::new(),
            author: "Mottagningen".to_string(),
        };

        let card = FeedCard::from(&item);
        assert_eq!(card.published, "2023-09-01 04:00");
        assert!(card.image.is_none());
    }
}
