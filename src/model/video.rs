use derive_new::new;
use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;
use uuid::Uuid;

use super::timestamp::{now, Timestamp};

pub const VIDEOS: &str = "videos";

pub type VideoId = Thing;

pub fn video_id(raw: &str) -> VideoId {
    (VIDEOS.to_string(), raw.to_string()).into()
}

pub fn new_video_id() -> VideoId {
    video_id(&Uuid::new_v4().to_string())
}

/// A published video: metadata set by the uploader plus interaction data
/// (ratings, comments, counters) appended by visitors.
///
/// The `serde(default)` attributes on the interaction fields migrate records
/// written before those fields existed.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Video {
    pub id: VideoId,
    pub title: String,
    pub source_link: String,
    pub embed_url: String,
    pub thumbnail: String,
    pub caption: String,
    pub created_at: Timestamp,
    #[serde(default)]
    pub ratings: Vec<u8>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub share_count: u64,
    #[serde(default)]
    pub uploaded_by: Option<Uploader>,
}

impl Video {
    pub fn average_rating(&self) -> f64 {
        average_rating(&self.ratings)
    }
}

/// Payload for inserting a new video. Carries no id: the store assigns one.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, new)]
pub struct NewVideo {
    pub title: String,
    pub source_link: String,
    pub embed_url: String,
    pub thumbnail: String,
    pub caption: String,
    #[new(value = "now()")]
    pub created_at: Timestamp,
    #[new(default)]
    pub ratings: Vec<u8>,
    #[new(default)]
    pub comments: Vec<Comment>,
    #[new(default)]
    pub view_count: u64,
    #[new(default)]
    pub share_count: u64,
    pub uploaded_by: Option<Uploader>,
}

impl NewVideo {
    pub fn into_video(self, id: VideoId) -> Video {
        Video {
            id,
            title: self.title,
            source_link: self.source_link,
            embed_url: self.embed_url,
            thumbnail: self.thumbnail,
            caption: self.caption,
            created_at: self.created_at,
            ratings: self.ratings,
            comments: self.comments,
            view_count: self.view_count,
            share_count: self.share_count,
            uploaded_by: self.uploaded_by,
        }
    }
}

/// Metadata-only edit payload. Interaction fields have no representation
/// here, so an edit can never overwrite them with stale values; they are
/// mutated only through the dedicated append/increment operations.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, new)]
pub struct VideoPatch {
    pub title: String,
    pub source_link: String,
    pub embed_url: String,
    pub thumbnail: String,
    pub caption: String,
    pub uploaded_by: Option<Uploader>,
}

impl VideoPatch {
    pub fn apply(self, video: &mut Video) {
        video.title = self.title;
        video.source_link = self.source_link;
        video.embed_url = self.embed_url;
        video.thumbnail = self.thumbnail;
        video.caption = self.caption;
        video.uploaded_by = self.uploaded_by;
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, new)]
pub struct Comment {
    #[new(value = "Uuid::new_v4().to_string()")]
    pub id: String,
    pub text: String,
    #[serde(default = "anonymous")]
    pub author: String,
    #[new(value = "now()")]
    pub created_at: Timestamp,
    pub reaction: Option<String>,
}

pub fn anonymous() -> String {
    "Anonymous".to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Uploader {
    pub uid: String,
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Arithmetic mean of the ratings, rounded to one decimal place.
/// An unrated video averages 0.
pub fn average_rating(ratings: &[u8]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }

    let sum: u32 = ratings.iter().map(|rating| u32::from(*rating)).sum();
    let mean = f64::from(sum) / ratings.len() as f64;
    (mean * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_rounds_to_one_decimal() {
        assert_eq!(average_rating(&[5, 5, 4]), 4.7);
    }

    #[test]
    fn average_of_nothing_is_zero() {
        assert_eq!(average_rating(&[]), 0.0);
    }

    #[test]
    fn average_of_uniform_ratings_is_exact() {
        assert_eq!(average_rating(&[3, 3, 3]), 3.0);
    }

    #[test]
    fn patch_leaves_interaction_data_alone() {
        let mut video = NewVideo::new(
            "Old title".to_string(),
            "https://drive.google.com/file/d/abc/view".to_string(),
            "https://drive.google.com/file/d/abc/preview".to_string(),
            String::new(),
            "Old caption".to_string(),
            None,
        )
        .into_video(video_id("v1"));
        video.ratings = vec![4, 5];
        video.view_count = 12;

        let patch = VideoPatch::new(
            "New title".to_string(),
            video.source_link.clone(),
            video.embed_url.clone(),
            video.thumbnail.clone(),
            "New caption".to_string(),
            None,
        );
        patch.apply(&mut video);

        assert_eq!(video.title, "New title");
        assert_eq!(video.caption, "New caption");
        assert_eq!(video.ratings, vec![4, 5], "edits must not touch ratings");
        assert_eq!(video.view_count, 12, "edits must not touch counters");
    }

    #[test]
    fn missing_interaction_fields_default_on_read() {
        let stored = serde_json::json!({
            "id": video_id("v2"),
            "title": "Untitled",
            "source_link": "",
            "embed_url": "",
            "thumbnail": "",
            "caption": "",
            "created_at": 1_700_000_000_000_i64,
        });

        let video: Video = serde_json::from_value(stored).unwrap();
        assert!(video.ratings.is_empty());
        assert!(video.comments.is_empty());
        assert_eq!(video.view_count, 0);
        assert_eq!(video.share_count, 0);
    }
}
