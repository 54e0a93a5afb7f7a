use snafu::{ensure, OptionExt, ResultExt};
use surrealdb::engine::any::Any;
use surrealdb::opt::auth;
use surrealdb::Surreal;
use tracing::instrument;

use crate::config::RemoteConfig;
use crate::media::MAX_THUMBNAIL_BYTES;
use crate::model::{
    AboutContent, Comment, Lecturer, LecturerId, NewLecturer, NewVideo, Video, VideoId,
    VideoPatch, ABOUT, ABOUT_SINGLETON, LECTURERS, VIDEOS,
};

use super::error::{
    ConnectionSnafu, DeserializeSnafu, EmptyResponseSnafu, OversizedThumbnailSnafu, QuerySnafu,
    Result,
};
use super::sanitize::sanitized_value;

/// Adapter over the hosted document store.
///
/// Interaction data (ratings, comments, counters) is only ever written
/// through the store's atomic primitives (`+=` appends and increments inside
/// a single UPDATE statement), so concurrent appends from different writers
/// both survive.
#[derive(Debug, Clone)]
pub struct RemoteStore {
    database: Surreal<Any>,
}

impl RemoteStore {
    pub async fn connect(config: &RemoteConfig) -> Result<Self> {
        let database = surrealdb::engine::any::connect(config.endpoint.as_str())
            .await
            .context(ConnectionSnafu {
                url: config.endpoint.clone(),
            })?;

        if let Some(credentials) = &config.credentials {
            database
                .signin(auth::Database {
                    namespace: &config.namespace,
                    database: &config.database,
                    username: &credentials.username,
                    password: &credentials.password,
                })
                .await
                .context(ConnectionSnafu {
                    url: config.endpoint.clone(),
                })?;
        }

        database
            .use_ns(&config.namespace)
            .use_db(&config.database)
            .await
            .context(ConnectionSnafu {
                url: config.endpoint.clone(),
            })?;

        Ok(Self { database })
    }

    #[instrument(skip(self))]
    pub async fn list_videos(&self) -> Result<Vec<Video>> {
        let mut response = self
            .database
            .query("SELECT * FROM videos ORDER BY created_at DESC")
            .await
            .context(QuerySnafu)?;

        response.take(0).context(DeserializeSnafu)
    }

    #[instrument(skip(self, video))]
    pub async fn create_video(&self, video: NewVideo) -> Result<Video> {
        ensure_thumbnail_fits(&video.thumbnail)?;
        let payload = sanitized_value(&video)?;

        let mut created: Vec<Video> = self
            .database
            .create(VIDEOS)
            .content(payload)
            .await
            .context(QuerySnafu)?;

        created.pop().context(EmptyResponseSnafu)
    }

    /// Partial merge of the metadata fields against the stored document.
    /// Never a full overwrite: the patch type carries no interaction fields.
    #[instrument(skip(self, patch))]
    pub async fn update_video(&self, id: &VideoId, patch: VideoPatch) -> Result<()> {
        ensure_thumbnail_fits(&patch.thumbnail)?;
        let payload = sanitized_value(&patch)?;

        let updated: Option<Video> = self
            .database
            .update((VIDEOS, id.id.to_raw()))
            .merge(payload)
            .await
            .context(QuerySnafu)?;

        updated.context(EmptyResponseSnafu)?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete_video(&self, id: &VideoId) -> Result<()> {
        let _removed: Option<Video> = self
            .database
            .delete((VIDEOS, id.id.to_raw()))
            .await
            .context(QuerySnafu)?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn add_rating(&self, id: &VideoId, rating: u8) -> Result<()> {
        self.database
            .query("UPDATE videos SET ratings += $rating WHERE id = $video")
            .bind(("video", id.clone()))
            .bind(("rating", i64::from(rating)))
            .await
            .context(QuerySnafu)?
            .check()
            .context(QuerySnafu)?;
        Ok(())
    }

    #[instrument(skip(self, comment))]
    pub async fn add_comment(&self, id: &VideoId, comment: &Comment) -> Result<()> {
        let payload = sanitized_value(comment)?;

        self.database
            .query("UPDATE videos SET comments += $comment WHERE id = $video")
            .bind(("video", id.clone()))
            .bind(("comment", payload))
            .await
            .context(QuerySnafu)?
            .check()
            .context(QuerySnafu)?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn increment_views(&self, id: &VideoId) -> Result<()> {
        self.database
            .query("UPDATE videos SET view_count += 1 WHERE id = $video")
            .bind(("video", id.clone()))
            .await
            .context(QuerySnafu)?
            .check()
            .context(QuerySnafu)?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn increment_shares(&self, id: &VideoId) -> Result<()> {
        self.database
            .query("UPDATE videos SET share_count += 1 WHERE id = $video")
            .bind(("video", id.clone()))
            .await
            .context(QuerySnafu)?
            .check()
            .context(QuerySnafu)?;
        Ok(())
    }

    /// Zero the interaction data on every document. A single whole-table
    /// UPDATE runs as one transaction, so readers observe either the old
    /// statistics or the reset ones, never a partially-reset collection.
    #[instrument(skip(self))]
    pub async fn reset_statistics(&self) -> Result<()> {
        self.database
            .query("UPDATE videos SET view_count = 0, share_count = 0, ratings = [], comments = []")
            .await
            .context(QuerySnafu)?
            .check()
            .context(QuerySnafu)?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_lecturers(&self) -> Result<Vec<Lecturer>> {
        let mut response = self
            .database
            .query("SELECT * FROM lecturers ORDER BY name ASC")
            .await
            .context(QuerySnafu)?;

        response.take(0).context(DeserializeSnafu)
    }

    #[instrument(skip(self, lecturer))]
    pub async fn create_lecturer(&self, lecturer: NewLecturer) -> Result<Lecturer> {
        let payload = sanitized_value(&lecturer)?;

        let mut created: Vec<Lecturer> = self
            .database
            .create(LECTURERS)
            .content(payload)
            .await
            .context(QuerySnafu)?;

        created.pop().context(EmptyResponseSnafu)
    }

    #[instrument(skip(self))]
    pub async fn delete_lecturer(&self, id: &LecturerId) -> Result<()> {
        let _removed: Option<Lecturer> = self
            .database
            .delete((LECTURERS, id.id.to_raw()))
            .await
            .context(QuerySnafu)?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn about(&self) -> Result<Option<AboutContent>> {
        self.database
            .select((ABOUT, ABOUT_SINGLETON))
            .await
            .context(QuerySnafu)
    }

    #[instrument(skip(self, about))]
    pub async fn set_about(&self, about: &AboutContent) -> Result<()> {
        let payload = sanitized_value(about)?;

        let _stored: Option<AboutContent> = self
            .database
            .update((ABOUT, ABOUT_SINGLETON))
            .content(payload)
            .await
            .context(QuerySnafu)?;
        Ok(())
    }
}

/// Per-record ceiling check, applied before anything leaves the process.
fn ensure_thumbnail_fits(thumbnail: &str) -> Result<()> {
    ensure!(
        thumbnail.len() <= MAX_THUMBNAIL_BYTES,
        OversizedThumbnailSnafu {
            size: thumbnail.len()
        }
    );
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::testing::memory;
    use super::*;
    use crate::model::{Timestamp, VideoPatch};
    use crate::store::error::StoreError;

    fn video_named(title: &str, created_at_millis: i64) -> NewVideo {
        let mut video = NewVideo::new(
            title.to_string(),
            "https://drive.google.com/file/d/abc/view".to_string(),
            "https://drive.google.com/file/d/abc/preview".to_string(),
            String::new(),
            "caption".to_string(),
            None,
        );
        video.created_at = Timestamp::from_millis(created_at_millis).unwrap();
        video
    }

    #[tokio::test]
    async fn listing_orders_newest_first() {
        let store = memory().await;
        store
            .create_video(video_named("older", 1_000))
            .await
            .unwrap();
        store
            .create_video(video_named("newer", 2_000))
            .await
            .unwrap();

        let videos = store.list_videos().await.unwrap();
        let titles: Vec<&str> = videos.iter().map(|video| video.title.as_str()).collect();
        assert_eq!(titles, vec!["newer", "older"]);
    }

    #[tokio::test]
    async fn ratings_append_even_when_equal() {
        let store = memory().await;
        let created = store.create_video(video_named("rated", 1_000)).await.unwrap();

        store.add_rating(&created.id, 5).await.unwrap();
        store.add_rating(&created.id, 5).await.unwrap();

        let videos = store.list_videos().await.unwrap();
        assert_eq!(
            videos[0].ratings,
            vec![5, 5],
            "a second identical rating must still be recorded"
        );
    }

    #[tokio::test]
    async fn comments_append_preserving_order() {
        let store = memory().await;
        let created = store
            .create_video(video_named("discussed", 1_000))
            .await
            .unwrap();

        let first = Comment::new("first".to_string(), "A".to_string(), None);
        let second = Comment::new("second".to_string(), "B".to_string(), Some("🔥".to_string()));
        store.add_comment(&created.id, &first).await.unwrap();
        store.add_comment(&created.id, &second).await.unwrap();

        let videos = store.list_videos().await.unwrap();
        assert_eq!(videos[0].comments.len(), 2);
        assert_eq!(videos[0].comments[0].id, first.id);
        assert_eq!(videos[0].comments[1].id, second.id);
    }

    #[tokio::test]
    async fn counters_increment_without_a_prior_read() {
        let store = memory().await;
        let created = store.create_video(video_named("seen", 1_000)).await.unwrap();

        store.increment_views(&created.id).await.unwrap();
        store.increment_views(&created.id).await.unwrap();
        store.increment_shares(&created.id).await.unwrap();

        let videos = store.list_videos().await.unwrap();
        assert_eq!(videos[0].view_count, 2);
        assert_eq!(videos[0].share_count, 1);
    }

    #[tokio::test]
    async fn metadata_merge_preserves_interaction_data() {
        let store = memory().await;
        let created = store.create_video(video_named("edited", 1_000)).await.unwrap();
        store.add_rating(&created.id, 4).await.unwrap();
        store
            .add_comment(
                &created.id,
                &Comment::new("keep me".to_string(), "A".to_string(), None),
            )
            .await
            .unwrap();
        store.increment_views(&created.id).await.unwrap();

        let patch = VideoPatch::new(
            "edited twice".to_string(),
            created.source_link.clone(),
            created.embed_url.clone(),
            created.thumbnail.clone(),
            "new caption".to_string(),
            None,
        );
        store.update_video(&created.id, patch).await.unwrap();

        let videos = store.list_videos().await.unwrap();
        assert_eq!(videos[0].title, "edited twice");
        assert_eq!(videos[0].caption, "new caption");
        assert_eq!(videos[0].ratings, vec![4]);
        assert_eq!(videos[0].comments.len(), 1);
        assert_eq!(videos[0].view_count, 1);
    }

    #[tokio::test]
    async fn reset_zeroes_every_document_and_is_idempotent() {
        let store = memory().await;
        let first = store.create_video(video_named("one", 1_000)).await.unwrap();
        let second = store.create_video(video_named("two", 2_000)).await.unwrap();
        store.add_rating(&first.id, 5).await.unwrap();
        store.increment_views(&second.id).await.unwrap();

        store.reset_statistics().await.unwrap();
        let after_first = store.list_videos().await.unwrap();
        for video in &after_first {
            assert_eq!(video.view_count, 0);
            assert_eq!(video.share_count, 0);
            assert!(video.ratings.is_empty());
            assert!(video.comments.is_empty());
        }

        store.reset_statistics().await.unwrap();
        assert_eq!(store.list_videos().await.unwrap(), after_first);
    }

    #[tokio::test]
    async fn oversized_thumbnail_is_rejected_before_any_write() {
        let store = memory().await;
        let created = store.create_video(video_named("small", 1_000)).await.unwrap();

        let patch = VideoPatch::new(
            "unchanged".to_string(),
            created.source_link.clone(),
            created.embed_url.clone(),
            "x".repeat(MAX_THUMBNAIL_BYTES + 1),
            created.caption.clone(),
            None,
        );
        let error = store.update_video(&created.id, patch).await.unwrap_err();
        assert!(matches!(error, StoreError::OversizedThumbnail { .. }), "{error}");

        let videos = store.list_videos().await.unwrap();
        assert_eq!(videos[0].title, "small", "nothing may reach the store");
    }

    #[tokio::test]
    async fn absent_optional_fields_are_stripped_before_writing() {
        let store = memory().await;
        let created = store
            .create_video(video_named("sanitized", 1_000))
            .await
            .unwrap();
        assert_eq!(created.uploaded_by, None);

        let videos = store.list_videos().await.unwrap();
        assert_eq!(videos[0].uploaded_by, None);
    }

    #[tokio::test]
    async fn lecturers_roundtrip() {
        let store = memory().await;
        let created = store
            .create_lecturer(NewLecturer::new(
                "Dr. Ratna".to_string(),
                "19820101".to_string(),
                "Documentary film lecturer.".to_string(),
                String::new(),
            ))
            .await
            .unwrap();

        assert_eq!(store.list_lecturers().await.unwrap().len(), 1);
        store.delete_lecturer(&created.id).await.unwrap();
        assert!(store.list_lecturers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn about_is_a_singleton_overwritten_in_place() {
        let store = memory().await;
        assert_eq!(store.about().await.unwrap(), None);

        let about = AboutContent {
            title: "About".to_string(),
            body: "First version.".to_string(),
            contact_email: None,
        };
        store.set_about(&about).await.unwrap();

        let replacement = AboutContent {
            body: "Second version.".to_string(),
            ..about
        };
        store.set_about(&replacement).await.unwrap();

        assert_eq!(store.about().await.unwrap(), Some(replacement));
    }
}
