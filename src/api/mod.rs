use axum::routing::{delete, get, patch, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use error::*;
pub use state::App;

mod error;
mod state;

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

pub fn create_router(app: App) -> Router {
    Router::new()
        .route("/videos", get(videos::list).post(videos::create))
        .route("/videos/:id", patch(videos::update).delete(videos::remove))
        .route("/videos/:id/ratings", post(videos::rate))
        .route("/videos/:id/comments", post(videos::comment))
        .route("/videos/:id/views", post(videos::view))
        .route("/videos/:id/shares", post(videos::share))
        .route("/statistics/reset", post(videos::reset))
        .route("/lecturers", get(lecturers::list).post(lecturers::create))
        .route("/lecturers/:id", delete(lecturers::remove))
        .route("/about", get(about::fetch).put(about::update))
        .route("/thumbnails", post(thumbnails::create))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app)
}

pub mod videos {
    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum::Json;
    use serde::Deserialize;
    use snafu::{ensure, OptionExt, ResultExt};
    use tracing::instrument;

    use crate::link;
    use crate::model::{video_id, Comment, NewVideo, Uploader, Video, VideoPatch};

    use super::error::{InvalidRatingSnafu, StoreSnafu, UnrecognizedLinkSnafu};
    use super::{App, Result};

    /// Upload/edit form payload. The embeddable URL is derived from the
    /// pasted link here, never taken from the client.
    #[derive(Debug, Deserialize)]
    pub struct SubmitVideo {
        pub title: String,
        pub source_link: String,
        pub caption: String,
        #[serde(default)]
        pub thumbnail: String,
        #[serde(default)]
        pub uploaded_by: Option<Uploader>,
    }

    pub async fn list(State(app): State<App>) -> Json<Vec<Video>> {
        Json(app.store.list_videos().await)
    }

    #[instrument(skip(app, payload))]
    pub async fn create(
        State(app): State<App>,
        Json(payload): Json<SubmitVideo>,
    ) -> Result<(StatusCode, Json<Video>)> {
        let embed_url = link::normalize_share_link(&payload.source_link).context(
            UnrecognizedLinkSnafu {
                link: payload.source_link.clone(),
            },
        )?;

        let video = NewVideo::new(
            payload.title,
            payload.source_link,
            embed_url,
            payload.thumbnail,
            payload.caption,
            payload.uploaded_by,
        );
        let video = app.store.create_video(video).await.context(StoreSnafu)?;

        Ok((StatusCode::CREATED, Json(video)))
    }

    #[instrument(skip(app, payload))]
    pub async fn update(
        State(app): State<App>,
        Path(id): Path<String>,
        Json(payload): Json<SubmitVideo>,
    ) -> Result<StatusCode> {
        let embed_url = link::normalize_share_link(&payload.source_link).context(
            UnrecognizedLinkSnafu {
                link: payload.source_link.clone(),
            },
        )?;

        let patch = VideoPatch::new(
            payload.title,
            payload.source_link,
            embed_url,
            payload.thumbnail,
            payload.caption,
            payload.uploaded_by,
        );
        app.store
            .update_video(&video_id(&id), patch)
            .await
            .context(StoreSnafu)?;

        Ok(StatusCode::NO_CONTENT)
    }

    #[instrument(skip(app))]
    pub async fn remove(State(app): State<App>, Path(id): Path<String>) -> Result<StatusCode> {
        app.store
            .delete_video(&video_id(&id))
            .await
            .context(StoreSnafu)?;
        Ok(StatusCode::NO_CONTENT)
    }

    #[derive(Debug, Deserialize)]
    pub struct RateVideo {
        pub value: u8,
    }

    #[instrument(skip(app))]
    pub async fn rate(
        State(app): State<App>,
        Path(id): Path<String>,
        Json(payload): Json<RateVideo>,
    ) -> Result<StatusCode> {
        ensure!(
            (1..=5).contains(&payload.value),
            InvalidRatingSnafu {
                value: payload.value
            }
        );

        app.store
            .add_rating(&video_id(&id), payload.value)
            .await
            .context(StoreSnafu)?;
        Ok(StatusCode::NO_CONTENT)
    }

    #[derive(Debug, Deserialize)]
    pub struct SubmitComment {
        pub text: String,
        #[serde(default)]
        pub author: Option<String>,
        #[serde(default)]
        pub reaction: Option<String>,
    }

    #[instrument(skip(app, payload))]
    pub async fn comment(
        State(app): State<App>,
        Path(id): Path<String>,
        Json(payload): Json<SubmitComment>,
    ) -> Result<(StatusCode, Json<Comment>)> {
        let comment = app
            .store
            .add_comment(&video_id(&id), payload.text, payload.author, payload.reaction)
            .await
            .context(StoreSnafu)?;

        Ok((StatusCode::CREATED, Json(comment)))
    }

    #[instrument(skip(app))]
    pub async fn view(State(app): State<App>, Path(id): Path<String>) -> Result<StatusCode> {
        app.store
            .increment_views(&video_id(&id))
            .await
            .context(StoreSnafu)?;
        Ok(StatusCode::NO_CONTENT)
    }

    #[instrument(skip(app))]
    pub async fn share(State(app): State<App>, Path(id): Path<String>) -> Result<StatusCode> {
        app.store
            .increment_shares(&video_id(&id))
            .await
            .context(StoreSnafu)?;
        Ok(StatusCode::NO_CONTENT)
    }

    /// Admin-only in the UI; zeroes interaction data on every record.
    #[instrument(skip(app))]
    pub async fn reset(State(app): State<App>) -> Result<StatusCode> {
        app.store.reset_statistics().await.context(StoreSnafu)?;
        Ok(StatusCode::NO_CONTENT)
    }
}

pub mod lecturers {
    use axum::extract::{Path, State};
    use axum::http::StatusCode;
    use axum::Json;
    use serde::Deserialize;
    use snafu::ResultExt;
    use tracing::instrument;

    use crate::model::{lecturer_id, Lecturer, NewLecturer};

    use super::error::StoreSnafu;
    use super::{App, Result};

    #[derive(Debug, Deserialize)]
    pub struct SubmitLecturer {
        pub name: String,
        pub nip: String,
        pub bio: String,
        #[serde(default)]
        pub photo_url: String,
    }

    pub async fn list(State(app): State<App>) -> Json<Vec<Lecturer>> {
        Json(app.store.list_lecturers().await)
    }

    #[instrument(skip(app, payload))]
    pub async fn create(
        State(app): State<App>,
        Json(payload): Json<SubmitLecturer>,
    ) -> Result<(StatusCode, Json<Lecturer>)> {
        let lecturer = NewLecturer::new(payload.name, payload.nip, payload.bio, payload.photo_url);
        let lecturer = app
            .store
            .create_lecturer(lecturer)
            .await
            .context(StoreSnafu)?;

        Ok((StatusCode::CREATED, Json(lecturer)))
    }

    #[instrument(skip(app))]
    pub async fn remove(State(app): State<App>, Path(id): Path<String>) -> Result<StatusCode> {
        app.store
            .delete_lecturer(&lecturer_id(&id))
            .await
            .context(StoreSnafu)?;
        Ok(StatusCode::NO_CONTENT)
    }
}

pub mod about {
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::Json;
    use snafu::ResultExt;
    use tracing::instrument;

    use crate::model::AboutContent;

    use super::error::StoreSnafu;
    use super::{App, Result};

    pub async fn fetch(State(app): State<App>) -> Json<Option<AboutContent>> {
        Json(app.store.about().await)
    }

    #[instrument(skip(app, payload))]
    pub async fn update(
        State(app): State<App>,
        Json(payload): Json<AboutContent>,
    ) -> Result<StatusCode> {
        app.store.set_about(&payload).await.context(StoreSnafu)?;
        Ok(StatusCode::NO_CONTENT)
    }
}

pub mod thumbnails {
    use axum::body::Bytes;
    use axum::Json;
    use serde::Serialize;
    use snafu::ResultExt;
    use tracing::instrument;

    use super::error::MediaSnafu;
    use super::Result;

    #[derive(Debug, Serialize)]
    pub struct CompressedThumbnail {
        pub data_url: String,
    }

    /// Accepts the raw upload body and answers with the embedded string the
    /// caller stores on the video record.
    #[instrument(skip(body), fields(input_bytes = body.len()))]
    pub async fn create(body: Bytes) -> Result<Json<CompressedThumbnail>> {
        let data_url = crate::media::compress(body.to_vec())
            .await
            .context(MediaSnafu)?;

        Ok(Json(CompressedThumbnail { data_url }))
    }
}
