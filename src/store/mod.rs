use crate::model::{
    anonymous, AboutContent, Comment, Lecturer, LecturerId, NewLecturer, NewVideo, Video, VideoId,
    VideoPatch,
};

pub use error::{Result, StoreError};
pub use local::LocalStore;
pub use remote::RemoteStore;
pub use sanitize::sanitize;

pub mod error;
pub mod local;
pub mod remote;
mod sanitize;

/// Routes every operation to the backend selected at startup.
///
/// Reads never fail: a remote read error is logged and answered from the
/// local cache instead. Write errors always reach the caller.
#[derive(Debug)]
pub struct Store {
    backend: Backend,
}

#[derive(Debug)]
enum Backend {
    Remote {
        remote: RemoteStore,
        fallback: LocalStore,
    },
    Local {
        local: LocalStore,
    },
}

impl Store {
    pub fn local(local: LocalStore) -> Store {
        Store {
            backend: Backend::Local { local },
        }
    }

    pub fn remote(remote: RemoteStore, fallback: LocalStore) -> Store {
        Store {
            backend: Backend::Remote { remote, fallback },
        }
    }

    pub async fn list_videos(&self) -> Vec<Video> {
        match &self.backend {
            Backend::Remote { remote, fallback } => match remote.list_videos().await {
                Ok(videos) => videos,
                Err(error) => {
                    tracing::warn!(%error, "remote video list failed, serving the local cache");
                    snapshot(fallback.videos())
                }
            },
            Backend::Local { local } => snapshot(local.videos()),
        }
    }

    pub async fn create_video(&self, video: NewVideo) -> Result<Video> {
        match &self.backend {
            Backend::Remote { remote, .. } => remote.create_video(video).await,
            Backend::Local { local } => local.create_video(video),
        }
    }

    pub async fn update_video(&self, id: &VideoId, patch: VideoPatch) -> Result<()> {
        match &self.backend {
            Backend::Remote { remote, .. } => remote.update_video(id, patch).await,
            Backend::Local { local } => local.update_video(id, patch),
        }
    }

    pub async fn delete_video(&self, id: &VideoId) -> Result<()> {
        match &self.backend {
            Backend::Remote { remote, .. } => remote.delete_video(id).await,
            Backend::Local { local } => local.delete_video(id),
        }
    }

    pub async fn add_rating(&self, id: &VideoId, rating: u8) -> Result<()> {
        match &self.backend {
            Backend::Remote { remote, .. } => remote.add_rating(id, rating).await,
            Backend::Local { local } => local.add_rating(id, rating),
        }
    }

    /// Builds the comment (id, timestamp, author default) and appends it.
    pub async fn add_comment(
        &self,
        id: &VideoId,
        text: String,
        author: Option<String>,
        reaction: Option<String>,
    ) -> Result<Comment> {
        let author = author.unwrap_or_else(anonymous);
        let comment = Comment::new(text, author, reaction);

        match &self.backend {
            Backend::Remote { remote, .. } => remote.add_comment(id, &comment).await?,
            Backend::Local { local } => local.add_comment(id, comment.clone())?,
        }

        Ok(comment)
    }

    pub async fn increment_views(&self, id: &VideoId) -> Result<()> {
        match &self.backend {
            Backend::Remote { remote, .. } => remote.increment_views(id).await,
            Backend::Local { local } => local.increment_views(id),
        }
    }

    pub async fn increment_shares(&self, id: &VideoId) -> Result<()> {
        match &self.backend {
            Backend::Remote { remote, .. } => remote.increment_shares(id).await,
            Backend::Local { local } => local.increment_shares(id),
        }
    }

    pub async fn reset_statistics(&self) -> Result<()> {
        match &self.backend {
            Backend::Remote { remote, .. } => remote.reset_statistics().await,
            Backend::Local { local } => local.reset_statistics(),
        }
    }

    pub async fn list_lecturers(&self) -> Vec<Lecturer> {
        match &self.backend {
            Backend::Remote { remote, fallback } => match remote.list_lecturers().await {
                Ok(lecturers) => lecturers,
                Err(error) => {
                    tracing::warn!(%error, "remote lecturer list failed, serving the local cache");
                    snapshot(fallback.lecturers())
                }
            },
            Backend::Local { local } => snapshot(local.lecturers()),
        }
    }

    pub async fn create_lecturer(&self, lecturer: NewLecturer) -> Result<Lecturer> {
        match &self.backend {
            Backend::Remote { remote, .. } => remote.create_lecturer(lecturer).await,
            Backend::Local { local } => local.create_lecturer(lecturer),
        }
    }

    pub async fn delete_lecturer(&self, id: &LecturerId) -> Result<()> {
        match &self.backend {
            Backend::Remote { remote, .. } => remote.delete_lecturer(id).await,
            Backend::Local { local } => local.delete_lecturer(id),
        }
    }

    pub async fn about(&self) -> Option<AboutContent> {
        match &self.backend {
            Backend::Remote { remote, fallback } => match remote.about().await {
                Ok(about) => about,
                Err(error) => {
                    tracing::warn!(%error, "remote about fetch failed, serving the local cache");
                    snapshot(fallback.about())
                }
            },
            Backend::Local { local } => snapshot(local.about()),
        }
    }

    pub async fn set_about(&self, about: &AboutContent) -> Result<()> {
        match &self.backend {
            Backend::Remote { remote, .. } => remote.set_about(about).await,
            Backend::Local { local } => local.set_about(about),
        }
    }
}

/// Last line of the read path: a cache that cannot even be read degrades to
/// an empty snapshot rather than an error.
fn snapshot<T: Default>(result: Result<T>) -> T {
    result.unwrap_or_else(|error| {
        tracing::warn!(%error, "local cache read failed");
        T::default()
    })
}
