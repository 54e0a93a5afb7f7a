use std::fs;
use std::io;
use std::path::PathBuf;

use chrono::{Duration, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use snafu::ResultExt;

use crate::model::{
    new_lecturer_id, new_video_id, video_id, AboutContent, Comment, Lecturer, LecturerId,
    NewLecturer, NewVideo, Uploader, Video, VideoId, VideoPatch,
};

use super::error::{CacheIoSnafu, CacheSerdeSnafu, Result, SerializeSnafu};

const VIDEOS_FILE: &str = "videos.json";
const LECTURERS_FILE: &str = "lecturers.json";
const ABOUT_FILE: &str = "about.json";

/// On-device mirror of the collections, one JSON file per collection.
///
/// Every mutation is a read-modify-write over the whole collection. There is
/// no locking across processes: this adapter is single-session-safe only and
/// exists as the fallback for an unconfigured or unreachable remote store.
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).context(CacheIoSnafu { path: dir.clone() })?;
        Ok(Self { dir })
    }

    fn load<T: DeserializeOwned>(&self, file: &str) -> Result<Option<T>> {
        let path = self.dir.join(file);
        let raw = match fs::read(&path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error).context(CacheIoSnafu { path }),
        };

        serde_json::from_slice(&raw)
            .map(Some)
            .context(CacheSerdeSnafu { path })
    }

    fn persist<T: Serialize>(&self, file: &str, value: &T) -> Result<()> {
        let path = self.dir.join(file);
        let raw = serde_json::to_vec_pretty(value).context(SerializeSnafu)?;
        fs::write(&path, raw).context(CacheIoSnafu { path })
    }

    /// Full video snapshot, newest first. Materializes the demo dataset on
    /// first run so the gallery is never empty.
    pub fn videos(&self) -> Result<Vec<Video>> {
        match self.load(VIDEOS_FILE)? {
            Some(videos) => Ok(videos),
            None => {
                let seeded = seed_videos();
                self.persist(VIDEOS_FILE, &seeded)?;
                Ok(seeded)
            }
        }
    }

    fn mutate_videos(&self, apply: impl FnOnce(&mut Vec<Video>)) -> Result<()> {
        let mut videos = self.videos()?;
        apply(&mut videos);
        self.persist(VIDEOS_FILE, &videos)
    }

    pub fn create_video(&self, video: NewVideo) -> Result<Video> {
        let video = video.into_video(new_video_id());
        self.mutate_videos(|videos| videos.insert(0, video.clone()))?;
        Ok(video)
    }

    /// Applies the metadata patch to the matching record. A missing record is
    /// a no-op.
    pub fn update_video(&self, id: &VideoId, patch: VideoPatch) -> Result<()> {
        self.mutate_videos(|videos| {
            if let Some(video) = videos.iter_mut().find(|video| &video.id == id) {
                patch.apply(video);
            }
        })
    }

    pub fn delete_video(&self, id: &VideoId) -> Result<()> {
        self.mutate_videos(|videos| videos.retain(|video| &video.id != id))
    }

    pub fn add_rating(&self, id: &VideoId, rating: u8) -> Result<()> {
        self.mutate_videos(|videos| {
            if let Some(video) = videos.iter_mut().find(|video| &video.id == id) {
                video.ratings.push(rating);
            }
        })
    }

    pub fn add_comment(&self, id: &VideoId, comment: Comment) -> Result<()> {
        self.mutate_videos(|videos| {
            if let Some(video) = videos.iter_mut().find(|video| &video.id == id) {
                video.comments.push(comment);
            }
        })
    }

    pub fn increment_views(&self, id: &VideoId) -> Result<()> {
        self.mutate_videos(|videos| {
            if let Some(video) = videos.iter_mut().find(|video| &video.id == id) {
                video.view_count += 1;
            }
        })
    }

    pub fn increment_shares(&self, id: &VideoId) -> Result<()> {
        self.mutate_videos(|videos| {
            if let Some(video) = videos.iter_mut().find(|video| &video.id == id) {
                video.share_count += 1;
            }
        })
    }

    /// Zero the interaction data on every record in one write.
    pub fn reset_statistics(&self) -> Result<()> {
        self.mutate_videos(|videos| {
            for video in videos {
                video.view_count = 0;
                video.share_count = 0;
                video.ratings.clear();
                video.comments.clear();
            }
        })
    }

    pub fn lecturers(&self) -> Result<Vec<Lecturer>> {
        Ok(self.load(LECTURERS_FILE)?.unwrap_or_default())
    }

    pub fn create_lecturer(&self, lecturer: NewLecturer) -> Result<Lecturer> {
        let lecturer = lecturer.into_lecturer(new_lecturer_id());
        let mut lecturers = self.lecturers()?;
        lecturers.push(lecturer.clone());
        self.persist(LECTURERS_FILE, &lecturers)?;
        Ok(lecturer)
    }

    pub fn delete_lecturer(&self, id: &LecturerId) -> Result<()> {
        let mut lecturers = self.lecturers()?;
        lecturers.retain(|lecturer| &lecturer.id != id);
        self.persist(LECTURERS_FILE, &lecturers)
    }

    pub fn about(&self) -> Result<Option<AboutContent>> {
        self.load(ABOUT_FILE)
    }

    pub fn set_about(&self, about: &AboutContent) -> Result<()> {
        self.persist(ABOUT_FILE, about)
    }
}

fn seed_videos() -> Vec<Video> {
    vec![
        Video {
            id: video_id("demo-1"),
            title: "Coastal Lives: The Fishermen of Kenjeran".to_string(),
            source_link: "https://drive.google.com/file/d/1aBcD23/view".to_string(),
            embed_url: "https://drive.google.com/file/d/1aBcD23/preview".to_string(),
            thumbnail: "https://images.unsplash.com/photo-1534234828563-025321aa216e?w=800"
                .to_string(),
            caption: "A short documentary on the daily rhythm of a fishing village along the \
                      Surabaya coast, and the traditions holding out against modernisation."
                .to_string(),
            created_at: Utc::now().into(),
            ratings: vec![5, 5, 4],
            comments: vec![Comment {
                id: "demo-comment-1".to_string(),
                text: "The color grading fits the subject perfectly.".to_string(),
                author: "Student A".to_string(),
                created_at: (Utc::now() - Duration::minutes(2)).into(),
                reaction: Some("🔥".to_string()),
            }],
            view_count: 125,
            share_count: 0,
            uploaded_by: Some(Uploader {
                uid: "system".to_string(),
                name: "System Admin".to_string(),
                avatar_url: None,
            }),
        },
        Video {
            id: video_id("demo-2"),
            title: "Traditional Markets: Behind the Bustle".to_string(),
            source_link: "https://drive.google.com/file/d/4eFgH56/view".to_string(),
            embed_url: "https://drive.google.com/file/d/4eFgH56/preview".to_string(),
            thumbnail: "https://images.unsplash.com/photo-1533900298318-6b8da08a523e?w=800"
                .to_string(),
            caption: "A visual exploration of the exchanges that keep a fading market alive. \
                      Videography final project, group 3."
                .to_string(),
            created_at: (Utc::now() - Duration::seconds(10)).into(),
            ratings: vec![4, 5],
            comments: Vec::new(),
            view_count: 89,
            share_count: 0,
            uploaded_by: Some(Uploader {
                uid: "system".to_string(),
                name: "System Admin".to_string(),
                avatar_url: None,
            }),
        },
    ]
}
