use derive_new::new;
use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;
use uuid::Uuid;

pub const LECTURERS: &str = "lecturers";

pub type LecturerId = Thing;

pub fn lecturer_id(raw: &str) -> LecturerId {
    (LECTURERS.to_string(), raw.to_string()).into()
}

pub fn new_lecturer_id() -> LecturerId {
    lecturer_id(&Uuid::new_v4().to_string())
}

/// Lecturer profile shown on the gallery's staff page. Edited by full
/// overwrite, no merge semantics.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Lecturer {
    pub id: LecturerId,
    pub name: String,
    pub nip: String,
    pub bio: String,
    pub photo_url: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, new)]
pub struct NewLecturer {
    pub name: String,
    pub nip: String,
    pub bio: String,
    pub photo_url: String,
}

impl NewLecturer {
    pub fn into_lecturer(self, id: LecturerId) -> Lecturer {
        Lecturer {
            id,
            name: self.name,
            nip: self.nip,
            bio: self.bio,
            photo_url: self.photo_url,
        }
    }
}
