use serde::{Deserialize, Serialize};

pub const ABOUT: &str = "about";

/// The about record lives under a single fixed document id.
pub const ABOUT_SINGLETON: &str = "main";

/// Singleton page content, edited by full overwrite.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AboutContent {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub contact_email: Option<String>,
}
