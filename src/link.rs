use url::Url;

/// Map a pasted share link to a canonical embeddable playback URL.
///
/// Two shapes are recognized: Drive file links carrying a `/d/{id}` path
/// segment, and YouTube watch links (`watch?v=` or `youtu.be/`). Anything
/// else is `None`, never an error.
pub fn normalize_share_link(link: &str) -> Option<String> {
    let url = Url::parse(link).ok()?;

    if let Some(id) = drive_file_id(&url) {
        return Some(format!("https://drive.google.com/file/d/{id}/preview"));
    }

    // links that are already in preview form pass through untouched
    if url.host_str() == Some("drive.google.com") && url.path().contains("preview") {
        return Some(link.to_string());
    }

    youtube_video_id(&url).map(|id| format!("https://www.youtube.com/embed/{id}"))
}

fn drive_file_id(url: &Url) -> Option<String> {
    let mut segments = url.path_segments()?;
    segments.find(|segment| *segment == "d")?;

    let id = segments.next()?;
    if id.is_empty() {
        return None;
    }
    Some(id.to_string())
}

fn youtube_video_id(url: &Url) -> Option<String> {
    let host = url.host_str()?;

    // short links carry the id as the final path segment
    if host == "youtu.be" {
        let id = url.path_segments()?.last()?;
        if id.is_empty() {
            return None;
        }
        return Some(id.to_string());
    }

    // watch links carry the id in the `v` query parameter
    if host.ends_with("youtube.com") {
        return url.query_pairs().find_map(|(key, value)| {
            (key == "v" && !value.is_empty()).then(|| value.to_string())
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drive_view_link_becomes_preview() {
        let result = normalize_share_link("https://drive.google.com/file/d/ABC123/view");
        assert_eq!(
            result.as_deref(),
            Some("https://drive.google.com/file/d/ABC123/preview")
        );
    }

    #[test]
    fn drive_share_link_with_query_becomes_preview() {
        let result =
            normalize_share_link("https://drive.google.com/file/d/1x_Y-2z/view?usp=sharing");
        assert_eq!(
            result.as_deref(),
            Some("https://drive.google.com/file/d/1x_Y-2z/preview")
        );
    }

    #[test]
    fn drive_preview_link_passes_through() {
        let link = "https://drive.google.com/file/d/ABC123/preview";
        assert_eq!(normalize_share_link(link).as_deref(), Some(link));
    }

    #[test]
    fn watch_link_becomes_embed() {
        let result = normalize_share_link("https://www.youtube.com/watch?v=XYZ");
        assert_eq!(
            result.as_deref(),
            Some("https://www.youtube.com/embed/XYZ")
        );
    }

    #[test]
    fn watch_link_with_other_queries_still_resolves() {
        let result = normalize_share_link(
            "https://www.youtube.com/watch?list=some-playlist&v=XYZ&feature=emb_logo",
        );
        assert_eq!(
            result.as_deref(),
            Some("https://www.youtube.com/embed/XYZ")
        );
    }

    #[test]
    fn short_link_becomes_embed() {
        let result = normalize_share_link("https://youtu.be/XYZ?t=1");
        assert_eq!(
            result.as_deref(),
            Some("https://www.youtube.com/embed/XYZ")
        );
    }

    #[test]
    fn watch_link_without_an_id_is_unrecognized() {
        assert_eq!(normalize_share_link("https://www.youtube.com/watch"), None);
    }

    #[test]
    fn unrelated_url_is_unrecognized() {
        assert_eq!(normalize_share_link("https://www.google.com"), None);
    }

    #[test]
    fn plain_text_is_unrecognized() {
        assert_eq!(normalize_share_link("not-a-url"), None);
    }
}
