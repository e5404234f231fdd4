use once_cell::sync::Lazy;
use regex::Regex;

/// Returned when a URL carries no `v=` parameter.
pub const UNKNOWN_VIDEO_ID: &str = "unknown_video";

static VIDEO_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"v=([a-zA-Z0-9_-]+)").expect("video id pattern is valid"));

/// Pulls the `v=<token>` value out of a watch URL.
///
/// `https://www.youtube.com/watch?v=m9jMKheN0iU` gives `m9jMKheN0iU`. The URL
/// is not otherwise validated; anything without a match maps to
/// [`UNKNOWN_VIDEO_ID`].
pub fn extract_video_id(url: &str) -> String {
    VIDEO_ID_RE
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| UNKNOWN_VIDEO_ID.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stops_at_next_query_parameter() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s"),
            "dQw4w9WgXcQ"
        );
    }

    #[test]
    fn empty_value_is_not_a_match() {
        assert_eq!(extract_video_id("https://example.test/watch?v="), UNKNOWN_VIDEO_ID);
    }
}
