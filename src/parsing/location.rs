//! Location and attachment extraction from message text.
//!
//! Text-based exports (WhatsApp, Signal) do not carry structured
//! locations. A shared location shows up as a map link inside the message,
//! e.g. `location: https://maps.google.com/?q=-34.9,-56.16`.

use std::sync::LazyLock;

use regex::Regex;

use crate::message::{Location, strip_path};

/// Map link patterns. Every regex captures latitude then longitude.
static LOCATION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // https://maps.google.com/?q=-34.9,-56.16 (also ll=, query=, %2C)
        r"(?i)(?:maps\.google\.[a-z.]+|google\.[a-z.]+/maps)[^\s]*?[?&](?:q|ll|query)=(-?\d{1,3}(?:\.\d+)?)\s*(?:,|%2C)\s*(-?\d{1,3}(?:\.\d+)?)",
        // https://www.google.com/maps/place/.../@-34.9,-56.16,17z
        r"(?i)google\.[a-z.]+/maps/[^\s]*?@(-?\d{1,3}\.\d+),(-?\d{1,3}\.\d+)",
        // https://maps.apple.com/?ll=-34.9,-56.16&q=Pin
        r"(?i)maps\.apple\.com/[^\s]*?[?&](?:ll|q|sll)=(-?\d{1,3}(?:\.\d+)?)(?:,|%2C)(-?\d{1,3}(?:\.\d+)?)",
        // https://www.openstreetmap.org/#map=17/-34.9/-56.16
        r"(?i)openstreetmap\.org/[^\s]*?#map=\d+/(-?\d{1,3}\.\d+)/(-?\d{1,3}\.\d+)",
        // geo:-34.9,-56.16
        r"(?i)\bgeo:(-?\d{1,3}(?:\.\d+)?),(-?\d{1,3}(?:\.\d+)?)",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

/// iOS: `<attached: 00000012-PHOTO-2024-01-15-10-30-45.jpg>`
static ATTACHED_TAG: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"<attached:\s*([^>]+?)\s*>").ok());

/// Android: `IMG-20240115-WA0001.jpg (file attached)`
static FILE_ATTACHED: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\s*(\S+\.[A-Za-z0-9]{2,5})\s+\((?:file attached|archivo adjunto|arquivo anexado|fichier joint|Datei angehängt)\)").ok());

/// Markdown media links: `![image.jpg](./media/image.jpg)` or `[clip.mp4](media/clip.mp4)`
static MARKDOWN_MEDIA: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"!?\[[^\]]*\]\(([^)\s]+)\)").ok());

const MEDIA_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "heic", "mp4"];

/// Finds the first map link in `text` and returns its coordinates.
///
/// ```
/// use chatmap::parsing::parse_location;
///
/// let loc = parse_location("location: https://maps.google.com/?q=-34.9,-56.16").unwrap();
/// assert_eq!((loc.latitude, loc.longitude), (-34.9, -56.16));
/// assert!(parse_location("no link here").is_none());
/// ```
pub fn parse_location(text: &str) -> Option<Location> {
    LOCATION_PATTERNS.iter().find_map(|regex| {
        let caps = regex.captures(text)?;
        Location::parse(caps.get(1)?.as_str(), caps.get(2)?.as_str())
    })
}

/// Returns `true` if `name` has a photo or video extension.
pub fn is_media_file(name: &str) -> bool {
    name.rsplit_once('.')
        .is_some_and(|(_, ext)| MEDIA_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// Extracts the basename of an attached photo or video from a WhatsApp line.
pub fn parse_whatsapp_attachment(text: &str) -> Option<String> {
    let clean = text.trim_start_matches('\u{200e}');
    let name = ATTACHED_TAG
        .as_ref()
        .and_then(|re| re.captures(clean))
        .or_else(|| FILE_ATTACHED.as_ref().and_then(|re| re.captures(clean)))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())?;
    media_basename(name)
}

/// Extracts the basename of a photo or video linked with markdown syntax.
pub fn parse_markdown_attachment(text: &str) -> Option<String> {
    MARKDOWN_MEDIA
        .as_ref()?
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .find_map(|m| media_basename(m.as_str()))
}

fn media_basename(path: &str) -> Option<String> {
    let name = strip_path(path.trim());
    is_media_file(name).then(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_google_query_link() {
        let loc = parse_location("https://maps.google.com/?q=51.5074,-0.1278").unwrap();
        assert_eq!(loc, Location::new(51.5074, -0.1278));
    }

    #[test]
    fn test_google_encoded_comma() {
        let loc = parse_location("https://maps.google.com/maps?q=-12.5%2C130.8").unwrap();
        assert_eq!(loc, Location::new(-12.5, 130.8));
    }

    #[test]
    fn test_google_place_at() {
        let loc =
            parse_location("https://www.google.com/maps/place/Plaza/@-34.906,-56.191,17z").unwrap();
        assert_eq!(loc, Location::new(-34.906, -56.191));
    }

    #[test]
    fn test_apple_and_geo_links() {
        assert_eq!(
            parse_location("https://maps.apple.com/?ll=10.5,20.25&q=Pin"),
            Some(Location::new(10.5, 20.25))
        );
        assert_eq!(parse_location("geo:1.5,2.5"), Some(Location::new(1.5, 2.5)));
    }

    #[test]
    fn test_osm_link() {
        let loc = parse_location("https://www.openstreetmap.org/#map=17/-34.9/-56.16").unwrap();
        assert_eq!(loc, Location::new(-34.9, -56.16));
    }

    #[test]
    fn test_out_of_range_is_ignored() {
        assert!(parse_location("https://maps.google.com/?q=123.0,10.0").is_none());
    }

    #[test]
    fn test_whatsapp_attachments() {
        assert_eq!(
            parse_whatsapp_attachment("<attached: 00000012-PHOTO-2024-01-15-10-30-45.jpg>").as_deref(),
            Some("00000012-PHOTO-2024-01-15-10-30-45.jpg")
        );
        assert_eq!(
            parse_whatsapp_attachment("\u{200e}VID-20240115-WA0002.mp4 (file attached)").as_deref(),
            Some("VID-20240115-WA0002.mp4")
        );
        assert!(parse_whatsapp_attachment("PTT-20240115-WA0003.opus (file attached)").is_none());
        assert!(parse_whatsapp_attachment("<Media omitted>").is_none());
    }

    #[test]
    fn test_markdown_attachments() {
        assert_eq!(
            parse_markdown_attachment("![image.jpg](./media/2024-03-02_09-05.jpg)").as_deref(),
            Some("2024-03-02_09-05.jpg")
        );
        assert!(parse_markdown_attachment("[notes.pdf](media/notes.pdf)").is_none());
    }

    #[test]
    fn test_is_media_file() {
        assert!(is_media_file("a.JPG"));
        assert!(is_media_file("clip.mp4"));
        assert!(!is_media_file("voice.opus"));
        assert!(!is_media_file("noext"));
    }
}
