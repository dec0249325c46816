//! Image attachments and their object-storage keys.

use std::fmt;

use crate::models::ParticipantId;

/// Extension used when neither the file name nor the MIME type gives one
pub const DEFAULT_IMAGE_EXTENSION: &str = "jpg";
/// Folder inside the bucket that holds session images
pub const SESSION_IMAGE_PREFIX: &str = "sessions";

/// An image picked on the creation form, not yet uploaded.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for ImageAttachment {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ImageAttachment")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

impl ImageAttachment {
    /// Extension from the file name, else the MIME subtype, else `jpg`.
    #[must_use]
    pub fn extension(&self) -> String {
        extension_from_file_name(&self.file_name)
            .or_else(|| {
                self.content_type
                    .as_deref()
                    .and_then(extension_from_content_type)
            })
            .unwrap_or_else(|| DEFAULT_IMAGE_EXTENSION.to_string())
    }

    /// Content type to send with the upload
    #[must_use]
    pub fn upload_content_type(&self) -> String {
        self.content_type
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map_or_else(|| "application/octet-stream".to_string(), str::to_string)
    }
}

/// Object key for an image uploaded by `participant` at `timestamp_ms`:
/// `sessions/{participantId}-{timestamp}.{ext}`.
#[must_use]
pub fn session_image_path(
    participant: &ParticipantId,
    timestamp_ms: i64,
    image: &ImageAttachment,
) -> String {
    format!(
        "{SESSION_IMAGE_PREFIX}/{participant}-{timestamp_ms}.{}",
        image.extension()
    )
}

fn extension_from_file_name(file_name: &str) -> Option<String> {
    let (_, extension) = file_name.trim().rsplit_once('.')?;
    let extension = extension.trim().to_ascii_lowercase();
    if extension.is_empty() {
        None
    } else {
        Some(extension)
    }
}

fn extension_from_content_type(content_type: &str) -> Option<String> {
    let subtype = content_type.split(';').next()?.rsplit('/').next()?;
    let subtype = subtype.trim().to_ascii_lowercase();
    if subtype.is_empty() {
        None
    } else {
        Some(subtype)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(file_name: &str, content_type: Option<&str>) -> ImageAttachment {
        ImageAttachment {
            file_name: file_name.to_string(),
            content_type: content_type.map(str::to_string),
            bytes: vec![1, 2, 3],
        }
    }

    #[test]
    fn extension_prefers_file_name() {
        assert_eq!(image("Ritual.PNG", Some("image/jpeg")).extension(), "png");
    }

    #[test]
    fn extension_falls_back_to_content_type() {
        assert_eq!(image("ritual", Some("image/webp")).extension(), "webp");
        assert_eq!(
            image("ritual", Some("image/svg+xml; charset=utf-8")).extension(),
            "svg+xml"
        );
    }

    #[test]
    fn extension_defaults_to_jpg() {
        assert_eq!(image("ritual", None).extension(), DEFAULT_IMAGE_EXTENSION);
        assert_eq!(image("ritual.", Some("")).extension(), DEFAULT_IMAGE_EXTENSION);
    }

    #[test]
    fn session_image_path_uses_participant_and_timestamp() {
        let participant = ParticipantId::from_stored("uid-1");
        let path = session_image_path(&participant, 1_700_000_000_000, &image("map.gif", None));
        assert_eq!(path, "sessions/uid-1-1700000000000.gif");
    }

    #[test]
    fn debug_hides_image_bytes() {
        let rendered = format!("{:?}", image("map.gif", None));
        assert!(rendered.contains("bytes: 3"));
    }
}
