//! Content types for uploaded media.

use std::path::Path;

pub const MP4: &str = "video/mp4";
pub const JPEG: &str = "image/jpeg";

/// Image content type inferred from the file extension.
///
/// Only the formats accepted as animation sources are recognised.
pub fn image_mime_type(path: impl AsRef<Path>) -> Option<&'static str> {
    let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some(JPEG),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}
