//! Captured image payloads

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Filename given to every camera snapshot
pub const SNAPSHOT_FILENAME: &str = "capture.jpg";

/// MIME type of every camera snapshot
pub const SNAPSHOT_MIME: &str = "image/jpeg";

/// Type sent when a picked file's type is unknown
pub const FALLBACK_MIME: &str = "application/octet-stream";

/// A still image ready to be uploaded
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedImage {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl CapturedImage {
    /// Wrap a camera frame. Snapshots are always JPEG named `capture.jpg`.
    pub fn snapshot(bytes: Vec<u8>) -> Self {
        Self {
            filename: SNAPSHOT_FILENAME.to_string(),
            mime_type: SNAPSHOT_MIME.to_string(),
            bytes,
        }
    }

    /// Wrap a picked file, keeping its own name.
    ///
    /// The picker's `image/*` filter is the only check; whatever it hands
    /// over is uploaded. The type is guessed from the extension.
    pub fn picked(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::picked_as(filename, "", bytes)
    }

    /// Wrap a picked file whose type the platform reported.
    ///
    /// An empty `mime_type` is guessed from the extension, then falls back
    /// to `application/octet-stream`.
    pub fn picked_as(
        filename: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        let filename = filename.into();
        let mut mime_type = mime_type.into();
        if mime_type.is_empty() {
            mime_type = image_mime_for(&filename)
                .unwrap_or(FALLBACK_MIME)
                .to_string();
        }

        Self {
            filename,
            mime_type,
            bytes,
        }
    }

    /// Read a picked file from disk
    pub fn from_path(path: &Path) -> Result<Self, CaptureError> {
        let bytes = std::fs::read(path).map_err(|e| CaptureError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());

        Ok(Self::picked(filename, bytes))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// MIME type for a common image filename, by extension
pub fn image_mime_for(filename: &str) -> Option<&'static str> {
    let ext = Path::new(filename).extension()?.to_str()?.to_ascii_lowercase();

    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        "heic" => Some("image/heic"),
        "avif" => Some("image/avif"),
        "tif" | "tiff" => Some("image/tiff"),
        "jfif" => Some("image/jpeg"),
        _ => None,
    }
}

/// Errors raised while acquiring an image
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Failed to read {path:?}: {error}")]
    Io { path: PathBuf, error: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_snapshot_is_named_jpeg() {
        let image = CapturedImage::snapshot(vec![0xFF, 0xD8, 0xFF]);
        assert_eq!(image.filename, "capture.jpg");
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.len(), 3);
    }

    #[test]
    fn test_picked_keeps_name() {
        let image = CapturedImage::picked("Lunch.PNG", vec![1, 2, 3]);
        assert_eq!(image.filename, "Lunch.PNG");
        assert_eq!(image.mime_type, "image/png");
    }

    #[test]
    fn test_picked_accepts_anything_the_picker_offers() {
        let avif = CapturedImage::picked("meal.avif", vec![1, 2, 3]);
        assert_eq!(avif.mime_type, "image/avif");

        let bare = CapturedImage::picked("IMG_0042", vec![1, 2, 3]);
        assert_eq!(bare.filename, "IMG_0042");
        assert_eq!(bare.mime_type, "application/octet-stream");

        let empty = CapturedImage::picked("meal.jpg", Vec::new());
        assert!(empty.is_empty());
        assert_eq!(empty.mime_type, "image/jpeg");
    }

    #[test]
    fn test_picked_as_uses_reported_type() {
        let image = CapturedImage::picked_as("meal.jfif", "image/pjpeg", vec![1]);
        assert_eq!(image.mime_type, "image/pjpeg");

        let guessed = CapturedImage::picked_as("meal.webp", "", vec![1]);
        assert_eq!(guessed.mime_type, "image/webp");

        let unknown = CapturedImage::picked_as("meal", "", vec![1]);
        assert_eq!(unknown.mime_type, "application/octet-stream");
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dinner.jpeg");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(&[0xFF, 0xD8, 0xFF, 0xE0]).unwrap();

        let image = CapturedImage::from_path(&path).unwrap();
        assert_eq!(image.filename, "dinner.jpeg");
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.bytes, vec![0xFF, 0xD8, 0xFF, 0xE0]);

        let missing = CapturedImage::from_path(&dir.path().join("missing.jpg"));
        assert!(matches!(missing, Err(CaptureError::Io { .. })));
    }

    #[test]
    fn test_mime_lookup() {
        assert_eq!(image_mime_for("a.webp"), Some("image/webp"));
        assert_eq!(image_mime_for("photo"), None);
    }
}
