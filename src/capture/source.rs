//! Live frame sources

use std::path::PathBuf;

/// A live camera preview that can produce a still on demand
pub trait FrameSource {
    /// Grab the current frame as JPEG bytes.
    ///
    /// Returns `None` when no camera is available or no frame is ready.
    fn snapshot(&mut self) -> Option<Vec<u8>>;
}

impl<F> FrameSource for F
where
    F: FnMut() -> Option<Vec<u8>>,
{
    fn snapshot(&mut self) -> Option<Vec<u8>> {
        self()
    }
}

/// Camera backed by a frame file that a capture daemon keeps overwriting
/// (e.g. `fswebcam --loop` or `ffmpeg -update 1`).
#[derive(Debug, Clone)]
pub struct FileFrameSource {
    path: PathBuf,
}

impl FileFrameSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl FrameSource for FileFrameSource {
    fn snapshot(&mut self) -> Option<Vec<u8>> {
        match std::fs::read(&self.path) {
            Ok(bytes) if !bytes.is_empty() => Some(bytes),
            Ok(_) => {
                tracing::debug!("Frame file {:?} is empty", self.path);
                None
            }
            Err(e) => {
                tracing::debug!("No frame at {:?}: {}", self.path, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_frame_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.jpg");
        let mut camera = FileFrameSource::new(&path);

        assert_eq!(camera.snapshot(), None);

        std::fs::write(&path, b"").unwrap();
        assert_eq!(camera.snapshot(), None);

        std::fs::write(&path, [0xFF, 0xD8]).unwrap();
        assert_eq!(camera.snapshot(), Some(vec![0xFF, 0xD8]));
    }

    #[test]
    fn test_closure_source() {
        let mut frames = vec![vec![3u8], vec![2u8]];
        let mut camera = move || -> Option<Vec<u8>> { frames.pop() };
        assert_eq!(camera.snapshot(), Some(vec![2]));
        assert_eq!(camera.snapshot(), Some(vec![3]));
        assert_eq!(camera.snapshot(), None);
    }
}
