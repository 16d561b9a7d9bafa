//! Capture surface state machine

use super::image::CapturedImage;
use super::source::FrameSource;

/// How a still was acquired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    Camera,
    FilePicker,
}

/// Current state of the surface
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureState {
    /// Live preview (or empty picker); acquisitions accepted
    Live,
    /// Showing the acquired still; only retake is offered
    Review {
        image: CapturedImage,
        mode: CaptureMode,
    },
}

/// Which actions the surface currently offers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub capture: bool,
    pub upload: bool,
    pub retake: bool,
}

/// Acquires one still at a time and reports it through `on_capture`
pub struct CaptureSurface<F>
where
    F: FnMut(CapturedImage),
{
    state: CaptureState,
    on_capture: F,
}

impl<F> CaptureSurface<F>
where
    F: FnMut(CapturedImage),
{
    pub fn new(on_capture: F) -> Self {
        Self {
            state: CaptureState::Live,
            on_capture,
        }
    }

    pub fn state(&self) -> &CaptureState {
        &self.state
    }

    pub fn is_live(&self) -> bool {
        matches!(self.state, CaptureState::Live)
    }

    /// The still being reviewed, if any
    pub fn review_image(&self) -> Option<&CapturedImage> {
        match &self.state {
            CaptureState::Review { image, .. } => Some(image),
            CaptureState::Live => None,
        }
    }

    pub fn controls(&self) -> Controls {
        let live = self.is_live();
        Controls {
            capture: live,
            upload: live,
            retake: !live,
        }
    }

    /// Take a snapshot from the live preview.
    ///
    /// Returns whether a still was acquired. An unavailable camera is a
    /// no-op: nothing fires and the surface stays live.
    pub fn snap<S: FrameSource + ?Sized>(&mut self, source: &mut S) -> bool {
        if !self.is_live() {
            tracing::debug!("Snapshot ignored while reviewing a capture");
            return false;
        }

        match source.snapshot() {
            Some(bytes) => {
                self.acquire(CapturedImage::snapshot(bytes), CaptureMode::Camera);
                true
            }
            None => {
                tracing::warn!("Camera unavailable, no snapshot taken");
                false
            }
        }
    }

    /// Accept an image chosen in the file picker
    pub fn pick(&mut self, image: CapturedImage) -> bool {
        if !self.is_live() {
            tracing::debug!("Upload ignored while reviewing a capture");
            return false;
        }

        self.acquire(image, CaptureMode::FilePicker);
        true
    }

    /// Accept raw picked file contents with the type the picker reported
    pub fn pick_file(
        &mut self,
        filename: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> bool {
        self.pick(CapturedImage::picked_as(filename, mime_type, bytes))
    }

    /// Discard the reviewed still and go back to live
    pub fn retake(&mut self) {
        self.state = CaptureState::Live;
    }

    fn acquire(&mut self, image: CapturedImage, mode: CaptureMode) {
        if image.is_empty() {
            tracing::warn!(filename = %image.filename, "Captured image has no content");
        }
        tracing::info!(
            filename = %image.filename,
            bytes = image.len(),
            ?mode,
            "Meal image captured"
        );

        // Listener first, then the review state
        (self.on_capture)(image.clone());
        self.state = CaptureState::Review { image, mode };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording_surface() -> (
        CaptureSurface<impl FnMut(CapturedImage)>,
        Rc<RefCell<Vec<CapturedImage>>>,
    ) {
        let captured = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&captured);
        let surface = CaptureSurface::new(move |image| sink.borrow_mut().push(image));
        (surface, captured)
    }

    #[test]
    fn test_snapshot_fires_once_with_jpeg() {
        let (mut surface, captured) = recording_surface();
        let mut camera = || -> Option<Vec<u8>> { Some(vec![0xFF, 0xD8, 0xFF]) };

        assert!(surface.snap(&mut camera));

        let captured = captured.borrow();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].filename, "capture.jpg");
        assert_eq!(captured[0].mime_type, "image/jpeg");
        assert_eq!(surface.review_image(), Some(&captured[0]));
    }

    #[test]
    fn test_review_only_offers_retake() {
        let (mut surface, captured) = recording_surface();
        let mut camera = || -> Option<Vec<u8>> { Some(vec![1]) };

        assert_eq!(
            surface.controls(),
            Controls { capture: true, upload: true, retake: false }
        );

        surface.snap(&mut camera);
        assert_eq!(
            surface.controls(),
            Controls { capture: false, upload: false, retake: true }
        );

        // Further acquisitions are ignored while reviewing
        assert!(!surface.snap(&mut camera));
        assert!(!surface.pick(CapturedImage::snapshot(vec![2])));
        assert_eq!(captured.borrow().len(), 1);
    }

    #[test]
    fn test_retake_does_not_refire() {
        let (mut surface, captured) = recording_surface();
        let mut camera = || -> Option<Vec<u8>> { Some(vec![1]) };

        surface.snap(&mut camera);
        surface.retake();

        assert!(surface.is_live());
        assert_eq!(surface.review_image(), None);
        assert_eq!(
            surface.controls(),
            Controls { capture: true, upload: true, retake: false }
        );
        assert_eq!(captured.borrow().len(), 1);

        surface.snap(&mut camera);
        assert_eq!(captured.borrow().len(), 2);
    }

    #[test]
    fn test_camera_unavailable_is_noop() {
        let (mut surface, captured) = recording_surface();
        let mut camera = || -> Option<Vec<u8>> { None };

        assert!(!surface.snap(&mut camera));
        assert!(surface.is_live());
        assert!(captured.borrow().is_empty());
    }

    #[test]
    fn test_pick_file() {
        let (mut surface, captured) = recording_surface();

        assert!(surface.pick_file("salad.avif", "image/avif", vec![9, 9]));
        assert_eq!(captured.borrow()[0].filename, "salad.avif");
        assert_eq!(captured.borrow()[0].mime_type, "image/avif");
        assert!(matches!(
            surface.state(),
            CaptureState::Review { mode: CaptureMode::FilePicker, .. }
        ));

        // Ignored while reviewing
        assert!(!surface.pick_file("soup.jpg", "image/jpeg", vec![1]));
        assert_eq!(captured.borrow().len(), 1);

        surface.retake();
        assert!(surface.pick_file("IMG_0042", "", Vec::new()));
        assert_eq!(captured.borrow()[1].mime_type, "application/octet-stream");
        assert_eq!(captured.borrow().len(), 2);
    }
}
