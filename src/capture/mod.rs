//! Capture Surface
//!
//! Acquires a single still of a meal, either as a snapshot from a live
//! camera or from a picked file, and hands it to the caller.
//!
//! ## Flow
//!
//! 1. The surface starts `Live`: capture and upload are both offered
//! 2. A successful acquisition fires `on_capture` exactly once
//! 3. The surface enters `Review`, showing the still with only "retake"
//! 4. Retake discards the still and returns to `Live`

mod image;
mod source;
mod surface;

pub use image::{
    image_mime_for, CaptureError, CapturedImage, FALLBACK_MIME, SNAPSHOT_FILENAME, SNAPSHOT_MIME,
};
pub use source::{FileFrameSource, FrameSource};
pub use surface::{CaptureMode, CaptureState, CaptureSurface, Controls};
