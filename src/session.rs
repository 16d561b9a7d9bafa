//! Detection Session
//!
//! Tracks one meal detection at a time:
//!
//! ```text
//!   Idle ──begin_capture──▶ Capturing ──submit──▶ AwaitingResult
//!    ▲                          │                    │       │
//!    └──────cancel_capture──────┘                    │ Ok    │ Err
//!    ▲◀──────────────────────────────────────────────┘       ▼
//!    └──────────────────────dismiss_error─────────────── Error
//! ```
//!
//! Triggers outside `Idle` are rejected, so a second tap while a photo is
//! being analyzed cannot start a second upload. The last good report stays
//! visible across failures and is only replaced by a newer good report.

use futures_util::future::{AbortHandle, AbortRegistration, Abortable};
use std::fmt;
use std::future::Future;
use thiserror::Error;

use crate::api::DetectionReport;
use crate::capture::CapturedImage;

/// Where the session is in the capture → analyze cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Capturing,
    AwaitingResult,
    Error { message: String },
}

impl SessionState {
    fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Capturing => "capturing",
            SessionState::AwaitingResult => "awaiting result",
            SessionState::Error { .. } => "error",
        }
    }
}

/// Identifies one submitted detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TicketId(u64);

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A submitted image together with the means to abort its upload
pub struct DetectionTicket {
    id: TicketId,
    image: CapturedImage,
    registration: AbortRegistration,
}

/// Outcome of running a ticket: `None` when the call was aborted
pub struct Completed<T> {
    pub id: TicketId,
    pub result: Option<T>,
}

impl DetectionTicket {
    pub fn id(&self) -> TicketId {
        self.id
    }

    pub fn image(&self) -> &CapturedImage {
        &self.image
    }

    /// Run the upload for this ticket. Aborting the session while the
    /// call is pending resolves it immediately with `result: None`.
    pub async fn run<F, Fut, T>(self, call: F) -> Completed<T>
    where
        F: FnOnce(CapturedImage) -> Fut,
        Fut: Future<Output = T>,
    {
        let id = self.id;
        let result = Abortable::new(call(self.image), self.registration)
            .await
            .ok();

        Completed { id, result }
    }
}

/// A trigger arrived while the session was not idle
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Cannot {action} while {state}")]
    Busy {
        action: &'static str,
        state: &'static str,
    },
}

struct InFlight {
    id: TicketId,
    abort: AbortHandle,
}

/// Single-flight detection state plus the last good report
pub struct DetectionSession {
    state: SessionState,
    report: Option<DetectionReport>,
    in_flight: Option<InFlight>,
    next_ticket: u64,
}

impl Default for DetectionSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectionSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            report: None,
            in_flight: None,
            next_ticket: 1,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The report currently on screen
    pub fn report(&self) -> Option<&DetectionReport> {
        self.report.as_ref()
    }

    /// Busy flag: a detection is in flight
    pub fn is_loading(&self) -> bool {
        self.state == SessionState::AwaitingResult
    }

    pub fn is_idle(&self) -> bool {
        self.state == SessionState::Idle
    }

    /// Message of the failed detection awaiting acknowledgement
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            SessionState::Error { message } => Some(message),
            _ => None,
        }
    }

    /// Idle → Capturing
    pub fn begin_capture(&mut self) -> Result<(), SessionError> {
        self.require_idle("start a capture")?;
        self.state = SessionState::Capturing;
        Ok(())
    }

    /// Capturing → Idle
    pub fn cancel_capture(&mut self) {
        if self.state == SessionState::Capturing {
            self.state = SessionState::Idle;
        }
    }

    /// Capturing (or Idle, for a direct upload) → AwaitingResult
    pub fn submit(&mut self, image: CapturedImage) -> Result<DetectionTicket, SessionError> {
        match self.state {
            SessionState::Idle | SessionState::Capturing => {}
            _ => return Err(self.busy("submit a photo")),
        }

        let id = TicketId(self.next_ticket);
        self.next_ticket += 1;

        let (abort, registration) = AbortHandle::new_pair();
        self.in_flight = Some(InFlight { id, abort });
        self.state = SessionState::AwaitingResult;

        tracing::debug!(ticket = %id, filename = %image.filename, "Detection submitted");

        Ok(DetectionTicket {
            id,
            image,
            registration,
        })
    }

    /// Apply the result of a ticket.
    ///
    /// Returns `false` when the ticket is stale (aborted or superseded),
    /// in which case nothing changes.
    pub fn resolve(&mut self, id: TicketId, result: Result<DetectionReport, String>) -> bool {
        match &self.in_flight {
            Some(in_flight) if in_flight.id == id => {}
            _ => {
                tracing::debug!(ticket = %id, "Ignoring result of stale detection");
                return false;
            }
        }

        self.in_flight = None;
        match result {
            Ok(report) => {
                tracing::info!(
                    ticket = %id,
                    items = report.detected_items.len(),
                    total_co2 = report.total_co2,
                    "Detection complete"
                );
                self.report = Some(report);
                self.state = SessionState::Idle;
            }
            Err(message) => {
                tracing::error!(ticket = %id, error = %message, "Detection failed");
                self.state = SessionState::Error { message };
            }
        }
        true
    }

    /// Error → Idle, once the alert has been acknowledged
    pub fn dismiss_error(&mut self) {
        if matches!(self.state, SessionState::Error { .. }) {
            self.state = SessionState::Idle;
        }
    }

    /// Abort any in-flight detection and return to Idle. The shown report is kept.
    pub fn abort(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            tracing::debug!(ticket = %in_flight.id, "Aborting detection");
            in_flight.abort.abort();
        }

        if matches!(
            self.state,
            SessionState::AwaitingResult | SessionState::Capturing
        ) {
            self.state = SessionState::Idle;
        }
    }

    fn require_idle(&self, action: &'static str) -> Result<(), SessionError> {
        if self.is_idle() {
            Ok(())
        } else {
            Err(self.busy(action))
        }
    }

    fn busy(&self, action: &'static str) -> SessionError {
        SessionError::Busy {
            action,
            state: self.state.name(),
        }
    }
}

impl Drop for DetectionSession {
    fn drop(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.abort.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(total_co2: f64) -> DetectionReport {
        DetectionReport {
            detected_items: vec!["pasta".to_string()],
            total_co2,
            metaphor: "That's like charging your phone 100 times.".to_string(),
            swaps: Vec::new(),
            leaderboard_rank: None,
        }
    }

    fn image() -> CapturedImage {
        CapturedImage::snapshot(vec![0xFF, 0xD8])
    }

    #[test]
    fn test_happy_path() {
        let mut session = DetectionSession::new();
        session.begin_capture().unwrap();
        assert_eq!(session.state(), &SessionState::Capturing);

        let ticket = session.submit(image()).unwrap();
        assert!(session.is_loading());

        assert!(session.resolve(ticket.id(), Ok(report(0.8))));
        assert!(session.is_idle());
        assert!(!session.is_loading());
        assert_eq!(session.report().map(|r| r.total_co2), Some(0.8));
    }

    #[test]
    fn test_rejects_triggers_outside_idle() {
        let mut session = DetectionSession::new();
        let _ticket = session.submit(image()).unwrap();

        assert_eq!(
            session.begin_capture(),
            Err(SessionError::Busy {
                action: "start a capture",
                state: "awaiting result"
            })
        );
        assert!(session.submit(image()).is_err());
    }

    #[test]
    fn test_failure_keeps_previous_report() {
        let mut session = DetectionSession::new();

        let ticket = session.submit(image()).unwrap();
        session.resolve(ticket.id(), Ok(report(1.5)));

        let ticket = session.submit(image()).unwrap();
        session.resolve(ticket.id(), Err("Backend unavailable".to_string()));

        assert!(!session.is_loading());
        assert_eq!(session.error(), Some("Backend unavailable"));
        assert_eq!(session.report().map(|r| r.total_co2), Some(1.5));

        // Error must be acknowledged before the next capture or upload
        assert!(session.begin_capture().is_err());
        assert_eq!(
            session.submit(image()).err(),
            Some(SessionError::Busy {
                action: "submit a photo",
                state: "error"
            })
        );
        assert_eq!(session.error(), Some("Backend unavailable"));
        session.dismiss_error();
        assert!(session.begin_capture().is_ok());
    }

    #[test]
    fn test_failure_with_no_prior_report() {
        let mut session = DetectionSession::new();
        let ticket = session.submit(image()).unwrap();
        session.resolve(ticket.id(), Err("boom".to_string()));

        assert!(!session.is_loading());
        assert!(session.report().is_none());
    }

    #[test]
    fn test_cancel_capture() {
        let mut session = DetectionSession::new();
        session.begin_capture().unwrap();
        session.cancel_capture();
        assert!(session.is_idle());
    }

    #[test]
    fn test_stale_ticket_ignored() {
        let mut session = DetectionSession::new();
        let ticket = session.submit(image()).unwrap();
        let id = ticket.id();

        session.abort();
        assert!(session.is_idle());
        assert!(!session.resolve(id, Ok(report(9.9))));
        assert!(session.report().is_none());
    }

    #[tokio::test]
    async fn test_abort_cancels_in_flight_call() {
        let mut session = DetectionSession::new();
        let ticket = session.submit(image()).unwrap();

        session.abort();

        let completed = ticket
            .run(|_image| futures_util::future::pending::<Result<DetectionReport, String>>())
            .await;
        assert!(completed.result.is_none());
        assert!(session.is_idle());
    }

    #[tokio::test]
    async fn test_run_passes_image_through() {
        let mut session = DetectionSession::new();
        let ticket = session.submit(image()).unwrap();

        let completed = ticket
            .run(|image| async move { image.filename })
            .await;

        assert_eq!(completed.result.as_deref(), Some("capture.jpg"));
        assert!(session.resolve(completed.id, Ok(report(2.0))));
    }
}
