//! Global Application State
//!
//! Reactive state management using Leptos signals. The detection session,
//! trend and leaderboard logic lives in the `greenbite` library; the signals
//! here only make it observable to components.

use leptos::*;

use greenbite::capture::CapturedImage;
use greenbite::panels::{LeaderboardPanel, TrendPanel};
use greenbite::session::{Completed, DetectionSession};
use greenbite::view::{format_footprint, DETECTION_FAILED_ALERT};

use crate::api;

/// User whose trend is shown
pub const DEFAULT_USER_ID: &str = "user_1";

/// Global application state provided to all components
#[derive(Clone, Copy)]
pub struct GlobalState {
    /// Single-flight detection plus the last good report
    pub session: RwSignal<DetectionSession>,
    /// Daily emissions for the current user
    pub trend: RwSignal<TrendPanel>,
    pub leaderboard: RwSignal<LeaderboardPanel>,
    /// Toasts currently on screen, oldest first
    pub notices: RwSignal<Vec<Notice>>,
    next_notice: StoredValue<u64>,
}

/// What a toast is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// A meal was analyzed
    Analyzed,
    /// A capture could not start or produced nothing
    CaptureProblem,
    /// The backend setting changed
    BackendChanged,
}

impl NoticeKind {
    /// How long the toast stays up
    pub fn duration_ms(self) -> u32 {
        match self {
            NoticeKind::Analyzed => 4000,
            NoticeKind::CaptureProblem => 5000,
            NoticeKind::BackendChanged => 2500,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub message: String,
}

/// Provide global state to the component tree
pub fn provide_global_state() -> GlobalState {
    let state = GlobalState {
        session: create_rw_signal(DetectionSession::new()),
        trend: create_rw_signal(TrendPanel::new(DEFAULT_USER_ID)),
        leaderboard: create_rw_signal(LeaderboardPanel::new()),
        notices: create_rw_signal(Vec::new()),
        next_notice: store_value(0),
    };

    provide_context(state);
    state
}

/// Get the global state from context
pub fn use_global_state() -> GlobalState {
    use_context::<GlobalState>().expect("GlobalState not found")
}

impl GlobalState {
    /// True while a detection is in flight
    pub fn is_analyzing(&self) -> bool {
        self.session.with(|s| s.is_loading())
    }

    /// Whether a new capture may start
    pub fn can_capture(&self) -> bool {
        self.session.with(|s| s.is_idle())
    }

    /// Idle → Capturing; false (with a toast) if busy
    pub fn begin_capture(&self) -> bool {
        match self.session.try_update(|s| s.begin_capture()) {
            Some(Ok(())) => true,
            Some(Err(e)) => {
                self.notify(NoticeKind::CaptureProblem, e.to_string());
                false
            }
            None => false,
        }
    }

    pub fn cancel_capture(&self) {
        self.session.update(|s| s.cancel_capture());
    }

    /// Submit a captured image and upload it in the background
    pub fn start_detection(&self, image: CapturedImage) {
        let ticket = match self.session.try_update(|s| s.submit(image)) {
            Some(Ok(ticket)) => ticket,
            Some(Err(e)) => {
                self.notify(NoticeKind::CaptureProblem, e.to_string());
                return;
            }
            None => return,
        };

        let state = *self;
        spawn_local(async move {
            let Completed { id, result } = ticket.run(api::detect).await;

            // Aborted: the session already moved on
            let Some(result) = result else {
                return;
            };

            if let Err(e) = &result {
                web_sys::console::error_1(&format!("Detection failed: {}", e).into());
            }

            let applied = state
                .session
                .try_update(|s| s.resolve(id, result))
                .unwrap_or(false);

            if !applied {
                return;
            }
            if state.session.with_untracked(|s| s.error().is_some()) {
                alert(DETECTION_FAILED_ALERT);
                state.session.update(|s| s.dismiss_error());
            } else if let Some(total) = state
                .session
                .with_untracked(|s| s.report().map(|r| r.total_co2))
            {
                state.notify(NoticeKind::Analyzed, format_footprint(total));
            }
        });
    }

    /// Abort any in-flight detection, keeping the shown report
    pub fn abort_detection(&self) {
        let _ = self.session.try_update_untracked(|s| s.abort());
    }

    /// Load the trend panel once
    pub fn load_trend(&self) {
        let trend = self.trend;
        spawn_local(async move {
            let user_id = trend.with_untracked(|panel| panel.user_id.clone());
            let result = api::fetch_trend(&user_id).await;
            if let Err(e) = &result {
                web_sys::console::error_1(&format!("Failed to fetch trend: {}", e).into());
            }
            trend.update(|panel| panel.finish(result));
        });
    }

    /// Load the leaderboard panel once
    pub fn load_leaderboard(&self) {
        let leaderboard = self.leaderboard;
        spawn_local(async move {
            let result = api::fetch_leaderboard().await;
            if let Err(e) = &result {
                web_sys::console::error_1(&format!("Failed to fetch leaderboard: {}", e).into());
            }
            leaderboard.update(|panel| panel.finish(result));
        });
    }

    /// Show a toast that removes itself after its kind's duration
    pub fn notify(&self, kind: NoticeKind, message: impl Into<String>) {
        let id = self.next_notice.get_value();
        self.next_notice.set_value(id + 1);

        self.notices.update(|notices| {
            notices.push(Notice {
                id,
                kind,
                message: message.into(),
            })
        });

        let notices = self.notices;
        gloo_timers::callback::Timeout::new(kind.duration_ms(), move || {
            let _ = notices.try_update(|notices| notices.retain(|n| n.id != id));
        })
        .forget();
    }
}

/// Blocking browser alert
fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}
