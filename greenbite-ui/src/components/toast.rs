//! Toast Notifications
//!
//! Stacked notices for detection results, capture problems and settings
//! changes. Each notice removes itself; clicking dismisses it early.

use leptos::*;

use crate::state::global::{use_global_state, Notice, NoticeKind};

/// Icon, accent and heading for a notice
fn appearance(kind: NoticeKind) -> (&'static str, &'static str, &'static str) {
    match kind {
        NoticeKind::Analyzed => ("🌱", "bg-green-700", "Meal analyzed"),
        NoticeKind::CaptureProblem => ("📷", "bg-red-700", "Capture failed"),
        NoticeKind::BackendChanged => ("⚙", "bg-gray-700", "Settings saved"),
    }
}

#[component]
pub fn Toast() -> impl IntoView {
    let state = use_global_state();

    view! {
        <div class="fixed bottom-6 right-4 z-50 flex flex-col space-y-2">
            <For
                each=move || state.notices.get()
                key=|notice| notice.id
                children=move |notice| view! { <NoticeCard notice=notice /> }
            />
        </div>
    }
}

#[component]
fn NoticeCard(notice: Notice) -> impl IntoView {
    let state = use_global_state();
    let (icon, accent, heading) = appearance(notice.kind);
    let id = notice.id;

    let dismiss = move |_| {
        state
            .notices
            .update(|notices| notices.retain(|n| n.id != id));
    };

    view! {
        <button
            on:click=dismiss
            class=format!(
                "flex items-start space-x-3 {} text-left text-white px-4 py-3 rounded-lg shadow-lg max-w-xs",
                accent
            )
        >
            <span class="text-xl leading-none">{icon}</span>
            <span class="flex flex-col">
                <span class="text-xs uppercase tracking-wide opacity-75">{heading}</span>
                <span class="text-sm font-medium">{notice.message}</span>
            </span>
        </button>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_kind_has_its_own_accent() {
        let accents = [
            NoticeKind::Analyzed,
            NoticeKind::CaptureProblem,
            NoticeKind::BackendChanged,
        ]
        .map(|kind| appearance(kind).1);

        assert_ne!(accents[0], accents[1]);
        assert_ne!(accents[1], accents[2]);
        assert!(NoticeKind::CaptureProblem.duration_ms() > NoticeKind::BackendChanged.duration_ms());
    }
}
