//! Capture Component
//!
//! Live camera preview with a capture button, and a file picker fallback.
//! Either path hands one still to the detection session; the surface then
//! shows the still until the user retakes.

use leptos::*;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    CanvasRenderingContext2d, File, HtmlCanvasElement, HtmlInputElement, HtmlVideoElement,
    MediaStream, MediaStreamConstraints, MediaStreamTrack, Url,
};

use greenbite::capture::{CaptureSurface, CapturedImage, Controls, FrameSource, SNAPSHOT_MIME};
use greenbite::view::ANALYZING_MESSAGE;

use crate::api::client::image_blob;
use crate::components::loading::InlineLoading;
use crate::state::global::{use_global_state, NoticeKind};

type Surface = CaptureSurface<Box<dyn FnMut(CapturedImage)>>;

/// Draws the current video frame onto a canvas and encodes it as JPEG
struct VideoFrameSource {
    video: HtmlVideoElement,
    canvas: HtmlCanvasElement,
}

impl FrameSource for VideoFrameSource {
    fn snapshot(&mut self) -> Option<Vec<u8>> {
        let (width, height) = (self.video.video_width(), self.video.video_height());
        // No stream attached yet
        if width == 0 || height == 0 {
            return None;
        }

        self.canvas.set_width(width);
        self.canvas.set_height(height);

        let ctx = self
            .canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        ctx.draw_image_with_html_video_element(&self.video, 0.0, 0.0)
            .ok()?;

        let url = self.canvas.to_data_url_with_type(SNAPSHOT_MIME).ok()?;
        decode_data_url(&url)
    }
}

/// Bytes of a base64 `data:` URL
fn decode_data_url(url: &str) -> Option<Vec<u8>> {
    let (_, payload) = url.split_once(',')?;
    let binary = web_sys::window()?.atob(payload).ok()?;
    Some(binary.chars().map(|c| c as u8).collect())
}

async fn open_camera() -> Result<MediaStream, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let devices = window.navigator().media_devices()?;

    let constraints = MediaStreamConstraints::new();
    constraints.set_video(&JsValue::TRUE);

    let stream = JsFuture::from(devices.get_user_media_with_constraints(&constraints)?).await?;
    stream.dyn_into::<MediaStream>()
}

fn stop_camera(stream: &MediaStream) {
    for track in stream.get_tracks().iter() {
        if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
            track.stop();
        }
    }
}

async fn read_file(file: &File) -> Result<Vec<u8>, String> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|_| format!("Could not read {}", file.name()))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

/// Camera preview / file picker surface
#[component]
pub fn CapturePanel() -> impl IntoView {
    let state = use_global_state();

    let video_ref = create_node_ref::<html::Video>();
    let canvas_ref = create_node_ref::<html::Canvas>();

    let camera = store_value(None::<MediaStream>);
    let camera_ready = create_rw_signal(false);
    let preview_url = create_rw_signal(None::<String>);
    let controls = create_rw_signal(Controls {
        capture: true,
        upload: true,
        retake: false,
    });

    let on_capture: Box<dyn FnMut(CapturedImage)> =
        Box::new(move |image| state.start_detection(image));
    let surface: StoredValue<Surface> = store_value(CaptureSurface::new(on_capture));

    // Mirror the surface into signals after every transition
    let refresh = move || {
        let blob = surface.with_value(|s| s.review_image().map(image_blob));
        let url = match blob {
            Some(Ok(blob)) => Url::create_object_url_with_blob(&blob).ok(),
            Some(Err(e)) => {
                web_sys::console::warn_1(&format!("Preview unavailable: {}", e).into());
                None
            }
            None => None,
        };

        if let Some(old) = preview_url.get_untracked() {
            let _ = Url::revoke_object_url(&old);
        }
        preview_url.set(url);
        controls.set(surface.with_value(|s| s.controls()));
    };

    // Attach the camera once the video element is mounted
    create_effect(move |_| {
        if let Some(video) = video_ref.get() {
            spawn_local(async move {
                match open_camera().await {
                    Ok(stream) => {
                        video.set_src_object(Some(&stream));
                        let _ = video.play();
                        camera.set_value(Some(stream));
                        camera_ready.set(true);
                    }
                    Err(e) => {
                        web_sys::console::warn_2(&"Camera unavailable:".into(), &e);
                    }
                }
            });
        }
    });

    on_cleanup(move || {
        camera.try_with_value(|stream| {
            if let Some(stream) = stream {
                stop_camera(stream);
            }
        });
        if let Some(Some(url)) = preview_url.try_get_untracked() {
            let _ = Url::revoke_object_url(&url);
        }
    });

    let on_snap = move |_| {
        if !state.begin_capture() {
            return;
        }

        let (Some(video), Some(canvas)) = (video_ref.get_untracked(), canvas_ref.get_untracked())
        else {
            state.cancel_capture();
            return;
        };

        let mut source = VideoFrameSource {
            video: (*video).clone(),
            canvas: (*canvas).clone(),
        };

        let acquired = surface
            .try_update_value(|s| s.snap(&mut source))
            .unwrap_or(false);
        if acquired {
            refresh();
        } else {
            state.cancel_capture();
            state.notify(NoticeKind::CaptureProblem, "Camera unavailable");
        }
    };

    let on_file = move |ev: ev::Event| {
        let input: HtmlInputElement = event_target(&ev);
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };
        // Picking the same file again must still fire `change`
        input.set_value("");

        if !state.begin_capture() {
            return;
        }

        spawn_local(async move {
            let picked = match read_file(&file).await {
                // The browser reports "" for types it does not know
                Ok(bytes) => Ok(surface
                    .try_update_value(|s| s.pick_file(file.name(), file.type_(), bytes))
                    .unwrap_or(false)),
                Err(e) => Err(e),
            };

            match picked {
                Ok(true) => refresh(),
                Ok(false) => state.cancel_capture(),
                Err(e) => {
                    state.cancel_capture();
                    state.notify(NoticeKind::CaptureProblem, e);
                }
            }
        });
    };

    let on_retake = move |_| {
        surface.update_value(|s| s.retake());
        refresh();
    };

    let busy = move || !state.can_capture();

    view! {
        <div class="bg-gray-800 rounded-lg p-4 space-y-4">
            <div class="relative">
                <video
                    node_ref=video_ref
                    autoplay=true
                    playsinline=true
                    muted=true
                    class=move || {
                        if preview_url.get().is_some() {
                            "hidden"
                        } else {
                            "w-full rounded-lg bg-black"
                        }
                    }
                />
                {move || preview_url.get().map(|src| view! {
                    <img src=src alt="Captured meal" class="w-full rounded-lg" />
                })}
                <canvas node_ref=canvas_ref class="hidden" />

                {move || (!camera_ready.get() && preview_url.get().is_none()).then(|| view! {
                    <p class="absolute inset-0 flex items-center justify-center text-sm text-gray-400">
                        "Camera unavailable, upload a photo instead"
                    </p>
                })}
            </div>

            <div class="flex flex-wrap gap-2">
                <Show when=move || controls.get().capture>
                    <button
                        on:click=on_snap
                        disabled=move || busy() || !camera_ready.get()
                        class="px-4 py-2 rounded-lg bg-green-600 hover:bg-green-500 disabled:opacity-50 text-white font-medium"
                    >
                        "Capture"
                    </button>
                </Show>

                <Show when=move || controls.get().upload>
                    <label class="px-4 py-2 rounded-lg bg-gray-700 hover:bg-gray-600 text-gray-200 font-medium cursor-pointer">
                        "Upload photo"
                        <input
                            type="file"
                            accept="image/*"
                            class="hidden"
                            disabled=busy
                            on:change=on_file
                        />
                    </label>
                </Show>

                <Show when=move || controls.get().retake>
                    <button
                        on:click=on_retake
                        disabled=move || state.is_analyzing()
                        class="px-4 py-2 rounded-lg bg-gray-700 hover:bg-gray-600 disabled:opacity-50 text-gray-200 font-medium"
                    >
                        "Retake"
                    </button>
                </Show>
            </div>

            {move || state.is_analyzing().then(|| view! {
                <p class="flex items-center space-x-2 text-sm text-green-400">
                    <InlineLoading />
                    <span>{ANALYZING_MESSAGE}</span>
                </p>
            })}
        </div>
    }
}
