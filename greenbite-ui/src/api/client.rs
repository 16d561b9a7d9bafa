//! HTTP API Client
//!
//! Functions for communicating with the GreenBite backend.

use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use wasm_bindgen::JsValue;
use web_sys::{Blob, BlobPropertyBag, FormData};

use greenbite::api::{DetectionReport, LeaderboardEntry, TrendPoint, DEFAULT_BACKEND_URL};
use greenbite::capture::CapturedImage;

const BACKEND_URL_KEY: &str = "greenbite_backend_url";

/// Get the backend URL from local storage or use the default
pub fn get_backend_base() -> String {
    let url = web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(BACKEND_URL_KEY).ok().flatten())
        .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());

    url.trim_end_matches('/').to_string()
}

/// Set the backend URL in local storage
pub fn set_backend_base(url: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            let _ = storage.set_item(BACKEND_URL_KEY, url);
        }
    }
}

/// Wrap the image bytes in a typed `Blob`
pub fn image_blob(image: &CapturedImage) -> Result<Blob, String> {
    let bytes = js_sys::Uint8Array::from(image.bytes.as_slice());
    let parts = js_sys::Array::of1(&bytes);

    let options = BlobPropertyBag::new();
    options.set_type(&image.mime_type);

    Blob::new_with_u8_array_sequence_and_options(&parts, &options).map_err(js_error)
}

/// Upload a meal image as multipart field `image`
pub async fn detect(image: CapturedImage) -> Result<DetectionReport, String> {
    let form = FormData::new().map_err(js_error)?;
    let blob = image_blob(&image)?;
    form.append_with_blob_and_filename("image", &blob, &image.filename)
        .map_err(js_error)?;

    let response = Request::post(&format!("{}/detect", get_backend_base()))
        .body(form)
        .map_err(|e| format!("Request build error: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    parse(response).await
}

/// Fetch the leaderboard in backend order
pub async fn fetch_leaderboard() -> Result<Vec<LeaderboardEntry>, String> {
    get_json(&format!("{}/leaderboard", get_backend_base())).await
}

/// Fetch a user's daily emissions
pub async fn fetch_trend(user_id: &str) -> Result<Vec<TrendPoint>, String> {
    get_json(&format!(
        "{}/trend/{}",
        get_backend_base(),
        String::from(js_sys::encode_uri_component(user_id))
    ))
    .await
}

async fn get_json<T: DeserializeOwned>(url: &str) -> Result<T, String> {
    let response = Request::get(url)
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    parse(response).await
}

async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, String> {
    if !response.ok() {
        let body = response.text().await.unwrap_or_default();
        return Err(if body.is_empty() {
            format!("HTTP {}", response.status())
        } else {
            format!("HTTP {}: {}", response.status(), body)
        });
    }

    response
        .json()
        .await
        .map_err(|e| format!("Parse error: {}", e))
}

fn js_error(value: JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}
