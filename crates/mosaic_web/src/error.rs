use mosaic_asset::ManifestError;
use mosaic_core::GridError;
use mosaic_services::SettingsError;
use thiserror::Error;

/// Anything that stops the grid from starting in the browser.
#[derive(Debug, Error)]
pub enum WebError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error("invalid manifest: {0}")]
    Manifest(#[from] ManifestError),

    #[error("invalid settings: {0}")]
    Settings(#[from] SettingsError),

    #[cfg(target_arch = "wasm32")]
    #[error("fetch failed: {0}")]
    Fetch(#[from] gloo::net::Error),

    #[error("GET {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("no browser window or document")]
    NoWindow,
}

#[cfg(target_arch = "wasm32")]
impl From<WebError> for wasm_bindgen::JsValue {
    fn from(err: WebError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}
