//! Mosaic Web
//!
//! Browser host for the infinite grid. Tiles are absolutely positioned
//! `div.card` elements inside a container; wheel and pointer-drag input pan
//! the grid, with momentum driven from `requestAnimationFrame`.
//!
//! ```js
//! import init, { start } from "./mosaic_web.js";
//! await init();
//! const grid = await start("grid", "gallery.json");
//! // later
//! grid.teardown();
//! ```

pub mod error;
pub mod style;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod dom_tile;
#[cfg(target_arch = "wasm32")]
mod dom_viewport;
#[cfg(target_arch = "wasm32")]
mod loader;

pub use error::WebError;

#[cfg(target_arch = "wasm32")]
pub use app::MosaicApp;
#[cfg(target_arch = "wasm32")]
pub use dom_viewport::{DomViewport, LoadEvent, LoadHandler};
#[cfg(target_arch = "wasm32")]
pub use loader::fetch_manifest;

#[cfg(target_arch = "wasm32")]
mod bindings {
    use crate::{fetch_manifest, MosaicApp, WebError};
    use mosaic_services::Settings;
    use wasm_bindgen::prelude::*;

    /// Handle returned to JavaScript. The grid keeps running until
    /// `teardown` is called or the handle is freed.
    #[wasm_bindgen]
    pub struct MosaicHandle {
        app: Option<MosaicApp>,
    }

    #[wasm_bindgen]
    impl MosaicHandle {
        pub fn teardown(&mut self) {
            if let Some(mut app) = self.app.take() {
                app.teardown();
            }
        }

        #[wasm_bindgen(js_name = visibleCount)]
        pub fn visible_count(&self) -> usize {
            self.app.as_ref().map_or(0, MosaicApp::visible_len)
        }

        #[wasm_bindgen(js_name = pooledCount)]
        pub fn pooled_count(&self) -> usize {
            self.app.as_ref().map_or(0, MosaicApp::pooled_len)
        }

        /// Tiles built since start. Stays flat once the pool is warm.
        #[wasm_bindgen(js_name = constructedCount)]
        pub fn constructed_count(&self) -> u64 {
            self.app.as_ref().map_or(0, |app| app.stats().constructed)
        }
    }

    /// Fetch the manifest at `manifest_url` and start the grid inside the
    /// element with id `container_id`. `settings_json` overrides defaults.
    #[wasm_bindgen]
    pub async fn start(
        container_id: String,
        manifest_url: String,
        settings_json: Option<String>,
    ) -> Result<MosaicHandle, JsValue> {
        console_error_panic_hook::set_once();

        let result = async {
            let settings = match settings_json.as_deref() {
                Some(json) => Settings::from_json_str(json)?,
                None => Settings::default(),
            };
            let manifest = fetch_manifest(&manifest_url).await?;
            let count = manifest.len();
            let app = MosaicApp::new(&container_id, manifest, &settings)?;
            gloo::console::log!(format!("mosaic: {count} assets in #{container_id}"));
            Ok::<_, WebError>(app)
        }
        .await;

        match result {
            Ok(app) => Ok(MosaicHandle { app: Some(app) }),
            Err(err) => {
                gloo::console::error!(format!("mosaic: {err}"));
                Err(err.into())
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use bindings::{start, MosaicHandle};
