use crate::error::WebError;
use gloo::net::http::Request;
use mosaic_core::Manifest;

/// GET `url` and parse the body as a gallery manifest.
pub async fn fetch_manifest(url: &str) -> Result<Manifest, WebError> {
    let response = Request::get(url).send().await?;
    if !response.ok() {
        return Err(WebError::Status {
            url: url.to_owned(),
            status: response.status(),
        });
    }
    let body = response.text().await?;
    let manifest = mosaic_asset::parse_manifest(&body)?;
    tracing::debug!(url, assets = manifest.len(), "manifest fetched");
    Ok(manifest)
}
