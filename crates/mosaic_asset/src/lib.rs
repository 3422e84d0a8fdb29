//! Mosaic Asset Manifest
//!
//! Parsing and validation of the gallery manifest the grid tiles from.
//! Fetching it is the host's job; this crate only turns bytes into a
//! [`Manifest`] and rejects what the grid cannot use.

use mosaic_core::{AssetDescriptor, Manifest};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed manifest: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("manifest lists no assets")]
    Empty,

    #[error("asset {index} has invalid parallax speed {speed} (must be finite and non-negative)")]
    InvalidSpeed { index: usize, speed: f64 },
}

/// Parse gallery JSON (`{ "images": [...] }`).
///
/// Assets without a source URL are kept and only logged: the grid tolerates
/// them and the affected tiles never reveal.
pub fn parse_manifest(json: &str) -> Result<Manifest, ManifestError> {
    let manifest: Manifest = serde_json::from_str(json)?;
    validate(&manifest)?;
    tracing::debug!(assets = manifest.len(), "manifest parsed");
    Ok(manifest)
}

/// Read and parse a manifest file.
pub fn load_manifest(path: impl AsRef<Path>) -> Result<Manifest, ManifestError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let manifest = parse_manifest(&json)?;
    tracing::info!(path = %path.display(), assets = manifest.len(), "manifest loaded");
    Ok(manifest)
}

fn validate(manifest: &Manifest) -> Result<(), ManifestError> {
    if manifest.is_empty() {
        return Err(ManifestError::Empty);
    }
    for (index, asset) in manifest.iter().enumerate() {
        check_asset(index, asset)?;
    }
    Ok(())
}

fn check_asset(index: usize, asset: &AssetDescriptor) -> Result<(), ManifestError> {
    if !asset.parallax_speed.is_finite() || asset.parallax_speed < 0.0 {
        return Err(ManifestError::InvalidSpeed {
            index,
            speed: asset.parallax_speed,
        });
    }
    if asset.source_url.trim().is_empty() {
        tracing::warn!(index, "asset has no source url; its tiles will stay hidden");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mosaic_core::AssetKind;

    #[test]
    fn test_parse_gallery() {
        let manifest = parse_manifest(
            r#"{"images": [
                {"type": "image", "imageUrl": "https://images.unsplash.com/a.jpg", "speed": 1},
                {"type": "video", "imageUrl": "/static/b.mp4", "url": "/work/b", "speed": 0.9}
            ]}"#,
        )
        .unwrap();
        assert_eq!(manifest.len(), 2);
        let video = manifest.get(1).unwrap();
        assert_eq!(video.kind, AssetKind::Video);
        assert_eq!(video.link(), Some("/work/b"));
    }

    #[test]
    fn test_empty_manifest_rejected() {
        assert!(matches!(parse_manifest(r#"{"images": []}"#), Err(ManifestError::Empty)));
        assert!(matches!(parse_manifest("{}"), Err(ManifestError::Empty)));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(parse_manifest("{\"images\": ["), Err(ManifestError::Parse(_))));
        assert!(matches!(
            parse_manifest(r#"{"images": [{"type": "gif", "imageUrl": "a"}]}"#),
            Err(ManifestError::Parse(_))
        ));
    }

    #[test]
    fn test_negative_speed_rejected() {
        let err = parse_manifest(r#"{"images": [{"imageUrl": "a.jpg"}, {"imageUrl": "b.jpg", "speed": -2}]}"#)
            .unwrap_err();
        assert!(matches!(err, ManifestError::InvalidSpeed { index: 1, .. }));
    }

    #[test]
    fn test_missing_source_is_tolerated() {
        let manifest = parse_manifest(r#"{"images": [{"type": "image"}]}"#).unwrap();
        assert_eq!(manifest.get(0).unwrap().source_url, "");
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = load_manifest("/definitely/not/here/gallery.json").unwrap_err();
        match err {
            ManifestError::Io { path, .. } => assert!(path.ends_with("gallery.json")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_demo_gallery_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/gallery.json");
        let manifest = load_manifest(path).unwrap();
        assert!(manifest.len() >= 4);
        assert!(manifest.iter().any(|asset| asset.kind == AssetKind::Video));
    }
}
