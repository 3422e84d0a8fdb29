//! Asset descriptors and the manifest they arrive in
//!
//! The wire format is the gallery JSON consumed by the web host:
//! `{ "images": [ { "type": "video", "imageUrl": "...", "url": "...", "speed": 1.0 } ] }`

use serde::{Deserialize, Serialize};

/// Media kind of an asset.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    #[default]
    Image,
    Video,
}

/// Immutable description of one source asset.
///
/// A missing source URL deserializes to an empty string; the grid does not
/// validate it and the tile simply never reveals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetDescriptor {
    #[serde(rename = "type", default)]
    pub kind: AssetKind,
    #[serde(rename = "imageUrl", default)]
    pub source_url: String,
    #[serde(rename = "url", default, skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
    #[serde(rename = "speed", default = "default_parallax_speed")]
    pub parallax_speed: f64,
}

fn default_parallax_speed() -> f64 {
    1.0
}

impl AssetDescriptor {
    pub fn image(source_url: impl Into<String>) -> Self {
        Self {
            kind: AssetKind::Image,
            source_url: source_url.into(),
            link_url: None,
            parallax_speed: 1.0,
        }
    }

    pub fn video(source_url: impl Into<String>) -> Self {
        Self {
            kind: AssetKind::Video,
            ..Self::image(source_url)
        }
    }

    pub fn with_link(mut self, link_url: impl Into<String>) -> Self {
        self.link_url = Some(link_url.into());
        self
    }

    pub fn with_parallax_speed(mut self, speed: f64) -> Self {
        self.parallax_speed = speed;
        self
    }

    /// Navigation target, if any. Empty strings count as no link.
    pub fn link(&self) -> Option<&str> {
        self.link_url.as_deref().filter(|url| !url.is_empty())
    }

    /// True when switching from `self` to `other` requires a new fetch.
    pub fn source_differs(&self, other: &AssetDescriptor) -> bool {
        self.kind != other.kind || self.source_url != other.source_url
    }
}

/// Ordered list of assets the grid tiles from.
///
/// Emptiness is rejected by `GridController::new`, not here, so loaders can
/// hand over whatever they parsed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(rename = "images", default)]
    assets: Vec<AssetDescriptor>,
}

impl Manifest {
    pub fn new(assets: Vec<AssetDescriptor>) -> Self {
        Self { assets }
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&AssetDescriptor> {
        self.assets.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetDescriptor> {
        self.assets.iter()
    }

    pub fn into_assets(self) -> Vec<AssetDescriptor> {
        self.assets
    }
}

impl FromIterator<AssetDescriptor> for Manifest {
    fn from_iter<I: IntoIterator<Item = AssetDescriptor>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gallery_json_shape() {
        let json = r#"{
            "images": [
                { "type": "video", "imageUrl": "a.mp4", "url": "https://example.com", "speed": 0.8 },
                { "type": "image", "imageUrl": "b.jpg" }
            ]
        }"#;
        let manifest: Manifest = serde_json::from_str(json).unwrap();
        assert_eq!(manifest.len(), 2);

        let first = manifest.get(0).unwrap();
        assert_eq!(first.kind, AssetKind::Video);
        assert_eq!(first.link(), Some("https://example.com"));
        assert_eq!(first.parallax_speed, 0.8);

        let second = manifest.get(1).unwrap();
        assert_eq!(second.kind, AssetKind::Image);
        assert_eq!(second.link(), None);
        assert_eq!(second.parallax_speed, 1.0);
    }

    #[test]
    fn test_empty_link_is_inert() {
        let asset = AssetDescriptor::image("a.jpg").with_link("");
        assert_eq!(asset.link(), None);
    }

    #[test]
    fn test_source_differs_ignores_link_and_speed() {
        let a = AssetDescriptor::image("a.jpg");
        let b = a.clone().with_link("/x").with_parallax_speed(0.5);
        assert!(!a.source_differs(&b));
        assert!(a.source_differs(&AssetDescriptor::video("a.jpg")));
        assert!(a.source_differs(&AssetDescriptor::image("b.jpg")));
    }
}
