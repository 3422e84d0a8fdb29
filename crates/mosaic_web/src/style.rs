//! CSS vocabulary shared by the DOM host.

use mosaic_core::glam::DVec2;

pub const CARD_CLASS: &str = "card";
/// Present until the tile's asset has loaded.
pub const HIDDEN_CLASS: &str = "hidden";
/// Present while the tile has a click target.
pub const LINKED_CLASS: &str = "linked";

pub fn translate3d(translate: DVec2) -> String {
    format!("translate3d({}px, {}px, 0)", translate.x, translate.y)
}
