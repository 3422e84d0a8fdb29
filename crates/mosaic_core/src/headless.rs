//! In-memory host for tests and native runs
//!
//! Elements record what the grid did to them; nothing is drawn. Loads never
//! complete on their own: callers collect pending tickets and feed them back
//! through `GridController::on_tile_loaded`, which makes load timing fully
//! deterministic.

use crate::asset::{AssetDescriptor, AssetKind};
use crate::host::{LoadTicket, TileElement, Viewport};
use glam::DVec2;

#[derive(Debug, Clone)]
pub struct HeadlessViewport {
    size: DVec2,
    created: u32,
}

impl HeadlessViewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: DVec2::new(width, height),
            created: 0,
        }
    }

    /// Change the reported size. Takes effect on the next `on_viewport_resize`.
    pub fn set_size(&mut self, width: f64, height: f64) {
        self.size = DVec2::new(width, height);
    }

    pub fn elements_created(&self) -> u32 {
        self.created
    }
}

impl Viewport for HeadlessViewport {
    type Element = HeadlessElement;

    fn size(&self) -> DVec2 {
        self.size
    }

    fn create_element(&mut self) -> HeadlessElement {
        let element = HeadlessElement::new(self.created);
        self.created += 1;
        element
    }
}

#[derive(Debug, Clone, Default)]
pub struct HeadlessElement {
    serial: u32,
    mounted: bool,
    kind: Option<AssetKind>,
    source: Option<String>,
    pending: Option<LoadTicket>,
    transform: DVec2,
    revealed: bool,
    link: Option<String>,
    loads_started: u32,
    mounts: u32,
    unmounts: u32,
}

impl HeadlessElement {
    pub fn new(serial: u32) -> Self {
        Self {
            serial,
            ..Self::default()
        }
    }

    /// Creation order within its viewport.
    pub fn serial(&self) -> u32 {
        self.serial
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn kind(&self) -> Option<AssetKind> {
        self.kind
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Ticket of the load still in flight, if any.
    pub fn pending_ticket(&self) -> Option<LoadTicket> {
        self.pending
    }

    pub fn transform(&self) -> DVec2 {
        self.transform
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    pub fn loads_started(&self) -> u32 {
        self.loads_started
    }

    pub fn mounts(&self) -> u32 {
        self.mounts
    }

    pub fn unmounts(&self) -> u32 {
        self.unmounts
    }
}

impl TileElement for HeadlessElement {
    fn mount(&mut self) {
        debug_assert!(!self.mounted, "element {} mounted twice", self.serial);
        self.mounted = true;
        self.mounts += 1;
    }

    fn unmount(&mut self) {
        debug_assert!(self.mounted, "element {} unmounted while detached", self.serial);
        self.mounted = false;
        self.unmounts += 1;
    }

    fn begin_load(&mut self, asset: &AssetDescriptor, ticket: LoadTicket) {
        self.kind = Some(asset.kind);
        self.source = Some(asset.source_url.clone());
        self.pending = Some(ticket);
        self.loads_started += 1;
    }

    fn clear_source(&mut self) {
        self.source = None;
        self.pending = None;
    }

    fn set_transform(&mut self, translate: DVec2) {
        self.transform = translate;
    }

    fn set_revealed(&mut self, revealed: bool) {
        self.revealed = revealed;
        if revealed {
            self.pending = None;
        }
    }

    fn set_link(&mut self, link: Option<&str>) {
        self.link = link.map(str::to_owned);
    }
}
