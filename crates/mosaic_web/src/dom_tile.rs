//! DOM rendition of one tile: a `div.card` wrapping an `<img>` or a muted,
//! looping `<video>`.

use crate::dom_viewport::{HandlerSlot, LoadEvent};
use crate::style::{translate3d, CARD_CLASS, HIDDEN_CLASS, LINKED_CLASS};
use gloo::events::EventListener;
use mosaic_core::glam::DVec2;
use mosaic_core::{AssetDescriptor, AssetKind, LoadTicket, TileElement};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, HtmlImageElement, HtmlVideoElement};

/// The `div.card` root and its click subscription.
struct Card {
    root: HtmlElement,
    _click: EventListener,
}

impl Card {
    fn new(
        document: &Document,
        link: &Rc<RefCell<Option<String>>>,
        suppress_click: Rc<Cell<bool>>,
    ) -> Result<Self, JsValue> {
        let root: HtmlElement = document.create_element("div")?.dyn_into()?;
        root.set_class_name(&format!("{CARD_CLASS} {HIDDEN_CLASS}"));

        let link = Rc::clone(link);
        let click = EventListener::new(&root, "click", move |_event| {
            if suppress_click.get() {
                return;
            }
            let Some(href) = link.borrow().clone() else {
                return;
            };
            if let Some(window) = web_sys::window() {
                if let Err(err) = window.location().set_href(&href) {
                    tracing::warn!(?err, href, "navigation failed");
                }
            }
        });

        Ok(Self {
            root,
            _click: click,
        })
    }
}

struct Media {
    kind: AssetKind,
    element: Element,
    _listeners: [EventListener; 2],
}

/// A tile whose card could not be created stays inert: it never mounts and
/// never reports a load, so it is simply never revealed.
pub struct DomTileElement {
    document: Document,
    container: HtmlElement,
    card: Option<Card>,
    media: Option<Media>,
    ticket: Rc<Cell<Option<LoadTicket>>>,
    link: Rc<RefCell<Option<String>>>,
    handler: HandlerSlot,
}

impl DomTileElement {
    pub(crate) fn new(
        document: Document,
        container: HtmlElement,
        handler: HandlerSlot,
        suppress_click: Rc<Cell<bool>>,
    ) -> Self {
        let link = Rc::new(RefCell::new(None));
        let card = match Card::new(&document, &link, suppress_click) {
            Ok(card) => Some(card),
            Err(err) => {
                tracing::error!(?err, "failed to create tile element");
                None
            }
        };

        Self {
            document,
            container,
            card,
            media: None,
            ticket: Rc::new(Cell::new(None)),
            link,
            handler,
        }
    }

    fn root(&self) -> Option<&HtmlElement> {
        self.card.as_ref().map(|card| &card.root)
    }

    /// Media child for `kind`, replacing one of the other kind.
    fn media_for(&mut self, kind: AssetKind) -> Option<&Element> {
        if self.media.as_ref().map(|m| m.kind) != Some(kind) {
            if let Some(old) = self.media.take() {
                old.element.remove();
            }
            self.media = self.create_media(kind);
        }
        self.media.as_ref().map(|m| &m.element)
    }

    fn create_media(&self, kind: AssetKind) -> Option<Media> {
        let root = self.root()?;
        let (tag, ready_event) = match kind {
            AssetKind::Image => ("img", "load"),
            AssetKind::Video => ("video", "loadeddata"),
        };
        let element = match self.document.create_element(tag) {
            Ok(element) => element,
            Err(err) => {
                tracing::error!(?err, tag, "failed to create media element");
                return None;
            }
        };
        if let Some(video) = element.dyn_ref::<HtmlVideoElement>() {
            video.set_autoplay(true);
            video.set_loop(true);
            video.set_muted(true);
            if let Err(err) = video.set_attribute("playsinline", "") {
                tracing::debug!(?err, "playsinline not applied");
            }
        }
        if let Some(img) = element.dyn_ref::<HtmlImageElement>() {
            img.set_draggable(false);
        }
        if let Err(err) = root.append_child(&element) {
            tracing::error!(?err, "failed to attach media element");
            return None;
        }

        let listeners = [
            self.report_on(&element, ready_event, LoadEvent::Loaded),
            self.report_on(&element, "error", LoadEvent::Failed),
        ];
        Some(Media {
            kind,
            element,
            _listeners: listeners,
        })
    }

    fn report_on(
        &self,
        element: &Element,
        event: &'static str,
        outcome: LoadEvent,
    ) -> EventListener {
        let ticket = Rc::clone(&self.ticket);
        let handler = Rc::clone(&self.handler);
        EventListener::new(element, event, move |_event| {
            // Media can fire again for the same source; report once per ticket.
            let Some(current) = ticket.take() else {
                return;
            };
            let handler = handler.borrow().clone();
            if let Some(handler) = handler {
                handler(current, outcome);
            }
        })
    }

    fn toggle_class(&self, class: &str, on: bool) {
        let Some(root) = self.root() else {
            return;
        };
        if let Err(err) = root.class_list().toggle_with_force(class, on) {
            tracing::warn!(?err, class, "failed to toggle tile class");
        }
    }
}

impl TileElement for DomTileElement {
    fn mount(&mut self) {
        let Some(root) = self.root() else {
            return;
        };
        if let Err(err) = self.container.append_child(root) {
            tracing::error!(?err, "failed to mount tile");
        }
    }

    fn unmount(&mut self) {
        if let Some(root) = self.root() {
            root.remove();
        }
    }

    fn begin_load(&mut self, asset: &AssetDescriptor, ticket: LoadTicket) {
        let pending = Rc::clone(&self.ticket);
        let Some(element) = self.media_for(asset.kind) else {
            return;
        };
        pending.set(Some(ticket));
        if let Err(err) = element.set_attribute("src", &asset.source_url) {
            tracing::warn!(?err, src = %asset.source_url, "failed to set media source");
        }
    }

    fn clear_source(&mut self) {
        self.ticket.set(None);
        let Some(media) = &self.media else {
            return;
        };
        if let Some(video) = media.element.dyn_ref::<HtmlVideoElement>() {
            if let Err(err) = video.pause() {
                tracing::debug!(?err, "video pause failed");
            }
        }
        if let Err(err) = media.element.remove_attribute("src") {
            tracing::warn!(?err, "failed to clear media source");
        }
    }

    fn set_transform(&mut self, translate: DVec2) {
        let Some(root) = self.root() else {
            return;
        };
        if let Err(err) = root.style().set_property("transform", &translate3d(translate)) {
            tracing::warn!(?err, "failed to set tile transform");
        }
    }

    fn set_revealed(&mut self, revealed: bool) {
        self.toggle_class(HIDDEN_CLASS, !revealed);
    }

    fn set_link(&mut self, link: Option<&str>) {
        *self.link.borrow_mut() = link.map(str::to_owned);
        self.toggle_class(LINKED_CLASS, link.is_some());
    }
}
