//! Container element the grid pans over.

use crate::dom_tile::DomTileElement;
use mosaic_core::glam::DVec2;
use mosaic_core::{GridError, LoadTicket, Viewport};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

/// Outcome reported by a tile's media element.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoadEvent {
    Loaded,
    Failed,
}

pub type LoadHandler = Rc<dyn Fn(LoadTicket, LoadEvent)>;

/// Slot every tile reads when its media fires. Filled by the app once the
/// controller exists, emptied on teardown.
pub(crate) type HandlerSlot = Rc<RefCell<Option<LoadHandler>>>;

pub struct DomViewport {
    document: Document,
    container: HtmlElement,
    handler: HandlerSlot,
    suppress_click: Rc<Cell<bool>>,
}

impl DomViewport {
    pub fn from_id(document: Document, id: &str) -> Result<Self, GridError> {
        let container = document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            .ok_or_else(|| GridError::MissingViewport(id.to_owned()))?;
        Ok(Self {
            document,
            container,
            handler: Rc::new(RefCell::new(None)),
            suppress_click: Rc::new(Cell::new(false)),
        })
    }

    pub fn container(&self) -> &HtmlElement {
        &self.container
    }

    pub fn set_load_handler(&self, handler: LoadHandler) {
        *self.handler.borrow_mut() = Some(handler);
    }

    pub fn clear_load_handler(&self) {
        self.handler.borrow_mut().take();
    }

    /// Set while a drag is in progress so the click that ends it does not
    /// follow a tile's link.
    pub fn suppress_click(&self) -> &Rc<Cell<bool>> {
        &self.suppress_click
    }
}

impl Viewport for DomViewport {
    type Element = DomTileElement;

    fn size(&self) -> DVec2 {
        DVec2::new(
            self.container.offset_width() as f64,
            self.container.offset_height() as f64,
        )
    }

    fn create_element(&mut self) -> DomTileElement {
        DomTileElement::new(
            self.document.clone(),
            self.container.clone(),
            Rc::clone(&self.handler),
            Rc::clone(&self.suppress_click),
        )
    }
}
