#![forbid(unsafe_code)]

//! `web-sys` implementation of [`AnchorScrollHost`].
//!
//! Optional capabilities are feature-detected before use and any thrown
//! `JsValue` becomes [`CapabilityError::Threw`]. Only compiled on `wasm32`.

use anchorscroll_core::{
    AnchorScrollHost, CapabilityError, HistoryUpdateMode, ScrollMotion, ScrollRequest,
};
use js_sys::Reflect;
use tracing::debug;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, Event, HtmlElement, Node, ScrollBehavior, ScrollToOptions, Window,
};

fn threw(err: JsValue) -> CapabilityError {
    CapabilityError::Threw(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

fn has_property(target: &JsValue, name: &str) -> bool {
    Reflect::has(target, &JsValue::from_str(name)).unwrap_or(false)
}

pub(crate) struct DomHost {
    window: Window,
    document: Document,
}

impl DomHost {
    pub(crate) fn new(window: Window, document: Document) -> Self {
        Self { window, document }
    }

    /// `'scrollBehavior' in document.documentElement.style`
    fn supports_scroll_behavior(&self) -> bool {
        self.document
            .document_element()
            .and_then(|root| root.dyn_into::<HtmlElement>().ok())
            .is_some_and(|root| has_property(root.style().as_ref(), "scrollBehavior"))
    }
}

impl AnchorScrollHost for DomHost {
    type Event = Event;
    type Element = Element;

    fn click_target(&self, event: &Event) -> Option<Element> {
        match event.target()?.dyn_into::<Element>() {
            Ok(element) => Some(element),
            // Text nodes dispatch through their parent element.
            Err(target) => target.dyn_into::<Node>().ok()?.parent_element(),
        }
    }

    fn closest_anchor(&self, element: &Element, selector: &str) -> Option<Element> {
        element.closest(selector).ok().flatten()
    }

    fn attribute(&self, element: &Element, name: &str) -> Option<String> {
        element.get_attribute(name)
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn prevent_default(&mut self, event: &Event) {
        event.prevent_default();
    }

    fn match_media(&self, query: &str) -> Result<bool, CapabilityError> {
        if !has_property(self.window.as_ref(), "matchMedia") {
            return Err(CapabilityError::Unsupported("matchMedia"));
        }
        match self.window.match_media(query) {
            Ok(Some(list)) => Ok(list.matches()),
            Ok(None) => Err(CapabilityError::Unsupported("matchMedia")),
            Err(err) => Err(threw(err)),
        }
    }

    fn bounding_client_top(&self, element: &Element) -> f64 {
        element.get_bounding_client_rect().top()
    }

    fn page_y_offset(&self) -> f64 {
        self.window.page_y_offset().unwrap_or(0.0)
    }

    fn scroll_to_with_options(&mut self, request: ScrollRequest) -> Result<(), CapabilityError> {
        if !self.supports_scroll_behavior() {
            return Err(CapabilityError::Unsupported("scroll-behavior"));
        }
        let options = ScrollToOptions::new();
        options.set_top(request.top);
        options.set_behavior(match request.motion {
            ScrollMotion::Smooth => ScrollBehavior::Smooth,
            ScrollMotion::Instant => ScrollBehavior::Instant,
        });
        self.window.scroll_to_with_scroll_to_options(&options);
        Ok(())
    }

    fn scroll_to(&mut self, x: f64, y: f64) {
        self.window.scroll_to_with_x_and_y(x, y);
    }

    fn write_history_fragment(
        &mut self,
        fragment: &str,
        mode: HistoryUpdateMode,
    ) -> Result<(), CapabilityError> {
        let history = self.window.history().map_err(threw)?;
        let url = format!("#{fragment}");
        let url = Some(url.as_str());
        match mode {
            HistoryUpdateMode::Replace => history.replace_state_with_url(&JsValue::NULL, "", url),
            HistoryUpdateMode::Push => history.push_state_with_url(&JsValue::NULL, "", url),
        }
        .map_err(threw)
    }

    fn assign_location_fragment(&mut self, fragment: &str) {
        if let Err(err) = self.window.location().set_hash(fragment) {
            debug!(
                target: "anchorscroll::capability",
                error = ?err,
                "location.hash assignment failed"
            );
        }
    }
}
