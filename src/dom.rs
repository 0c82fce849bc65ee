use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::constants::SCROLL_CONTAINER_ID;

/// Event listener that unregisters itself when dropped.
pub struct Listener {
    target: web::EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut()>,
}

impl Listener {
    pub fn new(
        target: &web::EventTarget,
        event: &'static str,
        handler: impl FnMut() + 'static,
    ) -> anyhow::Result<Self> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut()>);
        target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(|e| anyhow::anyhow!("add {event} listener: {e:?}"))?;
        Ok(Self {
            target: target.clone(),
            event,
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

/// Element whose scroll drives the story, or `None` to use the window.
pub fn scroll_container(document: &web::Document) -> Option<web::Element> {
    document.get_element_by_id(SCROLL_CONTAINER_ID)
}

/// Scroll position of the story host in CSS pixels.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScrollMetrics {
    pub top: f32,
    /// Scrollable distance, `scrollHeight - clientHeight`.
    pub range: f32,
    pub viewport_height: f32,
}

pub fn scroll_metrics(window: &web::Window, container: Option<&web::Element>) -> ScrollMetrics {
    let measured = |el: &web::Element, top: f32| ScrollMetrics {
        top,
        range: (el.scroll_height() - el.client_height()).max(0) as f32,
        viewport_height: el.client_height() as f32,
    };
    match container {
        Some(el) => measured(el, el.scroll_top() as f32),
        None => {
            let top = window.scroll_y().unwrap_or(0.0) as f32;
            match window.document().and_then(|d| d.document_element()) {
                Some(root) => measured(&root, top),
                None => ScrollMetrics {
                    top,
                    ..Default::default()
                },
            }
        }
    }
}

pub fn viewport_aspect(window: &web::Window) -> f32 {
    let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(1.0);
    let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(1.0);
    (w / h.max(1.0)) as f32
}
