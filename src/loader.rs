use instant::Instant;
use story_core::{should_show_loader, LoadingTimer, SessionFlag};
use wasm_bindgen::JsValue;
use web_sys as web;

use crate::constants::{LOADER_SEEN_KEY, LOADER_SEEN_VALUE};
use crate::frame::{start_loop, LoopHandle};
use crate::overlay;

/// Loader flag kept in `sessionStorage`, so it survives in-tab navigation but
/// not a new tab.
pub struct StorageFlag {
    storage: Option<web::Storage>,
}

impl StorageFlag {
    pub fn new(window: &web::Window) -> Self {
        let storage = window.session_storage().ok().flatten();
        if storage.is_none() {
            log::warn!("[loader] sessionStorage unavailable; loader will show every time");
        }
        Self { storage }
    }

    /// Hard reloads show the loader again.
    pub fn clear(&mut self) {
        if let Some(s) = &self.storage {
            _ = s.remove_item(LOADER_SEEN_KEY);
        }
    }
}

impl SessionFlag for StorageFlag {
    fn seen(&self) -> bool {
        self.storage
            .as_ref()
            .and_then(|s| s.get_item(LOADER_SEEN_KEY).ok().flatten())
            .is_some_and(|v| v == LOADER_SEEN_VALUE)
    }

    fn mark_seen(&mut self) {
        if let Some(s) = &self.storage {
            _ = s.set_item(LOADER_SEEN_KEY, LOADER_SEEN_VALUE);
        }
    }
}

/// Whether this page load came from a reload, per the navigation timing entry.
pub fn is_reload(window: &web::Window) -> bool {
    let Some(perf) = window.performance() else {
        return false;
    };
    let entries = perf.get_entries_by_type("navigation");
    let entry = entries.get(0);
    if entry.is_undefined() {
        return false;
    }
    js_sys::Reflect::get(&entry, &JsValue::from_str("type"))
        .ok()
        .and_then(|v| v.as_string())
        .is_some_and(|t| t == "reload")
}

/// Show the overlay and drive it from a fixed-schedule timer. Returns `None`
/// when the loader was already shown this session.
pub fn run(window: &web::Window, document: &web::Document) -> Option<LoopHandle> {
    let mut flag = StorageFlag::new(window);
    if is_reload(window) {
        flag.clear();
    }
    if !should_show_loader(&flag) {
        overlay::set_visible(document, false);
        return None;
    }

    overlay::set_visible(document, true);
    overlay::set_progress(document, 0);
    let mut timer = LoadingTimer::new();
    timer.start(Instant::now());
    let document = document.clone();
    let mut last_shown = None;
    Some(start_loop(move || {
        let Some(tick) = timer.tick(Instant::now()) else {
            return false;
        };
        if last_shown != Some(tick.percent) {
            overlay::set_progress(&document, tick.percent);
            last_shown = Some(tick.percent);
        }
        if tick.completed {
            flag.mark_seen();
            overlay::set_visible(&document, false);
            return false;
        }
        true
    }))
}
