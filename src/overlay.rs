use web_sys as web;

use crate::constants::{LOADER_FILL_ID, LOADER_OVERLAY_ID, LOADER_TEXT_ID};

/// Toggle the loader overlay. The inline style covers pages that do not ship
/// the `hidden` class.
pub fn set_visible(document: &web::Document, visible: bool) {
    let Some(overlay) = document.get_element_by_id(LOADER_OVERLAY_ID) else {
        return;
    };
    let classes = overlay.class_list();
    let style = if visible {
        _ = classes.remove_1("hidden");
        ""
    } else {
        _ = classes.add_1("hidden");
        "display:none"
    };
    _ = overlay.set_attribute("style", style);
}

/// Reflect the loader percentage in the bar width and the label.
pub fn set_progress(document: &web::Document, percent: u8) {
    let p = percent.min(100);
    if let Some(el) = document.get_element_by_id(LOADER_FILL_ID) {
        _ = el.set_attribute("style", &format!("width: {p}%"));
    }
    if let Some(el) = document.get_element_by_id(LOADER_TEXT_ID) {
        el.set_text_content(Some(&format!("{p}%")));
    }
}
