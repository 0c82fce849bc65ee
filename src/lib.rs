#![cfg(target_arch = "wasm32")]
//! Browser front-end: loader overlay, scroll and resize wiring, and a
//! per-frame bridge that hands packed transforms to the JS renderer.

use wasm_bindgen::prelude::*;

mod bridge;
mod constants;
mod dom;
mod frame;
mod loader;
mod overlay;

pub use bridge::PondStory;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    _ = console_log::init_with_level(log::Level::Info);
    log::info!("[init] pond-story {}", env!("CARGO_PKG_VERSION"));
}
