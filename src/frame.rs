use std::cell::{Cell, RefCell};
use std::rc::Rc;

use instant::Instant;
use story_core::{FrameOutput, StoryScene, TransformRaw};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

use crate::constants::FRAME_HEADER_FLOATS;
use crate::dom;

pub struct FrameContext {
    pub scene: StoryScene,
    pub window: web::Window,
    pub scroll_container: Option<web::Element>,
    pub on_frame: js_sys::Function,
    pub packed: Vec<f32>,
}

impl FrameContext {
    pub fn frame(&mut self) {
        let m = dom::scroll_metrics(&self.window, self.scroll_container.as_ref());
        self.scene
            .progress_mut()
            .set_scroll_measured(m.top, m.range, m.viewport_height);
        let out = self.scene.frame(Instant::now());
        pack_frame(&out, &mut self.packed);
        let array = js_sys::Float32Array::from(self.packed.as_slice());
        if let Err(e) = self.on_frame.call1(&JsValue::NULL, &array) {
            log::error!("[frame] on_frame callback failed: {:?}", e);
        }
    }
}

/// Flatten a frame for the JS renderer.
///
/// Header: progress, ambient, directional, eye xyz, look-at xyz, surface y
/// (NaN while unset), boat present flag, flock count, school part count.
/// Then one [`TransformRaw`] block each for pond, boat hull (world), school,
/// and every flock member, followed by one [`story_core::PlaceholderRaw`] per generated
/// school part. Missing objects are written as hidden identity blocks.
pub fn pack_frame(out: &FrameOutput, packed: &mut Vec<f32>) {
    packed.clear();
    packed.extend_from_slice(&[
        out.progress,
        out.lights.ambient,
        out.lights.directional,
        out.camera.eye.x,
        out.camera.eye.y,
        out.camera.eye.z,
        out.camera.target.x,
        out.camera.target.y,
        out.camera.target.z,
        out.calibration.value().unwrap_or(f32::NAN),
        if out.boat.is_some() { 1.0 } else { 0.0 },
        out.flock.len() as f32,
        out.school_parts.len() as f32,
    ]);
    debug_assert_eq!(packed.len(), FRAME_HEADER_FLOATS);

    let hidden = TransformRaw::new(glam::Mat4::IDENTITY, false);
    let pond = out.pond.map_or(hidden, |p| p.to_raw());
    let boat = out
        .boat
        .map_or(hidden, |b| TransformRaw::new(b.hull_world_matrix(), b.follower.visible));
    let mut blocks = vec![pond, boat, out.school.to_raw()];
    blocks.extend(out.flock.iter().map(|f| f.to_raw()));
    packed.extend_from_slice(bytemuck::cast_slice(blocks.as_slice()));
    packed.extend_from_slice(bytemuck::cast_slice(out.school_parts.as_slice()));
}

/// Handle to a running requestAnimationFrame loop; cancels it on drop.
pub struct LoopHandle {
    raf_id: Rc<Cell<Option<i32>>>,
    slot: FrameSlot,
}

impl LoopHandle {
    pub fn cancel(&self) {
        if let Some(id) = self.raf_id.take() {
            if let Some(w) = web::window() {
                _ = w.cancel_animation_frame(id);
            }
        }
        // Breaks the closure <-> slot cycle.
        self.slot.borrow_mut().take();
    }
}

impl Drop for LoopHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Call `tick` every animation frame until it returns `false` or the handle
/// is cancelled.
pub fn start_loop(mut tick: impl FnMut() -> bool + 'static) -> LoopHandle {
    let slot: FrameSlot = Rc::new(RefCell::new(None));
    let raf_id = Rc::new(Cell::new(None));
    let slot_tick = slot.clone();
    let raf_tick = raf_id.clone();
    *slot.borrow_mut() = Some(Closure::wrap(Box::new(move |_ts: f64| {
        raf_tick.set(None);
        if !tick() {
            return;
        }
        request_frame(&slot_tick, &raf_tick);
    }) as Box<dyn FnMut(f64)>));
    request_frame(&slot, &raf_id);
    LoopHandle { raf_id, slot }
}

type FrameSlot = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn request_frame(slot: &FrameSlot, raf_id: &Rc<Cell<Option<i32>>>) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(cb) = slot.borrow().as_ref() {
        match w.request_animation_frame(cb.as_ref().unchecked_ref()) {
            Ok(id) => raf_id.set(Some(id)),
            Err(e) => log::error!("[frame] requestAnimationFrame failed: {:?}", e),
        }
    }
}
