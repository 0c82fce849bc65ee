use std::cell::{RefCell, RefMut};
use std::rc::Rc;

use glam::Vec3;
use instant::Instant;
use story_core::{Aabb, AssetPart, SceneAsset, SceneConfig, StoryScene, POND_POSITION};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::dom::{self, Listener};
use crate::frame::{start_loop, FrameContext, LoopHandle};
use crate::loader;

/// JS-facing handle to a running scroll story.
///
/// The renderer passes a callback that receives one packed `Float32Array`
/// per animation frame (layout in [`crate::frame::pack_frame`]) and feeds the
/// pond's parts in once its model has decoded.
#[wasm_bindgen]
pub struct PondStory {
    ctx: Rc<RefCell<FrameContext>>,
    pending_parts: Vec<AssetPart>,
    pending_school: Vec<AssetPart>,
    frame_loop: Option<LoopHandle>,
    loader_loop: Option<LoopHandle>,
    listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl PondStory {
    #[wasm_bindgen(constructor)]
    pub fn new(on_frame: js_sys::Function) -> Result<PondStory, JsValue> {
        let window = web::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let loader_loop = loader::run(&window, &document);

        let aspect = dom::viewport_aspect(&window);
        let scene = StoryScene::new(SceneConfig::default(), aspect, Instant::now())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let ctx = Rc::new(RefCell::new(FrameContext {
            scene,
            scroll_container: dom::scroll_container(&document),
            window: window.clone(),
            on_frame,
            packed: Vec::new(),
        }));

        let resize_ctx = ctx.clone();
        let resize_window = window.clone();
        let on_resize = Listener::new(window.unchecked_ref(), "resize", move || {
            let aspect = dom::viewport_aspect(&resize_window);
            match resize_ctx.try_borrow_mut() {
                Ok(mut c) => c.scene.resize(aspect),
                Err(_) => log::warn!("[bridge] resize during frame; skipped"),
            }
        })
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let frame_ctx = ctx.clone();
        let frame_loop = start_loop(move || {
            if let Ok(mut c) = frame_ctx.try_borrow_mut() {
                c.frame();
            }
            true
        });

        log::info!("[bridge] story started (aspect {aspect:.3})");
        Ok(PondStory {
            ctx,
            pending_parts: Vec::new(),
            pending_school: Vec::new(),
            frame_loop: Some(frame_loop),
            loader_loop,
            listeners: vec![on_resize],
        })
    }

    /// Register one decoded part of the pond model. `min`/`max` are the
    /// part's bounds in model space; pass empty arrays for grouping nodes
    /// without geometry.
    pub fn add_pond_part(
        &mut self,
        name: &str,
        material: Option<String>,
        min: Vec<f32>,
        max: Vec<f32>,
    ) -> Result<(), JsValue> {
        self.pending_parts.push(part_from_js(name, material, &min, &max)?);
        Ok(())
    }

    /// All pond parts are registered; fit and calibrate. Returns the fitted
    /// scale, or NaN if the story was already disposed.
    pub fn pond_ready(&mut self) -> Result<f32, JsValue> {
        let mut asset = SceneAsset::new(POND_POSITION);
        for part in self.pending_parts.drain(..) {
            asset.push_part(part);
        }
        let mut ctx = self.frame_ctx("pond_ready")?;
        let report = ctx.scene.attach_pond(asset, Instant::now());
        Ok(report.map_or(f32::NAN, |r| {
            log::info!(
                "[bridge] pond fitted scale={:.4} surface_y={:.4} ({:?})",
                r.scale,
                r.surface_y,
                r.source
            );
            r.scale
        }))
    }

    /// Register one part of an optional external school model, same layout
    /// as [`PondStory::add_pond_part`].
    pub fn add_school_part(
        &mut self,
        name: &str,
        material: Option<String>,
        min: Vec<f32>,
        max: Vec<f32>,
    ) -> Result<(), JsValue> {
        self.pending_school.push(part_from_js(name, material, &min, &max)?);
        Ok(())
    }

    /// The external school model loaded; frames stop carrying generated
    /// school parts from now on.
    pub fn school_ready(&mut self) -> Result<(), JsValue> {
        let mut asset = SceneAsset::new(Vec3::ZERO);
        for part in self.pending_school.drain(..) {
            asset.push_part(part);
        }
        self.frame_ctx("school_ready")?.scene.attach_school(asset);
        Ok(())
    }

    /// Surface y the boat and school ride on, or NaN before calibration.
    pub fn surface_y(&self) -> f32 {
        self.ctx
            .try_borrow()
            .ok()
            .and_then(|c| c.scene.calibration().value())
            .unwrap_or(f32::NAN)
    }

    /// Stop the loops, drop listeners and cancel pending calibration passes.
    pub fn dispose(&mut self) {
        self.frame_loop.take();
        self.loader_loop.take();
        self.listeners.clear();
        if let Ok(mut c) = self.ctx.try_borrow_mut() {
            c.scene.teardown();
        }
    }
}

impl PondStory {
    fn frame_ctx(&self, call: &str) -> Result<RefMut<'_, FrameContext>, JsValue> {
        self.ctx
            .try_borrow_mut()
            .map_err(|_| JsValue::from_str(&format!("{call} called from inside a frame")))
    }
}

fn part_from_js(
    name: &str,
    material: Option<String>,
    min: &[f32],
    max: &[f32],
) -> Result<AssetPart, JsValue> {
    let bounds = match (min, max) {
        ([], []) => None,
        ([x0, y0, z0], [x1, y1, z1]) => {
            Some(Aabb::new(Vec3::new(*x0, *y0, *z0), Vec3::new(*x1, *y1, *z1)))
        }
        _ => return Err(JsValue::from_str("bounds must be 3 floats or empty")),
    };
    let part = AssetPart::new(name, bounds);
    Ok(match material {
        Some(m) => part.with_material(m),
        None => part,
    })
}

impl Drop for PondStory {
    fn drop(&mut self) {
        self.dispose();
    }
}
