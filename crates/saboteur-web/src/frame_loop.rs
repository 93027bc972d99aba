//! Perpetual `requestAnimationFrame` loops.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

fn request_frame(callback: &Closure<dyn FnMut()>) -> Result<i32, JsValue> {
    web_sys::window()
        .ok_or_else(|| JsValue::from_str("no window"))?
        .request_animation_frame(callback.as_ref().unchecked_ref())
}

/// Call `tick` once per animation frame for the lifetime of the page.
///
/// The callback re-arms itself through a reference cycle, which is never
/// broken: these loops have no cancellation.
pub fn run_forever(mut tick: impl FnMut() + 'static) -> Result<(), JsValue> {
    let slot: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let rearm = Rc::clone(&slot);

    *slot.borrow_mut() = Some(Closure::new(move || {
        tick();
        if let Some(callback) = rearm.borrow().as_ref()
            && let Err(e) = request_frame(callback)
        {
            tracing::error!(?e, "requestAnimationFrame failed, loop stopped");
        }
    }));

    let first = slot.borrow();
    match first.as_ref() {
        Some(callback) => request_frame(callback).map(|_| ()),
        None => Ok(()),
    }
}
