//! DOM event wiring.
//!
//! One small table of listeners per event source. Each listener translates
//! the DOM event into an [`InputEvent`] and hands it to the controller.
//! Listeners live for the page's lifetime and are leaked on purpose.

use saboteur_client::input::InputEvent;
use saboteur_core::geometry::{Point, Rect};
use saboteur_core::protocol::TrapType;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, EventTarget, HtmlCanvasElement, HtmlElement, KeyboardEvent, MouseEvent};

use crate::platform::SharedController;

/// Attach `handler` for `kind` events on `target`, typed as `E`.
pub fn listen<E>(target: &EventTarget, kind: &str, mut handler: impl FnMut(E) + 'static) -> Result<(), JsValue>
where
    E: JsCast + 'static,
{
    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        if let Ok(event) = event.dyn_into::<E>() {
            handler(event);
        }
    });
    target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Feed one input to the controller. Returns whether it asked for the
/// default action to be suppressed.
fn dispatch(controller: &SharedController, input: InputEvent) -> bool {
    match controller.try_borrow_mut() {
        Ok(mut controller) => controller.handle_input(input),
        Err(_) => {
            tracing::warn!(?input, "controller busy, input dropped");
            false
        }
    }
}

fn pointer(canvas: &HtmlCanvasElement, event: &MouseEvent) -> (Point, Rect) {
    let r = canvas.get_bounding_client_rect();
    (
        Point::new(f64::from(event.client_x()), f64::from(event.client_y())),
        Rect::new(r.left(), r.top(), r.width(), r.height()),
    )
}

fn in_text_field(event: &KeyboardEvent) -> bool {
    event
        .target()
        .and_then(|t| t.dyn_into::<Element>().ok())
        .is_some_and(|el| matches!(el.tag_name().as_str(), "INPUT" | "TEXTAREA"))
}

/// Pointer events on the game canvas.
pub fn wire_canvas(canvas: &HtmlCanvasElement, controller: &SharedController) -> Result<(), JsValue> {
    let target: &EventTarget = canvas.as_ref();

    let (c, ctl) = (canvas.clone(), controller.clone());
    listen(target, "mousemove", move |e: MouseEvent| {
        let (client, bounds) = pointer(&c, &e);
        dispatch(&ctl, InputEvent::PointerMoved { client, bounds });
    })?;

    let ctl = controller.clone();
    listen(target, "mouseenter", move |_: MouseEvent| {
        dispatch(&ctl, InputEvent::PointerEntered);
    })?;

    let ctl = controller.clone();
    listen(target, "mouseleave", move |_: MouseEvent| {
        dispatch(&ctl, InputEvent::PointerLeft);
    })?;

    let (c, ctl) = (canvas.clone(), controller.clone());
    listen(target, "click", move |e: MouseEvent| {
        let (client, bounds) = pointer(&c, &e);
        dispatch(&ctl, InputEvent::Click { client, bounds });
    })
}

/// Keyboard shortcuts, document-wide.
pub fn wire_keyboard(document: &Document, controller: &SharedController) -> Result<(), JsValue> {
    let ctl = controller.clone();
    listen(document.as_ref(), "keydown", move |e: KeyboardEvent| {
        let input = InputEvent::Key {
            key: e.key(),
            in_text_field: in_text_field(&e),
        };
        if dispatch(&ctl, input) {
            e.prevent_default();
        }
    })
}

/// Trap options and the start / next-level buttons.
pub fn wire_buttons(
    traps: &[(TrapType, HtmlElement)],
    start: &HtmlElement,
    next_level: &HtmlElement,
    controller: &SharedController,
) -> Result<(), JsValue> {
    for (trap, button) in traps {
        let (trap, ctl) = (*trap, controller.clone());
        listen(button.as_ref(), "click", move |_: MouseEvent| {
            dispatch(&ctl, InputEvent::SelectTrap(trap));
        })?;
    }

    let ctl = controller.clone();
    listen(start.as_ref(), "click", move |_: MouseEvent| {
        dispatch(&ctl, InputEvent::Start);
    })?;

    let ctl = controller.clone();
    listen(next_level.as_ref(), "click", move |_: MouseEvent| {
        dispatch(&ctl, InputEvent::NextLevel);
    })
}
