//! Page bootstrap: find the fixed elements, build the controller, wire
//! events, start both animation loops and connect.

use std::cell::RefCell;
use std::rc::Rc;

use saboteur_client::ambient::AmbientField;
use saboteur_client::config::ClientConfig;
use saboteur_client::controller::ClientController;
use saboteur_core::geometry::CanvasSize;
use tracing::{info, warn};
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, Window};

use crate::canvas::{context_2d, paint};
use crate::dom::{HudWriter, element, trap_buttons};
use crate::events::{listen, wire_buttons, wire_canvas, wire_keyboard};
use crate::frame_loop::run_forever;
use crate::platform::{SharedController, WebPlatform};

/// Socket URL on the page's own origin, secure when the page is.
fn socket_url(window: &Window, config: &ClientConfig) -> Result<String, JsValue> {
    let location = window.location();
    let secure = location.protocol()? == "https:";
    Ok(config.socket_url(&location.host()?, secure))
}

fn viewport(window: &Window) -> CanvasSize {
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    CanvasSize::new(dim(window.inner_width()), dim(window.inner_height()))
}

fn now_seconds() -> f64 {
    js_sys::Date::now() / 1000.0
}

pub fn start() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let config = ClientConfig::default();
    let url = socket_url(&window, &config)?;

    let canvas: HtmlCanvasElement = element(&document, "gameCanvas")?;
    canvas.set_width(config.canvas.width as u32);
    canvas.set_height(config.canvas.height as u32);
    let ctx = context_2d(&canvas)?;

    let controller: SharedController = Rc::new_cyclic(|this| {
        RefCell::new(ClientController::new(
            WebPlatform::new(this.clone()),
            url.clone(),
            config.clone(),
        ))
    });

    let start: HtmlElement = element(&document, "startBtn")?;
    let next_level: HtmlElement = element(&document, "nextLevelBtn")?;
    wire_canvas(&canvas, &controller)?;
    wire_keyboard(&document, &controller)?;
    wire_buttons(&trap_buttons(&document)?, &start, &next_level, &controller)?;

    start_game_loop(ctx, HudWriter::find(&document)?, &controller)?;

    info!(%url, "connecting");
    controller.borrow_mut().connect();

    match element::<HtmlCanvasElement>(&document, "particles") {
        Ok(particles) => start_ambient_loop(&window, particles, &config)?,
        Err(e) => warn!(?e, "no particle canvas, ambient layer disabled"),
    }
    Ok(())
}

fn start_game_loop(
    ctx: CanvasRenderingContext2d,
    mut hud: HudWriter,
    controller: &SharedController,
) -> Result<(), JsValue> {
    let controller = Rc::clone(controller);
    run_forever(move || {
        let Ok(controller) = controller.try_borrow() else {
            return;
        };
        if let Err(e) = paint(&ctx, &controller.frame(now_seconds())) {
            warn!(?e, "game frame failed");
        }
        if let Err(e) = hud.write(controller.hud()) {
            warn!(?e, "hud update failed");
        }
    })
}

fn start_ambient_loop(
    window: &Window,
    canvas: HtmlCanvasElement,
    config: &ClientConfig,
) -> Result<(), JsValue> {
    let ctx = context_2d(&canvas)?;
    let size = viewport(window);
    canvas.set_width(size.width as u32);
    canvas.set_height(size.height as u32);

    let field = Rc::new(RefCell::new(AmbientField::new(
        &mut rand::rng(),
        config.particle_count,
        size,
        config.particle_link_distance,
    )));

    {
        let (field, canvas, win) = (Rc::clone(&field), canvas.clone(), window.clone());
        listen(window.as_ref(), "resize", move |_: web_sys::Event| {
            let size = viewport(&win);
            canvas.set_width(size.width as u32);
            canvas.set_height(size.height as u32);
            field.borrow_mut().resize(size);
        })?;
    }

    run_forever(move || {
        let cmds = field.borrow_mut().tick();
        if let Err(e) = paint(&ctx, &cmds) {
            warn!(?e, "ambient frame failed");
        }
    })
}
