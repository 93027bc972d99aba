mod app;
mod canvas;
mod dom;
mod events;
mod frame_loop;
mod platform;

fn main() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    if let Err(e) = app::start() {
        tracing::error!(?e, "failed to start the client");
    }
}
