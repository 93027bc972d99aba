pub mod ambient;
pub mod config;
pub mod connection;
pub mod controller;
pub mod dispatcher;
pub mod error;
pub mod hud;
pub mod input;
pub mod platform;
pub mod render;
pub mod state_store;
pub mod timer;
pub mod transport;

#[cfg(feature = "native")]
pub mod native;
#[cfg(feature = "native")]
pub mod ws_transport;

#[cfg(test)]
mod testing;
