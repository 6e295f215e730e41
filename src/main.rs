// Behaviors are only wired to the DOM on wasm32; native builds exist for tests.
#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

use log::info;

mod config;
mod dom;
mod error;
mod handles;
mod components {
    pub mod anchors;
    pub mod images;
    pub mod inquiry;
    pub mod loading;
    pub mod navigation;
    pub mod startup;
}
#[cfg(target_arch = "wasm32")]
mod web;

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(config::log_level()).expect("error initializing log");

    info!("Starting page controller");
    #[cfg(target_arch = "wasm32")]
    web::start();
}
