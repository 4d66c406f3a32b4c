//! legal-presale Web Frontend
//!
//! Leptos-based WASM landing page: hero with countdown, pricing, FAQ,
//! waitlist/checkout form and the support chat widget.

mod api;
mod app;
mod components;
mod pages;

pub use app::App;

use wasm_bindgen::prelude::*;

/// WASM entry point
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    leptos::mount::mount_to_body(App);
}
