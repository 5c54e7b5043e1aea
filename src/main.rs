use log::info;

mod app;
mod config;
mod dom;
mod error;
mod storage;
mod behaviors {
    pub mod accordion;
    pub mod contact_form;
    pub mod hero;
    pub mod lazy_images;
    pub mod nav_menu;
    pub mod scroll_effects;
    pub mod scroll_spy;
    pub mod smooth_scroll;
    pub mod theme;
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(config::log_level()).expect("error initializing log");

    info!("Starting page behaviors");
    app::start();
}
