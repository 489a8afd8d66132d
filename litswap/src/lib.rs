pub mod config;
pub mod locator;
pub mod replacer;
pub mod utils;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
