pub mod config;
pub mod templates;
pub mod utils;
