pub mod api;
pub mod config;
pub mod data;
pub mod db;
pub mod geo;
pub mod query;

mod api_tests;

pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
