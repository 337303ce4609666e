pub mod duration;
pub mod load_config;
