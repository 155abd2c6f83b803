pub mod config;
pub mod feature;
pub mod media;
pub mod services;
pub mod status;
