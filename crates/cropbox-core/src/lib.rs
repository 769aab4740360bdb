pub mod config;
pub mod consts;
pub mod error;
pub mod events;
pub mod export;
pub mod render;
pub mod session;
pub mod source;
pub mod transform;
pub mod viewport;
