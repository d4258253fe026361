pub mod bridge;
pub mod config;
pub mod consent;
pub mod overlay;
pub mod relay;
pub mod session;
