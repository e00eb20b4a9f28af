//! sensplot: Polls a CoAP climate sensor and plots its recent history
//!
//! This library wires the workspace crates together:
//! - Configuration management (`config`)
//! - Building and running the poll loop (`app`)

pub mod app;
pub mod config;

// Re-export commonly used types
pub use app::{build_loop, discover_resources, run_until_shutdown, save_config_to, AppLoop};
pub use config::AppConfig;
