pub mod config;
pub mod error;
pub mod feeds;
pub mod models;
pub mod state;
pub mod telemetry;
pub mod timeline;
