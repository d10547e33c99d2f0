pub mod config;
pub mod engine;
pub mod feeds;
pub mod models;
pub mod telemetry;
