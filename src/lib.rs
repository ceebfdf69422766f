pub mod config;
pub mod offerings;
pub mod output;
pub mod scoring;
pub mod server;
