pub mod app;
pub mod cli;
pub mod config;
pub mod errors;
pub mod logger;
