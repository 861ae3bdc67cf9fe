pub mod app;
pub mod config;
pub mod docker;
pub mod error;
pub mod table;
