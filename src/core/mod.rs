pub mod app;
pub mod catalog;
pub mod config;
pub mod message;
pub mod workspace;
