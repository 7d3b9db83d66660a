pub mod api;
pub mod app;
pub mod client;
pub mod config;
pub mod content;
pub mod error;
pub mod models;
pub mod storage;
