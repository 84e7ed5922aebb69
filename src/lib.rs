//! Core library for spotify-playlist-proxy
pub mod config;
pub mod error;
pub mod models;
pub mod api;
pub mod logging;
pub mod server;
