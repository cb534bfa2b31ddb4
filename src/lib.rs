//! mdshare: upload, view, edit, share, comment on and react to markdown documents.
//!
//! This library crate exposes all modules for use by the binaries and integration tests.

pub mod api_handler;
pub mod app;
pub mod client;
pub mod database;
pub mod logging;
pub mod managers;
pub mod platform;
pub mod router;
pub mod services;
pub mod store;
pub mod types;
