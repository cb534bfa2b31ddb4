// mdshare shared type definitions
// Each submodule defines types used across the server, the local stores and the client.

pub mod api;
pub mod comment;
pub mod errors;
pub mod group;
pub mod markdown;
pub mod reaction;
pub mod saved_link;
pub mod settings;
pub mod visitor;
