//! Client side of the mdshare HTTP API.

pub mod api_client;

pub use api_client::ApiClient;
