pub mod api;
pub mod api_client;
pub mod api_error;
pub mod api_types;
pub mod expiry;
pub mod routes;
