//! Resource accessors: one method per catalog endpoint, layered on
//! [`ApiClient`](super::api_client::ApiClient).

pub mod account;
pub mod authentication;
pub mod movies;

pub use authentication::approval_url;

/// Upper bound on pages fetched when walking a paginated account list.
pub const MAX_LIST_PAGES: u32 = 50;
