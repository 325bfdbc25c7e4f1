//! Core data model definitions for the Marquee movie client.
//!
//! These types mirror the JSON payloads of the remote movie catalog and the
//! account endpoints. They are read-only snapshots: nothing here talks to the
//! network or keeps state between calls.
#![allow(missing_docs)]

pub mod account;
pub mod dates;
pub mod error;
pub mod ids;
pub mod image;
pub mod movie;
pub mod page;
pub mod prelude;
pub mod rating;
pub mod vote;

// Intentionally curated re-exports for downstream consumers.
pub use account::{Avatar, GravatarAvatar, TmdbAvatar, UserProfile};
pub use dates::format_release_date;
pub use error::{ModelError, Result as ModelResult};
pub use ids::{AccountId, MovieId};
pub use image::{ImageSize, image_url};
pub use movie::{
    CastMember, Credits, Genre, Movie, MovieDetails, RatedMovie, is_favorite,
    sort_by_title,
};
pub use page::Paginated;
pub use rating::StarRating;
pub use vote::VoteTier;
