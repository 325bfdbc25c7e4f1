//! Convenience re-exports for crates that work with the catalog model.

pub use crate::account::UserProfile;
pub use crate::ids::{AccountId, MovieId};
pub use crate::image::ImageSize;
pub use crate::movie::{Genre, Movie, MovieDetails, RatedMovie};
pub use crate::page::Paginated;
pub use crate::rating::StarRating;
