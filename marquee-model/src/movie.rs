use crate::dates::format_release_date;
use crate::ids::MovieId;
use crate::image::{ImageSize, image_url};
use crate::rating::StarRating;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

/// Catalog movie as returned by list and detail endpoints
///
/// `user_rating` is not part of the catalog record. It is attached locally by
/// cross-referencing the account's rated list and never crosses the wire.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub vote_average: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub poster_path: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub backdrop_path: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub release_date: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub overview: String,
    /// Populated by the detail endpoint only
    #[cfg_attr(feature = "serde", serde(default))]
    pub genres: Vec<Genre>,
    /// Populated by list endpoints only
    #[cfg_attr(feature = "serde", serde(default))]
    pub genre_ids: Vec<u32>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub user_rating: Option<StarRating>,
}

impl Movie {
    pub fn new(id: impl Into<MovieId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            vote_average: 0.0,
            poster_path: None,
            backdrop_path: None,
            release_date: None,
            overview: String::new(),
            genres: Vec::new(),
            genre_ids: Vec::new(),
            user_rating: None,
        }
    }

    pub fn with_user_rating(mut self, rating: Option<StarRating>) -> Self {
        self.user_rating = rating;
        self
    }

    pub fn poster_url(&self, size: ImageSize) -> Option<String> {
        self.poster_path
            .as_deref()
            .filter(|path| !path.is_empty())
            .map(|path| image_url(path, size))
    }

    pub fn backdrop_url(&self, size: ImageSize) -> Option<String> {
        self.backdrop_path
            .as_deref()
            .filter(|path| !path.is_empty())
            .map(|path| image_url(path, size))
    }

    /// Release date rendered as `"March 7, 2024"`.
    pub fn formatted_release_date(&self) -> Option<String> {
        self.release_date.as_deref().and_then(format_release_date)
    }

    pub fn genre_names(&self) -> Vec<&str> {
        self.genres.iter().map(|genre| genre.name.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub character: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub profile_path: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub order: u32,
}

impl CastMember {
    pub fn profile_url(&self, size: ImageSize) -> Option<String> {
        self.profile_path
            .as_deref()
            .filter(|path| !path.is_empty())
            .map(|path| image_url(path, size))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Credits {
    #[cfg_attr(feature = "serde", serde(default))]
    pub cast: Vec<CastMember>,
}

/// Movie detail, optionally with the cast embedded
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MovieDetails {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub movie: Movie,
    #[cfg_attr(feature = "serde", serde(default))]
    pub runtime: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tagline: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub credits: Option<Credits>,
}

impl MovieDetails {
    /// Cast in billing order; empty when credits were not requested.
    pub fn cast(&self) -> Vec<&CastMember> {
        let mut cast: Vec<&CastMember> = self
            .credits
            .iter()
            .flat_map(|credits| credits.cast.iter())
            .collect();
        cast.sort_by_key(|member| member.order);
        cast
    }
}

/// Entry of the account's rated list; `rating` is on the remote ten point scale
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RatedMovie {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub movie: Movie,
    pub rating: f32,
}

impl RatedMovie {
    pub fn star_rating(&self) -> Option<StarRating> {
        StarRating::from_api_scale(self.rating).ok()
    }

    /// The catalog movie with the user's rating attached.
    pub fn into_movie(self) -> Movie {
        let rating = self.star_rating();
        self.movie.with_user_rating(rating)
    }
}

pub fn is_favorite(movie_id: MovieId, favorites: &[Movie]) -> bool {
    favorites.iter().any(|movie| movie.id == movie_id)
}

/// Case-insensitive ascending title order.
pub fn sort_by_title(movies: &mut [Movie]) {
    movies.sort_by_cached_key(|movie| movie.title.to_lowercase());
}
