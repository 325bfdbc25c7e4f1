use marquee_config::FavoritesConfig;
use marquee_model::{Movie, MovieDetails, MovieId, StarRating, is_favorite};

use super::favorites::FavoriteToggle;
use super::{NOT_SIGNED_IN, display_error};
use crate::domains::auth::SessionManager;

/// Detail screen for one movie: record, cast, recommendations and the
/// account's rating and favorite status for it
#[derive(Debug)]
pub struct MovieDetailState {
    session: SessionManager,
    max_favorites: Option<usize>,
    movie_id: Option<MovieId>,
    details: Option<MovieDetails>,
    recommendations: Vec<Movie>,
    user_rating: Option<StarRating>,
    is_favorite: bool,
    /// `None` until the favorites list has been fetched for this movie
    favorite_count: Option<usize>,
    loading: bool,
    error: Option<String>,
}

impl MovieDetailState {
    pub fn new(session: SessionManager, favorites: FavoritesConfig) -> Self {
        Self {
            session,
            max_favorites: favorites.max_entries,
            movie_id: None,
            details: None,
            recommendations: Vec::new(),
            user_rating: None,
            is_favorite: false,
            favorite_count: None,
            loading: false,
            error: None,
        }
    }

    pub fn movie_id(&self) -> Option<MovieId> {
        self.movie_id
    }

    pub fn details(&self) -> Option<&MovieDetails> {
        self.details.as_ref()
    }

    pub fn recommendations(&self) -> &[Movie] {
        &self.recommendations
    }

    pub fn user_rating(&self) -> Option<StarRating> {
        self.user_rating
    }

    pub fn is_favorite(&self) -> bool {
        self.is_favorite
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Fetch everything the screen shows, concurrently. State from the
    /// previously loaded movie is dropped before any request goes out.
    pub async fn load(&mut self, movie_id: MovieId) {
        self.reset(movie_id);
        let Some(scope) = self.session.account_scope() else {
            self.error = Some(NOT_SIGNED_IN.to_string());
            return;
        };

        self.loading = true;
        let api = self.session.api();
        let (bundle, rated, favorites) = tokio::join!(
            api.movie_detail_bundle(movie_id),
            api.all_rated_movies(scope.account_id, &scope.session_id),
            api.all_favorite_movies(scope.account_id, &scope.session_id),
        );
        self.loading = false;

        match rated {
            Ok(rated) => {
                self.user_rating = rated
                    .iter()
                    .find(|entry| entry.movie.id == movie_id)
                    .and_then(|entry| entry.star_rating());
            }
            Err(e) => self.report(display_error("Failed to check rating status", &e)),
        }

        match favorites {
            Ok(favorites) => {
                self.is_favorite = is_favorite(movie_id, &favorites);
                self.favorite_count = Some(favorites.len());
            }
            Err(e) => self.report(display_error("Failed to check favorite status", &e)),
        }

        match bundle {
            Ok((mut details, recommendations)) => {
                details.movie.user_rating = self.user_rating;
                self.details = Some(details);
                self.recommendations = recommendations;
            }
            Err(e) => self.report(display_error("Failed to fetch movie data", &e)),
        }
    }

    fn reset(&mut self, movie_id: MovieId) {
        self.movie_id = Some(movie_id);
        self.details = None;
        self.recommendations.clear();
        self.user_rating = None;
        self.is_favorite = false;
        self.favorite_count = None;
        self.error = None;
    }

    /// Keeps the first failure of a load.
    fn report(&mut self, error: Option<String>) {
        if self.error.is_none() {
            self.error = error;
        }
    }

    pub async fn submit_rating(&mut self, rating: StarRating) -> bool {
        let (Some(scope), Some(movie_id)) = (self.session.account_scope(), self.movie_id) else {
            self.error = Some(NOT_SIGNED_IN.to_string());
            return false;
        };

        match self
            .session
            .api()
            .rate_movie(movie_id, &scope.session_id, rating)
            .await
        {
            Ok(()) => {
                self.user_rating = Some(rating);
                if let Some(details) = self.details.as_mut() {
                    details.movie.user_rating = Some(rating);
                }
                self.error = None;
                true
            }
            Err(e) => {
                self.error = display_error("Failed to submit rating", &e);
                false
            }
        }
    }

    /// Same cap as the favorites screen, checked against the count seen at
    /// load time.
    pub async fn toggle_favorite(&mut self) -> FavoriteToggle {
        let (Some(scope), Some(movie_id)) = (self.session.account_scope(), self.movie_id) else {
            self.error = Some(NOT_SIGNED_IN.to_string());
            return FavoriteToggle::Failed;
        };

        let Some(favorite_count) = self.favorite_count else {
            self.error = Some("Favorite status is unknown; reload the movie".to_string());
            return FavoriteToggle::Failed;
        };

        let adding = !self.is_favorite;
        if adding && self.max_favorites.is_some_and(|max| favorite_count >= max) {
            return FavoriteToggle::LimitReached;
        }

        match self
            .session
            .api()
            .mark_favorite(scope.account_id, &scope.session_id, movie_id, adding)
            .await
        {
            Ok(()) => {
                self.is_favorite = adding;
                self.error = None;
                if adding {
                    self.favorite_count = Some(favorite_count + 1);
                    FavoriteToggle::Added
                } else {
                    self.favorite_count = Some(favorite_count.saturating_sub(1));
                    FavoriteToggle::Removed
                }
            }
            Err(e) => {
                self.error = display_error("Error toggling favorite", &e);
                FavoriteToggle::Failed
            }
        }
    }
}
