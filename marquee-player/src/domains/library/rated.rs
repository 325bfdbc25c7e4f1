use marquee_model::{Movie, MovieId, StarRating};

use super::pagination::Paginator;
use super::{NOT_SIGNED_IN, display_error};
use crate::domains::auth::SessionManager;

/// Rated screen: movies the account has rated, with the rating attached
#[derive(Debug)]
pub struct RatedState {
    session: SessionManager,
    rated: Vec<Movie>,
    paginator: Paginator,
    loading: bool,
    error: Option<String>,
}

impl RatedState {
    pub fn new(session: SessionManager, page_size: usize) -> Self {
        Self {
            session,
            rated: Vec::new(),
            paginator: Paginator::new(page_size),
            loading: false,
            error: None,
        }
    }

    pub fn rated(&self) -> &[Movie] {
        &self.rated
    }

    pub fn page(&self) -> &[Movie] {
        self.paginator.slice(&self.rated)
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn rating_for(&self, movie_id: MovieId) -> Option<StarRating> {
        self.rated
            .iter()
            .find(|movie| movie.id == movie_id)
            .and_then(|movie| movie.user_rating)
    }

    /// Copy known ratings onto movies fetched elsewhere.
    pub fn annotate(&self, movies: &mut [Movie]) {
        for movie in movies {
            movie.user_rating = self.rating_for(movie.id);
        }
    }

    pub fn next_page(&mut self) -> bool {
        self.paginator.next_page()
    }

    pub fn previous_page(&mut self) -> bool {
        self.paginator.previous_page()
    }

    pub async fn on_activate(&mut self) {
        self.refetch().await;
    }

    pub async fn refetch(&mut self) {
        let Some(scope) = self.session.account_scope() else {
            self.replace(Vec::new());
            self.error = Some(NOT_SIGNED_IN.to_string());
            return;
        };

        self.loading = true;
        let result = self
            .session
            .api()
            .all_rated_movies(scope.account_id, &scope.session_id)
            .await;
        self.loading = false;

        match result {
            Ok(rated) => {
                self.replace(rated.into_iter().map(|rated| rated.into_movie()).collect());
                self.error = None;
            }
            Err(e) => self.error = display_error("Error fetching rated movies", &e),
        }
    }

    /// Rate `movie`; the local list reflects the new rating once accepted.
    pub async fn submit(&mut self, movie: &Movie, rating: StarRating) -> bool {
        let Some(scope) = self.session.account_scope() else {
            self.error = Some(NOT_SIGNED_IN.to_string());
            return false;
        };

        let result = self
            .session
            .api()
            .rate_movie(movie.id, &scope.session_id, rating)
            .await;

        match result {
            Ok(()) => {
                self.error = None;
                match self.rated.iter_mut().find(|rated| rated.id == movie.id) {
                    Some(existing) => existing.user_rating = Some(rating),
                    None => {
                        self.rated.push(movie.clone().with_user_rating(Some(rating)));
                        self.paginator.set_item_count(self.rated.len());
                    }
                }
                true
            }
            Err(e) => {
                self.error = display_error("Failed to submit rating", &e);
                false
            }
        }
    }

    fn replace(&mut self, rated: Vec<Movie>) {
        self.rated = rated;
        self.paginator.set_item_count(self.rated.len());
    }
}
