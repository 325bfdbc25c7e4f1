use log::info;
use marquee_config::FavoritesConfig;
use marquee_model::{Movie, MovieId, is_favorite};

use super::pagination::Paginator;
use super::{NOT_SIGNED_IN, display_error};
use crate::domains::auth::SessionManager;

/// Outcome of [`FavoritesState::toggle`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteToggle {
    Added,
    Removed,
    /// The cap is reached; nothing was sent
    LimitReached,
    Failed,
}

/// Message shown when [`FavoriteToggle::LimitReached`] comes back.
pub fn limit_message(max_entries: usize) -> String {
    format!(
        "You've reached the maximum limit of {max_entries} favorite movies. \
         Remove a movie from your favorites to add a new one."
    )
}

/// Favorites screen: the account's favorite movies, paged locally
#[derive(Debug)]
pub struct FavoritesState {
    session: SessionManager,
    favorites: Vec<Movie>,
    paginator: Paginator,
    max_entries: Option<usize>,
    loading: bool,
    error: Option<String>,
}

impl FavoritesState {
    pub fn new(session: SessionManager, config: FavoritesConfig) -> Self {
        Self {
            session,
            favorites: Vec::new(),
            paginator: Paginator::new(config.page_size),
            max_entries: config.max_entries,
            loading: false,
            error: None,
        }
    }

    pub fn favorites(&self) -> &[Movie] {
        &self.favorites
    }

    /// Movies on the current page.
    pub fn page(&self) -> &[Movie] {
        self.paginator.slice(&self.favorites)
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    pub fn max_entries(&self) -> Option<usize> {
        self.max_entries
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_favorite(&self, movie_id: MovieId) -> bool {
        is_favorite(movie_id, &self.favorites)
    }

    pub fn is_full(&self) -> bool {
        self.max_entries
            .is_some_and(|max| self.favorites.len() >= max)
    }

    pub fn next_page(&mut self) -> bool {
        self.paginator.next_page()
    }

    pub fn previous_page(&mut self) -> bool {
        self.paginator.previous_page()
    }

    /// Screen activation hook.
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
            .all_favorite_movies(scope.account_id, &scope.session_id)
            .await;
        self.loading = false;

        match result {
            Ok(favorites) => {
                self.replace(favorites);
                self.error = None;
            }
            Err(e) => self.error = display_error("Error fetching favorites", &e),
        }
    }

    /// Add `movie` when absent, remove it when present.
    ///
    /// Adding past the cap is refused locally with
    /// [`FavoriteToggle::LimitReached`]. The list changes only after the
    /// remote side confirms.
    pub async fn toggle(&mut self, movie: &Movie) -> FavoriteToggle {
        let Some(scope) = self.session.account_scope() else {
            self.error = Some(NOT_SIGNED_IN.to_string());
            return FavoriteToggle::Failed;
        };

        let currently = self.is_favorite(movie.id);
        if !currently && self.is_full() {
            info!(
                "[Favorites] Cap of {:?} reached, not adding {}",
                self.max_entries, movie.id
            );
            return FavoriteToggle::LimitReached;
        }

        let result = self
            .session
            .api()
            .mark_favorite(scope.account_id, &scope.session_id, movie.id, !currently)
            .await;

        match result {
            Ok(()) => {
                self.error = None;
                if currently {
                    self.favorites.retain(|favorite| favorite.id != movie.id);
                    self.paginator.set_item_count(self.favorites.len());
                    FavoriteToggle::Removed
                } else {
                    self.favorites.push(movie.clone());
                    self.paginator.set_item_count(self.favorites.len());
                    FavoriteToggle::Added
                }
            }
            Err(e) => {
                self.error = display_error("Error toggling favorite", &e);
                FavoriteToggle::Failed
            }
        }
    }

    pub fn clear(&mut self) {
        self.replace(Vec::new());
        self.error = None;
    }

    fn replace(&mut self, favorites: Vec<Movie>) {
        self.favorites = favorites;
        self.paginator.set_item_count(self.favorites.len());
    }
}
