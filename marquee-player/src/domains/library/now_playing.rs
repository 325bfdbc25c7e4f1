use marquee_model::Movie;

use super::display_error;
use crate::infrastructure::api_client::ApiClient;

/// Now-playing screen: one remote page at a time, sorted by title
#[derive(Debug)]
pub struct NowPlayingState {
    api: ApiClient,
    movies: Vec<Movie>,
    page: u32,
    total_pages: u32,
    loading: bool,
    error: Option<String>,
}

impl NowPlayingState {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            movies: Vec::new(),
            page: 1,
            total_pages: 0,
            loading: false,
            error: None,
        }
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Loads on first activation only; later activations keep the list.
    pub async fn on_activate(&mut self) {
        if self.movies.is_empty() {
            self.refetch().await;
        }
    }

    pub async fn refetch(&mut self) {
        self.load_page(self.page).await;
    }

    pub async fn next_page(&mut self) -> bool {
        if self.page >= self.total_pages {
            return false;
        }
        self.load_page(self.page + 1).await
    }

    pub async fn previous_page(&mut self) -> bool {
        if self.page <= 1 {
            return false;
        }
        self.load_page(self.page - 1).await
    }

    /// Load a specific remote page; the current list stays on failure.
    pub async fn go_to_page(&mut self, page: u32) -> bool {
        self.load_page(page.max(1)).await
    }

    async fn load_page(&mut self, page: u32) -> bool {
        self.loading = true;
        let result = self.api.now_playing(page).await;
        self.loading = false;

        match result {
            Ok(listing) => {
                self.movies = listing.results;
                self.page = listing.page.max(1);
                self.total_pages = listing.total_pages;
                self.error = None;
                true
            }
            Err(e) => {
                self.error = display_error("Error fetching movies", &e);
                false
            }
        }
    }
}
