use std::collections::HashSet;

use log::{debug, warn};
use marquee_model::{AccountId, Movie, MovieId, Paginated, RatedMovie, UserProfile};
use serde::de::DeserializeOwned;

use super::MAX_LIST_PAGES;
use crate::infrastructure::api_client::ApiClient;
use crate::infrastructure::api_error::ApiResult;
use crate::infrastructure::api_types::{FavoriteRequest, StatusResponse};
use crate::infrastructure::routes::{replace_param, v3};

impl ApiClient {
    /// Profile of the account that owns `session_id`.
    pub async fn account_details(&self, session_id: &str) -> ApiResult<UserProfile> {
        self.get(
            v3::account::DETAILS,
            &[("session_id", session_id.to_string())],
        )
        .await
    }

    pub async fn favorite_movies(
        &self,
        account_id: AccountId,
        session_id: &str,
        page: u32,
    ) -> ApiResult<Paginated<Movie>> {
        let path = replace_param(
            v3::account::FAVORITE_MOVIES,
            "{account_id}",
            account_id.to_string(),
        );
        self.account_page(&path, session_id, page).await
    }

    pub async fn rated_movies(
        &self,
        account_id: AccountId,
        session_id: &str,
        page: u32,
    ) -> ApiResult<Paginated<RatedMovie>> {
        let path = replace_param(
            v3::account::RATED_MOVIES,
            "{account_id}",
            account_id.to_string(),
        );
        self.account_page(&path, session_id, page).await
    }

    /// Every favorite of the account, across all remote pages.
    pub async fn all_favorite_movies(
        &self,
        account_id: AccountId,
        session_id: &str,
    ) -> ApiResult<Vec<Movie>> {
        let path = replace_param(
            v3::account::FAVORITE_MOVIES,
            "{account_id}",
            account_id.to_string(),
        );
        let movies: Vec<Movie> = self.collect_pages(&path, session_id).await?;
        Ok(dedup_by_id(movies, |movie| movie.id))
    }

    /// Every rated movie of the account, across all remote pages.
    pub async fn all_rated_movies(
        &self,
        account_id: AccountId,
        session_id: &str,
    ) -> ApiResult<Vec<RatedMovie>> {
        let path = replace_param(
            v3::account::RATED_MOVIES,
            "{account_id}",
            account_id.to_string(),
        );
        let movies: Vec<RatedMovie> = self.collect_pages(&path, session_id).await?;
        Ok(dedup_by_id(movies, |rated| rated.movie.id))
    }

    /// Add or remove a movie from the account's favorites.
    pub async fn mark_favorite(
        &self,
        account_id: AccountId,
        session_id: &str,
        movie_id: MovieId,
        favorite: bool,
    ) -> ApiResult<()> {
        let path = replace_param(v3::account::FAVORITE, "{account_id}", account_id.to_string());
        let body = FavoriteRequest {
            media_type: "movie",
            media_id: movie_id,
            favorite,
        };
        let _: StatusResponse = self
            .post(&path, &[("session_id", session_id.to_string())], &body)
            .await?;
        debug!(
            "[ApiClient] Marked movie {} favorite={}",
            movie_id, favorite
        );
        Ok(())
    }

    async fn account_page<T: DeserializeOwned>(
        &self,
        path: &str,
        session_id: &str,
        page: u32,
    ) -> ApiResult<Paginated<T>> {
        self.get(
            path,
            &[
                ("session_id", session_id.to_string()),
                ("page", page.max(1).to_string()),
            ],
        )
        .await
    }

    async fn collect_pages<T: DeserializeOwned>(
        &self,
        path: &str,
        session_id: &str,
    ) -> ApiResult<Vec<T>> {
        let mut page: Paginated<T> = self.account_page(path, session_id, 1).await?;
        let mut items = std::mem::take(&mut page.results);

        let last_page = page.total_pages.min(MAX_LIST_PAGES);
        if page.total_pages > MAX_LIST_PAGES {
            warn!(
                "[ApiClient] {} reports {} pages, reading the first {}",
                path, page.total_pages, MAX_LIST_PAGES
            );
        }

        for number in 2..=last_page {
            let next: Paginated<T> = self.account_page(path, session_id, number).await?;
            items.extend(next.results);
        }

        Ok(items)
    }
}

/// Keep the first occurrence of each id, preserving order.
fn dedup_by_id<T>(items: Vec<T>, id: impl Fn(&T) -> MovieId) -> Vec<T> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(id(item)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_keeps_first_occurrence() {
        let movies = vec![
            Movie::new(1, "Alien"),
            Movie::new(2, "Brazil"),
            Movie::new(1, "Alien (duplicate)"),
        ];
        let deduped = dedup_by_id(movies, |movie| movie.id);
        let titles: Vec<_> = deduped.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, ["Alien", "Brazil"]);
    }
}
