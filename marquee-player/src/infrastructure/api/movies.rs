use marquee_model::{Movie, MovieDetails, MovieId, Paginated, StarRating, sort_by_title};

use crate::infrastructure::api_client::ApiClient;
use crate::infrastructure::api_error::ApiResult;
use crate::infrastructure::api_types::{RatingRequest, StatusResponse};
use crate::infrastructure::routes::{replace_param, v3};

impl ApiClient {
    /// Movies currently in theatres, sorted by title.
    pub async fn now_playing(&self, page: u32) -> ApiResult<Paginated<Movie>> {
        let mut listing: Paginated<Movie> = self
            .get(v3::movie::NOW_PLAYING, &[("page", page.max(1).to_string())])
            .await?;
        sort_by_title(&mut listing.results);
        Ok(listing)
    }

    /// Full record of one movie including its cast.
    pub async fn movie_details(&self, movie_id: MovieId) -> ApiResult<MovieDetails> {
        let path = replace_param(v3::movie::DETAILS, "{movie_id}", movie_id.to_string());
        self.get(&path, &[("append_to_response", "credits".to_string())])
            .await
    }

    pub async fn recommendations(&self, movie_id: MovieId) -> ApiResult<Paginated<Movie>> {
        let path = replace_param(
            v3::movie::RECOMMENDATIONS,
            "{movie_id}",
            movie_id.to_string(),
        );
        self.get(&path, &[]).await
    }

    /// Details and recommendations, fetched concurrently.
    pub async fn movie_detail_bundle(
        &self,
        movie_id: MovieId,
    ) -> ApiResult<(MovieDetails, Vec<Movie>)> {
        let (details, recommendations) = tokio::try_join!(
            self.movie_details(movie_id),
            self.recommendations(movie_id)
        )?;
        Ok((details, recommendations.results))
    }

    /// Submit a rating; the remote side stores it on its ten point scale.
    pub async fn rate_movie(
        &self,
        movie_id: MovieId,
        session_id: &str,
        rating: StarRating,
    ) -> ApiResult<()> {
        let path = replace_param(v3::movie::RATING, "{movie_id}", movie_id.to_string());
        let body = RatingRequest {
            value: rating.to_api_scale(),
        };
        let _: StatusResponse = self
            .post(&path, &[("session_id", session_id.to_string())], &body)
            .await?;
        Ok(())
    }
}
