//! Loopback stand-in for the remote catalog, plus session wiring helpers.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use marquee_config::{ApiConfig, AuthConfig, FavoritesConfig};
use marquee_player::domains::auth::{
    AuthorizationOpener, ExpiryPrompt, MemorySecretStore, SessionCollaborators, SessionManager,
};
use marquee_player::{ApiClient, ExpiryGate};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use url::Url;

pub const API_KEY: &str = "test-api-key";
pub const ACCESS_TOKEN: &str = "test-read-token";
pub const USERNAME: &str = "ripley";
pub const PASSWORD: &str = "nostromo";
pub const ACCOUNT_ID: u64 = 4242;
const REMOTE_PAGE_SIZE: usize = 20;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub path: String,
    pub api_key: Option<String>,
    pub bearer: Option<String>,
    pub session_id: Option<String>,
}

#[derive(Debug, Default)]
pub struct FakeState {
    next_id: usize,
    issued_tokens: HashSet<String>,
    validated_tokens: HashSet<String>,
    sessions: HashSet<String>,
    catalog: HashMap<u64, Value>,
    now_playing: Vec<u64>,
    favorites: Vec<u64>,
    rated: Vec<(u64, f32)>,
    pub requests: Vec<RecordedRequest>,
    pub fail_session_delete: bool,
    pub fail_lists: bool,
    pub fail_account: bool,
}

type Shared = Arc<Mutex<FakeState>>;

/// Running fake catalog server
#[derive(Debug, Clone)]
pub struct FakeTmdb {
    base_url: String,
    state: Shared,
}

impl FakeTmdb {
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(FakeState::default()));
        let app = Router::new()
            .route("/3/authentication/token/new", get(token_new))
            .route(
                "/3/authentication/token/validate_with_login",
                post(validate_with_login),
            )
            .route("/3/authentication/session/new", post(session_new))
            .route("/3/authentication/session", delete(session_delete))
            .route("/3/account", get(account))
            .route("/3/account/{account_id}/favorite/movies", get(favorite_movies))
            .route("/3/account/{account_id}/rated/movies", get(rated_movies))
            .route("/3/account/{account_id}/favorite", post(mark_favorite))
            .route("/3/movie/now_playing", get(now_playing))
            .route("/3/movie/{movie_id}", get(movie_details))
            .route("/3/movie/{movie_id}/recommendations", get(recommendations))
            .route("/3/movie/{movie_id}/rating", post(rate_movie))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}/3"),
            state,
        }
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: Url::parse(&self.base_url).unwrap(),
            api_key: API_KEY.to_string(),
            access_token: ACCESS_TOKEN.to_string(),
            request_timeout: Duration::from_secs(5),
        }
    }

    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig {
            approval_url: Url::parse("https://approve.example/authenticate/").unwrap(),
        }
    }

    /// Add movies to the catalog; `now_playing` lists them in insertion order.
    pub fn seed_catalog(&self, movies: &[(u64, &str)]) {
        let mut state = self.state();
        for (id, title) in movies {
            state.catalog.insert(*id, movie_json(*id, title));
            state.now_playing.push(*id);
        }
    }

    pub fn seed_favorites(&self, ids: impl IntoIterator<Item = u64>) {
        let mut state = self.state();
        for id in ids {
            state
                .catalog
                .entry(id)
                .or_insert_with(|| movie_json(id, &format!("Movie {id}")));
            state.favorites.push(id);
        }
    }

    pub fn seed_rating(&self, id: u64, value: f32) {
        let mut state = self.state();
        state
            .catalog
            .entry(id)
            .or_insert_with(|| movie_json(id, &format!("Movie {id}")));
        state.rated.push((id, value));
    }

    /// Server-side view of the rating for `id`, on the ten point scale.
    pub fn remote_rating(&self, id: u64) -> Option<f32> {
        self.state()
            .rated
            .iter()
            .find(|(rated, _)| *rated == id)
            .map(|(_, value)| *value)
    }

    pub fn favorite_ids(&self) -> Vec<u64> {
        self.state().favorites.clone()
    }

    /// Approve a request token as the browser page would.
    pub fn approve(&self, token: &str) {
        self.state().validated_tokens.insert(token.to_string());
    }

    /// Drop every live session so the next session-scoped call gets a 401.
    pub fn expire_sessions(&self) {
        self.state().sessions.clear();
    }

    pub fn live_sessions(&self) -> usize {
        self.state().sessions.len()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state().requests.clone()
    }

    pub fn count_requests(&self, method: &str, path: &str) -> usize {
        self.state()
            .requests
            .iter()
            .filter(|request| request.method == method && request.path == path)
            .count()
    }
}

pub fn movie_json(id: u64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "vote_average": 7.4,
        "poster_path": format!("/poster-{id}.jpg"),
        "backdrop_path": null,
        "release_date": "1979-05-25",
        "overview": format!("Overview of {title}"),
        "genre_ids": [878, 27],
    })
}

fn tmdb_error(status: StatusCode, code: i32, message: &str) -> Response {
    (
        status,
        Json(json!({ "success": false, "status_code": code, "status_message": message })),
    )
        .into_response()
}

fn session_rejected() -> Response {
    tmdb_error(
        StatusCode::UNAUTHORIZED,
        3,
        "Authentication failed: You do not have permissions to access the service.",
    )
}

/// Record the request and check the static credentials.
fn admit<'a>(
    shared: &'a Shared,
    method: &'static str,
    path: String,
    query: &HashMap<String, String>,
    headers: &HeaderMap,
) -> Result<MutexGuard<'a, FakeState>, Response> {
    let mut state = shared.lock().unwrap();
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string);
    let api_key = query.get("api_key").cloned();
    state.requests.push(RecordedRequest {
        method,
        path,
        api_key: api_key.clone(),
        bearer: bearer.clone(),
        session_id: query.get("session_id").cloned(),
    });

    if api_key.as_deref() != Some(API_KEY) || bearer.as_deref() != Some(ACCESS_TOKEN) {
        return Err(tmdb_error(
            StatusCode::UNAUTHORIZED,
            7,
            "Invalid API key: You must be granted a valid key.",
        ));
    }
    Ok(state)
}

fn require_session(state: &FakeState, query: &HashMap<String, String>) -> Result<(), Response> {
    match query.get("session_id") {
        Some(id) if state.sessions.contains(id) => Ok(()),
        _ => Err(session_rejected()),
    }
}

fn page_number(query: &HashMap<String, String>) -> usize {
    query
        .get("page")
        .and_then(|page| page.parse().ok())
        .unwrap_or(1)
        .max(1)
}

fn paginate(items: Vec<Value>, page: usize) -> Value {
    let total_results = items.len();
    let total_pages = total_results.div_ceil(REMOTE_PAGE_SIZE).max(1);
    let results: Vec<Value> = items
        .into_iter()
        .skip((page - 1) * REMOTE_PAGE_SIZE)
        .take(REMOTE_PAGE_SIZE)
        .collect();
    json!({
        "page": page,
        "results": results,
        "total_pages": total_pages,
        "total_results": total_results,
    })
}

async fn token_new(
    State(shared): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let mut state = match admit(&shared, "GET", "/authentication/token/new".into(), &query, &headers) {
        Ok(state) => state,
        Err(response) => return response,
    };
    state.next_id += 1;
    let token = format!("token-{}", state.next_id);
    state.issued_tokens.insert(token.clone());
    Json(json!({
        "success": true,
        "expires_at": "2030-01-01 00:00:00 UTC",
        "request_token": token,
    }))
    .into_response()
}

async fn validate_with_login(
    State(shared): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = match admit(
        &shared,
        "POST",
        "/authentication/token/validate_with_login".into(),
        &query,
        &headers,
    ) {
        Ok(state) => state,
        Err(response) => return response,
    };
    let token = body["request_token"].as_str().unwrap_or_default().to_string();
    if body["username"] != USERNAME || body["password"] != PASSWORD {
        return tmdb_error(
            StatusCode::UNAUTHORIZED,
            30,
            "Invalid username and/or password: You did not provide a valid login.",
        );
    }
    if !state.issued_tokens.contains(&token) {
        return tmdb_error(StatusCode::UNAUTHORIZED, 33, "Invalid request token.");
    }
    state.validated_tokens.insert(token.clone());
    Json(json!({ "success": true, "request_token": token })).into_response()
}

async fn session_new(
    State(shared): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = match admit(&shared, "POST", "/authentication/session/new".into(), &query, &headers) {
        Ok(state) => state,
        Err(response) => return response,
    };
    let token = body["request_token"].as_str().unwrap_or_default();
    if !state.validated_tokens.remove(token) {
        return tmdb_error(StatusCode::UNAUTHORIZED, 17, "Session denied.");
    }
    state.next_id += 1;
    let session_id = format!("session-{}", state.next_id);
    state.sessions.insert(session_id.clone());
    Json(json!({ "success": true, "session_id": session_id })).into_response()
}

async fn session_delete(
    State(shared): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = match admit(&shared, "DELETE", "/authentication/session".into(), &query, &headers) {
        Ok(state) => state,
        Err(response) => return response,
    };
    if state.fail_session_delete {
        return tmdb_error(StatusCode::INTERNAL_SERVER_ERROR, 11, "Internal error.");
    }
    if let Some(id) = body["session_id"].as_str() {
        state.sessions.remove(id);
    }
    Json(json!({ "success": true })).into_response()
}

async fn account(
    State(shared): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let state = match admit(&shared, "GET", "/account".into(), &query, &headers) {
        Ok(state) => state,
        Err(response) => return response,
    };
    if let Err(response) = require_session(&state, &query) {
        return response;
    }
    if state.fail_account {
        return tmdb_error(StatusCode::SERVICE_UNAVAILABLE, 43, "Service offline.");
    }
    Json(json!({
        "id": ACCOUNT_ID,
        "username": USERNAME,
        "name": "Ellen Ripley",
        "iso_639_1": "en",
        "iso_3166_1": "US",
        "include_adult": false,
        "avatar": {
            "gravatar": { "hash": "c9f0f895fb98ab9159f51fd0297e236d" },
            "tmdb": { "avatar_path": "/ripley.png" }
        }
    }))
    .into_response()
}

async fn favorite_movies(
    State(shared): State<Shared>,
    Path(account_id): Path<u64>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let path = format!("/account/{account_id}/favorite/movies");
    let state = match admit(&shared, "GET", path, &query, &headers) {
        Ok(state) => state,
        Err(response) => return response,
    };
    if let Err(response) = require_session(&state, &query) {
        return response;
    }
    if state.fail_lists {
        return tmdb_error(StatusCode::SERVICE_UNAVAILABLE, 43, "Service offline.");
    }
    let movies = state
        .favorites
        .iter()
        .filter_map(|id| state.catalog.get(id).cloned())
        .collect();
    Json(paginate(movies, page_number(&query))).into_response()
}

async fn rated_movies(
    State(shared): State<Shared>,
    Path(account_id): Path<u64>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let path = format!("/account/{account_id}/rated/movies");
    let state = match admit(&shared, "GET", path, &query, &headers) {
        Ok(state) => state,
        Err(response) => return response,
    };
    if let Err(response) = require_session(&state, &query) {
        return response;
    }
    if state.fail_lists {
        return tmdb_error(StatusCode::SERVICE_UNAVAILABLE, 43, "Service offline.");
    }
    let movies = state
        .rated
        .iter()
        .filter_map(|(id, rating)| {
            let mut movie = state.catalog.get(id).cloned()?;
            movie["rating"] = json!(rating);
            Some(movie)
        })
        .collect();
    Json(paginate(movies, page_number(&query))).into_response()
}

async fn mark_favorite(
    State(shared): State<Shared>,
    Path(account_id): Path<u64>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let path = format!("/account/{account_id}/favorite");
    let mut state = match admit(&shared, "POST", path, &query, &headers) {
        Ok(state) => state,
        Err(response) => return response,
    };
    if let Err(response) = require_session(&state, &query) {
        return response;
    }
    let (Some("movie"), Some(id), Some(favorite)) = (
        body["media_type"].as_str(),
        body["media_id"].as_u64(),
        body["favorite"].as_bool(),
    ) else {
        return tmdb_error(StatusCode::BAD_REQUEST, 5, "Invalid parameters.");
    };

    state
        .catalog
        .entry(id)
        .or_insert_with(|| movie_json(id, &format!("Movie {id}")));
    if favorite {
        if !state.favorites.contains(&id) {
            state.favorites.push(id);
        }
    } else {
        state.favorites.retain(|favorite| *favorite != id);
    }
    (
        StatusCode::CREATED,
        Json(json!({ "success": true, "status_code": 1, "status_message": "Success." })),
    )
        .into_response()
}

async fn now_playing(
    State(shared): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let state = match admit(&shared, "GET", "/movie/now_playing".into(), &query, &headers) {
        Ok(state) => state,
        Err(response) => return response,
    };
    let movies = state
        .now_playing
        .iter()
        .filter_map(|id| state.catalog.get(id).cloned())
        .collect();
    Json(paginate(movies, page_number(&query))).into_response()
}

async fn movie_details(
    State(shared): State<Shared>,
    Path(movie_id): Path<u64>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let state = match admit(&shared, "GET", format!("/movie/{movie_id}"), &query, &headers) {
        Ok(state) => state,
        Err(response) => return response,
    };
    let Some(mut movie) = state.catalog.get(&movie_id).cloned() else {
        return tmdb_error(
            StatusCode::NOT_FOUND,
            34,
            "The resource you requested could not be found.",
        );
    };
    movie["runtime"] = json!(117);
    movie["tagline"] = json!("In space no one can hear you scream.");
    movie["genres"] = json!([{ "id": 878, "name": "Science Fiction" }, { "id": 27, "name": "Horror" }]);
    if query.get("append_to_response").map(String::as_str) == Some("credits") {
        movie["credits"] = json!({
            "cast": [
                { "id": 2, "name": "Tom Skerritt", "character": "Dallas", "order": 1 },
                { "id": 1, "name": "Sigourney Weaver", "character": "Ripley", "order": 0 }
            ]
        });
    }
    Json(movie).into_response()
}

async fn recommendations(
    State(shared): State<Shared>,
    Path(movie_id): Path<u64>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let path = format!("/movie/{movie_id}/recommendations");
    let state = match admit(&shared, "GET", path, &query, &headers) {
        Ok(state) => state,
        Err(response) => return response,
    };
    let movies = state
        .catalog
        .iter()
        .filter(|(id, _)| **id != movie_id)
        .map(|(_, movie)| movie.clone())
        .collect();
    Json(paginate(movies, 1)).into_response()
}

async fn rate_movie(
    State(shared): State<Shared>,
    Path(movie_id): Path<u64>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let path = format!("/movie/{movie_id}/rating");
    let mut state = match admit(&shared, "POST", path, &query, &headers) {
        Ok(state) => state,
        Err(response) => return response,
    };
    if let Err(response) = require_session(&state, &query) {
        return response;
    }
    let Some(value) = body["value"].as_f64().filter(|value| (0.5..=10.0).contains(value)) else {
        return tmdb_error(StatusCode::BAD_REQUEST, 18, "Value too low: Value must be greater than 0.");
    };
    let value = value as f32;
    state
        .catalog
        .entry(movie_id)
        .or_insert_with(|| movie_json(movie_id, &format!("Movie {movie_id}")));
    match state.rated.iter_mut().find(|(id, _)| *id == movie_id) {
        Some(entry) => entry.1 = value,
        None => state.rated.push((movie_id, value)),
    }
    (
        StatusCode::CREATED,
        Json(json!({ "success": true, "status_code": 1, "status_message": "Success." })),
    )
        .into_response()
}

/// Counts prompts; optionally holds each one open for a while.
#[derive(Debug, Default)]
pub struct CountingPrompt {
    shown: AtomicUsize,
    hold: Option<Duration>,
}

impl CountingPrompt {
    pub fn holding_for(hold: Duration) -> Self {
        Self {
            shown: AtomicUsize::new(0),
            hold: Some(hold),
        }
    }

    pub fn shown(&self) -> usize {
        self.shown.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExpiryPrompt for CountingPrompt {
    async fn session_expired(&self) {
        self.shown.fetch_add(1, Ordering::SeqCst);
        if let Some(hold) = self.hold {
            tokio::time::sleep(hold).await;
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingOpener {
    opened: Mutex<Vec<Url>>,
}

impl RecordingOpener {
    pub fn opened(&self) -> Vec<Url> {
        self.opened.lock().unwrap().clone()
    }
}

impl AuthorizationOpener for RecordingOpener {
    fn open(&self, url: &Url) -> std::io::Result<()> {
        self.opened.lock().unwrap().push(url.clone());
        Ok(())
    }
}

/// A session manager wired to the fake server, with handles on its
/// collaborators.
#[derive(Debug)]
pub struct Harness {
    pub server: FakeTmdb,
    pub manager: SessionManager,
    pub secrets: Arc<MemorySecretStore>,
    pub prompt: Arc<CountingPrompt>,
    pub opener: Arc<RecordingOpener>,
}

impl Harness {
    pub async fn start() -> Self {
        Self::with_prompt(CountingPrompt::default()).await
    }

    pub async fn with_prompt(prompt: CountingPrompt) -> Self {
        let server = FakeTmdb::start().await;
        let secrets = Arc::new(MemorySecretStore::new());
        let prompt = Arc::new(prompt);
        let opener = Arc::new(RecordingOpener::default());
        let manager = Self::manager_for(&server, secrets.clone(), prompt.clone(), opener.clone());
        Self {
            server,
            manager,
            secrets,
            prompt,
            opener,
        }
    }

    /// A second manager sharing the same secrets, as after a restart.
    pub fn restarted(&self) -> SessionManager {
        Self::manager_for(
            &self.server,
            self.secrets.clone(),
            self.prompt.clone(),
            self.opener.clone(),
        )
    }

    fn manager_for(
        server: &FakeTmdb,
        secrets: Arc<MemorySecretStore>,
        prompt: Arc<CountingPrompt>,
        opener: Arc<RecordingOpener>,
    ) -> SessionManager {
        let gate = Arc::new(ExpiryGate::new());
        let api = ApiClient::new(&server.api_config(), gate.clone()).unwrap();
        SessionManager::new(
            api,
            gate,
            &server.auth_config(),
            SessionCollaborators {
                secrets,
                prompt,
                opener,
            },
        )
    }

    pub async fn login(&self) {
        use marquee_player::domains::auth::Credentials;
        self.manager
            .login(&Credentials::new(USERNAME, PASSWORD))
            .await
            .expect("login should succeed");
    }
}

pub fn favorites_config(page_size: usize, max_entries: Option<usize>) -> FavoritesConfig {
    FavoritesConfig {
        page_size,
        max_entries,
    }
}
