//! Catalog API route templates, relative to the configured base URL.

/// Version 3 of the catalog API
pub mod v3 {
    pub mod authentication {
        pub const TOKEN_NEW: &str = "/authentication/token/new";
        pub const VALIDATE_WITH_LOGIN: &str = "/authentication/token/validate_with_login";
        pub const SESSION_NEW: &str = "/authentication/session/new";
        pub const SESSION: &str = "/authentication/session";
    }

    pub mod account {
        pub const DETAILS: &str = "/account";
        pub const FAVORITE_MOVIES: &str = "/account/{account_id}/favorite/movies";
        pub const RATED_MOVIES: &str = "/account/{account_id}/rated/movies";
        pub const FAVORITE: &str = "/account/{account_id}/favorite";
    }

    pub mod movie {
        pub const NOW_PLAYING: &str = "/movie/now_playing";
        pub const DETAILS: &str = "/movie/{movie_id}";
        pub const RECOMMENDATIONS: &str = "/movie/{movie_id}/recommendations";
        pub const RATING: &str = "/movie/{movie_id}/rating";
    }
}

/// Fill a `{param}` placeholder in a route template.
pub fn replace_param(route: &str, param: &str, value: impl AsRef<str>) -> String {
    route.replace(param, value.as_ref())
}
