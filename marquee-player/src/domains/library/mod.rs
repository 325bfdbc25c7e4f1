//! Per-screen state containers.
//!
//! Each container fetches through the shared [`SessionManager`] on activation
//! and on demand, and keeps a display string instead of an error value: a
//! failed request never escapes a container. Mutating operations take
//! `&mut self`, so a refetch cannot interleave with a toggle on the same
//! container.
//!
//! [`SessionManager`]: crate::domains::auth::SessionManager

pub mod detail;
pub mod favorites;
pub mod now_playing;
pub mod pagination;
pub mod rated;

pub use detail::MovieDetailState;
pub use favorites::{FavoriteToggle, FavoritesState};
pub use now_playing::NowPlayingState;
pub use pagination::Paginator;
pub use rated::RatedState;

use log::{debug, warn};

use crate::infrastructure::api_error::{ApiError, ErrorKind};

pub const NOT_SIGNED_IN: &str = "Sign in to see your lists.";

/// Turn a failed request into what the screen shows.
///
/// Session rejections yield `None`: the expiry prompt covers them.
pub(crate) fn display_error(context: &str, error: &ApiError) -> Option<String> {
    match error.kind() {
        ErrorKind::SessionExpired => {
            debug!("[Library] {}: session expired", context);
            None
        }
        ErrorKind::InvalidCredentials | ErrorKind::NetworkOrUnknown => {
            warn!("[Library] {}: {}", context, error);
            Some(context.to_string())
        }
    }
}
