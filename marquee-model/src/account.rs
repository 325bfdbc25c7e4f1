use crate::ids::AccountId;
use crate::image::{ImageSize, image_url};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const GRAVATAR_BASE: &str = "https://secure.gravatar.com/avatar";

/// Account profile of the signed in user
///
/// Fetched on every login and restore; replaced wholesale on refresh.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UserProfile {
    pub id: AccountId,
    pub username: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    /// Preferred language (ISO 639-1)
    #[cfg_attr(feature = "serde", serde(default))]
    pub iso_639_1: String,
    /// Preferred region (ISO 3166-1)
    #[cfg_attr(feature = "serde", serde(default))]
    pub iso_3166_1: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub include_adult: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub avatar: Avatar,
}

impl UserProfile {
    pub fn account_id(&self) -> AccountId {
        self.id
    }

    /// Full name when set, otherwise the username.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.username
        } else {
            &self.name
        }
    }

    pub fn preferred_language(&self) -> &str {
        &self.iso_639_1
    }

    pub fn preferred_region(&self) -> &str {
        &self.iso_3166_1
    }

    /// Uploaded avatar if there is one, the gravatar image otherwise.
    pub fn avatar_url(&self) -> String {
        match self
            .avatar
            .tmdb
            .avatar_path
            .as_deref()
            .filter(|path| !path.is_empty())
        {
            Some(path) => image_url(path, ImageSize::W200),
            None => format!("{}/{}.jpg", GRAVATAR_BASE, self.avatar.gravatar.hash),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Avatar {
    #[cfg_attr(feature = "serde", serde(default))]
    pub gravatar: GravatarAvatar,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tmdb: TmdbAvatar,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GravatarAvatar {
    #[cfg_attr(feature = "serde", serde(default))]
    pub hash: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TmdbAvatar {
    #[cfg_attr(feature = "serde", serde(default))]
    pub avatar_path: Option<String>,
}
