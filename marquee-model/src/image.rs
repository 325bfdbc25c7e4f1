use std::fmt::{self, Display};

const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

/// Image width variants served by the catalog's image host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageSize {
    W92,
    W154,
    W185,
    W200,
    W342,
    W500,
    W780,
    Original,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::W92 => "w92",
            ImageSize::W154 => "w154",
            ImageSize::W185 => "w185",
            ImageSize::W200 => "w200",
            ImageSize::W342 => "w342",
            ImageSize::W500 => "w500",
            ImageSize::W780 => "w780",
            ImageSize::Original => "original",
        }
    }

    /// Default size for list posters
    pub const fn poster() -> Self {
        Self::W342
    }
}

impl Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Absolute URL for an image path such as `/kqjL17yufvn9OVLyXYpvtyrFfak.jpg`.
pub fn image_url(path: &str, size: ImageSize) -> String {
    format!(
        "{}/{}/{}",
        TMDB_IMAGE_BASE,
        size.as_str(),
        path.trim_start_matches('/')
    )
}
