//! Five star user ratings and their mapping onto the remote ten point scale.
//!
//! The user rates on half stars (0.5 to 5.0). The remote service stores the
//! same value doubled, so every valid star value maps to an integer between
//! 1 and 10. The value is kept as a count of half stars, which keeps the
//! conversion exact in both directions.

use std::fmt;

use crate::error::{ModelError, Result};

const MAX_HALF_STARS: u8 = 10;

/// A user rating in half star steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StarRating {
    half_stars: u8,
}

impl StarRating {
    /// Build a rating from a star value such as `3.5`.
    pub fn from_stars(stars: f32) -> Result<Self> {
        let doubled = stars * 2.0;
        if !doubled.is_finite() || (doubled - doubled.round()).abs() > f32::EPSILON {
            return Err(ModelError::InvalidRating(stars));
        }
        Self::from_half_stars(doubled.round() as i64)
            .ok_or(ModelError::InvalidRating(stars))
    }

    /// Build a rating from a value on the remote ten point scale.
    ///
    /// The remote service also accepts half points (e.g. `7.5`) from other
    /// clients; those are rounded to the nearest half star.
    pub fn from_api_scale(value: f32) -> Result<Self> {
        if !value.is_finite() {
            return Err(ModelError::InvalidApiRating(value));
        }
        Self::from_half_stars(value.round() as i64)
            .ok_or(ModelError::InvalidApiRating(value))
    }

    fn from_half_stars(half_stars: i64) -> Option<Self> {
        if (1..=MAX_HALF_STARS as i64).contains(&half_stars) {
            Some(Self {
                half_stars: half_stars as u8,
            })
        } else {
            None
        }
    }

    /// Value sent to the remote service: the star value doubled.
    pub const fn to_api_scale(self) -> u8 {
        self.half_stars
    }

    pub fn stars(self) -> f32 {
        f32::from(self.half_stars) / 2.0
    }

    /// Every valid rating, lowest first.
    pub fn all() -> impl Iterator<Item = StarRating> {
        (1..=MAX_HALF_STARS).map(|half_stars| StarRating { half_stars })
    }
}

impl fmt::Display for StarRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.half_stars % 2 == 0 {
            write!(f, "{}", self.half_stars / 2)
        } else {
            write!(f, "{}.5", self.half_stars / 2)
        }
    }
}

impl TryFrom<f32> for StarRating {
    type Error = ModelError;

    fn try_from(stars: f32) -> Result<Self> {
        Self::from_stars(stars)
    }
}
