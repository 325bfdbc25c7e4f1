use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Catalog identifier of a movie
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct MovieId(pub u64);

impl MovieId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for MovieId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the signed in account, used to scope favorite and rated queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AccountId(pub u64);

impl AccountId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl From<u64> for AccountId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
