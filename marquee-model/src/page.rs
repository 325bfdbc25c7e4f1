#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One page of a remote list
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Paginated<T> {
    #[cfg_attr(feature = "serde", serde(default = "first_page"))]
    pub page: u32,
    #[cfg_attr(feature = "serde", serde(default = "Vec::new"))]
    pub results: Vec<T>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub total_pages: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub total_results: u32,
}

#[cfg(feature = "serde")]
fn first_page() -> u32 {
    1
}

impl<T> Paginated<T> {
    pub fn single(results: Vec<T>) -> Self {
        let total_results = results.len() as u32;
        Self {
            page: 1,
            results,
            total_pages: 1,
            total_results,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            page: self.page,
            results: self.results.into_iter().map(f).collect(),
            total_pages: self.total_pages,
            total_results: self.total_results,
        }
    }
}
