use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::movie::Movie;

/// A movie remembered in the recents or favorites list.
///
/// Field names on disk are kept short (`poster`, `ts`) so lists written by
/// earlier versions still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryItem {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "poster", default)]
    pub poster_url: String,
    #[serde(default)]
    pub year: String,
    /// Epoch milliseconds of the last insert or re-insert
    #[serde(rename = "ts", default)]
    pub added_at: i64,
}

impl LibraryItem {
    pub fn new(id: i64, title: impl Into<String>, poster_url: impl Into<String>, year: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            poster_url: poster_url.into(),
            year: year.into(),
            added_at: 0,
        }
    }

    /// Card data for a normalized movie, using the w342 poster like result cards do
    pub fn from_movie(movie: &Movie) -> Self {
        let title = if movie.title.is_empty() {
            movie.original_title.clone()
        } else {
            movie.title.clone()
        };
        Self::new(movie.id, title, movie.poster_url("w342"), movie.release_year.clone())
    }

    pub fn stamped(mut self, added_at: i64) -> Self {
        self.added_at = added_at;
        self
    }

    pub fn added_at_datetime(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.added_at).single()
    }
}
