use serde::Serialize;
use serde_json::Value;

use crate::coerce::{coerce_number, non_blank_str};
use crate::movie::Movie;

/// A catalog detail response: the normalized movie plus the detail-only fields
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieDetail {
    pub movie: Movie,
    pub runtime_minutes: u32,
    pub tagline: String,
    /// Genre names as listed by the detail endpoint
    pub genres: Vec<String>,
}

impl MovieDetail {
    /// Same validity rule as [`Movie::from_value`]
    pub fn from_value(raw: &Value) -> Option<Self> {
        let movie = Movie::from_value(raw)?;

        let runtime = raw.get("runtime").and_then(coerce_number).unwrap_or(0.0);
        let runtime_minutes = if runtime > 0.0 { runtime as u32 } else { 0 };

        let genres = raw
            .get("genres")
            .and_then(Value::as_array)
            .map(|list| {
                list.iter()
                    .filter_map(|g| non_blank_str(g.get("name")))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            movie,
            runtime_minutes,
            tagline: non_blank_str(raw.get("tagline")).unwrap_or_default().to_string(),
            genres,
        })
    }

    /// Title, else original title, else `Untitled`
    pub fn display_title(&self) -> &str {
        if !self.movie.title.is_empty() {
            &self.movie.title
        } else if !self.movie.original_title.is_empty() {
            &self.movie.original_title
        } else {
            "Untitled"
        }
    }

    /// `2h 10m`, `45m`, `2h`; empty when the runtime is unknown
    pub fn runtime_label(&self) -> String {
        let hours = self.runtime_minutes / 60;
        let minutes = self.runtime_minutes % 60;
        match (hours, minutes) {
            (0, 0) => String::new(),
            (0, m) => format!("{}m", m),
            (h, 0) => format!("{}h", h),
            (h, m) => format!("{}h {}m", h, m),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_reads_detail_fields() {
        let raw = json!({
            "id": 105,
            "title": "Back to the Future",
            "runtime": 116,
            "tagline": "He's the only kid ever to get into trouble before he was born.",
            "genres": [{"id": 12, "name": "Adventure"}, {"name": ""}, {"id": 35, "name": "Comedy"}]
        });
        let detail = MovieDetail::from_value(&raw).unwrap();
        assert_eq!(detail.movie.id, 105);
        assert_eq!(detail.runtime_minutes, 116);
        assert_eq!(detail.genres, vec!["Adventure", "Comedy"]);
        assert_eq!(detail.runtime_label(), "1h 56m");
    }

    #[test]
    fn test_invalid_detail_is_none() {
        assert!(MovieDetail::from_value(&json!({"runtime": 90})).is_none());
    }

    #[test]
    fn test_runtime_label() {
        let mut detail = MovieDetail::from_value(&json!({"id": 1, "title": "T"})).unwrap();
        assert_eq!(detail.runtime_label(), "");
        detail.runtime_minutes = 45;
        assert_eq!(detail.runtime_label(), "45m");
        detail.runtime_minutes = 120;
        assert_eq!(detail.runtime_label(), "2h");
        detail.runtime_minutes = 130;
        assert_eq!(detail.runtime_label(), "2h 10m");
    }

    #[test]
    fn test_display_title_prefers_title() {
        let detail = MovieDetail::from_value(&json!({"id": 1, "original_title": "Solaris"})).unwrap();
        assert_eq!(detail.display_title(), "Solaris");
    }
}
