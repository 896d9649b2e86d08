use wtw_models::{GenreMap, Movie};

/// State that survives between searches in one interactive session
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub genres: GenreMap,
    pub selected_genre: Option<i64>,
    pub last_query: String,
    pub last_results: Vec<Movie>,
}

impl Session {
    pub fn new(genres: GenreMap) -> Self {
        Self {
            genres,
            ..Self::default()
        }
    }

    pub fn record_search(&mut self, query: &str, results: Vec<Movie>) {
        self.last_query = query.trim().to_string();
        self.last_results = results;
    }

    /// Select `genre_id`, or clear the selection if it was already selected.
    /// Returns whether the genre is selected afterwards.
    pub fn toggle_genre(&mut self, genre_id: i64) -> bool {
        if self.selected_genre == Some(genre_id) {
            self.selected_genre = None;
            false
        } else {
            self.selected_genre = Some(genre_id);
            true
        }
    }

    pub fn visible_results(&self) -> Vec<&Movie> {
        filter_by_genre(&self.last_results, self.selected_genre)
    }

    pub fn results_label(&self) -> String {
        results_label(self.visible_results().len())
    }
}

/// Movies tagged with `genre_id`, in order; everything when no genre is selected
pub fn filter_by_genre<'a>(movies: impl IntoIterator<Item = &'a Movie>, genre_id: Option<i64>) -> Vec<&'a Movie> {
    movies
        .into_iter()
        .filter(|movie| genre_id.map_or(true, |id| movie.has_genre(id)))
        .collect()
}

/// Movies whose title, original title or overview contain `query`
pub fn filter_by_query<'a>(movies: impl IntoIterator<Item = &'a Movie>, query: &str) -> Vec<&'a Movie> {
    movies.into_iter().filter(|movie| movie.matches_query(query)).collect()
}

pub fn results_label(count: usize) -> String {
    match count {
        0 => String::new(),
        1 => "1 result".to_string(),
        n => format!("{} results", n),
    }
}
