use clap::ValueEnum;
use comfy_table::{modifiers, presets, Attribute, Cell, Color, Table};
use owo_colors::OwoColorize;
use serde_json::{json, Value};
use wtw_core::Availability;
use wtw_models::{GenreMap, LibraryItem, Movie, MovieDetail};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    #[value(name = "json-pretty")]
    JsonPretty,
}

pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    pub fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Human => println!("{} {}", "✓".green(), msg.as_ref()),
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({"type": "success", "message": msg.as_ref()}));
            }
        }
    }

    pub fn error(&self, msg: impl AsRef<str>) {
        // Errors are shown even in quiet mode
        match self.format {
            OutputFormat::Human => eprintln!("{} {}", "✗".red(), msg.as_ref()),
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({"type": "error", "message": msg.as_ref()}));
            }
        }
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Human => println!("{}", msg.as_ref()),
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({"type": "info", "message": msg.as_ref()}));
            }
        }
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }

        match self.format {
            OutputFormat::Human => println!("{} {}", "⚠".yellow(), msg.as_ref()),
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.print_json(&json!({"type": "warning", "message": msg.as_ref()}));
            }
        }
    }

    /// Structured payload; ignored in human mode, where callers render tables instead
    pub fn json(&self, data: &Value) {
        if self.is_human() || self.quiet {
            return;
        }
        self.print_json(data);
    }

    fn print_json(&self, data: &Value) {
        match self.format {
            OutputFormat::JsonPretty => println!("{}", serde_json::to_string_pretty(data).unwrap_or_default()),
            _ => println!("{}", serde_json::to_string(data).unwrap_or_default()),
        }
    }

    /// Result cards: a heading, then one row per movie, or `empty_message` when there are none
    pub fn movies(&self, heading: &str, movies: &[&Movie], genres: &GenreMap, favorites: &[LibraryItem], empty_message: &str) {
        if !self.is_human() {
            let results: Vec<Value> = movies.iter().map(|m| m.to_wire()).collect();
            self.json(&json!({"type": "movies", "heading": heading, "count": movies.len(), "results": results}));
            return;
        }
        if self.quiet {
            return;
        }
        if movies.is_empty() {
            println!("{}", empty_message.bright_black());
            return;
        }

        println!("{}", heading.bright_cyan().bold());
        let mut table = styled_table(vec!["", "ID", "Title", "Year", "Rating", "Genres"]);
        for movie in movies {
            let favorite = if wtw_core::library::contains(favorites, movie.id) { "♥" } else { "" };
            let title = if movie.title.is_empty() { "Untitled" } else { &movie.title };
            table.add_row(vec![
                Cell::new(favorite).fg(Color::Red),
                Cell::new(movie.id),
                Cell::new(title),
                Cell::new(&movie.release_year),
                Cell::new(format!("⭐ {}", movie.rating_label())),
                Cell::new(movie.genre_names(genres).join(", ")),
            ]);
        }
        println!("{}", table);
    }

    pub fn genres(&self, genres: &GenreMap) {
        let sorted = genres.sorted_by_name();
        if !self.is_human() {
            let list: Vec<Value> = sorted.iter().map(|(id, name)| json!({"id": id, "name": name})).collect();
            self.json(&json!({"type": "genres", "genres": list}));
            return;
        }
        if self.quiet {
            return;
        }

        let mut table = styled_table(vec!["ID", "Genre"]);
        for (id, name) in sorted {
            table.add_row(vec![Cell::new(id), Cell::new(name)]);
        }
        println!("{}", table);
    }

    /// `watchmode_available` is false when the flat source was skipped (disabled or no key)
    pub fn movie_page(
        &self,
        detail: &MovieDetail,
        availability: &Availability,
        region: &str,
        favorite: bool,
        watchmode_available: bool,
    ) {
        if !self.is_human() {
            self.json(&movie_page_json(detail, availability, region, favorite, watchmode_available));
            return;
        }
        if self.quiet {
            return;
        }

        let movie = &detail.movie;
        let heart = if favorite { " ♥".red().to_string() } else { String::new() };
        println!("\n{}{}", detail.display_title().bright_white().bold(), heart);
        if !detail.tagline.is_empty() {
            println!("{}", detail.tagline.bright_black().italic());
        }

        let meta: Vec<String> = [
            movie.release_year.clone(),
            detail.runtime_label(),
            format!("⭐ {}", movie.rating_label()),
            detail.genres.join(", "),
        ]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect();
        println!("{}", meta.join("  ·  "));

        if !movie.overview.is_empty() {
            println!("\n{}", movie.overview);
        }
        let poster = movie.poster_url("w500");
        if !poster.is_empty() {
            println!("{} {}", "Poster:".bright_black(), poster);
        }

        println!("\n{} {}", "Where to watch".bright_cyan().bold(), format!("({})", region).bright_black());
        if availability.is_empty() {
            println!("{}", "No streaming information available.".bright_black());
            return;
        }
        for group in availability.groups() {
            let mut table = styled_table(vec![group.offer_type.title(), "Format", "Price", "Link"]);
            for offer in &group.offers {
                table.add_row(vec![
                    Cell::new(&offer.name),
                    Cell::new(&offer.format),
                    Cell::new(offer.price.map(|p| format!("{:.2}", p)).unwrap_or_default()),
                    Cell::new(if offer.web_url.is_empty() { &offer.logo_path } else { &offer.web_url }),
                ]);
            }
            println!("{}", table);
        }
    }

    pub fn library(&self, heading: &str, items: &[LibraryItem], empty_message: &str) {
        if !self.is_human() {
            self.json(&json!({"type": "library", "heading": heading, "count": items.len(), "items": items}));
            return;
        }
        if self.quiet {
            return;
        }

        println!("{}", heading.bright_cyan().bold());
        if items.is_empty() {
            println!("{}", empty_message.bright_black());
            return;
        }
        let mut table = styled_table(vec!["ID", "Title", "Year", "Added"]);
        for item in items {
            let added = item
                .added_at_datetime()
                .filter(|_| item.added_at > 0)
                .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default();
            table.add_row(vec![
                Cell::new(item.id),
                Cell::new(&item.title),
                Cell::new(&item.year),
                Cell::new(added),
            ]);
        }
        println!("{}", table);
    }
}

fn movie_page_json(
    detail: &MovieDetail,
    availability: &Availability,
    region: &str,
    favorite: bool,
    watchmode_available: bool,
) -> Value {
    json!({
        "type": "movie",
        "movie": detail.movie.to_wire(),
        "runtime": detail.runtime_minutes,
        "tagline": detail.tagline,
        "genres": detail.genres,
        "favorite": favorite,
        "region": region,
        "watchmode": if watchmode_available { "available" } else { "unavailable" },
        "availability": availability,
    })
}

pub fn styled_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_header(
        header
            .into_iter()
            .map(|h| Cell::new(h).fg(Color::Cyan).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail() -> MovieDetail {
        MovieDetail::from_value(&json!({"id": 603, "title": "The Matrix", "runtime": 136})).unwrap()
    }

    #[test]
    fn test_movie_page_json_marks_skipped_watchmode() {
        let value = movie_page_json(&detail(), &Availability::Unavailable, "US", false, false);
        assert_eq!(value["watchmode"], "unavailable");
        assert_eq!(value["availability"]["status"], "unavailable");
        assert_eq!(value["movie"]["id"], 603);

        let value = movie_page_json(&detail(), &Availability::Unavailable, "US", true, true);
        assert_eq!(value["watchmode"], "available");
        assert_eq!(value["favorite"], true);
    }
}
