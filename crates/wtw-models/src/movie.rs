use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Value};

use crate::coerce::{coerce_number, is_truthy, non_blank_str};
use crate::genre::GenreMap;

/// Image host every poster, backdrop and logo path is resolved against
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/";

pub const POSTER_SIZES: &[&str] = &["w92", "w154", "w185", "w342", "w500", "w780", "original"];
pub const BACKDROP_SIZES: &[&str] = &["w300", "w780", "w1280", "original"];

pub const DEFAULT_POSTER_SIZE: &str = "w500";
pub const DEFAULT_BACKDROP_SIZE: &str = "w780";

/// Resolve a caller-supplied size against an allowed set.
///
/// Unknown sizes fall back to `fallback` when that is itself allowed,
/// otherwise to the first allowed size.
pub fn clamp_size<'a>(size: &str, allowed: &[&'a str], fallback: &str) -> &'a str {
    if let Some(found) = allowed.iter().copied().find(|s| *s == size) {
        return found;
    }
    allowed
        .iter()
        .copied()
        .find(|s| *s == fallback)
        .or_else(|| allowed.first().copied())
        .unwrap_or("original")
}

/// Join the image host, a size segment and a path fragment. Empty path gives an empty URL.
pub fn image_url(path: &str, size: &str) -> String {
    if path.trim().is_empty() {
        return String::new();
    }
    format!("{}{}{}", IMAGE_BASE_URL, size, path)
}

/// A catalog entry normalized into a safe, fully-populated record.
///
/// Construct with [`Movie::from_value`]; every field carries a type-safe default
/// so nothing downstream has to re-check the upstream JSON.
///
/// Serializes back into the wire shape the catalog API uses (see [`Movie::to_wire`]).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub original_title: String,
    pub original_language: String,
    pub overview: String,
    pub adult: bool,
    pub video: bool,
    pub genre_ids: Vec<i64>,
    pub popularity: f64,
    pub vote_average: f64,
    pub vote_count: u64,
    pub poster_path: String,
    pub backdrop_path: String,
    pub release_date: String,
    /// First four characters of `release_date`, empty when there is no date
    pub release_year: String,
}

/// Returned when a raw entry has no usable id or title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidMovie;

impl std::fmt::Display for InvalidMovie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "catalog entry needs a numeric id and a non-blank title or original_title")
    }
}

impl std::error::Error for InvalidMovie {}

impl Movie {
    /// An entry is valid when its id coerces to a finite number and
    /// at least one of `title` / `original_title` is a non-blank string.
    pub fn is_valid(raw: &Value) -> bool {
        if !raw.is_object() {
            return false;
        }
        if raw.get("id").and_then(coerce_number).is_none() {
            return false;
        }
        non_blank_str(raw.get("title")).is_some() || non_blank_str(raw.get("original_title")).is_some()
    }

    /// Normalize one raw catalog entry, or `None` if it fails [`Movie::is_valid`].
    pub fn from_value(raw: &Value) -> Option<Self> {
        if !Self::is_valid(raw) {
            return None;
        }
        Some(Self::normalize(raw))
    }

    /// Normalize a list of raw entries, dropping invalid ones and keeping order.
    pub fn list_from_values(raw: &[Value]) -> Vec<Self> {
        raw.iter().filter_map(Self::from_value).collect()
    }

    fn normalize(raw: &Value) -> Self {
        let string_field = |key: &str| non_blank_str(raw.get(key)).unwrap_or_default().to_string();
        let number_field = |key: &str| raw.get(key).and_then(coerce_number).unwrap_or(0.0);

        let title = string_field("title");
        let original_title = non_blank_str(raw.get("original_title"))
            .map(str::to_string)
            .unwrap_or_else(|| title.clone());

        let genre_ids = raw
            .get("genre_ids")
            .and_then(Value::as_array)
            .map(|ids| {
                ids.iter()
                    .filter_map(Value::as_f64)
                    .filter(|n| n.is_finite())
                    .map(|n| n as i64)
                    .collect()
            })
            .unwrap_or_default();

        let vote_count = number_field("vote_count");
        let vote_count = if vote_count.is_finite() && vote_count > 0.0 {
            vote_count as u64
        } else {
            0
        };

        let release_date = string_field("release_date");
        let release_year = release_date.chars().take(4).collect();

        Self {
            id: number_field("id") as i64,
            title,
            original_title,
            original_language: string_field("original_language"),
            overview: string_field("overview"),
            adult: raw.get("adult").map(is_truthy).unwrap_or(false),
            video: raw.get("video").map(is_truthy).unwrap_or(false),
            genre_ids,
            popularity: number_field("popularity"),
            vote_average: number_field("vote_average"),
            vote_count,
            poster_path: string_field("poster_path"),
            backdrop_path: string_field("backdrop_path"),
            release_date,
            release_year,
        }
    }

    pub fn poster_url(&self, size: &str) -> String {
        if self.poster_path.is_empty() {
            return String::new();
        }
        image_url(&self.poster_path, clamp_size(size, POSTER_SIZES, DEFAULT_POSTER_SIZE))
    }

    pub fn backdrop_url(&self, size: &str) -> String {
        if self.backdrop_path.is_empty() {
            return String::new();
        }
        image_url(&self.backdrop_path, clamp_size(size, BACKDROP_SIZES, DEFAULT_BACKDROP_SIZE))
    }

    /// Vote average on a five-star scale, clamped to `[0, 5]`
    pub fn rating_out_of_five(&self) -> f64 {
        (self.vote_average / 2.0).clamp(0.0, 5.0)
    }

    /// Short rating label such as `8.3 (20,753)`
    pub fn rating_label(&self) -> String {
        format!("{} ({})", one_decimal(self.vote_average), group_thousands(self.vote_count))
    }

    /// Genre names in `genre_ids` order; unknown ids render as their number.
    pub fn genre_names(&self, genres: &GenreMap) -> Vec<String> {
        self.genre_ids
            .iter()
            .map(|id| match genres.name(*id) {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => id.to_string(),
            })
            .collect()
    }

    pub fn has_genre(&self, genre_id: i64) -> bool {
        self.genre_ids.contains(&genre_id)
    }

    /// Case-insensitive substring match on title, original title or overview.
    /// A blank query matches everything.
    pub fn matches_query(&self, query: &str) -> bool {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(&q)
            || self.original_title.to_lowercase().contains(&q)
            || self.overview.to_lowercase().contains(&q)
    }

    /// Project back onto the catalog wire shape using the normalized values.
    pub fn to_wire(&self) -> Value {
        json!({
            "id": self.id,
            "title": self.title,
            "original_title": self.original_title,
            "original_language": self.original_language,
            "overview": self.overview,
            "adult": self.adult,
            "video": self.video,
            "genre_ids": self.genre_ids,
            "popularity": self.popularity,
            "vote_average": self.vote_average,
            "vote_count": self.vote_count,
            "poster_path": self.poster_path,
            "backdrop_path": self.backdrop_path,
            "release_date": self.release_date,
        })
    }
}

impl TryFrom<Value> for Movie {
    type Error = InvalidMovie;

    fn try_from(raw: Value) -> Result<Self, Self::Error> {
        Movie::from_value(&raw).ok_or(InvalidMovie)
    }
}

impl Serialize for Movie {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_wire().serialize(serializer)
    }
}

/// One fractional digit with exact halves rounded away from zero (`7.25` → `7.3`).
///
/// `{:.1}` rounds the exact binary value and sends true ties to even. One-digit
/// ties are exactly the values where `v * 4` is an odd integer.
pub fn one_decimal(v: f64) -> String {
    let quarters = v * 4.0;
    if quarters.fract() == 0.0 && quarters % 2.0 != 0.0 {
        return format!("{:.1}", (v * 10.0).round() / 10.0);
    }
    format!("{:.1}", v)
}

/// Format an integer with comma thousands separators (`20753` → `20,753`)
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
