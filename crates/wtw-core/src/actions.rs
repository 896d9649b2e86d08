//! Card clicks as a pure state transition; [`crate::library::Library::dispatch`] applies the effects.

use wtw_models::{LibraryItem, Movie};

use crate::library::{toggle, upsert_front};

/// What a result card knows about its movie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardInfo {
    pub id: i64,
    pub title: String,
    pub poster_url: String,
    pub year: String,
}

impl CardInfo {
    pub fn new(id: i64, title: impl Into<String>, poster_url: impl Into<String>, year: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            poster_url: poster_url.into(),
            year: year.into(),
        }
    }

    pub fn from_movie(movie: &Movie) -> Self {
        let item = LibraryItem::from_movie(movie);
        Self::new(item.id, item.title, item.poster_url, item.year)
    }

    fn into_item(self, added_at: i64) -> LibraryItem {
        LibraryItem::new(self.id, self.title, self.poster_url, self.year).stamped(added_at)
    }
}

/// Which part of a card was clicked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardTarget {
    FavoriteButton(CardInfo),
    Card(CardInfo),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryState {
    pub recents: Vec<LibraryItem>,
    pub favorites: Vec<LibraryItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderInstruction {
    /// Re-render the library grids; the clicked button shows `favorite_active`
    RefreshLibrary { favorite_active: bool },
    OpenMovie { id: i64 },
    Nothing,
}

pub fn reduce(
    target: CardTarget,
    mut state: LibraryState,
    recents_max: usize,
    now_millis: i64,
) -> (LibraryState, RenderInstruction) {
    match target {
        CardTarget::FavoriteButton(card) => {
            let favorite_active = toggle(&mut state.favorites, card.into_item(now_millis));
            (state, RenderInstruction::RefreshLibrary { favorite_active })
        }
        CardTarget::Card(card) if card.id == 0 => (state, RenderInstruction::Nothing),
        CardTarget::Card(card) => {
            let id = card.id;
            upsert_front(&mut state.recents, card.into_item(now_millis), recents_max);
            (state, RenderInstruction::OpenMovie { id })
        }
    }
}
