use super::AppContext;
use crate::output::Output;
use clap::ValueEnum;
use color_eyre::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LibraryList {
    Recents,
    Favorites,
}

/// Show one list, or favorites then recents
pub async fn run_library(list: Option<LibraryList>, output: &Output) -> Result<()> {
    let ctx = AppContext::load()?;
    let library = ctx.library()?;

    if list.map_or(true, |l| l == LibraryList::Favorites) {
        output.library("Favorites", &library.favorites(), "No favorites yet.");
    }
    if list.map_or(true, |l| l == LibraryList::Recents) {
        output.library("Recently viewed", &library.recents(), "No recent movies yet.");
    }
    Ok(())
}
