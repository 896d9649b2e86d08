use super::AppContext;
use crate::output::Output;
use color_eyre::Result;

pub async fn run_clear(all: bool, recents: bool, favorites: bool, output: &Output) -> Result<()> {
    if !(all || recents || favorites) {
        output.warn("No clear option specified. Use --recents, --favorites, or --all");
        output.info("\nExample: wtw clear --recents");
        return Ok(());
    }

    let ctx = AppContext::load()?;
    let library = ctx.library()?;

    if all || recents {
        library.clear_recents();
        output.success("Cleared recently viewed movies");
    }
    if all || favorites {
        library.clear_favorites();
        output.success("Cleared favorites");
    }
    Ok(())
}
