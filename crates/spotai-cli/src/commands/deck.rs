use anyhow::Result;

use crate::app::AppContext;
use crate::display;

/// Lists the canonical deck with its labels.
pub fn run(ctx: &AppContext) -> Result<()> {
    display::deck(&ctx.deck);
    Ok(())
}
