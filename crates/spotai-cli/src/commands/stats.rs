use anyhow::Result;

use crate::app::AppContext;
use crate::display;

/// Prints the global per-round statistics (served from cache while fresh).
pub async fn run(ctx: AppContext) -> Result<()> {
    let stats = ctx.stats_service().fetch().await;
    display::global_stats(&stats);
    Ok(())
}
