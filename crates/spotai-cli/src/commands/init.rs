use anyhow::{Context, Result};
use colored::Colorize;
use spotai_core::config::ConfigRoot;
use spotai_infrastructure::ConfigService;

/// Writes a default `config.toml`. An existing file is kept unless `force`.
pub async fn run(service: &ConfigService, force: bool) -> Result<()> {
    let path = service.path();
    if !force && tokio::fs::try_exists(path).await.unwrap_or(false) {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    service
        .save(&ConfigRoot::default())
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::info!("[Init] Wrote default config to {}", path.display());
    println!("{} {}", "Wrote".green(), path.display());
    Ok(())
}
