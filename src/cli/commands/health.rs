//! Availability probe and library listing.

use anyhow::Context;
use tokio::runtime::Runtime;

use super::connect;
use crate::config::Config;

/// Check that Jellyfin is reachable and accepts the token
pub fn cmd_check(rt: &Runtime, config: Config) -> anyhow::Result<()> {
    rt.block_on(check(config))
}

async fn check(config: Config) -> anyhow::Result<()> {
    let url = config.jellyfin.url.clone();
    let target = connect(config.jellyfin).await?;
    target
        .available()
        .await
        .with_context(|| format!("Jellyfin at {} is not available", url))?;

    println!("Jellyfin at {} is available", url);
    println!("  Libraries: {}", target.libraries().len());
    Ok(())
}

/// List the library roots captured from Jellyfin
pub fn cmd_libraries(rt: &Runtime, config: Config) -> anyhow::Result<()> {
    rt.block_on(list_libraries(config))
}

async fn list_libraries(config: Config) -> anyhow::Result<()> {
    let target = connect(config.jellyfin).await?;
    let libraries = target.libraries();

    if libraries.is_empty() {
        println!("Jellyfin reports no libraries.");
        return Ok(());
    }

    let width = libraries.iter().map(|l| l.name.len()).max().unwrap_or(0);
    println!("{:width$}  ROOT", "NAME", width = width);
    for library in libraries {
        println!("{:width$}  {}", library.name, library.path, width = width);
    }
    Ok(())
}
