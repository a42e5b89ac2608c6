use std::time::Duration;

use _model::StoreRecord;
use anyhow::{Context, Result};
use fantoccini::{Client, Locator};
use tokio::time::sleep;
use tracing::debug;

use crate::config::McDonaldsConfig;

/// Pages through the store list with the site's own `page(n)` function
/// until a page comes back empty.
pub async fn scrape(c: Client, config: &McDonaldsConfig) -> Result<Vec<StoreRecord>> {
    c.goto(&config.url).await?;

    let mut output = Vec::new();
    for page in 1u32.. {
        sleep(Duration::from_millis(config.page_ms)).await;
        c.execute(&format!("page({page});"), Vec::new())
            .await
            .with_context(|| format!("Failed to open page {page}"))?;
        sleep(Duration::from_millis(config.script_ms)).await;

        let entries = c.find_all(Locator::Css("td.tdName dl.name")).await?;
        if entries.is_empty() {
            break;
        }

        debug!("Page {page}: {} stores", entries.len());
        for entry in entries {
            let name = entry.find(Locator::Css("strong.tit a")).await?.text().await?;
            let road = entry.find(Locator::Css("dd.road")).await?.text().await?;
            output.push(StoreRecord::new(name.trim(), road.trim()));
        }
    }

    Ok(output)
}
