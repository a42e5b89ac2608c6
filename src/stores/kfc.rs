use std::time::Duration;

use _model::StoreRecord;
use anyhow::{Context, Result};
use fantoccini::{Client, Locator};
use tokio::time::sleep;
use tracing::info;

use crate::config::KfcConfig;

use super::browser::options;

const REGION_TAB: &str = "//ul[@class='tab']/li/a[text()='지역검색']";
const REGION_SELECT: &str = ".select-region select";
const TOWN_SELECT: &str = ".select-region select.town";

/// Walks every region and town of the region-search tab.
pub async fn scrape(c: Client, config: &KfcConfig) -> Result<Vec<StoreRecord>> {
    let wait = Duration::from_millis(config.select_ms);

    c.goto(&config.url).await?;
    sleep(Duration::from_millis(config.page_load_ms)).await;
    c.find(Locator::XPath(REGION_TAB))
        .await
        .context("Missing region search tab")?
        .click()
        .await?;

    let mut output = Vec::new();
    // options are looked up again on every pass as the page re-renders them
    let regions = options(&c, REGION_SELECT).await?.len();
    for i in 0..regions {
        let region = options(&c, REGION_SELECT)
            .await?
            .into_iter()
            .nth(i)
            .context("Region list changed while scraping")?;
        let region_name = region.text().await?;
        region.click().await?;
        sleep(wait).await;

        let before = output.len();
        let towns = options(&c, TOWN_SELECT).await?.len();
        for j in 0..towns {
            let town = options(&c, TOWN_SELECT)
                .await?
                .into_iter()
                .nth(j)
                .context("Town list changed while scraping")?;
            let town_name = town.text().await?;
            town.click().await?;
            sleep(wait).await;

            for item in c.find_all(Locator::Css(".store-item")).await? {
                let name = item.find(Locator::Css(".top a")).await?.text().await?;
                let address = item
                    .find(Locator::Css("li.num"))
                    .await?
                    .find(Locator::XPath("preceding-sibling::li[1]"))
                    .await?
                    .text()
                    .await?;

                output.push(StoreRecord {
                    region: Some(region_name.clone()),
                    town: Some(town_name.clone()),
                    ..StoreRecord::new(name, address)
                });
            }
        }
        info!("{region_name}: {} stores", output.len() - before);
    }

    Ok(output)
}
