use std::fs::create_dir_all;

use _model::{Franchise, StoreRecord};
use anyhow::{Context, Result};
use serde_json::Value;
use tracing::info;
use ureq::{Agent, AgentBuilder, Response};

use crate::{config::Config, error::FetchError, table::Table};

mod browser;
mod burgerking;
mod kfc;
mod lotteria;
mod mcdonalds;
mod momstouch;
mod subway;

pub fn main(franchises: Vec<Franchise>, config: &Config) -> Result<()> {
    create_dir_all(&config.output_dir)
        .with_context(|| format!("Failed to create {}", config.output_dir.display()))?;

    for franchise in franchises {
        info!("Fetching {franchise} stores...");
        if franchise.needs_browser() {
            info!("Using WebDriver at {}", config.webdriver.url);
        }
        let stores =
            fetch(franchise, config).with_context(|| format!("Failed to fetch {franchise} stores"))?;

        let path = config.output_path(&franchise.output_file());
        to_table(franchise, &stores).write(&path)?;
        info!(
            "Saved {} {franchise} stores to {}",
            stores.len(),
            path.display()
        );
    }

    Ok(())
}

pub fn fetch(franchise: Franchise, config: &Config) -> Result<Vec<StoreRecord>> {
    Ok(match franchise {
        Franchise::BurgerKing => burgerking::fetch(&agent(config), &config.burgerking)?,
        Franchise::Lotteria => lotteria::fetch(&agent(config), &config.lotteria)?,
        Franchise::MomsTouch => momstouch::fetch(&agent(config), &config.momstouch)?,
        Franchise::Subway => subway::fetch(&agent(config), &config.subway)?,
        Franchise::Kfc => browser::run(config, |c| kfc::scrape(c, &config.kfc))?,
        Franchise::McDonalds => browser::run(config, |c| mcdonalds::scrape(c, &config.mcdonalds))?,
    })
}

pub fn to_table(franchise: Franchise, stores: &[StoreRecord]) -> Table {
    let mut table = Table::new(franchise.header());
    for store in stores {
        table.push(&store.row(franchise));
    }
    table
}

fn agent(config: &Config) -> Agent {
    AgentBuilder::new().user_agent(&config.user_agent).build()
}

/// Turns a ureq result into the response text, keeping the franchise in any error.
fn read_body(
    franchise: Franchise,
    response: Result<Response, ureq::Error>,
) -> Result<String, FetchError> {
    response
        .map_err(|e| FetchError::from_ureq(franchise, e))?
        .into_string()
        .map_err(|source| FetchError::Body { franchise, source })
}

/// Text of a loosely typed JSON field; store codes come back as strings or numbers.
fn value_text(value: &Option<Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(x)) => Some(x.clone()),
        Some(x) => Some(x.to_string()),
    }
}
