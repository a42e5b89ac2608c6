use std::sync::OnceLock;

use _model::{Franchise, StoreRecord};
use anyhow::{Context, Result};
use regex::Regex;
use tracing::debug;
use ureq::Agent;

use crate::{config::MomsTouchConfig, utils::progress_bar};

use super::read_body;

const FRANCHISE: Franchise = Franchise::MomsTouch;

pub fn fetch(agent: &Agent, config: &MomsTouchConfig) -> Result<Vec<StoreRecord>> {
    let mut output = Vec::new();

    let pb = progress_bar(config.provinces as u64);
    for sido in 1..=config.provinces {
        let code = format!("{sido:03}");
        let html = read_body(
            FRANCHISE,
            agent.post(&config.url).send_form(&[
                ("s_area_sido", code.as_str()),
                ("s_area_sigun", ""),
                ("type", "area"),
            ]),
        )
        .with_context(|| format!("Failed to fetch province {code}"))?;

        let stores = extract(&html);
        debug!("Province {code}: {} stores", stores.len());
        output.extend(stores);
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(output)
}

/// Parses the `<li>` store entries of the area listing fragment.
pub fn extract(html: &str) -> Vec<StoreRecord> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"(?s)<li>.*?<dt><span.*?>(.*?)</span></dt>.*?<dd>(.*?)</dd>")
            .expect("hardcoded")
    });

    re.captures_iter(html)
        .map(|x| StoreRecord::new(clean_text(&x[1]), clean_text(&x[2]).replace(',', "")))
        .collect()
}

/// Collapses `&nbsp;` runs and literal `\n`/`\t` escapes into spaces.
fn clean_text(text: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\s*&nbsp;\s*|\\n|\\t").expect("hardcoded"));
    re.replace_all(text, " ").trim().to_string()
}
