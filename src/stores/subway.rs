use _model::{Franchise, StoreRecord};
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;
use ureq::Agent;

use crate::{config::SubwayConfig, error::ExtractError, utils::progress_bar};

use super::{read_body, value_text};

const FRANCHISE: Franchise = Franchise::Subway;

pub fn fetch(agent: &Agent, config: &SubwayConfig) -> Result<Vec<StoreRecord>> {
    let pagination = pagination(config);
    let mut output = Vec::new();

    let pb = progress_bar(config.regions.len() as u64);
    for region in &config.regions {
        pb.set_message(region.clone());
        let body = read_body(
            FRANCHISE,
            agent.post(&config.url).send_form(&[
                ("keyword", region.as_str()),
                ("page", "1"),
                ("pagination", pagination.as_str()),
            ]),
        )
        .with_context(|| format!("Failed to fetch region {region}"))?;

        let stores = extract(&body).with_context(|| format!("Failed to read region {region}"))?;
        debug!("{region}: {} stores", stores.len());
        output.extend(stores);
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(output)
}

fn pagination(config: &SubwayConfig) -> String {
    json!({
        "pageNo": 1,
        "itemCountPerPage": config.items_per_page,
        "displayPageNoCount": config.items_per_page,
    })
    .to_string()
}

pub fn extract(body: &str) -> Result<Vec<StoreRecord>, ExtractError> {
    let response: RawResponse =
        serde_json::from_str(body).map_err(|source| ExtractError::Json {
            franchise: FRANCHISE,
            source,
        })?;

    Ok(response
        .search_result
        .unwrap_or_default()
        .into_iter()
        .map(|x| x.refine())
        .collect())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawResponse {
    search_result: Option<Vec<RawStore>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStore {
    stor_nm: Option<String>,
    stor_addr1: Option<String>,
    stor_addr2: Option<String>,
    stor_cd: Option<Value>,
}

impl RawStore {
    fn refine(self) -> StoreRecord {
        StoreRecord {
            detail_address: self.stor_addr2,
            code: value_text(&self.stor_cd),
            ..StoreRecord::new(
                self.stor_nm.unwrap_or_default(),
                self.stor_addr1.unwrap_or_default(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_search_result() {
        let stores = extract(
            r#"{"searchResult":[
                {"storNm":"가평점","storAddr1":"경기도 가평군 가평읍 가화로 1","storAddr2":"1층","storCd":"61234"},
                {"storNm":"강릉점","storAddr1":"강원특별자치도 강릉시 경강로 2","storCd":51}
            ],"pagination":{}}"#,
        )
        .unwrap();

        assert_eq!(stores.len(), 2);
        assert_eq!(stores[0].detail_address.as_deref(), Some("1층"));
        assert_eq!(stores[0].code.as_deref(), Some("61234"));
        assert_eq!(stores[1].detail_address, None);
        assert_eq!(
            stores[1].row(Franchise::Subway),
            vec!["강릉점", "강원특별자치도 강릉시 경강로 2", "", "51"]
        );
    }

    #[test]
    fn no_results() {
        assert!(extract("{}").unwrap().is_empty());
    }

    #[test]
    fn pagination_string() {
        let value: Value = serde_json::from_str(&pagination(&SubwayConfig::default())).unwrap();
        assert_eq!(value["itemCountPerPage"], 1000);
        assert_eq!(value["pageNo"], 1);
    }
}
