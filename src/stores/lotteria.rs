use _model::{Franchise, StoreRecord};
use anyhow::Result;
use quick_xml::escape::{resolve_html5_entity, unescape_with};
use serde::Deserialize;
use serde_json::{json, Value};
use ureq::Agent;

use crate::{config::LotteriaConfig, error::ExtractError};

use super::{read_body, value_text};

const FRANCHISE: Franchise = Franchise::Lotteria;

const MARKER: &str = "storeList_JSON";
const MARKER_START: &str = r#"<input type="hidden" name="storeList_JSON" value=""#;
const MARKER_END: &str = r#"" />"#;

pub fn fetch(agent: &Agent, config: &LotteriaConfig) -> Result<Vec<StoreRecord>> {
    let body = read_body(
        FRANCHISE,
        agent
            .post(&config.url)
            .set("Accept", "text/html, */*; q=0.01")
            .set("Accept-Language", "ko,en;q=0.9,en-US;q=0.8")
            .set("Origin", &config.origin)
            .set("Referer", &config.referer)
            .set("X-Requested-With", "XMLHttpRequest")
            .send_json(payload(config)),
    )?;

    Ok(extract(&body)?)
}

fn payload(config: &LotteriaConfig) -> Value {
    json!({
        "query": null,
        "queryType": "NAME",
        "orderType": null,
        "data": {
            "division": {"divcd": ""},
            "adres": {"adres": null, "detailAdres": null},
            "geo": {"point": {"lat": null, "lng": null}},
            "svc": {},
        },
        "radius": config.radius,
        "query2_str": "[가-힣]",
        "divcdList": config.division_codes,
        "page": 1,
        "limit": config.limit,
    })
}

/// Pulls the store list out of the hidden `storeList_JSON` input of the
/// rendered search page. Any HTML5 named entity in the value is decoded.
pub fn extract(html: &str) -> Result<Vec<StoreRecord>, ExtractError> {
    let (_, rest) = html
        .split_once(MARKER_START)
        .ok_or(ExtractError::MissingMarker {
            franchise: FRANCHISE,
            marker: MARKER,
        })?;
    let raw = rest.split_once(MARKER_END).map_or(rest, |(x, _)| x);

    let decoded =
        unescape_with(raw, resolve_html5_entity).map_err(|source| ExtractError::Unescape {
            franchise: FRANCHISE,
            marker: MARKER,
            source,
        })?;
    let stores: Vec<RawStore> =
        serde_json::from_str(&decoded).map_err(|source| ExtractError::Json {
            franchise: FRANCHISE,
            source,
        })?;

    Ok(stores.into_iter().map(|x| x.refine()).collect())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStore {
    store_nm: Option<String>,
    adres: Option<RawAddress>,
    storecd: Option<Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAddress {
    adres: Option<String>,
    detail_adres: Option<String>,
}

impl RawStore {
    fn refine(self) -> StoreRecord {
        let (address, detail_address) = match self.adres {
            Some(x) => (x.adres, x.detail_adres),
            None => (None, None),
        };
        StoreRecord {
            detail_address,
            code: value_text(&self.storecd),
            ..StoreRecord::new(self.store_nm.unwrap_or_default(), address.unwrap_or_default())
        }
    }
}
