use _model::{Franchise, StoreRecord};
use anyhow::Result;
use serde::Deserialize;
use serde_json::json;
use ureq::Agent;

use crate::{config::BurgerKingConfig, error::ExtractError};

use super::read_body;

const FRANCHISE: Franchise = Franchise::BurgerKing;

pub fn fetch(agent: &Agent, config: &BurgerKingConfig) -> Result<Vec<StoreRecord>> {
    let message = message(config);
    let body = read_body(
        FRANCHISE,
        agent
            .post(&config.url)
            .set("Accept", "*/*")
            .set("Origin", &config.origin)
            .set("Referer", &config.referer)
            .send_form(&[("message", message.as_str())]),
    )?;

    Ok(extract(&body)?)
}

/// The BKR0343 request envelope, sent as the `message` form field.
fn message(config: &BurgerKingConfig) -> String {
    json!({
        "header": {
            "result": true,
            "error_code": "",
            "error_text": "",
            "info_text": "",
            "message_version": "",
            "login_session_id": "",
            "trcode": "BKR0343",
            "cd_call_chnn": "01",
        },
        "body": {
            "dataCount": config.data_count.to_string(),
            "membershipYn": "",
            "orderType": "01",
            "page": "1",
            "searchKeyword": "",
            "serviceCode": [],
            "sort": "02",
            "yCoordinates": config.latitude,
            "xCoordinates": config.longitude,
            "isAllYn": "Y",
        },
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
        .body
        .and_then(|x| x.stor_info)
        .unwrap_or_default()
        .into_iter()
        .map(|x| x.refine())
        .collect())
}

#[derive(Deserialize)]
struct RawResponse {
    body: Option<RawBody>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBody {
    stor_info: Option<Vec<RawStore>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStore {
    stor_nm: Option<String>,
    stor_addr: Option<String>,
}

impl RawStore {
    fn refine(self) -> StoreRecord {
        StoreRecord::new(
            self.stor_nm.unwrap_or_default(),
            self.stor_addr.unwrap_or_default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;

    #[test]
    fn message_envelope() {
        let message: Value = serde_json::from_str(&message(&BurgerKingConfig::default())).unwrap();
        assert_eq!(message["header"]["trcode"], "BKR0343");
        assert_eq!(message["body"]["dataCount"], "600");
        assert_eq!(message["body"]["isAllYn"], "Y");
        assert_eq!(message["body"]["xCoordinates"], "126.9810922");
    }

    #[test]
    fn extract_stores() {
        let stores = extract(
            r#"{"header":{"result":true},"body":{"storInfo":[
                {"storNm":"종각역점","storAddr":"서울특별시 종로구 종로 64","storCd":"1"},
                {"storNm":"부산서면점","storAddr":null}
            ]}}"#,
        )
        .unwrap();

        assert_eq!(stores.len(), 2);
        assert_eq!(stores[0], StoreRecord::new("종각역점", "서울특별시 종로구 종로 64"));
        assert_eq!(stores[1].address, "");
    }

    #[test]
    fn missing_body_is_empty() {
        assert!(extract(r#"{"header":{"result":false}}"#).unwrap().is_empty());
        assert!(extract(r#"{"body":{}}"#).unwrap().is_empty());
    }

    #[test]
    fn invalid_json_is_attributed() {
        let err = extract("<html>").unwrap_err();
        assert!(matches!(
            err,
            ExtractError::Json {
                franchise: Franchise::BurgerKing,
                ..
            }
        ));
    }
}
