use serde::{Deserialize, Serialize};

use crate::Franchise;

/// One store as listed by a franchise's store locator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreRecord {
    pub name: String,
    pub address: String,
    pub detail_address: Option<String>,
    pub code: Option<String>,
    pub region: Option<String>,
    pub town: Option<String>,
}

impl StoreRecord {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            ..Default::default()
        }
    }

    /// Fields in the order of [`Franchise::header`].
    pub fn row(&self, franchise: Franchise) -> Vec<&str> {
        match franchise {
            Franchise::BurgerKing | Franchise::McDonalds | Franchise::MomsTouch => {
                vec![self.name.as_str(), self.address.as_str()]
            }
            Franchise::Lotteria | Franchise::Subway => vec![
                self.name.as_str(),
                self.address.as_str(),
                opt(&self.detail_address),
                opt(&self.code),
            ],
            Franchise::Kfc => vec![
                self.name.as_str(),
                self.address.as_str(),
                opt(&self.region),
                opt(&self.town),
            ],
        }
    }
}

fn opt(x: &Option<String>) -> &str {
    x.as_deref().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_matches_header() {
        let store = StoreRecord {
            code: Some("1234".to_string()),
            ..StoreRecord::new("역삼점", "서울특별시 강남구 테헤란로 1")
        };
        for franchise in Franchise::all() {
            assert_eq!(store.row(franchise).len(), franchise.header().len());
        }
        assert_eq!(
            store.row(Franchise::Subway),
            vec!["역삼점", "서울특별시 강남구 테헤란로 1", "", "1234"]
        );
    }
}
