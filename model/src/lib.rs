use core::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

mod address;
mod province;
mod store;

pub use address::{split_address, ReferenceAreas, SplitAddress, DISTRICT_SUFFIX, SEJONG_DISTRICT};
pub use province::{Province, RegionAliases};
pub use store::StoreRecord;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Unknown franchise: {0}")]
    UnknownFranchise(String),
    #[error("Unknown province code: {0}")]
    UnknownProvince(String),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Franchise {
    #[value(name = "burgerking")]
    BurgerKing,
    Kfc,
    Lotteria,
    #[value(name = "mcdonalds")]
    McDonalds,
    #[value(name = "momstouch")]
    MomsTouch,
    Subway,
}

impl fmt::Display for Franchise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Franchise {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "burgerking" => Self::BurgerKing,
            "kfc" => Self::Kfc,
            "lotteria" => Self::Lotteria,
            "mcdonalds" => Self::McDonalds,
            "momstouch" => Self::MomsTouch,
            "subway" => Self::Subway,
            _ => return Err(ModelError::UnknownFranchise(s.to_string())),
        })
    }
}

impl Franchise {
    pub fn all() -> Vec<Self> {
        vec![
            Franchise::BurgerKing,
            Franchise::Kfc,
            Franchise::Lotteria,
            Franchise::McDonalds,
            Franchise::MomsTouch,
            Franchise::Subway,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::BurgerKing => "Burger King",
            Self::Kfc => "KFC",
            Self::Lotteria => "Lotteria",
            Self::McDonalds => "McDonald's",
            Self::MomsTouch => "Mom's Touch",
            Self::Subway => "Subway",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Self::BurgerKing => "burgerking",
            Self::Kfc => "kfc",
            Self::Lotteria => "lotteria",
            Self::McDonalds => "mcdonalds",
            Self::MomsTouch => "momstouch",
            Self::Subway => "subway",
        }
    }

    /// Whether listings can only be read by driving a browser session.
    pub fn needs_browser(&self) -> bool {
        matches!(self, Self::Kfc | Self::McDonalds)
    }

    pub fn output_file(&self) -> String {
        format!("{}_stores.csv", self.slug())
    }

    /// Header row of the franchise's output CSV.
    pub fn header(&self) -> &'static [&'static str] {
        match self {
            Self::BurgerKing | Self::McDonalds | Self::MomsTouch => &["storNm", "storAddr"],
            Self::Lotteria => &["storeNm", "adres", "detailAdres", "storecd"],
            Self::Subway => &["storNm", "storAddr1", "storAddr2", "storCd"],
            Self::Kfc => &["Store Name", "Address", "Region", "Town"],
        }
    }
}
