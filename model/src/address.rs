use std::collections::BTreeSet;

use crate::RegionAliases;

/// Ward-level subdivisions of metropolitan cities end with this character.
pub const DISTRICT_SUFFIX: char = '구';

/// Sejong has no further subdivision in the source data.
pub const SEJONG_DISTRICT: &str = "세종시";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitAddress {
    pub prov: String,
    pub area: String,
}

impl SplitAddress {
    pub fn div(&self) -> String {
        format!("{} {}", self.prov, self.area).trim().to_string()
    }
}

/// Splits a road address into canonical province and district.
///
/// Token 0 is canonicalized into the province and token 1 becomes the
/// district. A third token ending in [`DISTRICT_SUFFIX`] is appended to the
/// district, separated by a space. Sejong always gets [`SEJONG_DISTRICT`].
pub fn split_address(addr: &str, aliases: &RegionAliases) -> SplitAddress {
    let words: Vec<_> = addr.split_whitespace().collect();

    let prov = words
        .first()
        .map(|x| aliases.canonicalize(x).to_string())
        .unwrap_or_default();
    let mut area = words.get(1).map(|x| x.to_string()).unwrap_or_default();

    if prov == "세종" {
        area = SEJONG_DISTRICT.to_string();
    } else if let Some(ward) = words.get(2).filter(|x| x.ends_with(DISTRICT_SUFFIX)) {
        area.push(' ');
        area.push_str(ward);
    }

    SplitAddress { prov, area }
}

/// Known districts used to validate split addresses.
///
/// A sample without province information only constrains the district.
#[derive(Clone, Debug)]
pub enum ReferenceAreas {
    Pairs(BTreeSet<(String, String)>),
    Areas(BTreeSet<String>),
}

impl ReferenceAreas {
    pub fn from_pairs<I, P, A>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (P, A)>,
        P: Into<String>,
        A: Into<String>,
    {
        Self::Pairs(
            pairs
                .into_iter()
                .map(|(prov, area)| (prov.into(), area.into()))
                .collect(),
        )
    }

    pub fn from_areas<I, A>(areas: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self::Areas(areas.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, split: &SplitAddress) -> bool {
        match self {
            Self::Pairs(x) => x.contains(&(split.prov.clone(), split.area.clone())),
            Self::Areas(x) => x.contains(&split.area),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Pairs(x) => x.len(),
            Self::Areas(x) => x.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(addr: &str) -> SplitAddress {
        split_address(addr, &RegionAliases::default())
    }

    #[test]
    fn road_address() {
        let x = split("서울특별시 강남구 테헤란로 152");
        assert_eq!(x.prov, "서울");
        assert_eq!(x.area, "강남구");
        assert_eq!(x.div(), "서울 강남구");
    }

    #[test]
    fn ward_is_appended() {
        let x = split("경기도 수원시 장안구 정자로 1");
        assert_eq!(x.prov, "경기");
        assert_eq!(x.area, "수원시 장안구");
    }

    #[test]
    fn sejong_is_forced() {
        let x = split("세종특별자치시 한누리대로 2130");
        assert_eq!(x.prov, "세종");
        assert_eq!(x.area, SEJONG_DISTRICT);

        let x = split("세종 조치원읍 세종로 2");
        assert_eq!(x.area, SEJONG_DISTRICT);
    }

    #[test]
    fn short_addresses() {
        assert_eq!(split("").div(), "");
        let x = split("부산광역시");
        assert_eq!(x.prov, "부산");
        assert_eq!(x.area, "");
        assert_eq!(x.div(), "부산");
    }

    #[test]
    fn reference_pairs() {
        let reference = ReferenceAreas::from_pairs([("서울", "강남구"), ("경기", "수원시 장안구")]);
        assert!(reference.contains(&split("서울특별시 강남구 테헤란로")));
        assert!(reference.contains(&split("경기 수원시 장안구 정자로")));
        assert!(!reference.contains(&split("부산광역시 강남구 테헤란로")));
        assert_eq!(reference.len(), 2);
    }

    #[test]
    fn reference_areas_only() {
        let reference = ReferenceAreas::from_areas(["강남구"]);
        assert!(reference.contains(&split("부산광역시 강남구 어딘가")));
        assert!(!reference.contains(&split("서울특별시 서초구 반포대로")));
    }

    #[test]
    fn pair_mode_ignores_bare_districts() {
        let reference = ReferenceAreas::from_pairs([("서울", "강남구"), ("서울", "강남구")]);
        assert_eq!(reference.len(), 1);
        assert!(!reference.is_empty());
        assert!(!reference.contains(&SplitAddress {
            prov: String::new(),
            area: "강남구".to_string(),
        }));
        assert!(ReferenceAreas::from_areas(Vec::<String>::new()).is_empty());
    }
}
