use std::{collections::BTreeMap, fmt, str::FromStr};

use crate::ModelError;

/// Top-level administrative divisions, named by their short canonical code.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Province {
    Seoul,
    Sejong,
    Ulsan,
    Incheon,
    Jeonnam,
    Jeonbuk,
    Jeju,
    Chungnam,
    Chungbuk,
    Gangwon,
    Gyeonggi,
    Gyeongnam,
    Gyeongbuk,
    Gwangju,
    Daegu,
    Daejeon,
    Busan,
}

impl Province {
    pub fn all() -> [Self; 17] {
        [
            Self::Seoul,
            Self::Sejong,
            Self::Ulsan,
            Self::Incheon,
            Self::Jeonnam,
            Self::Jeonbuk,
            Self::Jeju,
            Self::Chungnam,
            Self::Chungbuk,
            Self::Gangwon,
            Self::Gyeonggi,
            Self::Gyeongnam,
            Self::Gyeongbuk,
            Self::Gwangju,
            Self::Daegu,
            Self::Daejeon,
            Self::Busan,
        ]
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Seoul => "서울",
            Self::Sejong => "세종",
            Self::Ulsan => "울산",
            Self::Incheon => "인천",
            Self::Jeonnam => "전남",
            Self::Jeonbuk => "전북",
            Self::Jeju => "제주",
            Self::Chungnam => "충남",
            Self::Chungbuk => "충북",
            Self::Gangwon => "강원",
            Self::Gyeonggi => "경기",
            Self::Gyeongnam => "경남",
            Self::Gyeongbuk => "경북",
            Self::Gwangju => "광주",
            Self::Daegu => "대구",
            Self::Daejeon => "대전",
            Self::Busan => "부산",
        }
    }

    /// Special and metropolitan cities, whose second level is wards.
    pub fn is_metropolitan(&self) -> bool {
        matches!(
            self,
            Self::Seoul
                | Self::Busan
                | Self::Incheon
                | Self::Daegu
                | Self::Daejeon
                | Self::Gwangju
                | Self::Ulsan
        )
    }

    /// Spellings seen in addresses, including the full administrative name.
    pub fn default_aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Seoul => &["서울특별시", "서울", "서울시"],
            Self::Sejong => &["세종특별자치시", "세종", "세종시"],
            Self::Ulsan => &["울산광역시", "울산", "울산시"],
            Self::Incheon => &["인천광역시", "인천", "인천시"],
            Self::Jeonnam => &["전라남도", "전남"],
            Self::Jeonbuk => &["전북특별자치도", "전라북도", "전북"],
            Self::Jeju => &["제주특별자치도", "제주", "제주시"],
            Self::Chungnam => &["충청남도", "충남", "충남시"],
            Self::Chungbuk => &["충청북도", "충북"],
            Self::Gangwon => &["강원특별자치도", "강원", "강원도", "강원시"],
            Self::Gyeonggi => &["경기도", "경기"],
            Self::Gyeongnam => &["경상남도", "경남"],
            Self::Gyeongbuk => &["경상북도", "경북"],
            Self::Gwangju => &["광주광역시", "광주"],
            Self::Daegu => &["대구광역시", "대구", "대구광역", "대구시"],
            Self::Daejeon => &["대전광역시", "대전", "대전시"],
            Self::Busan => &["부산광역시", "부산", "부산시"],
        }
    }
}

impl fmt::Display for Province {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Province {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|x| x.code() == s.trim())
            .ok_or_else(|| ModelError::UnknownProvince(s.to_string()))
    }
}

/// Lookup table from raw locality strings to canonical provinces.
///
/// Keys are stored with all whitespace removed, so `"서울 특별시"` and
/// `"서울특별시"` resolve the same way. Matching is otherwise exact.
#[derive(Clone, Debug)]
pub struct RegionAliases {
    aliases: BTreeMap<String, Province>,
}

impl Default for RegionAliases {
    fn default() -> Self {
        let mut aliases = BTreeMap::new();
        for province in Province::all() {
            aliases.insert(strip_whitespace(province.code()), province);
            for alias in province.default_aliases() {
                // first listed province keeps a shared spelling
                aliases.entry(strip_whitespace(alias)).or_insert(province);
            }
        }
        Self { aliases }
    }
}

impl RegionAliases {
    /// Adds extra spellings for a province, replacing any existing mapping.
    /// Canonical codes always keep mapping to themselves.
    pub fn extend<I, S>(&mut self, province: Province, aliases: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for alias in aliases {
            let key = strip_whitespace(alias.as_ref());
            if key.is_empty() || Province::from_str(&key).is_ok() {
                continue;
            }
            self.aliases.insert(key, province);
        }
    }

    pub fn lookup(&self, name: &str) -> Option<Province> {
        self.aliases.get(&strip_whitespace(name)).copied()
    }

    /// Canonical code for `name`, or `name` itself when nothing matches.
    pub fn canonicalize<'a>(&self, name: &'a str) -> &'a str {
        match self.lookup(name) {
            Some(province) => province.code(),
            None => name,
        }
    }
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_alias_canonicalizes() {
        let aliases = RegionAliases::default();
        for province in Province::all() {
            assert_eq!(aliases.canonicalize(province.code()), province.code());
            for alias in province.default_aliases() {
                assert_eq!(aliases.canonicalize(alias), province.code(), "{alias}");
            }
        }
    }

    #[test]
    fn seoul_and_sejong() {
        let aliases = RegionAliases::default();
        assert_eq!(aliases.canonicalize("서울특별시"), "서울");
        assert_eq!(aliases.canonicalize("세종"), "세종");
        assert_eq!(aliases.canonicalize("세종특별자치시"), "세종");
    }

    #[test]
    fn whitespace_is_ignored() {
        let aliases = RegionAliases::default();
        assert_eq!(aliases.canonicalize(" 서울 특별시 "), "서울");
        assert_eq!(aliases.lookup("경기\t도"), Some(Province::Gyeonggi));
    }

    #[test]
    fn unknown_names_pass_through() {
        let aliases = RegionAliases::default();
        assert_eq!(aliases.canonicalize("서울특별"), "서울특별");
        assert_eq!(aliases.canonicalize("Seoul"), "Seoul");
        assert_eq!(aliases.canonicalize(""), "");
    }

    #[test]
    fn extend_adds_spellings() {
        let mut aliases = RegionAliases::default();
        aliases.extend(Province::Jeonbuk, ["전라북도청", "광주"]);
        assert_eq!(aliases.canonicalize("전라북도청"), "전북");
        // codes cannot be remapped
        assert_eq!(aliases.canonicalize("광주"), "광주");
    }

    #[test]
    fn metropolitan_cities() {
        let metro: Vec<_> = Province::all()
            .into_iter()
            .filter(Province::is_metropolitan)
            .map(|x| x.code())
            .collect();
        assert_eq!(metro, ["서울", "울산", "인천", "광주", "대구", "대전", "부산"]);
    }

    #[test]
    fn parse_code() {
        assert_eq!("부산".parse::<Province>().unwrap(), Province::Busan);
        assert!("부산광역시".parse::<Province>().is_err());
    }
}
