use std::{
    collections::BTreeMap,
    fs::read_to_string,
    path::{Path, PathBuf},
};

use _model::{Province, RegionAliases};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

const DEFAULT_PATH: &str = "storemap.yaml";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.0.0 Safari/537.36 Edg/132.0.0.0";

const SUBWAY_REGIONS: [&str; 143] = [
    "가평", "강릉", "강진", "거제", "거창", "계룡", "고령", "고성", "고성", "고양", "고흥", "곡성",
    "공주", "광명", "광양", "광주", "광주", "구례", "구리", "구미", "군산", "군위", "군포", "금산",
    "김제", "김천", "김포", "김해", "나주", "남양", "남해", "남원", "논산", "대구", "대전", "동두",
    "동해", "마산", "목포", "무안", "무주", "문경", "밀양", "보령", "보성", "보은", "부산", "부여",
    "부천", "분당", "사천", "산청", "삼척", "상주", "서귀", "서산", "서울", "서천", "성남", "성주",
    "세종", "속초", "수원", "순천", "순창", "시흥", "아산", "안산", "안성", "안양", "안동", "양구",
    "양산", "양주", "양평", "여수", "여주", "연천", "영광", "영덕", "영동", "영암", "영양", "영월",
    "영주", "영천", "예산", "예천", "오산", "옥천", "용인", "울릉", "울산", "울진", "원주", "음성",
    "의령", "의성", "의정부", "이천", "익산", "인제", "인천", "임실", "장성", "장수", "장흥", "전주",
    "정선", "정읍", "제주", "제천", "진도", "진안", "진주", "창녕", "창원", "천안", "철원", "청도",
    "청송", "청양", "청주", "춘천", "칠곡", "통영", "파주", "평창", "평택", "포천", "포항", "하남",
    "하동", "함안", "함양", "합천", "해남", "화성", "화순", "화천", "횡성", "홍성", "홍천",
];

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub output_dir: PathBuf,
    pub user_agent: String,
    pub webdriver: WebDriverConfig,
    pub burgerking: BurgerKingConfig,
    pub lotteria: LotteriaConfig,
    pub momstouch: MomsTouchConfig,
    pub subway: SubwayConfig,
    pub kfc: KfcConfig,
    pub mcdonalds: McDonaldsConfig,
    /// Extra spellings per canonical province code, on top of the built-in table.
    pub region_aliases: BTreeMap<String, Vec<String>>,
    pub bulk: BulkConfig,
    pub ratios: RatiosConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            user_agent: USER_AGENT.to_string(),
            webdriver: WebDriverConfig::default(),
            burgerking: BurgerKingConfig::default(),
            lotteria: LotteriaConfig::default(),
            momstouch: MomsTouchConfig::default(),
            subway: SubwayConfig::default(),
            kfc: KfcConfig::default(),
            mcdonalds: McDonaldsConfig::default(),
            region_aliases: BTreeMap::new(),
            bulk: BulkConfig::default(),
            ratios: RatiosConfig::default(),
        }
    }
}

impl Config {
    /// Reads `path` if given, then `storemap.yaml` if present, and falls back
    /// to the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(x) => x,
            None if Path::new(DEFAULT_PATH).exists() => Path::new(DEFAULT_PATH),
            None => {
                debug!("No config file, using defaults");
                return Ok(Self::default());
            }
        };

        let raw = read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::parse(&raw)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(raw)?;
        config.aliases()?;
        Ok(config)
    }

    /// The built-in alias table extended with `region_aliases`.
    pub fn aliases(&self) -> Result<RegionAliases> {
        let mut aliases = RegionAliases::default();
        for (code, extra) in &self.region_aliases {
            let province: Province = code.parse()?;
            aliases.extend(province, extra);
        }
        Ok(aliases)
    }

    pub fn output_path(&self, file: &str) -> PathBuf {
        self.output_dir.join(file)
    }

    /// Where fetched listings live: `dir` when given, otherwise `output_dir`.
    pub fn stores_dir(&self, dir: Option<PathBuf>) -> PathBuf {
        dir.unwrap_or_else(|| self.output_dir.clone())
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    #[default]
    Edge,
    Chrome,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct WebDriverConfig {
    pub url: String,
    /// Driver executable to launch before connecting, if it isn't already running.
    pub binary: Option<PathBuf>,
    pub browser: Browser,
    pub headless: bool,
    pub window_size: String,
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9515".to_string(),
            binary: None,
            browser: Browser::Edge,
            headless: false,
            window_size: "1920,1080".to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct BurgerKingConfig {
    pub url: String,
    pub origin: String,
    pub referer: String,
    pub data_count: u32,
    pub latitude: String,
    pub longitude: String,
}

impl Default for BurgerKingConfig {
    fn default() -> Self {
        Self {
            url: "https://www.burgerking.co.kr/burgerking/BKR0343.json".to_string(),
            origin: "https://www.burgerking.co.kr".to_string(),
            referer: "https://www.burgerking.co.kr/store/all".to_string(),
            data_count: 600,
            latitude: "37.5726506".to_string(),
            longitude: "126.9810922".to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct LotteriaConfig {
    pub url: String,
    pub origin: String,
    pub referer: String,
    pub division_codes: Vec<String>,
    pub radius: u32,
    pub limit: u32,
}

impl Default for LotteriaConfig {
    fn default() -> Self {
        Self {
            url: "https://www.lotteeatz.com/searchStore/getStoresListAjax".to_string(),
            origin: "https://www.lotteeatz.com".to_string(),
            referer: "https://www.lotteeatz.com/searchStore".to_string(),
            division_codes: vec!["10".to_string()],
            radius: 2000,
            limit: 2000,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct MomsTouchConfig {
    pub url: String,
    /// Province indices are queried from 1 through this value.
    pub provinces: u32,
}

impl Default for MomsTouchConfig {
    fn default() -> Self {
        Self {
            url: "https://momstouch.co.kr/store/inner_shop_list.php".to_string(),
            provinces: 17,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct SubwayConfig {
    pub url: String,
    pub items_per_page: u32,
    /// Search keywords, one request each.
    pub regions: Vec<String>,
}

impl Default for SubwayConfig {
    fn default() -> Self {
        Self {
            url: "https://www.subway.co.kr/ajaxStoreSearch".to_string(),
            items_per_page: 1000,
            regions: SUBWAY_REGIONS.iter().map(|x| x.to_string()).collect(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct KfcConfig {
    pub url: String,
    pub page_load_ms: u64,
    pub select_ms: u64,
}

impl Default for KfcConfig {
    fn default() -> Self {
        Self {
            url: "https://www.kfckorea.com/store/findStore".to_string(),
            page_load_ms: 2000,
            select_ms: 200,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct McDonaldsConfig {
    pub url: String,
    pub page_ms: u64,
    pub script_ms: u64,
}

impl Default for McDonaldsConfig {
    fn default() -> Self {
        Self {
            url: "https://www.mcdonalds.co.kr/kor/store/list.do".to_string(),
            page_ms: 1000,
            script_ms: 150,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct BulkConfig {
    /// Worker count for bulk CSV ingestion; defaults to the number of CPUs.
    pub threads: Option<usize>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct RatiosConfig {
    /// Province codes whose districts are never folded into a city.
    pub metropolitan: Vec<String>,
    /// Store counts summed above the line of the `ratio` column.
    pub numerator: Vec<String>,
    /// Store counts summed below the line of the `ratio` column.
    pub denominator: Vec<String>,
}

impl Default for RatiosConfig {
    fn default() -> Self {
        Self {
            metropolitan: Province::all()
                .into_iter()
                .filter(Province::is_metropolitan)
                .map(|x| x.code().to_string())
                .collect(),
            numerator: ["burgerking", "kfc", "mcdonalds", "subway"]
                .map(String::from)
                .to_vec(),
            denominator: vec!["lotteria".to_string()],
        }
    }
}
