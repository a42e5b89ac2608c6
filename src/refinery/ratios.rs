use std::{collections::HashMap, path::Path, sync::OnceLock};

use _model::Franchise;
use anyhow::{bail, Result};
use regex::Regex;
use tracing::{debug, info, warn};

use crate::{config::RatiosConfig, table::Table, utils::squash};

/// Counted store sources: every franchise plus the toast chain gathered by
/// `collect`.
pub const SOURCES: [&str; 7] = [
    "burgerking",
    "kfc",
    "lotteria",
    "mcdonalds",
    "momstouch",
    "subway",
    "issac",
];

// indices into SOURCES
const LOTTERIA: usize = 2;
const BURGERS: [usize; 4] = [0, 1, 3, 5];

/// Population is reported per this many people.
const POPULATION_UNIT: f64 = 10_000.0;

pub const HEADER: [&str; 16] = [
    "prov",
    "area",
    "burgerking",
    "kfc",
    "lotteria",
    "mcdonalds",
    "momstouch",
    "subway",
    "issac",
    "ratio",
    "burger_ratio",
    "total_count",
    "land",
    "population",
    "lotteria_pop_density",
    "total_pop_density",
];

fn source_file(source: &str) -> String {
    match source.parse::<Franchise>() {
        Ok(x) => x.output_file(),
        Err(_) => format!("{source}.csv"),
    }
}

fn source_index(source: &str) -> Result<usize> {
    match SOURCES.iter().position(|x| *x == source) {
        Some(i) => Ok(i),
        None => bail!("Unknown store source {source:?}, expected one of {SOURCES:?}"),
    }
}

/// Builds the grouping key of a (province, district) pair.
///
/// Outside metropolitan cities a `XX시 YY구` district collapses to `XX시`
/// when wards are merged.
#[derive(Clone, Debug)]
pub struct RegionKeys {
    pub metropolitan: Vec<String>,
    pub merge_wards: bool,
}

impl RegionKeys {
    fn folds(&self, prov: &str, area: &str) -> bool {
        self.merge_wards && !self.metropolitan.iter().any(|x| x == prov) && area.contains('구')
    }

    pub fn key(&self, prov: &str, area: &str) -> String {
        let area = squash(area);
        match city(&area).filter(|_| self.folds(prov, &area)) {
            Some(city) => format!("{prov} {city}"),
            None => format!("{prov} {area}"),
        }
    }

    /// District name as shown in the output.
    pub fn display(&self, prov: &str, area: &str) -> String {
        match city(area).filter(|_| self.folds(prov, area)) {
            Some(city) => city.to_string(),
            None => area.to_string(),
        }
    }
}

/// Shortest prefix ending in `시`, at least two characters long.
fn city(area: &str) -> Option<&str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"(.+?시)").expect("hardcoded"));
    re.find(area).map(|x| x.as_str())
}

/// Leading decimal number of a cell, or zero.
fn number(cell: &str) -> f64 {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?").expect("hardcoded")
    });
    re.find(cell.trim())
        .and_then(|x| x.as_str().parse().ok())
        .unwrap_or(0.0)
}

/// Land, population and store counts of one district.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    pub prov: String,
    pub area: String,
    /// Indexed like [`SOURCES`].
    pub counts: [usize; SOURCES.len()],
    pub land: f64,
    pub people: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Ratios {
    pub ratio: f64,
    pub burger_ratio: f64,
    pub total_count: usize,
    pub population: f64,
    pub lotteria_pop_density: f64,
    pub total_pop_density: f64,
}

impl Region {
    fn sum(&self, sources: &[usize]) -> usize {
        sources.iter().map(|&i| self.counts[i]).sum()
    }

    /// `numerator` and `denominator` are indices into [`SOURCES`].
    pub fn ratios(&self, numerator: &[usize], denominator: &[usize]) -> Ratios {
        let lotteria = self.counts[LOTTERIA];
        let burgers = self.sum(&BURGERS);
        let total_count: usize = self.counts.iter().sum();
        let population = self.people / POPULATION_UNIT;

        let denominator = self.sum(denominator);
        let per_population = |count: usize| {
            if population > 0.0 {
                count as f64 / population
            } else {
                0.0
            }
        };

        Ratios {
            ratio: if denominator == 0 {
                0.0
            } else {
                self.sum(numerator) as f64 / denominator as f64
            },
            burger_ratio: if lotteria == 0 {
                0.0
            } else {
                burgers as f64 / lotteria as f64
            },
            total_count,
            population,
            lotteria_pop_density: per_population(lotteria),
            total_pop_density: per_population(total_count),
        }
    }

    fn row(&self, ratios: &Ratios) -> Vec<String> {
        let mut row = vec![self.prov.clone(), self.area.clone()];
        row.extend(self.counts.iter().map(|x| x.to_string()));
        row.extend([
            ratios.ratio.to_string(),
            ratios.burger_ratio.to_string(),
            ratios.total_count.to_string(),
            self.land.to_string(),
            ratios.population.to_string(),
            ratios.lotteria_pop_density.to_string(),
            ratios.total_pop_density.to_string(),
        ]);
        row
    }
}

/// Districts of `hu` with their summed land and population, in first-seen
/// order.
#[derive(Debug, Default)]
pub struct Regions {
    pub regions: Vec<Region>,
    index: HashMap<String, usize>,
}

impl Regions {
    pub fn from_table(hu: &Table, keys: &RegionKeys) -> Result<Self> {
        let prov = hu.column("prov")?;
        let area = hu.column("area")?;
        let land = hu.column("land")?;
        let people = hu.column("people")?;

        let mut output = Self::default();
        for i in 0..hu.len() {
            let (p, a) = (hu.cell(i, prov), hu.cell(i, area));
            let key = keys.key(p, a);
            let j = match output.index.get(&key) {
                Some(&j) => j,
                None => {
                    output.regions.push(Region {
                        prov: p.to_string(),
                        area: keys.display(p, a),
                        counts: [0; SOURCES.len()],
                        land: 0.0,
                        people: 0.0,
                    });
                    output.index.insert(key, output.regions.len() - 1);
                    output.regions.len() - 1
                }
            };
            output.regions[j].land += number(hu.cell(i, land));
            output.regions[j].people += number(hu.cell(i, people));
        }
        Ok(output)
    }

    /// Counts the stores of one source by district. Stores outside every
    /// known district are ignored; returns how many were counted.
    pub fn count(&mut self, source: usize, stores: &Table, keys: &RegionKeys) -> Result<usize> {
        let prov = stores.column("prov")?;
        let area = stores.column("area")?;

        let mut counted = 0;
        for i in 0..stores.len() {
            let key = keys.key(stores.cell(i, prov), stores.cell(i, area));
            if let Some(&j) = self.index.get(&key) {
                self.regions[j].counts[source] += 1;
                counted += 1;
            }
        }
        Ok(counted)
    }
}

/// Tallies the filtered listings in `dir` per district of `hu` and writes
/// store counts, ratios and densities to `output`.
pub fn run(
    dir: &Path,
    hu: &Path,
    output: &Path,
    config: &RatiosConfig,
    merge_wards: bool,
) -> Result<Vec<Region>> {
    let numerator = config
        .numerator
        .iter()
        .map(|x| source_index(x))
        .collect::<Result<Vec<_>>>()?;
    let denominator = config
        .denominator
        .iter()
        .map(|x| source_index(x))
        .collect::<Result<Vec<_>>>()?;
    let keys = RegionKeys {
        metropolitan: config.metropolitan.clone(),
        merge_wards,
    };

    let mut regions = Regions::from_table(&Table::read(hu)?, &keys)?;
    info!("{} districts in {}", regions.regions.len(), hu.display());

    for (i, source) in SOURCES.iter().enumerate() {
        let path = dir.join(source_file(source));
        if !path.exists() {
            warn!("No {source} listing at {}, counting zero", path.display());
            continue;
        }
        let stores = Table::read(&path)?;
        let counted = regions.count(i, &stores, &keys)?;
        debug!("{source}: {counted} of {} stores matched a district", stores.len());
    }

    let mut table = Table::new(&HEADER);
    for region in &regions.regions {
        table.rows.push(region.row(&region.ratios(&numerator, &denominator)));
    }
    table.write(output)?;
    info!("Saved {} district ratios to {}", table.len(), output.display());

    Ok(regions.regions)
}
