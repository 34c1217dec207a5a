use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use crate::dataset::table::{AthleteRow, Dataset, Medal, Sex};
use crate::error::ServiceError;

/// Raw athlete-events row as it appears in the CSV. Columns not listed here
/// (Name, Team, Games, City, Event) are ignored.
#[derive(Debug, Deserialize)]
struct RawAthleteRow {
    #[serde(rename = "ID")]
    id: u32,
    #[serde(rename = "Sex")]
    sex: Sex,
    #[serde(rename = "Age", deserialize_with = "na_f64")]
    age: Option<f64>,
    #[serde(rename = "Height", deserialize_with = "na_f64")]
    height: Option<f64>,
    #[serde(rename = "Weight", deserialize_with = "na_f64")]
    weight: Option<f64>,
    #[serde(rename = "NOC")]
    noc: String,
    #[serde(rename = "Year")]
    year: i32,
    #[serde(rename = "Season")]
    season: String,
    #[serde(rename = "Sport")]
    sport: String,
    #[serde(rename = "Medal", deserialize_with = "na_medal")]
    medal: Option<Medal>,
}

#[derive(Debug, Deserialize)]
struct RawRegionRow {
    #[serde(rename = "NOC")]
    noc: String,
    #[serde(rename = "region", deserialize_with = "na_string")]
    region: Option<String>,
}

fn is_na(s: &str) -> bool {
    s.is_empty() || s == "NA"
}

fn na_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let s = String::deserialize(deserializer)?;
    if is_na(&s) {
        return Ok(None);
    }
    s.trim()
        .parse::<f64>()
        .map(Some)
        .map_err(serde::de::Error::custom)
}

fn na_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let s = String::deserialize(deserializer)?;
    if is_na(&s) { Ok(None) } else { Ok(Some(s)) }
}

fn na_medal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Medal>, D::Error> {
    let s = String::deserialize(deserializer)?;
    match s.as_str() {
        "" | "NA" => Ok(None),
        "Gold" => Ok(Some(Medal::Gold)),
        "Silver" => Ok(Some(Medal::Silver)),
        "Bronze" => Ok(Some(Medal::Bronze)),
        other => Err(serde::de::Error::custom(format!(
            "unknown medal value {other:?}"
        ))),
    }
}

/// Reads the athlete-events and NOC-regions CSVs and left-joins them on NOC.
/// The result has exactly one row per athlete CSV row; `region` is None for
/// NOC codes the mapping does not cover.
pub fn load_dataset<P: AsRef<Path>>(
    athletes_path: P,
    regions_path: P,
) -> Result<Dataset, ServiceError> {
    let regions = load_region_map(regions_path)?;

    let file = File::open(athletes_path.as_ref())?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let raw: RawAthleteRow = record?;
        let region = regions.get(&raw.noc).cloned().flatten();
        rows.push(AthleteRow {
            id: raw.id,
            sex: raw.sex,
            age: raw.age,
            height: raw.height,
            weight: raw.weight,
            year: raw.year,
            season: raw.season,
            sport: raw.sport,
            medal: raw.medal,
            noc: raw.noc,
            region,
        });
    }

    tracing::debug!(rows = rows.len(), regions = regions.len(), "dataset joined");
    Ok(Dataset::new(rows))
}

fn load_region_map<P: AsRef<Path>>(
    regions_path: P,
) -> Result<HashMap<String, Option<String>>, ServiceError> {
    let file = File::open(regions_path.as_ref())?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));

    let mut map = HashMap::new();
    for record in reader.deserialize() {
        let raw: RawRegionRow = record?;
        map.insert(raw.noc, raw.region);
    }
    Ok(map)
}
