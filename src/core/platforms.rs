//! Platform filtering, the per-platform playtime sheet and platform-count
//! distribution.

use crate::core::duration::{parse_duration_value, round2};
use crate::domain::model::GameRecord;
use serde::Serialize;

pub fn filter_by_platform(records: Vec<GameRecord>, platform: Option<&str>) -> Vec<GameRecord> {
    match platform {
        Some(platform) => records
            .into_iter()
            .filter(|r| r.has_platform(platform))
            .collect(),
        None => records,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformPlaytimeRow {
    pub name: String,
    pub genre: String,
    pub release_date: String,
    pub main: String,
    pub main_plus: String,
    pub completionist: String,
    pub main_hours: f64,
    pub main_plus_hours: f64,
    pub completionist_hours: f64,
}

pub fn platform_playtime_rows<'a, I>(records: I, platform: &str) -> Vec<PlatformPlaytimeRow>
where
    I: IntoIterator<Item = &'a GameRecord>,
{
    records
        .into_iter()
        .filter_map(|record| {
            let playtimes = record.platform_playtimes(platform)?;
            let name = record.name.clone()?;
            let raw = |key: &str| {
                playtimes
                    .get(key)
                    .and_then(|v| v.as_str())
                    .unwrap_or("N/A")
                    .to_string()
            };

            Some(PlatformPlaytimeRow {
                name,
                genre: record.genres.clone().unwrap_or_else(|| "Unknown".to_string()),
                release_date: record
                    .release_date
                    .clone()
                    .unwrap_or_else(|| "Unknown".to_string()),
                main: raw("Main"),
                main_plus: raw("Main +"),
                completionist: raw("100%"),
                main_hours: parse_duration_value(playtimes.get("Main")),
                main_plus_hours: parse_duration_value(playtimes.get("Main +")),
                completionist_hours: parse_duration_value(playtimes.get("100%")),
            })
        })
        .collect()
}

/// `"Xbox 360"` → `"xbox_360"`
pub fn platform_slug(platform: &str) -> String {
    platform
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Entries in a `", "` separated platform list; blank or missing is 0.
pub fn platform_count(raw: Option<&str>) -> usize {
    match raw.map(str::trim) {
        Some(list) if !list.is_empty() => list.split(", ").count(),
        _ => 0,
    }
}

/// Five-number summary plus mean, quantiles by linear interpolation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
}

impl Distribution {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;

        Some(Self {
            count,
            min: sorted[0],
            q1: round2(quantile(&sorted, 0.25)),
            median: round2(quantile(&sorted, 0.5)),
            q3: round2(quantile(&sorted, 0.75)),
            max: sorted[count - 1],
            mean: round2(mean),
        })
    }
}

fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}
