use serde::{Deserialize, Deserializer, Serialize};

/// One line of the HowLongToBeat dataset.
///
/// `Stats` is kept as raw JSON: its nesting varies between games and only a
/// handful of paths are read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameRecord {
    #[serde(rename = "Name", default, deserialize_with = "lenient_string")]
    pub name: Option<String>,

    #[serde(rename = "Genres", default, deserialize_with = "lenient_string")]
    pub genres: Option<String>,

    #[serde(rename = "Release_date", default, deserialize_with = "lenient_string")]
    pub release_date: Option<String>,

    #[serde(rename = "Stats", default)]
    pub stats: serde_json::Value,
}

impl GameRecord {
    /// `Stats["Single-Player"]["Main Story"]["Average"]`
    pub fn main_story_average(&self) -> Option<&serde_json::Value> {
        self.stats
            .get("Single-Player")
            .and_then(|sp| sp.get("Main Story"))
            .and_then(|ms| ms.get("Average"))
    }

    /// DLC name → that entry's own duration value.
    pub fn additional_content(&self) -> Vec<(&str, Option<&serde_json::Value>)> {
        match self.stats.get("Additional Content") {
            Some(serde_json::Value::Object(entries)) => entries
                .iter()
                .map(|(name, entry)| {
                    let duration = match entry {
                        serde_json::Value::Object(fields) => {
                            fields.get("Main").or_else(|| fields.get("Average"))
                        }
                        other => Some(other),
                    };
                    (name.as_str(), duration)
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// `Stats["Platform"][platform]`
    pub fn platform_playtimes(
        &self,
        platform: &str,
    ) -> Option<&serde_json::Map<String, serde_json::Value>> {
        self.stats
            .get("Platform")
            .and_then(|p| p.get(platform))
            .and_then(|v| v.as_object())
    }

    pub fn has_platform(&self, platform: &str) -> bool {
        self.stats
            .get("Platform")
            .and_then(|p| p.as_object())
            .map(|p| p.contains_key(platform))
            .unwrap_or(false)
    }
}

/// One row of the RAWG catalog CSV. Unknown columns are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub platforms: Option<String>,
    #[serde(default)]
    pub esrb_rating: Option<String>,
    #[serde(default)]
    pub rating: Option<String>,
}

/// A finished table, ready to be written by a `Storage`.
#[derive(Debug, Clone)]
pub struct RenderedOutput {
    pub filename: String,
    pub contents: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct TransformResult {
    pub outputs: Vec<RenderedOutput>,
    pub processed_records: usize,
    pub skipped_records: usize,
}

// 非字串值（數字、null、物件）一律視為缺少
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}
