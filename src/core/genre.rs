//! Canonical genre mapping and per-genre playtime aggregation.

use crate::core::duration::{parse_duration_value, round2};
use crate::domain::model::GameRecord;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Canonical genre → raw tag synonyms.
///
/// Built once at startup (default table or the `[genres]` section of a TOML
/// config) and passed by reference; it is never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenreTable {
    genres: BTreeMap<String, Vec<String>>,
}

impl Default for GenreTable {
    fn default() -> Self {
        let table: [(&str, &[&str]); 15] = [
            ("Action", &["Action", "Hack and Slash", "Beat 'em Up", "Combat"]),
            ("Adventure", &["Adventure", "Point and Click"]),
            (
                "Shooter",
                &["Shooter", "First-Person", "Third-Person", "Top-Down Shooter", "Rail Shooter"],
            ),
            ("RPG", &["Role-Playing", "JRPG", "Action RPG", "Card Game", "Tactical RPG"]),
            ("Platformer", &["Platform", "Side-Scrolling", "2D", "3D Platformer"]),
            ("Racing", &["Racing", "Driving", "Vehicular Combat"]),
            (
                "Strategy",
                &["Strategy", "Tactical", "Turn-Based", "Real-Time", "Tower Defense", "Card Battle"],
            ),
            ("Sports", &["Sports", "Baseball", "Soccer"]),
            (
                "Simulation",
                &["Simulation", "Life Sim", "Management", "City-Building", "Economy", "Farming"],
            ),
            ("Puzzle", &["Puzzle", "Logic", "Board Game"]),
            ("Fighting", &["Fighting", "Arena"]),
            ("Survival", &["Survival"]),
            ("Stealth", &["Stealth"]),
            ("Open World", &["Open World", "Sandbox"]),
            ("Horror", &["Horror", "Survival Horror"]),
        ];

        table.into_iter().collect()
    }
}

impl<'a> FromIterator<(&'a str, &'a [&'a str])> for GenreTable {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a [&'a str])>>(iter: I) -> Self {
        let genres = iter
            .into_iter()
            .map(|(canonical, synonyms)| {
                (
                    canonical.to_string(),
                    synonyms.iter().map(|s| s.to_string()).collect(),
                )
            })
            .collect();
        Self { genres }
    }
}

impl GenreTable {
    pub fn new(genres: BTreeMap<String, Vec<String>>) -> Self {
        Self { genres }
    }

    pub fn len(&self) -> usize {
        self.genres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genres.is_empty()
    }

    pub fn canonical_names(&self) -> impl Iterator<Item = &str> {
        self.genres.keys().map(String::as_str)
    }

    /// Builds the raw tag → canonical genre lookup.
    ///
    /// A synonym listed under two canonical genres resolves to the one that
    /// comes later in sorted order.
    pub fn index(&self) -> GenreIndex {
        let mut lookup = HashMap::new();
        for (canonical, synonyms) in &self.genres {
            for synonym in synonyms {
                let key = synonym.trim().to_lowercase();
                if let Some(previous) = lookup.insert(key, canonical.clone()) {
                    if previous != *canonical {
                        tracing::warn!(
                            "Genre synonym '{}' listed under both '{}' and '{}', using '{}'",
                            synonym,
                            previous,
                            canonical,
                            canonical
                        );
                    }
                }
            }
        }
        GenreIndex { lookup }
    }
}

/// Reverse lookup built from a [`GenreTable`].
#[derive(Debug, Clone)]
pub struct GenreIndex {
    lookup: HashMap<String, String>,
}

impl GenreIndex {
    pub fn lookup(&self, tag: &str) -> Option<&str> {
        self.lookup.get(&tag.trim().to_lowercase()).map(String::as_str)
    }

    /// Canonical genres reachable from a comma-separated tag list, first-seen
    /// order, each at most once. Unmapped tags are dropped.
    pub fn canonical_genres(&self, raw: &str) -> Vec<String> {
        let mut genres: Vec<String> = Vec::new();
        for tag in raw.split(',') {
            if let Some(canonical) = self.lookup(tag) {
                if !genres.iter().any(|g| g == canonical) {
                    genres.push(canonical.to_string());
                }
            }
        }
        genres
    }
}

/// Playtime figures derived from a single record.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GameMetrics {
    pub main_hours: f64,
    pub total_dlc_hours: f64,
    pub dlc_count: usize,
    pub avg_dlc_hours: f64,
}

impl GameMetrics {
    pub fn from_record(record: &GameRecord) -> Self {
        let main_hours = parse_duration_value(record.main_story_average());

        let dlc = record.additional_content();
        let dlc_count = dlc.len();
        let total_dlc_hours: f64 = dlc
            .iter()
            .map(|(_, duration)| parse_duration_value(*duration))
            .sum();
        let avg_dlc_hours = if dlc_count > 0 {
            total_dlc_hours / dlc_count as f64
        } else {
            0.0
        };

        Self {
            main_hours,
            total_dlc_hours: round2(total_dlc_hours),
            dlc_count,
            avg_dlc_hours: round2(avg_dlc_hours),
        }
    }
}

/// Per-genre statistics handed to the report writers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreAggregate {
    pub genre: String,
    pub games: Vec<String>,
    pub game_count: usize,
    pub avg_main_hours: f64,
    pub avg_dlc_hours: f64,
    pub total_main_time: f64,
    pub total_dlc_time: f64,
    pub dlc_comparison_ratio: f64,
}

/// Running sums for one genre. Accumulators over disjoint record sets can
/// be merged, so the fold may be split and recombined.
#[derive(Debug, Clone, Default)]
pub struct GenreAccumulator {
    games: Vec<String>,
    main_sum_positive: f64,
    main_count_positive: usize,
    total_main: f64,
    total_dlc: f64,
}

impl GenreAccumulator {
    pub fn add(&mut self, name: &str, metrics: &GameMetrics) {
        self.games.push(name.to_string());
        if metrics.main_hours > 0.0 {
            self.main_sum_positive += metrics.main_hours;
            self.main_count_positive += 1;
        }
        self.total_main += metrics.main_hours;
        self.total_dlc += metrics.avg_dlc_hours;
    }

    pub fn merge(&mut self, other: GenreAccumulator) {
        self.games.extend(other.games);
        self.main_sum_positive += other.main_sum_positive;
        self.main_count_positive += other.main_count_positive;
        self.total_main += other.total_main;
        self.total_dlc += other.total_dlc;
    }

    pub fn finish(self, genre: String) -> GenreAggregate {
        let game_count = self.games.len();
        let avg_main = if self.main_count_positive > 0 {
            self.main_sum_positive / self.main_count_positive as f64
        } else {
            0.0
        };
        let avg_dlc = if game_count > 0 {
            self.total_dlc / game_count as f64
        } else {
            0.0
        };
        let ratio = if avg_main != 0.0 { avg_dlc / avg_main } else { 0.0 };

        GenreAggregate {
            genre,
            games: self.games,
            game_count,
            avg_main_hours: round2(avg_main),
            avg_dlc_hours: round2(avg_dlc),
            total_main_time: round2(self.total_main),
            total_dlc_time: round2(self.total_dlc),
            dlc_comparison_ratio: round2(ratio),
        }
    }
}

/// Aggregation result plus counts of records that fed nothing.
#[derive(Debug, Clone, Default)]
pub struct AggregationOutcome {
    pub genres: HashMap<String, GenreAggregate>,
    /// Missing Name or Genres.
    pub skipped: usize,
    /// Complete, but no tag mapped to a canonical genre.
    pub unmapped: usize,
}

/// Partial sums keyed by genre, mergeable across shards.
pub fn accumulate<'a, I>(records: I, index: &GenreIndex) -> (HashMap<String, GenreAccumulator>, usize, usize)
where
    I: IntoIterator<Item = &'a GameRecord>,
{
    let mut partial: HashMap<String, GenreAccumulator> = HashMap::new();
    let mut skipped = 0;
    let mut unmapped = 0;

    for record in records {
        let (Some(name), Some(raw_genres)) = (record.name.as_deref(), record.genres.as_deref())
        else {
            skipped += 1;
            continue;
        };
        if name.trim().is_empty() || raw_genres.trim().is_empty() {
            skipped += 1;
            continue;
        }

        let genres = index.canonical_genres(raw_genres);
        if genres.is_empty() {
            tracing::debug!("No canonical genre for '{}' (tags: {})", name, raw_genres);
            unmapped += 1;
            continue;
        }

        let metrics = GameMetrics::from_record(record);
        for genre in genres {
            partial.entry(genre).or_default().add(name, &metrics);
        }
    }

    (partial, skipped, unmapped)
}

pub fn aggregate<'a, I>(records: I, index: &GenreIndex) -> AggregationOutcome
where
    I: IntoIterator<Item = &'a GameRecord>,
{
    let (partial, skipped, unmapped) = accumulate(records, index);

    let genres = partial
        .into_iter()
        .map(|(genre, acc)| (genre.clone(), acc.finish(genre)))
        .collect();

    AggregationOutcome {
        genres,
        skipped,
        unmapped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn game(name: Option<&str>, genres: Option<&str>, stats: serde_json::Value) -> GameRecord {
        GameRecord {
            name: name.map(String::from),
            genres: genres.map(String::from),
            release_date: None,
            stats,
        }
    }

    fn main_story(average: &str) -> serde_json::Value {
        json!({"Single-Player": {"Main Story": {"Average": average}}, "Additional Content": {}})
    }

    #[test]
    fn test_default_table_has_fifteen_genres() {
        let table = GenreTable::default();
        assert_eq!(table.len(), 15);
        assert!(table.canonical_names().any(|g| g == "Open World"));
    }

    #[test]
    fn test_index_is_case_insensitive() {
        let index = GenreTable::default().index();
        assert_eq!(index.lookup("  hack and slash "), Some("Action"));
        assert_eq!(index.lookup("JRPG"), Some("RPG"));
        assert_eq!(index.lookup("survival horror"), Some("Horror"));
        assert_eq!(index.lookup("unknown_genre_xyz"), None);
    }

    #[test]
    fn test_duplicate_synonym_resolves_to_later_genre() {
        let table: GenreTable = [("Alpha", &["Shared"][..]), ("Beta", &["Shared"][..])]
            .into_iter()
            .collect();
        assert_eq!(table.index().lookup("shared"), Some("Beta"));
    }

    #[test]
    fn test_record_fans_out_to_every_genre() {
        let index = GenreTable::default().index();
        let records = vec![game(Some("Mass Effect"), Some("Action, Role-Playing"), main_story("17h"))];

        let outcome = aggregate(&records, &index);

        assert_eq!(outcome.genres.len(), 2);
        assert_eq!(outcome.genres["Action"].games, vec!["Mass Effect"]);
        assert_eq!(outcome.genres["RPG"].games, vec!["Mass Effect"]);
    }

    #[test]
    fn test_two_tags_same_genre_count_once() {
        let index = GenreTable::default().index();
        let records = vec![game(Some("Bayonetta"), Some("Action, Hack and Slash"), main_story("10h"))];

        let outcome = aggregate(&records, &index);

        assert_eq!(outcome.genres["Action"].game_count, 1);
        assert_eq!(outcome.genres["Action"].total_main_time, 10.0);
    }

    #[test]
    fn test_incomplete_records_are_skipped() {
        let index = GenreTable::default().index();
        let records = vec![
            game(None, Some("Action"), main_story("10h")),
            game(Some("No Genres"), None, main_story("10h")),
            game(Some(""), Some("Action"), main_story("10h")),
        ];

        let outcome = aggregate(&records, &index);

        assert!(outcome.genres.is_empty());
        assert_eq!(outcome.skipped, 3);
    }

    #[test]
    fn test_unmapped_tag_contributes_nothing() {
        let index = GenreTable::default().index();
        let records = vec![game(Some("Mystery"), Some("unknown_genre_xyz"), main_story("10h"))];

        let outcome = aggregate(&records, &index);

        assert!(outcome.genres.is_empty());
        assert_eq!(outcome.unmapped, 1);
        assert_eq!(outcome.skipped, 0);
    }

    #[test]
    fn test_dlc_metrics() {
        let record = game(
            Some("Fallout 3"),
            Some("Role-Playing"),
            json!({"Additional Content": {
                "Operation Anchorage": {"Main": "2h"},
                "The Pitt": {"Main": "4h"}
            }}),
        );
        let metrics = GameMetrics::from_record(&record);
        assert_eq!(metrics.dlc_count, 2);
        assert_eq!(metrics.total_dlc_hours, 6.0);
        assert_eq!(metrics.avg_dlc_hours, 3.0);

        let no_dlc = game(Some("Braid"), Some("Puzzle"), main_story("4h"));
        let metrics = GameMetrics::from_record(&no_dlc);
        assert_eq!(metrics.dlc_count, 0);
        assert_eq!(metrics.avg_dlc_hours, 0.0);
        assert_eq!(metrics.main_hours, 4.0);
    }

    #[test]
    fn test_end_to_end_two_action_games() {
        let index = GenreTable::default().index();
        let records = vec![
            game(Some("A"), Some("Action"), main_story("10h")),
            game(Some("B"), Some("Action"), main_story("20h")),
        ];

        let outcome = aggregate(&records, &index);
        let action = &outcome.genres["Action"];

        assert_eq!(action.game_count, 2);
        assert_eq!(action.avg_main_hours, 15.0);
        assert_eq!(action.total_main_time, 30.0);
        assert_eq!(action.total_dlc_time, 0.0);
        assert_eq!(action.dlc_comparison_ratio, 0.0);
    }

    #[test]
    fn test_zero_durations_stay_out_of_the_average() {
        let index = GenreTable::default().index();
        let records = vec![
            game(Some("A"), Some("Racing"), main_story("10h")),
            game(Some("B"), Some("Racing"), main_story("--")),
        ];

        let racing = aggregate(&records, &index).genres.remove("Racing").unwrap();

        assert_eq!(racing.game_count, 2);
        assert_eq!(racing.avg_main_hours, 10.0);
        assert_eq!(racing.total_main_time, 10.0);
    }

    #[test]
    fn test_dlc_comparison_ratio() {
        let index = GenreTable::default().index();
        let records = vec![game(
            Some("Skyrim"),
            Some("Open World"),
            json!({"Single-Player": {"Main Story": {"Average": "20h"}},
                   "Additional Content": {"Dawnguard": {"Main": "5h"}, "Dragonborn": {"Main": "15h"}}}),
        )];

        let open_world = aggregate(&records, &index).genres.remove("Open World").unwrap();

        assert_eq!(open_world.avg_dlc_hours, 10.0);
        assert_eq!(open_world.total_dlc_time, 10.0);
        assert_eq!(open_world.dlc_comparison_ratio, 0.5);
    }

    #[test]
    fn test_dlc_average_counts_games_without_dlc() {
        let index = GenreTable::default().index();
        let records = vec![
            game(
                Some("With DLC"),
                Some("Stealth"),
                json!({"Single-Player": {"Main Story": {"Average": "10h"}},
                       "Additional Content": {"Part 1": {"Main": "2h"}, "Part 2": {"Main": "4h"}}}),
            ),
            game(Some("Base Only"), Some("Stealth"), main_story("20h")),
            game(
                Some("Unknown Length"),
                Some("Horror"),
                json!({"Single-Player": {"Main Story": {"Average": "--"}},
                       "Additional Content": {"Expansion": {"Main": "4h"}}}),
            ),
        ];

        let mut genres = aggregate(&records, &index).genres;
        let stealth = genres.remove("Stealth").unwrap();
        let horror = genres.remove("Horror").unwrap();

        assert_eq!(stealth.avg_main_hours, 15.0);
        assert_eq!(stealth.total_dlc_time, 3.0);
        assert_eq!(stealth.avg_dlc_hours, 1.5);
        assert_eq!(stealth.dlc_comparison_ratio, 0.1);

        assert_eq!(horror.avg_main_hours, 0.0);
        assert_eq!(horror.avg_dlc_hours, 4.0);
        assert_eq!(horror.dlc_comparison_ratio, 0.0);
    }

    #[test]
    fn test_sharded_accumulation_matches_single_pass() {
        let index = GenreTable::default().index();
        let records = vec![
            game(Some("A"), Some("Action"), main_story("10h")),
            game(Some("B"), Some("Action"), main_story("20h")),
            game(Some("C"), Some("Action, Puzzle"), main_story("3h 30m")),
        ];

        let (mut left, _, _) = accumulate(&records[..1], &index);
        let (right, _, _) = accumulate(&records[1..], &index);
        for (genre, acc) in right {
            left.entry(genre).or_default().merge(acc);
        }
        let sharded = left.remove("Action").unwrap().finish("Action".to_string());

        let single = aggregate(&records, &index).genres.remove("Action").unwrap();
        assert_eq!(sharded, single);
    }
}
