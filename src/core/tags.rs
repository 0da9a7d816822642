//! Store-tag normalization and frequency counting (word-cloud input).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;

// 同義詞改寫，順序有意義：先處理長片語再處理單字
static TAG_REWRITES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"\b3rd person\b", "third_person"),
        (r"\bthird-person\b", "third_person"),
        (r"\bcoop\b", "co_op"),
        (r"\bcooperative\b", "co_op"),
        (r"\bco op\b", "co_op"),
        (r"\bfull controller support\b", "controller_support"),
        (r"\bpartial controller support\b", "controller_support"),
        (r"\bsteam cloud\b", "cloud_support"),
        (r"\bfps\b", "first_person_shooter"),
        (r"\btps\b", "third_person_shooter"),
        (r"\bsingleplayer\b", "single_player"),
        (r"\bmultiplayer\b", "multi_player"),
        (r"\bonline multi player\b", "multi_player"),
        (r"\bonline multi-player\b", "multi_player"),
        (r"\bonline-multi-player\b", "multi_player"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).expect("valid tag regex"), replacement))
    .collect()
});

static TAG_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*[,|]\s*").expect("valid separator regex"));

pub fn clean_tags(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    let mut tags = raw.to_lowercase();
    for (pattern, replacement) in TAG_REWRITES.iter() {
        tags = pattern.replace_all(&tags, *replacement).into_owned();
    }

    let mut cleaned: Vec<String> = Vec::new();
    for tag in TAG_SEPARATOR.split(tags.trim()) {
        let tag = tag.trim();
        if tag.is_empty() {
            continue;
        }
        let tag = tag.replace([' ', '-'], "_");
        if !cleaned.contains(&tag) {
            cleaned.push(tag);
        }
    }
    cleaned
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Most frequent tags across all games, ties broken alphabetically.
pub fn tag_frequencies<I, T>(tag_lists: I, limit: usize) -> Vec<TagCount>
where
    I: IntoIterator<Item = T>,
    T: AsRef<[String]>,
{
    let mut counts: HashMap<String, usize> = HashMap::new();
    for tags in tag_lists {
        for tag in tags.as_ref() {
            *counts.entry(tag.clone()).or_insert(0) += 1;
        }
    }

    let mut frequencies: Vec<TagCount> = counts
        .into_iter()
        .map(|(tag, count)| TagCount { tag, count })
        .collect();
    frequencies.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
    frequencies.truncate(limit);
    frequencies
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_tags_rewrites_synonyms() {
        let tags = clean_tags(Some("Singleplayer, Multiplayer, FPS, Co op, Steam Cloud"));
        assert_eq!(
            tags,
            vec![
                "single_player",
                "multi_player",
                "first_person_shooter",
                "co_op",
                "cloud_support"
            ]
        );
    }

    #[test]
    fn test_clean_tags_splits_on_pipes_and_dedupes() {
        let tags = clean_tags(Some("Open World | Third-Person, 3rd Person,  Sci-fi ,,"));
        assert_eq!(tags, vec!["open_world", "third_person", "sci_fi"]);
    }

    #[test]
    fn test_clean_tags_controller_support() {
        let tags = clean_tags(Some("Full controller support, Partial Controller Support"));
        assert_eq!(tags, vec!["controller_support"]);
    }

    #[test]
    fn test_clean_tags_missing() {
        assert!(clean_tags(None).is_empty());
        assert!(clean_tags(Some("  ")).is_empty());
    }

    #[test]
    fn test_tag_frequencies_sorted_and_limited() {
        let games = vec![
            vec!["co_op".to_string(), "rpg".to_string()],
            vec!["rpg".to_string(), "horror".to_string()],
            vec!["rpg".to_string(), "co_op".to_string()],
        ];

        let top = tag_frequencies(&games, 2);

        assert_eq!(
            top,
            vec![
                TagCount { tag: "rpg".to_string(), count: 3 },
                TagCount { tag: "co_op".to_string(), count: 2 },
            ]
        );
    }
}
