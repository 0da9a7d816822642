//! User ratings grouped by ESRB classification (swarm and treemap input).

use crate::domain::model::CatalogRecord;
use serde::Serialize;
use std::collections::BTreeMap;

pub const ESRB_RATINGS: [&str; 5] = ["Everyone", "Everyone 10+", "Teen", "Mature", "Adults Only"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EsrbCount {
    pub esrb_rating: String,
    pub count: usize,
    /// Treemap label, `"Teen\n(12)"`.
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EsrbRatingPoint {
    pub esrb_rating: String,
    pub rating: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EsrbDistribution {
    /// Largest class first.
    pub counts: Vec<EsrbCount>,
    pub ratings: BTreeMap<String, Vec<f64>>,
}

impl EsrbDistribution {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a CatalogRecord>,
    {
        let mut ratings: BTreeMap<String, Vec<f64>> = BTreeMap::new();

        for record in records {
            let Some(esrb) = record.esrb_rating.as_deref().map(str::trim) else {
                continue;
            };
            if !ESRB_RATINGS.contains(&esrb) {
                continue;
            }
            let Some(rating) = record
                .rating
                .as_deref()
                .and_then(|r| r.trim().parse::<f64>().ok())
                .filter(|r| r.is_finite())
            else {
                continue;
            };
            ratings.entry(esrb.to_string()).or_default().push(rating);
        }

        let mut counts: Vec<EsrbCount> = ratings
            .iter()
            .map(|(esrb, values)| EsrbCount {
                esrb_rating: esrb.clone(),
                count: values.len(),
                label: format!("{}\n({})", esrb, values.len()),
            })
            .collect();
        counts.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.esrb_rating.cmp(&b.esrb_rating))
        });

        Self { counts, ratings }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|c| c.count).sum()
    }

    /// One row per game, for swarm plots.
    pub fn points(&self) -> Vec<EsrbRatingPoint> {
        self.ratings
            .iter()
            .flat_map(|(esrb, values)| {
                values.iter().map(move |rating| EsrbRatingPoint {
                    esrb_rating: esrb.clone(),
                    rating: *rating,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(esrb: Option<&str>, rating: Option<&str>) -> CatalogRecord {
        CatalogRecord {
            esrb_rating: esrb.map(String::from),
            rating: rating.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_distribution_drops_missing_and_unknown() {
        let records = vec![
            row(Some("Teen"), Some("4.2")),
            row(Some("Teen"), Some("3.9")),
            row(Some("Mature"), Some("4.5")),
            row(Some("Rating Pending"), Some("3.0")),
            row(None, Some("3.0")),
            row(Some("Everyone"), None),
            row(Some("Everyone"), Some("n/a")),
        ];

        let dist = EsrbDistribution::from_records(&records);

        assert_eq!(dist.total(), 3);
        assert_eq!(dist.counts[0].esrb_rating, "Teen");
        assert_eq!(dist.counts[0].count, 2);
        assert_eq!(dist.ratings["Teen"], vec![4.2, 3.9]);
        assert!(!dist.ratings.contains_key("Everyone"));
    }

    #[test]
    fn test_treemap_labels_and_points() {
        let records = vec![row(Some("Everyone 10+"), Some("4.0")), row(Some("Mature"), Some("3.5"))];

        let dist = EsrbDistribution::from_records(&records);

        let labels: Vec<&str> = dist.counts.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Everyone 10+\n(1)", "Mature\n(1)"]);
        assert_eq!(dist.points().len(), 2);
    }
}
