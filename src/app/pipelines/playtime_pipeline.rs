use crate::app::pipelines::{parse_json_lines, write_outputs};
use crate::core::genre::{aggregate, GenreIndex};
use crate::core::platforms::{filter_by_platform, platform_playtime_rows, platform_slug};
use crate::core::report::{render_table, sort_aggregates, GenreRow};
use crate::core::{ConfigProvider, GameRecord, Pipeline, Storage, TransformResult};
use crate::utils::error::{EtlError, Result};

/// HowLongToBeat dataset → per-genre playtime table (+ platform sheet).
pub struct PlaytimePipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    index: GenreIndex,
}

impl<S: Storage, C: ConfigProvider> PlaytimePipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        let table = config.genre_table();
        tracing::debug!("Using genre table with {} canonical genres", table.len());
        let index = table.index();
        Self {
            storage,
            config,
            index,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for PlaytimePipeline<S, C> {
    type Item = GameRecord;

    fn name(&self) -> &str {
        "playtime"
    }

    async fn extract(&self) -> Result<Vec<GameRecord>> {
        let path = self
            .config
            .hltb_file()
            .ok_or_else(|| EtlError::MissingConfigError {
                field: "hltb_file".to_string(),
            })?;

        tracing::debug!("Reading playtime dataset from: {}", path);
        let data = self.storage.read_file(path).await?;
        let records: Vec<GameRecord> = parse_json_lines(&data);

        if records.is_empty() {
            tracing::warn!("No games found in {}", path);
        }
        Ok(records)
    }

    async fn transform(&self, data: Vec<GameRecord>) -> Result<TransformResult> {
        let formats = self.config.output_formats();
        let platform = self.config.platform();

        let records = filter_by_platform(data, platform);
        match platform {
            Some(platform) => tracing::info!("🎮 Total {} games: {}", platform, records.len()),
            None => tracing::info!("🎮 Total games: {}", records.len()),
        }

        let outcome = aggregate(&records, &self.index);
        if outcome.skipped > 0 {
            tracing::info!("Skipped {} games without a name or genres", outcome.skipped);
        }
        if outcome.unmapped > 0 {
            tracing::debug!("{} games had no recognised genre tag", outcome.unmapped);
        }

        let genres = sort_aggregates(outcome.genres, self.config.sort_order());
        tracing::info!(
            "📊 Genres found: {}",
            genres
                .iter()
                .map(|g| format!("{} ({:.2}h)", g.genre, g.avg_main_hours))
                .collect::<Vec<_>>()
                .join(", ")
        );

        let rows: Vec<GenreRow> = genres.iter().map(GenreRow::from).collect();
        let mut outputs = render_table("genre_stats", &rows, &genres, records.len(), &formats)?;

        if let Some(platform) = platform {
            let playtimes = platform_playtime_rows(&records, platform);
            let stem = format!("{}_playtimes", platform_slug(platform));
            outputs.extend(render_table(
                &stem,
                &playtimes,
                &playtimes,
                playtimes.len(),
                &formats,
            )?);
        }

        Ok(TransformResult {
            outputs,
            processed_records: records.len(),
            skipped_records: outcome.skipped,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        write_outputs(
            &self.storage,
            self.config.output_path(),
            "playtime_report.zip",
            result.outputs,
            self.config.compress(),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipelines::test_support::{MockConfig, MockStorage};
    use crate::core::report::OutputFormat;

    const HLTB: &str = r#"{"Name": "Gears of War", "Genres": "Shooter, Third-Person", "Stats": {"Platform": {"Xbox 360": {"Main": "9h", "Main +": "11h", "100%": "20h"}}, "Single-Player": {"Main Story": {"Average": "9h 30m"}}, "Additional Content": {}}}
{"Name": "Fable II", "Genres": "Role-Playing, Action", "Release_date": "2008-10-21", "Stats": {"Platform": {"Xbox 360": {"Main": "13h"}}, "Single-Player": {"Main Story": {"Average": "13 Hours"}}, "Additional Content": {"Knothole Island": {"Main": "2h"}, "See the Future": {"Main": "4h"}}}}
{"Name": "Uncharted", "Genres": "Action, Shooter", "Stats": {"Platform": {"PlayStation 3": {"Main": "8h"}}, "Single-Player": {"Main Story": {"Average": "8h"}}}}
{"Genres": "Action"}
this line is broken
"#;

    fn pipeline(config: MockConfig) -> PlaytimePipeline<MockStorage, MockConfig> {
        PlaytimePipeline::new(MockStorage::with_file("hltb.jsonlines", HLTB.as_bytes()), config)
    }

    #[tokio::test]
    async fn test_extract_skips_malformed_lines() {
        let records = pipeline(MockConfig::default()).extract().await.unwrap();
        assert_eq!(records.len(), 4);
    }

    #[tokio::test]
    async fn test_extract_requires_dataset_path() {
        let config = MockConfig {
            hltb_file: None,
            ..Default::default()
        };
        let err = pipeline(config).extract().await.unwrap_err();
        assert!(matches!(err, EtlError::MissingConfigError { .. }));
    }

    #[tokio::test]
    async fn test_transform_platform_filter_and_tables() {
        let config = MockConfig {
            platform: Some("Xbox 360".to_string()),
            formats: vec![OutputFormat::Csv],
            ..Default::default()
        };
        let pipeline = pipeline(config);
        let records = pipeline.extract().await.unwrap();

        let result = pipeline.transform(records).await.unwrap();

        assert_eq!(result.processed_records, 2);
        let names: Vec<&str> = result.outputs.iter().map(|o| o.filename.as_str()).collect();
        assert_eq!(names, vec!["genre_stats.csv", "xbox_360_playtimes.csv"]);

        let csv = String::from_utf8(result.outputs[0].contents.clone()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        // Action, RPG, Shooter
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "Action,1,13.0,3.0,13.0,3.0,0.23");
        assert_eq!(lines[3], "Shooter,1,9.5,0.0,9.5,0.0,0.0");
    }

    #[tokio::test]
    async fn test_transform_without_platform_counts_incomplete() {
        let pipeline = pipeline(MockConfig::default());
        let records = pipeline.extract().await.unwrap();

        let result = pipeline.transform(records).await.unwrap();

        assert_eq!(result.processed_records, 4);
        assert_eq!(result.skipped_records, 1);
        assert_eq!(result.outputs.len(), 2);

        let json: serde_json::Value = serde_json::from_slice(&result.outputs[1].contents).unwrap();
        let action = &json["data"][0];
        assert_eq!(action["genre"], "Action");
        assert_eq!(action["game_count"], 2);
        assert_eq!(action["games"], serde_json::json!(["Fable II", "Uncharted"]));
    }

    #[tokio::test]
    async fn test_load_writes_each_file() {
        let storage = MockStorage::with_file("hltb.jsonlines", HLTB.as_bytes());
        let pipeline = PlaytimePipeline::new(storage.clone(), MockConfig::default());
        let records = pipeline.extract().await.unwrap();
        let result = pipeline.transform(records).await.unwrap();

        let location = pipeline.load(result).await.unwrap();

        assert_eq!(location, "test_output");
        assert!(storage.get_file("genre_stats.csv").await.is_some());
        assert!(storage.get_file("genre_stats.json").await.is_some());
    }

    #[tokio::test]
    async fn test_load_compressed() {
        let storage = MockStorage::with_file("hltb.jsonlines", HLTB.as_bytes());
        let config = MockConfig {
            compress: true,
            ..Default::default()
        };
        let pipeline = PlaytimePipeline::new(storage.clone(), config);
        let records = pipeline.extract().await.unwrap();
        let result = pipeline.transform(records).await.unwrap();

        let location = pipeline.load(result).await.unwrap();

        assert_eq!(location, "test_output/playtime_report.zip");
        let zip_data = storage.get_file("playtime_report.zip").await.unwrap();
        let archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data)).unwrap();
        assert_eq!(archive.len(), 2);
        assert!(storage.get_file("genre_stats.csv").await.is_none());
    }
}
