use crate::app::pipelines::{parse_csv_rows, write_outputs};
use crate::core::platforms::{platform_count, Distribution};
use crate::core::ratings::EsrbDistribution;
use crate::core::report::{render_json, render_table};
use crate::core::tags::{clean_tags, tag_frequencies};
use crate::core::{CatalogRecord, ConfigProvider, Pipeline, RenderedOutput, Storage, TransformResult};
use crate::utils::error::{EtlError, Result};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct PlatformCountRow {
    pub name: String,
    pub platform_count: usize,
}

/// RAWG catalog → tag frequencies, platform-count spread, ESRB breakdown.
pub struct CatalogPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> CatalogPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CatalogPipeline<S, C> {
    type Item = CatalogRecord;

    fn name(&self) -> &str {
        "catalog"
    }

    async fn extract(&self) -> Result<Vec<CatalogRecord>> {
        let path = self
            .config
            .rawg_file()
            .ok_or_else(|| EtlError::MissingConfigError {
                field: "rawg_file".to_string(),
            })?;

        tracing::debug!("Reading catalog from: {}", path);
        let data = self.storage.read_file(path).await?;
        parse_csv_rows(&data)
    }

    async fn transform(&self, data: Vec<CatalogRecord>) -> Result<TransformResult> {
        let formats = self.config.output_formats();
        let mut outputs: Vec<RenderedOutput> = Vec::new();

        // Tags (word cloud)
        let tag_lists: Vec<Vec<String>> = data.iter().map(|r| clean_tags(r.tags.as_deref())).collect();
        let frequencies = tag_frequencies(&tag_lists, self.config.max_tags());
        tracing::info!("🏷️ {} distinct tags kept", frequencies.len());
        outputs.extend(render_table(
            "tag_frequencies",
            &frequencies,
            &frequencies,
            data.len(),
            &formats,
        )?);

        // Platforms per game (violin)
        let platform_rows: Vec<PlatformCountRow> = data
            .iter()
            .map(|r| PlatformCountRow {
                name: r.name.clone().unwrap_or_default(),
                platform_count: platform_count(r.platforms.as_deref()),
            })
            .collect();
        outputs.extend(render_table(
            "platform_counts",
            &platform_rows,
            &platform_rows,
            data.len(),
            &formats,
        )?);

        let counts: Vec<f64> = platform_rows.iter().map(|r| r.platform_count as f64).collect();
        if let Some(summary) = Distribution::from_values(&counts) {
            tracing::info!(
                "🕹️ Platforms per game: median {:.1}, IQR {:.1}-{:.1}",
                summary.median,
                summary.q1,
                summary.q3
            );
            outputs.push(RenderedOutput {
                filename: "platform_count_summary.json".to_string(),
                contents: render_json("platform_count_summary", data.len(), &summary)?,
            });
        }

        // ESRB (swarm + treemap)
        let esrb = EsrbDistribution::from_records(&data);
        let skipped_records = data.len() - esrb.total();
        tracing::info!(
            "⭐ {} games with an ESRB class and rating ({} without)",
            esrb.total(),
            skipped_records
        );
        outputs.extend(render_table(
            "esrb_counts",
            &esrb.counts,
            &esrb,
            esrb.total(),
            &formats,
        )?);
        let points = esrb.points();
        outputs.extend(render_table(
            "esrb_ratings",
            &points,
            &points,
            points.len(),
            &formats,
        )?);

        Ok(TransformResult {
            outputs,
            processed_records: data.len(),
            skipped_records,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        write_outputs(
            &self.storage,
            self.config.output_path(),
            "catalog_report.zip",
            result.outputs,
            self.config.compress(),
        )
        .await
    }
}
