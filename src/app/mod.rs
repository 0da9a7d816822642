// Application layer: concrete pipelines wiring the core to storage and config.

pub mod pipelines;

use crate::config::cli::LocalStorage;
use crate::core::etl::EtlEngine;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use pipelines::{catalog_pipeline::CatalogPipeline, playtime_pipeline::PlaytimePipeline};

/// Runs the pipeline of every dataset the config names, in order, and
/// returns where each one wrote its output.
pub async fn run_reports<C: ConfigProvider + Clone>(config: C) -> Result<Vec<String>> {
    let storage = LocalStorage::new(config.output_path().to_string());
    let mut locations = Vec::new();

    if config.hltb_file().is_some() {
        let pipeline = PlaytimePipeline::new(storage.clone(), config.clone());
        locations.push(EtlEngine::new(pipeline).run().await?);
    }

    if config.rawg_file().is_some() {
        let pipeline = CatalogPipeline::new(storage, config);
        locations.push(EtlEngine::new(pipeline).run().await?);
    }

    Ok(locations)
}
