use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        let name = self.pipeline.name();
        tracing::info!("🚀 Starting {} pipeline", name);

        // Extract
        let raw_data = self.pipeline.extract().await?;
        tracing::info!("📥 Extracted {} records", raw_data.len());

        // Transform
        let transformed = self.pipeline.transform(raw_data).await?;
        tracing::info!(
            "🔄 Transformed {} records ({} skipped) into {} tables",
            transformed.processed_records,
            transformed.skipped_records,
            transformed.outputs.len()
        );

        // Load
        let output_path = self.pipeline.load(transformed).await?;
        tracing::info!(
            "📁 {} output saved to: {} ({:?})",
            name,
            output_path,
            started.elapsed()
        );

        Ok(output_path)
    }
}
