use crate::core::genre::GenreTable;
use crate::core::report::{OutputFormat, SortOrder};
use crate::domain::model::TransformResult;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn hltb_file(&self) -> Option<&str>;
    fn rawg_file(&self) -> Option<&str>;
    fn output_path(&self) -> &str;
    fn platform(&self) -> Option<&str>;
    fn output_formats(&self) -> Vec<OutputFormat>;
    fn genre_table(&self) -> GenreTable;
    fn sort_order(&self) -> SortOrder;
    fn max_tags(&self) -> usize;
    fn compress(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    type Item: Send;

    fn name(&self) -> &str;
    async fn extract(&self) -> Result<Vec<Self::Item>>;
    async fn transform(&self, data: Vec<Self::Item>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
