pub mod duration;
pub mod etl;
pub mod genre;
pub mod platforms;
pub mod ratings;
pub mod report;
pub mod tags;

pub use crate::domain::model::{CatalogRecord, GameRecord, RenderedOutput, TransformResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
