pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use app::pipelines::{catalog_pipeline::CatalogPipeline, playtime_pipeline::PlaytimePipeline};
pub use config::{cli::LocalStorage, toml_config::TomlConfig, CliConfig};
pub use crate::core::duration::parse_duration;
pub use crate::core::etl::EtlEngine;
pub use crate::core::genre::{aggregate, GenreAggregate, GenreTable};
pub use utils::error::{EtlError, Result};
