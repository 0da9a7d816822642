pub mod cli;
pub mod toml_config;

use crate::core::genre::GenreTable;
use crate::core::report::{OutputFormat, SortOrder};
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "playtime-etl")]
#[command(about = "Prepares chart-ready tables from video game playtime and catalog datasets")]
pub struct CliConfig {
    /// HowLongToBeat dataset, one JSON object per line
    #[arg(long)]
    pub hltb_file: Option<String>,

    /// RAWG catalog CSV
    #[arg(long)]
    pub rawg_file: Option<String>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// Only keep games listed on this platform (e.g. "Xbox 360")
    #[arg(long)]
    pub platform: Option<String>,

    #[arg(long, value_delimiter = ',', default_value = "csv,json")]
    pub output_formats: Vec<String>,

    /// Genre table order: name, total or average
    #[arg(long, default_value = "name")]
    pub sort: String,

    #[arg(long, default_value = "100")]
    pub max_tags: usize,

    /// Bundle all tables into one ZIP per dataset
    #[arg(long)]
    pub compress: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl ConfigProvider for CliConfig {
    fn hltb_file(&self) -> Option<&str> {
        self.hltb_file.as_deref()
    }

    fn rawg_file(&self) -> Option<&str> {
        self.rawg_file.as_deref()
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn platform(&self) -> Option<&str> {
        self.platform.as_deref()
    }

    fn output_formats(&self) -> Vec<OutputFormat> {
        self.output_formats
            .iter()
            .filter_map(|f| f.parse().ok())
            .collect()
    }

    fn genre_table(&self) -> GenreTable {
        GenreTable::default()
    }

    fn sort_order(&self) -> SortOrder {
        self.sort.parse().unwrap_or_default()
    }

    fn max_tags(&self) -> usize {
        self.max_tags
    }

    fn compress(&self) -> bool {
        self.compress
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_inputs(self.hltb_file.as_deref(), self.rawg_file.as_deref())?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_output_formats("output_formats", &self.output_formats)?;
        validation::validate_positive_number("max_tags", self.max_tags, 1)?;
        if let Some(platform) = &self.platform {
            validation::validate_non_empty_string("platform", platform)?;
        }
        self.sort.parse::<SortOrder>().map_err(|reason| {
            crate::utils::error::EtlError::InvalidConfigValueError {
                field: "sort".to_string(),
                value: self.sort.clone(),
                reason,
            }
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let config = CliConfig::parse_from([
            "playtime-etl",
            "--hltb-file",
            "hltb.jsonlines",
            "--platform",
            "Xbox 360",
            "--output-formats",
            "csv,tsv",
            "--sort",
            "total",
        ]);

        assert!(config.validate().is_ok());
        assert_eq!(config.platform(), Some("Xbox 360"));
        assert_eq!(config.output_formats(), vec![OutputFormat::Csv, OutputFormat::Tsv]);
        assert_eq!(config.sort_order(), SortOrder::TotalMainDesc);
        assert_eq!(config.max_tags(), 100);
        assert!(!config.compress());
    }

    #[test]
    fn test_cli_requires_an_input() {
        let config = CliConfig::parse_from(["playtime-etl"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cli_rejects_unknown_sort() {
        let config = CliConfig::parse_from(["playtime-etl", "--rawg-file", "rawg.csv", "--sort", "random"]);
        assert!(config.validate().is_err());
    }
}
