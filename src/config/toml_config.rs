use crate::core::genre::GenreTable;
use crate::core::report::{OutputFormat, SortOrder};
use crate::core::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

static ENV_VAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env regex"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub report: ReportConfig,
    pub source: SourceConfig,
    pub load: LoadConfig,
    pub presentation: Option<PresentationConfig>,
    /// Replaces the built-in genre table when present.
    pub genres: Option<GenreTable>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub hltb_file: Option<String>,
    pub rawg_file: Option<String>,
    pub platform: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub compress: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentationConfig {
    pub sort: Option<String>,
    pub max_tags: Option<usize>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATA_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    fn presentation_sort(&self) -> Option<&str> {
        self.presentation.as_ref().and_then(|p| p.sort.as_deref())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("report.name", &self.report.name)?;
        validation::validate_inputs(
            self.source.hltb_file.as_deref(),
            self.source.rawg_file.as_deref(),
        )?;
        validation::validate_path("load.output_path", &self.load.output_path)?;
        validation::validate_output_formats("load.output_formats", &self.load.output_formats)?;

        if let Some(platform) = &self.source.platform {
            validation::validate_non_empty_string("source.platform", platform)?;
        }

        if let Some(max_tags) = self.presentation.as_ref().and_then(|p| p.max_tags) {
            validation::validate_positive_number("presentation.max_tags", max_tags, 1)?;
        }

        if let Some(sort) = self.presentation_sort() {
            sort.parse::<SortOrder>()
                .map_err(|reason| EtlError::InvalidConfigValueError {
                    field: "presentation.sort".to_string(),
                    value: sort.to_string(),
                    reason,
                })?;
        }

        if let Some(genres) = &self.genres {
            if genres.is_empty() {
                return Err(EtlError::InvalidConfigValueError {
                    field: "genres".to_string(),
                    value: String::new(),
                    reason: "Genre table override cannot be empty".to_string(),
                });
            }
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn hltb_file(&self) -> Option<&str> {
        self.source.hltb_file.as_deref()
    }

    fn rawg_file(&self) -> Option<&str> {
        self.source.rawg_file.as_deref()
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn platform(&self) -> Option<&str> {
        self.source.platform.as_deref()
    }

    fn output_formats(&self) -> Vec<OutputFormat> {
        self.load
            .output_formats
            .iter()
            .filter_map(|f| f.parse().ok())
            .collect()
    }

    fn genre_table(&self) -> GenreTable {
        self.genres.clone().unwrap_or_default()
    }

    fn sort_order(&self) -> SortOrder {
        self.presentation_sort()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    fn max_tags(&self) -> usize {
        self.presentation
            .as_ref()
            .and_then(|p| p.max_tags)
            .unwrap_or(100)
    }

    fn compress(&self) -> bool {
        self.load.compress.unwrap_or(false)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
