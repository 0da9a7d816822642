use crate::core::genre::GenreAggregate;
use crate::domain::model::RenderedOutput;
use crate::utils::error::{EtlError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    Tsv,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Tsv => "tsv",
            OutputFormat::Json => "json",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "tsv" => Ok(OutputFormat::Tsv),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!(
                "Unsupported format '{}'. Valid formats: csv, tsv, json",
                other
            )),
        }
    }
}

/// Presentation order of the genre table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Name,
    TotalMainDesc,
    AvgMainDesc,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(SortOrder::Name),
            "total" | "total_main_desc" => Ok(SortOrder::TotalMainDesc),
            "average" | "avg_main_desc" => Ok(SortOrder::AvgMainDesc),
            other => Err(format!(
                "Unsupported sort order '{}'. Valid orders: name, total, average",
                other
            )),
        }
    }
}

pub fn sort_aggregates(
    genres: HashMap<String, GenreAggregate>,
    order: SortOrder,
) -> Vec<GenreAggregate> {
    let mut rows: Vec<GenreAggregate> = genres.into_values().collect();
    match order {
        SortOrder::Name => rows.sort_by(|a, b| a.genre.cmp(&b.genre)),
        SortOrder::TotalMainDesc => rows.sort_by(|a, b| {
            b.total_main_time
                .total_cmp(&a.total_main_time)
                .then_with(|| a.genre.cmp(&b.genre))
        }),
        SortOrder::AvgMainDesc => rows.sort_by(|a, b| {
            b.avg_main_hours
                .total_cmp(&a.avg_main_hours)
                .then_with(|| a.genre.cmp(&b.genre))
        }),
    }
    rows
}

/// Flat genre table row (the game list stays in the JSON report only).
#[derive(Debug, Clone, Serialize)]
pub struct GenreRow<'a> {
    pub genre: &'a str,
    pub game_count: usize,
    pub avg_main_hours: f64,
    pub avg_dlc_hours: f64,
    pub total_main_time: f64,
    pub total_dlc_time: f64,
    pub dlc_comparison_ratio: f64,
}

impl<'a> From<&'a GenreAggregate> for GenreRow<'a> {
    fn from(aggregate: &'a GenreAggregate) -> Self {
        Self {
            genre: &aggregate.genre,
            game_count: aggregate.game_count,
            avg_main_hours: aggregate.avg_main_hours,
            avg_dlc_hours: aggregate.avg_dlc_hours,
            total_main_time: aggregate.total_main_time,
            total_dlc_time: aggregate.total_dlc_time,
            dlc_comparison_ratio: aggregate.dlc_comparison_ratio,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReportEnvelope<'a, T: Serialize> {
    pub report: &'a str,
    pub generated_at: DateTime<Utc>,
    pub record_count: usize,
    pub data: &'a T,
}

pub fn render_delimited<T: Serialize>(rows: &[T], delimiter: u8) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer.into_inner().map_err(|e| EtlError::ProcessingError {
        message: format!("Failed to flush table: {}", e),
    })
}

pub fn render_csv<T: Serialize>(rows: &[T]) -> Result<Vec<u8>> {
    render_delimited(rows, b',')
}

pub fn render_tsv<T: Serialize>(rows: &[T]) -> Result<Vec<u8>> {
    render_delimited(rows, b'\t')
}

pub fn render_json<T: Serialize>(report: &str, record_count: usize, data: &T) -> Result<Vec<u8>> {
    let envelope = ReportEnvelope {
        report,
        generated_at: Utc::now(),
        record_count,
        data,
    };
    Ok(serde_json::to_vec_pretty(&envelope)?)
}

/// Renders a table in every requested format as `<stem>.<ext>`.
///
/// `json_data` is what goes in the JSON envelope; it may carry more detail
/// than the flat rows.
pub fn render_table<R, J>(
    stem: &str,
    rows: &[R],
    json_data: &J,
    record_count: usize,
    formats: &[OutputFormat],
) -> Result<Vec<RenderedOutput>>
where
    R: Serialize,
    J: Serialize,
{
    formats
        .iter()
        .map(|format| {
            let contents = match format {
                OutputFormat::Csv => render_csv(rows)?,
                OutputFormat::Tsv => render_tsv(rows)?,
                OutputFormat::Json => render_json(stem, record_count, json_data)?,
            };
            Ok(RenderedOutput {
                filename: format!("{}.{}", stem, format.extension()),
                contents,
            })
        })
        .collect()
}
