pub mod catalog_pipeline;
pub mod playtime_pipeline;

use crate::core::{RenderedOutput, Storage};
use crate::utils::error::Result;
use serde::de::DeserializeOwned;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

/// One JSON object per line. Blank lines are ignored; lines that are not
/// valid UTF-8 or not valid JSON are logged and skipped.
pub fn parse_json_lines<T: DeserializeOwned>(data: &[u8]) -> Vec<T> {
    let mut records = Vec::new();

    for (index, bytes) in data.split(|b| *b == b'\n').enumerate() {
        let line = match std::str::from_utf8(bytes) {
            Ok(line) => line.trim(),
            Err(e) => {
                tracing::warn!("⚠️ Skipping line {} with invalid UTF-8: {}", index + 1, e);
                continue;
            }
        };
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str(line) {
            Ok(record) => records.push(record),
            Err(e) => tracing::warn!("⚠️ Skipping malformed line {}: {}", index + 1, e),
        }
    }

    records
}

/// CSV with a header row; rows that fail to deserialize are logged and skipped.
pub fn parse_csv_rows<T: DeserializeOwned>(data: &[u8]) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(data);

    // 先確認標頭可讀
    reader.headers()?;

    let mut rows = Vec::new();
    for (index, row) in reader.deserialize().enumerate() {
        match row {
            Ok(row) => rows.push(row),
            Err(e) => tracing::warn!("⚠️ Skipping malformed CSV row {}: {}", index + 2, e),
        }
    }
    Ok(rows)
}

/// Writes each output under the storage root, or one ZIP named `archive`
/// holding all of them.
pub async fn write_outputs<S: Storage>(
    storage: &S,
    output_path: &str,
    archive: &str,
    outputs: Vec<RenderedOutput>,
    compress: bool,
) -> Result<String> {
    if !compress {
        for output in &outputs {
            tracing::debug!(
                "Writing {} ({} bytes)",
                output.filename,
                output.contents.len()
            );
            storage.write_file(&output.filename, &output.contents).await?;
        }
        return Ok(output_path.to_string());
    }

    tracing::debug!("Creating ZIP file with {} files", outputs.len());

    let zip_data = {
        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
        for output in &outputs {
            zip.start_file::<_, ()>(output.filename.as_str(), FileOptions::default())?;
            zip.write_all(&output.contents)?;
        }
        let cursor = zip.finish()?;
        cursor.into_inner()
    };

    tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
    storage.write_file(archive, &zip_data).await?;

    Ok(format!("{}/{}", output_path, archive))
}
