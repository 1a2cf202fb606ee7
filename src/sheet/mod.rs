//! Spreadsheet download and worksheet access.
//!
//! The editorial spreadsheet is reachable by a stable document key; each
//! worksheet (songs, reviews, tags, share) is exported as CSV and parsed into
//! header-keyed rows. Fetching is blocking and sequential, this runs inside
//! the offline pipeline only.

use crate::csv::parse_rows;
use anyhow::{Context, Result};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("worksheet is empty, expected a header row")]
    EmptySheet,
    #[error("missing required column \"{0}\"")]
    MissingColumn(String),
}

/// A parsed worksheet: a header row plus data rows.
#[derive(Debug, Clone)]
pub struct Worksheet {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Worksheet {
    pub fn parse(csv_text: &str) -> Result<Worksheet, SheetError> {
        let mut rows = parse_rows(csv_text);
        if rows.is_empty() {
            return Err(SheetError::EmptySheet);
        }
        let header = rows.remove(0);
        Ok(Worksheet { header, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |cells| Row {
            header: &self.header,
            cells,
        })
    }
}

/// One data row, with cells addressable by column name.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    header: &'a [String],
    cells: &'a [String],
}

impl<'a> Row<'a> {
    /// Cell value under `column`, or an error if the worksheet has no such
    /// column. A row shorter than the header reads as empty cells.
    pub fn get(&self, column: &str) -> Result<&'a str, SheetError> {
        let index = self
            .header
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| SheetError::MissingColumn(column.to_string()))?;
        Ok(self.cells.get(index).map(String::as_str).unwrap_or(""))
    }
}

/// Blocking HTTP client for worksheet CSV exports.
pub struct SheetClient {
    http: reqwest::blocking::Client,
    export_url: String,
}

impl SheetClient {
    pub fn new(export_url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build spreadsheet HTTP client")?;
        Ok(SheetClient {
            http,
            export_url: export_url.to_string(),
        })
    }

    /// Download one worksheet of the document identified by `key`.
    pub fn fetch_worksheet(&self, key: &str, gid: u32) -> Result<Worksheet> {
        let url = format!(
            "{}?exportFormat=csv&key={}&gid={}",
            self.export_url, key, gid
        );
        let response = self
            .http
            .get(&url)
            .send()
            .with_context(|| format!("Failed to fetch worksheet gid={}", gid))?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Spreadsheet export failed with status {} for gid={}",
                response.status(),
                gid
            );
        }

        let body = response
            .text()
            .with_context(|| format!("Failed to read worksheet body for gid={}", gid))?;
        Ok(Worksheet::parse(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_and_rows() {
        let ws = Worksheet::parse("id,artist,title\n1,Air,Alone in Kyoto\n").unwrap();
        assert_eq!(ws.len(), 1);
        let row = ws.rows().next().unwrap();
        assert_eq!(row.get("id").unwrap(), "1");
        assert_eq!(row.get("artist").unwrap(), "Air");
        assert_eq!(row.get("title").unwrap(), "Alone in Kyoto");
    }

    #[test]
    fn missing_column_is_an_error() {
        let ws = Worksheet::parse("id,artist\n1,Air\n").unwrap();
        let row = ws.rows().next().unwrap();
        match row.get("title") {
            Err(SheetError::MissingColumn(col)) => assert_eq!(col, "title"),
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn short_row_reads_as_empty_cells() {
        let ws = Worksheet::parse("id,artist,title\n1,Air\n").unwrap();
        let row = ws.rows().next().unwrap();
        assert_eq!(row.get("title").unwrap(), "");
    }

    #[test]
    fn empty_export_is_an_error() {
        assert!(matches!(Worksheet::parse(""), Err(SheetError::EmptySheet)));
    }
}
