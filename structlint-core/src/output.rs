use colored::*;
use console::measure_text_width;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "human" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!(
                "Invalid output format: {}. Valid options are: table, json",
                s
            )),
        }
    }
}

/// Column aligned table for terminal output.
///
/// Cells may carry ANSI colour codes; widths are measured on the visible text.
pub struct TableOutput {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TableOutput {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> String {
        let mut output = String::new();

        let mut widths = self
            .headers
            .iter()
            .map(|h| measure_text_width(h))
            .collect::<Vec<_>>();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(measure_text_width(cell));
                }
            }
        }

        for (i, header) in self.headers.iter().enumerate() {
            if i > 0 {
                output.push_str(" │ ");
            }
            output.push_str(&pad(&header.cyan().bold().to_string(), widths[i]));
        }
        output.push('\n');

        for (i, width) in widths.iter().enumerate() {
            if i > 0 {
                output.push_str("─┼─");
            }
            output.push_str(&"─".repeat(*width));
        }
        output.push('\n');

        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                if i > 0 {
                    output.push_str(" │ ");
                }
                if i + 1 < row.len() && i < widths.len() {
                    output.push_str(&pad(cell, widths[i]));
                } else {
                    output.push_str(cell);
                }
            }
            output.push('\n');
        }

        output
    }
}

fn pad(cell: &str, width: usize) -> String {
    let visible = measure_text_width(cell);
    let mut padded = cell.to_string();
    if visible < width {
        padded.push_str(&" ".repeat(width - visible));
    }
    padded
}
