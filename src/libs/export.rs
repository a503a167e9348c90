//! Export of the list view to spreadsheet files.
//!
//! The exporter writes exactly what `list` renders: same columns, same
//! order, same rows. Format follows the `--format` flag, or the output file
//! extension when the flag is absent.
//!
//! ```rust,no_run
//! use eqtrack::libs::export::{ExportFormat, Exporter};
//! # fn demo(view: &eqtrack::libs::view::ListView) -> anyhow::Result<()> {
//! let path = Exporter::new(Some(ExportFormat::Excel), None).export(view)?;
//! # Ok(())
//! # }
//! ```

use super::formatter::FILE_STAMP_FORMAT;
use super::messages::Message;
use super::view::ListView;
use crate::msg_bail_anyhow;
use anyhow::Result;
use chrono::Local;
use rust_xlsxwriter::{Color, Format, Workbook};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    Excel,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "xlsx",
        }
    }

    /// `.csv` means CSV; anything else is written as a workbook.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()).map(str::to_lowercase).as_deref() {
            Some("csv") => ExportFormat::Csv,
            _ => ExportFormat::Excel,
        }
    }
}

pub struct Exporter {
    format: ExportFormat,
    output_path: PathBuf,
}

impl Exporter {
    pub fn new(format: Option<ExportFormat>, output_path: Option<PathBuf>) -> Self {
        let format = match (format, &output_path) {
            (Some(format), _) => format,
            (None, Some(path)) => ExportFormat::from_path(path),
            (None, None) => ExportFormat::Excel,
        };
        let output_path = output_path
            .unwrap_or_else(|| PathBuf::from(format!("equipment_{}.{}", Local::now().format(FILE_STAMP_FORMAT), format.extension())));

        Self { format, output_path }
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Writes the view and returns the file written.
    pub fn export(&self, view: &ListView) -> Result<PathBuf> {
        if view.is_empty() {
            msg_bail_anyhow!(Message::NothingToExport);
        }
        if let Some(parent) = self.output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        match self.format {
            ExportFormat::Csv => self.export_csv(view)?,
            ExportFormat::Excel => self.export_excel(view)?,
        }

        tracing::info!(path = %self.output_path.display(), rows = view.rows.len(), "list exported");
        Ok(self.output_path.clone())
    }

    fn export_csv(&self, view: &ListView) -> Result<()> {
        let mut wtr = csv::Writer::from_path(&self.output_path)?;
        wtr.write_record(&view.headers)?;
        for row in &view.rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    fn export_excel(&self, view: &ListView) -> Result<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Equipment")?;

        let header_format = Format::new().set_bold().set_background_color(Color::Gray);
        for (col, header) in view.headers.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, header, &header_format)?;
        }
        for (index, row) in view.rows.iter().enumerate() {
            for (col, value) in row.iter().enumerate() {
                worksheet.write_string(index as u32 + 1, col as u16, value)?;
            }
        }

        worksheet.autofit();
        workbook.save(&self.output_path)?;
        Ok(())
    }
}
